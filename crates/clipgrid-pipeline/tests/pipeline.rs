use clipgrid_pipeline::{run_pipeline, GroupOrder, PageConfig, PipelineError};
use std::fs;
use std::path::Path;

const PEACOCK: &str = "4.mp4_ProudPeacock_2025-02-28T12-21-34_clip2_";
const OWL: &str = "161.mp4_DelightfulOwl_2025-03-06T18-06-02_clip3_";

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"").expect("write fixture");
}

fn fixture(root: &Path) -> PageConfig {
    let videos = root.join("merged_videos");
    fs::create_dir_all(&videos).expect("create videos dir");
    for suffix in ["vidmuse_video", "synch_5fps_video", "face_only"] {
        touch(&videos, &format!("{PEACOCK}{suffix}.mp4"));
    }
    for suffix in ["face_only", "raft_nocap_video", "synch_nocap_all_5fps_video"] {
        touch(&videos, &format!("{OWL}{suffix}.mp4"));
    }
    touch(&videos, "notes.txt");
    touch(&videos, "stray.mp4");

    let captions = root.join("captions.csv");
    fs::write(
        &captions,
        format!(
            "{},A jazzy tune\n{},Calm strings, slow tempo\nbroken line\n",
            PEACOCK.trim_end_matches('_'),
            OWL.trim_end_matches('_'),
        ),
    )
    .expect("write captions");

    PageConfig {
        input_dir: videos,
        caption_file: captions,
        output_file: root.join("site/videos_tables.html"),
        ..PageConfig::default()
    }
}

fn tables(html: &str) -> Vec<&str> {
    html.split("<table")
        .skip(1)
        .map(|table| table.split("</table>").next().unwrap_or(""))
        .collect()
}

#[test]
fn pipeline_writes_two_partitioned_tables() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = fixture(temp.path());

    let report = run_pipeline(&config).expect("pipeline runs");
    assert_eq!(report.first_table_rows, 1);
    assert_eq!(report.second_table_rows, 1);
    assert_eq!(report.videos_matched, 6);
    assert_eq!(report.entries_skipped, 1);
    assert_eq!(report.groups_captioned, 2);
    assert_eq!(report.output_file, config.output_file);

    let html = fs::read_to_string(&config.output_file).expect("read output");
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Video Tables</title>"));
    assert!(html.contains("🎬 Baselines VS Ours"));

    let tables = tables(&html);
    assert_eq!(tables.len(), 2);
    assert!(tables[0].contains("<th>VidMuse</th>"));
    assert!(tables[0].contains(&format!("src=\"merged_videos/{PEACOCK}vidmuse_video.mp4\"")));
    assert!(tables[0].contains("<td colspan=\"4\">A jazzy tune</td>"));
    assert!(!tables[0].contains(OWL));

    assert!(tables[1].contains("<th>Motion(R) NC</th>"));
    assert!(tables[1].contains(&format!("src=\"merged_videos/{OWL}raft_nocap_video.mp4\"")));
    assert!(tables[1].contains("<td colspan=\"6\">Calm strings, slow tempo</td>"));
    assert!(!tables[1].contains(PEACOCK));
}

#[test]
fn split_mode_applies_to_second_table_only() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = PageConfig {
        split_nc_count: Some(2),
        ..fixture(temp.path())
    };
    run_pipeline(&config).expect("pipeline runs");

    let html = fs::read_to_string(&config.output_file).expect("read output");
    let tables = tables(&html);
    assert!(tables[0].contains("<td colspan=\"4\">A jazzy tune</td>"));
    assert!(tables[1].contains("<td colspan=\"4\">Calm strings, slow tempo</td>"));
    assert_eq!(tables[1].matches("<td>Generic caption</td>").count(), 2);
    assert!(!tables[0].contains("Generic caption"));
}

#[test]
fn pipeline_output_is_idempotent() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = fixture(temp.path());
    run_pipeline(&config).expect("first run");
    let first = fs::read(&config.output_file).expect("read first");
    run_pipeline(&config).expect("second run");
    let second = fs::read(&config.output_file).expect("read second");
    assert_eq!(first, second);
}

#[test]
fn sorted_order_lists_groups_by_key() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = fixture(temp.path());
    for key in ["b_clip1_", "a_clip1_", "c_clip1_"] {
        touch(&config.input_dir, &format!("{key}face_synch.mp4"));
    }
    assert_eq!(config.group_order, GroupOrder::Sorted);
    run_pipeline(&config).expect("pipeline runs");

    let html = fs::read_to_string(&config.output_file).expect("read output");
    let a = html.find("a_clip1_face_synch.mp4").expect("a");
    let b = html.find("b_clip1_face_synch.mp4").expect("b");
    let c = html.find("c_clip1_face_synch.mp4").expect("c");
    assert!(a < b && b < c);
}

#[test]
fn braces_in_captions_pass_through_unchanged() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = fixture(temp.path());
    fs::write(
        &config.caption_file,
        format!("{},Loop {{intro}} then {{0}}\n", PEACOCK.trim_end_matches('_')),
    )
    .expect("rewrite captions");
    run_pipeline(&config).expect("pipeline runs");

    let html = fs::read_to_string(&config.output_file).expect("read output");
    assert!(html.contains(">Loop {intro} then {0}</td>"));
}

#[test]
fn missing_caption_file_aborts_without_output() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = PageConfig {
        caption_file: temp.path().join("absent.csv"),
        ..fixture(temp.path())
    };
    let err = run_pipeline(&config).unwrap_err();
    assert!(matches!(err, PipelineError::Io { .. }));
    assert!(!config.output_file.exists());
}

#[test]
fn missing_input_dir_aborts_without_output() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = PageConfig {
        input_dir: temp.path().join("nowhere"),
        ..fixture(temp.path())
    };
    let err = run_pipeline(&config).unwrap_err();
    assert!(err.to_string().contains("nowhere"));
    assert!(!config.output_file.exists());
}

#[test]
fn existing_output_is_overwritten() {
    let temp = tempfile::tempdir().expect("tempdir");
    let config = fixture(temp.path());
    fs::create_dir_all(config.output_file.parent().expect("parent")).expect("mkdir");
    fs::write(&config.output_file, "stale").expect("write stale");
    run_pipeline(&config).expect("pipeline runs");
    let html = fs::read_to_string(&config.output_file).expect("read output");
    assert!(!html.contains("stale"));
}
