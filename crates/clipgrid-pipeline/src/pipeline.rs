use crate::captions::{load_captions, lookup_key, CaptionMap};
use crate::config::{ConfigError, GroupOrder, PageConfig};
use crate::grouping::{partition, scan_directory, ClipGroups, ClipPattern, Partition};
use crate::page::{render_page, write_page, PageContent};
use crate::render::render_table;
use std::path::PathBuf;

#[derive(Debug)]
pub struct PipelineReport {
    pub output_file: PathBuf,
    pub first_table_rows: usize,
    pub second_table_rows: usize,
    pub entries_scanned: usize,
    pub videos_matched: usize,
    pub entries_skipped: usize,
    pub groups_captioned: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid clip pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Scanned groups already split into the two tables.
#[derive(Debug)]
pub struct GroupedClips {
    pub partition: Partition,
    pub entries_scanned: usize,
    pub videos_matched: usize,
    pub entries_skipped: usize,
}

/// Scans `config.input_dir`, applies the configured group order and splits
/// the groups by `second_table_key_set`.
pub fn collect_groups(config: &PageConfig) -> Result<GroupedClips, PipelineError> {
    config.validate()?;
    let pattern = ClipPattern::new(&config.video_extension)?;
    let scan = scan_directory(&config.input_dir, &pattern)?;
    let mut groups = scan.groups;
    if config.group_order == GroupOrder::Sorted {
        groups.sort();
    }
    Ok(GroupedClips {
        partition: partition(groups, &config.second_table_key_set),
        entries_scanned: scan.entries,
        videos_matched: scan.matched,
        entries_skipped: scan.skipped,
    })
}

/// Builds the page HTML without touching the output file.
pub fn build_page(
    config: &PageConfig,
    grouped: &GroupedClips,
    captions: &CaptionMap,
) -> String {
    let first_table = render_table(
        &grouped.partition.first,
        &config.first_table_spec(),
        captions,
        &config.media_prefix,
    );
    let second_table = render_table(
        &grouped.partition.second,
        &config.second_table_spec(),
        captions,
        &config.media_prefix,
    );
    render_page(&PageContent {
        page_title: &config.page_title,
        first_table_title: &config.first_table_title,
        first_table: &first_table,
        second_table_title: &config.second_table_title,
        second_table: &second_table,
        note: &config.note,
    })
}

/// Runs the whole generator. The output file is only written once every
/// input has been read and rendered.
pub fn run_pipeline(config: &PageConfig) -> Result<PipelineReport, PipelineError> {
    config.validate()?;
    let captions = load_captions(&config.caption_file)?;
    let grouped = collect_groups(config)?;
    let html = build_page(config, &grouped, &captions);
    write_page(&config.output_file, &html)?;

    let partition = &grouped.partition;
    Ok(PipelineReport {
        output_file: config.output_file.clone(),
        first_table_rows: partition.first.len(),
        second_table_rows: partition.second.len(),
        entries_scanned: grouped.entries_scanned,
        videos_matched: grouped.videos_matched,
        entries_skipped: grouped.entries_skipped,
        groups_captioned: count_captioned(&partition.first, &captions)
            + count_captioned(&partition.second, &captions),
    })
}

fn count_captioned(groups: &ClipGroups, captions: &CaptionMap) -> usize {
    groups
        .keys()
        .filter(|key| captions.contains_key(lookup_key(key)))
        .count()
}
