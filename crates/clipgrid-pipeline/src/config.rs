use crate::render::{CaptionMode, TableSpec};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_DIR: &str = "merged_videos";
pub const DEFAULT_CAPTION_FILE: &str = "captions.csv";
pub const DEFAULT_OUTPUT_FILE: &str = "videos_tables.html";
pub const DEFAULT_VIDEO_EXTENSION: &str = "mp4";
pub const DEFAULT_MEDIA_PREFIX: &str = "merged_videos";
pub const DEFAULT_SPLIT_FILLER: &str = "Generic caption";

const FIRST_TABLE_COLUMNS: [(&str, &str); 4] = [
    ("vidmuse_video", "VidMuse"),
    ("baseline_musicgen_video", "MusicGen"),
    ("synch_5fps_video", "Ours(Motion)"),
    ("face_synch", "Ours(Face+Motion)"),
];

const SECOND_TABLE_COLUMNS: [(&str, &str); 6] = [
    ("face_only", "Face Only"),
    ("face_synch", "Face+Motion"),
    ("raft_5fps_video", "Motion(R)"),
    ("raft_nocap_video", "Motion(R) NC"),
    ("synch_5fps_video", "Motion(S)"),
    ("synch_nocap_all_5fps_video", "Motion (S) NC"),
];

const SECOND_TABLE_KEYS: [&str; 8] = [
    "161.mp4_DelightfulOwl_2025-03-06T18-06-02_clip3_",
    "46.mp4_DelightfulOwl_2025-03-06T19-27-32_clip3_",
    "540.mp4_DelightfulOwl_2025-03-06T19-11-18_clip3_",
    "61.mp4_DelightfulOwl_2025-03-06T18-09-39_clip3_",
    "20.mp4_ProudPeacock_2025-02-26T09-54-39_clip10_",
    "106.mp4_NiceWolf_2025-03-11T12-46-02_clip1_",
    "54.mp4_EnergeticMonkey_2025-03-01T10-26-38_clip18_",
    "56.mp4_EagerRabbit_2025-03-01T05-12-36_clip2_",
];

const PAGE_TITLE: &str = "Video Tables";
const FIRST_TABLE_TITLE: &str = "🎬 Baselines VS Ours";
const SECOND_TABLE_TITLE: &str = "🎶 Generated Music on Different Visual Extractors";
const NOTE: &str = "💡 Note: \"Motion(R)\" means Motion with RAFT, \"Motion(S)\" means Motion with Synchformer, and \"NC\" means no caption (generic caption).";

/// Order in which groups are emitted as table rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOrder {
    /// Group keys in byte order, independent of the directory listing.
    #[default]
    Sorted,
    /// Whatever order the directory listing produced.
    Scan,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPageConfig {
    input_dir: Option<PathBuf>,
    caption_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    video_extension: Option<String>,
    media_prefix: Option<String>,
    group_order: Option<GroupOrder>,
    split_nc_count: Option<usize>,
    split_filler: Option<String>,
    table_class: Option<String>,
    page_title: Option<String>,
    first_table_title: Option<String>,
    second_table_title: Option<String>,
    note: Option<String>,
    first_table_columns: Option<Vec<String>>,
    second_table_columns: Option<Vec<String>>,
    second_table_key_set: Option<BTreeSet<String>>,
    first_table_headers: Option<BTreeMap<String, String>>,
    second_table_headers: Option<BTreeMap<String, String>>,
}

/// Everything the page generator needs to know. The defaults reproduce the
/// baseline/ablation comparison page.
///
/// Map-valued fields are declared last so the TOML form keeps plain keys
/// ahead of the header tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageConfig {
    pub input_dir: PathBuf,
    pub caption_file: PathBuf,
    pub output_file: PathBuf,
    pub video_extension: String,
    pub media_prefix: String,
    pub group_order: GroupOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_nc_count: Option<usize>,
    pub split_filler: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_class: Option<String>,
    pub page_title: String,
    pub first_table_title: String,
    pub second_table_title: String,
    pub note: String,
    pub first_table_columns: Vec<String>,
    pub second_table_columns: Vec<String>,
    pub second_table_key_set: BTreeSet<String>,
    pub first_table_headers: BTreeMap<String, String>,
    pub second_table_headers: BTreeMap<String, String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            caption_file: PathBuf::from(DEFAULT_CAPTION_FILE),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            video_extension: DEFAULT_VIDEO_EXTENSION.to_string(),
            media_prefix: DEFAULT_MEDIA_PREFIX.to_string(),
            group_order: GroupOrder::default(),
            split_nc_count: None,
            split_filler: DEFAULT_SPLIT_FILLER.to_string(),
            table_class: None,
            page_title: PAGE_TITLE.to_string(),
            first_table_title: FIRST_TABLE_TITLE.to_string(),
            second_table_title: SECOND_TABLE_TITLE.to_string(),
            note: NOTE.to_string(),
            first_table_columns: column_ids(&FIRST_TABLE_COLUMNS),
            second_table_columns: column_ids(&SECOND_TABLE_COLUMNS),
            second_table_key_set: SECOND_TABLE_KEYS
                .iter()
                .map(|key| key.to_string())
                .collect(),
            first_table_headers: header_labels(&FIRST_TABLE_COLUMNS),
            second_table_headers: header_labels(&SECOND_TABLE_COLUMNS),
        }
    }
}

impl PageConfig {
    /// Parses a TOML config. Keys left out keep their default value.
    pub fn parse(toml_src: &str) -> Result<Self, ConfigError> {
        let raw: RawPageConfig = toml::from_str(toml_src)?;
        let defaults = PageConfig::default();
        let config = PageConfig {
            input_dir: raw.input_dir.unwrap_or(defaults.input_dir),
            caption_file: raw.caption_file.unwrap_or(defaults.caption_file),
            output_file: raw.output_file.unwrap_or(defaults.output_file),
            video_extension: raw.video_extension.unwrap_or(defaults.video_extension),
            media_prefix: raw.media_prefix.unwrap_or(defaults.media_prefix),
            group_order: raw.group_order.unwrap_or(defaults.group_order),
            split_nc_count: raw.split_nc_count.or(defaults.split_nc_count),
            split_filler: raw.split_filler.unwrap_or(defaults.split_filler),
            table_class: raw.table_class.or(defaults.table_class),
            page_title: raw.page_title.unwrap_or(defaults.page_title),
            first_table_title: raw.first_table_title.unwrap_or(defaults.first_table_title),
            second_table_title: raw
                .second_table_title
                .unwrap_or(defaults.second_table_title),
            note: raw.note.unwrap_or(defaults.note),
            first_table_columns: raw
                .first_table_columns
                .unwrap_or(defaults.first_table_columns),
            second_table_columns: raw
                .second_table_columns
                .unwrap_or(defaults.second_table_columns),
            second_table_key_set: raw
                .second_table_key_set
                .unwrap_or(defaults.second_table_key_set),
            first_table_headers: raw
                .first_table_headers
                .unwrap_or(defaults.first_table_headers),
            second_table_headers: raw
                .second_table_headers
                .unwrap_or(defaults.second_table_headers),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let toml_src = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&toml_src)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.first_table_columns.is_empty() {
            return Err(ConfigError::Invalid(
                "first_table_columns must not be empty".to_string(),
            ));
        }
        if self.second_table_columns.is_empty() {
            return Err(ConfigError::Invalid(
                "second_table_columns must not be empty".to_string(),
            ));
        }
        if self.video_extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::Invalid(
                "video_extension must not be empty".to_string(),
            ));
        }
        if let Some(count) = self.split_nc_count {
            let columns = self.second_table_columns.len();
            if count >= columns {
                return Err(ConfigError::Invalid(format!(
                    "split_nc_count {count} leaves no caption column in a {columns}-column table"
                )));
            }
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn first_table_spec(&self) -> TableSpec {
        TableSpec {
            columns: self.first_table_columns.clone(),
            headers: self.first_table_headers.clone(),
            class: self.table_class.clone(),
            caption_mode: CaptionMode::Merged,
        }
    }

    pub fn second_table_spec(&self) -> TableSpec {
        let caption_mode = match self.split_nc_count {
            Some(filler_cells) => CaptionMode::Split {
                filler_cells,
                filler: self.split_filler.clone(),
            },
            None => CaptionMode::Merged,
        };
        TableSpec {
            columns: self.second_table_columns.clone(),
            headers: self.second_table_headers.clone(),
            class: self.table_class.clone(),
            caption_mode,
        }
    }
}

fn column_ids(columns: &[(&str, &str)]) -> Vec<String> {
    columns.iter().map(|(id, _)| id.to_string()).collect()
}

fn header_labels(columns: &[(&str, &str)]) -> BTreeMap<String, String> {
    columns
        .iter()
        .map(|(id, label)| (id.to_string(), label.to_string()))
        .collect()
}
