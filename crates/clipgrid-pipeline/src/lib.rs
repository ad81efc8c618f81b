pub mod captions;
pub mod config;
pub mod grouping;
pub mod page;
pub mod pipeline;
pub mod render;

pub use crate::config::{ConfigError, GroupOrder, PageConfig};
pub use crate::pipeline::{
    build_page, collect_groups, run_pipeline, GroupedClips, PipelineError, PipelineReport,
};
