use crate::pipeline::PipelineError;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Caption text keyed by lookup key (group key without its trailing `_`).
pub type CaptionMap = BTreeMap<String, String>;

/// Parses `key,caption` lines. Only the first comma separates, so captions
/// may contain commas. Lines that do not yield a non-empty key and a
/// non-empty caption are skipped; a repeated key keeps the last caption.
pub fn parse_captions(src: &str) -> CaptionMap {
    let mut captions = CaptionMap::new();
    for (index, line) in src.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match split_caption_line(line) {
            Some((key, caption)) => {
                captions.insert(key.to_string(), caption.to_string());
            }
            None => {
                tracing::debug!(line = index + 1, "skipping malformed caption line");
            }
        }
    }
    captions
}

pub fn load_captions(path: &Path) -> Result<CaptionMap, PipelineError> {
    let src = fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let captions = parse_captions(&src);
    tracing::info!(
        path = %path.display(),
        captions = captions.len(),
        "loaded captions"
    );
    Ok(captions)
}

/// Caption key for a group key: `..._clip2_` looks up `..._clip2`.
pub fn lookup_key(group_key: &str) -> &str {
    group_key.trim_end_matches('_')
}

fn split_caption_line(line: &str) -> Option<(&str, &str)> {
    let (key, caption) = line.split_once(',')?;
    let key = key.trim();
    let caption = caption.trim();
    if key.is_empty() || caption.is_empty() {
        return None;
    }
    Some((key, caption))
}
