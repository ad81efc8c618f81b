use crate::pipeline::PipelineError;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;

/// Matches `<prefix>clip<digits>_<suffix>.<ext>`. The prefix is greedy, so
/// the last `clip<N>_` marker that still leaves a suffix becomes the key.
#[derive(Debug, Clone)]
pub struct ClipPattern {
    extension: String,
    regex: Regex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipName<'a> {
    pub group_key: &'a str,
    pub suffix: &'a str,
}

impl ClipPattern {
    pub fn new(extension: &str) -> Result<Self, regex::Error> {
        let extension = extension.trim_start_matches('.').to_string();
        let regex = Regex::new(&format!(
            r"^(.*clip\d+_)(.+)\.{}$",
            regex::escape(&extension)
        ))?;
        Ok(Self { extension, regex })
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn has_extension(&self, filename: &str) -> bool {
        filename
            .strip_suffix(self.extension.as_str())
            .is_some_and(|stem| stem.ends_with('.'))
    }

    pub fn parse<'a>(&self, filename: &'a str) -> Option<ClipName<'a>> {
        let captures = self.regex.captures(filename)?;
        let group_key = captures.get(1)?.as_str();
        let suffix = captures.get(2)?.as_str();
        Some(ClipName { group_key, suffix })
    }
}

/// All variants rendered for one source clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipGroup {
    pub key: String,
    /// suffix -> filename
    pub variants: BTreeMap<String, String>,
}

impl ClipGroup {
    pub fn filename(&self, suffix: &str) -> Option<&str> {
        self.variants.get(suffix).map(String::as_str)
    }
}

/// Groups in insertion order, indexed by group key.
#[derive(Debug, Clone, Default)]
pub struct ClipGroups {
    groups: Vec<ClipGroup>,
    index: HashMap<String, usize>,
}

impl ClipGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `filename` under (`key`, `suffix`). An existing filename for
    /// the same pair is replaced.
    pub fn insert(&mut self, key: &str, suffix: &str, filename: &str) {
        let slot = match self.index.get(key) {
            Some(slot) => *slot,
            None => {
                self.groups.push(ClipGroup {
                    key: key.to_string(),
                    variants: BTreeMap::new(),
                });
                let slot = self.groups.len() - 1;
                self.index.insert(key.to_string(), slot);
                slot
            }
        };
        self.groups[slot]
            .variants
            .insert(suffix.to_string(), filename.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&ClipGroup> {
        self.index.get(key).map(|slot| &self.groups[*slot])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClipGroup> {
        self.groups.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.key.as_str())
    }

    pub fn sort(&mut self) {
        self.groups.sort_by(|a, b| a.key.cmp(&b.key));
        self.reindex();
    }

    fn push(&mut self, group: ClipGroup) {
        self.index.insert(group.key.clone(), self.groups.len());
        self.groups.push(group);
    }

    fn reindex(&mut self) {
        self.index = self
            .groups
            .iter()
            .enumerate()
            .map(|(slot, group)| (group.key.clone(), slot))
            .collect();
    }
}

impl IntoIterator for ClipGroups {
    type Item = ClipGroup;
    type IntoIter = std::vec::IntoIter<ClipGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

#[derive(Debug)]
pub struct ScanResult {
    pub groups: ClipGroups,
    /// Directory entries listed.
    pub entries: usize,
    /// Entries with the video extension that matched the clip pattern.
    pub matched: usize,
    /// Entries with the video extension (or an unreadable name) that did not.
    pub skipped: usize,
}

/// Lists `dir` and groups every matching video filename. Entries are taken
/// in listing order; nothing is sorted here.
pub fn scan_directory(dir: &Path, pattern: &ClipPattern) -> Result<ScanResult, PipelineError> {
    let io_err = |source| PipelineError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut groups = ClipGroups::new();
    let mut entries = 0;
    let mut matched = 0;
    let mut skipped = 0;

    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        entries += 1;
        let Ok(filename) = entry.file_name().into_string() else {
            tracing::debug!(name = ?entry.file_name(), "skipping non-UTF-8 filename");
            skipped += 1;
            continue;
        };
        if !pattern.has_extension(&filename) {
            continue;
        }
        match pattern.parse(&filename) {
            Some(name) => {
                groups.insert(name.group_key, name.suffix, &filename);
                matched += 1;
            }
            None => {
                tracing::debug!(%filename, "skipping video without a clip marker");
                skipped += 1;
            }
        }
    }

    tracing::info!(
        dir = %dir.display(),
        entries,
        matched,
        skipped,
        groups = groups.len(),
        "scanned video directory"
    );
    Ok(ScanResult {
        groups,
        entries,
        matched,
        skipped,
    })
}

/// The two row sets of the page.
#[derive(Debug, Default)]
pub struct Partition {
    /// Groups outside the key set (baseline comparison table).
    pub first: ClipGroups,
    /// Groups whose key is in the key set (extractor ablation table).
    pub second: ClipGroups,
}

/// Splits `groups` by exact key membership. Relative order is kept in both
/// halves.
pub fn partition(groups: ClipGroups, second_keys: &BTreeSet<String>) -> Partition {
    let mut split = Partition::default();
    for group in groups {
        if second_keys.contains(&group.key) {
            split.second.push(group);
        } else {
            split.first.push(group);
        }
    }
    split
}
