use crate::captions::{lookup_key, CaptionMap};
use crate::grouping::{ClipGroup, ClipGroups};
use std::collections::BTreeMap;

const VIDEO_WIDTH: u32 = 320;
const VIDEO_FALLBACK: &str = "Your browser does not support the video tag.";

/// How the caption row under each media row is laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionMode {
    /// One cell spanning every column.
    Merged,
    /// Caption spans all but the last `filler_cells` columns, which each get
    /// `filler` verbatim.
    Split { filler_cells: usize, filler: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    /// Suffix ids in display order.
    pub columns: Vec<String>,
    /// Suffix id -> header label. Missing ids are shown raw.
    pub headers: BTreeMap<String, String>,
    pub class: Option<String>,
    pub caption_mode: CaptionMode,
}

impl TableSpec {
    pub fn header_label<'a>(&'a self, column: &'a str) -> &'a str {
        self.headers
            .get(column)
            .map(String::as_str)
            .unwrap_or(column)
    }
}

/// Renders one comparison table: a header row, then a media row and a
/// caption row per group, in the order of `groups`.
pub fn render_table(
    groups: &ClipGroups,
    spec: &TableSpec,
    captions: &CaptionMap,
    media_prefix: &str,
) -> String {
    let mut out = String::new();
    match &spec.class {
        Some(class) => out.push_str(&format!("<table class=\"{}\">\n", escape_html(class))),
        None => out.push_str("<table>\n"),
    }
    out.push_str("  <thead>\n");
    out.push_str("    <tr>\n");
    for column in &spec.columns {
        out.push_str(&format!(
            "      <th>{}</th>\n",
            escape_html(spec.header_label(column))
        ));
    }
    out.push_str("    </tr>\n");
    out.push_str("  </thead>\n");
    out.push_str("  <tbody>\n");
    for group in groups.iter() {
        render_media_row(&mut out, group, spec, media_prefix);
        let caption = captions
            .get(lookup_key(&group.key))
            .map(String::as_str)
            .unwrap_or("");
        render_caption_row(&mut out, caption, spec);
    }
    out.push_str("  </tbody>\n");
    out.push_str("</table>\n");
    out
}

/// Relative `src` for a video file, `<prefix>/<filename>`.
pub fn media_path(media_prefix: &str, filename: &str) -> String {
    let prefix = media_prefix.trim_end_matches('/');
    if prefix.is_empty() {
        filename.to_string()
    } else {
        format!("{prefix}/{filename}")
    }
}

fn render_media_row(out: &mut String, group: &ClipGroup, spec: &TableSpec, media_prefix: &str) {
    out.push_str("    <tr>\n");
    for column in &spec.columns {
        match group.filename(column) {
            Some(filename) => {
                let src = escape_html(&media_path(media_prefix, filename));
                out.push_str("      <td>\n");
                out.push_str(&format!("        <video width=\"{VIDEO_WIDTH}\" controls>\n"));
                out.push_str(&format!("          <source src=\"{src}\" type=\"video/mp4\">\n"));
                out.push_str(&format!("          {VIDEO_FALLBACK}\n"));
                out.push_str("        </video>\n");
                out.push_str("      </td>\n");
            }
            None => out.push_str("      <td></td>\n"),
        }
    }
    out.push_str("    </tr>\n");
}

fn render_caption_row(out: &mut String, caption: &str, spec: &TableSpec) {
    let columns = spec.columns.len();
    let caption = escape_html(caption);
    out.push_str("    <tr class=\"caption\">\n");
    match &spec.caption_mode {
        CaptionMode::Merged => {
            out.push_str(&format!("      <td colspan=\"{columns}\">{caption}</td>\n"));
        }
        CaptionMode::Split {
            filler_cells,
            filler,
        } => {
            let span = columns.saturating_sub(*filler_cells).max(1);
            let filler = escape_html(filler);
            out.push_str(&format!("      <td colspan=\"{span}\">{caption}</td>\n"));
            for _ in 0..*filler_cells {
                out.push_str(&format!("      <td>{filler}</td>\n"));
            }
        }
    }
    out.push_str("    </tr>\n");
}

/// Escapes text for use in element content and double-quoted attributes.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
