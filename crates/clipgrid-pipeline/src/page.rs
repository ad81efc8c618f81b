use crate::pipeline::PipelineError;
use crate::render::escape_html;
use std::fs;
use std::path::Path;

const PAGE_CSS: &str = r#"
    table {
      width: 100%;
      border-collapse: collapse;
      margin-bottom: 2rem;
    }
    th, td {
      padding: 0.5rem;
      border: 1px solid #ccc;
      text-align: center;
    }
    tr.caption td {
      font-style: italic;
      color: #444;
    }
    video {
      max-width: 100%;
      height: auto;
    }
    body {
      font-family: Arial, sans-serif;
      margin: 2rem;
    }
    h1 {
      color: #333;
    }
    p.note {
      font-style: italic;
      color: #555;
    }
"#;

/// Text and pre-rendered tables for one page. Titles and the note are plain
/// text; the tables are trusted HTML fragments.
#[derive(Debug, Clone)]
pub struct PageContent<'a> {
    pub page_title: &'a str,
    pub first_table_title: &'a str,
    pub first_table: &'a str,
    pub second_table_title: &'a str,
    pub second_table: &'a str,
    pub note: &'a str,
}

/// Builds the full document. Fragments are inserted as-is, so braces or any
/// other template-looking text inside them is never interpreted.
pub fn render_page(content: &PageContent<'_>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0"/>
  <title>{title}</title>
  <style>{css}  </style>
</head>
<body>
  <h1>{first_title}</h1>
{first_table}
  <h1>{second_title}</h1>
{second_table}
  <p class="note">{note}</p>
</body>
</html>
"#,
        title = escape_html(content.page_title),
        css = PAGE_CSS,
        first_title = escape_html(content.first_table_title),
        first_table = content.first_table,
        second_title = escape_html(content.second_table_title),
        second_table = content.second_table,
        note = escape_html(content.note),
    )
}

/// Writes the page, replacing any existing file.
pub fn write_page(path: &Path, html: &str) -> Result<(), PipelineError> {
    let io_err = |source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, html).map_err(io_err)?;
    tracing::info!(path = %path.display(), bytes = html.len(), "wrote page");
    Ok(())
}
