//! Browsable index pages.
//!
//! Listings are rendered as a fixed-width table inside `<pre>`, one row per entry:
//!
//! ```text
//! <a href="name.jar" title="name.jar">name.jar</a>        1970-01-01 00:00       100
//! |<------------ FILE_COL_WIDTH (label) ---------->|<-- date -->|GAP|<-- size -->|
//! ```
//!
//! Column padding is measured against the visible label, not the link markup, so rows
//! line up in a browser.

use crate::constants::{FILE_COL_WIDTH, GAP, SIZE_COL_WIDTH, TRUNCATION_MARKER};
use askama::Template;
use repo_types::DirectoryEntry;

#[derive(Template)]
#[template(
    source = "<a href=\"{{ name }}\" title=\"{{ name }}\">{{ label }}</a>{{ columns }}",
    ext = "html"
)]
struct RowTemplate<'a> {
    name: &'a str,
    label: &'a str,
    columns: String,
}

#[derive(Template)]
#[template(path = "listing.html")]
struct ListingTemplate<'a> {
    repository_name: &'a str,
    path: &'a str,
    /// Rows already rendered (and escaped) by [`render_row`].
    rows: String,
}

/// Renders one listing row.
///
/// Names longer than `FILE_COL_WIDTH - GAP` characters are shortened for display; the
/// link target and title always use the full name. Directories show `-` as their size.
pub fn render_row(entry: &DirectoryEntry) -> askama::Result<String> {
    let label = display_label(&entry.name);
    let padding = FILE_COL_WIDTH.saturating_sub(label.chars().count());
    let size = if entry.is_directory {
        "-".to_string()
    } else {
        entry.size.to_string()
    };

    RowTemplate {
        name: &entry.name,
        label: &label,
        columns: format!(
            "{pad}{date}{gap}{size:>width$}",
            pad = " ".repeat(padding),
            date = entry.last_modified.format("%Y-%m-%d %H:%M"),
            gap = " ".repeat(GAP),
            width = SIZE_COL_WIDTH - GAP,
        ),
    }
    .render()
}

/// Renders a full listing page for `path` (empty for the root).
///
/// Non-root pages start with a `../` link to the parent directory.
pub fn render_page(
    repository_name: &str,
    path: &str,
    entries: &[DirectoryEntry],
) -> askama::Result<String> {
    let rows = entries
        .iter()
        .map(render_row)
        .collect::<askama::Result<Vec<_>>>()?
        .join("\n");

    ListingTemplate {
        repository_name,
        path,
        rows,
    }
    .render()
}

fn display_label(name: &str) -> String {
    if name.chars().count() <= FILE_COL_WIDTH - GAP {
        return name.to_owned();
    }
    let keep = FILE_COL_WIDTH - GAP - TRUNCATION_MARKER.len();
    let mut label: String = name.chars().take(keep).collect();
    label.push_str(TRUNCATION_MARKER);
    label
}
