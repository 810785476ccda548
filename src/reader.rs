//! Plain-text pieces of the reader screen.
//!
//! Styling is the front end's business; these helpers only decide *what*
//! is shown: the page label, the paragraphs of a page, and the short
//! preview above the edit tools.

/// Shown by [`preview`] when the text has no lines.
pub const EMPTY_PREVIEW: &str = "<empty file>";

/// `"Page {index+1} of {total}"`.
pub fn page_label(index: usize, total: usize) -> String {
    format!("Page {} of {}", index + 1, total)
}

/// Split a page into paragraphs on blank-line boundaries (`"\n\n"`),
/// dropping paragraphs that are only whitespace.
pub fn paragraphs(page: &str) -> Vec<&str> {
    page.split("\n\n").filter(|p| !p.trim().is_empty()).collect()
}

/// The first `max_lines` lines of `text`, or [`EMPTY_PREVIEW`].
pub fn preview(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.lines().take(max_lines).collect();
    if lines.is_empty() {
        EMPTY_PREVIEW.to_string()
    } else {
        lines.join("\n")
    }
}

/// Render a page for a terminal: a header line, then paragraphs separated
/// by blank lines.
pub fn render_page(file_name: &str, index: usize, total: usize, page: &str) -> String {
    let mut out = format!("{} — {}\n\n", file_name, page_label(index, total));
    out.push_str(&paragraphs(page).join("\n\n"));
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
