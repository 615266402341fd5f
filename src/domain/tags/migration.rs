//! Detection of leading hashtag-only lines
//!
//! Notes often start with a line such as `#idea #garden` before any prose. That
//! contiguous leading run is what gets migrated into frontmatter; hashtag-only
//! lines further down are ordinary content.

/// A line counts as tag-only when every whitespace-separated token starts with `#`.
fn is_tag_only_line(line: &str) -> bool {
    let mut tokens = line.split_whitespace().peekable();
    tokens.peek().is_some() && tokens.all(|token| token.starts_with('#'))
}

/// Index of the first line that is neither blank nor tag-only.
///
/// Returns the number of lines when the whole body is blank or tag-only.
pub fn find_boundary(body: &str) -> usize {
    let lines: Vec<&str> = body.split('\n').collect();
    lines
        .iter()
        .position(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !is_tag_only_line(trimmed)
        })
        .unwrap_or(lines.len())
}

/// Tags on the lines before `boundary`, in document order, marker stripped.
pub fn extract_leading_tags(body: &str, boundary: usize) -> Vec<String> {
    body.split('\n')
        .take(boundary)
        .flat_map(str::split_whitespace)
        .filter(|token| token.starts_with('#'))
        .map(|token| token.trim_start_matches('#').to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Drop the lines before `boundary`. Every such line is blank or tag-only, so
/// the blank lines interleaved with the leading tags go too; nothing at or after
/// the boundary is touched.
pub fn strip_leading_lines(body: &str, boundary: usize) -> String {
    body.split('\n')
        .skip(boundary)
        .collect::<Vec<_>>()
        .join("\n")
}
