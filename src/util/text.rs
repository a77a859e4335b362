// src/util/text.rs

/// Single-line preview of note content, cut to `width` characters.
///
/// Content is plain text and is shown as typed: the preview is its first
/// non-empty line, trimmed. Truncated previews end in `…` and stay within
/// `width`.
///
/// # Examples
///
/// ```
/// use notekeep::util::text::preview;
///
/// assert_eq!(preview("\n  Buy milk\nand eggs", 20), "Buy milk");
/// ```
pub fn preview(content: &str, width: usize) -> String {
    let line = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("");
    if line.chars().count() <= width {
        return line.to_string();
    }
    let mut cut: String = line.chars().take(width.saturating_sub(1)).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}
