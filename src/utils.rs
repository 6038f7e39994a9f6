use unicode_width::UnicodeWidthChar;

pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}

/// Format a second count as MM:SS for the countdown header.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Display column of a byte-indexed cursor in a single-line input, accounting
/// for wide characters.
pub fn input_cursor_column(text: &str, cursor_index: usize) -> u16 {
    text[..cursor_index.min(text.len())]
        .chars()
        .map(|c| c.width().unwrap_or(1) as u16)
        .sum()
}
