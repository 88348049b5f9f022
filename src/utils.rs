use ratatui::text::Line;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

mod markdown;

pub use markdown::render_markdown;

/// Shortens `s` to at most `max_chars` characters, ending in "...".
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// One row of wrapped text: content and the char range it covers in the source.
#[derive(Debug, Clone, PartialEq)]
struct VisualLine {
    text: String,
    start: usize,
    end: usize,
}

/// Wraps `text` the way `Wrap { trim: true }` does for character-level breaks.
/// Positions are char indices.
fn wrap_lines(text: &str, max_width: usize) -> Vec<VisualLine> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut width = 0;
    let mut start = 0;
    let mut count = 0;

    for (idx, ch) in text.chars().enumerate() {
        count = idx + 1;
        if ch == '\n' {
            lines.push(VisualLine {
                text: current.trim_end().to_string(),
                start,
                end: idx,
            });
            current.clear();
            width = 0;
            start = idx + 1;
            continue;
        }

        let ch_width = ch.width().unwrap_or(1);
        if width + ch_width > max_width && width > 0 {
            lines.push(VisualLine {
                text: current.trim_end().to_string(),
                start,
                end: idx,
            });
            current = ch.to_string();
            width = ch_width;
            start = idx;
        } else {
            current.push(ch);
            width += ch_width;
        }
    }

    if !current.is_empty() || text.ends_with('\n') {
        lines.push(VisualLine {
            text: current.trim_end().to_string(),
            start,
            end: count,
        });
    }

    lines
}

/// (line, column) of the char-indexed `cursor` once `text` is wrapped to `max_width`.
pub fn calculate_wrapped_cursor_position(
    text: &str,
    cursor: usize,
    max_width: usize,
) -> (usize, usize) {
    if text.is_empty() || cursor == 0 {
        return (0, 0);
    }

    let lines = wrap_lines(text, max_width);
    if let Some((row, line)) = lines
        .iter()
        .enumerate()
        .find(|(_, l)| cursor >= l.start && cursor <= l.end)
    {
        return (row, cursor - line.start);
    }

    match lines.last() {
        Some(last) if cursor >= last.end => {
            (lines.len() - 1, last.text.chars().count())
        }
        _ => (0, 0),
    }
}

/// Rows `lines` occupy when wrapped to `width` columns.
pub fn estimate_text_height(lines: &[Line], width: usize) -> usize {
    let width = width.max(1);
    lines
        .iter()
        .map(|line| {
            let w: usize = line.spans.iter().map(|s| s.content.width()).sum();
            w.div_ceil(width).max(1)
        })
        .sum()
}

pub fn calculate_max_scroll(content_height: usize, visible_height: usize) -> u16 {
    content_height.saturating_sub(visible_height).min(u16::MAX as usize) as u16
}

/// Relative age of a history entry: "Just now", "5m ago", "3h ago", "2d ago", then the date.
pub fn format_history_date(timestamp: u64, now: u64) -> String {
    let elapsed = now.saturating_sub(timestamp);
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;

    if elapsed < MINUTE {
        "Just now".to_string()
    } else if elapsed < HOUR {
        format!("{}m ago", elapsed / MINUTE)
    } else if elapsed < DAY {
        format!("{}h ago", elapsed / HOUR)
    } else if elapsed < 7 * DAY {
        format!("{}d ago", elapsed / DAY)
    } else {
        use std::time::{Duration, UNIX_EPOCH};
        let datetime: chrono::DateTime<chrono::Local> =
            (UNIX_EPOCH + Duration::from_secs(timestamp)).into();
        datetime.format("%Y-%m-%d").to_string()
    }
}
