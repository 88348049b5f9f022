use lazy_static::lazy_static;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use regex::Regex;

lazy_static! {
    static ref NUMBERED_RE: Regex = Regex::new(r"^(\d+)[.)]\s+(.*)$").unwrap();
    static ref HEADING_RE: Regex = Regex::new(r"^(#{1,6})\s+(.*)$").unwrap();
    // **bold**, *italic*, `code`, $$math$$, $math$, \(math\), \[math\]
    static ref INLINE_RE: Regex = Regex::new(
        r"\*\*(?P<bold>.+?)\*\*|\*(?P<italic>[^*\s][^*]*?)\*|`(?P<code>[^`]+)`|\$\$(?P<dmath>.+?)\$\$|\$(?P<math>[^$\s][^$]*?)\$|\\\((?P<pmath>.+?)\\\)|\\\[(?P<bmath>.+?)\\\]"
    )
    .unwrap();
}

fn math_style() -> Style {
    Style::default().fg(Color::Magenta)
}

fn heading_style(level: usize) -> Style {
    let base = Style::default().add_modifier(Modifier::BOLD);
    match level {
        1 => base.fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
        2 => base.fg(Color::Cyan),
        _ => base,
    }
}

/// Renders a study guide for the terminal.
/// Supports headings, bullet and numbered lists, block quotes, fenced code,
/// pipe tables and inline bold/italic/code. TeX is shown as source, highlighted.
pub fn render_markdown(content: &str) -> Vec<Line<'static>> {
    let lines: Vec<&str> = content.lines().collect();
    let mut result: Vec<Line<'static>> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            i += 1;
            while i < lines.len() && !lines[i].trim().starts_with("```") {
                result.push(Line::from(Span::styled(
                    format!("    {}", lines[i]),
                    Style::default().add_modifier(Modifier::DIM),
                )));
                i += 1;
            }
            i += 1; // closing fence
            continue;
        }

        if trimmed == "$$" || trimmed == "\\[" {
            let close = if trimmed == "$$" { "$$" } else { "\\]" };
            i += 1;
            while i < lines.len() && lines[i].trim() != close {
                result.push(Line::from(Span::styled(
                    format!("    {}", lines[i].trim()),
                    math_style(),
                )));
                i += 1;
            }
            i += 1;
            continue;
        }

        if is_table_row(line) && i + 1 < lines.len() && is_table_separator(lines[i + 1]) {
            let mut rows = vec![parse_table_row(line)];
            i += 2;
            while i < lines.len() && is_table_row(lines[i]) && !is_table_separator(lines[i]) {
                rows.push(parse_table_row(lines[i]));
                i += 1;
            }
            render_table(&rows, &mut result);
            continue;
        }

        if let Some(caps) = HEADING_RE.captures(trimmed) {
            let level = caps[1].len();
            result.push(Line::from(Span::styled(
                caps[2].trim_end_matches('#').trim().to_string(),
                heading_style(level),
            )));
        } else if trimmed == "---" || trimmed == "***" {
            result.push(Line::from(Span::styled(
                "─".repeat(40),
                Style::default().fg(Color::DarkGray),
            )));
        } else if let Some(quote) = trimmed.strip_prefix("> ").or(trimmed.strip_prefix('>')) {
            let mut spans = vec![Span::styled("│ ", Style::default().fg(Color::DarkGray))];
            spans.extend(parse_inline(quote));
            result.push(Line::from(spans));
        } else if let Some(item) = trimmed
            .strip_prefix("- ")
            .or(trimmed.strip_prefix("* "))
            .or(trimmed.strip_prefix("+ "))
        {
            let indent = " ".repeat(2 + (line.len() - line.trim_start().len()));
            let mut spans = vec![Span::from(format!("{}• ", indent))];
            spans.extend(parse_inline(item));
            result.push(Line::from(spans));
        } else if let Some(caps) = NUMBERED_RE.captures(trimmed) {
            let mut spans = vec![Span::from(format!("  {}. ", &caps[1]))];
            spans.extend(parse_inline(&caps[2]));
            result.push(Line::from(spans));
        } else if trimmed.is_empty() {
            result.push(Line::from(""));
        } else {
            result.push(Line::from(parse_inline(line)));
        }
        i += 1;
    }

    result
}

fn parse_inline(text: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in INLINE_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            spans.push(Span::from(text[last..whole.start()].to_string()));
        }

        let span = if let Some(m) = caps.name("bold") {
            Span::styled(m.as_str().to_string(), Style::default().add_modifier(Modifier::BOLD))
        } else if let Some(m) = caps.name("italic") {
            Span::styled(m.as_str().to_string(), Style::default().add_modifier(Modifier::ITALIC))
        } else if let Some(m) = caps.name("code") {
            Span::styled(m.as_str().to_string(), Style::default().add_modifier(Modifier::DIM))
        } else if let Some(m) = caps
            .name("dmath")
            .or(caps.name("math"))
            .or(caps.name("pmath"))
            .or(caps.name("bmath"))
        {
            Span::styled(m.as_str().trim().to_string(), math_style())
        } else {
            Span::from(whole.as_str().to_string())
        };
        spans.push(span);
        last = whole.end();
    }

    if last < text.len() {
        spans.push(Span::from(text[last..].to_string()));
    }
    if spans.is_empty() {
        spans.push(Span::from(text.to_string()));
    }

    spans
}

fn is_table_row(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.contains('|')
}

fn is_table_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.contains('|')
        && trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

fn parse_table_row(line: &str) -> Vec<String> {
    line.trim()
        .trim_matches('|')
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// Each data row becomes a block of "Header: value" lines, which wraps better than columns.
fn render_table(rows: &[Vec<String>], output: &mut Vec<Line<'static>>) {
    let Some((headers, data)) = rows.split_first() else {
        return;
    };

    if data.is_empty() {
        output.push(Line::from(Span::styled(
            headers.join(" │ "),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        return;
    }

    for (row_idx, row) in data.iter().enumerate() {
        if row_idx > 0 {
            output.push(Line::from(""));
        }
        for (j, cell) in row.iter().enumerate() {
            let header = headers.get(j).map(String::as_str).unwrap_or("?");
            let mut spans = vec![Span::styled(
                format!("{}: ", header),
                Style::default().add_modifier(Modifier::BOLD),
            )];
            spans.extend(parse_inline(cell));
            output.push(Line::from(spans));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_plain_text() {
        let result = render_markdown("Hello world");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].to_string(), "Hello world");
    }

    #[test]
    fn test_headings_strip_hashes() {
        let result = render_markdown("# Unit 1: Limits\n### Key Ideas ###");
        assert_eq!(result[0].spans[0].content, "Unit 1: Limits");
        assert!(result[0].spans[0].style.add_modifier.intersects(Modifier::UNDERLINED));
        assert_eq!(result[1].spans[0].content, "Key Ideas");
        assert!(result[1].spans[0].style.add_modifier.intersects(Modifier::BOLD));
    }

    #[test]
    fn test_inline_styles() {
        let result = render_markdown("Hello **bold** and *italic* with `code`");
        let spans = &result[0].spans;
        assert_eq!(spans[0].content, "Hello ");
        assert_eq!(spans[1].content, "bold");
        assert!(spans[1].style.add_modifier.intersects(Modifier::BOLD));
        assert_eq!(spans[3].content, "italic");
        assert!(spans[3].style.add_modifier.intersects(Modifier::ITALIC));
        assert_eq!(spans[5].content, "code");
    }

    #[test]
    fn test_inline_math_is_highlighted() {
        let result = render_markdown(r"Area is $\pi r^2$ and \(e^x\) grows.");
        let spans = &result[0].spans;
        assert_eq!(spans[1].content, r"\pi r^2");
        assert_eq!(spans[1].style.fg, Some(Color::Magenta));
        assert_eq!(spans[3].content, "e^x");
    }

    #[test]
    fn test_dollar_amounts_are_not_math() {
        let result = render_markdown("It costs $ 5 or $ 6");
        assert_eq!(result[0].spans.len(), 1);
    }

    #[test]
    fn test_display_math_block() {
        let result = render_markdown("Formula:\n$$\n\\int_0^1 x\\,dx\n$$\nDone");
        assert_eq!(result.len(), 3);
        assert_eq!(result[1].to_string(), "    \\int_0^1 x\\,dx");
        assert_eq!(result[2].to_string(), "Done");
    }

    #[test]
    fn test_code_fence() {
        let result = render_markdown("```python\nprint('hi')\n```\nafter");
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].to_string(), "    print('hi')");
    }

    #[test]
    fn test_lists() {
        let result = render_markdown("- Item 1\n  * Nested\n1. First\n2) Second");
        assert_eq!(result.len(), 4);
        assert!(result[0].to_string().starts_with("  • Item 1"));
        assert!(result[1].to_string().starts_with("    • Nested"));
        assert!(result[2].to_string().contains("1. First"));
        assert!(result[3].to_string().contains("2. Second"));
    }

    #[test]
    fn test_block_quote_and_rule() {
        let result = render_markdown("> Remember this\n---");
        assert_eq!(result[0].to_string(), "│ Remember this");
        assert!(result[1].to_string().starts_with("──"));
    }

    #[test]
    fn test_table() {
        let input = "Before\n\n| Term | Meaning |\n|---|:---:|\n| Mitosis | Division |\n\nAfter";
        let combined = joined(&render_markdown(input));
        assert!(combined.contains("Term: Mitosis"));
        assert!(combined.contains("Meaning: Division"));
        assert!(combined.contains("Before"));
        assert!(combined.contains("After"));
    }

    #[test]
    fn test_table_detection() {
        assert!(is_table_row("| A | B |"));
        assert!(!is_table_row("no pipes here"));
        assert!(is_table_separator("| --- | :---: |"));
        assert!(!is_table_separator("| A | B |"));
        assert_eq!(parse_table_row("| Hello | World |"), vec!["Hello", "World"]);
    }

    #[test]
    fn test_empty_lines_preserved() {
        let result = render_markdown("Line 1\n\nLine 2");
        assert_eq!(result.len(), 3);
        assert_eq!(result[1].to_string(), "");
    }
}
