use super::layout::calculate_history_chunks;
use super::{draw_header, draw_help, key_style, selected_style};
use crate::app::App;
use crate::history::{self, prompt_lines, unix_now, StoredRecord};
use crate::models::HistoryRecord;
use crate::utils::{format_history_date, truncate_string};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

fn result_span(record: &HistoryRecord) -> Span<'static> {
    match record {
        HistoryRecord::MultipleChoice { is_match: true, .. } => {
            Span::styled("correct", Style::default().fg(Color::Green))
        }
        HistoryRecord::MultipleChoice { .. } => {
            Span::styled("incorrect", Style::default().fg(Color::Red))
        }
        HistoryRecord::FreeResponse { score, .. } => {
            Span::styled(format!("score {}", score), Style::default().fg(Color::Cyan))
        }
    }
}

fn list_item(stored: &StoredRecord, now: u64, width: usize) -> ListItem<'static> {
    let record = &stored.record;
    let topic = history::topic(record.subject().as_str());
    let header = Line::from(vec![
        Span::styled(format!("{} ", record.kind()), key_style()),
        Span::from(truncate_string(&topic, width.saturating_sub(6))),
    ]);
    let meta = Line::from(vec![
        Span::styled(
            format!("{}  ", format_history_date(stored.created_at, now)),
            Style::default().fg(Color::DarkGray),
        ),
        result_span(record),
    ]);
    ListItem::new(vec![header, meta])
}

/// Detail pane for one attempt. Multiple-choice prompts get the correct option
/// highlighted and, when it differs, the chosen one.
fn detail_lines(record: &HistoryRecord) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled(record.subject().display_name(), selected_style())),
        Line::from(""),
    ];

    match record {
        HistoryRecord::MultipleChoice {
            prompt,
            chosen,
            correct,
            is_match,
            ..
        } => {
            let parsed = prompt_lines(prompt, Some(*correct));
            let chosen_index = if *is_match {
                None
            } else {
                parsed.chosen_index(*chosen)
            };
            for (i, text) in parsed.lines.iter().enumerate() {
                let style = if Some(i) == parsed.correct_index {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                } else if Some(i) == chosen_index {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(text.clone(), style)));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("Your answer: ", bold),
                Span::from(chosen.to_string()),
                Span::from("   "),
                Span::styled("Correct answer: ", bold),
                Span::from(correct.to_string()),
            ]));
        }
        HistoryRecord::FreeResponse {
            prompt,
            response,
            feedback,
            score,
            ..
        } => {
            lines.extend(prompt.lines().map(|l| Line::from(l.to_string())));
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("Your response:", bold)));
            lines.extend(response.lines().map(|l| Line::from(l.to_string())));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("Score: ", bold),
                Span::from(score.to_string()),
            ]));
            lines.push(Line::from(Span::styled("Feedback:", bold)));
            lines.extend(feedback.lines().map(|l| Line::from(l.to_string())));
        }
    }
    lines
}

pub fn draw_history(f: &mut Frame, app: &mut App) {
    let layout = calculate_history_chunks(f.area());
    draw_header(f, layout.header_area, "Study History");

    let view = &app.history_view;
    let filter = Line::from(vec![
        Span::styled("Subject: ", key_style()),
        Span::styled(format!("< {} >", view.filter()), selected_style()),
        Span::styled(
            format!("  ({} of {})", view.filter_index + 1, view.filters.len().max(1)),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(filter), layout.filter_area);

    let list_block = Block::default().borders(Borders::ALL).title("Attempts");
    let detail_block = Block::default().borders(Borders::ALL).title("Details");
    let visible = view.visible();

    let placeholder = if !app.auth.is_signed_in() {
        Some("Sign in from the home screen to keep a study history.".to_string())
    } else if let Some(error) = &view.error {
        Some(format!("Could not load history: {}", error))
    } else if visible.is_empty() {
        Some("No attempts yet. Answer a few questions to build your history.".to_string())
    } else {
        None
    };

    if let Some(message) = placeholder {
        let empty = Paragraph::new(Span::styled(
            message,
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))
        .wrap(Wrap { trim: true })
        .block(list_block);
        f.render_widget(empty, layout.list_area);
        f.render_widget(Paragraph::new("").block(detail_block), layout.detail_area);
    } else {
        let now = unix_now();
        let width = layout.list_area.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = visible
            .iter()
            .map(|stored| list_item(stored, now, width))
            .collect();
        let list = List::new(items)
            .block(list_block)
            .highlight_style(selected_style())
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(view.selected));
        f.render_stateful_widget(list, layout.list_area, &mut state);

        if let Some(stored) = visible.get(view.selected) {
            let detail = Paragraph::new(detail_lines(&stored.record))
                .wrap(Wrap { trim: true })
                .block(detail_block);
            f.render_widget(detail, layout.detail_area);
        }
    }

    draw_help(
        f,
        layout.help_area,
        &[("↑/↓", "Select"), ("Tab/←→", "Subject"), ("r", "Refresh"), ("Esc", "Back")],
        app.status.as_deref(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OptionLetter, Score, Subject};

    fn mcq(is_match: bool) -> HistoryRecord {
        HistoryRecord::MultipleChoice {
            subject: Subject::new("SAT Math: Algebra"),
            prompt: "Solve 2x = 6\nA) 2\nB) 3\nC) 4\nD) 6".to_string(),
            chosen: if is_match { OptionLetter::B } else { OptionLetter::D },
            correct: OptionLetter::B,
            is_match,
        }
    }

    #[test]
    fn test_detail_highlights_correct_and_chosen() {
        let lines = detail_lines(&mcq(false));
        let correct = lines.iter().find(|l| l.to_string() == "B) 3").unwrap();
        assert_eq!(correct.spans[0].style.fg, Some(Color::Green));
        let chosen = lines.iter().find(|l| l.to_string() == "D) 6").unwrap();
        assert_eq!(chosen.spans[0].style.fg, Some(Color::Red));
        assert!(lines
            .iter()
            .any(|l| l.to_string() == "Your answer: D   Correct answer: B"));
    }

    #[test]
    fn test_detail_free_response() {
        let record = HistoryRecord::FreeResponse {
            subject: Subject::new("AP World History"),
            prompt: "Explain the causes of WWI.".to_string(),
            response: "Alliances".to_string(),
            feedback: "Add evidence.".to_string(),
            score: Score::Number(4.0),
        };
        let text: Vec<String> = detail_lines(&record).iter().map(|l| l.to_string()).collect();
        assert!(text.contains(&"Alliances".to_string()));
        assert!(text.contains(&"Score: 4".to_string()));
        assert!(text.contains(&"Add evidence.".to_string()));
    }

    #[test]
    fn test_list_item_result() {
        assert_eq!(result_span(&mcq(true)).content, "correct");
        assert_eq!(result_span(&mcq(false)).content, "incorrect");
    }
}
