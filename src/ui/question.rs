use super::layout::calculate_question_chunks;
use super::{draw_header, draw_help, failure_lines, key_style, loading_line, spinner_frame};
use crate::answer_key::split_options;
use crate::app::{App, TextInput};
use crate::controller::{QuestionContent, SessionState};
use crate::models::{OptionLetter, QuestionType};
use crate::utils::{
    calculate_max_scroll, calculate_wrapped_cursor_position, estimate_text_height,
    render_markdown,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn header_title(state: &SessionState, question_type: QuestionType) -> String {
    match &state.active_subject {
        Some(subject) => format!("{} - {}", subject.display_name(), question_type.label()),
        None => question_type.label().to_string(),
    }
}

/// Prompt area content shared by both question screens.
fn prompt_text(state: &SessionState, tick: usize, prompt: &str) -> Vec<Line<'static>> {
    match &state.question {
        _ if state.loading => vec![loading_line(tick, "question")],
        QuestionContent::Failed(message) => failure_lines(message),
        QuestionContent::Ready(_) => render_markdown(prompt),
        QuestionContent::Empty => Vec::new(),
    }
}

fn option_line(state: &SessionState, letter: OptionLetter, body: &str) -> Line<'static> {
    let selected = state.selected_answer == Some(letter);
    let (marker, style) = if state.show_feedback {
        if state.correct_answer == Some(letter) {
            ("✓", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        } else if selected {
            ("✗", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        } else {
            (" ", Style::default().fg(Color::DarkGray))
        }
    } else if selected {
        (">", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    } else {
        (" ", Style::default())
    };

    Line::from(vec![
        Span::styled(format!("{} {}) ", marker, letter), style),
        Span::styled(body.to_string(), style),
    ])
}

/// Bordered multi-line editor that keeps the cursor row in view.
fn draw_editor(
    f: &mut Frame,
    area: Rect,
    input: &mut TextInput,
    title: &str,
    placeholder: &str,
    focused: bool,
) {
    let visible_height = area.height.saturating_sub(2) as usize;
    let text_width = area.width.saturating_sub(2) as usize;
    let (cursor_line, cursor_col) =
        calculate_wrapped_cursor_position(&input.buffer, input.cursor, text_width);

    let mut scroll = input.scroll_y as usize;
    if cursor_line < scroll {
        scroll = cursor_line;
    } else if visible_height > 0 && cursor_line >= scroll + visible_height {
        scroll = cursor_line + 1 - visible_height;
    }
    input.scroll_y = scroll as u16;

    let content = if input.buffer.is_empty() {
        Text::from(Span::styled(
            placeholder.to_string(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(input.buffer.clone())
    };
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let editor = Paragraph::new(content)
        .wrap(Wrap { trim: true })
        .scroll((input.scroll_y, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(title.to_string()),
        );
    f.render_widget(editor, area);

    if focused {
        let cursor_x = area.x + 1 + cursor_col as u16;
        let cursor_y = area.y + 1 + (cursor_line as u16).saturating_sub(input.scroll_y);
        f.set_cursor_position((cursor_x, cursor_y));
    }
}

/// Question pane, with the notepad beside it while it is open.
fn question_and_notes(f: &mut Frame, area: Rect, app: &mut App) -> Rect {
    if !app.notes_open {
        return area;
    }
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);
    draw_editor(
        f,
        columns[1],
        &mut app.notes,
        "Notes",
        "Scratch work, cleared with each new question",
        true,
    );
    columns[0]
}

pub fn draw_multiple_choice(f: &mut Frame, app: &mut App) {
    let layout = calculate_question_chunks(f.area());
    let question_area = question_and_notes(f, layout.question_area, app);
    let state = app.controller.state();
    draw_header(
        f,
        layout.header_area,
        &header_title(state, QuestionType::MultipleChoice),
    );

    let parsed = split_options(state.question.text().unwrap_or_default());
    let question = Paragraph::new(prompt_text(state, app.spinner_tick, &parsed.prompt))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question, question_area);

    let mut answers: Vec<Line> = parsed
        .options
        .iter()
        .map(|(letter, body)| option_line(state, *letter, body))
        .collect();

    if state.show_feedback
        && let (Some(chosen), Some(correct)) = (state.selected_answer, state.correct_answer)
    {
        answers.push(Line::from(""));
        answers.push(if chosen == correct {
            Line::from(Span::styled(
                "Correct!",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ))
        } else {
            Line::from(Span::styled(
                format!("Incorrect. The answer is {}.", correct),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
        });
    }

    let answer = Paragraph::new(answers)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Options"));
    f.render_widget(answer, layout.answer_area);

    let keys: &[(&str, &str)] = if app.notes_open {
        &[("Tab", "Back to question"), ("Esc", "Close notes")]
    } else if state.show_feedback || state.question.is_failed() {
        &[("n", "New question"), ("Tab", "Notes"), ("Esc", "Back")]
    } else {
        &[("A-D/↑↓", "Select"), ("Enter", "Submit"), ("Tab", "Notes"), ("Esc", "Back")]
    };
    draw_help(f, layout.help_area, keys, app.status.as_deref());
}

fn feedback_text(state: &SessionState, tick: usize) -> Text<'static> {
    let mut text = Text::default();

    if state.evaluating {
        text.push_line(Line::from(vec![
            Span::styled(format!("{} ", spinner_frame(tick)), key_style()),
            Span::from("Evaluating your response..."),
        ]));
        return text;
    }

    let Some(feedback) = &state.feedback else {
        return text;
    };

    text.push_line(Line::from(vec![
        Span::styled(
            "Projected Score: ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} of {}", feedback.score, feedback.max_score),
            Style::default().fg(if feedback.is_fallback() {
                Color::Red
            } else {
                Color::Green
            }),
        ),
    ]));
    if !feedback.score_explanation.is_empty() {
        text.push_line(Line::from(feedback.score_explanation.clone()));
    }
    text.push_line(Line::from(""));
    text.push_line(Line::from(Span::styled(
        "Feedback:",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    text.extend(render_markdown(&feedback.feedback));
    text
}

pub fn draw_free_response(f: &mut Frame, app: &mut App) {
    let layout = calculate_question_chunks(f.area());
    let question_area = question_and_notes(f, layout.question_area, app);
    let state = app.controller.state();
    draw_header(
        f,
        layout.header_area,
        &header_title(state, QuestionType::FreeResponse),
    );

    let prompt = state.question.text().unwrap_or_default();
    let question = Paragraph::new(prompt_text(state, app.spinner_tick, prompt))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Prompt"));
    f.render_widget(question, question_area);

    let visible_height = layout.answer_area.height.saturating_sub(2) as usize;
    let text_width = layout.answer_area.width.saturating_sub(2) as usize;
    let showing_feedback = state.show_feedback || state.evaluating;

    if showing_feedback {
        let content = feedback_text(state, app.spinner_tick);
        let content_height = estimate_text_height(&content.lines, text_width);
        let max_scroll = calculate_max_scroll(content_height, visible_height);
        app.scroll_y = app.scroll_y.min(max_scroll);

        let answer = Paragraph::new(content)
            .wrap(Wrap { trim: true })
            .scroll((app.scroll_y, 0))
            .block(Block::default().borders(Borders::ALL).title("Evaluation"));
        f.render_widget(answer, layout.answer_area);
    } else if state.question.text().is_some() {
        let focused = !app.notes_open;
        draw_editor(
            f,
            layout.answer_area,
            &mut app.answer_input,
            "Your Response",
            "Type your response here...",
            focused,
        );
    } else {
        let empty = Paragraph::new("")
            .block(Block::default().borders(Borders::ALL).title("Your Response"));
        f.render_widget(empty, layout.answer_area);
    }

    let state = app.controller.state();
    let keys: &[(&str, &str)] = if app.notes_open {
        &[("Tab", "Back to response"), ("Esc", "Close notes")]
    } else if state.show_feedback {
        &[("↑/↓", "Scroll"), ("n", "New question"), ("Tab", "Notes"), ("Esc", "Back")]
    } else if state.question.is_failed() {
        &[("n", "Try again"), ("Esc", "Back")]
    } else {
        &[
            ("Ctrl+S", "Submit"),
            ("Enter", "New line"),
            ("Ctrl+N", "New question"),
            ("Tab", "Notes"),
            ("Esc", "Back"),
        ]
    };
    draw_help(f, layout.help_area, keys, app.status.as_deref());
}
