use super::layout::{calculate_screen_chunks, centered_rect};
use super::{draw_header, draw_help, key_style, selected_style};
use crate::app::{App, LANDING_ITEMS, TYPE_ITEMS};
use crate::catalog;
use crate::models::{ExamTrack, QuestionType};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

fn menu_list<'a>(items: impl IntoIterator<Item = String>, selected: usize, title: &'a str) -> List<'a> {
    let items: Vec<ListItem> = items
        .into_iter()
        .enumerate()
        .map(|(i, label)| {
            if i == selected {
                ListItem::new(format!("> {}", label)).style(selected_style())
            } else {
                ListItem::new(format!("  {}", label))
            }
        })
        .collect();

    List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title),
    )
}

pub fn draw_landing(f: &mut Frame, app: &App) {
    let layout = calculate_screen_chunks(f.area());
    draw_header(f, layout.header_area, "Study Session");

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(layout.body_area);

    let account = match app.auth.current_user() {
        Some(user) => Line::from(vec![
            Span::from("Signed in as "),
            Span::styled(user.display_name, selected_style()),
        ]),
        None => Line::from(Span::styled(
            "Not signed in, history will not be saved",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    };
    let intro = Paragraph::new(vec![
        Line::from("Unlimited AP, SAT and ACT practice questions with instant feedback."),
        account,
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(intro, body[0]);

    let menu_area = centered_rect(body[1], 40, LANDING_ITEMS.len() as u16 + 2);
    let list = menu_list(
        LANDING_ITEMS.iter().map(|s| s.to_string()),
        app.landing_index,
        "Menu",
    );
    f.render_widget(list, menu_area);

    let sign_label = if app.auth.is_signed_in() {
        "Sign out"
    } else {
        "Sign in"
    };
    draw_help(
        f,
        layout.help_area,
        &[("↑/↓", "Navigate"), ("Enter", "Select"), ("s", sign_label), ("q", "Quit")],
        app.status.as_deref(),
    );
}

pub fn draw_about(f: &mut Frame) {
    let layout = calculate_screen_chunks(f.area());
    draw_header(f, layout.header_area, "About");

    let text = vec![
        Line::from(Span::styled(
            "An AI study companion",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(
            "Generates practice questions for AP, SAT and ACT sections or any topic you name, \
             grades free responses with a projected score, and writes study guides on demand.",
        ),
        Line::from(""),
        Line::from(
            "Questions and feedback come from the study service configured with STUDY_API_BASE. \
             Completed attempts are kept in a local history when you are signed in.",
        ),
    ];
    let about = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(about, layout.body_area);

    draw_help(f, layout.help_area, &[("Esc", "Back")], None);
}

pub fn draw_mode_select(f: &mut Frame, app: &App) {
    let layout = calculate_screen_chunks(f.area());
    draw_header(f, layout.header_area, "Choose a Mode");

    let list = menu_list(
        ExamTrack::ALL.iter().map(|t| t.label().to_string()),
        app.mode_index,
        "Modes",
    );
    let area = centered_rect(layout.body_area, 40, ExamTrack::ALL.len() as u16 + 2);
    f.render_widget(list, area);

    draw_help(
        f,
        layout.help_area,
        &[("↑/↓", "Navigate"), ("Enter", "Select"), ("h", "History"), ("Esc", "Back")],
        app.status.as_deref(),
    );
}

pub fn draw_subject_select(f: &mut Frame, app: &App, track: ExamTrack) {
    let layout = calculate_screen_chunks(f.area());
    draw_header(f, layout.header_area, track.label());

    if track == ExamTrack::StudyAnything {
        draw_study_anything(f, app, layout.body_area);
        draw_help(
            f,
            layout.help_area,
            &[("Enter", "Start"), ("Tab", "Toggle type"), ("Ctrl+G", "Study guide"), ("Esc", "Back")],
            app.status.as_deref(),
        );
        return;
    }

    let title = match track {
        ExamTrack::Ap => "Subjects",
        _ => "Sections",
    };
    let list = menu_list(
        catalog::entries(track).iter().map(|s| s.to_string()),
        app.subject_index,
        title,
    );
    f.render_widget(list, layout.body_area);

    let keys: &[(&str, &str)] = if track.has_type_select() {
        &[("↑/↓", "Navigate"), ("Enter", "Select"), ("h", "History"), ("Esc", "Back")]
    } else {
        &[
            ("↑/↓", "Navigate"),
            ("Enter", "Practice"),
            ("g", "Study guide"),
            ("h", "History"),
            ("Esc", "Back"),
        ]
    };
    draw_help(f, layout.help_area, keys, app.status.as_deref());
}

fn draw_study_anything(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let input = &app.custom_subject;
    let text = if input.buffer.is_empty() {
        Span::styled(
            "e.g. Organic chemistry, World War I, Spanish verbs",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::from(input.buffer.clone())
    };
    let subject = Paragraph::new(Line::from(text)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title("What do you want to study?"),
    );
    f.render_widget(subject, chunks[0]);

    let cursor_x = chunks[0].x + 1 + input.cursor.min(chunks[0].width.saturating_sub(3) as usize) as u16;
    f.set_cursor_position((cursor_x, chunks[0].y + 1));

    let types: Vec<Span> = [QuestionType::MultipleChoice, QuestionType::FreeResponse]
        .iter()
        .flat_map(|t| {
            let style = if *t == app.custom_type {
                selected_style()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            [Span::styled(format!(" [{}] ", t.label()), style), Span::from(" ")]
        })
        .collect();
    let toggle = Paragraph::new(Line::from(types))
        .block(Block::default().borders(Borders::ALL).title("Question type"));
    f.render_widget(toggle, chunks[1]);
}

pub fn draw_type_select(f: &mut Frame, app: &App) {
    let layout = calculate_screen_chunks(f.area());
    let subject = app
        .controller
        .state()
        .active_subject
        .as_ref()
        .map(|s| s.display_name())
        .unwrap_or_default();
    draw_header(f, layout.header_area, &subject);

    let list = menu_list(
        TYPE_ITEMS.iter().map(|s| s.to_string()),
        app.type_index,
        "Practice",
    );
    let area = centered_rect(layout.body_area, 40, TYPE_ITEMS.len() as u16 + 2);
    f.render_widget(list, area);

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("Tip: ", key_style()),
        Span::from("free responses are graded with a projected score."),
    ]))
    .alignment(Alignment::Center);
    let hint_area = Rect::new(
        layout.body_area.x,
        (area.y + area.height).min(layout.body_area.y + layout.body_area.height.saturating_sub(1)),
        layout.body_area.width,
        1,
    );
    f.render_widget(hint, hint_area);

    draw_help(
        f,
        layout.help_area,
        &[("↑/↓", "Navigate"), ("Enter", "Start"), ("Esc", "Back")],
        app.status.as_deref(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_list_marks_selection() {
        let list = menu_list(vec!["One".to_string(), "Two".to_string()], 1, "Menu");
        assert_eq!(list.len(), 2);
    }
}
