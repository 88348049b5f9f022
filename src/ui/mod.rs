pub mod layout;
mod guide;
mod history;
mod menu;
mod question;

use crate::app::App;
use crate::navigation::Screen;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub use layout::{calculate_history_chunks, calculate_question_chunks, calculate_screen_chunks};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn draw(f: &mut Frame, app: &mut App) {
    match app.screen() {
        Screen::Landing => menu::draw_landing(f, app),
        Screen::About => menu::draw_about(f),
        Screen::ModeSelect => menu::draw_mode_select(f, app),
        Screen::SubjectSelect(track) => menu::draw_subject_select(f, app, track),
        Screen::TypeSelect => menu::draw_type_select(f, app),
        Screen::Question => question::draw_multiple_choice(f, app),
        Screen::FreeResponse => question::draw_free_response(f, app),
        Screen::StudyMaterial => guide::draw_study_material(f, app),
        Screen::History => history::draw_history(f, app),
    }
}

fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn selected_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER[tick % SPINNER.len()]
}

fn draw_header(f: &mut Frame, area: Rect, title: &str) {
    let header = Paragraph::new(title.to_string())
        .style(key_style())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

/// Bottom bar of `key action` pairs, with an optional status message in place of it.
fn draw_help(f: &mut Frame, area: Rect, keys: &[(&str, &str)], status: Option<&str>) {
    let line = match status {
        Some(message) => Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Yellow),
        )),
        None => {
            let mut spans = Vec::new();
            for (i, (key, action)) in keys.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::from("  "));
                }
                spans.push(Span::styled(key.to_string(), key_style()));
                spans.push(Span::from(format!(" {}", action)));
            }
            Line::from(spans)
        }
    };

    let help = Paragraph::new(vec![line])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, area);
}

fn loading_line(tick: usize, what: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{} ", spinner_frame(tick)), key_style()),
        Span::from(format!("Loading {}...", what)),
    ])
}

fn failure_lines(message: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::from("Press "),
            Span::styled("n", key_style()),
            Span::from(" to try again."),
        ]),
    ]
}
