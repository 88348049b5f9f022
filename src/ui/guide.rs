use super::layout::calculate_screen_chunks;
use super::{draw_header, draw_help, failure_lines, loading_line};
use crate::app::App;
use crate::controller::QuestionContent;
use crate::utils::{calculate_max_scroll, estimate_text_height, render_markdown};
use ratatui::{
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw_study_material(f: &mut Frame, app: &mut App) {
    let layout = calculate_screen_chunks(f.area());
    let state = app.controller.state();

    let title = match &state.active_subject {
        Some(subject) => format!("{} - Study Guide", subject.display_name()),
        None => "Study Guide".to_string(),
    };
    draw_header(f, layout.header_area, &title);

    let lines: Vec<Line> = match &state.question {
        _ if state.loading => vec![loading_line(app.spinner_tick, "study guide")],
        QuestionContent::Ready(guide) => render_markdown(guide),
        QuestionContent::Failed(message) => failure_lines(message),
        QuestionContent::Empty => Vec::new(),
    };

    let visible_height = layout.body_area.height.saturating_sub(2) as usize;
    let text_width = layout.body_area.width.saturating_sub(2) as usize;
    let content_height = estimate_text_height(&lines, text_width);
    let max_scroll = calculate_max_scroll(content_height, visible_height);
    app.scroll_y = app.scroll_y.min(max_scroll);

    let guide = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_y, 0))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(guide, layout.body_area);

    draw_help(
        f,
        layout.help_area,
        &[("↑/↓/PgUp/PgDn", "Scroll"), ("n", "Regenerate"), ("Esc", "Back")],
        app.status.as_deref(),
    );
}
