use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Header, body and help bar shared by the menu screens.
pub struct ScreenLayout {
    pub header_area: Rect,
    pub body_area: Rect,
    pub help_area: Rect,
}

pub struct QuestionLayout {
    pub header_area: Rect,
    pub question_area: Rect,
    pub answer_area: Rect,
    pub help_area: Rect,
}

pub struct HistoryLayout {
    pub header_area: Rect,
    pub filter_area: Rect,
    pub list_area: Rect,
    pub detail_area: Rect,
    pub help_area: Rect,
}

pub fn calculate_screen_chunks(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    ScreenLayout {
        header_area: chunks[0],
        body_area: chunks[1],
        help_area: chunks[2],
    }
}

pub fn calculate_question_chunks(area: Rect) -> QuestionLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(55),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    QuestionLayout {
        header_area: chunks[0],
        question_area: chunks[1],
        answer_area: chunks[2],
        help_area: chunks[3],
    }
}

pub fn calculate_history_chunks(area: Rect) -> HistoryLayout {
    let outer = calculate_screen_chunks(area);

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(outer.body_area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(body[1]);

    HistoryLayout {
        header_area: outer.header_area,
        filter_area: body[0],
        list_area: columns[0],
        detail_area: columns[1],
        help_area: outer.help_area,
    }
}

/// Centered box of at most `width` x `height` inside `area`.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
