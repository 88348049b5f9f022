use crate::auth::Auth;
use crate::catalog;
use crate::controller::StudySessionController;
use crate::history::{self, HistoryLog, StoredRecord, ALL_SUBJECTS};
use crate::models::{ExamTrack, OptionLetter, QuestionType};
use crate::navigation::{NavEvent, Screen};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub const LANDING_ITEMS: [&str; 4] = ["Get Started", "Study History", "About", "Quit"];
pub const TYPE_ITEMS: [&str; 3] = ["Multiple Choice", "Free Response", "Study Guide"];

/// Single-line-per-paragraph text editor with a char-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextInput {
    pub buffer: String,
    pub cursor: usize,
    pub scroll_y: u16,
}

impl TextInput {
    fn byte_index(&self, char_index: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_index(self.cursor - 1);
            self.buffer.remove(at);
            self.cursor -= 1;
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.buffer.chars().count());
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.scroll_y = 0;
    }

    pub fn is_blank(&self) -> bool {
        self.buffer.trim().is_empty()
    }

    /// Returns false for keys the editor ignores.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert(c);
                true
            }
            KeyCode::Backspace => {
                self.backspace();
                true
            }
            KeyCode::Left => {
                self.left();
                true
            }
            KeyCode::Right => {
                self.right();
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.buffer.chars().count();
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    pub records: Vec<StoredRecord>,
    pub filters: Vec<String>,
    pub filter_index: usize,
    pub selected: usize,
    pub error: Option<String>,
}

impl HistoryView {
    pub fn load(&mut self, log: &HistoryLog) {
        match log.load() {
            Ok(records) => {
                self.filters = history::subject_filters(&records);
                self.records = records;
                self.error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load history");
                self.records.clear();
                self.filters = vec![ALL_SUBJECTS.to_string()];
                self.error = Some(e.to_string());
            }
        }
        self.filter_index = 0;
        self.selected = 0;
    }

    pub fn filter(&self) -> &str {
        self.filters
            .get(self.filter_index)
            .map(String::as_str)
            .unwrap_or(ALL_SUBJECTS)
    }

    pub fn visible(&self) -> Vec<&StoredRecord> {
        history::filter_by_topic(&self.records, self.filter())
    }

    pub fn cycle_filter(&mut self, forward: bool) {
        let count = self.filters.len().max(1);
        self.filter_index = if forward {
            (self.filter_index + 1) % count
        } else {
            (self.filter_index + count - 1) % count
        };
        self.selected = 0;
    }

    fn move_selection(&mut self, down: bool) {
        let count = self.visible().len();
        if down {
            if self.selected + 1 < count {
                self.selected += 1;
            }
        } else {
            self.selected = self.selected.saturating_sub(1);
        }
    }
}

pub struct App {
    pub controller: StudySessionController,
    pub auth: Auth,
    pub landing_index: usize,
    pub mode_index: usize,
    pub subject_index: usize,
    pub type_index: usize,
    /// Free-text subject for Study Anything.
    pub custom_subject: TextInput,
    pub custom_type: QuestionType,
    pub answer_input: TextInput,
    /// Scratch notes beside the current question, cleared when the question changes.
    pub notes: TextInput,
    pub notes_open: bool,
    pub history_view: HistoryView,
    pub scroll_y: u16,
    pub status: Option<String>,
    pub spinner_tick: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(controller: StudySessionController) -> Self {
        let auth = controller.auth().clone();
        Self {
            controller,
            auth,
            landing_index: 0,
            mode_index: 0,
            subject_index: 0,
            type_index: 0,
            custom_subject: TextInput::default(),
            custom_type: QuestionType::MultipleChoice,
            answer_input: TextInput::default(),
            notes: TextInput::default(),
            notes_open: false,
            history_view: HistoryView::default(),
            scroll_y: 0,
            status: None,
            spinner_tick: 0,
            should_quit: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.controller.screen()
    }

    pub fn on_tick(&mut self) {
        self.spinner_tick = self.spinner_tick.wrapping_add(1);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let before = self.screen();
        self.status = None;

        match before {
            Screen::Landing => self.handle_landing(key),
            Screen::About => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace) {
                    self.controller.go_back();
                }
            }
            Screen::ModeSelect => self.handle_mode_select(key),
            Screen::SubjectSelect(ExamTrack::StudyAnything) => self.handle_study_anything(key),
            Screen::SubjectSelect(track) => self.handle_subject_select(track, key),
            Screen::TypeSelect => self.handle_type_select(key),
            Screen::Question | Screen::FreeResponse
                if key.code == KeyCode::Tab || self.notes_open =>
            {
                self.handle_notes(key)
            }
            Screen::Question => self.handle_question(key),
            Screen::FreeResponse => self.handle_free_response(key),
            Screen::StudyMaterial => self.handle_study_material(key),
            Screen::History => self.handle_history(key),
        }

        if self.screen() != before {
            self.on_enter(self.screen());
        }
    }

    fn on_enter(&mut self, screen: Screen) {
        self.scroll_y = 0;
        match screen {
            Screen::SubjectSelect(_) => self.subject_index = 0,
            Screen::TypeSelect => self.type_index = 0,
            Screen::Question | Screen::FreeResponse => {
                self.answer_input.clear();
                self.notes.clear();
                self.notes_open = false;
            }
            Screen::History => self.history_view.load(self.controller.history()),
            _ => {}
        }
    }

    fn handle_landing(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.landing_index = self.landing_index.saturating_sub(1),
            KeyCode::Down => {
                if self.landing_index + 1 < LANDING_ITEMS.len() {
                    self.landing_index += 1;
                }
            }
            KeyCode::Enter => match self.landing_index {
                0 => {
                    self.controller.navigate(NavEvent::GetStarted);
                }
                1 => {
                    self.controller.navigate(NavEvent::ShowHistory);
                }
                2 => {
                    self.controller.navigate(NavEvent::ShowAbout);
                }
                _ => self.should_quit = true,
            },
            KeyCode::Char('s') => self.toggle_sign_in(),
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn toggle_sign_in(&mut self) {
        if self.auth.is_signed_in() {
            self.auth.sign_out();
            self.status = Some("Signed out".to_string());
        } else {
            match self.auth.sign_in() {
                Ok(user) => self.status = Some(format!("Signed in as {}", user.display_name)),
                Err(e) => {
                    tracing::warn!(error = %e, "sign-in failed");
                    self.status = Some(e.to_string());
                }
            }
        }
    }

    fn handle_mode_select(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.mode_index = self.mode_index.saturating_sub(1),
            KeyCode::Down => {
                if self.mode_index + 1 < ExamTrack::ALL.len() {
                    self.mode_index += 1;
                }
            }
            KeyCode::Enter => {
                let track = ExamTrack::ALL[self.mode_index.min(ExamTrack::ALL.len() - 1)];
                self.controller.navigate(NavEvent::ChooseTrack(track));
            }
            KeyCode::Char('h') => {
                self.controller.navigate(NavEvent::ShowHistory);
            }
            KeyCode::Esc | KeyCode::Backspace => {
                self.controller.go_back();
            }
            _ => {}
        }
    }

    fn handle_subject_select(&mut self, track: ExamTrack, key: KeyEvent) {
        let count = catalog::entries(track).len();
        match key.code {
            KeyCode::Up => self.subject_index = self.subject_index.saturating_sub(1),
            KeyCode::Down => {
                if self.subject_index + 1 < count {
                    self.subject_index += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(subject) = catalog::subject_at(track, self.subject_index) {
                    self.controller.select_subject(subject, track, None);
                }
            }
            // AP subjects reach the guide through the type step.
            KeyCode::Char('g') if !track.has_type_select() => {
                if let Some(subject) = catalog::subject_at(track, self.subject_index) {
                    self.controller.start_guide(subject);
                }
            }
            KeyCode::Char('h') => {
                self.controller.navigate(NavEvent::ShowHistory);
            }
            KeyCode::Esc | KeyCode::Backspace => {
                self.controller.go_back();
            }
            _ => {}
        }
    }

    fn handle_study_anything(&mut self, key: KeyEvent) {
        let track = ExamTrack::StudyAnything;
        match key.code {
            KeyCode::Esc => {
                self.controller.go_back();
            }
            KeyCode::Tab | KeyCode::BackTab => self.custom_type = self.custom_type.toggled(),
            KeyCode::Enter => {
                if self.custom_subject.is_blank() {
                    self.status = Some("Type a subject first".to_string());
                    return;
                }
                let subject = track.subject_for(&self.custom_subject.buffer);
                self.controller
                    .select_subject(subject, track, Some(self.custom_type));
            }
            KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if !self.custom_subject.is_blank() {
                    let subject = track.subject_for(&self.custom_subject.buffer);
                    self.controller.start_guide(subject);
                }
            }
            _ => {
                self.custom_subject.handle_key(key);
            }
        }
    }

    fn handle_type_select(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.type_index = self.type_index.saturating_sub(1),
            KeyCode::Down => {
                if self.type_index + 1 < TYPE_ITEMS.len() {
                    self.type_index += 1;
                }
            }
            KeyCode::Enter => {
                let Some(subject) = self.controller.state().active_subject.clone() else {
                    self.controller.go_back();
                    return;
                };
                match self.type_index {
                    0 => self
                        .controller
                        .start_question(subject, QuestionType::MultipleChoice),
                    1 => self
                        .controller
                        .start_question(subject, QuestionType::FreeResponse),
                    _ => self.controller.start_guide(subject),
                }
            }
            KeyCode::Esc | KeyCode::Backspace => {
                self.controller.go_back();
            }
            _ => {}
        }
    }

    fn handle_question(&mut self, key: KeyEvent) {
        let state = self.controller.state();
        let submitted = state.answer_submitted;
        let selected = state.selected_answer;
        let can_reload = !state.loading && (submitted || state.question.is_failed());

        match key.code {
            KeyCode::Esc | KeyCode::Backspace => {
                self.controller.go_back();
            }
            KeyCode::Char('n') if can_reload => self.reload_question(),
            KeyCode::Char(c) if !submitted => {
                if let Some(letter) = OptionLetter::from_char(c.to_ascii_uppercase()) {
                    self.controller.select_answer(letter);
                }
            }
            KeyCode::Up | KeyCode::Down if !submitted => {
                let next = step_letter(selected, key.code == KeyCode::Down);
                self.controller.select_answer(next);
            }
            KeyCode::Enter if !submitted => {
                if selected.is_none() {
                    self.status = Some("Pick an answer first".to_string());
                } else {
                    self.controller.submit_multiple_choice_answer();
                }
            }
            KeyCode::Enter if can_reload => self.reload_question(),
            _ => {}
        }
    }

    fn handle_free_response(&mut self, key: KeyEvent) {
        let state = self.controller.state();
        let done = state.show_feedback;
        let can_reload =
            !state.loading && !state.evaluating && (done || state.question.is_failed());
        let typing = !done && !state.evaluating && state.question.text().is_some();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => {
                self.controller.go_back();
            }
            KeyCode::Char('n') if can_reload || ctrl => self.reload_question(),
            KeyCode::Up if done => self.scroll_y = self.scroll_y.saturating_sub(1),
            KeyCode::Down if done => self.scroll_y = self.scroll_y.saturating_add(1),
            KeyCode::Char('s') if typing && ctrl => {
                if self.answer_input.is_blank() {
                    self.status = Some("Write a response first".to_string());
                } else {
                    self.controller.submit_free_response(&self.answer_input.buffer);
                }
            }
            KeyCode::Enter if typing => self.answer_input.insert('\n'),
            KeyCode::Enter if can_reload => self.reload_question(),
            _ if typing => {
                self.answer_input.handle_key(key);
            }
            _ => {}
        }
    }

    /// Notepad keys on the question screens: Tab toggles it, Esc closes it,
    /// everything else edits the notes while it is open.
    fn handle_notes(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.notes_open = !self.notes_open,
            KeyCode::Esc => self.notes_open = false,
            KeyCode::Enter => self.notes.insert('\n'),
            _ => {
                self.notes.handle_key(key);
            }
        }
    }

    /// Asks for a fresh question; the response editor and notes start empty.
    fn reload_question(&mut self) {
        self.answer_input.clear();
        self.notes.clear();
        self.scroll_y = 0;
        self.controller.reload();
    }

    fn handle_study_material(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => {
                self.controller.go_back();
            }
            KeyCode::Up => self.scroll_y = self.scroll_y.saturating_sub(1),
            KeyCode::Down => self.scroll_y = self.scroll_y.saturating_add(1),
            KeyCode::PageUp => self.scroll_y = self.scroll_y.saturating_sub(10),
            KeyCode::PageDown => self.scroll_y = self.scroll_y.saturating_add(10),
            KeyCode::Char('n') if !self.controller.state().loading => {
                self.scroll_y = 0;
                self.controller.reload();
            }
            _ => {}
        }
    }

    fn handle_history(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => {
                self.controller.go_back();
            }
            KeyCode::Up => self.history_view.move_selection(false),
            KeyCode::Down => self.history_view.move_selection(true),
            KeyCode::Tab | KeyCode::Right => self.history_view.cycle_filter(true),
            KeyCode::BackTab | KeyCode::Left => self.history_view.cycle_filter(false),
            KeyCode::Char('r') => self.history_view.load(self.controller.history()),
            _ => {}
        }
    }
}

fn step_letter(current: Option<OptionLetter>, forward: bool) -> OptionLetter {
    let all = OptionLetter::ALL;
    match current {
        None => all[0],
        Some(letter) => {
            let idx = all.iter().position(|l| *l == letter).unwrap_or(0);
            if forward {
                all[(idx + 1).min(all.len() - 1)]
            } else {
                all[idx.saturating_sub(1)]
            }
        }
    }
}
