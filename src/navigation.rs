use crate::models::{ExamTrack, QuestionType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Landing,
    About,
    ModeSelect,
    SubjectSelect(ExamTrack),
    TypeSelect,
    Question,
    FreeResponse,
    StudyMaterial,
    History,
}

impl Screen {
    pub fn is_subject_select(&self) -> bool {
        matches!(self, Screen::SubjectSelect(_))
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Landing => "Home",
            Screen::About => "About",
            Screen::ModeSelect => "Choose a Mode",
            Screen::SubjectSelect(track) => track.label(),
            Screen::TypeSelect => "Question Type",
            Screen::Question => "Question",
            Screen::FreeResponse => "Free Response",
            Screen::StudyMaterial => "Study Guide",
            Screen::History => "History",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    GetStarted,
    ShowAbout,
    ShowHistory,
    ChooseTrack(ExamTrack),
    /// An AP subject was picked and the question type is still open.
    SubjectChosen,
    OpenQuestion(QuestionType),
    OpenGuide,
    /// `track` is where question and guide screens return to.
    Back { track: ExamTrack },
    Home,
}

/// Next screen for `event` on `screen`, or `None` when the event does not apply there.
pub fn transition(screen: Screen, event: NavEvent) -> Option<Screen> {
    use NavEvent::*;

    match (screen, event) {
        (_, Home) => Some(Screen::Landing),

        (Screen::Landing, GetStarted) => Some(Screen::ModeSelect),
        (Screen::Landing, ShowAbout) => Some(Screen::About),
        (Screen::Landing, ShowHistory) => Some(Screen::History),
        (Screen::Landing, Back { .. }) => Some(Screen::Landing),
        (Screen::Landing, _) => None,

        (Screen::About, Back { .. }) => Some(Screen::Landing),
        (Screen::About, _) => None,

        (Screen::ModeSelect, ChooseTrack(track)) => Some(Screen::SubjectSelect(track)),
        (Screen::ModeSelect, ShowHistory) => Some(Screen::History),
        (Screen::ModeSelect, Back { .. }) => Some(Screen::Landing),
        (Screen::ModeSelect, _) => None,

        (Screen::SubjectSelect(ExamTrack::Ap), SubjectChosen) => Some(Screen::TypeSelect),
        (Screen::SubjectSelect(_), OpenQuestion(QuestionType::MultipleChoice)) => {
            Some(Screen::Question)
        }
        (Screen::SubjectSelect(_), OpenQuestion(QuestionType::FreeResponse)) => {
            Some(Screen::FreeResponse)
        }
        (Screen::SubjectSelect(_), OpenGuide) => Some(Screen::StudyMaterial),
        (Screen::SubjectSelect(_), ShowHistory) => Some(Screen::History),
        (Screen::SubjectSelect(_), Back { .. }) => Some(Screen::ModeSelect),
        (Screen::SubjectSelect(_), _) => None,

        (Screen::TypeSelect, OpenQuestion(QuestionType::MultipleChoice)) => Some(Screen::Question),
        (Screen::TypeSelect, OpenQuestion(QuestionType::FreeResponse)) => {
            Some(Screen::FreeResponse)
        }
        (Screen::TypeSelect, OpenGuide) => Some(Screen::StudyMaterial),
        (Screen::TypeSelect, Back { .. }) => Some(Screen::SubjectSelect(ExamTrack::Ap)),
        (Screen::TypeSelect, _) => None,

        // "New question" re-enters the same screen.
        (Screen::Question, OpenQuestion(QuestionType::MultipleChoice)) => Some(Screen::Question),
        (Screen::FreeResponse, OpenQuestion(QuestionType::FreeResponse)) => {
            Some(Screen::FreeResponse)
        }
        (Screen::StudyMaterial, OpenGuide) => Some(Screen::StudyMaterial),
        (Screen::Question | Screen::FreeResponse | Screen::StudyMaterial, Back { track }) => {
            Some(Screen::SubjectSelect(track))
        }
        (Screen::Question | Screen::FreeResponse | Screen::StudyMaterial, _) => None,

        (Screen::History, Back { .. }) => Some(Screen::ModeSelect),
        (Screen::History, _) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACK_AP: NavEvent = NavEvent::Back {
        track: ExamTrack::Ap,
    };

    #[test]
    fn test_landing_routes() {
        assert_eq!(
            transition(Screen::Landing, NavEvent::GetStarted),
            Some(Screen::ModeSelect)
        );
        assert_eq!(
            transition(Screen::Landing, NavEvent::ShowAbout),
            Some(Screen::About)
        );
        assert_eq!(
            transition(Screen::Landing, NavEvent::ShowHistory),
            Some(Screen::History)
        );
        assert_eq!(transition(Screen::Landing, NavEvent::OpenGuide), None);
    }

    #[test]
    fn test_ap_flow_goes_through_type_select() {
        let screen = transition(Screen::ModeSelect, NavEvent::ChooseTrack(ExamTrack::Ap)).unwrap();
        assert_eq!(screen, Screen::SubjectSelect(ExamTrack::Ap));
        let screen = transition(screen, NavEvent::SubjectChosen).unwrap();
        assert_eq!(screen, Screen::TypeSelect);
        assert_eq!(
            transition(screen, NavEvent::OpenQuestion(QuestionType::FreeResponse)),
            Some(Screen::FreeResponse)
        );
        assert_eq!(transition(screen, NavEvent::OpenGuide), Some(Screen::StudyMaterial));
    }

    #[test]
    fn test_sat_skips_type_select() {
        let sat = Screen::SubjectSelect(ExamTrack::Sat);
        assert_eq!(transition(sat, NavEvent::SubjectChosen), None);
        assert_eq!(
            transition(sat, NavEvent::OpenQuestion(QuestionType::MultipleChoice)),
            Some(Screen::Question)
        );
    }

    #[test]
    fn test_back_edges() {
        assert_eq!(transition(Screen::About, BACK_AP), Some(Screen::Landing));
        assert_eq!(transition(Screen::ModeSelect, BACK_AP), Some(Screen::Landing));
        assert_eq!(
            transition(Screen::SubjectSelect(ExamTrack::Act), BACK_AP),
            Some(Screen::ModeSelect)
        );
        assert_eq!(
            transition(Screen::TypeSelect, BACK_AP),
            Some(Screen::SubjectSelect(ExamTrack::Ap))
        );
        assert_eq!(
            transition(
                Screen::Question,
                NavEvent::Back {
                    track: ExamTrack::Sat
                }
            ),
            Some(Screen::SubjectSelect(ExamTrack::Sat))
        );
        assert_eq!(transition(Screen::History, BACK_AP), Some(Screen::ModeSelect));
    }

    #[test]
    fn test_home_from_everywhere() {
        for screen in [
            Screen::About,
            Screen::ModeSelect,
            Screen::SubjectSelect(ExamTrack::StudyAnything),
            Screen::TypeSelect,
            Screen::Question,
            Screen::FreeResponse,
            Screen::StudyMaterial,
            Screen::History,
        ] {
            assert_eq!(transition(screen, NavEvent::Home), Some(Screen::Landing));
        }
    }

    #[test]
    fn test_question_screens_reject_cross_type_reload() {
        assert_eq!(
            transition(
                Screen::Question,
                NavEvent::OpenQuestion(QuestionType::FreeResponse)
            ),
            None
        );
        assert_eq!(
            transition(Screen::StudyMaterial, NavEvent::OpenGuide),
            Some(Screen::StudyMaterial)
        );
    }
}
