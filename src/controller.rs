use crate::answer_key::extract_answer_key;
use crate::api::{EvaluationRequest, StudyApi};
use crate::auth::Auth;
use crate::error::ApiError;
use crate::history::{HistoryLog, HistorySink};
use crate::models::{
    EvaluationResult, ExamTrack, HistoryRecord, OptionLetter, QuestionType, Subject,
};
use crate::navigation::{transition, NavEvent, Screen};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub const QUESTION_LOAD_FAILED: &str = "Could not load a question. Please try again.";
pub const GUIDE_LOAD_FAILED: &str = "Could not load the study guide. Please try again.";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum QuestionContent {
    #[default]
    Empty,
    Ready(String),
    Failed(String),
}

impl QuestionContent {
    pub fn text(&self) -> Option<&str> {
        match self {
            QuestionContent::Ready(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, QuestionContent::Failed(_))
    }
}

/// Everything the screens render. Only the controller writes it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub screen: Screen,
    pub active_subject: Option<Subject>,
    pub active_track: Option<ExamTrack>,
    pub question: QuestionContent,
    pub selected_answer: Option<OptionLetter>,
    pub correct_answer: Option<OptionLetter>,
    pub loading: bool,
    pub show_feedback: bool,
    pub answer_submitted: bool,
    pub feedback: Option<EvaluationResult>,
    pub evaluating: bool,
    pub load_error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            screen: Screen::Landing,
            active_subject: None,
            active_track: None,
            question: QuestionContent::Empty,
            selected_answer: None,
            correct_answer: None,
            loading: false,
            show_feedback: false,
            answer_submitted: false,
            feedback: None,
            evaluating: false,
            load_error: None,
        }
    }
}

impl SessionState {
    fn reset_attempt(&mut self) {
        self.question = QuestionContent::Empty;
        self.selected_answer = None;
        self.correct_answer = None;
        self.show_feedback = false;
        self.answer_submitted = false;
        self.feedback = None;
        self.evaluating = false;
        self.load_error = None;
    }
}

/// Completion of a spawned request, tagged with the generation it was issued under.
#[derive(Debug)]
pub enum ApiResponse {
    Question {
        generation: u64,
        question_type: QuestionType,
        result: Result<String, ApiError>,
    },
    Guide {
        generation: u64,
        result: Result<String, ApiError>,
    },
    Evaluation {
        generation: u64,
        request: EvaluationRequest,
        result: Result<EvaluationResult, ApiError>,
    },
}

impl ApiResponse {
    fn generation(&self) -> u64 {
        match self {
            ApiResponse::Question { generation, .. }
            | ApiResponse::Guide { generation, .. }
            | ApiResponse::Evaluation { generation, .. } => *generation,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum LastRequest {
    Question(Subject, QuestionType),
    Guide(Subject),
}

pub struct StudySessionController {
    state: SessionState,
    api: Arc<dyn StudyApi>,
    auth: Auth,
    history: HistoryLog,
    rng: StdRng,
    generation: u64,
    last_request: Option<LastRequest>,
    response_tx: UnboundedSender<ApiResponse>,
    response_rx: UnboundedReceiver<ApiResponse>,
}

impl StudySessionController {
    /// History is written to `sink` under whoever `auth` has signed in, so
    /// anonymous sessions record nothing.
    pub fn new(api: Arc<dyn StudyApi>, auth: Auth, sink: Arc<dyn HistorySink>) -> Self {
        let (response_tx, response_rx) = mpsc::unbounded_channel();
        Self {
            state: SessionState::default(),
            api,
            history: HistoryLog::new(sink, auth.clone()),
            auth,
            rng: StdRng::from_entropy(),
            generation: 0,
            last_request: None,
            response_tx,
            response_rx,
        }
    }

    /// Replaces the random source used when a question carries no answer marker.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        self.state.screen
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Track that question and guide screens return to.
    pub fn track(&self) -> ExamTrack {
        self.state
            .active_track
            .or_else(|| self.state.active_subject.as_ref().map(ExamTrack::of_subject))
            .unwrap_or(ExamTrack::Ap)
    }

    /// Applies a pure screen change. Returns false when `event` does not apply to the current screen.
    pub fn navigate(&mut self, event: NavEvent) -> bool {
        let event = match event {
            NavEvent::Back { .. } => NavEvent::Back { track: self.track() },
            other => other,
        };

        let Some(next) = transition(self.state.screen, event) else {
            tracing::debug!(screen = ?self.state.screen, ?event, "navigation ignored");
            return false;
        };

        let leaving_content = matches!(
            self.state.screen,
            Screen::Question | Screen::FreeResponse | Screen::StudyMaterial
        ) && next != self.state.screen;
        if leaving_content {
            // Whatever is still in flight belongs to the screen being left.
            self.generation += 1;
            self.state.loading = false;
            self.state.evaluating = false;
        }

        if let Screen::SubjectSelect(track) = next {
            self.state.active_subject = None;
            self.state.active_track = Some(track);
        }

        tracing::debug!(from = ?self.state.screen, to = ?next, "screen change");
        self.state.screen = next;
        true
    }

    pub fn go_back(&mut self) -> bool {
        self.navigate(NavEvent::Back { track: self.track() })
    }

    pub fn go_home(&mut self) -> bool {
        self.navigate(NavEvent::Home)
    }

    /// A subject was picked from `track`'s list.
    pub fn select_subject(
        &mut self,
        subject: Subject,
        track: ExamTrack,
        explicit_type: Option<QuestionType>,
    ) {
        if self.state.screen != Screen::SubjectSelect(track) {
            tracing::warn!(screen = ?self.state.screen, ?track, "subject chosen outside its picker");
            return;
        }

        tracing::info!(%subject, ?track, "subject selected");
        match track {
            ExamTrack::Ap => {
                self.navigate(NavEvent::SubjectChosen);
                self.state.active_subject = Some(subject);
            }
            ExamTrack::Sat | ExamTrack::Act => {
                self.start_question(subject, QuestionType::MultipleChoice);
            }
            ExamTrack::StudyAnything => {
                let question_type = explicit_type.unwrap_or(QuestionType::MultipleChoice);
                self.start_question(subject, question_type);
            }
        }
    }

    /// Shows the question screen immediately and fetches its content in the background.
    pub fn start_question(&mut self, subject: Subject, question_type: QuestionType) {
        let Some(next) = transition(self.state.screen, NavEvent::OpenQuestion(question_type))
        else {
            tracing::warn!(screen = ?self.state.screen, ?question_type, "question requested from wrong screen");
            return;
        };

        let generation = self.begin_request(next, &subject);
        self.last_request = Some(LastRequest::Question(subject.clone(), question_type));
        tracing::info!(%subject, question_type = question_type.as_str(), generation, "loading question");

        let api = Arc::clone(&self.api);
        let tx = self.response_tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_question(&subject, question_type).await;
            let _ = tx.send(ApiResponse::Question {
                generation,
                question_type,
                result,
            });
        });
    }

    pub fn start_guide(&mut self, subject: Subject) {
        let Some(next) = transition(self.state.screen, NavEvent::OpenGuide) else {
            tracing::warn!(screen = ?self.state.screen, "study guide requested from wrong screen");
            return;
        };

        let generation = self.begin_request(next, &subject);
        self.last_request = Some(LastRequest::Guide(subject.clone()));
        tracing::info!(%subject, generation, "loading study guide");

        let api = Arc::clone(&self.api);
        let tx = self.response_tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_guide(&subject).await;
            let _ = tx.send(ApiResponse::Guide { generation, result });
        });
    }

    /// Fetches fresh content for the current question or guide screen.
    pub fn reload(&mut self) {
        match self.last_request.clone() {
            Some(LastRequest::Question(subject, question_type)) => {
                self.start_question(subject, question_type)
            }
            Some(LastRequest::Guide(subject)) => self.start_guide(subject),
            None => tracing::debug!("nothing to reload"),
        }
    }

    fn begin_request(&mut self, next: Screen, subject: &Subject) -> u64 {
        if let Screen::SubjectSelect(track) = self.state.screen {
            self.state.active_track = Some(track);
        } else if self.state.screen == Screen::TypeSelect {
            self.state.active_track = Some(ExamTrack::Ap);
        }

        self.generation += 1;
        self.state.reset_attempt();
        self.state.loading = true;
        self.state.active_subject = Some(subject.clone());
        self.state.screen = next;
        self.generation
    }

    pub fn select_answer(&mut self, letter: OptionLetter) {
        if self.state.answer_submitted || self.state.correct_answer.is_none() {
            return;
        }
        self.state.selected_answer = Some(letter);
    }

    /// Grades the selected option. Returns whether it matched, or `None` when nothing was graded.
    pub fn submit_multiple_choice_answer(&mut self) -> Option<bool> {
        if self.state.answer_submitted {
            tracing::debug!("answer already submitted");
            return None;
        }
        let chosen = self.state.selected_answer?;
        let correct = self.state.correct_answer?;
        let prompt = self.state.question.text()?.to_string();
        let subject = self.state.active_subject.clone()?;

        let is_match = chosen == correct;
        self.state.show_feedback = true;
        self.state.answer_submitted = true;
        tracing::info!(%subject, %chosen, %correct, is_match, "answer submitted");

        self.history.log(&HistoryRecord::MultipleChoice {
            subject,
            prompt,
            chosen,
            correct,
            is_match,
        });
        Some(is_match)
    }

    /// Sends a free response for grading. Returns false when the submission was ignored.
    pub fn submit_free_response(&mut self, text: &str) -> bool {
        if self.state.screen != Screen::FreeResponse || self.state.evaluating {
            return false;
        }
        if text.trim().is_empty() {
            return false;
        }
        let (Some(question), Some(subject)) = (
            self.state.question.text().map(str::to_string),
            self.state.active_subject.clone(),
        ) else {
            return false;
        };

        self.state.evaluating = true;
        self.state.feedback = None;
        self.state.show_feedback = false;

        let request = EvaluationRequest {
            subject,
            question,
            response: text.to_string(),
        };
        let generation = self.generation;
        let api = Arc::clone(&self.api);
        let tx = self.response_tx.clone();
        tokio::spawn(async move {
            let result = api.evaluate(&request).await;
            let _ = tx.send(ApiResponse::Evaluation {
                generation,
                request,
                result,
            });
        });
        true
    }

    /// Applies every completion that has already arrived. Returns true if any did.
    pub fn process_responses(&mut self) -> bool {
        let mut applied = false;
        while let Ok(response) = self.response_rx.try_recv() {
            self.apply_response(response);
            applied = true;
        }
        applied
    }

    /// Waits for the next completion and applies it.
    pub async fn next_response(&mut self) {
        if let Some(response) = self.response_rx.recv().await {
            self.apply_response(response);
        }
    }

    fn apply_response(&mut self, response: ApiResponse) {
        let current = response.generation() == self.generation;

        match response {
            ApiResponse::Question {
                question_type,
                result,
                ..
            } => {
                if !current {
                    tracing::debug!("discarding stale question");
                    return;
                }
                self.state.loading = false;
                match result {
                    Ok(raw) => match question_type {
                        QuestionType::MultipleChoice => {
                            let parsed = extract_answer_key(&raw, &mut self.rng);
                            self.state.correct_answer = Some(parsed.correct_letter);
                            self.state.question = QuestionContent::Ready(parsed.display_text);
                        }
                        QuestionType::FreeResponse => {
                            self.state.question = QuestionContent::Ready(raw);
                        }
                    },
                    Err(e) => {
                        tracing::error!(error = %e, "failed to load question");
                        self.state.load_error = Some(e.to_string());
                        self.state.question = QuestionContent::Failed(QUESTION_LOAD_FAILED.to_string());
                    }
                }
            }
            ApiResponse::Guide { result, .. } => {
                if !current {
                    tracing::debug!("discarding stale study guide");
                    return;
                }
                self.state.loading = false;
                match result {
                    Ok(guide) => self.state.question = QuestionContent::Ready(guide),
                    Err(e) => {
                        tracing::error!(error = %e, "failed to load study guide");
                        self.state.load_error = Some(e.to_string());
                        self.state.question = QuestionContent::Failed(GUIDE_LOAD_FAILED.to_string());
                    }
                }
            }
            ApiResponse::Evaluation {
                request, result, ..
            } => {
                let feedback = match result {
                    Ok(evaluation) => {
                        // Graded attempts are recorded even if the user has moved on.
                        self.history.log(&HistoryRecord::FreeResponse {
                            subject: request.subject,
                            prompt: request.question,
                            response: request.response,
                            feedback: evaluation.feedback.clone(),
                            score: evaluation.score.clone(),
                        });
                        evaluation
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to evaluate free response");
                        EvaluationResult::fallback()
                    }
                };

                if !current {
                    tracing::debug!("discarding stale evaluation");
                    return;
                }
                self.state.evaluating = false;
                self.state.feedback = Some(feedback);
                self.state.show_feedback = true;
                self.state.answer_submitted = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::auth::test_support::signed_in_auth;
    use crate::history::MemoryHistory;
    use crate::models::Score;
    use std::sync::atomic::Ordering;

    const MCQ: &str = "What is 2+2?\nA) 3\nB) 4***\nC) 5\nD) 6";

    fn controller(api: FakeApi) -> StudySessionController {
        let sink = Arc::new(MemoryHistory::default());
        StudySessionController::new(Arc::new(api), signed_in_auth("u1"), sink)
            .with_rng(StdRng::seed_from_u64(1))
    }

    fn at_track(api: FakeApi, track: ExamTrack) -> StudySessionController {
        let mut c = controller(api);
        assert!(c.navigate(NavEvent::GetStarted));
        assert!(c.navigate(NavEvent::ChooseTrack(track)));
        c
    }

    fn mcq_api() -> FakeApi {
        FakeApi::with_question(MCQ)
    }

    #[tokio::test]
    async fn test_screen_changes_before_response() {
        let mut c = at_track(mcq_api(), ExamTrack::Sat);
        c.select_subject(Subject::new("SAT Math: Algebra"), ExamTrack::Sat, None);

        assert_eq!(c.screen(), Screen::Question);
        assert!(c.state().loading);
        assert_eq!(c.state().question, QuestionContent::Empty);

        c.next_response().await;
        let state = c.state();
        assert!(!state.loading);
        assert_eq!(state.correct_answer, Some(OptionLetter::B));
        let text = state.question.text().unwrap();
        assert!(text.starts_with("[SAT Math: Algebra] What is 2+2?"));
        assert!(!text.contains("***"));
    }

    #[tokio::test]
    async fn test_load_failure_is_recoverable() {
        let mut c = at_track(FakeApi::default(), ExamTrack::Act);
        c.start_question(Subject::new("ACT Science"), QuestionType::MultipleChoice);
        c.next_response().await;

        let state = c.state();
        assert!(!state.loading);
        assert_eq!(
            state.question,
            QuestionContent::Failed(QUESTION_LOAD_FAILED.to_string())
        );
        assert!(state.load_error.as_deref().unwrap().contains("503"));
        assert!(state.correct_answer.is_none());

        assert!(c.go_back());
        assert_eq!(c.screen(), Screen::SubjectSelect(ExamTrack::Act));
    }

    #[tokio::test]
    async fn test_history_follows_the_given_auth() {
        use crate::auth::test_support::FixedProvider;
        use crate::auth::UserProfile;

        let auth = Auth::new(Arc::new(FixedProvider(UserProfile {
            uid: "late".to_string(),
            display_name: "Late Joiner".to_string(),
            photo_url: None,
            id_token: None,
        })));
        let sink = Arc::new(MemoryHistory::default());
        let mut c = StudySessionController::new(Arc::new(mcq_api()), auth.clone(), sink.clone());
        assert!(!c.auth().is_signed_in());
        assert!(c.navigate(NavEvent::GetStarted));
        assert!(c.navigate(NavEvent::ChooseTrack(ExamTrack::Sat)));

        c.start_question(Subject::new("SAT Math"), QuestionType::MultipleChoice);
        c.next_response().await;
        c.select_answer(OptionLetter::B);
        assert_eq!(c.submit_multiple_choice_answer(), Some(true));
        assert!(sink.fetch("late").unwrap().is_empty(), "anonymous attempts are not kept");

        auth.sign_in().unwrap();
        assert!(c.auth().is_signed_in(), "controller shares the caller's session");
        c.reload();
        c.next_response().await;
        c.select_answer(OptionLetter::B);
        assert_eq!(c.submit_multiple_choice_answer(), Some(true));
        assert_eq!(sink.fetch("late").unwrap().len(), 1);
        assert_eq!(c.history().load().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mcq_submission_records_history() {
        let mut c = at_track(mcq_api(), ExamTrack::Sat);
        c.start_question(Subject::new("SAT Math"), QuestionType::MultipleChoice);
        c.next_response().await;

        assert_eq!(c.submit_multiple_choice_answer(), None);
        c.select_answer(OptionLetter::A);
        assert_eq!(c.submit_multiple_choice_answer(), Some(false));
        assert!(c.state().show_feedback);

        c.select_answer(OptionLetter::B);
        assert_eq!(c.state().selected_answer, Some(OptionLetter::A));
        assert_eq!(c.submit_multiple_choice_answer(), None);

        let records = c.history().load().unwrap();
        assert_eq!(records.len(), 1);
        match &records[0].record {
            HistoryRecord::MultipleChoice {
                chosen,
                correct,
                is_match,
                prompt,
                ..
            } => {
                assert_eq!(*chosen, OptionLetter::A);
                assert_eq!(*correct, OptionLetter::B);
                assert!(!is_match);
                assert!(!prompt.contains("***"));
            }
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_correct_answer_matches() {
        let mut c = at_track(mcq_api(), ExamTrack::Sat);
        c.start_question(Subject::new("SAT Math"), QuestionType::MultipleChoice);
        c.next_response().await;
        c.select_answer(OptionLetter::B);
        assert_eq!(c.submit_multiple_choice_answer(), Some(true));
    }

    #[tokio::test]
    async fn test_stale_question_is_discarded() {
        let mut c = at_track(mcq_api(), ExamTrack::Sat);
        c.start_question(Subject::new("SAT First"), QuestionType::MultipleChoice);
        c.start_question(Subject::new("SAT Second"), QuestionType::MultipleChoice);

        c.next_response().await;
        c.next_response().await;

        let text = c.state().question.text().unwrap();
        assert!(text.starts_with("[SAT Second]"));
        assert!(!c.state().loading);
    }

    #[tokio::test]
    async fn test_leaving_screen_drops_response() {
        let mut c = at_track(mcq_api(), ExamTrack::Sat);
        c.start_question(Subject::new("SAT Math"), QuestionType::MultipleChoice);
        assert!(c.go_back());
        c.next_response().await;

        assert_eq!(c.screen(), Screen::SubjectSelect(ExamTrack::Sat));
        assert_eq!(c.state().question, QuestionContent::Empty);
        assert!(c.state().active_subject.is_none());
        assert!(!c.state().loading);
    }

    #[tokio::test]
    async fn test_ap_flow_keeps_subject_through_type_select() {
        let api = FakeApi::with_question("Discuss the role of enzymes.");
        let calls = Arc::clone(&api.calls);
        let mut c = at_track(api, ExamTrack::Ap);
        c.select_subject(Subject::new("AP Biology"), ExamTrack::Ap, None);
        assert_eq!(c.screen(), Screen::TypeSelect);
        assert_eq!(c.state().active_subject, Some(Subject::new("AP Biology")));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        c.start_question(Subject::new("AP Biology"), QuestionType::FreeResponse);
        assert_eq!(c.screen(), Screen::FreeResponse);
        c.next_response().await;
        assert_eq!(
            c.state().question.text(),
            Some("[AP Biology] Discuss the role of enzymes.")
        );
        assert!(c.state().correct_answer.is_none());

        assert!(c.go_back());
        assert_eq!(c.screen(), Screen::SubjectSelect(ExamTrack::Ap));
        assert!(c.state().active_subject.is_none());
    }

    #[tokio::test]
    async fn test_study_anything_uses_explicit_type() {
        let mut c = at_track(
            FakeApi::with_question("Explain photosynthesis."),
            ExamTrack::StudyAnything,
        );
        c.select_subject(
            Subject::new("Botany"),
            ExamTrack::StudyAnything,
            Some(QuestionType::FreeResponse),
        );
        assert_eq!(c.screen(), Screen::FreeResponse);
        c.next_response().await;

        assert!(c.go_back());
        assert_eq!(c.screen(), Screen::SubjectSelect(ExamTrack::StudyAnything));
    }

    #[tokio::test]
    async fn test_subject_outside_picker_is_ignored() {
        let mut c = controller(mcq_api());
        c.select_subject(Subject::new("SAT Math"), ExamTrack::Sat, None);
        assert_eq!(c.screen(), Screen::Landing);
        c.start_question(Subject::new("SAT Math"), QuestionType::MultipleChoice);
        assert_eq!(c.screen(), Screen::Landing);
        assert!(!c.process_responses());
    }

    #[tokio::test]
    async fn test_free_response_evaluation() {
        let evaluation = EvaluationResult {
            feedback: "Solid argument.".to_string(),
            score: Score::Number(6.0),
            max_score: Score::Number(9.0),
            score_explanation: "Needs more evidence.".to_string(),
        };
        let mut c = at_track(
            FakeApi {
                question: Some("Evaluate the New Deal.".to_string()),
                evaluation: Some(evaluation.clone()),
                ..Default::default()
            },
            ExamTrack::Ap,
        );
        c.select_subject(Subject::new("AP US History"), ExamTrack::Ap, None);
        c.start_question(Subject::new("AP US History"), QuestionType::FreeResponse);
        c.next_response().await;

        assert!(!c.submit_free_response("   "));
        assert!(c.submit_free_response("It expanded federal power."));
        assert!(c.state().evaluating);
        assert!(!c.submit_free_response("second try"));

        c.next_response().await;
        let state = c.state();
        assert!(!state.evaluating);
        assert_eq!(state.feedback, Some(evaluation));

        let records = c.history().load().unwrap();
        assert_eq!(records.len(), 1);
        match &records[0].record {
            HistoryRecord::FreeResponse {
                response, score, ..
            } => {
                assert_eq!(response, "It expanded federal power.");
                assert_eq!(*score, Score::Number(6.0));
            }
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_free_response_failure_uses_fallback() {
        let mut c = at_track(FakeApi::with_question("Explain."), ExamTrack::StudyAnything);
        c.select_subject(
            Subject::new("History"),
            ExamTrack::StudyAnything,
            Some(QuestionType::FreeResponse),
        );
        c.next_response().await;

        assert!(c.submit_free_response("My answer"));
        c.next_response().await;

        let feedback = c.state().feedback.clone().unwrap();
        assert!(feedback.is_fallback());
        assert_eq!(feedback.score.to_string(), "N/A");
        assert!(c.history().load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_guide_lifecycle_and_reload() {
        let api = FakeApi {
            guide: Some("# Limits\n\nA limit describes...".to_string()),
            ..Default::default()
        };
        let calls = Arc::clone(&api.calls);
        let mut c = at_track(api, ExamTrack::Ap);
        c.select_subject(Subject::new("AP Calculus AB"), ExamTrack::Ap, None);
        c.start_guide(Subject::new("AP Calculus AB"));
        assert_eq!(c.screen(), Screen::StudyMaterial);
        assert!(c.state().loading);

        c.next_response().await;
        assert_eq!(
            c.state().question.text(),
            Some("# Limits\n\nA limit describes...")
        );

        c.reload();
        assert!(c.state().loading);
        c.next_response().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(c.go_back());
        assert_eq!(c.screen(), Screen::SubjectSelect(ExamTrack::Ap));
    }

    #[tokio::test]
    async fn test_guide_failure() {
        let mut c = at_track(FakeApi::default(), ExamTrack::Sat);
        c.start_guide(Subject::new("SAT Reading"));
        c.next_response().await;
        assert_eq!(
            c.state().question,
            QuestionContent::Failed(GUIDE_LOAD_FAILED.to_string())
        );
    }

    #[tokio::test]
    async fn test_home_from_question() {
        let mut c = at_track(mcq_api(), ExamTrack::Sat);
        c.start_question(Subject::new("SAT Math"), QuestionType::MultipleChoice);
        assert!(c.go_home());
        assert_eq!(c.screen(), Screen::Landing);
        assert!(c.go_back());
        assert_eq!(c.screen(), Screen::Landing);
    }
}
