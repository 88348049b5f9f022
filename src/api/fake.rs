use crate::api::{EvaluationRequest, StudyApi};
use crate::error::ApiError;
use crate::models::{EvaluationResult, QuestionType, Subject};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Canned responses; a `None` field answers with an error.
#[derive(Default)]
pub struct FakeApi {
    pub question: Option<String>,
    pub guide: Option<String>,
    pub evaluation: Option<EvaluationResult>,
    pub calls: Arc<AtomicUsize>,
}

impl FakeApi {
    pub fn with_question(question: &str) -> Self {
        Self {
            question: Some(question.to_string()),
            ..Default::default()
        }
    }
}

#[async_trait]
impl StudyApi for FakeApi {
    /// Prefixes the subject so tests can tell responses apart.
    async fn fetch_question(
        &self,
        subject: &Subject,
        _question_type: QuestionType,
    ) -> Result<String, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.question
            .as_ref()
            .map(|q| format!("[{}] {}", subject, q))
            .ok_or(ApiError::Server(503))
    }

    async fn fetch_guide(&self, _subject: &Subject) -> Result<String, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.guide.clone().ok_or(ApiError::Unauthorized)
    }

    async fn evaluate(&self, _request: &EvaluationRequest) -> Result<EvaluationResult, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.evaluation.clone().ok_or(ApiError::RateLimited)
    }
}
