use crate::api::evaluation::parse_evaluation;
use crate::auth::Auth;
use crate::error::ApiError;
use crate::models::{EvaluationResult, QuestionType, Subject};
use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationRequest {
    pub subject: Subject,
    pub question: String,
    pub response: String,
}

/// Remote question generation, study guides and free response grading.
#[async_trait]
pub trait StudyApi: Send + Sync {
    async fn fetch_question(
        &self,
        subject: &Subject,
        question_type: QuestionType,
    ) -> Result<String, ApiError>;

    async fn fetch_guide(&self, subject: &Subject) -> Result<String, ApiError>;

    async fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationResult, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpStudyApi {
    client: reqwest::Client,
    base_url: Url,
    auth: Option<Auth>,
}

impl HttpStudyApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|_| ApiError::InvalidBaseUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::Transport {
                endpoint: base_url.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            base_url,
            auth: None,
        })
    }

    /// Attaches the signed-in user's token to every request.
    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn question_url(&self, subject: &Subject, question_type: QuestionType) -> Url {
        let mut url = self.endpoint(&["question", subject.as_str()]);
        url.query_pairs_mut()
            .append_pair("type", question_type.as_str());
        url
    }

    pub fn guide_url(&self, subject: &Subject) -> Url {
        let mut url = self.endpoint(&["guide"]);
        url.query_pairs_mut().append_pair("subject", subject.as_str());
        url
    }

    pub fn evaluate_url(&self) -> Url {
        self.endpoint(&["evaluate"])
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self
            .auth
            .as_ref()
            .and_then(Auth::current_user)
            .and_then(|u| u.id_token)
        {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send_for_text(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<String, ApiError> {
        let transport = |source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        };

        let response = self.authorize(request).send().await.map_err(transport)?;
        let status = response.status();
        tracing::debug!(endpoint, status = status.as_u16(), "response received");
        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16()));
        }

        let body = response.text().await.map_err(transport)?;
        if body.trim().is_empty() {
            return Err(ApiError::EmptyBody(endpoint.to_string()));
        }
        Ok(body)
    }
}

#[async_trait]
impl StudyApi for HttpStudyApi {
    async fn fetch_question(
        &self,
        subject: &Subject,
        question_type: QuestionType,
    ) -> Result<String, ApiError> {
        let url = self.question_url(subject, question_type);
        tracing::info!(%subject, question_type = question_type.as_str(), "fetching question");
        self.send_for_text(self.client.get(url), "question").await
    }

    async fn fetch_guide(&self, subject: &Subject) -> Result<String, ApiError> {
        let url = self.guide_url(subject);
        tracing::info!(%subject, "fetching study guide");
        self.send_for_text(self.client.get(url), "guide").await
    }

    async fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationResult, ApiError> {
        tracing::info!(subject = %request.subject, "submitting free response");
        let body = self
            .send_for_text(
                self.client.post(self.evaluate_url()).json(request),
                "evaluate",
            )
            .await?;
        parse_evaluation(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> HttpStudyApi {
        HttpStudyApi::new("http://localhost:8080/api/", DEFAULT_TIMEOUT).unwrap()
    }

    #[test]
    fn test_question_url_encodes_subject() {
        let url = api().question_url(
            &Subject::new("AP Calculus AB"),
            QuestionType::MultipleChoice,
        );
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/question/AP%20Calculus%20AB?type=multiple-choice"
        );
    }

    #[test]
    fn test_question_url_escapes_slashes() {
        let url = api().question_url(&Subject::new("Math: A/B"), QuestionType::FreeResponse);
        assert_eq!(
            url.path(),
            "/api/question/Math:%20A%2FB"
        );
        assert_eq!(url.query(), Some("type=free-response"));
    }

    #[test]
    fn test_guide_and_evaluate_urls() {
        let api = api();
        assert_eq!(
            api.guide_url(&Subject::new("SAT Math: Algebra")).as_str(),
            "http://localhost:8080/api/guide?subject=SAT+Math%3A+Algebra"
        );
        assert_eq!(api.evaluate_url().as_str(), "http://localhost:8080/api/evaluate");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpStudyApi::new("not a url", DEFAULT_TIMEOUT),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }
}
