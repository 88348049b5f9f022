use thiserror::Error;

/// Failures talking to the question/evaluation service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid API base URL '{0}'")]
    InvalidBaseUrl(String),
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("authentication failed")]
    Unauthorized,
    #[error("rate limit exceeded, please try again later")]
    RateLimited,
    #[error("server error ({0}), please try again later")]
    Server(u16),
    #[error("request failed: HTTP {0}")]
    Status(u16),
    #[error("empty response from {0}")]
    EmptyBody(String),
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Maps a non-success status to the matching error kind.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            429 => ApiError::RateLimited,
            s if s >= 500 => ApiError::Server(s),
            s => ApiError::Status(s),
        }
    }
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("migration failed: {0}")]
    Migration(#[from] refinery::Error),
    #[error("could not encode history record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("history store is unavailable")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("sign-in unavailable: {0}")]
    Unavailable(String),
}
