pub mod answer_key;
pub mod api;
pub mod app;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod history;
pub mod logger;
pub mod models;
pub mod navigation;
pub mod ui;
pub mod utils;

// Re-exports for convenience
pub use answer_key::extract_answer_key;
pub use api::{HttpStudyApi, StudyApi};
pub use app::App;
pub use auth::{Auth, IdentityProvider, LocalProfileProvider, UserProfile};
pub use config::Config;
pub use controller::{SessionState, StudySessionController};
pub use error::{ApiError, AuthError, HistoryError};
pub use history::{HistoryLog, HistorySink, MemoryHistory, SqliteHistory};
pub use models::{EvaluationResult, ExamTrack, HistoryRecord, OptionLetter, QuestionType, Subject};
pub use navigation::{NavEvent, Screen};
