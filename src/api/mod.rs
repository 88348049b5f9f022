pub mod client;
pub mod evaluation;

pub use client::{
    EvaluationRequest, HttpStudyApi, StudyApi, DEFAULT_API_BASE, DEFAULT_TIMEOUT,
};
pub use evaluation::parse_evaluation;

#[cfg(test)]
pub(crate) mod fake;
