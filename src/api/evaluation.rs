use crate::error::ApiError;
use crate::models::EvaluationResult;

/// Strips code fences and any prose around the JSON object.
fn clean_json_response(response: &str) -> String {
    let mut cleaned = response.trim().to_string();

    if cleaned.starts_with("```") {
        let lines: Vec<&str> = cleaned.lines().collect();
        if lines.len() > 2 {
            cleaned = lines[1..lines.len() - 1].join("\n");
        }
    }

    if let Some(start) = cleaned.find('{')
        && let Some(end) = cleaned.rfind('}')
        && start < end
    {
        cleaned = cleaned[start..=end].to_string();
    }

    cleaned.trim().to_string()
}

/// Decodes the evaluation endpoint's body.
pub fn parse_evaluation(body: &str) -> Result<EvaluationResult, ApiError> {
    let cleaned = clean_json_response(body);
    serde_json::from_str(&cleaned).map_err(|e| {
        tracing::warn!(raw = body, "could not decode evaluation");
        ApiError::Decode(format!("{}", e))
    })
}
