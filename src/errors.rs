//! Typed errors for sizing, submission and session handling.

use thiserror::Error;

/// Degenerate sizing inputs that would otherwise turn into NaN, Infinity or a division by zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizingError {
    #[error("invalid sizing input `{field}`: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl SizingError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// Every problem found in a submission draft, collected in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .violations.join("\n"))]
pub struct ValidationError {
    pub violations: Vec<String>,
}

impl ValidationError {
    pub fn mentions(&self, needle: &str) -> bool {
        self.violations.iter().any(|v| v.contains(needle))
    }
}

/// Failures of one analysis run. Each one ends the run in the `Failed` phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Non-2xx answer, or no answer at all when `status` is `None`.
    #[error("{}", describe_request_failure(.status, .message))]
    Request { status: Option<u16>, message: String },

    /// 2xx answer whose body is not JSON.
    #[error("Invalid JSON response from backend: {}", excerpt(.raw_text))]
    MalformedResponse { raw_text: String },

    #[error("Analysis timed out. Please try again.")]
    Timeout,
}

/// Longest slice of a raw body quoted back in an error message.
const RAW_EXCERPT_CHARS: usize = 200;

fn excerpt(raw: &str) -> String {
    let raw = raw.trim();
    match raw.char_indices().nth(RAW_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &raw[..cut]),
        None => raw.to_string(),
    }
}

fn describe_request_failure(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("API responded with status: {} - {}", code, message),
        None => format!("Could not reach the analysis service: {}", message),
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("An analysis is already running for this session")]
    AlreadyRunning,

    #[error("No saved analysis with id {0}")]
    RecordNotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_reads_like_the_form_message() {
        let err = AnalysisError::Request {
            status: Some(422),
            message: "kpi_type invalid".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API responded with status: 422 - kpi_type invalid"
        );
    }

    #[test]
    fn timeout_has_user_facing_text() {
        assert_eq!(
            AnalysisError::Timeout.to_string(),
            "Analysis timed out. Please try again."
        );
    }

    #[test]
    fn malformed_response_quotes_the_body() {
        let err = AnalysisError::MalformedResponse {
            raw_text: "<html>Bad Gateway</html>\n".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid JSON response from backend: <html>Bad Gateway</html>"
        );
    }

    #[test]
    fn malformed_response_cuts_long_bodies() {
        let err = AnalysisError::MalformedResponse {
            raw_text: "é".repeat(500),
        };
        let text = err.to_string();
        assert!(text.ends_with("..."));
        assert_eq!(text.matches('é').count(), RAW_EXCERPT_CHARS);
    }

    #[test]
    fn validation_lists_one_line_per_violation() {
        let err = ValidationError {
            violations: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(err.to_string(), "a\nb");
        assert!(err.mentions("b"));
    }
}
