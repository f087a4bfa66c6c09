use thiserror::Error;

/// Failures raised while talking to the chat completions API.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Every attempted model returned blank content.
    #[error("empty response from model(s): {}", models.join(", "))]
    EmptyResponse { models: Vec<String> },

    #[error("upstream request to {model} failed with status {status}: {message}")]
    Api {
        model: String,
        status: u16,
        message: String,
    },

    #[error("upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned an unreadable body: {0}")]
    InvalidBody(String),
}

impl LlmError {
    /// Transport, HTTP status and body errors. These are never retried.
    pub fn is_upstream_failure(&self) -> bool {
        !matches!(self, LlmError::EmptyResponse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_response_names_every_model() {
        let err = LlmError::EmptyResponse {
            models: vec!["gpt-5-mini".to_string(), "gpt-4o-mini".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "empty response from model(s): gpt-5-mini, gpt-4o-mini"
        );
        assert!(!err.is_upstream_failure());
    }

    #[test]
    fn api_errors_are_upstream_failures() {
        let err = LlmError::Api {
            model: "gpt-4o-mini".to_string(),
            status: 429,
            message: "rate limited".to_string(),
        };
        assert!(err.is_upstream_failure());
        assert!(LlmError::InvalidBody("not json".to_string()).is_upstream_failure());
    }
}
