//! Error types for the quiz application.

use std::io;

use thiserror::Error;

/// Errors surfaced to the user or returned from [`crate::TriviaQuiz::run`].
///
/// Every variant is terminal for the attempt that produced it. Nothing is
/// retried automatically.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The request could not be sent or the server answered with a non-OK status.
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The server answered, but the payload was unusable.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Settings were rejected before any request was made.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The log subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl QuizError {
    /// Short message suitable for display in the terminal UI.
    pub fn user_message(&self) -> String {
        match self {
            Self::NetworkFailure(_) => {
                "Failed to reach the question bank. Please try again later.".to_string()
            }
            Self::InvalidResponse(detail) => format!("Failed to fetch questions: {detail}"),
            Self::InvalidSettings(detail) => detail.clone(),
            Self::Io(e) => format!("Terminal error: {e}"),
            Self::Logging(detail) => detail.clone(),
        }
    }
}

impl From<reqwest::Error> for QuizError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            QuizError::InvalidResponse(err.to_string())
        } else {
            QuizError::NetworkFailure(err.to_string())
        }
    }
}

impl From<serde_json::Error> for QuizError {
    fn from(err: serde_json::Error) -> Self {
        QuizError::InvalidResponse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, QuizError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_errors_are_invalid_responses() {
        let err: QuizError = serde_json::from_str::<Vec<u32>>("{").unwrap_err().into();
        assert!(matches!(err, QuizError::InvalidResponse(_)));
    }

    #[test]
    fn test_settings_message_is_shown_verbatim() {
        let err = QuizError::InvalidSettings("Amount must be between 1 and 50".to_string());
        assert_eq!(err.user_message(), "Amount must be between 1 and 50");
    }
}
