//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("No models configured for the council")]
    NoModels,

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Invalid mode: {0} (expected chat, code or image)")]
    InvalidMode(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_mode_display() {
        let error = DomainError::InvalidMode("video".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid mode: video (expected chat, code or image)"
        );
    }
}
