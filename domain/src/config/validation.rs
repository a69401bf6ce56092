//! Structured configuration issues.
//!
//! Config loaders collect every problem they find instead of failing on the
//! first one, so the CLI can print all warnings at once and only abort on
//! [`Severity::Error`].

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A model id is empty or whitespace.
    EmptyModelName { field: String },
    /// A mode has no council members configured.
    EmptyCouncil { mode: String },
    /// A timeout of zero seconds would fail every request.
    ZeroTimeout { field: String },
    /// A string field holds a value outside its accepted set.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_severity() {
        let err = ConfigIssue::error(
            ConfigIssueCode::EmptyCouncil {
                mode: "chat".to_string(),
            },
            "council.chat.models is empty",
        );
        assert!(err.is_error());

        let warn = ConfigIssue::warning(
            ConfigIssueCode::ZeroTimeout {
                field: "title.timeout_secs".to_string(),
            },
            "zero timeout",
        );
        assert!(!warn.is_error());
        assert_eq!(warn.severity, Severity::Warning);
    }
}
