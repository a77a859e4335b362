// src/domain/error.rs
use thiserror::Error;

/// Failure of a single call against the notes service.
///
/// Cloneable so one failed load can be handed to every caller waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl RequestError {
    /// HTTP status reported by the server, if the request got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status(status) => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid note: {}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| i.message.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

impl ValidationError {
    pub fn has_issue(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_status_error_when_asking_status_then_returns_code() {
        assert_eq!(RequestError::Status(404).status(), Some(404));
        assert_eq!(RequestError::Transport("refused".into()).status(), None);
    }

    #[test]
    fn given_status_error_when_displaying_then_mentions_status() {
        assert_eq!(RequestError::Status(500).to_string(), "HTTP error! status: 500");
    }

    #[test]
    fn given_multiple_issues_when_displaying_then_joins_messages() {
        let err = ValidationError {
            issues: vec![
                FieldIssue {
                    field: "title",
                    message: "Title must be at least 2 characters.".to_string(),
                },
                FieldIssue {
                    field: "content",
                    message: "Content must be at least 5 characters.".to_string(),
                },
            ],
        };

        assert_eq!(
            err.to_string(),
            "Invalid note: Title must be at least 2 characters. Content must be at least 5 characters."
        );
        assert!(err.has_issue("content"));
        assert!(!err.has_issue("color"));
    }
}
