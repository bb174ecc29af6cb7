//! Error types for the tab document model
//!
//! Invariant violations are programming errors on the caller's side and are
//! surfaced as `Err`. Rejected edits (a move that would push a note off the
//! tuning, for example) are not errors from the caller's point of view: the
//! command surface logs them and leaves the document unchanged.

use thiserror::Error;

/// Top-level editor error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    /// The document is not in a state any command can produce
    /// (empty time-signature timeline, string index outside the tuning, ...)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// An edit that would break an invariant and was refused
    #[error("Invalid edit: {0}")]
    InvalidEdit(String),

    /// Document could not be serialized or hydrated
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        EditorError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EditorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EditorError::InvariantViolation("no time signature at 0".to_string());
        assert_eq!(err.to_string(), "Invariant violation: no time signature at 0");

        let err = EditorError::InvalidEdit("string 7 out of range".to_string());
        assert_eq!(err.to_string(), "Invalid edit: string 7 out of range");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: EditorError = json_err.into();
        assert!(matches!(err, EditorError::Serialization(_)));
    }
}
