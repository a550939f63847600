//! Error taxonomy shared by every viewer operation

use thiserror::Error;

use crate::registry::EntityKind;

/// Viewer errors.
///
/// None of these are fatal to a session: batch operations log them and move
/// on, single-entity operations hand them back to the caller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Type mismatch on '{id}': expected {expected}, found {found}")]
    TypeMismatch {
        id: String,
        expected: String,
        found: String,
    },

    #[error("Bookmark error: {0}")]
    Bookmark(String),

    #[error("A bookmark restore is already in progress")]
    RestoreInProgress,

    #[error("Failed to load model '{model}': {reason}")]
    Load { model: String, reason: String },
}

impl ViewerError {
    /// Kind mismatch between what an operation accepts and what the id denotes
    pub fn kind_mismatch(id: &str, expected: &str, found: EntityKind) -> Self {
        ViewerError::TypeMismatch {
            id: id.to_string(),
            expected: expected.to_string(),
            found: found.name().to_string(),
        }
    }
}

/// Result type for viewer operations
pub type ViewerResult<T> = Result<T, ViewerError>;
