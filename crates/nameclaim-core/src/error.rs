//! Error types shared by the identity provider and document store capabilities.

use thiserror::Error;

/// Failure reported by an identity provider.
///
/// `code` is a stable, machine-readable identifier (logged for diagnostics);
/// `message` is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthError {
    pub code: String,
    pub message: String,
}

impl AuthError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Failure reported by a document store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid document path: {0}")]
    InvalidPath(String),

    #[error("Document already exists: {0}")]
    AlreadyExists(String),

    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Returns true when a create-only write collided with an existing document.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::AlreadyExists(_))
    }
}
