//! Error types for the chatbot service

use thiserror::Error;

/// Result type alias for chatbot operations
pub type Result<T> = std::result::Result<T, ChatbotError>;

#[derive(Error, Debug)]
pub enum ChatbotError {

    // =============================
    // Client Errors
    // =============================

    /// The inbound message was empty or absent. Nothing is stored;
    /// the caller can resubmit.
    #[error("Message is required")]
    EmptyMessage,

    // =============================
    // Internal Invariant Violations
    // =============================

    /// The classifier produced an intent with no configured responses.
    /// A defect, not a recoverable condition.
    #[error("No responses configured for intent: {0}")]
    UnknownIntent(String),

    // =============================
    // Infrastructure Errors
    // =============================

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),

    /// A persisted row could not be decoded back into a record.
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ChatbotError {
    /// Client errors are the user's to fix; everything else is ours.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ChatbotError::EmptyMessage)
    }
}
