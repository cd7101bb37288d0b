use thiserror::Error;

use crate::validation::QuestTextError;

/// Errors that can arise while driving the progression engine or its storage.
#[derive(Debug, Error)]
pub enum HunterError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around JSON encoding and decoding of persisted records.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapper around IO errors (directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The operation targets a quest or shadow id that does not exist.
    #[error("{kind} not found: {id}")]
    InvalidReference { kind: &'static str, id: String },

    /// The target is already in the state the operation would produce.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },

    /// User supplied text or arguments failed validation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal error (runtime shut down, unexpected conditions)
    #[error("internal error: {0}")]
    Internal(String),
}

impl HunterError {
    pub fn quest_not_found(id: &str) -> Self {
        HunterError::InvalidReference {
            kind: "quest",
            id: id.to_string(),
        }
    }

    pub fn shadow_not_found(id: &str) -> Self {
        HunterError::InvalidReference {
            kind: "shadow",
            id: id.to_string(),
        }
    }

    /// True for the two precondition failures that leave engine state untouched.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            HunterError::InvalidReference { .. } | HunterError::InvalidState(_)
        )
    }
}

impl From<QuestTextError> for HunterError {
    fn from(err: QuestTextError) -> Self {
        HunterError::InvalidInput(err.to_string())
    }
}
