use crate::types::ComplaintId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Complaint {id} not found")]
    NotFound { id: ComplaintId },

    #[error("Duplicate complaint id {id}: record store invariant violated")]
    DuplicateId { id: ComplaintId },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeskError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

pub type DeskResult<T> = Result<T, DeskError>;
