//! Error types with status code mapping
//!
//! Three layers:
//! - [`ValidationError`]: input rejected before anything is touched
//! - [`StoreError`]: what a [`TaskStore`](crate::core::ports::TaskStore) reports
//! - [`BoardError`]: what the engine hands back to callers

use thiserror::Error;

use crate::core::models::TaskId;

/// Input rejected before any store call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// An update must change at least one field
    #[error("no fields provided for update")]
    NoFields,

    /// Status outside the closed set
    #[error("invalid status: {0}. Use 'To Do' or 'Done'")]
    InvalidStatus(String),

    /// Priority outside the closed set
    #[error("invalid priority: {0}. Use high, normal or low")]
    InvalidPriority(String),

    /// Title missing, blank or cleared
    #[error("task title cannot be empty")]
    EmptyTitle,

    /// List title missing, blank or cleared
    #[error("list title cannot be empty")]
    EmptyListTitle,

    /// Field is required and cannot be set to null
    #[error("field cannot be cleared: {0}")]
    NotClearable(String),

    /// Field name the patch builder does not know
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Value has the wrong shape for its field
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// What was wrong
        reason: String,
    },
}

/// Failure reported by a task store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Target task does not exist in the store
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Store refused the request as invalid
    #[error("rejected by store: {0}")]
    Rejected(String),

    /// Network failure, non-success status or timeout
    #[error("transport error: {0}")]
    Transport(String),
}

/// Error codes that map to status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid request (400)
    BadRequest,
    /// Resource not found (404)
    NotFound,
    /// Store unreachable or failing (503)
    Unavailable,
}

impl ErrorCode {
    /// Status code for this error
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::Unavailable => 503,
        }
    }

    /// Error code string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::Unavailable => "UNAVAILABLE",
        }
    }
}

/// Outcome of a failed board operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Rejected locally; board untouched
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Task vanished from the store
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Store refused the request
    #[error("rejected by store: {0}")]
    Rejected(String),

    /// Store unreachable, failing or timed out
    #[error("store unavailable: {0}")]
    Transport(String),
}

impl BoardError {
    /// Code for outer surfaces
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) | Self::Rejected(_) => ErrorCode::BadRequest,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Transport(_) => ErrorCode::Unavailable,
        }
    }

    /// Whether the board was never changed for this error
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<StoreError> for BoardError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::Rejected(msg) => Self::Rejected(msg),
            StoreError::Transport(msg) => Self::Transport(msg),
        }
    }
}
