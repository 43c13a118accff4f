//! Errors returned by command handlers.
//!
//! All variants are recoverable values carried in the failure channel of an
//! `Effect`. At the boundary each one maps to an [`ErrorKind`].

use crate::domain::TodoStatus;
use serde::Serialize;
use thiserror::Error;

/// `expected` value used when archiving an already archived todo.
pub const ARCHIVABLE_STATES: &str = "Active|Completed";

/// A single field-level validation failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the input field
    pub field: String,
    /// Human-readable reason
    pub message: String,
}

impl FieldError {
    /// Create a field error
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failure of a todo command.
///
/// Serializes with a `_tag` discriminator, e.g.
/// `{"_tag": "InvalidState", "expected": "Active", "actual": "Archived"}`.
#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "_tag")]
pub enum CommandError {
    /// One or more input fields failed validation; all of them are reported
    #[error("Validation failed: {}", describe(.errors))]
    Validation {
        /// Every failing field, in input order
        errors: Vec<FieldError>,
    },

    /// The identifier was malformed
    #[error("Invalid id: {message}")]
    InvalidId {
        /// Why parsing failed
        message: String,
    },

    /// No todo exists for a well-formed identifier
    #[error("Todo not found")]
    NotFound,

    /// The todo is not in a state the command accepts
    #[error("Invalid state: expected {expected}, found {actual}")]
    InvalidState {
        /// Accepted state name, or `Active|Completed`
        expected: String,
        /// State the todo was actually in
        actual: String,
    },
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| format!("{}: {}", error.field, error.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl CommandError {
    /// Build an `InvalidState` error for a todo found in `actual`.
    #[must_use]
    pub fn invalid_state(expected: impl Into<String>, actual: TodoStatus) -> Self {
        Self::InvalidState {
            expected: expected.into(),
            actual: actual.as_str().to_string(),
        }
    }

    /// Build an `InvalidId` error.
    #[must_use]
    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::InvalidId {
            message: message.into(),
        }
    }

    /// Boundary outcome class for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound => ErrorKind::NotFound,
            Self::Validation { .. } | Self::InvalidId { .. } | Self::InvalidState { .. } => {
                ErrorKind::BadRequest
            },
        }
    }
}

/// How a boundary (an HTTP route, a CLI) should present a [`CommandError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller sent something unusable
    BadRequest,
    /// The addressed todo does not exist
    NotFound,
}

impl ErrorKind {
    /// Matching HTTP status code.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::NotFound => 404,
        }
    }
}
