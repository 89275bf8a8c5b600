//! Error types for the form session
//!
//! Covers:
//! - Record writes that would change a key's value kind
//! - Step preconditions that block a transition
//! - Actions outside the active step's valid set
//! - Failures reported by the submission sink

use crate::step::{Action, Step};
use crate::value::FieldKind;

/// Errors raised by the response record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// A key already holds a value of another kind
    #[error("field '{key}' holds a {existing} value, refusing to store {attempted}")]
    KindMismatch {
        /// Field key
        key: String,
        /// Kind already stored
        existing: FieldKind,
        /// Kind of the rejected value
        attempted: FieldKind,
    },
}

/// Step precondition failures, surfaced inline at the current step
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Respondent or interviewer signature is empty
    #[error("both respondent and interviewer signatures are required to proceed")]
    MissingSignatures,
}

/// Answer text that does not fit the field's input kind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// Not a whole number
    #[error("'{0}' is not a whole number")]
    NotAnInteger(String),

    /// Number outside the field's bounds
    #[error("{value} is outside {min}..={max}")]
    OutOfRange {
        /// Parsed value
        value: i64,
        /// Lower bound
        min: i64,
        /// Upper bound
        max: i64,
    },

    /// Not a `YYYY-MM-DD` date
    #[error("'{0}' is not a date (expected YYYY-MM-DD)")]
    BadDate(String),

    /// Not an `HH:MM` or `HH:MM:SS` time
    #[error("'{0}' is not a time (expected HH:MM or HH:MM:SS)")]
    BadTime(String),

    /// Neither an option label nor an option number
    #[error("'{0}' is not one of the listed options")]
    UnknownOption(String),
}

/// Failure reported by a [`SubmissionSink`](crate::session::SubmissionSink)
#[derive(Debug, thiserror::Error)]
#[error("submission sink failed: {message}")]
pub struct SinkError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SinkError {
    /// Create a sink error from a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a sink error wrapping an underlying cause
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Main session error type
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Step precondition failed; the step is unchanged
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The action is not offered at the active step; nothing changed
    #[error("action {action:?} is not valid at step {step}")]
    InvalidAction {
        /// Active step
        step: Step,
        /// Rejected action
        action: Action,
    },

    /// Fields of this step cannot be edited
    #[error("step {step} is read-only")]
    ReadOnly {
        /// Active step
        step: Step,
    },

    /// The key is written by the session itself, not by answers
    #[error("field '{key}' is reserved")]
    ReservedField {
        /// Rejected key
        key: String,
    },

    /// Consent was declined; only a reset is accepted
    #[error("session terminated after consent was declined")]
    Terminated,

    /// Record write rejected
    #[error("record error: {0}")]
    Record(#[from] RecordError),

    /// Final submission could not be persisted; the session stays at review
    #[error("submission failed: {0}")]
    Submission(#[from] SinkError),
}

impl SessionError {
    /// Check whether the user can fix this by editing the current step
    #[inline]
    #[must_use]
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Record(_))
    }
}

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;
