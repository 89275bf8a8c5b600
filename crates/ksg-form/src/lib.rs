//! Ksheersagar survey form
//!
//! The core of the survey intake:
//! - A response record of tagged field values shared by every step
//! - Coercion helpers that re-resolve stored answers for rendering
//! - The per-step field schema with defaults
//! - The step controller that gates transitions and hands finalized
//!   records to a [`SubmissionSink`]
//!
//! # Steps
//!
//! ```text
//! Consent → Identification → Operation → Observation → Review → Confirmation
//!    1            2              3            4           5          6
//! ```
//!
//! # Example
//!
//! ```rust
//! use ksg_form::{FieldValue, FormSession, Outcome, Step};
//!
//! let mut session = FormSession::new();
//! session.set_field("consent", FieldValue::choice("Yes")).unwrap();
//! session.set_field("respondent_signature", FieldValue::text("A")).unwrap();
//! session.set_field("interviewer_signature", FieldValue::text("B")).unwrap();
//! assert_eq!(session.advance().unwrap(), Outcome::Moved(Step::Identification));
//! ```

pub mod coercion;
pub mod error;
pub mod record;
pub mod schema;
pub mod session;
pub mod step;
pub mod value;

pub use coercion::{resolve_default_index, resolve_time_value, resolve_time_value_or};
pub use error::{InputError, RecordError, SessionError, SessionResult, SinkError, ValidationError};
pub use record::{ResponseRecord, SUBMISSION_ID_KEY};
pub use schema::{apply_defaults, FieldInput, FieldSpec};
pub use session::{FormSession, Outcome, SessionId, SessionStatus, Submission, SubmissionSink};
pub use step::{valid_actions, Action, Step};
pub use value::{FieldKind, FieldValue};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a form session
    pub use crate::{
        Action, FieldValue, FormSession, Outcome, ResponseRecord, SessionError, Step,
        SubmissionSink,
    };
}
