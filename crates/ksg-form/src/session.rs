//! Session state and the step controller
//!
//! A [`FormSession`] owns the current step and the single response record of
//! one interview. The rendering layer reads the active step, writes answers
//! through [`FormSession::set_field`], and drives transitions with
//! [`FormSession::apply`]. Nothing here is shared between sessions.

use crate::error::{SessionError, SessionResult, SinkError, ValidationError};
use crate::record::{ResponseRecord, SUBMISSION_ID_KEY};
use crate::schema::{self, CONSENT_GIVEN};
use crate::step::{self, Action, Step};
use crate::value::FieldValue;
use chrono::{NaiveDate, NaiveTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of one form session, used for log correlation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Generate a fresh session id
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether the session still accepts navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Normal operation
    Active,
    /// Consent declined; only reset is accepted
    Terminated,
}

/// Result of a transition that was accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The session is now at this step
    Moved(Step),
    /// Consent was declined and the session stopped at step 1
    Terminated,
}

/// A finalized record ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Generated once per successful submission
    pub id: Uuid,
    /// Every answer in string form, `submission_id` last
    pub fields: IndexMap<String, String>,
}

/// Destination of final submissions
///
/// Implemented by the persisted store; tests substitute in-memory sinks.
pub trait SubmissionSink {
    /// Durably append one submission
    fn append(&self, submission: &Submission) -> Result<(), SinkError>;
}

impl<S: SubmissionSink + ?Sized> SubmissionSink for &S {
    fn append(&self, submission: &Submission) -> Result<(), SinkError> {
        (**self).append(submission)
    }
}

/// State of one survey interview
#[derive(Debug, Clone)]
pub struct FormSession {
    id: SessionId,
    step: Step,
    status: SessionStatus,
    record: ResponseRecord,
    submission_id: Option<Uuid>,
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FormSession {
    /// Start a session at the consent step with an empty record
    #[must_use]
    pub fn new() -> Self {
        let id = SessionId::new();
        tracing::debug!(session = %id, "session started");
        Self {
            id,
            step: Step::Consent,
            status: SessionStatus::Active,
            record: ResponseRecord::new(),
            submission_id: None,
        }
    }

    /// Session identifier
    #[inline]
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Active step
    #[inline]
    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    /// Active or terminated
    #[inline]
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Read access to the response record
    #[inline]
    #[must_use]
    pub fn record(&self) -> &ResponseRecord {
        &self.record
    }

    /// Id assigned by the last successful submission
    #[inline]
    #[must_use]
    pub fn submission_id(&self) -> Option<Uuid> {
        self.submission_id
    }

    /// Actions the rendering layer may offer right now
    #[must_use]
    pub fn valid_actions(&self) -> Vec<Action> {
        match self.status {
            SessionStatus::Terminated => vec![Action::Reset],
            SessionStatus::Active => step::valid_actions(self.step),
        }
    }

    /// Write one answer; only data-entry steps are editable
    ///
    /// The submission id key is owned by [`FormSession::submit`] and is
    /// rejected here.
    pub fn set_field(&mut self, key: &str, value: FieldValue) -> SessionResult<()> {
        if self.status == SessionStatus::Terminated {
            return Err(SessionError::Terminated);
        }
        if !self.step.is_data_entry() {
            return Err(SessionError::ReadOnly { step: self.step });
        }
        if key == SUBMISSION_ID_KEY {
            return Err(SessionError::ReservedField {
                key: key.to_string(),
            });
        }
        self.record.set(key, value)?;
        Ok(())
    }

    /// Fill every unset field of the active step with its default
    pub fn accept_defaults(&mut self, today: NaiveDate, now: NaiveTime) -> SessionResult<()> {
        if self.status == SessionStatus::Terminated {
            return Err(SessionError::Terminated);
        }
        schema::apply_defaults(self.step, &mut self.record, today, now)?;
        Ok(())
    }

    /// Dispatch a user action
    pub fn apply(&mut self, action: Action, sink: &dyn SubmissionSink) -> SessionResult<Outcome> {
        match action {
            Action::Next => self.advance(),
            Action::Back => self.back(),
            Action::Submit => self.submit(sink),
            Action::Reset => self.reset(),
        }
    }

    /// Save and move forward one step
    ///
    /// Leaving consent requires `consent == "Yes"` and both signatures.
    /// Declining consent terminates the session instead of moving.
    pub fn advance(&mut self) -> SessionResult<Outcome> {
        let to = self.check(Action::Next)?;
        if self.step == Step::Consent {
            if self.record.get_str("consent") != Some(CONSENT_GIVEN) {
                self.status = SessionStatus::Terminated;
                tracing::warn!(session = %self.id, "consent declined, session terminated");
                return Ok(Outcome::Terminated);
            }
            if !self.has_signature("respondent_signature")
                || !self.has_signature("interviewer_signature")
            {
                tracing::warn!(session = %self.id, "consent step missing signatures");
                return Err(ValidationError::MissingSignatures.into());
            }
        }
        Ok(self.move_to(to))
    }

    /// Move back one step, keeping every answer
    pub fn back(&mut self) -> SessionResult<Outcome> {
        let to = self.check(Action::Back)?;
        Ok(self.move_to(to))
    }

    /// Persist the record and move to the confirmation page
    ///
    /// Each call made from the review step writes one row; there is no
    /// deduplication here. On sink failure the session stays at review and
    /// no submission id is recorded.
    pub fn submit(&mut self, sink: &dyn SubmissionSink) -> SessionResult<Outcome> {
        let to = self.check(Action::Submit)?;
        let id = Uuid::new_v4();

        // Stage the record first so nothing can fail after the sink accepts.
        let mut staged = self.record.clone();
        staged.remove(SUBMISSION_ID_KEY);
        staged.set(SUBMISSION_ID_KEY, FieldValue::text(id.to_string()))?;
        let submission = Submission {
            id,
            fields: staged.finalized(),
        };

        if let Err(e) = sink.append(&submission) {
            tracing::error!(session = %self.id, error = %e, "submission not persisted");
            return Err(e.into());
        }

        self.record = staged;
        self.submission_id = Some(id);
        tracing::info!(session = %self.id, submission = %id, "submission persisted");
        Ok(self.move_to(to))
    }

    /// Discard the record and start over at consent
    pub fn reset(&mut self) -> SessionResult<Outcome> {
        if self.status == SessionStatus::Active {
            self.check(Action::Reset)?;
        }
        let previous = self.id;
        *self = Self::new();
        tracing::info!(previous = %previous, session = %self.id, "session reset");
        Ok(Outcome::Moved(self.step))
    }

    fn check(&self, action: Action) -> SessionResult<Step> {
        if self.status == SessionStatus::Terminated {
            return Err(SessionError::Terminated);
        }
        step::target(self.step, action).ok_or(SessionError::InvalidAction {
            step: self.step,
            action,
        })
    }

    fn move_to(&mut self, to: Step) -> Outcome {
        tracing::info!(session = %self.id, from = %self.step, to = %to, "step transition");
        self.step = to;
        Outcome::Moved(to)
    }

    fn has_signature(&self, key: &str) -> bool {
        self.record
            .get(key)
            .is_some_and(|v| !v.to_string().trim().is_empty())
    }
}
