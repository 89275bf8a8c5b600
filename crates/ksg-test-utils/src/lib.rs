//! Testing utilities for the Ksheersagar workspace
//!
//! Shared fixtures: sessions driven to a given step, in-memory sinks and
//! throwaway stores.

#![allow(missing_docs)]

use chrono::{NaiveDate, NaiveTime};
use ksg_form::{FieldValue, FormSession, SinkError, Step, Submission, SubmissionSink};
use ksg_store::{CsvStore, StoreConfig};
use parking_lot::Mutex;
use tempfile::TempDir;

pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

pub fn fixed_now() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 30, 0).unwrap()
}

/// Session at consent with consent given and both signatures filled
pub fn consented_session() -> FormSession {
    let mut session = FormSession::new();
    session.set_field("consent", FieldValue::choice("Yes")).unwrap();
    session
        .set_field("respondent_signature", FieldValue::text("Respondent"))
        .unwrap();
    session
        .set_field("interviewer_signature", FieldValue::text("Interviewer"))
        .unwrap();
    session
}

/// Fill the identification step with sample answers
pub fn fill_identification(session: &mut FormSession) {
    assert_eq!(session.step(), Step::Identification);
    let answers = [
        ("bmc_name", FieldValue::text("Shirur BMC")),
        ("year_establishment", FieldValue::Integer(2011)),
        ("bmc_contact", FieldValue::text("9800000000")),
        ("respondent_name", FieldValue::text("A. Jadhav")),
        ("gender", FieldValue::choice("Female")),
        ("dairy_partner", FieldValue::choice("Parag Dairy")),
        ("state", FieldValue::choice("Maharashtra")),
        ("district", FieldValue::text("Pune")),
        ("block", FieldValue::text("Shirur")),
        ("centre_type", FieldValue::choice("BMC")),
        ("interview_date", FieldValue::Date(fixed_today())),
        ("start_time", FieldValue::Time(fixed_now())),
        ("end_time", FieldValue::Time(NaiveTime::from_hms_opt(10, 15, 0).unwrap())),
    ];
    for (key, value) in answers {
        session.set_field(key, value).unwrap();
    }
}

/// Drive a fresh session to `target`, accepting defaults on every step
pub fn session_at(target: Step) -> FormSession {
    let mut session = consented_session();
    session.accept_defaults(fixed_today(), fixed_now()).unwrap();
    while session.step() < target && session.step() < Step::Review {
        session.advance().unwrap();
        session.accept_defaults(fixed_today(), fixed_now()).unwrap();
    }
    session
}

/// Sink that keeps submissions in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    submissions: Mutex<Vec<Submission>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().clone()
    }
}

impl SubmissionSink for RecordingSink {
    fn append(&self, submission: &Submission) -> Result<(), SinkError> {
        self.submissions.lock().push(submission.clone());
        Ok(())
    }
}

/// Sink that always fails
#[derive(Debug, Default)]
pub struct FailingSink;

impl SubmissionSink for FailingSink {
    fn append(&self, _submission: &Submission) -> Result<(), SinkError> {
        Err(SinkError::new("store unavailable"))
    }
}

/// Store in a fresh temporary directory; keep the `TempDir` alive
pub fn temp_store() -> (TempDir, CsvStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = CsvStore::new(StoreConfig::new().with_path(dir.path().join("responses.csv")));
    (dir, store)
}
