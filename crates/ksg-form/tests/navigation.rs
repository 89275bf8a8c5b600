//! Navigation properties of the step controller

use chrono::{NaiveDate, NaiveTime};
use ksg_form::prelude::*;
use ksg_form::{SessionStatus, SinkError, Submission};
use proptest::prelude::*;

struct NullSink;

impl SubmissionSink for NullSink {
    fn append(&self, _submission: &Submission) -> Result<(), SinkError> {
        Ok(())
    }
}

fn session_at(step: Step) -> FormSession {
    let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
    let now = NaiveTime::from_hms_opt(10, 30, 0).unwrap();
    let mut session = FormSession::new();
    session.set_field("consent", FieldValue::choice("Yes")).unwrap();
    session
        .set_field("respondent_signature", FieldValue::text("Respondent"))
        .unwrap();
    session
        .set_field("interviewer_signature", FieldValue::text("Interviewer"))
        .unwrap();
    session.accept_defaults(today, now).unwrap();
    while session.step() < step {
        session.accept_defaults(today, now).unwrap();
        session.advance().unwrap();
    }
    session
}

fn middle_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Identification),
        Just(Step::Operation),
        Just(Step::Observation),
        Just(Step::Review),
    ]
}

fn any_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Next),
        Just(Action::Back),
        Just(Action::Submit),
        Just(Action::Reset),
    ]
}

proptest! {
    #[test]
    fn back_then_forward_is_identity(step in middle_step()) {
        let mut session = session_at(step);
        let before = session.record().clone();

        session.back().unwrap();
        session.advance().unwrap();

        prop_assert_eq!(session.step(), step);
        prop_assert_eq!(session.record(), &before);
    }

    #[test]
    fn step_stays_in_range(actions in proptest::collection::vec(any_action(), 0..40)) {
        let mut session = session_at(Step::Identification);
        for action in actions {
            let offered = session.valid_actions().contains(&action);
            let before = session.step();
            let result = session.apply(action, &NullSink);
            if !offered {
                prop_assert!(result.is_err());
                prop_assert_eq!(session.step(), before);
            }
            let n = session.step().number();
            prop_assert!((1..=Step::TERMINAL).contains(&n));
        }
    }

    #[test]
    fn consent_gate(
        consent in prop_oneof![Just("Yes"), Just("No")],
        respondent in prop_oneof![Just(""), Just("  "), Just("R")],
        interviewer in prop_oneof![Just(""), Just("I")],
    ) {
        let mut session = FormSession::new();
        session.set_field("consent", FieldValue::choice(consent)).unwrap();
        session.set_field("respondent_signature", FieldValue::text(respondent)).unwrap();
        session.set_field("interviewer_signature", FieldValue::text(interviewer)).unwrap();

        let allowed = consent == "Yes"
            && !respondent.trim().is_empty()
            && !interviewer.trim().is_empty();
        let result = session.advance();

        if allowed {
            prop_assert_eq!(session.step(), Step::Identification);
        } else {
            prop_assert_eq!(session.step(), Step::Consent);
            if consent == "No" {
                prop_assert!(matches!(result, Ok(Outcome::Terminated)));
                prop_assert_eq!(session.status(), SessionStatus::Terminated);
            } else {
                prop_assert!(result.is_err());
            }
        }
    }
}

#[test]
fn declined_session_never_leaves_consent() {
    let mut session = FormSession::new();
    session.set_field("consent", FieldValue::choice("No")).unwrap();
    session.advance().unwrap();
    for action in [Action::Next, Action::Back, Action::Submit] {
        assert!(matches!(
            session.apply(action, &NullSink),
            Err(SessionError::Terminated)
        ));
        assert_eq!(session.step(), Step::Consent);
    }
}

#[test]
fn missing_consent_counts_as_declined() {
    let mut session = FormSession::new();
    assert_eq!(session.advance().unwrap(), Outcome::Terminated);
}
