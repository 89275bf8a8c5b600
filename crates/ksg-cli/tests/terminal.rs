//! Scripted sessions through the terminal renderer

use ksg_cli::{Clock, Exit, Terminal};
use ksg_form::{FormSession, Step, SUBMISSION_ID_KEY};
use ksg_test_utils::{fixed_now, fixed_today, temp_store};
use std::io::Cursor;

fn clock() -> Clock {
    Clock {
        today: fixed_today(),
        now: fixed_now(),
    }
}

fn script(lines: &[&str]) -> Cursor<Vec<u8>> {
    let mut text = lines.join("\n");
    text.push('\n');
    Cursor::new(text.into_bytes())
}

fn blank(n: usize) -> Vec<&'static str> {
    vec![""; n]
}

#[test]
fn full_survey_submits_and_exports() {
    let (dir, store) = temp_store();

    let mut lines = vec!["1", "", "Respondent", "Interviewer", "", "n"];
    lines.extend(["Shirur BMC", "", "", "", "2"]);
    lines.extend(blank(8));
    lines.push("n");
    lines.extend(blank(14));
    lines.push("n");
    lines.extend(blank(17));
    lines.extend(["n", "s", "e", "q"]);

    let mut session = FormSession::new();
    let mut terminal =
        Terminal::new(script(&lines), Vec::new(), clock()).with_export_dir(dir.path());
    let exit = terminal.run(&mut session, &store).unwrap();
    let output = String::from_utf8(terminal.into_output()).unwrap();

    assert_eq!(exit, Exit::Quit);
    assert_eq!(session.step(), Step::Confirmation);
    assert!(output.contains("Progress: Section 1 of 4"));
    assert!(output.contains("Please review your responses before submitting:"));
    assert!(output.contains("successfully submitted and saved"));

    let table = store.read_all().unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(0, "bmc_name"), Some("Shirur BMC"));
    assert_eq!(table.get(0, "gender"), Some("Female"));
    assert_eq!(table.get(0, "year_establishment"), Some("2000"));
    assert_eq!(table.get(0, "start_time"), Some("09:30:00"));
    assert_eq!(table.get(0, "consent_date"), Some("2025-03-10"));
    let id = session.submission_id().unwrap().to_string();
    assert_eq!(table.get(0, SUBMISSION_ID_KEY), Some(id.as_str()));

    let exported = std::fs::read(dir.path().join(store.export_file_name())).unwrap();
    assert_eq!(exported, store.export_bytes().unwrap());
}

#[test]
fn declined_consent_terminates_without_persisting() {
    let (_dir, store) = temp_store();
    let mut session = FormSession::new();
    let mut terminal = Terminal::new(script(&["2", "", "", "", "", "n"]), Vec::new(), clock());

    let exit = terminal.run(&mut session, &store).unwrap();
    let output = String::from_utf8(terminal.into_output()).unwrap();

    assert_eq!(exit, Exit::Terminated);
    assert!(output.contains("Survey terminated"));
    assert_eq!(session.step(), Step::Consent);
    assert!(store.read_all().unwrap().is_empty());
}

#[test]
fn missing_signatures_reprompt_consent() {
    let (_dir, store) = temp_store();
    let mut session = FormSession::new();
    let lines = ["1", "", "", "", "", "n", "", "", "A", "B", "", "n"];
    let mut terminal = Terminal::new(script(&lines), Vec::new(), clock());

    let exit = terminal.run(&mut session, &store).unwrap();
    let output = String::from_utf8(terminal.into_output()).unwrap();

    assert_eq!(exit, Exit::EndOfInput);
    assert!(output.contains("signatures are required"));
    assert_eq!(session.step(), Step::Identification);
    assert_eq!(session.record().get_str("respondent_signature"), Some("A"));
}

#[test]
fn invalid_answer_is_reprompted() {
    let (_dir, store) = temp_store();
    let mut session = FormSession::new();
    let lines = ["maybe", "1", "", "A", "B", "", "x", "n"];
    let mut terminal = Terminal::new(script(&lines), Vec::new(), clock());

    terminal.run(&mut session, &store).unwrap();
    let output = String::from_utf8(terminal.into_output()).unwrap();

    assert!(output.contains("'maybe' is not one of the listed options"));
    assert!(output.contains("Unknown choice 'x'"));
    assert_eq!(session.step(), Step::Identification);
}

#[test]
fn back_from_review_keeps_answers() {
    let (_dir, store) = temp_store();
    let mut session = ksg_test_utils::session_at(Step::Review);
    let mut lines = vec!["b"];
    lines.extend(blank(16));
    lines.push("2");
    lines.extend(["n", "s", "q"]);
    let mut terminal = Terminal::new(script(&lines), Vec::new(), clock());

    assert_eq!(terminal.run(&mut session, &store).unwrap(), Exit::Quit);
    let table = store.read_all().unwrap();
    assert_eq!(table.get(0, "pump_leak"), Some("Yes, leaks"));
    assert_eq!(table.get(0, "bmc_name"), Some(""));
}
