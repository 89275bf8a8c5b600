//! Line-oriented terminal renderer
//!
//! Draws the active step, binds typed answers into the session record and
//! offers only the actions the controller reports as valid. Reads from any
//! `BufRead` so sessions can be scripted.

use anyhow::Context;
use chrono::{Local, NaiveDate, NaiveTime};
use ksg_form::coercion::current_minute;
use ksg_form::schema::{self, FieldSpec};
use ksg_form::{Action, FormSession, Outcome, SessionError, Step};
use ksg_store::CsvStore;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Date and time used for field defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    /// Default for date fields
    pub today: NaiveDate,
    /// Default for time fields
    pub now: NaiveTime,
}

impl Clock {
    /// Local wall clock
    #[must_use]
    pub fn system() -> Self {
        Self {
            today: Local::now().date_naive(),
            now: current_minute(),
        }
    }
}

/// Why the renderer stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// User chose to quit
    Quit,
    /// Consent was declined
    Terminated,
    /// Input closed
    EndOfInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Action(Action),
    Export,
    Quit,
}

/// Terminal front-end over an input and an output stream
pub struct Terminal<R, W> {
    input: R,
    output: W,
    clock: Clock,
    export_dir: PathBuf,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    /// Create a renderer exporting into the working directory
    pub fn new(input: R, output: W, clock: Clock) -> Self {
        Self {
            input,
            output,
            clock,
            export_dir: PathBuf::from("."),
        }
    }

    /// With directory that receives exported files
    #[must_use]
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    /// Consume the renderer and return its output stream
    pub fn into_output(self) -> W {
        self.output
    }

    /// Drive `session` until the user quits, consent is declined or input ends
    pub fn run(&mut self, session: &mut FormSession, store: &CsvStore) -> anyhow::Result<Exit> {
        loop {
            let step = session.step();
            self.render_header(step)?;
            if step.is_data_entry() {
                if !self.edit_fields(session)? {
                    return Ok(Exit::EndOfInput);
                }
            } else if step == Step::Review {
                self.render_review(session)?;
            } else {
                self.render_confirmation(store)?;
            }

            let Some(choice) = self.prompt_choice(session)? else {
                return Ok(Exit::EndOfInput);
            };
            let action = match choice {
                Choice::Quit => return Ok(Exit::Quit),
                Choice::Export => {
                    self.export(store)?;
                    continue;
                }
                Choice::Action(action) => action,
            };

            match session.apply(action, store) {
                Ok(Outcome::Moved(_)) => {}
                Ok(Outcome::Terminated) => {
                    writeln!(
                        self.output,
                        "You must agree to participate to proceed. Survey terminated."
                    )?;
                    return Ok(Exit::Terminated);
                }
                Err(e) if e.is_user_correctable() => writeln!(self.output, "! {e}")?,
                Err(SessionError::Submission(e)) => {
                    writeln!(self.output, "! Could not save responses: {e}")?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn render_header(&mut self, step: Step) -> anyhow::Result<()> {
        writeln!(self.output)?;
        writeln!(
            self.output,
            "== {}. {} ==",
            step.number(),
            title(step)
        )?;
        if let Some((section, total)) = step.progress() {
            writeln!(self.output, "Progress: Section {section} of {total}")?;
        }
        Ok(())
    }

    /// Prompt every field of the active step; `false` when input ends
    fn edit_fields(&mut self, session: &mut FormSession) -> anyhow::Result<bool> {
        for spec in schema::fields(session.step()) {
            let Some(value) = self.prompt_field(spec, session)? else {
                return Ok(false);
            };
            session
                .set_field(spec.key, value)
                .with_context(|| format!("storing field '{}'", spec.key))?;
        }
        Ok(true)
    }

    fn prompt_field(
        &mut self,
        spec: &FieldSpec,
        session: &FormSession,
    ) -> anyhow::Result<Option<ksg_form::FieldValue>> {
        let current = spec.initial_value(session.record(), self.clock.today, self.clock.now);
        loop {
            if let Some(options) = spec.options() {
                writeln!(self.output, "{}", spec.label)?;
                for (i, option) in options.iter().enumerate() {
                    writeln!(self.output, "  {}) {option}", i + 1)?;
                }
                write!(self.output, "> [{current}] ")?;
            } else {
                write!(self.output, "{} [{current}]: ", spec.label)?;
            }
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            if line.trim().is_empty() {
                return Ok(Some(current));
            }
            match spec.parse(&line, self.clock.today) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => writeln!(self.output, "! {e}")?,
            }
        }
    }

    fn render_review(&mut self, session: &FormSession) -> anyhow::Result<()> {
        writeln!(self.output, "Please review your responses before submitting:")?;
        let rows = session.record().review_rows();
        let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (key, value) in rows {
            writeln!(self.output, "  {key:<width$}  {value}")?;
        }
        Ok(())
    }

    fn render_confirmation(&mut self, store: &CsvStore) -> anyhow::Result<()> {
        writeln!(
            self.output,
            "Your responses have been successfully submitted and saved."
        )?;
        match store.tail(store.tail_rows()) {
            Ok(tail) if !tail.is_empty() => {
                writeln!(
                    self.output,
                    "All submitted responses (last {}):",
                    store.tail_rows()
                )?;
                self.output.write_all(&tail.to_csv_bytes()?)?;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "could not load preview");
                writeln!(self.output, "! Could not load saved responses: {e}")?;
            }
        }
        Ok(())
    }

    fn export(&mut self, store: &CsvStore) -> anyhow::Result<()> {
        let bytes = store.export_bytes().context("reading store for export")?;
        if bytes.is_empty() {
            writeln!(self.output, "Nothing to export yet.")?;
            return Ok(());
        }
        let target = self.export_dir.join(store.export_file_name());
        std::fs::write(&target, &bytes)
            .with_context(|| format!("writing export {}", target.display()))?;
        tracing::info!(path = %target.display(), bytes = bytes.len(), "export written");
        writeln!(self.output, "Exported all responses to {}", target.display())?;
        Ok(())
    }

    fn prompt_choice(&mut self, session: &FormSession) -> anyhow::Result<Option<Choice>> {
        let mut choices: Vec<(char, &str, Choice)> = session
            .valid_actions()
            .into_iter()
            .map(|a| {
                let (key, label) = action_label(session.step(), a);
                (key, label, Choice::Action(a))
            })
            .collect();
        if session.step() == Step::Confirmation {
            choices.push(('e', "Download all responses as CSV", Choice::Export));
        }
        choices.push(('q', "Quit", Choice::Quit));

        loop {
            let menu: Vec<String> = choices
                .iter()
                .map(|(key, label, _)| format!("[{key}] {label}"))
                .collect();
            write!(self.output, "{} > ", menu.join("  "))?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            let picked = line.trim().chars().next().map(|c| c.to_ascii_lowercase());
            if let Some((_, _, choice)) = choices.iter().find(|(key, _, _)| Some(*key) == picked) {
                return Ok(Some(*choice));
            }
            writeln!(self.output, "! Unknown choice '{}'", line.trim())?;
        }
    }

    fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        let mut buf = String::new();
        let n = self.input.read_line(&mut buf).context("reading input")?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim_end_matches(['\r', '\n']).to_string()))
    }
}

fn title(step: Step) -> &'static str {
    match step {
        Step::Consent => "Informed consent",
        Step::Identification => "Block 1: Identification",
        Step::Operation => "Block 2: BMC operation",
        Step::Observation => "Observation tool",
        Step::Review => "Finalize and submit",
        Step::Confirmation => "Thank you!",
    }
}

fn action_label(step: Step, action: Action) -> (char, &'static str) {
    match (step, action) {
        (Step::Consent, Action::Next) => ('n', "Next"),
        (Step::Observation, Action::Next) => ('n', "Review & submit"),
        (_, Action::Next) => ('n', "Save and next"),
        (_, Action::Back) => ('b', "Back"),
        (_, Action::Submit) => ('s', "Submit & save final"),
        (_, Action::Reset) => ('r', "Start new survey"),
    }
}
