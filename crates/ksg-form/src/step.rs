//! Survey steps and the transition table between them

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of data-entry sections shown with a progress indicator
pub const PROGRESS_SECTIONS: u8 = 4;

/// One phase of the survey form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Step {
    /// Informed consent; entry state
    Consent,
    /// Block 1: identification of the centre and respondent
    Identification,
    /// Block 2: operation details
    Operation,
    /// On-site observation checklist
    Observation,
    /// Read-back of the full record before submission
    Review,
    /// Terminal confirmation page
    Confirmation,
}

/// User action offered by a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Save and go to the following step
    Next,
    /// Go to the preceding step
    Back,
    /// Persist the record (review step only)
    Submit,
    /// Discard the record and start over
    Reset,
}

impl Step {
    /// All steps in order
    pub const ALL: [Step; 6] = [
        Step::Consent,
        Step::Identification,
        Step::Operation,
        Step::Observation,
        Step::Review,
        Step::Confirmation,
    ];

    /// Terminal step number
    pub const TERMINAL: u8 = 6;

    /// 1-based step number
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Step::Consent => 1,
            Step::Identification => 2,
            Step::Operation => 3,
            Step::Observation => 4,
            Step::Review => 5,
            Step::Confirmation => 6,
        }
    }

    /// Step for a 1-based number, `None` outside `1..=6`
    #[must_use]
    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.number() == n)
    }

    /// Short lowercase name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Step::Consent => "consent",
            Step::Identification => "identification",
            Step::Operation => "operation",
            Step::Observation => "observation",
            Step::Review => "review",
            Step::Confirmation => "confirmation",
        }
    }

    /// `(section, total)` for the steps that show progress
    #[must_use]
    pub fn progress(self) -> Option<(u8, u8)> {
        match self {
            Step::Identification | Step::Operation | Step::Observation => {
                Some((self.number() - 1, PROGRESS_SECTIONS))
            }
            _ => None,
        }
    }

    /// True for the steps that carry input fields
    #[must_use]
    pub fn is_data_entry(self) -> bool {
        matches!(
            self,
            Step::Consent | Step::Identification | Step::Operation | Step::Observation
        )
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.name())
    }
}

/// Actions the rendering layer may offer at `step`
#[must_use]
pub fn valid_actions(step: Step) -> Vec<Action> {
    use Action::*;
    match step {
        Step::Consent => vec![Next],
        Step::Identification | Step::Operation | Step::Observation => vec![Back, Next],
        Step::Review => vec![Back, Submit],
        Step::Confirmation => vec![Reset],
    }
}

/// Step reached by taking `action` at `from`, ignoring guards
///
/// Returns `None` when the action is not offered at `from`.
#[must_use]
pub fn target(from: Step, action: Action) -> Option<Step> {
    if !valid_actions(from).contains(&action) {
        return None;
    }
    let to = match (from, action) {
        (_, Action::Reset) => Step::Consent,
        (Step::Review, Action::Submit) => Step::Confirmation,
        (_, Action::Next) => Step::from_number(from.number() + 1)?,
        (_, Action::Back) => Step::from_number(from.number() - 1)?,
        _ => return None,
    };
    Some(to)
}
