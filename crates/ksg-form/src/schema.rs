//! Field layout of each data-entry step
//!
//! Keys are the stable column names of the persisted store. Labels are kept
//! short; presentation belongs to the rendering layer.

use crate::coercion::{resolve_default_index, resolve_time_value_or};
use crate::error::{InputError, RecordError};
use crate::record::ResponseRecord;
use crate::step::Step;
use crate::value::{FieldValue, DATE_FORMAT};
use chrono::{Datelike, NaiveDate, NaiveTime};

/// Yes / No answers
pub const YES_NO: &[&str] = &["Yes", "No"];

/// Value the consent field must hold to leave step 1
pub const CONSENT_GIVEN: &str = "Yes";

const GENDER: &[&str] = &["Male", "Female", "Other"];
const DAIRY_PARTNER: &[&str] = &[
    "Schreiber Dynamix",
    "Govid dairy",
    "Sunfresh dairy",
    "Parag Dairy",
    "Other",
];
const STATE: &[&str] = &["Maharashtra", "Andhra Pradesh", "Tamil Nadu", "Karnataka", "Other"];
const CENTRE_TYPE: &[&str] = &["BMC", "VLC", "CC"];
const PROCUREMENT: &[&str] = &["Producer-based", "Agent-based", "Institutional", "Other"];
const PLASTIC: &[&str] = &[
    "10-30%",
    "40-50%",
    "More than 50%",
    "100%",
    "Do not know/can't say",
];
const CLEANING: &[&str] = &[
    "Only in the morning",
    "Only in the evening",
    "Both in the morning and evening",
    "Do not know/cannot say",
];
const PAYMENT_SCHEDULE: &[&str] = &[
    "Every 10th day in a month",
    "Twice a month",
    "Once a month",
    "No specific schedule",
];
const PAYMENT_METHOD: &[&str] = &["Cash", "Bank transfer", "Both"];
const SURROUNDINGS: &[&str] = &["No accumulation of water", "Accumulation of water"];
const RATING_1_5: &[&str] = &["1 (Most Unclean)", "2", "3", "4", "5 (Very Clean)"];
const RATING_1_3: &[&str] = &["Very unclean", "Unclean", "Clean"];
const SAMPLER_SHELVES: &[&str] = &["Yes", "No", "No, kept on the floor"];
const PUMP_LEAK: &[&str] = &["No leaking", "Yes, leaks"];

/// How a field is entered and what it defaults to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldInput {
    /// Free text, default empty
    Text,
    /// Bounded whole number
    Integer {
        /// Smallest accepted value
        min: i64,
        /// Largest accepted value, unbounded when `None`
        max: Option<i64>,
        /// Value offered when nothing is stored
        default: i64,
    },
    /// A year between `min` and the current year
    Year {
        /// Earliest accepted year
        min: i64,
        /// Year offered when nothing is stored
        default: i64,
    },
    /// Calendar date, default today
    Date,
    /// Time of day, default the current minute
    Time,
    /// One of a fixed list, default the first option
    Choice(&'static [&'static str]),
}

/// One labeled input of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Record key, also the CSV column name
    pub key: &'static str,
    /// Prompt shown to the interviewer
    pub label: &'static str,
    /// Entry kind and default
    pub input: FieldInput,
}

const fn text(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { key, label, input: FieldInput::Text }
}

const fn count(key: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        label,
        input: FieldInput::Integer { min: 0, max: None, default: 0 },
    }
}

const fn choice(key: &'static str, label: &'static str, options: &'static [&'static str]) -> FieldSpec {
    FieldSpec { key, label, input: FieldInput::Choice(options) }
}

const CONSENT_FIELDS: &[FieldSpec] = &[
    choice("consent", "Do you agree to participate in this survey?", YES_NO),
    choice("photo_permission", "Do you give permission for taking pictures?", YES_NO),
    text("respondent_signature", "Respondent signature"),
    text("interviewer_signature", "Interviewer signature"),
    FieldSpec { key: "consent_date", label: "Date", input: FieldInput::Date },
];

const IDENTIFICATION_FIELDS: &[FieldSpec] = &[
    text("bmc_name", "Name of the BMC/MCC"),
    FieldSpec {
        key: "year_establishment",
        label: "Year of establishment",
        input: FieldInput::Year { min: 1900, default: 2000 },
    },
    text("bmc_contact", "BMC manager contact"),
    text("respondent_name", "Respondent name"),
    choice("gender", "Gender", GENDER),
    choice("dairy_partner", "Dairy partner", DAIRY_PARTNER),
    choice("state", "State", STATE),
    text("district", "District"),
    text("block", "Block"),
    choice("centre_type", "Type of centre", CENTRE_TYPE),
    FieldSpec { key: "interview_date", label: "Interview date", input: FieldInput::Date },
    FieldSpec { key: "start_time", label: "Start time", input: FieldInput::Time },
    FieldSpec { key: "end_time", label: "End time", input: FieldInput::Time },
];

const OPERATION_FIELDS: &[FieldSpec] = &[
    choice("procurement_model", "Procurement model", PROCUREMENT),
    count("agents_daily", "Average number of agents/farmers per day"),
    count("staff_count", "Number of staff"),
    count("agents_count", "Number of agents"),
    count("farmers_count", "Number of dairy farmers"),
    count("morning_male_farmers", "Male farmers pouring milk (morning)"),
    count("morning_female_farmers", "Female farmers pouring milk (morning)"),
    count("evening_male_farmers", "Male farmers pouring milk (evening)"),
    count("evening_female_farmers", "Female farmers pouring milk (evening)"),
    choice("plastic_containers", "% using plastic containers", PLASTIC),
    choice("cleaning_frequency", "How often accessories are cleaned", CLEANING),
    choice("milk_records", "Maintain milk records?", YES_NO),
    choice("payment_schedule", "Payment schedule", PAYMENT_SCHEDULE),
    choice("payment_method", "Payment method", PAYMENT_METHOD),
];

const OBSERVATION_FIELDS: &[FieldSpec] = &[
    choice("fssai_certified", "FSSAI certification available?", YES_NO),
    choice("sop_guidelines", "SOP guidelines available (not older than 3 years)?", YES_NO),
    choice("weigh_scale_cert", "Weigh scale certificate available?", YES_NO),
    choice("surroundings_clean", "Surroundings free from waste and water accumulation?", SURROUNDINGS),
    choice("bmc_cleanliness", "BMC cleanliness", RATING_1_5),
    choice("cooler_temp", "Cooler operating at 4°C or below?", YES_NO),
    choice("churner_cleanliness", "Churner cleanliness", RATING_1_3),
    choice("accessories_cleanliness", "Accessories cleanliness", RATING_1_3),
    choice("cleaning_solution", "Cleaning solution available?", YES_NO),
    choice("samplers_clean", "Samplers/plungers/dippers clean?", YES_NO),
    choice("hot_water", "Hot water available for cleaning?", YES_NO),
    choice("samplers_shelves", "Samplers kept on dedicated shelves?", SAMPLER_SHELVES),
    choice("nylon_cloth_clean", "Nylon sieve/cloth clean?", YES_NO),
    choice("operator_wash_hands", "Operator washes hands routinely?", YES_NO),
    choice("chemicals_expiry", "Chemicals within expiry date?", YES_NO),
    choice("tank_clean", "Tank properly cleaned?", YES_NO),
    choice("pump_leak", "Pump seal leaks?", PUMP_LEAK),
];

/// Fields rendered at `step`; empty for review and confirmation
#[must_use]
pub fn fields(step: Step) -> &'static [FieldSpec] {
    match step {
        Step::Consent => CONSENT_FIELDS,
        Step::Identification => IDENTIFICATION_FIELDS,
        Step::Operation => OPERATION_FIELDS,
        Step::Observation => OBSERVATION_FIELDS,
        Step::Review | Step::Confirmation => &[],
    }
}

/// Look up a field by key across all steps
#[must_use]
pub fn field(key: &str) -> Option<&'static FieldSpec> {
    Step::ALL
        .iter()
        .flat_map(|s| fields(*s).iter())
        .find(|f| f.key == key)
}

impl FieldSpec {
    /// Value the field shows when rendered against `record`
    ///
    /// Stored values win; choices resolve through their option list so a
    /// stale label falls back to the first option.
    #[must_use]
    pub fn initial_value(&self, record: &ResponseRecord, today: NaiveDate, now: NaiveTime) -> FieldValue {
        let stored = record.get(self.key);
        match self.input {
            FieldInput::Choice(options) => {
                let idx = resolve_default_index(options, stored, 0);
                FieldValue::choice(options[idx])
            }
            FieldInput::Time => FieldValue::Time(resolve_time_value_or(stored, now)),
            FieldInput::Text => match stored {
                Some(v @ FieldValue::Text(_)) => v.clone(),
                _ => FieldValue::text(""),
            },
            FieldInput::Integer { default, .. } | FieldInput::Year { default, .. } => match stored {
                Some(v @ FieldValue::Integer(_)) => v.clone(),
                _ => FieldValue::Integer(default),
            },
            FieldInput::Date => match stored {
                Some(v @ FieldValue::Date(_)) => v.clone(),
                _ => FieldValue::Date(today),
            },
        }
    }

    /// Option labels of a choice field
    #[must_use]
    pub fn options(&self) -> Option<&'static [&'static str]> {
        match self.input {
            FieldInput::Choice(options) => Some(options),
            _ => None,
        }
    }

    /// Parse an answer typed by the user
    ///
    /// Choices accept either the exact label or its 1-based position.
    pub fn parse(&self, raw: &str, today: NaiveDate) -> Result<FieldValue, InputError> {
        let raw = raw.trim();
        match self.input {
            FieldInput::Text => Ok(FieldValue::text(raw)),
            FieldInput::Integer { min, max, .. } => {
                parse_bounded(raw, min, max.unwrap_or(i64::MAX))
            }
            FieldInput::Year { min, .. } => parse_bounded(raw, min, i64::from(today.year())),
            FieldInput::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map(FieldValue::Date)
                .map_err(|_| InputError::BadDate(raw.to_string())),
            FieldInput::Time => NaiveTime::parse_from_str(raw, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
                .map(FieldValue::Time)
                .map_err(|_| InputError::BadTime(raw.to_string())),
            FieldInput::Choice(options) => {
                if let Some(label) = options.iter().find(|o| **o == raw) {
                    return Ok(FieldValue::choice(*label));
                }
                raw.parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| options.get(i))
                    .map(|label| FieldValue::choice(*label))
                    .ok_or_else(|| InputError::UnknownOption(raw.to_string()))
            }
        }
    }
}

fn parse_bounded(raw: &str, min: i64, max: i64) -> Result<FieldValue, InputError> {
    let value: i64 = raw
        .parse()
        .map_err(|_| InputError::NotAnInteger(raw.to_string()))?;
    if value < min || value > max {
        return Err(InputError::OutOfRange { value, min, max });
    }
    Ok(FieldValue::Integer(value))
}

/// Write the initial value of every field of `step` not yet in `record`
pub fn apply_defaults(
    step: Step,
    record: &mut ResponseRecord,
    today: NaiveDate,
    now: NaiveTime,
) -> Result<(), RecordError> {
    for spec in fields(step) {
        if !record.contains(spec.key) {
            let value = spec.initial_value(record, today, now);
            record.set(spec.key, value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 14).unwrap()
    }

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn keys_are_unique_across_steps() {
        let mut seen = HashSet::new();
        for step in Step::ALL {
            for f in fields(step) {
                assert!(seen.insert(f.key), "duplicate key {}", f.key);
            }
        }
        assert!(!seen.contains(crate::record::SUBMISSION_ID_KEY));
    }

    #[test]
    fn defaults_fill_only_missing_fields() {
        let mut record = ResponseRecord::new();
        record.set("staff_count", FieldValue::Integer(7)).unwrap();
        apply_defaults(Step::Operation, &mut record, today(), noon()).unwrap();

        assert_eq!(record.get("staff_count"), Some(&FieldValue::Integer(7)));
        assert_eq!(record.get("agents_daily"), Some(&FieldValue::Integer(0)));
        assert_eq!(record.get_str("procurement_model"), Some("Producer-based"));
        assert_eq!(record.len(), OPERATION_FIELDS.len());
    }

    #[test]
    fn identification_defaults() {
        let mut record = ResponseRecord::new();
        apply_defaults(Step::Identification, &mut record, today(), noon()).unwrap();
        assert_eq!(record.get("year_establishment"), Some(&FieldValue::Integer(2000)));
        assert_eq!(record.get("interview_date"), Some(&FieldValue::Date(today())));
        assert_eq!(record.get("start_time"), Some(&FieldValue::Time(noon())));
        assert_eq!(record.get_str("bmc_name"), Some(""));
    }

    #[test]
    fn stale_choice_resolves_to_first_option() {
        let mut record = ResponseRecord::new();
        record.set("gender", FieldValue::choice("Unknown")).unwrap();
        let spec = field("gender").unwrap();
        assert_eq!(
            spec.initial_value(&record, today(), noon()),
            FieldValue::choice("Male")
        );
    }

    #[test]
    fn time_stored_as_text_is_recovered() {
        let mut record = ResponseRecord::new();
        record.set("end_time", FieldValue::text("16:20:00")).unwrap();
        let spec = field("end_time").unwrap();
        assert_eq!(
            spec.initial_value(&record, today(), noon()),
            FieldValue::Time(NaiveTime::from_hms_opt(16, 20, 0).unwrap())
        );
    }

    #[test]
    fn choice_accepts_label_or_position() {
        let spec = field("payment_method").unwrap();
        assert_eq!(spec.parse("Both", today()), Ok(FieldValue::choice("Both")));
        assert_eq!(spec.parse("2", today()), Ok(FieldValue::choice("Bank transfer")));
        assert_eq!(
            spec.parse("4", today()),
            Err(InputError::UnknownOption("4".into()))
        );
    }

    #[test]
    fn year_is_bounded_by_current_year() {
        let spec = field("year_establishment").unwrap();
        assert_eq!(spec.parse("1999", today()), Ok(FieldValue::Integer(1999)));
        assert_eq!(
            spec.parse("2030", today()),
            Err(InputError::OutOfRange { value: 2030, min: 1900, max: 2025 })
        );
        assert!(matches!(spec.parse("soon", today()), Err(InputError::NotAnInteger(_))));
    }

    #[test]
    fn counts_reject_negatives() {
        let spec = field("staff_count").unwrap();
        assert!(matches!(spec.parse("-1", today()), Err(InputError::OutOfRange { .. })));
    }

    #[test]
    fn time_accepts_short_form() {
        let spec = field("start_time").unwrap();
        assert_eq!(
            spec.parse("08:15", today()),
            Ok(FieldValue::Time(NaiveTime::from_hms_opt(8, 15, 0).unwrap()))
        );
    }
}
