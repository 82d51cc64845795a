//! MDR classification - determines whether the system is a medical device
//! and, if so, its risk class.
//!
//! Inputs A (medical purpose) and C (clinical interpretation) are pulled
//! from the DPIA on every evaluation; a known DPIA answer always wins over
//! whatever the user entered while it was still open. B and D are never
//! stored: B is the negation of A, D mirrors C.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::dpia::DpiaSignals;
use crate::domain::foundation::{
    AnswerEntry, AnswerSet, AnswerSource, QuestionNode, QuestionTemplate, TriState,
};

pub const MEDICAL_PURPOSE: &str = "MDR-A";
pub const ADMINISTRATIVE_ONLY: &str = "MDR-B";
pub const CLINICAL_INTERPRETATION: &str = "MDR-C";
pub const SUPPORTS_CLINICAL_DECISION: &str = "MDR-D";
pub const HARM_SEVERITY: &str = "MDR-E";

pub static MDR_QUESTIONS: [QuestionTemplate; 5] = [
    QuestionTemplate::new(
        MEDICAL_PURPOSE,
        "Is the software intended by the manufacturer for a medical purpose?",
    ),
    QuestionTemplate::new(
        ADMINISTRATIVE_ONLY,
        "Is the software used for administrative or storage purposes only?",
    ),
    QuestionTemplate::new(
        CLINICAL_INTERPRETATION,
        "Does the software interpret or analyse clinical data?",
    ),
    QuestionTemplate::new(
        SUPPORTS_CLINICAL_DECISION,
        "Does the software provide information used for diagnostic or therapeutic decisions?",
    ),
    QuestionTemplate::new(
        HARM_SEVERITY,
        "What is the worst possible harm if the software's information is wrong?",
    ),
];

/// Worst-case harm severity, answer E.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmSeverity {
    FatalOrIrreversible,
    Serious,
    NonSerious,
    NoHarm,
}

impl HarmSeverity {
    /// Parses a free-text severity label; returns None for unrecognized text.
    pub fn parse(label: &str) -> Option<HarmSeverity> {
        let normalized = label.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "fatal" | "irreversible" | "fatal/irreversible" | "fatal-or-irreversible" => {
                Some(HarmSeverity::FatalOrIrreversible)
            }
            "serious" => Some(HarmSeverity::Serious),
            "non-serious" | "not-serious" => Some(HarmSeverity::NonSerious),
            "none" | "no-harm" => Some(HarmSeverity::NoHarm),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HarmSeverity::FatalOrIrreversible => "fatal/irreversible",
            HarmSeverity::Serious => "serious",
            HarmSeverity::NonSerious => "non-serious",
            HarmSeverity::NoHarm => "none",
        }
    }
}

/// Answer E as read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SeverityAnswer {
    Empty,
    Known(HarmSeverity),
    Unrecognized(String),
}

impl SeverityAnswer {
    fn read(answers: &AnswerSet) -> Self {
        match answers.choice(HARM_SEVERITY) {
            None => SeverityAnswer::Empty,
            Some(label) => match HarmSeverity::parse(label) {
                Some(severity) => SeverityAnswer::Known(severity),
                None => SeverityAnswer::Unrecognized(label.to_string()),
            },
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, SeverityAnswer::Empty)
    }

    fn label(&self) -> Option<String> {
        match self {
            SeverityAnswer::Empty => None,
            SeverityAnswer::Known(s) => Some(s.label().to_string()),
            SeverityAnswer::Unrecognized(raw) => Some(raw.clone()),
        }
    }
}

/// Medical device classification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MdrClass {
    #[default]
    Unknown,
    NotMedicalDevice,
    ClassI,
    ClassIIa,
    ClassIIb,
    ClassIII,
}

impl MdrClass {
    /// Contribution to the overall risk score; None while unknown.
    pub fn score(&self) -> Option<u8> {
        match self {
            MdrClass::Unknown => None,
            MdrClass::NotMedicalDevice => Some(0),
            MdrClass::ClassI => Some(1),
            MdrClass::ClassIIa => Some(2),
            MdrClass::ClassIIb => Some(3),
            MdrClass::ClassIII => Some(4),
        }
    }

    /// Yes for IIa and higher, No for not-a-device and class I.
    pub fn is_high_risk(&self) -> TriState {
        match self {
            MdrClass::Unknown => TriState::Unknown,
            MdrClass::NotMedicalDevice | MdrClass::ClassI => TriState::No,
            MdrClass::ClassIIa | MdrClass::ClassIIb | MdrClass::ClassIII => TriState::Yes,
        }
    }

    /// Yes for any device class, No when not a medical device.
    pub fn is_medical_device(&self) -> TriState {
        match self {
            MdrClass::Unknown => TriState::Unknown,
            MdrClass::NotMedicalDevice => TriState::No,
            _ => TriState::Yes,
        }
    }
}

impl fmt::Display for MdrClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MdrClass::Unknown => "unknown",
            MdrClass::NotMedicalDevice => "not a medical device",
            MdrClass::ClassI => "class I",
            MdrClass::ClassIIa => "class IIa",
            MdrClass::ClassIIb => "class IIb",
            MdrClass::ClassIII => "class III",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MdrResult {
    pub questions: Vec<QuestionNode>,
    pub class: MdrClass,
    pub explanation: String,
    pub is_complete: bool,
}

/// Engine for the MDR classification questions.
#[derive(Debug, Clone)]
pub struct MdrEngine {
    dpia: DpiaSignals,
    answers: AnswerSet,
}

impl MdrEngine {
    pub fn new(dpia: DpiaSignals, answers: AnswerSet) -> Self {
        Self { dpia, answers }
    }

    /// Returns true if a user edit to `code` would be accepted right now.
    ///
    /// A and C accept edits only while their effective value is empty;
    /// B and D are never stored.
    pub fn accepts(&self, code: &str) -> bool {
        match code {
            MEDICAL_PURPOSE => !self.medical_purpose().0.is_known(),
            CLINICAL_INTERPRETATION => !self.clinical_interpretation().0.is_known(),
            HARM_SEVERITY => true,
            _ => false,
        }
    }

    /// Applies the accepted entries and returns the ignored codes.
    pub fn set_answers(&mut self, entries: &[AnswerEntry]) -> Vec<String> {
        let mut ignored = Vec::new();
        for entry in entries {
            if self.accepts(&entry.code) {
                self.answers.insert(entry.code.clone(), entry.value.clone());
            } else {
                ignored.push(entry.code.clone());
            }
        }
        ignored
    }

    fn medical_purpose(&self) -> (TriState, AnswerSource) {
        if self.dpia.medical_purpose.is_known() {
            (self.dpia.medical_purpose, AnswerSource::Prefilled)
        } else {
            (self.answers.tri(MEDICAL_PURPOSE), AnswerSource::Manual)
        }
    }

    fn clinical_interpretation(&self) -> (TriState, AnswerSource) {
        if self.medical_purpose().0.is_no() {
            (TriState::No, AnswerSource::Derived)
        } else if self.dpia.clinical_interpretation.is_known() {
            (self.dpia.clinical_interpretation, AnswerSource::Prefilled)
        } else {
            (self.answers.tri(CLINICAL_INTERPRETATION), AnswerSource::Manual)
        }
    }

    pub fn result(&self) -> MdrResult {
        let (a, a_source) = self.medical_purpose();
        let b = a.negate();
        let (c, c_source) = self.clinical_interpretation();
        let d = c;
        let e = SeverityAnswer::read(&self.answers);

        let (class, explanation, force_no_harm) = decide(a, b, c, d, &e);

        let e_label = if force_no_harm {
            Some(HarmSeverity::NoHarm.label().to_string())
        } else {
            e.label()
        };
        let e_source = if force_no_harm {
            AnswerSource::Derived
        } else {
            AnswerSource::Manual
        };

        let questions = vec![
            QuestionNode::from_template(&MDR_QUESTIONS[0], a, a_source),
            QuestionNode::from_template(&MDR_QUESTIONS[1], b, AnswerSource::Derived),
            QuestionNode::from_template(&MDR_QUESTIONS[2], c, c_source),
            QuestionNode::from_template(&MDR_QUESTIONS[3], d, AnswerSource::Derived),
            QuestionNode::from_template(&MDR_QUESTIONS[4], TriState::Unknown, e_source)
                .with_choice(e_label),
        ];

        MdrResult {
            questions,
            class,
            explanation,
            is_complete: class != MdrClass::Unknown,
        }
    }
}

/// The classification decision tree. Returns the class, its explanation,
/// and whether E is forced to "none".
fn decide(
    a: TriState,
    b: TriState,
    c: TriState,
    d: TriState,
    e: &SeverityAnswer,
) -> (MdrClass, String, bool) {
    if !a.is_known() && !b.is_known() && !c.is_known() && !d.is_known() && e.is_empty() {
        return (
            MdrClass::Unknown,
            "No MDR questions answered yet.".to_string(),
            false,
        );
    }

    if a.is_no() {
        return (
            MdrClass::NotMedicalDevice,
            "The software has no medical purpose and is not a medical device.".to_string(),
            true,
        );
    }

    if a.is_yes() && c.is_no() && d.is_no() {
        return (
            MdrClass::ClassI,
            "Medical purpose without clinical interpretation or decision support: class I."
                .to_string(),
            true,
        );
    }

    if !a.is_known() || !b.is_known() || !c.is_known() || !d.is_known() || e.is_empty() {
        return (
            MdrClass::Unknown,
            "Not all MDR questions are answered; the class cannot be determined yet.".to_string(),
            false,
        );
    }

    if b.is_yes() {
        return (
            MdrClass::NotMedicalDevice,
            "The software serves administrative purposes only and is not a medical device."
                .to_string(),
            false,
        );
    }

    if !c.is_yes() || !d.is_yes() {
        return (
            MdrClass::ClassI,
            "The software does not both interpret clinical data and support clinical decisions: class I."
                .to_string(),
            false,
        );
    }

    match e {
        SeverityAnswer::Known(HarmSeverity::FatalOrIrreversible) => (
            MdrClass::ClassIII,
            "Wrong information may cause death or irreversible deterioration: class III."
                .to_string(),
            false,
        ),
        SeverityAnswer::Known(HarmSeverity::Serious) => (
            MdrClass::ClassIIb,
            "Wrong information may cause serious deterioration or surgery: class IIb.".to_string(),
            false,
        ),
        SeverityAnswer::Known(HarmSeverity::NonSerious) => (
            MdrClass::ClassIIa,
            "Wrong information may cause non-serious harm: class IIa.".to_string(),
            false,
        ),
        // "none" and unrecognized labels both fall back to class I.
        SeverityAnswer::Known(HarmSeverity::NoHarm)
        | SeverityAnswer::Unrecognized(_)
        | SeverityAnswer::Empty => (
            MdrClass::ClassI,
            "Decision-supporting software without a recognised harm severity: class I."
                .to_string(),
            false,
        ),
    }
}
