//! DPIA screening - decides whether a data protection impact assessment
//! is mandatory and scores the privacy risk of the procurement.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AnswerEntry, AnswerSet, AnswerSource, QuestionNode, QuestionTemplate, TriState,
};

pub const PERSONAL_DATA: &str = "DPIA-01";
pub const SPECIAL_CATEGORY: &str = "DPIA-02";
pub const LARGE_SCALE: &str = "DPIA-03";
pub const SYSTEMATIC_MONITORING: &str = "DPIA-04";
pub const AUTOMATED_DECISIONS: &str = "DPIA-05";
pub const VULNERABLE_SUBJECTS: &str = "DPIA-06";
pub const NEW_TECHNOLOGY: &str = "DPIA-07";
pub const MEDICAL_PURPOSE: &str = "DPIA-08";
pub const CLINICAL_INTERPRETATION: &str = "DPIA-09";
pub const AI_SYSTEM: &str = "DPIA-10";
pub const TRIAGE_ACCESS: &str = "DPIA-11";
pub const DIRECT_CLINICAL_DECISION: &str = "DPIA-12";
pub const INTERFACES: &str = "DPIA-13";
pub const OUTSIDE_EEA: &str = "DPIA-14";

/// The fourteen mandatory screening questions with their risk weights.
pub static DPIA_QUESTIONS: [QuestionTemplate; 14] = [
    QuestionTemplate::weighted(PERSONAL_DATA, "Are personal data processed by the system?", 1),
    QuestionTemplate::weighted(
        SPECIAL_CATEGORY,
        "Are special categories of personal data (e.g. health data) processed?",
        3,
    ),
    QuestionTemplate::weighted(LARGE_SCALE, "Are personal data processed on a large scale?", 2),
    QuestionTemplate::weighted(
        SYSTEMATIC_MONITORING,
        "Does the system systematically monitor people?",
        2,
    ),
    QuestionTemplate::weighted(
        AUTOMATED_DECISIONS,
        "Are automated decisions with legal or similar effects taken?",
        3,
    ),
    QuestionTemplate::weighted(
        VULNERABLE_SUBJECTS,
        "Are data of vulnerable people (patients, children) processed?",
        2,
    ),
    QuestionTemplate::weighted(
        NEW_TECHNOLOGY,
        "Is new or innovative technology being applied?",
        2,
    ),
    QuestionTemplate::weighted(
        MEDICAL_PURPOSE,
        "Is the system intended for a medical purpose (diagnosis, prevention, monitoring, treatment)?",
        3,
    ),
    QuestionTemplate::weighted(
        CLINICAL_INTERPRETATION,
        "Does the system interpret clinical data for individual patients?",
        3,
    ),
    QuestionTemplate::weighted(
        AI_SYSTEM,
        "Does the system use artificial intelligence or machine learning?",
        2,
    ),
    QuestionTemplate::weighted(
        TRIAGE_ACCESS,
        "Is the system used for triage or to decide access to essential care?",
        3,
    ),
    QuestionTemplate::weighted(
        DIRECT_CLINICAL_DECISION,
        "Does the system take or directly steer clinical decisions?",
        3,
    ),
    QuestionTemplate::weighted(
        INTERFACES,
        "Does the system exchange data with other systems?",
        1,
    ),
    QuestionTemplate::weighted(
        OUTSIDE_EEA,
        "Are data stored or processed outside the European Economic Area?",
        2,
    ),
];

/// Upstream values other engines pre-fill from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DpiaSignals {
    pub personal_data: TriState,
    pub special_category: TriState,
    pub automated_decisions: TriState,
    pub medical_purpose: TriState,
    pub clinical_interpretation: TriState,
    pub ai_system: TriState,
    pub triage_access: TriState,
    pub direct_clinical_decision: TriState,
    pub interfaces: TriState,
    pub outside_eea: TriState,
}

impl DpiaSignals {
    fn from_answers(answers: &AnswerSet) -> Self {
        Self {
            personal_data: answers.tri(PERSONAL_DATA),
            special_category: answers.tri(SPECIAL_CATEGORY),
            automated_decisions: answers.tri(AUTOMATED_DECISIONS),
            medical_purpose: answers.tri(MEDICAL_PURPOSE),
            clinical_interpretation: answers.tri(CLINICAL_INTERPRETATION),
            ai_system: answers.tri(AI_SYSTEM),
            triage_access: answers.tri(TRIAGE_ACCESS),
            direct_clinical_decision: answers.tri(DIRECT_CLINICAL_DECISION),
            interfaces: answers.tri(INTERFACES),
            outside_eea: answers.tri(OUTSIDE_EEA),
        }
    }
}

/// Outcome of the DPIA screening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpiaResult {
    pub questions: Vec<QuestionNode>,
    /// Whether a DPIA is mandatory; Unknown until every question is answered.
    pub requirement: TriState,
    /// Mean of (weight if Yes else 0) over all questions.
    pub risk_score: f64,
    pub explanation: String,
    pub is_complete: bool,
    pub signals: DpiaSignals,
}

/// Engine for the DPIA screening questionnaire.
#[derive(Debug, Clone)]
pub struct DpiaEngine<'a> {
    template: &'a [QuestionTemplate],
    answers: AnswerSet,
}

impl DpiaEngine<'static> {
    /// Creates an engine over the standard questionnaire.
    pub fn new(answers: AnswerSet) -> Self {
        Self::with_template(&DPIA_QUESTIONS, answers)
    }
}

impl<'a> DpiaEngine<'a> {
    pub fn with_template(template: &'a [QuestionTemplate], answers: AnswerSet) -> Self {
        Self { template, answers }
    }

    /// Returns true if `code` belongs to this questionnaire.
    pub fn accepts(&self, code: &str) -> bool {
        self.template.iter().any(|q| q.code == code)
    }

    /// Applies answers by code; unknown codes are returned and otherwise ignored.
    pub fn set_answers(&mut self, entries: &[AnswerEntry]) -> Vec<String> {
        let template = self.template;
        self.answers
            .apply_entries(entries, |code| template.iter().any(|q| q.code == code))
    }

    pub fn result(&self) -> DpiaResult {
        let signals = DpiaSignals::from_answers(&self.answers);
        let questions: Vec<QuestionNode> = self
            .template
            .iter()
            .map(|q| QuestionNode::from_template(q, self.answers.tri(q.code), AnswerSource::Manual))
            .collect();

        if questions.is_empty() {
            return DpiaResult {
                questions,
                requirement: TriState::Unknown,
                risk_score: 0.0,
                explanation: "No DPIA screening questions are configured; the requirement cannot be determined."
                    .to_string(),
                is_complete: false,
                signals,
            };
        }

        let risk_score = mean_weighted_yes(&questions);
        let is_complete = questions
            .iter()
            .filter(|q| q.mandatory)
            .all(|q| q.answer.is_known());

        let (requirement, explanation) = if !is_complete {
            let open = questions
                .iter()
                .filter(|q| q.mandatory && !q.answer.is_known())
                .count();
            (
                TriState::Unknown,
                format!(
                    "{} mandatory screening question(s) still open; the DPIA requirement is not yet known.",
                    open
                ),
            )
        } else if self.answers.tri(PERSONAL_DATA).is_no() {
            (
                TriState::No,
                "No personal data are processed; registering the processing is sufficient and no DPIA is required."
                    .to_string(),
            )
        } else if questions.iter().any(|q| q.answer.is_yes()) {
            let triggers: Vec<&str> = questions
                .iter()
                .filter(|q| q.answer.is_yes())
                .map(|q| q.code.as_str())
                .collect();
            (
                TriState::Yes,
                format!("A DPIA is required; triggered by {}.", triggers.join(", ")),
            )
        } else {
            (
                TriState::No,
                "None of the screening criteria apply; no DPIA is required.".to_string(),
            )
        };

        DpiaResult {
            questions,
            requirement,
            risk_score,
            explanation,
            is_complete,
            signals,
        }
    }
}

/// Mean of (weight if Yes else 0) over all given questions.
pub(crate) fn mean_weighted_yes(questions: &[QuestionNode]) -> f64 {
    if questions.is_empty() {
        return 0.0;
    }
    weighted_yes_sum(questions) as f64 / questions.len() as f64
}

/// Sum of weights of questions answered Yes.
pub(crate) fn weighted_yes_sum(questions: &[QuestionNode]) -> u32 {
    questions
        .iter()
        .filter(|q| q.answer.is_yes())
        .map(|q| u32::from(q.weight.unwrap_or(0)))
        .sum()
}
