//! Supplier security profile - eight weighted questions, two of which are
//! derived from the DPIA.

use serde::{Deserialize, Serialize};

use super::dpia::{mean_weighted_yes, weighted_yes_sum, DpiaSignals};
use crate::domain::foundation::{
    AnswerEntry, AnswerSet, AnswerSource, QuestionNode, QuestionTemplate, TriState,
};

/// Qualitative impact class of a security question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactClass {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ImpactClass {
    pub const fn weight(self) -> u8 {
        match self {
            ImpactClass::Low => 1,
            ImpactClass::Medium => 2,
            ImpactClass::High => 4,
            ImpactClass::VeryHigh => 6,
        }
    }
}

pub const SUPPLIER_HOSTING: &str = "SEC-01";
pub const HEALTH_DATA: &str = "SEC-02";
pub const REMOTE_ACCESS: &str = "SEC-03";
pub const INTERNET_FACING: &str = "SEC-04";
pub const PRIVILEGED_ACCOUNTS: &str = "SEC-05";
pub const DATA_OUTSIDE_EEA: &str = "SEC-06";
pub const SUBCONTRACTORS: &str = "SEC-07";
pub const NO_CERTIFICATION: &str = "SEC-08";

const fn question(code: &'static str, prompt: &'static str, class: ImpactClass) -> QuestionTemplate {
    QuestionTemplate::weighted(code, prompt, class.weight())
}

pub static SECURITY_QUESTIONS: [QuestionTemplate; 8] = [
    question(
        SUPPLIER_HOSTING,
        "Does the supplier host or store the organisation's data?",
        ImpactClass::High,
    ),
    question(
        HEALTH_DATA,
        "Are special categories of personal data (health data) involved?",
        ImpactClass::VeryHigh,
    ),
    question(
        REMOTE_ACCESS,
        "Does the supplier need remote access to the organisation's network?",
        ImpactClass::High,
    ),
    question(
        INTERNET_FACING,
        "Is the system reachable from the internet?",
        ImpactClass::High,
    ),
    question(
        PRIVILEGED_ACCOUNTS,
        "Does the system require privileged or integration accounts?",
        ImpactClass::High,
    ),
    question(
        DATA_OUTSIDE_EEA,
        "Are data stored or processed outside the EEA?",
        ImpactClass::Medium,
    ),
    question(
        SUBCONTRACTORS,
        "Does the supplier rely on subcontractors for the service?",
        ImpactClass::Low,
    ),
    question(
        NO_CERTIFICATION,
        "Does the supplier lack an ISO 27001 or NEN 7510 certification?",
        ImpactClass::Medium,
    ),
];

fn is_derived(code: &str) -> bool {
    code == HEALTH_DATA || code == DATA_OUTSIDE_EEA
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityProfileResult {
    pub questions: Vec<QuestionNode>,
    /// Mean of (weight if Yes else 0) over all questions.
    pub score: f64,
    /// Numerator of `score`, kept for exact aggregation.
    pub weighted_sum: u32,
    /// Denominator of `score`.
    pub question_count: u32,
    pub explanation: String,
    pub is_complete: bool,
    /// True once at least one question has an answer.
    pub has_input: bool,
}

#[derive(Debug, Clone)]
pub struct SecurityProfileEngine {
    dpia: DpiaSignals,
    answers: AnswerSet,
}

impl SecurityProfileEngine {
    pub fn new(dpia: DpiaSignals, answers: AnswerSet) -> Self {
        Self { dpia, answers }
    }

    pub fn accepts(&self, code: &str) -> bool {
        !is_derived(code) && SECURITY_QUESTIONS.iter().any(|q| q.code == code)
    }

    /// Derived questions reject direct edits; they come back as ignored.
    pub fn set_answers(&mut self, entries: &[AnswerEntry]) -> Vec<String> {
        self.answers.apply_entries(entries, |code| {
            !is_derived(code) && SECURITY_QUESTIONS.iter().any(|q| q.code == code)
        })
    }

    fn answer(&self, code: &str) -> (TriState, AnswerSource) {
        match code {
            HEALTH_DATA => (self.dpia.special_category, AnswerSource::Derived),
            DATA_OUTSIDE_EEA => (self.dpia.outside_eea, AnswerSource::Derived),
            _ => (self.answers.tri(code), AnswerSource::Manual),
        }
    }

    pub fn result(&self) -> SecurityProfileResult {
        let questions: Vec<QuestionNode> = SECURITY_QUESTIONS
            .iter()
            .map(|q| {
                let (answer, source) = self.answer(q.code);
                QuestionNode::from_template(q, answer, source)
            })
            .collect();

        let score = mean_weighted_yes(&questions);
        let weighted_sum = weighted_yes_sum(&questions);
        let open: Vec<&str> = questions
            .iter()
            .filter(|q| !q.answer.is_known())
            .map(|q| q.code.as_str())
            .collect();
        let has_input = open.len() < questions.len();
        let is_complete = open.is_empty();

        let explanation = if is_complete {
            format!("Security profile complete; mean risk score {:.3}.", score)
        } else if open.iter().any(|code| is_derived(code)) {
            format!(
                "Open questions: {}. SEC-02 and SEC-06 follow the DPIA and are answered there.",
                open.join(", ")
            )
        } else {
            format!("Open questions: {}.", open.join(", "))
        };

        SecurityProfileResult {
            question_count: questions.len() as u32,
            questions,
            score,
            weighted_sum,
            explanation,
            is_complete,
            has_input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn everything_yes() -> (DpiaSignals, AnswerSet) {
        let dpia = DpiaSignals {
            special_category: TriState::Yes,
            outside_eea: TriState::Yes,
            ..DpiaSignals::default()
        };
        let mut answers = AnswerSet::new();
        for q in SECURITY_QUESTIONS.iter().filter(|q| !is_derived(q.code)) {
            answers.insert(q.code, TriState::Yes);
        }
        (dpia, answers)
    }

    #[test]
    fn template_weights_match_impact_classes() {
        let weights: Vec<u8> = SECURITY_QUESTIONS.iter().map(|q| q.weight.unwrap()).collect();
        assert_eq!(weights, vec![4, 6, 4, 4, 4, 2, 1, 2]);
    }

    #[test]
    fn all_yes_scores_27_over_8() {
        let (dpia, answers) = everything_yes();
        let result = SecurityProfileEngine::new(dpia, answers).result();
        assert!(result.is_complete);
        assert_eq!(result.score, 3.375);
        assert_eq!(result.weighted_sum, 27);
        assert_eq!(result.question_count, 8);
    }

    #[test]
    fn no_answers_is_incomplete_with_zero_score() {
        let result = SecurityProfileEngine::new(DpiaSignals::default(), AnswerSet::new()).result();
        assert!(!result.is_complete);
        assert!(!result.has_input);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn completeness_requires_dpia_sources() {
        let (_, answers) = everything_yes();
        let result = SecurityProfileEngine::new(DpiaSignals::default(), answers).result();
        assert!(!result.is_complete);
        assert!(result.explanation.contains("follow the DPIA"));
        assert_eq!(result.weighted_sum, 4 + 4 + 4 + 4 + 1 + 2);
    }

    #[test]
    fn derived_questions_reject_edits() {
        let mut engine = SecurityProfileEngine::new(DpiaSignals::default(), AnswerSet::new());
        let ignored = engine.set_answers(&[
            AnswerEntry::new(HEALTH_DATA, TriState::Yes),
            AnswerEntry::new(DATA_OUTSIDE_EEA, TriState::Yes),
            AnswerEntry::new(SUPPLIER_HOSTING, TriState::Yes),
        ]);
        assert_eq!(ignored, vec![HEALTH_DATA.to_string(), DATA_OUTSIDE_EEA.to_string()]);
        let result = engine.result();
        assert_eq!(result.questions[1].answer, TriState::Unknown);
        assert_eq!(result.questions[1].source, AnswerSource::Derived);
        assert!(result.has_input);
    }
}
