//! AI Act risk tier classification.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::dpia::DpiaSignals;
use super::mdr::MdrClass;
use crate::domain::foundation::{
    AnswerEntry, AnswerSet, AnswerSource, QuestionNode, QuestionTemplate, TriState,
};

pub const AI_SYSTEM: &str = "AI-A";
pub const HIGH_RISK_DEVICE: &str = "AI-B";
pub const TRIAGE_ACCESS: &str = "AI-C";
pub const DIRECT_CLINICAL_DECISION: &str = "AI-D";
pub const INTERACTS_WITH_USERS: &str = "AI-E";
pub const GENERATES_CONTENT: &str = "AI-F";

pub static AI_ACT_QUESTIONS: [QuestionTemplate; 6] = [
    QuestionTemplate::new(AI_SYSTEM, "Is the system an AI system as defined by the AI Act?"),
    QuestionTemplate::new(
        HIGH_RISK_DEVICE,
        "Is the system (part of) a medical device of class IIa or higher?",
    ),
    QuestionTemplate::new(
        TRIAGE_ACCESS,
        "Is the AI used for triage or to decide access to essential care?",
    ),
    QuestionTemplate::new(
        DIRECT_CLINICAL_DECISION,
        "Does the AI directly take or steer clinical decisions?",
    ),
    QuestionTemplate::new(
        INTERACTS_WITH_USERS,
        "Does the AI interact directly with people (e.g. a chatbot)?",
    ),
    QuestionTemplate::new(
        GENERATES_CONTENT,
        "Does the AI generate text, images, audio or video?",
    ),
];

/// AI Act risk tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AiActTier {
    #[default]
    Unknown,
    OutsideScope,
    MinimalRisk,
    LimitedRisk,
    HighRisk,
    /// Reserved for prohibited practices; never produced by the questionnaire.
    Prohibited,
}

impl AiActTier {
    /// Numeric tier used by the overall aggregation.
    pub fn score(&self) -> u8 {
        match self {
            AiActTier::Unknown | AiActTier::OutsideScope => 0,
            AiActTier::MinimalRisk => 1,
            AiActTier::LimitedRisk => 2,
            AiActTier::HighRisk => 3,
            AiActTier::Prohibited => 4,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, AiActTier::Unknown)
    }
}

impl fmt::Display for AiActTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AiActTier::Unknown => "unknown",
            AiActTier::OutsideScope => "outside scope",
            AiActTier::MinimalRisk => "low/minimal risk",
            AiActTier::LimitedRisk => "limited risk",
            AiActTier::HighRisk => "high risk",
            AiActTier::Prohibited => "prohibited",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiActResult {
    pub questions: Vec<QuestionNode>,
    pub tier: AiActTier,
    pub score: u8,
    pub explanation: String,
    pub is_complete: bool,
}

/// Engine for the AI Act questions.
///
/// A, C and D are pre-filled from the DPIA until the user answers them;
/// B always follows the MDR class.
#[derive(Debug, Clone)]
pub struct AiActEngine {
    dpia: DpiaSignals,
    mdr_class: MdrClass,
    answers: AnswerSet,
}

impl AiActEngine {
    pub fn new(dpia: DpiaSignals, mdr_class: MdrClass, answers: AnswerSet) -> Self {
        Self {
            dpia,
            mdr_class,
            answers,
        }
    }

    pub fn accepts(&self, code: &str) -> bool {
        code != HIGH_RISK_DEVICE && AI_ACT_QUESTIONS.iter().any(|q| q.code == code)
    }

    pub fn set_answers(&mut self, entries: &[AnswerEntry]) -> Vec<String> {
        self.answers.apply_entries(entries, |code| {
            code != HIGH_RISK_DEVICE && AI_ACT_QUESTIONS.iter().any(|q| q.code == code)
        })
    }

    /// The stored user answer if any, otherwise the DPIA pre-fill.
    fn prefilled(&self, code: &str, upstream: TriState) -> (TriState, AnswerSource) {
        let own = self.answers.tri(code);
        if own.is_known() {
            (own, AnswerSource::Manual)
        } else if upstream.is_known() {
            (upstream, AnswerSource::Prefilled)
        } else {
            (TriState::Unknown, AnswerSource::Manual)
        }
    }

    pub fn result(&self) -> AiActResult {
        let (a, a_source) = self.prefilled(AI_SYSTEM, self.dpia.ai_system);
        let b = self.mdr_class.is_high_risk();
        let (c, c_source) = self.prefilled(TRIAGE_ACCESS, self.dpia.triage_access);
        let (d, d_source) = self.prefilled(DIRECT_CLINICAL_DECISION, self.dpia.direct_clinical_decision);
        let e = self.answers.tri(INTERACTS_WITH_USERS);
        let f = self.answers.tri(GENERATES_CONTENT);

        let inputs = [a, b, c, d, e, f];
        let (tier, explanation) = if inputs.iter().all(|v| !v.is_known()) {
            (AiActTier::Unknown, "No AI Act questions answered yet.".to_string())
        } else if !a.is_yes() {
            (
                AiActTier::OutsideScope,
                "The system is not (known to be) an AI system; the AI Act does not apply.".to_string(),
            )
        } else if b.is_yes() || c.is_yes() || d.is_yes() {
            let mut reasons = Vec::new();
            if b.is_yes() {
                reasons.push(format!("medical device {}", self.mdr_class));
            }
            if c.is_yes() {
                reasons.push("triage or access to essential care".to_string());
            }
            if d.is_yes() {
                reasons.push("direct clinical decisions".to_string());
            }
            (
                AiActTier::HighRisk,
                format!("High-risk AI system: {}.", reasons.join(", ")),
            )
        } else if e.is_yes() || f.is_yes() {
            (
                AiActTier::LimitedRisk,
                "Limited-risk AI system with transparency obligations.".to_string(),
            )
        } else {
            (
                AiActTier::MinimalRisk,
                "AI system with low or minimal risk.".to_string(),
            )
        };

        let questions = vec![
            QuestionNode::from_template(&AI_ACT_QUESTIONS[0], a, a_source),
            QuestionNode::from_template(&AI_ACT_QUESTIONS[1], b, AnswerSource::Derived),
            QuestionNode::from_template(&AI_ACT_QUESTIONS[2], c, c_source),
            QuestionNode::from_template(&AI_ACT_QUESTIONS[3], d, d_source),
            QuestionNode::from_template(&AI_ACT_QUESTIONS[4], e, AnswerSource::Manual),
            QuestionNode::from_template(&AI_ACT_QUESTIONS[5], f, AnswerSource::Manual),
        ];

        AiActResult {
            is_complete: questions.iter().all(|q| q.answer.is_known()),
            questions,
            score: tier.score(),
            tier,
            explanation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(pairs: &[(&str, TriState)]) -> AnswerSet {
        let mut set = AnswerSet::new();
        for (code, value) in pairs {
            set.insert(*code, *value);
        }
        set
    }

    #[test]
    fn nothing_known_is_unknown_with_zero_score() {
        let result =
            AiActEngine::new(DpiaSignals::default(), MdrClass::Unknown, AnswerSet::new()).result();
        assert_eq!(result.tier, AiActTier::Unknown);
        assert_eq!(result.score, 0);
        assert!(!result.is_complete);
    }

    #[test]
    fn not_an_ai_system_is_outside_scope_regardless_of_rest() {
        let set = answers(&[
            (AI_SYSTEM, TriState::No),
            (TRIAGE_ACCESS, TriState::Yes),
            (DIRECT_CLINICAL_DECISION, TriState::Yes),
            (INTERACTS_WITH_USERS, TriState::Yes),
        ]);
        let result = AiActEngine::new(DpiaSignals::default(), MdrClass::ClassIII, set).result();
        assert_eq!(result.tier, AiActTier::OutsideScope);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn unknown_ai_flag_with_other_answers_is_outside_scope() {
        let set = answers(&[(INTERACTS_WITH_USERS, TriState::Yes)]);
        let result = AiActEngine::new(DpiaSignals::default(), MdrClass::Unknown, set).result();
        assert_eq!(result.tier, AiActTier::OutsideScope);
    }

    #[test]
    fn high_risk_device_makes_ai_high_risk() {
        let set = answers(&[
            (AI_SYSTEM, TriState::Yes),
            (TRIAGE_ACCESS, TriState::No),
            (DIRECT_CLINICAL_DECISION, TriState::No),
            (INTERACTS_WITH_USERS, TriState::No),
            (GENERATES_CONTENT, TriState::No),
        ]);
        let result = AiActEngine::new(DpiaSignals::default(), MdrClass::ClassIIb, set).result();
        assert_eq!(result.tier, AiActTier::HighRisk);
        assert_eq!(result.score, 3);
        assert!(result.is_complete);
    }

    #[test]
    fn transparency_answers_give_limited_risk() {
        let set = answers(&[(AI_SYSTEM, TriState::Yes), (GENERATES_CONTENT, TriState::Yes)]);
        let result = AiActEngine::new(DpiaSignals::default(), MdrClass::ClassI, set).result();
        assert_eq!(result.tier, AiActTier::LimitedRisk);
        assert_eq!(result.score, 2);
    }

    #[test]
    fn ai_without_triggers_is_minimal_risk() {
        let set = answers(&[(AI_SYSTEM, TriState::Yes)]);
        let result =
            AiActEngine::new(DpiaSignals::default(), MdrClass::NotMedicalDevice, set).result();
        assert_eq!(result.tier, AiActTier::MinimalRisk);
        assert_eq!(result.score, 1);
    }

    #[test]
    fn dpia_prefills_until_user_overrides() {
        let dpia = DpiaSignals {
            ai_system: TriState::Yes,
            triage_access: TriState::Yes,
            ..DpiaSignals::default()
        };
        let prefilled = AiActEngine::new(dpia, MdrClass::Unknown, AnswerSet::new()).result();
        assert_eq!(prefilled.tier, AiActTier::HighRisk);
        assert_eq!(prefilled.questions[2].source, AnswerSource::Prefilled);

        let overridden = AiActEngine::new(
            dpia,
            MdrClass::Unknown,
            answers(&[(TRIAGE_ACCESS, TriState::No)]),
        )
        .result();
        assert_eq!(overridden.tier, AiActTier::MinimalRisk);
        assert_eq!(overridden.questions[2].source, AnswerSource::Manual);
    }

    #[test]
    fn high_risk_device_flag_is_never_settable() {
        let mut engine =
            AiActEngine::new(DpiaSignals::default(), MdrClass::ClassI, AnswerSet::new());
        let ignored = engine.set_answers(&[
            AnswerEntry::new(HIGH_RISK_DEVICE, TriState::Yes),
            AnswerEntry::new(AI_SYSTEM, TriState::Yes),
        ]);
        assert_eq!(ignored, vec![HIGH_RISK_DEVICE.to_string()]);
        let result = engine.result();
        assert_eq!(result.questions[1].answer, TriState::No);
        assert_eq!(result.tier, AiActTier::MinimalRisk);
    }

    #[test]
    fn prohibited_tier_is_reserved_at_four() {
        assert_eq!(AiActTier::Prohibited.score(), 4);
    }
}
