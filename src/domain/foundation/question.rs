//! Question templates and their per-assessment instances.

use serde::{Deserialize, Serialize};

use super::TriState;

/// Where a question's current answer comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    /// Set directly by the user.
    Manual,
    /// Taken from an upstream module while the user has not overridden it.
    Prefilled,
    /// Always computed; user edits are ignored.
    Derived,
}

/// Static definition of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionTemplate {
    pub code: &'static str,
    pub prompt: &'static str,
    pub weight: Option<u8>,
    pub mandatory: bool,
}

impl QuestionTemplate {
    pub const fn new(code: &'static str, prompt: &'static str) -> Self {
        Self {
            code,
            prompt,
            weight: None,
            mandatory: false,
        }
    }

    pub const fn weighted(code: &'static str, prompt: &'static str, weight: u8) -> Self {
        Self {
            code,
            prompt,
            weight: Some(weight),
            mandatory: true,
        }
    }
}

/// A question instantiated for one assessment read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionNode {
    pub code: String,
    pub prompt: String,
    pub answer: TriState,
    /// Free-text answer for choice questions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choice: Option<String>,
    pub source: AnswerSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u8>,
    pub mandatory: bool,
}

impl QuestionNode {
    /// Instantiates a template with an answer and its provenance.
    pub fn from_template(template: &QuestionTemplate, answer: TriState, source: AnswerSource) -> Self {
        Self {
            code: template.code.to_string(),
            prompt: template.prompt.to_string(),
            answer,
            choice: None,
            source,
            weight: template.weight,
            mandatory: template.mandatory,
        }
    }

    pub fn with_choice(mut self, choice: Option<String>) -> Self {
        self.choice = choice;
        self
    }

    pub fn is_derived(&self) -> bool {
        !matches!(self.source, AnswerSource::Manual)
    }

    /// Answered means a definite tri-state or a non-empty choice.
    pub fn is_answered(&self) -> bool {
        self.answer.is_known() || self.choice.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: QuestionTemplate = QuestionTemplate::weighted("X-01", "Is it?", 3);

    #[test]
    fn weighted_template_is_mandatory() {
        assert!(TEMPLATE.mandatory);
        assert_eq!(TEMPLATE.weight, Some(3));
    }

    #[test]
    fn prefilled_node_counts_as_derived() {
        let node = QuestionNode::from_template(&TEMPLATE, TriState::Yes, AnswerSource::Prefilled);
        assert!(node.is_derived());
        assert!(node.is_answered());
    }

    #[test]
    fn choice_counts_as_answered() {
        let node = QuestionNode::from_template(&TEMPLATE, TriState::Unknown, AnswerSource::Manual)
            .with_choice(Some("serious".into()));
        assert!(node.is_answered());
        assert!(!node.is_derived());
    }
}
