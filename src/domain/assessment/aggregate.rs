//! Assessment aggregate - The root entity for one procurement risk assessment.
//!
//! An Assessment owns nothing but its identity and a cached summary of the
//! latest module verdicts. Raw answers live in the answer store and are never
//! copied here; the summary is overwritten on every recompute.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AssessmentId, DomainError, Timestamp, TriState, ValidationError};
use crate::domain::risk::{AiActTier, ConnectionTier, MdrClass, RiskLabel};

/// Cached copies of each module's latest verdict.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AssessmentSummary {
    pub dpia_required: TriState,
    pub mdr_class: MdrClass,
    pub ai_act_tier: AiActTier,
    pub connections_tier: ConnectionTier,
    /// Unset while no security question has been answered.
    pub security_score: Option<f64>,
    pub overall_score: Option<f64>,
    pub overall_class: Option<u8>,
    pub overall_label: Option<RiskLabel>,
}

/// The Assessment aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    id: AssessmentId,
    title: String,
    created_at: Timestamp,
    updated_at: Timestamp,
    recomputed_at: Option<Timestamp>,
    summary: AssessmentSummary,
}

impl Assessment {
    /// Creates a new, never evaluated assessment.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `title` is blank.
    pub fn new(title: impl Into<String>) -> Result<Self, DomainError> {
        let title = title.into();
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("title").into());
        }
        let now = Timestamp::now();
        Ok(Self {
            id: AssessmentId::new(),
            title: trimmed.to_string(),
            created_at: now,
            updated_at: now,
            recomputed_at: None,
            summary: AssessmentSummary::default(),
        })
    }

    /// Reconstitutes an assessment from persisted data.
    pub fn reconstitute(
        id: AssessmentId,
        title: String,
        created_at: Timestamp,
        updated_at: Timestamp,
        recomputed_at: Option<Timestamp>,
        summary: AssessmentSummary,
    ) -> Self {
        Self {
            id,
            title,
            created_at,
            updated_at,
            recomputed_at,
            summary,
        }
    }

    pub fn id(&self) -> AssessmentId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// When the summary was last rewritten; None before the first evaluation.
    pub fn recomputed_at(&self) -> Option<Timestamp> {
        self.recomputed_at
    }

    pub fn summary(&self) -> &AssessmentSummary {
        &self.summary
    }

    pub fn has_been_evaluated(&self) -> bool {
        self.recomputed_at.is_some()
    }

    /// Stores the verdicts of a full recompute.
    ///
    /// Returns true if any cached verdict changed. `updated_at` only moves
    /// when something did.
    pub fn record_evaluation(&mut self, summary: AssessmentSummary) -> bool {
        let now = Timestamp::now();
        let changed = self.summary != summary;
        if changed {
            self.summary = summary;
            self.updated_at = now;
        }
        self.recomputed_at = Some(now);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn new_assessment_has_empty_summary() {
        let assessment = Assessment::new("Lab results portal").unwrap();
        assert_eq!(assessment.title(), "Lab results portal");
        assert_eq!(assessment.summary(), &AssessmentSummary::default());
        assert!(!assessment.has_been_evaluated());
        assert_eq!(assessment.summary().overall_class, None);
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = Assessment::new("   ").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn title_is_trimmed() {
        let assessment = Assessment::new("  Scheduling  ").unwrap();
        assert_eq!(assessment.title(), "Scheduling");
    }

    #[test]
    fn record_evaluation_reports_changes() {
        let mut assessment = Assessment::new("Portal").unwrap();
        let summary = AssessmentSummary {
            dpia_required: TriState::Yes,
            overall_score: Some(3.0),
            overall_class: Some(1),
            overall_label: Some(RiskLabel::Low),
            ..AssessmentSummary::default()
        };

        assert!(assessment.record_evaluation(summary.clone()));
        assert!(assessment.has_been_evaluated());
        let updated = assessment.updated_at();

        assert!(!assessment.record_evaluation(summary.clone()));
        assert_eq!(assessment.updated_at(), updated);
        assert_eq!(assessment.summary(), &summary);
    }

    #[test]
    fn reconstitute_round_trips_fields() {
        let original = Assessment::new("Portal").unwrap();
        let copy = Assessment::reconstitute(
            original.id(),
            original.title().to_string(),
            original.created_at(),
            original.updated_at(),
            original.recomputed_at(),
            original.summary().clone(),
        );
        assert_eq!(copy, original);
    }
}
