//! RefreshAllHandler - Recomputes and re-caches every stored assessment.
//!
//! Used by the batch binary after the question templates change. A failure
//! on one assessment is logged and counted; the rest still run.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::handlers::evaluation::AssessmentEvaluator;
use crate::application::locks::AssessmentLocks;
use crate::domain::foundation::{AssessmentId, DomainError};
use crate::domain::risk::RiskLabel;

/// Outcome for one assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshedAssessment {
    pub assessment_id: AssessmentId,
    pub title: String,
    pub overall_class: Option<u8>,
    pub overall_label: Option<RiskLabel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RefreshAllResult {
    pub refreshed: Vec<RefreshedAssessment>,
    pub failed: Vec<(AssessmentId, String)>,
}

pub struct RefreshAllHandler {
    evaluator: Arc<AssessmentEvaluator>,
    locks: Arc<AssessmentLocks>,
}

impl RefreshAllHandler {
    pub fn new(evaluator: Arc<AssessmentEvaluator>, locks: Arc<AssessmentLocks>) -> Self {
        Self { evaluator, locks }
    }

    /// # Errors
    ///
    /// Only a failure to list assessments aborts the run.
    pub async fn handle(&self) -> Result<RefreshAllResult, DomainError> {
        let assessments = self.evaluator.assessments().list_all().await?;
        let mut outcome = RefreshAllResult::default();

        for assessment in assessments {
            let id = assessment.id();
            let _guard = self.locks.acquire(id).await;

            match self.evaluator.recompute(&id).await {
                Ok(evaluation) => outcome.refreshed.push(RefreshedAssessment {
                    assessment_id: id,
                    title: assessment.title().to_string(),
                    overall_class: evaluation.overall_risk.risk_class,
                    overall_label: evaluation.overall_risk.label,
                }),
                Err(e) => {
                    warn!(assessment_id = %id, error = %e, "Failed to refresh assessment");
                    outcome.failed.push((id, e.to_string()));
                }
            }
        }

        info!(
            refreshed = outcome.refreshed.len(),
            failed = outcome.failed.len(),
            "Refreshed all assessments"
        );

        Ok(outcome)
    }
}
