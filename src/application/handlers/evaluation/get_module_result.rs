//! GetModuleResultHandler - Query handler for one module's read-model.
//!
//! Every read is a full recompute that also refreshes the cached summary on
//! the Assessment, so it runs under the assessment's lock.

use std::sync::Arc;
use tracing::debug;

use crate::application::locks::AssessmentLocks;
use crate::domain::foundation::{AssessmentId, DomainError, ModuleKey};

use super::evaluator::{AssessmentEvaluator, ModuleResult};

/// Query for a module result.
#[derive(Debug, Clone)]
pub struct GetModuleResultQuery {
    pub assessment_id: AssessmentId,
    pub module: ModuleKey,
}

/// Handler for module result queries.
pub struct GetModuleResultHandler {
    evaluator: Arc<AssessmentEvaluator>,
    locks: Arc<AssessmentLocks>,
}

impl GetModuleResultHandler {
    pub fn new(evaluator: Arc<AssessmentEvaluator>, locks: Arc<AssessmentLocks>) -> Self {
        Self { evaluator, locks }
    }

    pub async fn handle(&self, query: GetModuleResultQuery) -> Result<ModuleResult, DomainError> {
        let _guard = self.locks.acquire(query.assessment_id).await;

        let evaluation = self.evaluator.recompute(&query.assessment_id).await?;
        let result = evaluation.module_result(query.module);

        debug!(
            assessment_id = %query.assessment_id,
            module = %query.module,
            complete = result.is_complete(),
            "Computed module result"
        );

        Ok(result)
    }
}
