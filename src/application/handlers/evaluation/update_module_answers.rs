//! UpdateModuleAnswersHandler - Command handler for submitting answers.
//!
//! Only codes the module's engine accepts are written to the answer store;
//! derived, pre-filled and unknown codes are reported back as ignored. The
//! module is then recomputed from scratch.

use std::sync::Arc;
use tracing::{debug, info};

use crate::application::locks::AssessmentLocks;
use crate::domain::foundation::{AnswerEntry, AssessmentId, DomainError, ModuleKey};

use super::evaluator::{admit_entries, AssessmentEvaluator, Evaluation, ModuleResult};

/// Command to update answers of one module.
#[derive(Debug, Clone)]
pub struct UpdateModuleAnswersCommand {
    pub assessment_id: AssessmentId,
    pub module: ModuleKey,
    pub entries: Vec<AnswerEntry>,
}

/// Result of an answer update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateModuleAnswersResult {
    pub result: ModuleResult,
    /// Submitted codes that were not stored.
    pub ignored_codes: Vec<String>,
}

/// Handler for answer updates.
pub struct UpdateModuleAnswersHandler {
    evaluator: Arc<AssessmentEvaluator>,
    locks: Arc<AssessmentLocks>,
}

impl UpdateModuleAnswersHandler {
    pub fn new(evaluator: Arc<AssessmentEvaluator>, locks: Arc<AssessmentLocks>) -> Self {
        Self { evaluator, locks }
    }

    pub async fn handle(
        &self,
        cmd: UpdateModuleAnswersCommand,
    ) -> Result<UpdateModuleAnswersResult, DomainError> {
        let _guard = self.locks.acquire(cmd.assessment_id).await;

        // 1. Fail fast on unknown assessments
        self.evaluator
            .assessments()
            .get_by_id(&cmd.assessment_id)
            .await?;

        // 2. Judge entries against the current upstream results
        let inputs = self.evaluator.load_inputs(&cmd.assessment_id).await?;
        let current = Evaluation::run(&inputs);
        let (accepted, ignored_codes) = admit_entries(cmd.module, &inputs, &current, &cmd.entries);

        // 3. Persist accepted raw answers
        for entry in &accepted {
            self.evaluator
                .answers()
                .upsert_by_code(&cmd.assessment_id, cmd.module, &entry.code, entry.value.clone())
                .await?;
        }

        if !ignored_codes.is_empty() {
            debug!(
                assessment_id = %cmd.assessment_id,
                module = %cmd.module,
                ignored = ?ignored_codes,
                "Ignored answer codes"
            );
        }

        // 4. Full recompute
        let evaluation = self.evaluator.recompute(&cmd.assessment_id).await?;

        info!(
            assessment_id = %cmd.assessment_id,
            module = %cmd.module,
            stored = accepted.len(),
            ignored = ignored_codes.len(),
            "Updated module answers"
        );

        Ok(UpdateModuleAnswersResult {
            result: evaluation.module_result(cmd.module),
            ignored_codes,
        })
    }
}
