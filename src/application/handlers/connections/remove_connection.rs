//! RemoveConnectionHandler - Command handler for removing a system interface.

use std::sync::Arc;
use tracing::info;

use crate::application::handlers::evaluation::{AssessmentEvaluator, ModuleResult};
use crate::application::locks::AssessmentLocks;
use crate::domain::foundation::{AssessmentId, ConnectionId, DomainError, ModuleKey};

#[derive(Debug, Clone)]
pub struct RemoveConnectionCommand {
    pub assessment_id: AssessmentId,
    pub connection_id: ConnectionId,
}

pub struct RemoveConnectionHandler {
    evaluator: Arc<AssessmentEvaluator>,
    locks: Arc<AssessmentLocks>,
}

impl RemoveConnectionHandler {
    pub fn new(evaluator: Arc<AssessmentEvaluator>, locks: Arc<AssessmentLocks>) -> Self {
        Self { evaluator, locks }
    }

    /// Removes the connection and returns the recomputed Connections module.
    ///
    /// # Errors
    ///
    /// - `AssessmentNotFound` if the assessment is unknown
    /// - `ConnectionNotFound` if the connection is not registered on it
    pub async fn handle(&self, cmd: RemoveConnectionCommand) -> Result<ModuleResult, DomainError> {
        let _guard = self.locks.acquire(cmd.assessment_id).await;

        self.evaluator
            .assessments()
            .get_by_id(&cmd.assessment_id)
            .await?;
        self.evaluator
            .connections()
            .delete(&cmd.assessment_id, &cmd.connection_id)
            .await?;

        let evaluation = self.evaluator.recompute(&cmd.assessment_id).await?;

        info!(
            assessment_id = %cmd.assessment_id,
            connection_id = %cmd.connection_id,
            tier = %evaluation.connections.tier,
            "Removed connection"
        );

        Ok(evaluation.module_result(ModuleKey::Connections))
    }
}
