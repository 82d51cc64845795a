//! RegisterConnectionHandler - Command handler for adding a system interface.

use std::sync::Arc;
use tracing::info;

use crate::application::handlers::evaluation::{AssessmentEvaluator, ModuleResult};
use crate::application::locks::AssessmentLocks;
use crate::domain::foundation::{AssessmentId, DomainError, ModuleKey};
use crate::domain::risk::{Connection, DataSensitivity};

/// Command to register a connection.
#[derive(Debug, Clone)]
pub struct RegisterConnectionCommand {
    pub assessment_id: AssessmentId,
    pub name: String,
    /// Free-text sensitivity label; unrecognized labels are kept and rated as none.
    pub sensitivity: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterConnectionResult {
    pub connection: Connection,
    /// The Connections module after the change.
    pub result: ModuleResult,
}

pub struct RegisterConnectionHandler {
    evaluator: Arc<AssessmentEvaluator>,
    locks: Arc<AssessmentLocks>,
}

impl RegisterConnectionHandler {
    pub fn new(evaluator: Arc<AssessmentEvaluator>, locks: Arc<AssessmentLocks>) -> Self {
        Self { evaluator, locks }
    }

    pub async fn handle(
        &self,
        cmd: RegisterConnectionCommand,
    ) -> Result<RegisterConnectionResult, DomainError> {
        let _guard = self.locks.acquire(cmd.assessment_id).await;

        self.evaluator
            .assessments()
            .get_by_id(&cmd.assessment_id)
            .await?;

        let sensitivity = DataSensitivity::parse(&cmd.sensitivity);
        let connection = Connection::new(cmd.assessment_id, cmd.name, sensitivity)?;
        self.evaluator.connections().save(&connection).await?;

        let evaluation = self.evaluator.recompute(&cmd.assessment_id).await?;

        info!(
            assessment_id = %cmd.assessment_id,
            connection_id = %connection.id,
            tier = %evaluation.connections.tier,
            "Registered connection"
        );

        Ok(RegisterConnectionResult {
            connection,
            result: evaluation.module_result(ModuleKey::Connections),
        })
    }
}
