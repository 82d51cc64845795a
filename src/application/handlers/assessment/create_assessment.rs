//! CreateAssessmentHandler - Command handler for starting a new assessment.

use std::sync::Arc;
use tracing::info;

use crate::domain::assessment::Assessment;
use crate::domain::foundation::DomainError;
use crate::ports::AssessmentRepository;

/// Command to create a new assessment.
#[derive(Debug, Clone)]
pub struct CreateAssessmentCommand {
    pub title: String,
}

/// Result of successful assessment creation.
#[derive(Debug, Clone)]
pub struct CreateAssessmentResult {
    pub assessment: Assessment,
}

/// Handler for creating assessments.
pub struct CreateAssessmentHandler {
    repository: Arc<dyn AssessmentRepository>,
}

impl CreateAssessmentHandler {
    pub fn new(repository: Arc<dyn AssessmentRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: CreateAssessmentCommand,
    ) -> Result<CreateAssessmentResult, DomainError> {
        let assessment = Assessment::new(cmd.title)?;
        self.repository.save(&assessment).await?;

        info!(
            assessment_id = %assessment.id(),
            title = %assessment.title(),
            "Created assessment"
        );

        Ok(CreateAssessmentResult { assessment })
    }
}
