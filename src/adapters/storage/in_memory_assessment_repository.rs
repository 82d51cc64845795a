//! In-Memory Assessment Repository Adapter

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::assessment::Assessment;
use crate::domain::foundation::{AssessmentId, DomainError};
use crate::ports::AssessmentRepository;

/// In-memory storage for Assessment aggregates
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssessmentRepository {
    assessments: Arc<RwLock<HashMap<AssessmentId, Assessment>>>,
}

impl InMemoryAssessmentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssessmentRepository for InMemoryAssessmentRepository {
    async fn get_by_id(&self, id: &AssessmentId) -> Result<Assessment, DomainError> {
        let assessments = self.assessments.read().await;
        assessments
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::assessment_not_found(id))
    }

    async fn list_all(&self) -> Result<Vec<Assessment>, DomainError> {
        let assessments = self.assessments.read().await;
        let mut all: Vec<Assessment> = assessments.values().cloned().collect();
        all.sort_by_key(|a| (a.created_at(), a.id()));
        Ok(all)
    }

    async fn save(&self, assessment: &Assessment) -> Result<(), DomainError> {
        let mut assessments = self.assessments.write().await;
        assessments.insert(assessment.id(), assessment.clone());
        Ok(())
    }

    async fn update(&self, assessment: &Assessment) -> Result<(), DomainError> {
        let mut assessments = self.assessments.write().await;
        match assessments.get_mut(&assessment.id()) {
            Some(stored) => {
                *stored = assessment.clone();
                Ok(())
            }
            None => Err(DomainError::assessment_not_found(assessment.id())),
        }
    }
}
