//! Assessment repository port.
//!
//! Persists the Assessment aggregate and its cached verdict summary.

use async_trait::async_trait;

use crate::domain::assessment::Assessment;
use crate::domain::foundation::{AssessmentId, DomainError};

/// Repository port for Assessment aggregate persistence.
#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    /// Find an assessment by its ID.
    ///
    /// # Errors
    ///
    /// - `AssessmentNotFound` if no assessment has this ID
    async fn get_by_id(&self, id: &AssessmentId) -> Result<Assessment, DomainError>;

    /// All stored assessments, oldest first.
    async fn list_all(&self) -> Result<Vec<Assessment>, DomainError>;

    /// Save a new assessment.
    ///
    /// # Errors
    ///
    /// - `StorageError` on persistence failure
    async fn save(&self, assessment: &Assessment) -> Result<(), DomainError>;

    /// Update an existing assessment.
    ///
    /// # Errors
    ///
    /// - `AssessmentNotFound` if the assessment doesn't exist
    /// - `StorageError` on persistence failure
    async fn update(&self, assessment: &Assessment) -> Result<(), DomainError>;
}
