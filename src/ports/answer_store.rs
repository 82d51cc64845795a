//! Answer store port.
//!
//! Raw answers keyed by assessment, module and question code. Derived values
//! are never written here; they are recomputed on every read.

use async_trait::async_trait;

use crate::domain::foundation::{AnswerValue, AssessmentId, DomainError, ModuleKey, StoredAnswer};

/// Port for persisting raw questionnaire answers.
///
/// Writes are last-write-wins per `(assessment, module, code)`.
#[async_trait]
pub trait AnswerStore: Send + Sync {
    /// All answers stored for one module of an assessment.
    ///
    /// An assessment or module without answers yields an empty list.
    async fn get_all(
        &self,
        assessment_id: &AssessmentId,
        module: ModuleKey,
    ) -> Result<Vec<StoredAnswer>, DomainError>;

    /// Inserts or replaces the answer for `code`.
    ///
    /// # Errors
    ///
    /// - `StorageError` on persistence failure
    async fn upsert_by_code(
        &self,
        assessment_id: &AssessmentId,
        module: ModuleKey,
        code: &str,
        value: AnswerValue,
    ) -> Result<(), DomainError>;
}
