//! File-based Answer Store Adapter
//!
//! Stores each module's answers as one YAML document per assessment:
//! `<base>/<assessment_id>/answers/<module>.yaml`.
//!
//! Reads never fail. A missing file is an empty answer set; an unreadable or
//! corrupt file is logged and also treated as empty, so a damaged document
//! degrades the affected module to Unknown instead of failing the recompute.
//! Writes are strict: an upsert over a damaged document fails and leaves it
//! untouched.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::in_memory_answer_store::upsert;
use super::yaml_document;
use crate::domain::foundation::{AnswerValue, AssessmentId, DomainError, ModuleKey, StoredAnswer};
use crate::ports::AnswerStore;

/// File-based storage for questionnaire answers
#[derive(Debug, Clone)]
pub struct FileAnswerStore {
    base_path: PathBuf,
}

impl FileAnswerStore {
    /// Create a new answer store rooted at `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileAnswerStore::new("./data/assessments");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn answers_dir(&self, assessment_id: &AssessmentId) -> PathBuf {
        self.base_path
            .join(assessment_id.to_string())
            .join("answers")
    }

    fn module_file_path(&self, assessment_id: &AssessmentId, module: ModuleKey) -> PathBuf {
        self.answers_dir(assessment_id)
            .join(format!("{}.yaml", module.as_str()))
    }

    /// Strict load used before a write; a damaged document is an error.
    async fn load_rows(
        &self,
        assessment_id: &AssessmentId,
        module: ModuleKey,
    ) -> Result<Vec<StoredAnswer>, DomainError> {
        let path = self.module_file_path(assessment_id, module);
        let rows: Option<Vec<StoredAnswer>> = yaml_document::load(&path, "answers").await?;
        Ok(rows.unwrap_or_default())
    }
}

#[async_trait]
impl AnswerStore for FileAnswerStore {
    async fn get_all(
        &self,
        assessment_id: &AssessmentId,
        module: ModuleKey,
    ) -> Result<Vec<StoredAnswer>, DomainError> {
        match self.load_rows(assessment_id, module).await {
            Ok(rows) => Ok(rows),
            Err(e) => {
                warn!(
                    assessment_id = %assessment_id,
                    module = %module,
                    error = %e,
                    "Unreadable answer file, treating as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    async fn upsert_by_code(
        &self,
        assessment_id: &AssessmentId,
        module: ModuleKey,
        code: &str,
        value: AnswerValue,
    ) -> Result<(), DomainError> {
        let mut rows = self.load_rows(assessment_id, module).await?;
        upsert(&mut rows, code, value);
        yaml_document::store(&self.module_file_path(assessment_id, module), &rows, "answers").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ErrorCode, TriState};
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileAnswerStore::new(temp_dir.path());
        let rows = store
            .get_all(&AssessmentId::new(), ModuleKey::Dpia)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn upsert_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let id = AssessmentId::new();

        let store = FileAnswerStore::new(temp_dir.path());
        store
            .upsert_by_code(&id, ModuleKey::Dpia, "DPIA-01", TriState::Yes.into())
            .await
            .unwrap();
        store
            .upsert_by_code(&id, ModuleKey::Mdr, "MDR-E", AnswerValue::Choice("serious".into()))
            .await
            .unwrap();
        store
            .upsert_by_code(&id, ModuleKey::Dpia, "DPIA-01", TriState::No.into())
            .await
            .unwrap();

        let reopened = FileAnswerStore::new(temp_dir.path());
        let dpia = reopened.get_all(&id, ModuleKey::Dpia).await.unwrap();
        assert_eq!(dpia.len(), 1);
        assert_eq!(dpia[0].value, AnswerValue::Tri(TriState::No));

        let mdr = reopened.get_all(&id, ModuleKey::Mdr).await.unwrap();
        assert_eq!(mdr[0].value.as_choice(), Some("serious"));
    }

    #[tokio::test]
    async fn corrupt_file_is_absorbed_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let id = AssessmentId::new();
        let store = FileAnswerStore::new(temp_dir.path());

        let dir = store.answers_dir(&id);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("dpia.yaml"), "{{ not: [valid").unwrap();

        let rows = store.get_all(&id, ModuleKey::Dpia).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn upsert_over_damaged_file_fails_and_keeps_it() {
        let temp_dir = TempDir::new().unwrap();
        let id = AssessmentId::new();
        let store = FileAnswerStore::new(temp_dir.path());

        for n in 1..=13 {
            store
                .upsert_by_code(&id, ModuleKey::Dpia, &format!("DPIA-{:02}", n), TriState::No.into())
                .await
                .unwrap();
        }
        let path = store.module_file_path(&id, ModuleKey::Dpia);
        let damaged = std::fs::read_to_string(&path)
            .unwrap()
            .replacen("no", "maybe", 1);
        std::fs::write(&path, &damaged).unwrap();

        let err = store
            .upsert_by_code(&id, ModuleKey::Dpia, "DPIA-14", TriState::Yes.into())
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::StorageError);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), damaged);
    }

    #[tokio::test]
    async fn upsert_touches_only_its_own_code() {
        let temp_dir = TempDir::new().unwrap();
        let id = AssessmentId::new();
        let store = FileAnswerStore::new(temp_dir.path());

        for n in 1..=13 {
            store
                .upsert_by_code(&id, ModuleKey::Dpia, &format!("DPIA-{:02}", n), TriState::No.into())
                .await
                .unwrap();
        }
        store
            .upsert_by_code(&id, ModuleKey::Dpia, "DPIA-14", TriState::Yes.into())
            .await
            .unwrap();

        let rows = store.get_all(&id, ModuleKey::Dpia).await.unwrap();
        assert_eq!(rows.len(), 14);
        assert_eq!(
            rows.iter().filter(|r| r.value == AnswerValue::Tri(TriState::No)).count(),
            13
        );
    }
}
