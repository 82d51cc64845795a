//! File-based Assessment Repository Adapter
//!
//! One YAML document per assessment at `<base>/<assessment_id>/assessment.yaml`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

use super::yaml_document;
use crate::domain::assessment::Assessment;
use crate::domain::foundation::{AssessmentId, DomainError};
use crate::ports::AssessmentRepository;

const ASSESSMENT_FILE: &str = "assessment.yaml";

/// File-based storage for Assessment aggregates
#[derive(Debug, Clone)]
pub struct FileAssessmentRepository {
    base_path: PathBuf,
}

impl FileAssessmentRepository {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn file_path(&self, id: &AssessmentId) -> PathBuf {
        self.base_path.join(id.to_string()).join(ASSESSMENT_FILE)
    }

    async fn write(&self, assessment: &Assessment) -> Result<(), DomainError> {
        yaml_document::store(&self.file_path(&assessment.id()), assessment, "assessment").await
    }
}

#[async_trait]
impl AssessmentRepository for FileAssessmentRepository {
    async fn get_by_id(&self, id: &AssessmentId) -> Result<Assessment, DomainError> {
        yaml_document::load(&self.file_path(id), "assessment")
            .await?
            .ok_or_else(|| DomainError::assessment_not_found(id))
    }

    async fn list_all(&self) -> Result<Vec<Assessment>, DomainError> {
        if !yaml_document::exists(&self.base_path).await? {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&self.base_path)
            .await
            .map_err(|e| DomainError::storage(format!("IO error: {}", e)))?;

        let mut all = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| DomainError::storage(format!("IO error: {}", e)))?
        {
            let path = entry.path().join(ASSESSMENT_FILE);
            match yaml_document::load::<Assessment>(&path, "assessment").await {
                Ok(Some(assessment)) => all.push(assessment),
                Ok(None) => continue,
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable assessment"),
            }
        }

        all.sort_by_key(|a| (a.created_at(), a.id()));
        Ok(all)
    }

    async fn save(&self, assessment: &Assessment) -> Result<(), DomainError> {
        self.write(assessment).await
    }

    async fn update(&self, assessment: &Assessment) -> Result<(), DomainError> {
        if !yaml_document::exists(&self.file_path(&assessment.id())).await? {
            return Err(DomainError::assessment_not_found(assessment.id()));
        }
        self.write(assessment).await
    }
}
