//! File-based Connection Repository Adapter
//!
//! All connections of an assessment live in
//! `<base>/<assessment_id>/connections.yaml`, in registration order.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::yaml_document;
use crate::domain::foundation::{AssessmentId, ConnectionId, DomainError};
use crate::domain::risk::Connection;
use crate::ports::ConnectionRepository;

#[derive(Debug, Clone)]
pub struct FileConnectionRepository {
    base_path: PathBuf,
}

impl FileConnectionRepository {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn file_path(&self, assessment_id: &AssessmentId) -> PathBuf {
        self.base_path
            .join(assessment_id.to_string())
            .join("connections.yaml")
    }

    async fn load(&self, assessment_id: &AssessmentId) -> Result<Vec<Connection>, DomainError> {
        let path = self.file_path(assessment_id);
        let connections: Option<Vec<Connection>> = yaml_document::load(&path, "connections").await?;
        Ok(connections.unwrap_or_default())
    }

    async fn store(
        &self,
        assessment_id: &AssessmentId,
        connections: &[Connection],
    ) -> Result<(), DomainError> {
        yaml_document::store(&self.file_path(assessment_id), connections, "connections").await
    }
}

#[async_trait]
impl ConnectionRepository for FileConnectionRepository {
    async fn list_by_assessment(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<Vec<Connection>, DomainError> {
        self.load(assessment_id).await
    }

    async fn save(&self, connection: &Connection) -> Result<(), DomainError> {
        let mut connections = self.load(&connection.assessment_id).await?;
        match connections.iter_mut().find(|c| c.id == connection.id) {
            Some(existing) => *existing = connection.clone(),
            None => connections.push(connection.clone()),
        }
        self.store(&connection.assessment_id, &connections).await
    }

    async fn delete(
        &self,
        assessment_id: &AssessmentId,
        id: &ConnectionId,
    ) -> Result<(), DomainError> {
        let mut connections = self.load(assessment_id).await?;
        let before = connections.len();
        connections.retain(|c| c.id != *id);
        if connections.len() == before {
            return Err(DomainError::connection_not_found(id));
        }
        self.store(assessment_id, &connections).await
    }
}
