//! In-Memory Connection Repository Adapter

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{AssessmentId, ConnectionId, DomainError};
use crate::domain::risk::Connection;
use crate::ports::ConnectionRepository;

/// In-memory storage for registered connections
#[derive(Debug, Clone, Default)]
pub struct InMemoryConnectionRepository {
    connections: Arc<RwLock<HashMap<AssessmentId, Vec<Connection>>>>,
}

impl InMemoryConnectionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryConnectionRepository {
    async fn list_by_assessment(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<Vec<Connection>, DomainError> {
        let connections = self.connections.read().await;
        Ok(connections.get(assessment_id).cloned().unwrap_or_default())
    }

    async fn save(&self, connection: &Connection) -> Result<(), DomainError> {
        let mut connections = self.connections.write().await;
        let list = connections.entry(connection.assessment_id).or_default();
        match list.iter_mut().find(|c| c.id == connection.id) {
            Some(existing) => *existing = connection.clone(),
            None => list.push(connection.clone()),
        }
        Ok(())
    }

    async fn delete(
        &self,
        assessment_id: &AssessmentId,
        id: &ConnectionId,
    ) -> Result<(), DomainError> {
        let mut connections = self.connections.write().await;
        let list = connections
            .get_mut(assessment_id)
            .ok_or_else(|| DomainError::connection_not_found(id))?;
        let before = list.len();
        list.retain(|c| c.id != *id);
        if list.len() == before {
            return Err(DomainError::connection_not_found(id));
        }
        Ok(())
    }
}
