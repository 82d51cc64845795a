//! Connection repository port.
//!
//! Registered system interfaces of an assessment, rated by the Connections
//! engine.

use async_trait::async_trait;

use crate::domain::foundation::{AssessmentId, ConnectionId, DomainError};
use crate::domain::risk::Connection;

#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// Connections of one assessment in registration order.
    async fn list_by_assessment(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<Vec<Connection>, DomainError>;

    /// Save a new connection.
    async fn save(&self, connection: &Connection) -> Result<(), DomainError>;

    /// Delete a connection.
    ///
    /// # Errors
    ///
    /// - `ConnectionNotFound` if it is not registered on this assessment
    async fn delete(
        &self,
        assessment_id: &AssessmentId,
        id: &ConnectionId,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn connection_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn ConnectionRepository) {}
    }
}
