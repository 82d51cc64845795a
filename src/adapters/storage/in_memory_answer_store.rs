//! In-Memory Answer Store Adapter
//!
//! Keeps raw answers in memory. Used by tests and the `memory` backend.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{
    AnswerValue, AssessmentId, DomainError, ModuleKey, StoredAnswer, Timestamp,
};
use crate::ports::AnswerStore;

type ModuleAnswers = Vec<StoredAnswer>;

/// In-memory storage for questionnaire answers
#[derive(Debug, Clone, Default)]
pub struct InMemoryAnswerStore {
    answers: Arc<RwLock<HashMap<(AssessmentId, ModuleKey), ModuleAnswers>>>,
}

impl InMemoryAnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored answers across all assessments (useful for tests)
    pub async fn answer_count(&self) -> usize {
        self.answers.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl AnswerStore for InMemoryAnswerStore {
    async fn get_all(
        &self,
        assessment_id: &AssessmentId,
        module: ModuleKey,
    ) -> Result<Vec<StoredAnswer>, DomainError> {
        let answers = self.answers.read().await;
        Ok(answers
            .get(&(*assessment_id, module))
            .cloned()
            .unwrap_or_default())
    }

    async fn upsert_by_code(
        &self,
        assessment_id: &AssessmentId,
        module: ModuleKey,
        code: &str,
        value: AnswerValue,
    ) -> Result<(), DomainError> {
        let mut answers = self.answers.write().await;
        let rows = answers.entry((*assessment_id, module)).or_default();
        upsert(rows, code, value);
        Ok(())
    }
}

/// Replaces the row for `code` in place, or appends a new one.
pub(super) fn upsert(rows: &mut Vec<StoredAnswer>, code: &str, value: AnswerValue) {
    let answered_at = Timestamp::now();
    match rows.iter_mut().find(|row| row.code == code) {
        Some(row) => {
            row.value = value;
            row.answered_at = answered_at;
        }
        None => rows.push(StoredAnswer {
            code: code.to_string(),
            value,
            answered_at,
        }),
    }
}
