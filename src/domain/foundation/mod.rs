//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the assessment domain.

mod answer;
mod errors;
mod ids;
mod module_key;
mod question;
mod timestamp;
mod tri_state;

pub use answer::{AnswerEntry, AnswerSet, AnswerValue, StoredAnswer};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AssessmentId, ConnectionId};
pub use module_key::ModuleKey;
pub use question::{AnswerSource, QuestionNode, QuestionTemplate};
pub use timestamp::Timestamp;
pub use tri_state::TriState;
