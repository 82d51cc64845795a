//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `storage` - Answer, assessment and connection storage (in-memory, YAML files)

pub mod storage;

pub use storage::{
    FileAnswerStore, FileAssessmentRepository, FileConnectionRepository, InMemoryAnswerStore,
    InMemoryAssessmentRepository, InMemoryConnectionRepository,
};
