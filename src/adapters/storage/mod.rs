//! Storage Adapters
//!
//! Implementations of the `AnswerStore`, `AssessmentRepository` and
//! `ConnectionRepository` ports.
//!
//! ## Available Adapters
//!
//! - **InMemory*** - Keeps everything in tokio `RwLock` maps (testing/development)
//! - **File*** - YAML documents under one directory per assessment
//!
//! ## Layout of the file backend
//!
//! ```text
//! <data_dir>/<assessment_id>/assessment.yaml
//! <data_dir>/<assessment_id>/connections.yaml
//! <data_dir>/<assessment_id>/answers/<module>.yaml
//! ```

mod file_answer_store;
mod file_assessment_repository;
mod file_connection_repository;
mod in_memory_answer_store;
mod in_memory_assessment_repository;
mod in_memory_connection_repository;
mod yaml_document;

pub use file_answer_store::FileAnswerStore;
pub use file_assessment_repository::FileAssessmentRepository;
pub use file_connection_repository::FileConnectionRepository;
pub use in_memory_answer_store::InMemoryAnswerStore;
pub use in_memory_assessment_repository::InMemoryAssessmentRepository;
pub use in_memory_connection_repository::InMemoryConnectionRepository;
