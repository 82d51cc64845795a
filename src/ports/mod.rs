//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AnswerStore` - Raw answers per assessment and module
//! - `AssessmentRepository` - Assessment aggregate persistence
//! - `ConnectionRepository` - Registered system interfaces

mod answer_store;
mod assessment_repository;
mod connection_repository;

pub use answer_store::AnswerStore;
pub use assessment_repository::AssessmentRepository;
pub use connection_repository::ConnectionRepository;
