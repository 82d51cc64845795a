//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Every handler that touches an assessment holds that assessment's lock from
//! `AssessmentLocks` for the whole read-modify-write.

pub mod handlers;
pub mod locks;

pub use handlers::{
    AssessmentEvaluator, CreateAssessmentCommand, CreateAssessmentHandler, CreateAssessmentResult,
    Evaluation, GetModuleResultHandler, GetModuleResultQuery, ModuleResult, RefreshAllHandler,
    RefreshAllResult, RegisterConnectionCommand, RegisterConnectionHandler,
    RegisterConnectionResult, RemoveConnectionCommand, RemoveConnectionHandler,
    UpdateModuleAnswersCommand, UpdateModuleAnswersHandler, UpdateModuleAnswersResult,
};
pub use locks::AssessmentLocks;
