//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod assessment;
pub mod connections;
pub mod evaluation;

pub use assessment::{
    CreateAssessmentCommand, CreateAssessmentHandler, CreateAssessmentResult, RefreshAllHandler,
    RefreshAllResult, RefreshedAssessment,
};
pub use connections::{
    RegisterConnectionCommand, RegisterConnectionHandler, RegisterConnectionResult,
    RemoveConnectionCommand, RemoveConnectionHandler,
};
pub use evaluation::{
    admit_entries, AssessmentEvaluator, AssessmentInputs, Evaluation, GetModuleResultHandler,
    GetModuleResultQuery, ModuleResult, UpdateModuleAnswersCommand, UpdateModuleAnswersHandler,
    UpdateModuleAnswersResult,
};
