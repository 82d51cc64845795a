//! Module evaluation handlers.

mod evaluator;
mod get_module_result;
mod update_module_answers;

pub use evaluator::{
    admit_entries, AssessmentEvaluator, AssessmentInputs, Evaluation, ModuleResult,
};
pub use get_module_result::{GetModuleResultHandler, GetModuleResultQuery};
pub use update_module_answers::{
    UpdateModuleAnswersCommand, UpdateModuleAnswersHandler, UpdateModuleAnswersResult,
};
