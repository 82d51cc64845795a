//! Assessment lifecycle handlers.

mod create_assessment;
mod refresh_all;

pub use create_assessment::{
    CreateAssessmentCommand, CreateAssessmentHandler, CreateAssessmentResult,
};
pub use refresh_all::{RefreshAllHandler, RefreshAllResult, RefreshedAssessment};
