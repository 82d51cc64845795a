//! Assessment Module - The aggregate root tying module verdicts to one
//! procurement.

mod aggregate;

pub use aggregate::{Assessment, AssessmentSummary};
