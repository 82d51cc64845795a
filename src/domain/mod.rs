//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (tri-state, answers, IDs, errors)
//! - `risk` - Pure engines for DPIA, MDR, AI Act, Connections, Security and overall risk
//! - `pre_assessment` - The pre-assessment checklist graph
//! - `assessment` - The Assessment aggregate and its cached summary

pub mod assessment;
pub mod foundation;
pub mod pre_assessment;
pub mod risk;
