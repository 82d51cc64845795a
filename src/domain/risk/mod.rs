//! Risk Module - Pure engines for the regulatory questionnaires.
//!
//! Each engine takes the raw answers of its module plus the outputs of the
//! modules it depends on, and returns a typed result. Nothing here performs
//! I/O; the application layer loads answers and runs the engines in order.
//!
//! # Components
//!
//! - `DpiaEngine` - Whether a data protection impact assessment is mandatory
//! - `MdrEngine` - Medical device class (EU MDR rule 11)
//! - `AiActEngine` - AI Act risk tier
//! - `ConnectionsEngine` - Highest data sensitivity over registered interfaces
//! - `SecurityProfileEngine` - Weighted supplier security score
//! - `OverallRiskAggregator` - Combined risk class from all module verdicts
//!
//! Question codes are exported per module (`dpia::PERSONAL_DATA`,
//! `mdr::HARM_SEVERITY`, ...) since several questionnaires ask similar things.

pub mod ai_act;
pub mod connections;
pub mod dpia;
pub mod mdr;
pub mod overall_risk;
pub mod security_profile;

pub use ai_act::{AiActEngine, AiActResult, AiActTier, AI_ACT_QUESTIONS};
pub use connections::{
    Connection, ConnectionTier, ConnectionsEngine, ConnectionsResult, DataSensitivity,
    RatedConnection, CONNECTIONS_QUESTIONS,
};
pub use dpia::{DpiaEngine, DpiaResult, DpiaSignals, DPIA_QUESTIONS};
pub use mdr::{HarmSeverity, MdrClass, MdrEngine, MdrResult, MDR_QUESTIONS};
pub use overall_risk::{
    classify_total, OverallRiskAggregator, OverallRiskResult, RiskContribution, RiskInputs,
    RiskLabel, SecurityScore,
};
pub use security_profile::{
    ImpactClass, SecurityProfileEngine, SecurityProfileResult, SECURITY_QUESTIONS,
};
