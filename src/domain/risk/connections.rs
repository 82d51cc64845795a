//! Interface (connection) risk - rates every registered interface by the
//! sensitivity of the data it carries and keeps the highest tier.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::dpia::DpiaSignals;
use crate::domain::foundation::{
    AnswerSource, AssessmentId, ConnectionId, QuestionNode, QuestionTemplate, Timestamp, TriState,
    ValidationError,
};

pub const HAS_INTERFACES: &str = "CONN-00";

pub static CONNECTIONS_QUESTIONS: [QuestionTemplate; 1] = [QuestionTemplate::new(
    HAS_INTERFACES,
    "Does the system exchange data with other systems?",
)];

/// Sensitivity of the data carried by one interface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "level", content = "label")]
pub enum DataSensitivity {
    NoData,
    Low,
    /// Aggregated, anonymized or pseudonymous data.
    Aggregated,
    /// Identifiable medical or personal data.
    Identifiable,
    Unrecognized(String),
}

impl DataSensitivity {
    /// Parses a sensitivity label. Unrecognized labels are kept verbatim.
    pub fn parse(label: &str) -> DataSensitivity {
        let normalized = label.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "none" | "no data" | "no_data" => DataSensitivity::NoData,
            "low" => DataSensitivity::Low,
            "aggregated" | "anonymized" | "anonymised" | "pseudonymous" | "pseudonymized"
            | "aggregated/anonymized/pseudonymous" => DataSensitivity::Aggregated,
            "identifiable" | "medical" | "personal" | "identifiable medical/personal" => {
                DataSensitivity::Identifiable
            }
            _ => DataSensitivity::Unrecognized(label.to_string()),
        }
    }

    pub fn tier(&self) -> ConnectionTier {
        match self {
            DataSensitivity::NoData => ConnectionTier::Negligible,
            DataSensitivity::Low => ConnectionTier::Low,
            DataSensitivity::Aggregated => ConnectionTier::Medium,
            DataSensitivity::Identifiable => ConnectionTier::High,
            DataSensitivity::Unrecognized(_) => ConnectionTier::Negligible,
        }
    }
}

/// Connection risk tier; ordered so that `max` yields the worst interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionTier {
    #[default]
    Unknown,
    Negligible,
    Low,
    Medium,
    High,
}

impl ConnectionTier {
    /// Contribution to the overall risk score; None while unknown.
    pub fn score(&self) -> Option<u8> {
        match self {
            ConnectionTier::Unknown => None,
            ConnectionTier::Negligible => Some(0),
            ConnectionTier::Low => Some(1),
            ConnectionTier::Medium => Some(2),
            ConnectionTier::High => Some(3),
        }
    }
}

impl fmt::Display for ConnectionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionTier::Unknown => "unknown",
            ConnectionTier::Negligible => "none",
            ConnectionTier::Low => "low",
            ConnectionTier::Medium => "medium",
            ConnectionTier::High => "high",
        };
        write!(f, "{}", s)
    }
}

/// A registered interface between the assessed system and another system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub assessment_id: AssessmentId,
    pub name: String,
    pub sensitivity: DataSensitivity,
    pub registered_at: Timestamp,
}

impl Connection {
    pub fn new(
        assessment_id: AssessmentId,
        name: impl Into<String>,
        sensitivity: DataSensitivity,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(Self {
            id: ConnectionId::new(),
            assessment_id,
            name,
            sensitivity,
            registered_at: Timestamp::now(),
        })
    }
}

/// One connection with its computed tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedConnection {
    pub connection: Connection,
    pub tier: ConnectionTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionsResult {
    pub questions: Vec<QuestionNode>,
    pub connections: Vec<RatedConnection>,
    pub tier: ConnectionTier,
    pub explanation: String,
    pub is_complete: bool,
}

pub struct ConnectionsEngine;

impl ConnectionsEngine {
    /// Rates all connections. The DPIA interface answer only shapes the
    /// explanation and the empty case; it never lowers a computed tier.
    pub fn evaluate(dpia: &DpiaSignals, connections: &[Connection]) -> ConnectionsResult {
        let gate = dpia.interfaces;
        let questions = vec![QuestionNode::from_template(
            &CONNECTIONS_QUESTIONS[0],
            gate,
            AnswerSource::Prefilled,
        )];

        let rated: Vec<RatedConnection> = connections
            .iter()
            .map(|c| RatedConnection {
                tier: c.sensitivity.tier(),
                connection: c.clone(),
            })
            .collect();

        let (tier, explanation) = match rated.iter().map(|r| r.tier).max() {
            Some(max) => {
                let unrecognized = rated
                    .iter()
                    .filter(|r| matches!(r.connection.sensitivity, DataSensitivity::Unrecognized(_)))
                    .count();
                let mut text = format!(
                    "{} registered interface(s); highest data sensitivity gives tier {}.",
                    rated.len(),
                    max
                );
                if unrecognized > 0 {
                    text.push_str(&format!(
                        " {} interface(s) have an unrecognized sensitivity and count as none.",
                        unrecognized
                    ));
                }
                if gate.is_no() {
                    text.push_str(
                        " Note: the DPIA states there are no interfaces, but interfaces are registered.",
                    );
                }
                (max, text)
            }
            None => match gate {
                TriState::No => (
                    ConnectionTier::Negligible,
                    "The system has no interfaces with other systems.".to_string(),
                ),
                TriState::Yes => (
                    ConnectionTier::Unknown,
                    "The DPIA states the system has interfaces, but none are registered yet."
                        .to_string(),
                ),
                TriState::Unknown => (
                    ConnectionTier::Unknown,
                    "No interfaces registered and the DPIA interface question is open.".to_string(),
                ),
            },
        };

        ConnectionsResult {
            questions,
            connections: rated,
            is_complete: tier != ConnectionTier::Unknown,
            tier,
            explanation,
        }
    }
}
