//! Node rules of the pre-assessment graph and the module outputs they read.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::TriState;
use crate::domain::risk::{AiActTier, ConnectionTier, DpiaSignals, MdrClass};

/// Outputs of the upstream modules, passed in read-only.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UpstreamOutputs {
    pub dpia: DpiaSignals,
    pub dpia_required: TriState,
    pub mdr_class: MdrClass,
    pub ai_act_tier: AiActTier,
    pub connections_tier: ConnectionTier,
    pub connection_count: usize,
}

/// A value read from another module's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalSignal {
    DpiaPersonalData,
    DpiaRequired,
    DpiaSpecialCategory,
    DpiaOutsideEea,
    DpiaAutomatedDecisions,
    AiActInScope,
    AiActHighRisk,
    AiActTransparency,
    MdrIsDevice,
    MdrHighRisk,
    MdrClassIII,
    ConnectionsPresent,
    ConnectionsHighSensitivity,
}

impl ExternalSignal {
    pub fn read(&self, up: &UpstreamOutputs) -> TriState {
        match self {
            ExternalSignal::DpiaPersonalData => up.dpia.personal_data,
            ExternalSignal::DpiaRequired => up.dpia_required,
            ExternalSignal::DpiaSpecialCategory => up.dpia.special_category,
            ExternalSignal::DpiaOutsideEea => up.dpia.outside_eea,
            ExternalSignal::DpiaAutomatedDecisions => up.dpia.automated_decisions,
            ExternalSignal::AiActInScope => match up.ai_act_tier {
                AiActTier::Unknown => TriState::Unknown,
                AiActTier::OutsideScope => TriState::No,
                _ => TriState::Yes,
            },
            ExternalSignal::AiActHighRisk => match up.ai_act_tier {
                AiActTier::Unknown => TriState::Unknown,
                AiActTier::HighRisk | AiActTier::Prohibited => TriState::Yes,
                _ => TriState::No,
            },
            ExternalSignal::AiActTransparency => match up.ai_act_tier {
                AiActTier::Unknown => TriState::Unknown,
                AiActTier::LimitedRisk => TriState::Yes,
                _ => TriState::No,
            },
            ExternalSignal::MdrIsDevice => up.mdr_class.is_medical_device(),
            ExternalSignal::MdrHighRisk => up.mdr_class.is_high_risk(),
            ExternalSignal::MdrClassIII => match up.mdr_class {
                MdrClass::Unknown => TriState::Unknown,
                MdrClass::ClassIII => TriState::Yes,
                _ => TriState::No,
            },
            ExternalSignal::ConnectionsPresent => {
                if up.connection_count > 0 {
                    TriState::Yes
                } else {
                    up.dpia.interfaces
                }
            }
            ExternalSignal::ConnectionsHighSensitivity => match up.connections_tier {
                ConnectionTier::Unknown => TriState::Unknown,
                ConnectionTier::High => TriState::Yes,
                _ => TriState::No,
            },
        }
    }
}

/// How a node gets its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRule {
    /// Set by the user.
    Manual,
    /// Fixed value, never editable.
    Constant(TriState),
    /// Read from an upstream module (phase 1).
    External(ExternalSignal),
    /// Yes if any source is Yes, No if all are No (phase 2).
    FamilyAggregate(&'static [&'static str]),
    /// Yes if either source is Yes, No if both are No (phase 2).
    EitherOf(&'static str, &'static str),
    /// Verbatim copy of another node (phase 2).
    Copy(&'static str),
}

impl NodeRule {
    pub fn is_manual(&self) -> bool {
        matches!(self, NodeRule::Manual)
    }

    /// True for rules that read other nodes of the same graph.
    pub fn is_intra_graph(&self) -> bool {
        matches!(
            self,
            NodeRule::FamilyAggregate(_) | NodeRule::EitherOf(_, _) | NodeRule::Copy(_)
        )
    }

    /// Graph nodes this rule reads.
    pub fn sources(&self) -> Vec<&'static str> {
        match self {
            NodeRule::FamilyAggregate(members) => members.to_vec(),
            NodeRule::EitherOf(a, b) => vec![*a, *b],
            NodeRule::Copy(source) => vec![*source],
            NodeRule::Manual | NodeRule::Constant(_) | NodeRule::External(_) => Vec::new(),
        }
    }

    /// Applies an intra-graph rule, reading sources through `value_of`.
    /// Phase 1 rules return Unknown here; they are resolved elsewhere.
    pub fn combine<F>(&self, value_of: F) -> TriState
    where
        F: Fn(&str) -> TriState,
    {
        match self {
            NodeRule::FamilyAggregate(members) => {
                TriState::any_of(members.iter().map(|code| value_of(*code)))
            }
            NodeRule::EitherOf(a, b) => TriState::either(value_of(*a), value_of(*b)),
            NodeRule::Copy(source) => value_of(*source),
            NodeRule::Manual | NodeRule::Constant(_) | NodeRule::External(_) => TriState::Unknown,
        }
    }
}

/// Where a node's current value came from, as shown to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Provenance {
    Manual,
    Constant,
    External { signal: ExternalSignal },
    FamilyAggregate { sources: Vec<String> },
    EitherOf { sources: Vec<String> },
    Copy { source: String },
}

impl From<&NodeRule> for Provenance {
    fn from(rule: &NodeRule) -> Self {
        let owned = |codes: Vec<&'static str>| -> Vec<String> {
            codes.into_iter().map(str::to_string).collect()
        };
        match rule {
            NodeRule::Manual => Provenance::Manual,
            NodeRule::Constant(_) => Provenance::Constant,
            NodeRule::External(signal) => Provenance::External { signal: *signal },
            NodeRule::FamilyAggregate(_) => Provenance::FamilyAggregate {
                sources: owned(rule.sources()),
            },
            NodeRule::EitherOf(_, _) => Provenance::EitherOf {
                sources: owned(rule.sources()),
            },
            NodeRule::Copy(source) => Provenance::Copy {
                source: source.to_string(),
            },
        }
    }
}
