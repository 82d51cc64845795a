//! ModuleKey enum naming each classification module of an assessment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// The classification modules, listed in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKey {
    Dpia,
    Mdr,
    SecurityProfile,
    Connections,
    AiAct,
    PreAssessment,
    OverallRisk,
}

impl ModuleKey {
    /// All modules in the order they are recomputed.
    pub fn all() -> &'static [ModuleKey] {
        &[
            ModuleKey::Dpia,
            ModuleKey::Mdr,
            ModuleKey::SecurityProfile,
            ModuleKey::Connections,
            ModuleKey::AiAct,
            ModuleKey::PreAssessment,
            ModuleKey::OverallRisk,
        ]
    }

    /// Stable key used by stores and APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKey::Dpia => "dpia",
            ModuleKey::Mdr => "mdr",
            ModuleKey::SecurityProfile => "security_profile",
            ModuleKey::Connections => "connections",
            ModuleKey::AiAct => "ai_act",
            ModuleKey::PreAssessment => "pre_assessment",
            ModuleKey::OverallRisk => "overall_risk",
        }
    }

    /// Returns true if callers can submit answers for this module.
    pub fn accepts_answers(&self) -> bool {
        !matches!(self, ModuleKey::OverallRisk)
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModuleKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleKey::all()
            .iter()
            .find(|key| key.as_str() == s)
            .copied()
            .ok_or_else(|| {
                ValidationError::invalid_format("module_key", format!("unknown module '{}'", s))
            })
    }
}
