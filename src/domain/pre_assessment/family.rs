//! Topic families of the pre-assessment checklist.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    General,
    Gdpr,
    AiAct,
    Mdr,
    NenIso,
    Nis2,
    IsoQuality,
    SupplyChainSecurity,
    Connections,
    Continuity,
}

impl Family {
    /// All families in display order.
    pub fn all() -> &'static [Family] {
        &[
            Family::General,
            Family::Gdpr,
            Family::AiAct,
            Family::Mdr,
            Family::NenIso,
            Family::Nis2,
            Family::IsoQuality,
            Family::SupplyChainSecurity,
            Family::Connections,
            Family::Continuity,
        ]
    }

    /// Code prefix shared by the family's nodes.
    pub fn prefix(&self) -> &'static str {
        match self {
            Family::General => "GEN",
            Family::Gdpr => "GDPR",
            Family::AiAct => "AI",
            Family::Mdr => "MDR",
            Family::NenIso => "NEN",
            Family::Nis2 => "NIS2",
            Family::IsoQuality => "QMS",
            Family::SupplyChainSecurity => "SUP",
            Family::Connections => "CON",
            Family::Continuity => "BCM",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Family::General => "General",
            Family::Gdpr => "GDPR",
            Family::AiAct => "AI Act",
            Family::Mdr => "MDR",
            Family::NenIso => "NEN/ISO information security",
            Family::Nis2 => "NIS2",
            Family::IsoQuality => "ISO quality",
            Family::SupplyChainSecurity => "Supply-chain security",
            Family::Connections => "Connections",
            Family::Continuity => "Continuity",
        };
        write!(f, "{}", s)
    }
}
