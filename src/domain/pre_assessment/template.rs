//! The fixed pre-assessment checklist and its phase-2 evaluation order.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::family::Family;
use super::rule::{ExternalSignal, NodeRule};
use crate::domain::foundation::TriState;

use Family::*;
use NodeRule::{Constant, Copy as CopyOf, EitherOf, External, FamilyAggregate, Manual};

/// Static definition of one checklist node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphNodeTemplate {
    pub code: &'static str,
    pub prompt: &'static str,
    pub family: Family,
    pub rule: NodeRule,
}

const fn node(
    code: &'static str,
    family: Family,
    rule: NodeRule,
    prompt: &'static str,
) -> GraphNodeTemplate {
    GraphNodeTemplate {
        code,
        prompt,
        family,
        rule,
    }
}

/// One ordered step of phase 2. Nodes in a stage may only read nodes
/// resolved in phase 1 or in an earlier stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub name: &'static str,
    pub nodes: &'static [&'static str],
}

pub const STRUCTURAL_USE: &str = "GEN-01";
pub const NIS2_AGGREGATE: &str = "NIS2-04";

const NIS2_MEMBERS: &[&str] = &["NIS2-01", "NIS2-02", "NIS2-03"];

pub static GRAPH_TEMPLATE: [GraphNodeTemplate; 50] = [
    // General
    node(STRUCTURAL_USE, General, Constant(TriState::Yes),
        "Is this a structurally used system (not a pilot or one-off)?"),
    node("GEN-02", General, Manual, "Does the system replace an existing application?"),
    node("GEN-03", General, Manual, "Is the system offered as a cloud service (SaaS)?"),
    node("GEN-04", General, Manual, "Will patients use the system directly?"),
    node("GEN-05", General, Manual, "Is the supplier new to the organisation?"),
    node("GEN-06", General, Manual, "Does the contract value exceed the tender threshold?"),
    // GDPR
    node("GDPR-01", Gdpr, External(ExternalSignal::DpiaPersonalData),
        "Are personal data processed?"),
    node("GDPR-02", Gdpr, External(ExternalSignal::DpiaRequired),
        "Is a DPIA required?"),
    node("GDPR-03", Gdpr, External(ExternalSignal::DpiaSpecialCategory),
        "Are special categories of personal data processed?"),
    node("GDPR-04", Gdpr, Manual,
        "Does the supplier act as a processor on behalf of the organisation?"),
    node("GDPR-05", Gdpr, CopyOf("GDPR-01"),
        "Must the processing be recorded in the register of processing activities?"),
    node("GDPR-06", Gdpr, External(ExternalSignal::DpiaOutsideEea),
        "Are personal data transferred outside the EEA?"),
    node("GDPR-07", Gdpr, External(ExternalSignal::DpiaAutomatedDecisions),
        "Are automated individual decisions taken?"),
    // AI Act mirror
    node("AI-01", AiAct, External(ExternalSignal::AiActInScope),
        "Does the AI Act apply to the system?"),
    node("AI-02", AiAct, External(ExternalSignal::AiActHighRisk),
        "Is the system a high-risk AI system?"),
    node("AI-03", AiAct, External(ExternalSignal::AiActTransparency),
        "Do AI transparency obligations apply?"),
    node("AI-04", AiAct, Manual,
        "Has the supplier provided AI Act conformity documentation?"),
    node("AI-05", AiAct, Manual, "Is meaningful human oversight of the AI organised?"),
    // MDR mirror
    node("MDR-01", Mdr, External(ExternalSignal::MdrIsDevice),
        "Is the system a medical device?"),
    node("MDR-02", Mdr, External(ExternalSignal::MdrHighRisk),
        "Is the medical device class IIa or higher?"),
    node("MDR-03", Mdr, External(ExternalSignal::MdrClassIII),
        "Is the medical device class III?"),
    node("MDR-04", Mdr, Manual, "Does the supplier hold a valid CE certificate?"),
    node("MDR-05", Mdr, Manual,
        "Is post-market surveillance information shared with the organisation?"),
    // NIS2
    node("NIS2-01", Nis2, Manual,
        "Is the system part of the delivery of an essential service?"),
    node("NIS2-02", Nis2, Manual,
        "Would an outage significantly disrupt the delivery of care?"),
    node("NIS2-03", Nis2, Manual,
        "Is the supplier an essential or important entity under NIS2?"),
    node(NIS2_AGGREGATE, Nis2, FamilyAggregate(NIS2_MEMBERS),
        "Does NIS2 apply to this procurement?"),
    // NEN / ISO information security
    node("NEN-01", NenIso, CopyOf(NIS2_AGGREGATE),
        "Is an ISO 27001 / NEN 7510 risk analysis required under NIS2?"),
    node("NEN-02", NenIso, EitherOf("GDPR-03", NIS2_AGGREGATE),
        "Must the supplier be NEN 7510 certified?"),
    node("NEN-03", NenIso, Manual,
        "Does the system exchange data that falls under NEN 7512?"),
    node("NEN-04", NenIso, Manual,
        "Does the system log access to patient data according to NEN 7513?"),
    node("NEN-05", NenIso, Manual, "Does the system support multi-factor authentication?"),
    // ISO quality
    node("QMS-01", IsoQuality, CopyOf("MDR-01"),
        "Is an ISO 13485 quality management system required from the supplier?"),
    node("QMS-02", IsoQuality, EitherOf("MDR-01", "AI-02"),
        "Is an ISO 14971 risk management file required?"),
    node("QMS-03", IsoQuality, Manual, "Is the supplier ISO 9001 certified?"),
    node("QMS-04", IsoQuality, CopyOf("MDR-02"),
        "Is IEC 62304 software lifecycle evidence required?"),
    // Connections mirror
    node("CON-01", Connections, External(ExternalSignal::ConnectionsPresent),
        "Does the system exchange data with other systems?"),
    node("CON-02", Connections, External(ExternalSignal::ConnectionsHighSensitivity),
        "Do interfaces carry identifiable medical or personal data?"),
    node("CON-03", Connections, Manual,
        "Are standard exchange formats (HL7, FHIR) used?"),
    node("CON-04", Connections, Manual, "Are all interfaces documented?"),
    // Supply-chain security
    node("SUP-01", SupplyChainSecurity, EitherOf("CON-02", "QMS-01"),
        "Is a supplier security assessment required?"),
    node("SUP-02", SupplyChainSecurity, CopyOf("CON-01"),
        "Are security agreements for the interfaces needed?"),
    node("SUP-03", SupplyChainSecurity, Manual, "Does the supplier use subcontractors?"),
    node("SUP-04", SupplyChainSecurity, Manual,
        "Is a software bill of materials (SBOM) available?"),
    node("SUP-05", SupplyChainSecurity, Manual,
        "Does the supplier publish a vulnerability disclosure policy?"),
    // Continuity
    node("BCM-01", Continuity, Manual, "Is the system critical for round-the-clock care?"),
    node("BCM-02", Continuity, Manual, "Is a fallback procedure available during outages?"),
    node("BCM-03", Continuity, Manual, "Is an exit strategy agreed with the supplier?"),
    node("BCM-04", Continuity, CopyOf(NIS2_AGGREGATE),
        "Do NIS2 continuity requirements apply?"),
    node("BCM-05", Continuity, Manual, "Can data be exported in a standard format?"),
];

/// Position of each node in `GRAPH_TEMPLATE`, keyed by code.
pub static GRAPH_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    GRAPH_TEMPLATE
        .iter()
        .enumerate()
        .map(|(i, node)| (node.code, i))
        .collect()
});

/// Phase-2 order: NIS2 aggregate first, then everything that consumes it,
/// then ISO quality (reads MDR mirror), then supply chain (reads
/// Connections mirror and ISO quality), then the remaining copies.
pub static PIPELINE: [Stage; 5] = [
    Stage {
        name: "nis2-aggregate",
        nodes: &[NIS2_AGGREGATE],
    },
    Stage {
        name: "nen-iso",
        nodes: &["NEN-01", "NEN-02"],
    },
    Stage {
        name: "iso-quality",
        nodes: &["QMS-01", "QMS-02", "QMS-04"],
    },
    Stage {
        name: "supply-chain",
        nodes: &["SUP-01", "SUP-02"],
    },
    Stage {
        name: "mirrors",
        nodes: &["GDPR-05", "BCM-04"],
    },
];
