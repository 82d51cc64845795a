//! Pre-assessment checklist - a fixed graph of tri-state nodes grouped in
//! topic families.
//!
//! Nodes are either set by the user or derived. Derived nodes read other
//! modules' outputs (phase 1) or other nodes of this graph (phase 2). The
//! phase-2 order is an explicit pipeline of stages, validated so that every
//! rule only reads nodes that are already resolved.

mod family;
mod graph;
mod rule;
mod template;

pub use family::Family;
pub use graph::{
    validate_pipeline, FamilyFlag, GraphNode, PipelineError, PreAssessmentGraph,
    PreAssessmentResult,
};
pub use rule::{ExternalSignal, NodeRule, Provenance, UpstreamOutputs};
pub use template::{
    GraphNodeTemplate, Stage, GRAPH_TEMPLATE, NIS2_AGGREGATE, PIPELINE, STRUCTURAL_USE,
};
