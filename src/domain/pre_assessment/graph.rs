//! Two-phase evaluation of the pre-assessment checklist.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use super::family::Family;
use super::rule::{NodeRule, Provenance, UpstreamOutputs};
use super::template::{GraphNodeTemplate, Stage, GRAPH_INDEX, GRAPH_TEMPLATE, PIPELINE};
use crate::domain::foundation::{AnswerEntry, AnswerSet, AnswerSource, QuestionNode, TriState};

/// Structural problems in a template/pipeline pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("Node '{0}' appears more than once in the template")]
    DuplicateNode(String),

    #[error("Stage '{stage}' references unknown node '{node}'")]
    UnknownNode { stage: String, node: String },

    #[error("Node '{0}' is scheduled in phase 2 but has no intra-graph rule")]
    NotIntraGraph(String),

    #[error("Node '{0}' is scheduled more than once")]
    ScheduledTwice(String),

    #[error("Derived node '{0}' is never scheduled")]
    Unscheduled(String),

    #[error("Node '{node}' reads '{source_node}' before it is evaluated")]
    ForwardReference { node: String, source_node: String },
}

/// One evaluated checklist node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    #[serde(flatten)]
    pub question: QuestionNode,
    pub family: Family,
    pub provenance: Provenance,
}

/// Aggregate applicability of one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyFlag {
    pub family: Family,
    pub applicable: TriState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreAssessmentResult {
    pub nodes: Vec<GraphNode>,
    pub families: Vec<FamilyFlag>,
    pub explanation: String,
    pub is_complete: bool,
}

impl PreAssessmentResult {
    pub fn node(&self, code: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.question.code == code)
    }

    pub fn family(&self, family: Family) -> TriState {
        self.families
            .iter()
            .find(|f| f.family == family)
            .map(|f| f.applicable)
            .unwrap_or(TriState::Unknown)
    }
}

/// Checks that `pipeline` evaluates every intra-graph node of `template`
/// exactly once and only after all of its sources.
pub fn validate_pipeline(
    template: &[GraphNodeTemplate],
    pipeline: &[Stage],
) -> Result<(), PipelineError> {
    let mut by_code: HashMap<&str, &GraphNodeTemplate> = HashMap::new();
    for node in template {
        if by_code.insert(node.code, node).is_some() {
            return Err(PipelineError::DuplicateNode(node.code.to_string()));
        }
    }

    let mut resolved: HashSet<&str> = template
        .iter()
        .filter(|n| !n.rule.is_intra_graph())
        .map(|n| n.code)
        .collect();

    for stage in pipeline {
        // Within a stage nodes may not read each other.
        let mut finished = Vec::new();
        for code in stage.nodes {
            let node = by_code.get(code).ok_or_else(|| PipelineError::UnknownNode {
                stage: stage.name.to_string(),
                node: code.to_string(),
            })?;
            if !node.rule.is_intra_graph() {
                return Err(PipelineError::NotIntraGraph(code.to_string()));
            }
            if resolved.contains(code) || finished.contains(code) {
                return Err(PipelineError::ScheduledTwice(code.to_string()));
            }
            if let Some(source) = node.rule.sources().into_iter().find(|s| !resolved.contains(s)) {
                return Err(PipelineError::ForwardReference {
                    node: code.to_string(),
                    source_node: source.to_string(),
                });
            }
            finished.push(*code);
        }
        resolved.extend(finished);
    }

    if let Some(node) = template.iter().find(|n| !resolved.contains(n.code)) {
        return Err(PipelineError::Unscheduled(node.code.to_string()));
    }
    Ok(())
}

fn find_node<'t>(template: &'t [GraphNodeTemplate], code: &str) -> Option<&'t GraphNodeTemplate> {
    if std::ptr::eq(template, GRAPH_TEMPLATE.as_slice()) {
        return GRAPH_INDEX.get(code).and_then(|i| template.get(*i));
    }
    template.iter().find(|n| n.code == code)
}

/// The pre-assessment checklist for one assessment.
#[derive(Debug, Clone)]
pub struct PreAssessmentGraph<'a> {
    template: &'a [GraphNodeTemplate],
    pipeline: &'a [Stage],
    answers: AnswerSet,
}

impl PreAssessmentGraph<'static> {
    /// Graph over the standard checklist.
    pub fn new(answers: AnswerSet) -> Self {
        Self {
            template: &GRAPH_TEMPLATE,
            pipeline: &PIPELINE,
            answers,
        }
    }
}

impl<'a> PreAssessmentGraph<'a> {
    /// Graph over a custom checklist; the pipeline must be valid for it.
    pub fn with_template(
        template: &'a [GraphNodeTemplate],
        pipeline: &'a [Stage],
        answers: AnswerSet,
    ) -> Result<Self, PipelineError> {
        validate_pipeline(template, pipeline)?;
        Ok(Self {
            template,
            pipeline,
            answers,
        })
    }

    fn find(&self, code: &str) -> Option<&'a GraphNodeTemplate> {
        find_node(self.template, code)
    }

    /// Only manual nodes accept edits.
    pub fn accepts(&self, code: &str) -> bool {
        self.find(code).is_some_and(|n| n.rule.is_manual())
    }

    /// Applies manual answers; everything else is returned as ignored.
    pub fn update(&mut self, entries: &[AnswerEntry]) -> Vec<String> {
        let template = self.template;
        self.answers.apply_entries(entries, |code| {
            find_node(template, code).is_some_and(|n| n.rule.is_manual())
        })
    }

    /// Recomputes every node from the raw answers and upstream outputs.
    pub fn evaluate(&self, upstream: &UpstreamOutputs) -> PreAssessmentResult {
        if self.template.is_empty() {
            return PreAssessmentResult {
                nodes: Vec::new(),
                families: Family::all()
                    .iter()
                    .map(|f| FamilyFlag {
                        family: *f,
                        applicable: TriState::Unknown,
                    })
                    .collect(),
                explanation: "The pre-assessment checklist has no nodes configured.".to_string(),
                is_complete: false,
            };
        }

        let mut values: HashMap<&str, TriState> = HashMap::with_capacity(self.template.len());

        // Phase 1: manual, constant and module-derived nodes.
        for node in self.template {
            let value = match node.rule {
                NodeRule::Manual => self.answers.tri(node.code),
                NodeRule::Constant(v) => v,
                NodeRule::External(signal) => signal.read(upstream),
                NodeRule::FamilyAggregate(_) | NodeRule::EitherOf(_, _) | NodeRule::Copy(_) => {
                    continue
                }
            };
            values.insert(node.code, value);
        }

        // Phase 2: intra-graph rules in fixed stage order.
        for stage in self.pipeline {
            for code in stage.nodes {
                let Some(node) = self.find(code) else {
                    continue;
                };
                let value = node
                    .rule
                    .combine(|source| values.get(source).copied().unwrap_or(TriState::Unknown));
                values.insert(node.code, value);
            }
        }

        let nodes: Vec<GraphNode> = self
            .template
            .iter()
            .map(|n| {
                let answer = values.get(n.code).copied().unwrap_or(TriState::Unknown);
                let source = match n.rule {
                    NodeRule::Manual => AnswerSource::Manual,
                    _ => AnswerSource::Derived,
                };
                GraphNode {
                    question: QuestionNode {
                        code: n.code.to_string(),
                        prompt: n.prompt.to_string(),
                        answer,
                        choice: None,
                        source,
                        weight: None,
                        mandatory: n.rule.is_manual(),
                    },
                    family: n.family,
                    provenance: Provenance::from(&n.rule),
                }
            })
            .collect();

        let families: Vec<FamilyFlag> = Family::all()
            .iter()
            .map(|family| FamilyFlag {
                family: *family,
                applicable: TriState::any_of(
                    nodes
                        .iter()
                        .filter(|n| n.family == *family)
                        .map(|n| n.question.answer),
                ),
            })
            .collect();

        let answered = nodes.iter().filter(|n| n.question.answer.is_known()).count();
        let applicable: Vec<String> = families
            .iter()
            .filter(|f| f.applicable.is_yes())
            .map(|f| f.family.to_string())
            .collect();
        let explanation = format!(
            "{} of {} checklist items known; applicable families: {}.",
            answered,
            nodes.len(),
            if applicable.is_empty() {
                "none yet".to_string()
            } else {
                applicable.join(", ")
            }
        );

        PreAssessmentResult {
            is_complete: answered == nodes.len(),
            nodes,
            families,
            explanation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pre_assessment::rule::ExternalSignal;
    use crate::domain::pre_assessment::template::{NIS2_AGGREGATE, STRUCTURAL_USE};
    use crate::domain::risk::{AiActTier, ConnectionTier, MdrClass};

    fn graph_with(pairs: &[(&str, TriState)]) -> PreAssessmentGraph<'static> {
        let mut answers = AnswerSet::new();
        for (code, value) in pairs {
            answers.insert(*code, *value);
        }
        PreAssessmentGraph::new(answers)
    }

    fn value(result: &PreAssessmentResult, code: &str) -> TriState {
        result.node(code).unwrap().question.answer
    }

    #[test]
    fn standard_pipeline_is_valid() {
        assert_eq!(validate_pipeline(&GRAPH_TEMPLATE, &PIPELINE), Ok(()));
    }

    #[test]
    fn template_has_fifty_nodes_in_ten_families() {
        assert_eq!(GRAPH_TEMPLATE.len(), 50);
        for family in Family::all() {
            assert!(GRAPH_TEMPLATE.iter().any(|n| n.family == *family), "{}", family);
        }
    }

    #[test]
    fn either_of_is_used_for_three_pairs() {
        let count = GRAPH_TEMPLATE
            .iter()
            .filter(|n| matches!(n.rule, NodeRule::EitherOf(_, _)))
            .count();
        assert_eq!(count, 3);
    }

    #[test]
    fn forward_reference_is_rejected() {
        static TEMPLATE: [GraphNodeTemplate; 3] = [
            GraphNodeTemplate {
                code: "A",
                prompt: "a",
                family: Family::General,
                rule: NodeRule::Manual,
            },
            GraphNodeTemplate {
                code: "B",
                prompt: "b",
                family: Family::General,
                rule: NodeRule::Copy("C"),
            },
            GraphNodeTemplate {
                code: "C",
                prompt: "c",
                family: Family::General,
                rule: NodeRule::Copy("A"),
            },
        ];
        static BAD: [Stage; 1] = [Stage {
            name: "only",
            nodes: &["B", "C"],
        }];
        static GOOD: [Stage; 2] = [
            Stage {
                name: "first",
                nodes: &["C"],
            },
            Stage {
                name: "second",
                nodes: &["B"],
            },
        ];

        assert_eq!(
            validate_pipeline(&TEMPLATE, &BAD),
            Err(PipelineError::ForwardReference {
                node: "B".to_string(),
                source_node: "C".to_string()
            })
        );
        assert!(validate_pipeline(&TEMPLATE, &GOOD).is_ok());
        assert!(PreAssessmentGraph::with_template(&TEMPLATE, &BAD, AnswerSet::new()).is_err());
    }

    #[test]
    fn unscheduled_derived_node_is_rejected() {
        assert_eq!(
            validate_pipeline(&GRAPH_TEMPLATE, &PIPELINE[..4]),
            Err(PipelineError::Unscheduled("GDPR-05".to_string()))
        );
    }

    #[test]
    fn structural_use_is_constant_yes_and_not_editable() {
        let mut graph = PreAssessmentGraph::new(AnswerSet::new());
        let ignored = graph.update(&[AnswerEntry::new(STRUCTURAL_USE, TriState::No)]);
        assert_eq!(ignored, vec![STRUCTURAL_USE.to_string()]);
        let result = graph.evaluate(&UpstreamOutputs::default());
        assert_eq!(value(&result, STRUCTURAL_USE), TriState::Yes);
        assert_eq!(result.family(Family::General), TriState::Yes);
    }

    #[test]
    fn nis2_all_no_gives_family_no() {
        let graph = graph_with(&[
            ("NIS2-01", TriState::No),
            ("NIS2-02", TriState::No),
            ("NIS2-03", TriState::No),
        ]);
        let result = graph.evaluate(&UpstreamOutputs::default());
        assert_eq!(value(&result, NIS2_AGGREGATE), TriState::No);
        assert_eq!(result.family(Family::Nis2), TriState::No);
        assert_eq!(value(&result, "NEN-01"), TriState::No);
        assert_eq!(value(&result, "BCM-04"), TriState::No);
    }

    #[test]
    fn nis2_single_yes_gives_family_yes() {
        let graph = graph_with(&[
            ("NIS2-01", TriState::No),
            ("NIS2-02", TriState::Yes),
            ("NIS2-03", TriState::No),
        ]);
        let result = graph.evaluate(&UpstreamOutputs::default());
        assert_eq!(result.family(Family::Nis2), TriState::Yes);
        assert_eq!(value(&result, "NEN-01"), TriState::Yes);
        // NIS2 alone is enough for NEN 7510 certification
        assert_eq!(value(&result, "NEN-02"), TriState::Yes);
    }

    #[test]
    fn nis2_mixed_unknown_stays_unknown() {
        let graph = graph_with(&[("NIS2-01", TriState::No)]);
        let result = graph.evaluate(&UpstreamOutputs::default());
        assert_eq!(value(&result, NIS2_AGGREGATE), TriState::Unknown);
        assert_eq!(value(&result, "NEN-02"), TriState::Unknown);
    }

    #[test]
    fn supply_chain_reads_values_computed_in_the_same_pass() {
        let upstream = UpstreamOutputs {
            mdr_class: MdrClass::ClassI,
            connections_tier: ConnectionTier::Low,
            connection_count: 1,
            ..UpstreamOutputs::default()
        };
        let result = PreAssessmentGraph::new(AnswerSet::new()).evaluate(&upstream);
        // MDR-01 -> QMS-01 -> SUP-01
        assert_eq!(value(&result, "MDR-01"), TriState::Yes);
        assert_eq!(value(&result, "QMS-01"), TriState::Yes);
        assert_eq!(value(&result, "SUP-01"), TriState::Yes);
        assert_eq!(value(&result, "SUP-02"), TriState::Yes);
    }

    #[test]
    fn supply_chain_definite_no_needs_both_sources_no() {
        let upstream = UpstreamOutputs {
            mdr_class: MdrClass::NotMedicalDevice,
            connections_tier: ConnectionTier::Low,
            connection_count: 1,
            ai_act_tier: AiActTier::OutsideScope,
            ..UpstreamOutputs::default()
        };
        let result = PreAssessmentGraph::new(AnswerSet::new()).evaluate(&upstream);
        assert_eq!(value(&result, "QMS-01"), TriState::No);
        assert_eq!(value(&result, "QMS-02"), TriState::No);
        assert_eq!(value(&result, "CON-02"), TriState::No);
        assert_eq!(value(&result, "SUP-01"), TriState::No);
    }

    #[test]
    fn manual_update_ignores_derived_and_unknown_codes() {
        let mut graph = PreAssessmentGraph::new(AnswerSet::new());
        let ignored = graph.update(&[
            AnswerEntry::new("GEN-02", TriState::Yes),
            AnswerEntry::new(NIS2_AGGREGATE, TriState::Yes),
            AnswerEntry::new("MDR-01", TriState::Yes),
            AnswerEntry::new("XYZ-99", TriState::Yes),
        ]);
        assert_eq!(ignored.len(), 3);
        let result = graph.evaluate(&UpstreamOutputs::default());
        assert_eq!(value(&result, "GEN-02"), TriState::Yes);
        assert_eq!(value(&result, NIS2_AGGREGATE), TriState::Unknown);
        assert_eq!(value(&result, "MDR-01"), TriState::Unknown);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let graph = graph_with(&[("NIS2-02", TriState::Yes), ("GEN-03", TriState::No)]);
        let upstream = UpstreamOutputs {
            dpia_required: TriState::Yes,
            ..UpstreamOutputs::default()
        };
        assert_eq!(graph.evaluate(&upstream), graph.evaluate(&upstream));
    }

    #[test]
    fn provenance_is_reported_per_node() {
        let result = PreAssessmentGraph::new(AnswerSet::new()).evaluate(&UpstreamOutputs::default());
        assert_eq!(
            result.node("GDPR-02").unwrap().provenance,
            Provenance::External {
                signal: ExternalSignal::DpiaRequired
            }
        );
        assert_eq!(result.node("GEN-02").unwrap().provenance, Provenance::Manual);
        assert_eq!(result.families.len(), Family::all().len());
    }

    #[test]
    fn empty_template_degrades_to_unknown() {
        let graph = PreAssessmentGraph::with_template(&[], &[], AnswerSet::new()).unwrap();
        let result = graph.evaluate(&UpstreamOutputs::default());
        assert!(result.nodes.is_empty());
        assert!(result.families.iter().all(|f| f.applicable == TriState::Unknown));
        assert!(!result.is_complete);
    }
}
