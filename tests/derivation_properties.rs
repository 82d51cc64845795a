//! Property tests for the tri-state combinators and risk aggregation.

use proptest::prelude::*;

use procurement_risk::domain::foundation::{AnswerSet, AnswerValue, AssessmentId, TriState};
use procurement_risk::domain::pre_assessment::{
    Family, NodeRule, PreAssessmentGraph, UpstreamOutputs, GRAPH_TEMPLATE,
};
use procurement_risk::domain::risk::{
    ai_act, classify_total, mdr, AiActEngine, AiActTier, Connection, ConnectionTier, ConnectionsEngine, DataSensitivity,
    DpiaSignals, MdrClass, MdrEngine, OverallRiskAggregator, RiskInputs, SecurityScore,
};

fn tri() -> impl Strategy<Value = TriState> {
    prop_oneof![
        Just(TriState::Yes),
        Just(TriState::No),
        Just(TriState::Unknown)
    ]
}

fn sensitivity() -> impl Strategy<Value = DataSensitivity> {
    prop_oneof![
        Just(DataSensitivity::NoData),
        Just(DataSensitivity::Low),
        Just(DataSensitivity::Aggregated),
        Just(DataSensitivity::Identifiable),
        "[a-z]{3,8}".prop_map(DataSensitivity::Unrecognized),
    ]
}

fn mdr_class() -> impl Strategy<Value = MdrClass> {
    prop_oneof![
        Just(MdrClass::Unknown),
        Just(MdrClass::NotMedicalDevice),
        Just(MdrClass::ClassI),
        Just(MdrClass::ClassIIa),
        Just(MdrClass::ClassIIb),
        Just(MdrClass::ClassIII),
    ]
}

fn ai_tier() -> impl Strategy<Value = AiActTier> {
    prop_oneof![
        Just(AiActTier::Unknown),
        Just(AiActTier::OutsideScope),
        Just(AiActTier::MinimalRisk),
        Just(AiActTier::LimitedRisk),
        Just(AiActTier::HighRisk),
        Just(AiActTier::Prohibited),
    ]
}

fn connection_tier() -> impl Strategy<Value = ConnectionTier> {
    prop_oneof![
        Just(ConnectionTier::Unknown),
        Just(ConnectionTier::Negligible),
        Just(ConnectionTier::Low),
        Just(ConnectionTier::Medium),
        Just(ConnectionTier::High),
    ]
}

fn device_class_iia_or_higher() -> impl Strategy<Value = MdrClass> {
    prop_oneof![
        Just(MdrClass::ClassIIa),
        Just(MdrClass::ClassIIb),
        Just(MdrClass::ClassIII),
    ]
}

/// Any harm severity answer: absent, a recognized label, or arbitrary text.
fn severity_label() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        prop_oneof![
            Just("fatal/irreversible".to_string()),
            Just("serious".to_string()),
            Just("non-serious".to_string()),
            Just("none".to_string()),
            "[a-zA-Z ]{1,12}",
        ]
        .prop_map(Some),
    ]
}

fn ai_answers(a: TriState, rest: [TriState; 4]) -> AnswerSet {
    let mut answers = AnswerSet::new();
    answers.insert(ai_act::AI_SYSTEM, a);
    let codes = [
        ai_act::TRIAGE_ACCESS,
        ai_act::DIRECT_CLINICAL_DECISION,
        ai_act::INTERACTS_WITH_USERS,
        ai_act::GENERATES_CONTENT,
    ];
    for (code, value) in codes.iter().zip(rest) {
        answers.insert(*code, value);
    }
    answers
}

fn risk_inputs() -> impl Strategy<Value = RiskInputs> {
    (
        tri(),
        connection_tier(),
        mdr_class(),
        ai_tier(),
        proptest::option::of(0u32..=27),
    )
        .prop_map(|(dpia_required, connections_tier, mdr_class, ai_act_tier, security)| {
            RiskInputs {
                dpia_required,
                connections_tier,
                mdr_class,
                ai_act_tier,
                security: security.map(|weighted_sum| SecurityScore {
                    weighted_sum,
                    question_count: 8,
                }),
            }
        })
}

proptest! {
    #[test]
    fn any_of_matches_its_definition(members in prop::collection::vec(tri(), 0..8)) {
        let result = TriState::any_of(members.iter().copied());
        if members.iter().any(|m| m.is_yes()) {
            prop_assert_eq!(result, TriState::Yes);
        } else if !members.is_empty() && members.iter().all(|m| m.is_no()) {
            prop_assert_eq!(result, TriState::No);
        } else {
            prop_assert_eq!(result, TriState::Unknown);
        }
    }

    #[test]
    fn either_is_commutative_and_yes_dominates(a in tri(), b in tri()) {
        prop_assert_eq!(TriState::either(a, b), TriState::either(b, a));
        prop_assert_eq!(TriState::either(a, TriState::Yes), TriState::Yes);
        prop_assert_eq!(
            TriState::either(a, b) == TriState::No,
            a == TriState::No && b == TriState::No
        );
    }

    #[test]
    fn whole_totals_round_at_two_fifths(total in 0u64..200) {
        let expected = if total % 5 >= 2 { total / 5 + 1 } else { total / 5 };
        prop_assert_eq!(u64::from(classify_total(total, 1)), expected);
    }

    #[test]
    fn classification_ignores_fraction_scaling(num in 0u64..1000, den in 1u64..50, k in 1u64..20) {
        prop_assert_eq!(classify_total(num, den), classify_total(num * k, den * k));
    }

    #[test]
    fn classification_is_monotone(num in 0u64..1000, den in 1u64..50) {
        prop_assert!(classify_total(num, den) <= classify_total(num + 1, den));
    }

    #[test]
    fn overall_is_unset_only_without_any_input(inputs in risk_inputs()) {
        let result = OverallRiskAggregator::aggregate(&inputs);
        let any_input = inputs.dpia_required.is_known()
            || inputs.connections_tier != ConnectionTier::Unknown
            || inputs.mdr_class != MdrClass::Unknown
            || inputs.ai_act_tier.is_known()
            || inputs.security.is_some();
        prop_assert_eq!(result.total_score.is_some(), any_input);
        prop_assert_eq!(result.risk_class.is_some(), any_input);
        prop_assert_eq!(result.label.is_some(), any_input);
    }

    #[test]
    fn requiring_a_dpia_never_lowers_the_class(inputs in risk_inputs()) {
        let without = OverallRiskAggregator::aggregate(&RiskInputs {
            dpia_required: TriState::No,
            ..inputs
        });
        let with = OverallRiskAggregator::aggregate(&RiskInputs {
            dpia_required: TriState::Yes,
            ..inputs
        });
        prop_assert!(without.risk_class <= with.risk_class);
    }

    #[test]
    fn connection_tier_is_order_independent(levels in prop::collection::vec(sensitivity(), 1..6)) {
        let id = AssessmentId::new();
        let connections: Vec<Connection> = levels
            .into_iter()
            .enumerate()
            .map(|(i, level)| Connection::new(id, format!("link-{}", i), level).unwrap())
            .collect();
        let mut reversed = connections.clone();
        reversed.reverse();

        let signals = DpiaSignals::default();
        let forward = ConnectionsEngine::evaluate(&signals, &connections);
        let backward = ConnectionsEngine::evaluate(&signals, &reversed);
        prop_assert_eq!(forward.tier, backward.tier);
        prop_assert_eq!(
            Some(forward.tier),
            connections.iter().map(|c| c.sensitivity.tier()).max()
        );
    }

    #[test]
    fn graph_evaluation_is_idempotent_and_families_aggregate(
        values in prop::collection::vec(tri(), GRAPH_TEMPLATE.len()),
        dpia_required in tri(),
        mdr in mdr_class(),
        ai in ai_tier(),
    ) {
        let mut answers = AnswerSet::new();
        for (node, value) in GRAPH_TEMPLATE.iter().zip(values) {
            if matches!(node.rule, NodeRule::Manual) {
                answers.insert(node.code, value);
            }
        }
        let upstream = UpstreamOutputs {
            dpia_required,
            mdr_class: mdr,
            ai_act_tier: ai,
            ..UpstreamOutputs::default()
        };
        let graph = PreAssessmentGraph::new(answers);
        let first = graph.evaluate(&upstream);
        prop_assert_eq!(&first, &graph.evaluate(&upstream));

        for family in Family::all() {
            let members = first
                .nodes
                .iter()
                .filter(|n| n.family == *family)
                .map(|n| n.question.answer);
            prop_assert_eq!(first.family(*family), TriState::any_of(members));
        }
    }

    #[test]
    fn non_ai_system_is_outside_scope_whatever_else_holds(
        rest in prop::array::uniform4(tri()),
        class in mdr_class(),
        from_dpia in any::<bool>(),
    ) {
        let (dpia, answers) = if from_dpia {
            (DpiaSignals { ai_system: TriState::No, ..DpiaSignals::default() }, ai_answers(TriState::Unknown, rest))
        } else {
            (DpiaSignals::default(), ai_answers(TriState::No, rest))
        };
        let result = AiActEngine::new(dpia, class, answers).result();
        prop_assert_eq!(result.tier, AiActTier::OutsideScope);
        prop_assert_eq!(result.score, 0);
    }

    #[test]
    fn open_ai_flag_never_yields_a_risk_tier(
        rest in prop::array::uniform4(tri()),
        class in mdr_class(),
    ) {
        let result = AiActEngine::new(DpiaSignals::default(), class, ai_answers(TriState::Unknown, rest))
            .result();
        let anything_known = class != MdrClass::Unknown || rest.iter().any(|v| v.is_known());
        let expected = if anything_known { AiActTier::OutsideScope } else { AiActTier::Unknown };
        prop_assert_eq!(result.tier, expected);
    }

    #[test]
    fn ai_system_on_high_class_device_is_high_risk_whatever_else_holds(
        rest in prop::array::uniform4(tri()),
        class in device_class_iia_or_higher(),
    ) {
        let result = AiActEngine::new(DpiaSignals::default(), class, ai_answers(TriState::Yes, rest))
            .result();
        prop_assert_eq!(result.tier, AiActTier::HighRisk);
    }

    #[test]
    fn no_medical_purpose_is_not_a_device_whatever_else_holds(
        clinical in tri(),
        dpia_clinical in tri(),
        severity in severity_label(),
        from_dpia in any::<bool>(),
    ) {
        let mut answers = AnswerSet::new();
        answers.insert(mdr::CLINICAL_INTERPRETATION, clinical);
        if let Some(label) = severity {
            answers.insert(mdr::HARM_SEVERITY, AnswerValue::Choice(label));
        }
        let mut dpia = DpiaSignals { clinical_interpretation: dpia_clinical, ..DpiaSignals::default() };
        if from_dpia {
            dpia.medical_purpose = TriState::No;
        } else {
            answers.insert(mdr::MEDICAL_PURPOSE, TriState::No);
        }

        let result = MdrEngine::new(dpia, answers).result();
        prop_assert_eq!(result.class, MdrClass::NotMedicalDevice);
        let harm = result.questions.iter().find(|q| q.code == mdr::HARM_SEVERITY).unwrap();
        prop_assert_eq!(harm.choice.as_deref(), Some("none"));
    }
}
