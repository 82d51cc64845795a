//! AssessmentEvaluator - Loads raw inputs and runs every engine in
//! dependency order.
//!
//! `Dpia -> {Mdr, SecurityProfile, Connections} -> AiAct -> PreAssessment -> OverallRisk`
//!
//! Each run starts from the raw answers and registered connections only.
//! Nothing derived is read back from storage, so two runs over unchanged
//! inputs produce equal results.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::domain::assessment::AssessmentSummary;
use crate::domain::foundation::{AnswerEntry, AnswerSet, AssessmentId, DomainError, ModuleKey};
use crate::domain::pre_assessment::{PreAssessmentGraph, PreAssessmentResult, UpstreamOutputs};
use crate::domain::risk::{
    AiActEngine, AiActResult, Connection, ConnectionsEngine, ConnectionsResult, DpiaEngine,
    DpiaResult, MdrEngine, MdrResult, OverallRiskAggregator, OverallRiskResult, RiskInputs,
    SecurityProfileEngine, SecurityProfileResult, SecurityScore,
};
use crate::ports::{AnswerStore, AssessmentRepository, ConnectionRepository};

/// Raw inputs of one assessment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssessmentInputs {
    answers: HashMap<ModuleKey, AnswerSet>,
    connections: Vec<Connection>,
}

impl AssessmentInputs {
    pub fn new(answers: HashMap<ModuleKey, AnswerSet>, connections: Vec<Connection>) -> Self {
        Self {
            answers,
            connections,
        }
    }

    /// Answers of one module; empty if none were stored.
    pub fn answers(&self, module: ModuleKey) -> AnswerSet {
        self.answers.get(&module).cloned().unwrap_or_default()
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }
}

/// Read-model of one module: its questions, typed verdict, explanation and
/// completeness, recomputed on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "module", content = "result", rename_all = "snake_case")]
pub enum ModuleResult {
    Dpia(DpiaResult),
    Mdr(MdrResult),
    SecurityProfile(SecurityProfileResult),
    Connections(ConnectionsResult),
    AiAct(AiActResult),
    PreAssessment(PreAssessmentResult),
    OverallRisk(OverallRiskResult),
}

impl ModuleResult {
    pub fn module(&self) -> ModuleKey {
        match self {
            ModuleResult::Dpia(_) => ModuleKey::Dpia,
            ModuleResult::Mdr(_) => ModuleKey::Mdr,
            ModuleResult::SecurityProfile(_) => ModuleKey::SecurityProfile,
            ModuleResult::Connections(_) => ModuleKey::Connections,
            ModuleResult::AiAct(_) => ModuleKey::AiAct,
            ModuleResult::PreAssessment(_) => ModuleKey::PreAssessment,
            ModuleResult::OverallRisk(_) => ModuleKey::OverallRisk,
        }
    }

    pub fn explanation(&self) -> &str {
        match self {
            ModuleResult::Dpia(r) => &r.explanation,
            ModuleResult::Mdr(r) => &r.explanation,
            ModuleResult::SecurityProfile(r) => &r.explanation,
            ModuleResult::Connections(r) => &r.explanation,
            ModuleResult::AiAct(r) => &r.explanation,
            ModuleResult::PreAssessment(r) => &r.explanation,
            ModuleResult::OverallRisk(r) => &r.explanation,
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            ModuleResult::Dpia(r) => r.is_complete,
            ModuleResult::Mdr(r) => r.is_complete,
            ModuleResult::SecurityProfile(r) => r.is_complete,
            ModuleResult::Connections(r) => r.is_complete,
            ModuleResult::AiAct(r) => r.is_complete,
            ModuleResult::PreAssessment(r) => r.is_complete,
            ModuleResult::OverallRisk(r) => r.is_complete,
        }
    }
}

/// Results of one full recompute.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub dpia: DpiaResult,
    pub mdr: MdrResult,
    pub security_profile: SecurityProfileResult,
    pub connections: ConnectionsResult,
    pub ai_act: AiActResult,
    pub pre_assessment: PreAssessmentResult,
    pub overall_risk: OverallRiskResult,
}

impl Evaluation {
    /// Runs every engine over `inputs`. Pure; performs no I/O.
    pub fn run(inputs: &AssessmentInputs) -> Self {
        let dpia = DpiaEngine::new(inputs.answers(ModuleKey::Dpia)).result();
        let signals = dpia.signals;

        let mdr = MdrEngine::new(signals, inputs.answers(ModuleKey::Mdr)).result();
        let security_profile =
            SecurityProfileEngine::new(signals, inputs.answers(ModuleKey::SecurityProfile))
                .result();
        let connections = ConnectionsEngine::evaluate(&signals, inputs.connections());

        let ai_act = AiActEngine::new(signals, mdr.class, inputs.answers(ModuleKey::AiAct)).result();

        let upstream = UpstreamOutputs {
            dpia: signals,
            dpia_required: dpia.requirement,
            mdr_class: mdr.class,
            ai_act_tier: ai_act.tier,
            connections_tier: connections.tier,
            connection_count: inputs.connections().len(),
        };
        let pre_assessment =
            PreAssessmentGraph::new(inputs.answers(ModuleKey::PreAssessment)).evaluate(&upstream);

        let overall_risk = OverallRiskAggregator::aggregate(&RiskInputs {
            dpia_required: dpia.requirement,
            connections_tier: connections.tier,
            mdr_class: mdr.class,
            ai_act_tier: ai_act.tier,
            security: security_profile.has_input.then_some(SecurityScore {
                weighted_sum: security_profile.weighted_sum,
                question_count: security_profile.question_count,
            }),
        });

        Self {
            dpia,
            mdr,
            security_profile,
            connections,
            ai_act,
            pre_assessment,
            overall_risk,
        }
    }

    pub fn module_result(&self, module: ModuleKey) -> ModuleResult {
        match module {
            ModuleKey::Dpia => ModuleResult::Dpia(self.dpia.clone()),
            ModuleKey::Mdr => ModuleResult::Mdr(self.mdr.clone()),
            ModuleKey::SecurityProfile => ModuleResult::SecurityProfile(self.security_profile.clone()),
            ModuleKey::Connections => ModuleResult::Connections(self.connections.clone()),
            ModuleKey::AiAct => ModuleResult::AiAct(self.ai_act.clone()),
            ModuleKey::PreAssessment => ModuleResult::PreAssessment(self.pre_assessment.clone()),
            ModuleKey::OverallRisk => ModuleResult::OverallRisk(self.overall_risk.clone()),
        }
    }

    /// The verdicts cached on the Assessment.
    pub fn summary(&self) -> AssessmentSummary {
        AssessmentSummary {
            dpia_required: self.dpia.requirement,
            mdr_class: self.mdr.class,
            ai_act_tier: self.ai_act.tier,
            connections_tier: self.connections.tier,
            security_score: self
                .security_profile
                .has_input
                .then_some(self.security_profile.score),
            overall_score: self.overall_risk.total_score,
            overall_class: self.overall_risk.risk_class,
            overall_label: self.overall_risk.label,
        }
    }
}

/// Splits `entries` into those the module's engine accepts and the codes it
/// ignores, judged against the current upstream results. Entries are tried
/// one at a time in submission order, so an entry that makes a later one
/// inapplicable is respected.
pub fn admit_entries(
    module: ModuleKey,
    inputs: &AssessmentInputs,
    current: &Evaluation,
    entries: &[AnswerEntry],
) -> (Vec<AnswerEntry>, Vec<String>) {
    let signals = current.dpia.signals;
    let answers = inputs.answers(module);

    match module {
        ModuleKey::Dpia => {
            let mut engine = DpiaEngine::new(answers);
            partition(entries, |e| engine.set_answers(std::slice::from_ref(e)).is_empty())
        }
        ModuleKey::Mdr => {
            let mut engine = MdrEngine::new(signals, answers);
            partition(entries, |e| engine.set_answers(std::slice::from_ref(e)).is_empty())
        }
        ModuleKey::SecurityProfile => {
            let mut engine = SecurityProfileEngine::new(signals, answers);
            partition(entries, |e| engine.set_answers(std::slice::from_ref(e)).is_empty())
        }
        ModuleKey::AiAct => {
            let mut engine = AiActEngine::new(signals, current.mdr.class, answers);
            partition(entries, |e| engine.set_answers(std::slice::from_ref(e)).is_empty())
        }
        ModuleKey::PreAssessment => {
            let mut graph = PreAssessmentGraph::new(answers);
            partition(entries, |e| graph.update(std::slice::from_ref(e)).is_empty())
        }
        // Connections are registered individually; the overall risk has no questions.
        ModuleKey::Connections | ModuleKey::OverallRisk => partition(entries, |_| false),
    }
}

fn partition<F>(entries: &[AnswerEntry], mut admit: F) -> (Vec<AnswerEntry>, Vec<String>)
where
    F: FnMut(&AnswerEntry) -> bool,
{
    let mut accepted = Vec::new();
    let mut ignored = Vec::new();
    for entry in entries {
        if admit(entry) {
            accepted.push(entry.clone());
        } else {
            ignored.push(entry.code.clone());
        }
    }
    (accepted, ignored)
}

/// Loads an assessment's raw inputs, recomputes all modules and rewrites the
/// cached summary. Callers hold the assessment's lock.
pub struct AssessmentEvaluator {
    assessments: Arc<dyn AssessmentRepository>,
    answers: Arc<dyn AnswerStore>,
    connections: Arc<dyn ConnectionRepository>,
}

impl AssessmentEvaluator {
    pub fn new(
        assessments: Arc<dyn AssessmentRepository>,
        answers: Arc<dyn AnswerStore>,
        connections: Arc<dyn ConnectionRepository>,
    ) -> Self {
        Self {
            assessments,
            answers,
            connections,
        }
    }

    pub fn answers(&self) -> &Arc<dyn AnswerStore> {
        &self.answers
    }

    pub fn connections(&self) -> &Arc<dyn ConnectionRepository> {
        &self.connections
    }

    pub fn assessments(&self) -> &Arc<dyn AssessmentRepository> {
        &self.assessments
    }

    /// Reads every module's stored answers and the registered connections.
    pub async fn load_inputs(&self, id: &AssessmentId) -> Result<AssessmentInputs, DomainError> {
        let mut answers = HashMap::new();
        for module in ModuleKey::all() {
            if !module.accepts_answers() {
                continue;
            }
            let rows = self.answers.get_all(id, *module).await?;
            answers.insert(*module, AnswerSet::from_stored(rows));
        }
        let connections = self.connections.list_by_assessment(id).await?;
        Ok(AssessmentInputs::new(answers, connections))
    }

    /// Full recompute of one assessment, persisting the new summary.
    ///
    /// # Errors
    ///
    /// - `AssessmentNotFound` if the id is unknown
    /// - `StorageError` if the repository update fails
    pub async fn recompute(&self, id: &AssessmentId) -> Result<Evaluation, DomainError> {
        let mut assessment = self.assessments.get_by_id(id).await?;
        let inputs = self.load_inputs(id).await?;
        let evaluation = Evaluation::run(&inputs);

        let changed = assessment.record_evaluation(evaluation.summary());
        self.assessments.update(&assessment).await?;

        debug!(
            assessment_id = %id,
            changed,
            overall_class = ?evaluation.overall_risk.risk_class,
            "Recomputed assessment"
        );

        Ok(evaluation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::TriState;
    use crate::domain::risk::{dpia, mdr, AiActTier, DataSensitivity, MdrClass};

    fn inputs_with(module: ModuleKey, pairs: &[(&str, TriState)]) -> AssessmentInputs {
        let mut set = AnswerSet::new();
        for (code, value) in pairs {
            set.insert(*code, *value);
        }
        let mut answers = HashMap::new();
        answers.insert(module, set);
        AssessmentInputs::new(answers, Vec::new())
    }

    #[test]
    fn empty_inputs_leave_everything_unknown() {
        let evaluation = Evaluation::run(&AssessmentInputs::default());
        assert_eq!(evaluation.dpia.requirement, TriState::Unknown);
        assert_eq!(evaluation.mdr.class, MdrClass::Unknown);
        assert_eq!(evaluation.ai_act.tier, AiActTier::Unknown);
        assert!(!evaluation.security_profile.has_input);
        assert_eq!(evaluation.overall_risk.total_score, None);
        assert_eq!(evaluation.summary().overall_label, None);
        for module in ModuleKey::all() {
            assert!(!evaluation.module_result(*module).is_complete(), "{}", module);
        }
    }

    #[test]
    fn mdr_is_prefilled_from_dpia() {
        let inputs = inputs_with(ModuleKey::Dpia, &[(dpia::MEDICAL_PURPOSE, TriState::No)]);
        let evaluation = Evaluation::run(&inputs);
        assert_eq!(evaluation.mdr.class, MdrClass::NotMedicalDevice);
        assert_eq!(evaluation.summary().mdr_class, MdrClass::NotMedicalDevice);
    }

    #[test]
    fn run_is_deterministic() {
        let inputs = inputs_with(
            ModuleKey::Dpia,
            &[(dpia::PERSONAL_DATA, TriState::Yes), (dpia::AI_SYSTEM, TriState::Yes)],
        );
        assert_eq!(Evaluation::run(&inputs), Evaluation::run(&inputs));
    }

    #[test]
    fn connections_feed_pre_assessment_and_overall() {
        let id = AssessmentId::new();
        let connection = Connection::new(id, "EHR", DataSensitivity::Identifiable).unwrap();
        let inputs = AssessmentInputs::new(HashMap::new(), vec![connection]);
        let evaluation = Evaluation::run(&inputs);

        let con_01 = evaluation.pre_assessment.node("CON-01").unwrap();
        assert_eq!(con_01.question.answer, TriState::Yes);
        assert_eq!(evaluation.overall_risk.total_score, Some(3.0));
    }

    #[test]
    fn admit_rejects_mdr_answers_already_prefilled() {
        let inputs = inputs_with(ModuleKey::Dpia, &[(dpia::MEDICAL_PURPOSE, TriState::Yes)]);
        let current = Evaluation::run(&inputs);
        let (accepted, ignored) = admit_entries(
            ModuleKey::Mdr,
            &inputs,
            &current,
            &[
                AnswerEntry::new(mdr::MEDICAL_PURPOSE, TriState::No),
                AnswerEntry::choice(mdr::HARM_SEVERITY, "serious"),
                AnswerEntry::new(mdr::ADMINISTRATIVE_ONLY, TriState::Yes),
            ],
        );
        assert_eq!(accepted, vec![AnswerEntry::choice(mdr::HARM_SEVERITY, "serious")]);
        assert_eq!(
            ignored,
            vec![
                mdr::MEDICAL_PURPOSE.to_string(),
                mdr::ADMINISTRATIVE_ONLY.to_string()
            ]
        );
    }

    #[test]
    fn admit_ignores_everything_for_overall_and_connections() {
        let inputs = AssessmentInputs::default();
        let current = Evaluation::run(&inputs);
        let entries = [AnswerEntry::new("ANY", TriState::Yes)];
        for module in [ModuleKey::OverallRisk, ModuleKey::Connections] {
            let (accepted, ignored) = admit_entries(module, &inputs, &current, &entries);
            assert!(accepted.is_empty());
            assert_eq!(ignored, vec!["ANY".to_string()]);
        }
    }

    #[test]
    fn module_result_reports_its_module() {
        let evaluation = Evaluation::run(&AssessmentInputs::default());
        for module in ModuleKey::all() {
            assert_eq!(evaluation.module_result(*module).module(), *module);
        }
    }
}
