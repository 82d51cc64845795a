//! Overall risk - weighted sum of all module verdicts, bucketed into a
//! risk class and label.
//!
//! The sum is kept as an exact fraction (the security profile contributes
//! a mean), so the 0.4 rounding threshold is evaluated without floating
//! point error.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ai_act::AiActTier;
use super::connections::ConnectionTier;
use super::mdr::MdrClass;
use crate::domain::foundation::{ModuleKey, TriState};

/// Points a DPIA requirement adds to the total.
pub const DPIA_REQUIRED_POINTS: u8 = 3;

/// Width of one risk class on the total-score axis.
const CLASS_WIDTH: u64 = 5;

/// Fraction of a class width (in fifths) from which a total rounds up.
const ROUND_UP_FIFTHS: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    None,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLabel {
    pub fn from_class(class: u8) -> RiskLabel {
        match class {
            0 => RiskLabel::None,
            1 => RiskLabel::Low,
            2 => RiskLabel::Medium,
            3 => RiskLabel::High,
            _ => RiskLabel::VeryHigh,
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLabel::None => "none",
            RiskLabel::Low => "low",
            RiskLabel::Medium => "medium",
            RiskLabel::High => "high",
            RiskLabel::VeryHigh => "very high",
        };
        write!(f, "{}", s)
    }
}

/// The security mean as an exact fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityScore {
    pub weighted_sum: u32,
    pub question_count: u32,
}

/// Module verdicts feeding the aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RiskInputs {
    pub dpia_required: TriState,
    pub connections_tier: ConnectionTier,
    pub mdr_class: MdrClass,
    pub ai_act_tier: AiActTier,
    /// None when no security question has been answered.
    pub security: Option<SecurityScore>,
}

/// What one module added to the total; `points` is None when it produced no input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskContribution {
    pub module: ModuleKey,
    pub points: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallRiskResult {
    pub contributions: Vec<RiskContribution>,
    /// Unset (not zero) while no module has produced input.
    pub total_score: Option<f64>,
    pub risk_class: Option<u8>,
    pub label: Option<RiskLabel>,
    pub explanation: String,
    pub is_complete: bool,
}

pub struct OverallRiskAggregator;

impl OverallRiskAggregator {
    pub fn aggregate(inputs: &RiskInputs) -> OverallRiskResult {
        let dpia = inputs
            .dpia_required
            .as_bool()
            .map(|required| if required { DPIA_REQUIRED_POINTS } else { 0 });
        let whole_points = [
            (ModuleKey::Dpia, dpia),
            (ModuleKey::Connections, inputs.connections_tier.score()),
            (ModuleKey::Mdr, inputs.mdr_class.score()),
            (
                ModuleKey::AiAct,
                inputs.ai_act_tier.is_known().then(|| inputs.ai_act_tier.score()),
            ),
        ];
        let security = inputs.security.filter(|s| s.question_count > 0);

        let mut contributions: Vec<RiskContribution> = whole_points
            .iter()
            .map(|(module, points)| RiskContribution {
                module: *module,
                points: points.map(f64::from),
            })
            .collect();
        contributions.push(RiskContribution {
            module: ModuleKey::SecurityProfile,
            points: security.map(|s| f64::from(s.weighted_sum) / f64::from(s.question_count)),
        });

        let is_complete = contributions.iter().all(|c| c.points.is_some());
        let any_input = contributions.iter().any(|c| c.points.is_some());
        if !any_input {
            return OverallRiskResult {
                contributions,
                total_score: None,
                risk_class: None,
                label: None,
                explanation: "No module has produced input yet; the overall risk is not set."
                    .to_string(),
                is_complete: false,
            };
        }

        let whole: u64 = whole_points
            .iter()
            .filter_map(|(_, p)| p.map(u64::from))
            .sum();
        let (numerator, denominator) = match security {
            Some(s) => {
                let den = u64::from(s.question_count);
                (whole * den + u64::from(s.weighted_sum), den)
            }
            None => (whole, 1),
        };

        let class = classify_total(numerator, denominator);
        let label = RiskLabel::from_class(class);
        let total = numerator as f64 / denominator as f64;
        let missing: Vec<&str> = contributions
            .iter()
            .filter(|c| c.points.is_none())
            .map(|c| c.module.as_str())
            .collect();
        let mut explanation = format!(
            "Total score {:.3} gives risk class {} ({}).",
            total, class, label
        );
        if !missing.is_empty() {
            explanation.push_str(&format!(" Not yet included: {}.", missing.join(", ")));
        }

        OverallRiskResult {
            contributions,
            total_score: Some(total),
            risk_class: Some(class),
            label: Some(label),
            explanation,
            is_complete,
        }
    }
}

/// Buckets the total `numerator / denominator` into a risk class:
/// ceil(T/5) when (T mod 5)/5 >= 0.4, floor(T/5) otherwise.
pub fn classify_total(numerator: u64, denominator: u64) -> u8 {
    if denominator == 0 {
        return 0;
    }
    let width = CLASS_WIDTH * denominator;
    let floor = numerator / width;
    let remainder = numerator % width;
    // remainder / denominator >= 2  <=>  (T mod 5) / 5 >= 0.4
    let class = if remainder >= ROUND_UP_FIFTHS * denominator {
        floor + 1
    } else {
        floor
    };
    u8::try_from(class).unwrap_or(u8::MAX)
}
