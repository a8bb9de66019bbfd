use serde::Serialize;

use super::nutrition::NutritionFlags;
use crate::catalog::{AdditiveRecord, RiskLevel};

pub const BASE_SCORE: f64 = 10.0;
pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 10.0;

const FREE_ADDITIVE_ALLOWANCE: usize = 3;
const PER_EXTRA_ADDITIVE: f64 = 0.5;
const HIGH_RISK_PENALTY: f64 = 2.0;
const MEDIUM_RISK_PENALTY: f64 = 1.0;
const NUTRITION_PENALTY: f64 = 1.0;
const ABSENCE_BONUS: f64 = 0.5;

/// Itemised contributions to a safety score. Every field is a non-negative magnitude.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub additive_count_penalty: f64,
    pub high_risk_penalty: f64,
    pub moderate_risk_penalty: f64,
    pub sugar_penalty: f64,
    pub sodium_penalty: f64,
    pub trans_fat_penalty: f64,
    pub bonus_no_colors: f64,
    pub bonus_no_preservatives: f64,
}

impl ScoreBreakdown {
    pub fn total_penalties(&self) -> f64 {
        self.additive_count_penalty
            + self.high_risk_penalty
            + self.moderate_risk_penalty
            + self.sugar_penalty
            + self.sodium_penalty
            + self.trans_fat_penalty
    }

    pub fn total_bonuses(&self) -> f64 {
        self.bonus_no_colors + self.bonus_no_preservatives
    }

    /// `BASE_SCORE - penalties + bonuses`, before clamping.
    pub fn unclamped_score(&self) -> f64 {
        BASE_SCORE - self.total_penalties() + self.total_bonuses()
    }

    /// Signed line items for display, penalties negative.
    pub fn components(&self) -> Vec<ScoreComponent> {
        vec![
            ScoreComponent::penalty("additive count", self.additive_count_penalty),
            ScoreComponent::penalty("high-risk additives", self.high_risk_penalty),
            ScoreComponent::penalty("moderate-risk additives", self.moderate_risk_penalty),
            ScoreComponent::penalty("high sugar", self.sugar_penalty),
            ScoreComponent::penalty("high sodium", self.sodium_penalty),
            ScoreComponent::penalty("trans fat", self.trans_fat_penalty),
            ScoreComponent::bonus("no added colours", self.bonus_no_colors),
            ScoreComponent::bonus("no preservatives", self.bonus_no_preservatives),
        ]
    }
}

/// One signed line of a [`ScoreBreakdown`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub label: &'static str,
    pub amount: f64,
}

impl ScoreComponent {
    fn penalty(label: &'static str, magnitude: f64) -> Self {
        Self {
            label,
            amount: -magnitude,
        }
    }

    fn bonus(label: &'static str, magnitude: f64) -> Self {
        Self {
            label,
            amount: magnitude,
        }
    }
}

/// Clamped score together with the breakdown that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreOutcome {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

pub fn score(detected: &[&AdditiveRecord], flags: &NutritionFlags) -> ScoreOutcome {
    let mut breakdown = ScoreBreakdown {
        additive_count_penalty: detected.len().saturating_sub(FREE_ADDITIVE_ALLOWANCE) as f64
            * PER_EXTRA_ADDITIVE,
        ..ScoreBreakdown::default()
    };

    for additive in detected {
        match additive.risk_level {
            RiskLevel::High => breakdown.high_risk_penalty += HIGH_RISK_PENALTY,
            RiskLevel::Medium => breakdown.moderate_risk_penalty += MEDIUM_RISK_PENALTY,
            RiskLevel::Low => {}
        }
    }

    // Saturated fat is flagged but carries no penalty of its own.
    if flags.high_sugar {
        breakdown.sugar_penalty = NUTRITION_PENALTY;
    }
    if flags.high_sodium {
        breakdown.sodium_penalty = NUTRITION_PENALTY;
    }
    if flags.trans_fat_present {
        breakdown.trans_fat_penalty = NUTRITION_PENALTY;
    }

    if !detected.iter().any(|additive| additive.category_is("Color")) {
        breakdown.bonus_no_colors = ABSENCE_BONUS;
    }
    if !detected
        .iter()
        .any(|additive| additive.category_is("Preservative"))
    {
        breakdown.bonus_no_preservatives = ABSENCE_BONUS;
    }

    ScoreOutcome {
        score: breakdown.unclamped_score().clamp(MIN_SCORE, MAX_SCORE),
        breakdown,
    }
}
