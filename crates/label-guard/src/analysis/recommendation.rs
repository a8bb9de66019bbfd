use serde::{Serialize, Serializer};

use crate::catalog::{AlternativeCategory, AlternativeProduct};

pub const MAX_ALTERNATIVES: usize = 3;

/// How often the product may reasonably be eaten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrequencyRecommendation {
    AvoidOrRareTreat,
    OnceAWeek,
    FewTimesPerWeek,
    RegularUse,
}

impl FrequencyRecommendation {
    pub fn label(&self) -> &'static str {
        match self {
            FrequencyRecommendation::AvoidOrRareTreat => "Avoid / Rare treat",
            FrequencyRecommendation::OnceAWeek => "Once a week",
            FrequencyRecommendation::FewTimesPerWeek => "2-3 times per week",
            FrequencyRecommendation::RegularUse => "Okay for regular use",
        }
    }
}

impl Serialize for FrequencyRecommendation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

/// Any additive flagged for this consumer overrides the score.
pub fn recommend_frequency(score: f64, high_risk_for_user: &[String]) -> FrequencyRecommendation {
    if score < 4.0 || !high_risk_for_user.is_empty() {
        FrequencyRecommendation::AvoidOrRareTreat
    } else if score < 7.0 {
        FrequencyRecommendation::OnceAWeek
    } else if score < 9.0 {
        FrequencyRecommendation::FewTimesPerWeek
    } else {
        FrequencyRecommendation::RegularUse
    }
}

/// One-line reading of the score for display next to it.
pub fn verdict(score: f64) -> &'static str {
    if score >= 8.0 {
        "Seems mostly safe for regular consumption."
    } else if score >= 5.0 {
        "Use in moderation. Contains some additives of concern."
    } else {
        "High processing detected. Best to limit consumption."
    }
}

/// Alternatives of every category named in the label, in catalog order, capped at
/// [`MAX_ALTERNATIVES`]. `label_text` is expected to be lower-cased already.
pub fn resolve_alternatives(
    label_text: &str,
    categories: &[AlternativeCategory],
) -> Vec<AlternativeProduct> {
    let mut alternatives = Vec::new();

    for category in categories {
        if alternatives.len() >= MAX_ALTERNATIVES {
            break;
        }
        let needle = category.category.trim().to_lowercase();
        if needle.is_empty() || !label_text.contains(&needle) {
            continue;
        }
        alternatives.extend(category.alternatives.iter().cloned());
    }

    alternatives.truncate(MAX_ALTERNATIVES);
    alternatives
}
