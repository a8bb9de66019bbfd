//! Label analysis: additive detection, nutrition flags, scoring, personalisation and
//! recommendations, composed behind [`AnalysisEngine`].

mod detector;
mod normalize;
mod nutrition;
mod patterns;
mod personalization;
mod recommendation;
pub mod router;
mod scoring;

#[cfg(test)]
mod tests;

pub use detector::{detect, AdditiveDetector, DetectionMatch, MatchSignals};
pub use normalize::{fold_whitespace, normalize_for_detection};
pub use nutrition::{
    extract_flags, NutritionFlags, NutritionReadings, SATURATED_FAT_THRESHOLD, SODIUM_THRESHOLD,
    SUGAR_THRESHOLD,
};
pub use patterns::{code_patterns, name_pattern};
pub use personalization::{personalize, Personalization, UserProfile};
pub use recommendation::{
    recommend_frequency, resolve_alternatives, verdict, FrequencyRecommendation, MAX_ALTERNATIVES,
};
pub use router::analysis_router;
pub use scoring::{
    score, ScoreBreakdown, ScoreComponent, ScoreOutcome, BASE_SCORE, MAX_SCORE, MIN_SCORE,
};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::{
    AdditiveCatalog, AdditiveRecord, AlternativeProduct, CatalogError, CatalogSnapshot, RiskLevel,
    SafetyStatus,
};

/// One label to analyse and the consumer it is analysed for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default)]
    pub text: String,
    #[serde(flatten)]
    pub profile: UserProfile,
    /// Attach intermediate values to the result. Never changes the numbers.
    #[serde(default)]
    pub debug: bool,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>, profile: UserProfile) -> Self {
        Self {
            text: text.into(),
            profile,
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Stateless analyser bound to a catalog accessor.
pub struct AnalysisEngine<C> {
    catalog: Arc<C>,
}

impl<C> AnalysisEngine<C>
where
    C: AdditiveCatalog,
{
    pub fn new(catalog: Arc<C>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<C> {
        &self.catalog
    }

    /// Rejects blank text before the catalog is touched, then analyses against one snapshot.
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        if request.text.trim().is_empty() {
            return Err(InputError::EmptyText.into());
        }

        let snapshot = self.catalog.snapshot().await?;
        let result = analyze_snapshot(&snapshot, &request);

        info!(
            detected = result.detected_additives.len(),
            score = result.safety_score,
            flagged_for_user = result.high_risk_for_user.len(),
            "label analysed"
        );

        Ok(result)
    }
}

/// Pure analysis of `request` against an already-read catalog snapshot.
pub fn analyze_snapshot(snapshot: &CatalogSnapshot, request: &AnalysisRequest) -> AnalysisResult {
    let detection_text = normalize_for_detection(&request.text);
    let label_text = fold_whitespace(&request.text);

    let detector = AdditiveDetector::new(&snapshot.additives);
    let matches = detector.detect_normalized(&detection_text);
    let detected: Vec<&AdditiveRecord> = matches.iter().map(|found| found.additive).collect();

    let readings = NutritionReadings::read(&label_text);
    let flags = nutrition::flags_from_readings(&readings, &label_text);
    let ScoreOutcome {
        score: safety_score,
        breakdown,
    } = score(&detected, &flags);
    let Personalization {
        warnings,
        high_risk_for_user,
    } = personalize(&detected, &request.profile);
    let frequency_recommendation = recommend_frequency(safety_score, &high_risk_for_user);
    let alternatives = resolve_alternatives(&label_text, &snapshot.alternatives);

    let debug = request.debug.then(|| AnalysisDebug {
        detection_text,
        label_text,
        nutrition: readings,
        nutrition_flags: flags,
        matches: matches
            .iter()
            .map(|found| MatchTrace {
                code: found.additive.code.clone(),
                matched_by: found.signals.label(),
            })
            .collect(),
        unclamped_score: breakdown.unclamped_score(),
    });

    AnalysisResult {
        safety_score,
        score_breakdown: breakdown,
        detected_additives: detected.iter().map(|additive| (*additive).into()).collect(),
        warnings_for_user: warnings,
        high_risk_for_user,
        frequency_recommendation,
        summary: verdict(safety_score).to_string(),
        alternatives,
        debug,
    }
}

/// Structured safety assessment for one label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub safety_score: f64,
    pub score_breakdown: ScoreBreakdown,
    pub detected_additives: Vec<DetectedAdditiveView>,
    pub warnings_for_user: Vec<String>,
    pub high_risk_for_user: Vec<String>,
    pub frequency_recommendation: FrequencyRecommendation,
    pub summary: String,
    pub alternatives: Vec<AlternativeProduct>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<AnalysisDebug>,
}

/// Public view of a detected additive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedAdditiveView {
    pub code: String,
    pub name: String,
    pub risk_level: RiskLevel,
    pub category: Option<String>,
    pub description: Option<String>,
    pub safety_status: SafetyStatus,
}

impl From<&AdditiveRecord> for DetectedAdditiveView {
    fn from(record: &AdditiveRecord) -> Self {
        Self {
            code: record.code.clone(),
            name: record.name.clone(),
            risk_level: record.risk_level,
            category: record.category.clone(),
            description: record.description.clone(),
            safety_status: record.safety_status,
        }
    }
}

/// Intermediate values surfaced when a request asks for them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDebug {
    pub detection_text: String,
    pub label_text: String,
    pub nutrition: NutritionReadings,
    pub nutrition_flags: NutritionFlags,
    pub matches: Vec<MatchTrace>,
    pub unclamped_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTrace {
    pub code: String,
    pub matched_by: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("no label text provided for analysis")]
    EmptyText,
}

/// Why an analysis could not produce a result.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Collaborator(#[from] CatalogError),
}
