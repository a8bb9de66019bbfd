use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Coarse severity classification attached to an additive.
///
/// Catalog values are parsed case-insensitively; anything unrecognised, `null`, or absent is
/// treated as [`RiskLevel::Low`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::parse_lenient).unwrap_or_default())
    }
}

/// Regulatory standing recorded in the reference data. Informational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum SafetyStatus {
    Permitted,
    Restricted,
    Controversial,
    Banned,
    #[default]
    Unknown,
}

impl SafetyStatus {
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "permitted" => Self::Permitted,
            "restricted" => Self::Restricted,
            "controversial" => Self::Controversial,
            "banned" => Self::Banned,
            _ => Self::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for SafetyStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::parse_lenient).unwrap_or_default())
    }
}

/// One entry of the additive reference catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditiveRecord {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sensitivity_tags: Vec<String>,
    /// Sensitivity tag to warning sentence. A missing key is expected and not an error.
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_warnings: BTreeMap<String, String>,
    #[serde(default, alias = "notes")]
    pub description: Option<String>,
    #[serde(default)]
    pub typical_use: Option<String>,
    #[serde(default)]
    pub safety_status: SafetyStatus,
}

impl AdditiveRecord {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            category: None,
            risk_level: RiskLevel::Low,
            sensitivity_tags: Vec::new(),
            group_warnings: BTreeMap::new(),
            description: None,
            typical_use: None,
            safety_status: SafetyStatus::Unknown,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_risk(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sensitivity_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_group_warning(mut self, tag: impl Into<String>, warning: impl Into<String>) -> Self {
        self.group_warnings.insert(tag.into(), warning.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Case-insensitive, whitespace-trimmed category comparison. Missing category never matches.
    pub fn category_is(&self, wanted: &str) -> bool {
        self.category
            .as_deref()
            .map(|category| category.trim().eq_ignore_ascii_case(wanted.trim()))
            .unwrap_or(false)
    }

    /// Key used to enforce one entry per code; codes compare case-insensitively.
    pub fn code_key(&self) -> String {
        self.code.trim().to_lowercase()
    }

    pub fn warning_for(&self, tag: &str) -> Option<&str> {
        self.group_warnings.get(tag).map(String::as_str)
    }
}

/// Substitute product suggested when its category shows up in a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeProduct {
    pub name: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub why_better: String,
    #[serde(default)]
    pub additive_reduction: String,
    #[serde(default)]
    pub cost: String,
}

/// A product category (e.g. "biscuit") and the alternatives recommended for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeCategory {
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alternatives: Vec<AlternativeProduct>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let opt = Option::<T>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_parses_case_insensitively() {
        assert_eq!(RiskLevel::parse_lenient("HIGH"), RiskLevel::High);
        assert_eq!(RiskLevel::parse_lenient(" medium "), RiskLevel::Medium);
        assert_eq!(RiskLevel::parse_lenient("severe"), RiskLevel::Low);
    }

    #[test]
    fn sparse_record_falls_back_to_defaults() {
        let json = r#"{
            "code": "E330",
            "name": "Citric Acid",
            "riskLevel": null,
            "sensitivityTags": null,
            "groupWarnings": null,
            "notes": "Acidity regulator"
        }"#;

        let record: AdditiveRecord = serde_json::from_str(json).expect("record parses");

        assert_eq!(record.risk_level, RiskLevel::Low);
        assert!(record.sensitivity_tags.is_empty());
        assert!(record.group_warnings.is_empty());
        assert_eq!(record.category, None);
        assert_eq!(record.description.as_deref(), Some("Acidity regulator"));
        assert_eq!(record.safety_status, SafetyStatus::Unknown);
    }

    #[test]
    fn full_record_reads_camel_case_fields() {
        let json = r#"{
            "code": "E102",
            "name": "Tartrazine",
            "category": "Color",
            "riskLevel": "high",
            "safetyStatus": "Controversial",
            "typicalUse": "Soft drinks",
            "sensitivityTags": ["ADHD", "Asthma"],
            "groupWarnings": { "ADHD": "May affect activity and attention in children." }
        }"#;

        let record: AdditiveRecord = serde_json::from_str(json).expect("record parses");

        assert_eq!(record.risk_level, RiskLevel::High);
        assert_eq!(record.safety_status, SafetyStatus::Controversial);
        assert_eq!(record.typical_use.as_deref(), Some("Soft drinks"));
        assert_eq!(
            record.warning_for("ADHD"),
            Some("May affect activity and attention in children.")
        );
        assert_eq!(record.warning_for("adhd"), None);
    }

    #[test]
    fn category_comparison_ignores_case_and_padding() {
        let record = AdditiveRecord::new("E211", "Sodium Benzoate").with_category(" preservative");
        assert!(record.category_is("Preservative"));
        assert!(!record.category_is("Color"));
        assert!(!AdditiveRecord::new("E300", "Ascorbic Acid").category_is("Color"));
    }
}
