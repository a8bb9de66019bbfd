use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::AdditiveRecord;

/// Consumer-supplied health and sensitivity tags. Free text, matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, alias = "healthProfile")]
    pub health_tags: Vec<String>,
    #[serde(default, alias = "sensitivityProfile")]
    pub sensitivity_tags: Vec<String>,
}

impl UserProfile {
    pub fn new<H, S>(health_tags: H, sensitivity_tags: S) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            health_tags: health_tags.into_iter().map(Into::into).collect(),
            sensitivity_tags: sensitivity_tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Lower-cased, trimmed tags from both lists with blanks removed.
    fn normalized_tags(&self) -> Vec<String> {
        self.health_tags
            .iter()
            .chain(self.sensitivity_tags.iter())
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect()
    }
}

/// Warnings and additive names flagged for one consumer, deduplicated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Personalization {
    pub warnings: Vec<String>,
    pub high_risk_for_user: Vec<String>,
}

/// Cross-references each detected additive's sensitivity tags with the consumer's tags.
///
/// Tags match when either contains the other, so `preg` meets `pregnant`. Short tags can
/// over-match (`bp` sits inside unrelated words); that imprecision is accepted.
pub fn personalize(detected: &[&AdditiveRecord], profile: &UserProfile) -> Personalization {
    let user_tags = profile.normalized_tags();
    if user_tags.is_empty() {
        return Personalization::default();
    }

    let mut warnings = Vec::new();
    let mut high_risk_for_user = Vec::new();

    for additive in detected {
        let mut risky = false;

        for tag in &additive.sensitivity_tags {
            let tag_lower = tag.trim().to_lowercase();
            if tag_lower.is_empty() {
                continue;
            }
            if !user_tags.iter().any(|user| tags_overlap(user, &tag_lower)) {
                continue;
            }

            risky = true;
            let warning = match additive.warning_for(tag) {
                Some(message) => message.to_string(),
                None => format!("Caution: {} is linked to {}.", additive.name, tag),
            };
            warnings.push(warning);
        }

        if risky {
            high_risk_for_user.push(additive.name.clone());
        }
    }

    Personalization {
        warnings: dedup_preserving_order(warnings),
        high_risk_for_user: dedup_preserving_order(high_risk_for_user),
    }
}

fn tags_overlap(user_tag: &str, additive_tag: &str) -> bool {
    user_tag.contains(additive_tag) || additive_tag.contains(user_tag)
}

fn dedup_preserving_order(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}
