//! File loaders for the reference catalogs.
//!
//! Additives are read from a JSON array in the reference data's camelCase shape. Alternatives are
//! read either from a flat CSV (`category,name,score,why_better,additive_reduction,cost`) or from
//! JSON already grouped by category.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::info;

use super::{AdditiveRecord, AlternativeCategory, AlternativeProduct, CatalogError, CatalogSnapshot};

pub fn additives_from_reader<R: Read>(reader: R) -> Result<Vec<AdditiveRecord>, CatalogError> {
    let additives: Vec<AdditiveRecord> = serde_json::from_reader(reader)?;
    ensure_unique_codes(&additives)?;
    Ok(additives)
}

pub fn alternatives_from_json<R: Read>(
    reader: R,
) -> Result<Vec<AlternativeCategory>, CatalogError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Parses the flat CSV form, grouping rows by category in the order categories first appear.
pub fn alternatives_from_csv<R: Read>(reader: R) -> Result<Vec<AlternativeCategory>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut categories: Vec<AlternativeCategory> = Vec::new();

    for row in csv_reader.deserialize::<AlternativeRow>() {
        let row = row?;
        let product = AlternativeProduct {
            name: row.name,
            score: row.score.unwrap_or_default(),
            why_better: row.why_better.unwrap_or_default(),
            additive_reduction: row.additive_reduction.unwrap_or_default(),
            cost: row.cost.unwrap_or_default(),
        };

        match categories
            .iter_mut()
            .find(|existing| existing.category == row.category)
        {
            Some(existing) => existing.alternatives.push(product),
            None => categories.push(AlternativeCategory {
                category: row.category,
                alternatives: vec![product],
            }),
        }
    }

    Ok(categories)
}

/// Loads a full snapshot from disk. A missing alternatives path yields no alternatives.
pub fn load_snapshot(
    additives_path: &Path,
    alternatives_path: Option<&Path>,
) -> Result<CatalogSnapshot, CatalogError> {
    let additives = additives_from_reader(open(additives_path)?)?;

    let alternatives = match alternatives_path {
        Some(path) if is_json(path) => alternatives_from_json(open(path)?)?,
        Some(path) => alternatives_from_csv(open(path)?)?,
        None => Vec::new(),
    };

    info!(
        additives = additives.len(),
        alternative_categories = alternatives.len(),
        path = %additives_path.display(),
        "catalog loaded from disk"
    );

    Ok(CatalogSnapshot::new(additives, alternatives))
}

fn open(path: &Path) -> Result<File, CatalogError> {
    File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

fn ensure_unique_codes(additives: &[AdditiveRecord]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for additive in additives {
        let key = additive.code_key();
        if key.is_empty() {
            continue;
        }
        if !seen.insert(key) {
            return Err(CatalogError::DuplicateCode(additive.code.clone()));
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct AlternativeRow {
    category: String,
    name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    score: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    why_better: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    additive_reduction: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    cost: Option<String>,
}

fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RiskLevel;

    #[test]
    fn csv_rows_group_by_first_seen_category() {
        let csv = "category,name,score,why_better,additive_reduction,cost\n\
noodles,Millet Noodles,8.5,No flavour enhancers,-3 additives,$$\n\
biscuit,Oat Cookies,7.5,No synthetic colours,-2 additives,$\n\
noodles,Rice Noodles,8,Plain ingredients,,\n";

        let categories = alternatives_from_csv(csv.as_bytes()).expect("csv parses");

        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].category, "noodles");
        assert_eq!(categories[0].alternatives.len(), 2);
        assert_eq!(categories[0].alternatives[1].name, "Rice Noodles");
        assert_eq!(categories[0].alternatives[1].cost, "");
        assert_eq!(categories[1].alternatives[0].score, 7.5);
    }

    #[test]
    fn csv_rejects_non_numeric_score() {
        let csv = "category,name,score,why_better,additive_reduction,cost\n\
noodles,Millet Noodles,great,,,\n";

        let err = alternatives_from_csv(csv.as_bytes()).expect_err("score must be numeric");
        assert!(matches!(err, CatalogError::Csv(_)));
    }

    #[test]
    fn additives_json_rejects_duplicate_codes() {
        let json = r#"[
            { "code": "E102", "name": "Tartrazine" },
            { "code": "e102", "name": "Tartrazine again" }
        ]"#;

        let err = additives_from_reader(json.as_bytes()).expect_err("duplicate codes rejected");
        assert!(matches!(err, CatalogError::DuplicateCode(code) if code == "e102"));
    }

    #[test]
    fn additives_json_tolerates_sparse_entries() {
        let json = r#"[
            { "code": "E621", "name": "Monosodium Glutamate", "riskLevel": "Medium" },
            { "code": "", "name": "Unnamed flavouring" },
            { "code": " ", "name": "Another unnamed flavouring" }
        ]"#;

        let additives = additives_from_reader(json.as_bytes()).expect("json parses");
        assert_eq!(additives.len(), 3);
        assert_eq!(additives[0].risk_level, RiskLevel::Medium);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_snapshot(Path::new("/nonexistent/additives.json"), None)
            .expect_err("file is missing");
        assert!(err.to_string().contains("/nonexistent/additives.json"));
    }
}
