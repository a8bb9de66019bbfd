use std::fs;
use std::sync::Arc;

use label_guard::analysis::{AnalysisEngine, AnalysisRequest, FrequencyRecommendation, UserProfile};
use label_guard::catalog::loader::{additives_from_reader, alternatives_from_csv, load_snapshot};
use label_guard::catalog::{CatalogError, CatalogSnapshot, RiskLevel, SafetyStatus, SnapshotCatalog};

const ADDITIVES: &str = r#"[
  {
    "code": "E102",
    "name": "Tartrazine",
    "category": "Color",
    "riskLevel": "high",
    "sensitivityTags": ["ADHD", "Asthma"],
    "groupWarnings": { "ADHD": "Tartrazine may affect attention in children." },
    "notes": "Synthetic azo dye.",
    "safetyStatus": "restricted"
  },
  {
    "code": "E211",
    "name": "Sodium Benzoate",
    "category": "Preservative",
    "riskLevel": "Medium",
    "sensitivityTags": ["Asthma"],
    "groupWarnings": null
  },
  {
    "code": "INS 330",
    "name": "Citric Acid",
    "category": "Acidity Regulator",
    "riskLevel": null,
    "sensitivityTags": null
  }
]"#;

const ALTERNATIVES: &str = "\
category,name,score,why_better,additive_reduction,cost
soft drink,Sparkling Water with Lemon,9.5,No colours or preservatives,-2 additives,$
soft drink,Coconut Water,9.0,,,$$
soft drink,Kombucha,8.0,Fermented,-1 additive,$$
soft drink,Homemade Lemonade,8.5,,,$
";

fn snapshot() -> CatalogSnapshot {
    let additives = additives_from_reader(ADDITIVES.as_bytes()).expect("additives parse");
    let alternatives = alternatives_from_csv(ALTERNATIVES.as_bytes()).expect("alternatives parse");
    CatalogSnapshot::new(additives, alternatives)
}

#[test]
fn catalog_documents_parse_leniently() {
    let snapshot = snapshot();

    assert_eq!(snapshot.additives.len(), 3);
    assert_eq!(snapshot.additives[0].risk_level, RiskLevel::High);
    assert_eq!(snapshot.additives[0].safety_status, SafetyStatus::Restricted);
    assert_eq!(
        snapshot.additives[0].description.as_deref(),
        Some("Synthetic azo dye.")
    );
    assert_eq!(snapshot.additives[2].risk_level, RiskLevel::Low);
    assert!(snapshot.additives[2].sensitivity_tags.is_empty());
    assert!(snapshot.additives[1].group_warnings.is_empty());

    assert_eq!(snapshot.alternatives.len(), 1);
    assert_eq!(snapshot.alternatives[0].alternatives.len(), 4);
    assert_eq!(snapshot.alternatives[0].alternatives[1].why_better, "");
}

#[tokio::test]
async fn soft_drink_label_is_scored_and_personalised() {
    let engine = AnalysisEngine::new(Arc::new(SnapshotCatalog::new(snapshot())));
    let request = AnalysisRequest::new(
        "ORANGE SOFT DRINK. Ingredients: carbonated water, sugar, acidity regulator (INS-330), \
         preservative (E211), colour (E 102). Nutrition per 100ml: Sugar: 11g, Sodium: 20mg",
        UserProfile::new(Vec::<String>::new(), ["asthma"]),
    );

    let result = engine.analyze(request).await.expect("analysis succeeds");

    let names: Vec<&str> = result
        .detected_additives
        .iter()
        .map(|additive| additive.name.as_str())
        .collect();
    assert_eq!(names, vec!["Tartrazine", "Sodium Benzoate", "Citric Acid"]);

    // 10 - 2 (high) - 1 (medium) - 1 (sugar), no absence bonuses
    assert_eq!(result.safety_score, 6.0);
    assert_eq!(result.score_breakdown.sugar_penalty, 1.0);
    assert_eq!(result.score_breakdown.sodium_penalty, 0.0);

    assert_eq!(
        result.warnings_for_user,
        vec![
            "Caution: Tartrazine is linked to Asthma.".to_string(),
            "Caution: Sodium Benzoate is linked to Asthma.".to_string(),
        ]
    );
    assert_eq!(
        result.frequency_recommendation,
        FrequencyRecommendation::AvoidOrRareTreat
    );

    let alternatives: Vec<&str> = result
        .alternatives
        .iter()
        .map(|alternative| alternative.name.as_str())
        .collect();
    assert_eq!(
        alternatives,
        vec!["Sparkling Water with Lemon", "Coconut Water", "Kombucha"]
    );
}

#[tokio::test]
async fn replaced_snapshot_applies_to_next_analysis() {
    let catalog = Arc::new(SnapshotCatalog::new(snapshot()));
    let engine = AnalysisEngine::new(Arc::clone(&catalog));
    let request = AnalysisRequest::new("Contains E102", UserProfile::default());

    let before = engine.analyze(request.clone()).await.expect("analysis succeeds");
    catalog.replace(CatalogSnapshot::default());
    let after = engine.analyze(request).await.expect("analysis succeeds");

    assert_eq!(before.detected_additives.len(), 1);
    assert!(after.detected_additives.is_empty());
    assert_eq!(after.safety_score, 10.0);
    assert_eq!(catalog.summary().additive_count, 0);
}

#[test]
fn snapshot_loads_from_files_on_disk() {
    let dir = std::env::temp_dir().join(format!("label-guard-catalog-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    let additives_path = dir.join("additives.json");
    let alternatives_path = dir.join("alternatives.csv");
    fs::write(&additives_path, ADDITIVES).expect("write additives");
    fs::write(&alternatives_path, ALTERNATIVES).expect("write alternatives");

    let loaded = load_snapshot(&additives_path, Some(&alternatives_path)).expect("snapshot loads");
    let missing = load_snapshot(&dir.join("absent.json"), None);

    fs::remove_dir_all(&dir).ok();

    assert_eq!(loaded, snapshot());
    assert!(matches!(missing, Err(CatalogError::Io { .. })));
}
