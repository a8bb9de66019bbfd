use label_guard::catalog::loader::{additives_from_reader, alternatives_from_csv, load_snapshot};
use label_guard::catalog::{CatalogError, CatalogSnapshot, SnapshotCatalog};
use label_guard::config::CatalogConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

const BUNDLED_ADDITIVES: &str = include_str!("../data/additives.json");
const BUNDLED_ALTERNATIVES: &str = include_str!("../data/alternatives.csv");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) catalog: Arc<SnapshotCatalog>,
    pub(crate) catalog_config: CatalogConfig,
}

/// Sample catalog compiled into the binary.
pub(crate) fn bundled_snapshot() -> Result<CatalogSnapshot, CatalogError> {
    let additives = additives_from_reader(BUNDLED_ADDITIVES.as_bytes())?;
    let alternatives = alternatives_from_csv(BUNDLED_ALTERNATIVES.as_bytes())?;
    Ok(CatalogSnapshot::new(additives, alternatives))
}

/// Reads the configured catalog files, or the bundled sample when none are configured.
pub(crate) fn load_catalog(config: &CatalogConfig) -> Result<CatalogSnapshot, CatalogError> {
    match &config.additives_path {
        Some(path) => load_snapshot(path, config.alternatives_path.as_deref()),
        None => {
            let snapshot = bundled_snapshot()?;
            info!(
                additives = snapshot.additives.len(),
                alternative_categories = snapshot.alternatives.len(),
                "using bundled sample catalog"
            );
            Ok(snapshot)
        }
    }
}

pub(crate) fn parse_tag(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err("tags must not be blank".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn bundled_catalog_parses() {
        let snapshot = bundled_snapshot().expect("bundled catalog parses");
        assert!(snapshot.additives.len() >= 15);
        assert!(snapshot
            .alternatives
            .iter()
            .any(|category| category.category == "noodles"));
    }

    #[test]
    fn missing_configured_file_is_reported() {
        let config = CatalogConfig {
            additives_path: Some(PathBuf::from("/nonexistent/label-guard/additives.json")),
            alternatives_path: None,
        };

        let err = load_catalog(&config).expect_err("missing file rejected");
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn blank_tags_are_rejected() {
        assert_eq!(parse_tag("  Pregnant "), Ok("Pregnant".to_string()));
        assert!(parse_tag("   ").is_err());
    }
}
