use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::analysis::{analysis_router, AnalysisEngine, AnalysisRequest, UserProfile};
use crate::catalog::{
    AdditiveCatalog, AdditiveRecord, AlternativeCategory, AlternativeProduct, CatalogError,
    InMemoryCatalog, RiskLevel,
};

pub(super) fn tartrazine() -> AdditiveRecord {
    AdditiveRecord::new("E102", "Tartrazine")
        .with_category("Color")
        .with_risk(RiskLevel::High)
        .with_tags(["ADHD", "Asthma"])
        .with_group_warning("ADHD", "Tartrazine may affect activity and attention in children.")
        .with_description("Synthetic lemon-yellow azo dye.")
}

pub(super) fn caramel() -> AdditiveRecord {
    AdditiveRecord::new("E150", "Caramel Color")
        .with_category("Color")
        .with_risk(RiskLevel::Medium)
        .with_tags(["PREG"])
}

pub(super) fn sodium_benzoate() -> AdditiveRecord {
    AdditiveRecord::new("E211", "Sodium Benzoate")
        .with_category("Preservative")
        .with_risk(RiskLevel::Low)
        .with_tags(["BP"])
        .with_group_warning("BP", "Adds sodium; watch intake if managing blood pressure.")
}

pub(super) fn msg() -> AdditiveRecord {
    AdditiveRecord::new("INS 621", "Monosodium Glutamate")
        .with_category("Flavour Enhancer")
        .with_risk(RiskLevel::Medium)
        .with_tags(["MSG"])
}

pub(super) fn additives() -> Vec<AdditiveRecord> {
    vec![tartrazine(), caramel(), sodium_benzoate(), msg()]
}

pub(super) fn alternatives() -> Vec<AlternativeCategory> {
    let product = |name: &str, score: f64| AlternativeProduct {
        name: name.to_string(),
        score,
        why_better: "Shorter ingredient list".to_string(),
        additive_reduction: "-2 additives".to_string(),
        cost: "$$".to_string(),
    };

    vec![
        AlternativeCategory {
            category: "Noodles".to_string(),
            alternatives: vec![
                product("Millet Noodles", 8.5),
                product("Whole Wheat Noodles", 8.0),
            ],
        },
        AlternativeCategory {
            category: "soft drink".to_string(),
            alternatives: vec![
                product("Sparkling Water with Lemon", 9.5),
                product("Kombucha", 8.0),
            ],
        },
    ]
}

pub(super) fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::new(additives(), alternatives())
}

pub(super) fn engine() -> AnalysisEngine<InMemoryCatalog> {
    AnalysisEngine::new(Arc::new(catalog()))
}

pub(super) fn request(text: &str) -> AnalysisRequest {
    AnalysisRequest::new(text, UserProfile::default())
}

/// Delegates to the fixture catalog while counting reads.
#[derive(Default)]
pub(super) struct CountingCatalog {
    inner: InMemoryCatalog,
    additive_reads: AtomicUsize,
    alternative_reads: AtomicUsize,
}

impl CountingCatalog {
    pub(super) fn new() -> Self {
        Self {
            inner: catalog(),
            ..Self::default()
        }
    }

    pub(super) fn additive_reads(&self) -> usize {
        self.additive_reads.load(Ordering::SeqCst)
    }

    pub(super) fn alternative_reads(&self) -> usize {
        self.alternative_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AdditiveCatalog for CountingCatalog {
    async fn list_additives(&self) -> Result<Vec<AdditiveRecord>, CatalogError> {
        self.additive_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.list_additives().await
    }

    async fn list_alternative_categories(&self) -> Result<Vec<AlternativeCategory>, CatalogError> {
        self.alternative_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.list_alternative_categories().await
    }
}

/// Additives read fine, alternatives do not.
pub(super) struct FlakyAlternativesCatalog;

#[async_trait]
impl AdditiveCatalog for FlakyAlternativesCatalog {
    async fn list_additives(&self) -> Result<Vec<AdditiveRecord>, CatalogError> {
        Ok(additives())
    }

    async fn list_alternative_categories(&self) -> Result<Vec<AlternativeCategory>, CatalogError> {
        Err(CatalogError::Unavailable("alternatives store offline".to_string()))
    }
}

pub(super) fn router_with_catalog<C>(catalog: C) -> axum::Router
where
    C: AdditiveCatalog + 'static,
{
    analysis_router(Arc::new(AnalysisEngine::new(Arc::new(catalog))))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
