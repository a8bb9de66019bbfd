//! Read-only access to the additive and alternatives reference catalogs.
//!
//! The engine never talks to a store directly; it asks an [`AdditiveCatalog`] for one
//! [`CatalogSnapshot`] per analysis and works from that immutable value.

mod domain;
pub mod loader;
mod memory;

pub use domain::{
    AdditiveRecord, AlternativeCategory, AlternativeProduct, RiskLevel, SafetyStatus,
};
pub use memory::{CatalogSummary, InMemoryCatalog, SnapshotCatalog};

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

/// Both reference collections as seen at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    pub additives: Vec<AdditiveRecord>,
    pub alternatives: Vec<AlternativeCategory>,
}

impl CatalogSnapshot {
    pub fn new(additives: Vec<AdditiveRecord>, alternatives: Vec<AlternativeCategory>) -> Self {
        Self {
            additives,
            alternatives,
        }
    }
}

/// Read contract for the external reference store.
///
/// Neither listing is assumed to be sorted. Implementations own retries; errors returned here
/// abort the analysis that requested them.
#[async_trait]
pub trait AdditiveCatalog: Send + Sync {
    async fn list_additives(&self) -> Result<Vec<AdditiveRecord>, CatalogError>;

    async fn list_alternative_categories(&self) -> Result<Vec<AlternativeCategory>, CatalogError>;

    /// Reads both collections for a single analysis.
    ///
    /// Stores that can change between the two reads should override this and hand out one
    /// consistent value.
    async fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        let additives = self.list_additives().await?;
        let alternatives = self.list_alternative_categories().await?;
        Ok(Arc::new(CatalogSnapshot::new(additives, alternatives)))
    }
}

/// Failures raised by catalog adapters and loaders.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read catalog file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid alternatives CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("duplicate additive code '{0}' in catalog")]
    DuplicateCode(String),
}
