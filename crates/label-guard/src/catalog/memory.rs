use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{AdditiveCatalog, AdditiveRecord, AlternativeCategory, CatalogError, CatalogSnapshot};

/// Fixed catalog, handy for tests and for embedding a bundled data set.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    snapshot: Arc<CatalogSnapshot>,
}

impl InMemoryCatalog {
    pub fn new(additives: Vec<AdditiveRecord>, alternatives: Vec<AlternativeCategory>) -> Self {
        Self {
            snapshot: Arc::new(CatalogSnapshot::new(additives, alternatives)),
        }
    }
}

impl From<CatalogSnapshot> for InMemoryCatalog {
    fn from(snapshot: CatalogSnapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
        }
    }
}

#[async_trait]
impl AdditiveCatalog for InMemoryCatalog {
    async fn list_additives(&self) -> Result<Vec<AdditiveRecord>, CatalogError> {
        Ok(self.snapshot.additives.clone())
    }

    async fn list_alternative_categories(&self) -> Result<Vec<AlternativeCategory>, CatalogError> {
        Ok(self.snapshot.alternatives.clone())
    }

    async fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        Ok(Arc::clone(&self.snapshot))
    }
}

/// Catalog whose contents can be swapped between analyses.
///
/// A replacement lands as one whole [`CatalogSnapshot`]; analyses already holding the previous
/// `Arc` finish against it. The lock only ever guards a completed swap, so a poisoned lock still
/// holds a whole snapshot and is read through.
#[derive(Debug)]
pub struct SnapshotCatalog {
    current: RwLock<Loaded>,
}

#[derive(Debug, Clone)]
struct Loaded {
    snapshot: Arc<CatalogSnapshot>,
    loaded_at: DateTime<Utc>,
}

/// Shape of the catalog as reported by the service's catalog endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummary {
    pub additive_count: usize,
    pub alternative_category_count: usize,
    pub alternative_count: usize,
    pub loaded_at: DateTime<Utc>,
}

impl SnapshotCatalog {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self {
            current: RwLock::new(Loaded {
                snapshot: Arc::new(snapshot),
                loaded_at: Utc::now(),
            }),
        }
    }

    pub fn replace(&self, snapshot: CatalogSnapshot) {
        let next = Loaded {
            snapshot: Arc::new(snapshot),
            loaded_at: Utc::now(),
        };
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = next;
    }

    pub fn summary(&self) -> CatalogSummary {
        let loaded = self.loaded();
        CatalogSummary {
            additive_count: loaded.snapshot.additives.len(),
            alternative_category_count: loaded.snapshot.alternatives.len(),
            alternative_count: loaded
                .snapshot
                .alternatives
                .iter()
                .map(|category| category.alternatives.len())
                .sum(),
            loaded_at: loaded.loaded_at,
        }
    }

    fn loaded(&self) -> Loaded {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl AdditiveCatalog for SnapshotCatalog {
    async fn list_additives(&self) -> Result<Vec<AdditiveRecord>, CatalogError> {
        Ok(self.loaded().snapshot.additives.clone())
    }

    async fn list_alternative_categories(&self) -> Result<Vec<AlternativeCategory>, CatalogError> {
        Ok(self.loaded().snapshot.alternatives.clone())
    }

    async fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        Ok(self.loaded().snapshot)
    }
}
