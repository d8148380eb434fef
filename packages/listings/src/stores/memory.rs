//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::Result;
use crate::traits::store::{ProviderBatch, ProviderStore};
use crate::types::{NewProvider, Provider};

/// In-memory provider store.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    rows: Arc<RwLock<Vec<Provider>>>,
    next_id: Arc<AtomicI64>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored provider in insertion order.
    pub fn providers(&self) -> Vec<Provider> {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Provider>> {
        self.rows.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Provider>> {
        self.rows.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn distinct<F>(&self, field: F) -> Vec<String>
    where
        F: Fn(&Provider) -> &str,
    {
        self.read()
            .iter()
            .map(|p| field(p).to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn counts<F>(&self, field: F) -> Vec<(String, i64)>
    where
        F: Fn(&Provider) -> &str,
    {
        let mut counts: HashMap<String, i64> = HashMap::new();
        for provider in self.read().iter() {
            *counts.entry(field(provider).to_string()).or_default() += 1;
        }
        let mut counts: Vec<_> = counts.into_iter().collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }
}

/// Rating descending, unrated last, then name.
fn by_rating(a: &Provider, b: &Provider) -> Ordering {
    let rating = match (a.rating, b.rating) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    rating.then_with(|| a.name.cmp(&b.name))
}

#[async_trait]
impl ProviderStore for MemoryStore {
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.read().len() as i64)
    }

    async fn distinct_service_types(&self) -> Result<Vec<String>> {
        Ok(self.distinct(|p| p.service_type.as_str()))
    }

    async fn distinct_neighborhoods(&self) -> Result<Vec<String>> {
        Ok(self.distinct(|p| p.neighborhood.as_str()))
    }

    async fn find_matching(&self, service_type: &str, neighborhood: &str) -> Result<Vec<Provider>> {
        let mut matches: Vec<Provider> = self
            .read()
            .iter()
            .filter(|p| p.service_type == service_type && p.neighborhood == neighborhood)
            .cloned()
            .collect();
        matches.sort_by(by_rating);
        Ok(matches)
    }

    async fn service_type_counts(&self) -> Result<Vec<(String, i64)>> {
        Ok(self.counts(|p| p.service_type.as_str()))
    }

    async fn neighborhood_counts(&self, limit: i64) -> Result<Vec<(String, i64)>> {
        let mut counts = self.counts(|p| p.neighborhood.as_str());
        counts.truncate(limit.max(0) as usize);
        Ok(counts)
    }

    async fn sample(&self, limit: i64) -> Result<Vec<Provider>> {
        Ok(self
            .read()
            .iter()
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn begin(&self) -> Result<Box<dyn ProviderBatch>> {
        Ok(Box::new(MemoryBatch {
            store: self.clone(),
            cleared: false,
            pending: Vec::new(),
        }))
    }

    async fn close(&self) {}
}

/// Pending writes against a [`MemoryStore`], applied on commit.
struct MemoryBatch {
    store: MemoryStore,
    cleared: bool,
    pending: Vec<Provider>,
}

#[async_trait]
impl ProviderBatch for MemoryBatch {
    async fn exists(&mut self, name: &str, service_type: &str) -> Result<bool> {
        let matches = |p: &Provider| p.name == name && p.service_type == service_type;
        if self.pending.iter().any(matches) {
            return Ok(true);
        }
        Ok(!self.cleared && self.store.read().iter().any(matches))
    }

    async fn insert(&mut self, provider: &NewProvider) -> Result<i64> {
        let id = self.store.next_id.fetch_add(1, AtomicOrdering::SeqCst) + 1;
        self.pending.push(Provider::from_new(id, provider));
        Ok(id)
    }

    async fn clear(&mut self) -> Result<u64> {
        let removed = if self.cleared {
            self.pending.len()
        } else {
            self.store.read().len() + self.pending.len()
        };
        self.cleared = true;
        self.pending.clear();
        Ok(removed as u64)
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryBatch {
            store,
            cleared,
            pending,
        } = *self;
        let mut rows = store.write();
        if cleared {
            rows.clear();
        }
        rows.extend(pending);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
