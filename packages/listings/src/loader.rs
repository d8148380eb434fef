//! Idempotent loading of datasets into a provider store.
//!
//! Two modes:
//!
//! - **Incremental**: an empty store receives the whole dataset. Otherwise
//!   only rows whose service type or neighborhood is not yet in the store are
//!   inserted, and a dataset that introduces nothing new is skipped outright.
//! - **Full refresh**: the table is emptied and the dataset inserted
//!   unconditionally, for when the source changes shape.
//!
//! Either way each row is checked against the `(name, service_type)` dedup
//! key before insert, and rows are committed every `commit_every` inserts. A
//! failure rolls back the open batch only; earlier commits stay.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::dataset::Dataset;
use crate::error::{ListingsError, Result};
use crate::neighborhood::UNKNOWN_NEIGHBORHOOD;
use crate::traits::store::{ProviderBatch, ProviderStore};
use crate::types::{NewProvider, ServiceType};

/// How a dataset is reconciled with the existing rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    #[default]
    Incremental,
    FullRefresh,
}

impl std::fmt::Display for LoadMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadMode::Incremental => write!(f, "incremental"),
            LoadMode::FullRefresh => write!(f, "full_refresh"),
        }
    }
}

impl std::str::FromStr for LoadMode {
    type Err = ListingsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "incremental" => Ok(LoadMode::Incremental),
            "refresh" | "full_refresh" | "full-refresh" => Ok(LoadMode::FullRefresh),
            other => Err(ListingsError::InvalidLoadMode(other.to_string())),
        }
    }
}

/// Loader settings.
#[derive(Debug, Clone)]
pub struct LoadPolicy {
    pub mode: LoadMode,
    /// Skip rows the classifier could not place.
    pub drop_other: bool,
    /// Neighborhood values treated as missing, compared case-insensitively.
    /// The `unknown` sentinel is always rejected.
    pub rejected_neighborhoods: Vec<String>,
    /// Rows inserted per transaction.
    pub commit_every: usize,
}

impl Default for LoadPolicy {
    fn default() -> Self {
        Self {
            mode: LoadMode::Incremental,
            drop_other: true,
            rejected_neighborhoods: ["n/a", "none", "null"]
                .into_iter()
                .map(String::from)
                .collect(),
            commit_every: 50,
        }
    }
}

impl LoadPolicy {
    pub fn with_mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_drop_other(mut self, drop_other: bool) -> Self {
        self.drop_other = drop_other;
        self
    }

    pub fn with_commit_every(mut self, commit_every: usize) -> Self {
        self.commit_every = commit_every.max(1);
        self
    }

    fn rejects_neighborhood(&self, neighborhood: &str) -> bool {
        let neighborhood = neighborhood.trim();
        neighborhood.is_empty()
            || neighborhood.eq_ignore_ascii_case(UNKNOWN_NEIGHBORHOOD)
            || self
                .rejected_neighborhoods
                .iter()
                .any(|r| r.trim().eq_ignore_ascii_case(neighborhood))
    }
}

/// What a load run decided to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The store was empty and received the whole dataset.
    Seeded,
    /// New categories were found; only their rows were considered.
    Extended {
        service_types: Vec<String>,
        neighborhoods: Vec<String>,
    },
    /// Nothing new in the dataset; no rows were written.
    UpToDate,
    /// The table was emptied and reloaded.
    Refreshed { removed: u64 },
}

/// Counts from a completed load run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub outcome: LoadOutcome,
    pub inserted: usize,
    /// Rows skipped because their `(name, service_type)` already existed.
    pub duplicates: usize,
    /// Raw listings skipped as permanently closed.
    pub closed: usize,
    /// Rows skipped for an unknown or rejected neighborhood.
    pub unlocated: usize,
    /// Rows skipped as `other` under `drop_other`.
    pub uncategorized: usize,
}

impl LoadReport {
    fn new(closed: usize) -> Self {
        Self {
            outcome: LoadOutcome::UpToDate,
            inserted: 0,
            duplicates: 0,
            closed,
            unlocated: 0,
            uncategorized: 0,
        }
    }

    pub fn skipped(&self) -> usize {
        self.duplicates + self.closed + self.unlocated + self.uncategorized
    }
}

/// Merges datasets into a [`ProviderStore`].
pub struct Loader<'a> {
    store: &'a dyn ProviderStore,
    policy: LoadPolicy,
}

impl<'a> Loader<'a> {
    pub fn new(store: &'a dyn ProviderStore, policy: LoadPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &LoadPolicy {
        &self.policy
    }

    /// Reconcile `dataset` into the store.
    ///
    /// On failure the open batch is rolled back and the error is
    /// [`ListingsError::LoadAborted`] carrying the rows already committed.
    #[instrument(skip_all, fields(mode = %self.policy.mode, rows = dataset.len()))]
    pub async fn run(&self, dataset: Dataset) -> Result<LoadReport> {
        let mut report = LoadReport::new(dataset.closed());
        let candidates = self.admit(dataset, &mut report);

        let rows = match self.policy.mode {
            LoadMode::FullRefresh => {
                info!(rows = candidates.len(), "Refreshing all providers");
                report.outcome = LoadOutcome::Refreshed { removed: 0 };
                candidates
            }
            LoadMode::Incremental => {
                let existing_types: HashSet<String> = self
                    .store
                    .distinct_service_types()
                    .await
                    .map_err(|e| aborted(0, e))?
                    .into_iter()
                    .collect();
                let existing_neighborhoods: HashSet<String> = self
                    .store
                    .distinct_neighborhoods()
                    .await
                    .map_err(|e| aborted(0, e))?
                    .into_iter()
                    .collect();

                if existing_types.is_empty() && self.store.count().await.map_err(|e| aborted(0, e))? == 0 {
                    info!(rows = candidates.len(), "Store is empty, seeding all providers");
                    report.outcome = LoadOutcome::Seeded;
                    candidates
                } else {
                    let new_types = missing(candidates.iter().map(|p| &p.service_type), &existing_types);
                    let new_neighborhoods = missing(
                        candidates.iter().map(|p| &p.neighborhood),
                        &existing_neighborhoods,
                    );

                    if new_types.is_empty() && new_neighborhoods.is_empty() {
                        info!("Store already contains every service type and neighborhood, skipping");
                        return Ok(report);
                    }

                    if !new_types.is_empty() {
                        info!(service_types = ?new_types, "Adding providers for new service types");
                    }
                    if !new_neighborhoods.is_empty() {
                        info!(neighborhoods = ?new_neighborhoods, "Adding providers for new neighborhoods");
                    }

                    let rows = candidates
                        .into_iter()
                        .filter(|p| {
                            new_types.contains(&p.service_type)
                                || new_neighborhoods.contains(&p.neighborhood)
                        })
                        .collect();
                    report.outcome = LoadOutcome::Extended {
                        service_types: new_types.into_iter().collect(),
                        neighborhoods: new_neighborhoods.into_iter().collect(),
                    };
                    rows
                }
            }
        };

        self.write(rows, &mut report).await?;

        info!(
            inserted = report.inserted,
            duplicates = report.duplicates,
            closed = report.closed,
            unlocated = report.unlocated,
            uncategorized = report.uncategorized,
            "Load complete"
        );
        Ok(report)
    }

    /// Apply the row filters, counting what each one drops.
    fn admit(&self, dataset: Dataset, report: &mut LoadReport) -> Vec<NewProvider> {
        dataset
            .into_providers()
            .into_iter()
            .filter(|p| {
                if self.policy.rejects_neighborhood(&p.neighborhood) {
                    report.unlocated += 1;
                    false
                } else if self.policy.drop_other && p.service_type == ServiceType::Other.as_str() {
                    report.uncategorized += 1;
                    false
                } else {
                    true
                }
            })
            .collect()
    }

    async fn write(&self, rows: Vec<NewProvider>, report: &mut LoadReport) -> Result<()> {
        let commit_every = self.policy.commit_every.max(1);
        let mut committed = 0;
        let mut pending = 0;

        let mut batch = self.store.begin().await.map_err(|e| aborted(0, e))?;

        if let LoadOutcome::Refreshed { removed } = &mut report.outcome {
            match batch.clear().await {
                Ok(n) => {
                    info!(removed = n, "Cleared existing providers");
                    *removed = n;
                }
                Err(e) => return Err(rollback(batch, committed, e).await),
            }
        }

        for row in &rows {
            match insert_unique(batch.as_mut(), row).await {
                Ok(true) => pending += 1,
                Ok(false) => {
                    debug!(name = %row.name, service_type = %row.service_type, "Provider already exists");
                    report.duplicates += 1;
                }
                Err(e) => return Err(rollback(batch, committed, e).await),
            }

            if pending == commit_every {
                batch.commit().await.map_err(|e| aborted(committed, e))?;
                committed += pending;
                pending = 0;
                info!(committed, "Added providers so far");
                batch = self.store.begin().await.map_err(|e| aborted(committed, e))?;
            }
        }

        batch.commit().await.map_err(|e| aborted(committed, e))?;
        report.inserted = committed + pending;
        Ok(())
    }
}

/// Insert unless the dedup key is taken. Returns whether a row was written.
async fn insert_unique(batch: &mut dyn ProviderBatch, row: &NewProvider) -> Result<bool> {
    if batch.exists(&row.name, &row.service_type).await? {
        return Ok(false);
    }
    batch.insert(row).await?;
    Ok(true)
}

async fn rollback(batch: Box<dyn ProviderBatch>, committed: usize, cause: ListingsError) -> ListingsError {
    if let Err(e) = batch.rollback().await {
        warn!(error = %e, "Rollback failed");
    }
    aborted(committed, cause)
}

fn aborted(committed: usize, cause: ListingsError) -> ListingsError {
    error!(committed, error = %cause, "Load aborted, pending batch rolled back");
    ListingsError::LoadAborted {
        committed,
        source: Box::new(cause),
    }
}

fn missing<'v>(values: impl Iterator<Item = &'v String>, existing: &HashSet<String>) -> BTreeSet<String> {
    values
        .filter(|v| !existing.contains(*v))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn provider(name: &str, service_type: &str, neighborhood: &str) -> NewProvider {
        NewProvider::new(name, service_type, neighborhood).with_rating(4.0)
    }

    fn names(store: &MemoryStore) -> Vec<String> {
        store.providers().into_iter().map(|p| p.name).collect()
    }

    #[tokio::test]
    async fn test_empty_store_is_seeded() {
        let store = MemoryStore::new();
        let loader = Loader::new(&store, LoadPolicy::default());

        let report = loader.run(Dataset::fixtures()).await.unwrap();

        assert_eq!(report.outcome, LoadOutcome::Seeded);
        assert_eq!(report.inserted, 18);
        assert_eq!(store.count().await.unwrap(), 18);
    }

    #[tokio::test]
    async fn test_second_run_is_up_to_date() {
        let store = MemoryStore::new();
        let loader = Loader::new(&store, LoadPolicy::default());

        loader.run(Dataset::fixtures()).await.unwrap();
        let report = loader.run(Dataset::fixtures()).await.unwrap();

        assert_eq!(report.outcome, LoadOutcome::UpToDate);
        assert_eq!(report.inserted, 0);
        assert_eq!(store.count().await.unwrap(), 18);
    }

    #[tokio::test]
    async fn test_duplicate_key_inserted_once() {
        let store = MemoryStore::new();
        let loader = Loader::new(&store, LoadPolicy::default());

        let report = loader
            .run(Dataset::new(vec![
                provider("Joe's Plumbing", "plumber", "downtown"),
                provider("Joe's Plumbing", "plumber", "west side"),
                provider("Joe's Plumbing", "electrician", "downtown"),
            ]))
            .await
            .unwrap();

        assert_eq!(report.inserted, 2);
        assert_eq!(report.duplicates, 1);
        let stored = store.providers();
        assert_eq!(stored[0].neighborhood, "downtown");
        assert_eq!(stored[1].service_type, "electrician");
    }

    #[tokio::test]
    async fn test_only_rows_with_new_categories_are_added() {
        let store = MemoryStore::new();
        let loader = Loader::new(&store, LoadPolicy::default());
        loader
            .run(Dataset::new(vec![provider("A", "plumber", "downtown")]))
            .await
            .unwrap();

        let report = loader
            .run(Dataset::new(vec![
                // Known type and neighborhood: not rescanned.
                provider("B", "plumber", "downtown"),
                // New neighborhood.
                provider("C", "plumber", "west side"),
                // New service type.
                provider("D", "gardener", "downtown"),
            ]))
            .await
            .unwrap();

        assert_eq!(
            report.outcome,
            LoadOutcome::Extended {
                service_types: vec!["gardener".to_string()],
                neighborhoods: vec!["west side".to_string()],
            }
        );
        assert_eq!(report.inserted, 2);
        assert_eq!(names(&store), vec!["A", "C", "D"]);
    }

    #[tokio::test]
    async fn test_full_refresh_replaces_rows() {
        let store = MemoryStore::new();
        Loader::new(&store, LoadPolicy::default())
            .run(Dataset::fixtures())
            .await
            .unwrap();

        let policy = LoadPolicy::default().with_mode(LoadMode::FullRefresh);
        let report = Loader::new(&store, policy)
            .run(Dataset::new(vec![provider("Fresh Pipes", "plumber", "downtown")]))
            .await
            .unwrap();

        assert_eq!(report.outcome, LoadOutcome::Refreshed { removed: 18 });
        assert_eq!(report.inserted, 1);
        assert_eq!(names(&store), vec!["Fresh Pipes"]);
    }

    #[tokio::test]
    async fn test_row_filters() {
        let store = MemoryStore::new();
        let report = Loader::new(&store, LoadPolicy::default())
            .run(Dataset::new(vec![
                provider("Kept", "plumber", "downtown"),
                provider("Nowhere", "plumber", UNKNOWN_NEIGHBORHOOD),
                provider("Blank", "plumber", "N/A"),
                provider("Bakery", "other", "downtown"),
            ]))
            .await
            .unwrap();

        assert_eq!(report.inserted, 1);
        assert_eq!(report.unlocated, 2);
        assert_eq!(report.uncategorized, 1);
        assert_eq!(report.skipped(), 3);
        assert_eq!(names(&store), vec!["Kept"]);
    }

    #[tokio::test]
    async fn test_other_rows_kept_when_allowed() {
        let store = MemoryStore::new();
        let policy = LoadPolicy::default().with_drop_other(false);
        let report = Loader::new(&store, policy)
            .run(Dataset::new(vec![provider("Bakery", "other", "downtown")]))
            .await
            .unwrap();

        assert_eq!(report.inserted, 1);
        assert_eq!(report.uncategorized, 0);
    }

    #[test]
    fn test_load_mode_parsing() {
        assert_eq!("incremental".parse::<LoadMode>().unwrap(), LoadMode::Incremental);
        assert_eq!("Refresh".parse::<LoadMode>().unwrap(), LoadMode::FullRefresh);
        assert_eq!("full-refresh".parse::<LoadMode>().unwrap(), LoadMode::FullRefresh);
        assert!("sometimes".parse::<LoadMode>().is_err());
    }

    /// Memory store whose batches fail after a fixed number of inserts.
    struct FailingStore {
        inner: MemoryStore,
        inserts_left: Arc<AtomicUsize>,
    }

    struct FailingBatch {
        inner: Box<dyn ProviderBatch>,
        inserts_left: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ProviderStore for FailingStore {
        async fn ensure_schema(&self) -> Result<()> {
            self.inner.ensure_schema().await
        }
        async fn count(&self) -> Result<i64> {
            self.inner.count().await
        }
        async fn distinct_service_types(&self) -> Result<Vec<String>> {
            self.inner.distinct_service_types().await
        }
        async fn distinct_neighborhoods(&self) -> Result<Vec<String>> {
            self.inner.distinct_neighborhoods().await
        }
        async fn find_matching(&self, s: &str, n: &str) -> Result<Vec<crate::types::Provider>> {
            self.inner.find_matching(s, n).await
        }
        async fn service_type_counts(&self) -> Result<Vec<(String, i64)>> {
            self.inner.service_type_counts().await
        }
        async fn neighborhood_counts(&self, limit: i64) -> Result<Vec<(String, i64)>> {
            self.inner.neighborhood_counts(limit).await
        }
        async fn sample(&self, limit: i64) -> Result<Vec<crate::types::Provider>> {
            self.inner.sample(limit).await
        }
        async fn begin(&self) -> Result<Box<dyn ProviderBatch>> {
            Ok(Box::new(FailingBatch {
                inner: self.inner.begin().await?,
                inserts_left: self.inserts_left.clone(),
            }))
        }
        async fn close(&self) {}
    }

    #[async_trait]
    impl ProviderBatch for FailingBatch {
        async fn exists(&mut self, name: &str, service_type: &str) -> Result<bool> {
            self.inner.exists(name, service_type).await
        }
        async fn insert(&mut self, provider: &NewProvider) -> Result<i64> {
            if self.inserts_left.load(Ordering::SeqCst) == 0 {
                return Err(ListingsError::Storage("disk full".into()));
            }
            self.inserts_left.fetch_sub(1, Ordering::SeqCst);
            self.inner.insert(provider).await
        }
        async fn clear(&mut self) -> Result<u64> {
            self.inner.clear().await
        }
        async fn commit(self: Box<Self>) -> Result<()> {
            self.inner.commit().await
        }
        async fn rollback(self: Box<Self>) -> Result<()> {
            self.inner.rollback().await
        }
    }

    #[tokio::test]
    async fn test_failure_keeps_only_committed_batches() {
        let store = FailingStore {
            inner: MemoryStore::new(),
            inserts_left: Arc::new(AtomicUsize::new(5)),
        };
        let policy = LoadPolicy::default().with_commit_every(2);
        let dataset = Dataset::new(
            (0..8)
                .map(|i| provider(&format!("Plumber {}", i), "plumber", "downtown"))
                .collect(),
        );

        let err = Loader::new(&store, policy).run(dataset).await.unwrap_err();

        match err {
            ListingsError::LoadAborted { committed, .. } => assert_eq!(committed, 4),
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(store.inner.count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_failed_refresh_leaves_store_untouched() {
        let store = FailingStore {
            inner: MemoryStore::new(),
            inserts_left: Arc::new(AtomicUsize::new(0)),
        };
        {
            let mut batch = store.inner.begin().await.unwrap();
            batch.insert(&provider("Old", "plumber", "downtown")).await.unwrap();
            batch.commit().await.unwrap();
        }

        let policy = LoadPolicy::default().with_mode(LoadMode::FullRefresh);
        let result = Loader::new(&store, policy)
            .run(Dataset::new(vec![provider("New", "plumber", "downtown")]))
            .await;

        assert!(result.is_err());
        assert_eq!(names(&store.inner), vec!["Old"]);
    }
}
