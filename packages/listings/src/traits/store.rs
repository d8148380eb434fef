//! Storage traits for provider listings.
//!
//! The store is split in two:
//! - `ProviderStore`: shared, read-mostly handle (queries, schema, batches)
//! - `ProviderBatch`: a single write transaction opened from the store
//!
//! Writes only ever happen inside a batch. A batch either commits all of its
//! pending rows or none of them; dropping an uncommitted batch discards it.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{NewProvider, Provider};

/// Persistent collection of providers.
#[async_trait]
pub trait ProviderStore: Send + Sync {
    /// Create the providers table and its indexes if they do not exist.
    async fn ensure_schema(&self) -> Result<()>;

    /// Total number of stored providers.
    async fn count(&self) -> Result<i64>;

    /// Distinct service types, sorted ascending.
    async fn distinct_service_types(&self) -> Result<Vec<String>>;

    /// Distinct neighborhoods, sorted ascending.
    async fn distinct_neighborhoods(&self) -> Result<Vec<String>>;

    /// Providers matching both values exactly.
    ///
    /// Ordered by rating descending with unrated providers last; equal
    /// ratings are ordered by name.
    async fn find_matching(&self, service_type: &str, neighborhood: &str) -> Result<Vec<Provider>>;

    /// Provider count per service type, largest first.
    async fn service_type_counts(&self) -> Result<Vec<(String, i64)>>;

    /// Provider count per neighborhood, largest first, at most `limit` rows.
    async fn neighborhood_counts(&self, limit: i64) -> Result<Vec<(String, i64)>>;

    /// A few providers in id order, for diagnostics.
    async fn sample(&self, limit: i64) -> Result<Vec<Provider>>;

    /// Open a write batch.
    async fn begin(&self) -> Result<Box<dyn ProviderBatch>>;

    /// Release pooled connections. The store must not be used afterwards.
    async fn close(&self);
}

/// A pending set of writes against a [`ProviderStore`].
#[async_trait]
pub trait ProviderBatch: Send {
    /// Whether a provider with this name and service type exists, counting
    /// rows inserted earlier in this batch.
    async fn exists(&mut self, name: &str, service_type: &str) -> Result<bool>;

    /// Insert a provider, returning its new id.
    async fn insert(&mut self, provider: &NewProvider) -> Result<i64>;

    /// Delete every provider. Returns the number of rows removed.
    async fn clear(&mut self) -> Result<u64>;

    /// Make every pending write durable.
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Discard every pending write.
    async fn rollback(self: Box<Self>) -> Result<()>;
}
