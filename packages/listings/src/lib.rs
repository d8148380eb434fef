//! Service provider listings.
//!
//! Turns raw business listings into directory entries and keeps a provider
//! store in sync with them:
//!
//! - [`classify`] maps category strings onto the service-type taxonomy
//! - [`neighborhood`] derives the locality token used for filtering
//! - [`phone`] normalizes display phone numbers
//! - [`stores`] holds the [`ProviderStore`] backends (memory, SQLite, PostgreSQL)
//! - [`loader`] reconciles a dataset into a store without duplicating rows

pub mod classify;
pub mod dataset;
pub mod error;
pub mod fixtures;
pub mod loader;
pub mod neighborhood;
pub mod phone;
pub mod stores;
pub mod traits;
pub mod types;

pub use classify::{Classifier, Rule};
pub use dataset::{Dataset, DatasetSummary};
pub use error::{ListingsError, Result};
pub use loader::{LoadMode, LoadOutcome, LoadPolicy, LoadReport, Loader};
pub use neighborhood::{extract_neighborhood, UNKNOWN_NEIGHBORHOOD};
pub use phone::format_phone;
pub use traits::store::{ProviderBatch, ProviderStore};
pub use types::{NewProvider, Provider, RawListing, ReviewDistribution, ServiceType};
