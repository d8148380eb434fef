//! Startup seeding.
//!
//! Merges the built-in sample providers, plus the configured raw listing
//! file if any, into the store. Runs once per boot; the loader makes repeat
//! runs cheap when nothing changed.

use anyhow::{Context, Result};
use listings::{Classifier, Dataset, LoadReport, Loader, ProviderStore};
use tracing::{error, info, warn};

use crate::config::SeedConfig;

/// Build the startup dataset: fixtures first, then the configured file.
///
/// An unreadable dataset file is logged and skipped so the fixtures still load.
pub fn startup_dataset(seed: &SeedConfig) -> Dataset {
    let mut dataset = Dataset::fixtures();

    if let Some(path) = &seed.dataset {
        match Dataset::from_file(path, &Classifier::default()) {
            Ok(listings) => {
                info!(
                    path = %path.display(),
                    providers = listings.len(),
                    closed = listings.closed(),
                    "Loaded listing dataset"
                );
                dataset.extend(listings);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping listing dataset"),
        }
    }

    dataset
}

/// Seed the store with the startup dataset.
pub async fn seed_store(store: &dyn ProviderStore, seed: &SeedConfig) -> Result<LoadReport> {
    let dataset = startup_dataset(seed);
    Loader::new(store, seed.policy())
        .run(dataset)
        .await
        .context("Failed to seed provider store")
}

/// Seed during startup. Failures are logged and never stop the server.
pub async fn seed_on_startup(store: &dyn ProviderStore, seed: &SeedConfig) {
    match seed_store(store, seed).await {
        Ok(report) => info!(
            outcome = ?report.outcome,
            inserted = report.inserted,
            skipped = report.skipped(),
            "Startup seeding finished"
        ),
        Err(e) => error!(error = %format!("{:#}", e), "Startup seeding failed"),
    }
}
