//! Provider query actions
//!
//! Matching is case-insensitive: inputs are lowercased before they reach the
//! store, which holds lowercase values only.

use anyhow::{Context, Result};
use listings::ProviderStore;
use tracing::{debug, info};

use crate::domains::providers::data::{OptionsData, ProviderData, RecommendationData};

/// Distinct service types and neighborhoods, each sorted
pub async fn get_options(store: &dyn ProviderStore) -> Result<OptionsData> {
    let service_types = store
        .distinct_service_types()
        .await
        .context("Failed to load service types")?;
    let neighbourhoods = store
        .distinct_neighborhoods()
        .await
        .context("Failed to load neighborhoods")?;

    debug!(
        service_types = service_types.len(),
        neighbourhoods = neighbourhoods.len(),
        "Loaded search options"
    );

    Ok(OptionsData {
        service_types,
        neighbourhoods,
    })
}

/// Providers for a service type in a neighborhood, best rated first
pub async fn get_recommendations(
    store: &dyn ProviderStore,
    service_type: &str,
    neighborhood: &str,
) -> Result<Vec<RecommendationData>> {
    let service_type = service_type.to_lowercase();
    let neighborhood = neighborhood.to_lowercase();

    let providers = store
        .find_matching(&service_type, &neighborhood)
        .await
        .context("Failed to load providers")?;

    info!(
        service_type = %service_type,
        neighborhood = %neighborhood,
        matches = providers.len(),
        "Getting recommendations"
    );

    Ok(providers
        .into_iter()
        .enumerate()
        .map(|(i, provider)| RecommendationData::new(i + 1, ProviderData::from(provider)))
        .collect())
}
