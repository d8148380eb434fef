use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domains::providers::{get_recommendations, RecommendationData};
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct RecommendationsQuery {
    service_type: Option<String>,
    neighborhood: Option<String>,
}

#[derive(Serialize)]
pub struct RecommendationsResponse {
    providers: Vec<RecommendationData>,
}

/// Ranked providers for `?service_type=..&neighborhood=..`
///
/// Both parameters are required. No match is an empty list, not an error.
pub async fn recommendations_handler(
    Extension(state): Extension<AppState>,
    query: Result<Query<RecommendationsQuery>, QueryRejection>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let service_type = required(query.service_type, "service_type")?;
    let neighborhood = required(query.neighborhood, "neighborhood")?;

    let providers = get_recommendations(state.store.as_ref(), &service_type, &neighborhood).await?;
    Ok(Json(RecommendationsResponse { providers }))
}

fn required(value: Option<String>, name: &str) -> Result<String, ApiError> {
    value.ok_or_else(|| {
        ApiError::BadRequest(format!("Missing required query parameter: {}", name))
    })
}
