use axum::{extract::Extension, Json};

use crate::domains::providers::{get_options, OptionsData};
use crate::server::app::AppState;
use crate::server::error::ApiError;

/// Distinct service types and neighbourhoods for the search form
pub async fn options_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<OptionsData>, ApiError> {
    let options = get_options(state.store.as_ref()).await?;
    Ok(Json(options))
}
