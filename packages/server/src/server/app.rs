//! Application setup and server configuration.

use std::sync::Arc;

use axum::{extract::Extension, routing::get, Router};
use listings::ProviderStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::routes::{
    health_handler, index_handler, options_handler, recommendations_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProviderStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ProviderStore>) -> Self {
        Self { store }
    }
}

/// Build the Axum application router
///
/// The store is opened by the caller and shared with every handler through
/// an `Extension`.
pub fn build_app(store: Arc<dyn ProviderStore>) -> Router {
    let app_state = AppState::new(store);

    // The API is read-only and public.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/ping", get(health_handler))
        .route("/options", get(options_handler))
        .route("/recommendations", get(recommendations_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
