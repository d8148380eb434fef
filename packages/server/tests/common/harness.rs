//! Test harness for integration testing.
//!
//! Each test gets its own in-memory SQLite store seeded with the sample
//! providers, and drives the real router without binding a socket.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use listings::stores::SqliteStore;
use listings::{Dataset, LoadPolicy, Loader, NewProvider, ProviderStore};
use serde_json::Value;
use server_core::server::build_app;
use test_context::AsyncTestContext;
use tower::ServiceExt;

/// Test harness that manages test infrastructure.
///
/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &mut TestHarness) {
///     let (status, body) = ctx.get("/ping").await;
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    /// Store handle - use this for test fixtures.
    pub store: Arc<dyn ProviderStore>,
    pub app: Router,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new().await.expect("Failed to create test harness")
    }

    async fn teardown(self) {
        self.store.close().await;
    }
}

impl TestHarness {
    /// Creates a harness over a fresh store seeded with the sample providers.
    pub async fn new() -> Result<Self> {
        let harness = Self::empty().await?;
        Loader::new(harness.store.as_ref(), LoadPolicy::default())
            .run(Dataset::fixtures())
            .await
            .context("Failed to seed fixtures")?;
        Ok(harness)
    }

    /// Creates a harness over a fresh, empty store.
    pub async fn empty() -> Result<Self> {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let store: Arc<dyn ProviderStore> = Arc::new(
            SqliteStore::in_memory()
                .await
                .context("Failed to open in-memory store")?,
        );
        store.ensure_schema().await.context("Failed to create schema")?;

        Ok(Self {
            app: build_app(store.clone()),
            store,
        })
    }

    /// Insert providers directly, bypassing the loader.
    pub async fn insert(&self, providers: &[NewProvider]) -> Result<()> {
        let mut batch = self.store.begin().await?;
        for provider in providers {
            batch.insert(provider).await?;
        }
        batch.commit().await?;
        Ok(())
    }

    /// Send a GET request and decode the JSON body.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get_text(uri).await;
        let json = serde_json::from_str(&body).unwrap_or(Value::Null);
        (status, json)
    }

    /// Send a GET request and return the raw body.
    pub async fn get_text(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("Failed to build request"),
            )
            .await
            .expect("Router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }
}
