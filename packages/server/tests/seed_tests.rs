//! Integration tests for startup seeding.

mod common;

use std::path::PathBuf;

use crate::common::TestHarness;
use listings::{LoadMode, LoadOutcome};
use server_core::config::SeedConfig;
use server_core::seed::{seed_on_startup, seed_store};

const LISTINGS: &str = r#"[
    {
        "title": "Canal Street Locksmiths",
        "categoryName": "Locksmith",
        "neighborhood": "Riverside",
        "phone": "+1 (555) 201-3344",
        "totalScore": 4.6,
        "reviewsCount": 12
    },
    {
        "title": "Shuttered Sparks",
        "categoryName": "Electrician",
        "neighborhood": "Riverside",
        "permanentlyClosed": true
    },
    {
        "title": "Riverside Bakery",
        "categoryName": "Bakery",
        "neighborhood": "Riverside"
    },
    {
        "title": "Mystery Fixers",
        "categoryName": "Handyman"
    }
]"#;

fn dataset_file(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{}-{}.json", name, std::process::id()));
    std::fs::write(&path, LISTINGS).expect("Failed to write dataset");
    path
}

#[tokio::test]
async fn seeding_twice_inserts_nothing_the_second_time() {
    let ctx = TestHarness::empty().await.unwrap();
    let seed = SeedConfig::default();

    let first = seed_store(ctx.store.as_ref(), &seed).await.unwrap();
    assert_eq!(first.outcome, LoadOutcome::Seeded);
    assert_eq!(first.inserted, 18);

    let second = seed_store(ctx.store.as_ref(), &seed).await.unwrap();
    assert_eq!(second.outcome, LoadOutcome::UpToDate);
    assert_eq!(second.inserted, 0);
    assert_eq!(ctx.store.count().await.unwrap(), 18);
}

#[tokio::test]
async fn dataset_file_extends_fixtures() {
    let ctx = TestHarness::new().await.unwrap();
    let path = dataset_file("seed-extends");
    let seed = SeedConfig {
        dataset: Some(path.clone()),
        ..SeedConfig::default()
    };

    let report = seed_store(ctx.store.as_ref(), &seed).await.unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(
        report.outcome,
        LoadOutcome::Extended {
            service_types: vec!["locksmith".to_string()],
            neighborhoods: vec!["riverside".to_string()],
        }
    );
    assert_eq!(report.inserted, 1);
    assert_eq!(report.closed, 1);
    assert_eq!(report.unlocated, 1);
    assert_eq!(report.uncategorized, 1);

    let (_, body) = ctx
        .get("/recommendations?service_type=locksmith&neighborhood=riverside")
        .await;
    assert_eq!(body["providers"][0]["name"], "Canal Street Locksmiths");
    assert_eq!(body["providers"][0]["contact"], "201-3344");
    assert_eq!(body["providers"][0]["full_phone"], "+1 (555) 201-3344");
}

#[tokio::test]
async fn refresh_mode_reloads_everything() {
    let ctx = TestHarness::new().await.unwrap();
    let path = dataset_file("seed-refresh");
    let seed = SeedConfig {
        dataset: Some(path.clone()),
        mode: LoadMode::FullRefresh,
        include_other: true,
        ..SeedConfig::default()
    };

    let report = seed_store(ctx.store.as_ref(), &seed).await.unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(report.outcome, LoadOutcome::Refreshed { removed: 18 });
    // Fixtures, the locksmith and the bakery kept as `other`.
    assert_eq!(report.inserted, 20);
    assert_eq!(ctx.store.count().await.unwrap(), 20);
}

#[tokio::test]
async fn unreadable_dataset_still_seeds_fixtures() {
    let ctx = TestHarness::empty().await.unwrap();
    let seed = SeedConfig {
        dataset: Some(PathBuf::from("does/not/exist.json")),
        ..SeedConfig::default()
    };

    seed_on_startup(ctx.store.as_ref(), &seed).await;

    assert_eq!(ctx.store.count().await.unwrap(), 18);
}
