//! CLI for importing scraped listings into the provider store
//!
//! Classifies a raw listing JSON file, shows what it contains, and merges it
//! with the same loader the server uses at startup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use listings::stores::{connect, redact};
use listings::{
    Classifier, Dataset, DatasetSummary, LoadMode, LoadOutcome, LoadPolicy, Loader, ProviderStore,
};
use server_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const TOP_NEIGHBORHOODS: usize = 10;
const SAMPLE_SIZE: i64 = 5;

#[derive(Parser)]
#[command(name = "import_listings")]
#[command(about = "Import scraped listings into the provider directory")]
struct Cli {
    /// Database URL (defaults to DATABASE_URL)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a listing file and merge it into the store
    Import {
        file: PathBuf,

        /// Delete every provider before loading
        #[arg(long)]
        refresh: bool,

        /// Keep listings that match no service type
        #[arg(long)]
        include_other: bool,

        /// Rows per transaction
        #[arg(long, default_value_t = 50)]
        commit_every: usize,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Show what a listing file contains without touching the store
    Summary { file: PathBuf },

    /// Print store statistics
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,listings=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { file } => {
            let dataset = read_dataset(&file)?;
            print_summary(&dataset);
            Ok(())
        }
        Commands::Import {
            file,
            refresh,
            include_other,
            commit_every,
            yes,
        } => {
            let dataset = read_dataset(&file)?;
            print_summary(&dataset);

            let mode = if refresh {
                LoadMode::FullRefresh
            } else {
                LoadMode::Incremental
            };
            let policy = LoadPolicy::default()
                .with_mode(mode)
                .with_drop_other(!include_other)
                .with_commit_every(commit_every);

            let prompt = match mode {
                LoadMode::FullRefresh => "Replace every stored provider with this dataset?",
                LoadMode::Incremental => "Merge this dataset into the store?",
            };
            if !yes && !confirm(prompt)? {
                println!("{}", style("Import cancelled").yellow());
                return Ok(());
            }

            let store = open_store(cli.database_url).await?;
            let result = import(store.as_ref(), dataset, policy).await;
            store.close().await;
            result
        }
        Commands::Check => {
            let store = open_store(cli.database_url).await?;
            let result = check(store.as_ref()).await;
            store.close().await;
            result
        }
    }
}

fn read_dataset(file: &Path) -> Result<Dataset> {
    println!("{}", style(format!("Reading {}", file.display())).cyan());
    let dataset = Dataset::from_file(file, &Classifier::default())
        .with_context(|| format!("Failed to read listings from {}", file.display()))?;
    println!(
        "Prepared {} providers ({} permanently closed skipped)",
        dataset.len(),
        dataset.closed()
    );
    Ok(dataset)
}

async fn open_store(database_url: Option<String>) -> Result<Arc<dyn ProviderStore>> {
    let database_url = match database_url {
        Some(url) => server_core::normalize_database_url(&url),
        None => Config::from_env().context("Failed to load configuration")?.database_url,
    };

    println!("{}", style(format!("Connecting to {}", redact(&database_url))).cyan());
    let store = connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    store
        .ensure_schema()
        .await
        .context("Failed to prepare database schema")?;
    Ok(store)
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

async fn import(store: &dyn ProviderStore, dataset: Dataset, policy: LoadPolicy) -> Result<()> {
    let report = Loader::new(store, policy)
        .run(dataset)
        .await
        .context("Import failed")?;

    println!();
    match &report.outcome {
        LoadOutcome::Seeded => println!("{}", style("Empty store seeded").green()),
        LoadOutcome::Refreshed { removed } => {
            println!("{}", style(format!("Replaced {} providers", removed)).green())
        }
        LoadOutcome::Extended {
            service_types,
            neighborhoods,
        } => {
            println!("{}", style("Added new categories").green());
            if !service_types.is_empty() {
                println!("  service types: {}", service_types.join(", "));
            }
            if !neighborhoods.is_empty() {
                println!("  neighborhoods: {}", neighborhoods.join(", "));
            }
        }
        LoadOutcome::UpToDate => {
            println!("{}", style("Store already up to date, nothing imported").yellow())
        }
    }

    println!("  inserted:               {}", report.inserted);
    println!("  duplicates skipped:     {}", report.duplicates);
    println!("  closed skipped:         {}", report.closed);
    println!("  unknown neighborhood:   {}", report.unlocated);
    println!("  unclassified skipped:   {}", report.uncategorized);
    println!("  total in store:         {}", store.count().await?);
    Ok(())
}

fn print_summary(dataset: &Dataset) {
    let DatasetSummary {
        service_types,
        neighborhoods,
    } = dataset.summary();

    println!();
    println!("{}", style("Service types").bold());
    for (service_type, count) in &service_types {
        println!("  {:<20} {}", service_type, count);
    }

    println!();
    println!(
        "{}",
        style(format!("Top {} neighborhoods", TOP_NEIGHBORHOODS)).bold()
    );
    for (neighborhood, count) in neighborhoods.iter().take(TOP_NEIGHBORHOODS) {
        println!("  {:<30} {}", neighborhood, count);
    }
    if neighborhoods.len() > TOP_NEIGHBORHOODS {
        println!("  ... and {} more", neighborhoods.len() - TOP_NEIGHBORHOODS);
    }
    println!();
}

async fn check(store: &dyn ProviderStore) -> Result<()> {
    let total = store.count().await.context("Failed to count providers")?;
    println!();
    println!("{}", style(format!("{} providers", total)).bold());

    println!();
    println!("{}", style("Service types").bold());
    for (service_type, count) in store.service_type_counts().await? {
        println!("  {:<20} {}", service_type, count);
    }

    println!();
    println!(
        "{}",
        style(format!("Top {} neighborhoods", TOP_NEIGHBORHOODS)).bold()
    );
    for (neighborhood, count) in store.neighborhood_counts(TOP_NEIGHBORHOODS as i64).await? {
        println!("  {:<30} {}", neighborhood, count);
    }

    println!();
    println!("{}", style("Sample providers").bold());
    for provider in store.sample(SAMPLE_SIZE).await? {
        let rating = provider
            .rating
            .map(|r| format!("{:.1}", r))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {} | {} | {} | {} | {}",
            provider.name,
            provider.service_type,
            provider.neighborhood,
            provider.contact.as_deref().unwrap_or("-"),
            rating
        );
    }

    Ok(())
}
