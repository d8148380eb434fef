use anyhow::{Context, Result};
use dotenvy::dotenv;
use listings::{LoadMode, LoadPolicy};
use std::env;
use std::path::PathBuf;

const DEFAULT_DATABASE_URL: &str = "sqlite://providers.db";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub seed: SeedConfig,
}

/// Startup seeding options
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Raw listing JSON merged after the built-in fixtures.
    pub dataset: Option<PathBuf>,
    pub mode: LoadMode,
    pub include_other: bool,
    pub commit_every: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        let policy = LoadPolicy::default();
        Self {
            dataset: None,
            mode: policy.mode,
            include_other: !policy.drop_other,
            commit_every: policy.commit_every,
        }
    }
}

impl SeedConfig {
    pub fn policy(&self) -> LoadPolicy {
        LoadPolicy::default()
            .with_mode(self.mode)
            .with_drop_other(!self.include_other)
            .with_commit_every(self.commit_every)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = SeedConfig::default();

        Ok(Self {
            database_url: normalize_database_url(
                &lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            ),
            port: lookup("PORT")
                .unwrap_or_else(|| "8000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            seed: SeedConfig {
                dataset: lookup("SEED_DATASET")
                    .filter(|path| !path.trim().is_empty())
                    .map(PathBuf::from),
                mode: match lookup("SEED_MODE") {
                    Some(mode) => mode.parse::<LoadMode>().context("SEED_MODE must be incremental or refresh")?,
                    None => defaults.mode,
                },
                include_other: match lookup("SEED_INCLUDE_OTHER") {
                    Some(flag) => parse_flag(&flag).context("SEED_INCLUDE_OTHER must be true or false")?,
                    None => defaults.include_other,
                },
                commit_every: match lookup("SEED_COMMIT_EVERY") {
                    Some(n) => n
                        .parse::<usize>()
                        .context("SEED_COMMIT_EVERY must be a positive number")?,
                    None => defaults.commit_every,
                },
            },
        })
    }
}

/// Hosting platforms hand out `postgres://` URLs; rewrite them to the
/// `postgresql://` scheme.
pub fn normalize_database_url(url: &str) -> String {
    match url.strip_prefix("postgres://") {
        Some(rest) => format!("postgresql://{}", rest),
        None => url.to_string(),
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("invalid flag value: {}", other),
    }
}
