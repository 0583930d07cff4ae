use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domains::tracked_pages::batch::DEFAULT_CHECK_CONCURRENCY;
use crate::kernel::http_fetcher::{FetcherConfig, DEFAULT_USER_AGENT};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub database_max_connections: u32,
    pub fetch_timeout: Duration,
    pub fetch_max_bytes: usize,
    pub fetch_user_agent: String,
    pub check_concurrency: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup (env vars in production,
    /// a map in tests).
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let fetch_timeout_secs: u64 = parse_or(&get, "FETCH_TIMEOUT_SECS", 15)?;
        if fetch_timeout_secs == 0 {
            bail!("FETCH_TIMEOUT_SECS must be greater than zero");
        }

        let check_concurrency: usize =
            parse_or(&get, "CHECK_CONCURRENCY", DEFAULT_CHECK_CONCURRENCY)?;
        if check_concurrency == 0 {
            bail!("CHECK_CONCURRENCY must be at least 1");
        }

        Ok(Self {
            database_url: get("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: parse_or(&get, "PORT", 5000)?,
            database_max_connections: parse_or(&get, "DATABASE_MAX_CONNECTIONS", 10)?,
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            fetch_max_bytes: parse_or(&get, "FETCH_MAX_BYTES", 5 * 1024 * 1024)?,
            fetch_user_agent: get("FETCH_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            check_concurrency,
        })
    }

    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            timeout: self.fetch_timeout,
            max_body_bytes: self.fetch_max_bytes,
            user_agent: self.fetch_user_agent.clone(),
        }
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number, got '{}'", key, raw)),
        None => Ok(default),
    }
}
