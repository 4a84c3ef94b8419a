use std::time::Duration;

use anyhow::{anyhow, Context, Result};

use crate::awards::orchestrator::EmptyResultPolicy;
use crate::awards::strategies::conversational::{
    DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS,
};
use crate::awards::strategies::PollConfig;
use crate::llm_client::DEFAULT_BASE_URL;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    /// Persona for the conversational strategy. Absent ⇒ that strategy always falls through.
    pub openai_assistant_id: Option<String>,
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
    pub empty_results: EmptyResultPolicy,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            openai_api_key: require("OPENAI_API_KEY")?,
            openai_base_url: var("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            openai_assistant_id: var("OPENAI_ASSISTANT_ID"),
            poll_interval_ms: var("DISCOVERY_POLL_INTERVAL_MS")
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("DISCOVERY_POLL_INTERVAL_MS must be a number of milliseconds")?
                .unwrap_or(DEFAULT_POLL_INTERVAL_MS),
            max_poll_attempts: var("DISCOVERY_MAX_POLL_ATTEMPTS")
                .map(|v| v.parse::<u32>())
                .transpose()
                .context("DISCOVERY_MAX_POLL_ATTEMPTS must be a positive integer")?
                .unwrap_or(DEFAULT_MAX_POLL_ATTEMPTS),
            empty_results: var("DISCOVERY_EMPTY_RESULTS")
                .map(|v| v.parse::<EmptyResultPolicy>())
                .transpose()
                .map_err(|e| anyhow!("DISCOVERY_EMPTY_RESULTS: {e}"))?
                .unwrap_or_default(),
            port: var("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.max_poll_attempts,
        }
    }
}
