//! Configuration parsing and validation for the API server
//!
//! This module handles command-line argument parsing and validation using clap. Every option
//! that matters in a deployment can also be supplied through the environment.
use anyhow::anyhow;
use clap::Parser;
use cognitive_twin::client::PoolSettings;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// The port on which the API server will listen.
    #[arg(short = 'p', long, env = "COGNITIVE_TWIN_PORT", default_value_t = 8000)]
    pub port: u16,

    /// The port on which the metrics server will listen.
    #[arg(long, env = "COGNITIVE_TWIN_METRICS_PORT", default_value_t = 9090)]
    pub metrics_port: u16,

    /// Whether to enable the metrics endpoint.
    #[arg(short = 'm', long, env = "COGNITIVE_TWIN_METRICS", default_value_t = true, action = clap::ArgAction::Set)]
    pub metrics: bool,

    /// The prefix to use for metrics.
    #[arg(long, default_value = "cognitive_twin")]
    pub metrics_prefix: String,

    /// Base URL of the LibreTranslate-compatible translation service.
    #[arg(long, env = "COGNITIVE_TWIN_TRANSLATE_URL", default_value = "https://libretranslate.com")]
    pub translate_url: Url,

    /// API key sent with translation requests, if the service requires one.
    #[arg(long, env = "COGNITIVE_TWIN_TRANSLATE_API_KEY", hide_env_values = true)]
    pub translate_api_key: Option<String>,

    /// Maximum number of idle connections to keep alive to the translation service.
    #[arg(long, default_value_t = 100)]
    pub pool_max_idle_per_host: usize,

    /// How long (in seconds) to keep idle connections alive.
    #[arg(long, default_value_t = 90)]
    pub pool_idle_timeout_secs: u64,
}

impl Config {
    pub fn validate(self) -> Result<Self, anyhow::Error> {
        if !matches!(self.translate_url.scheme(), "http" | "https") {
            return Err(anyhow!(
                "Translate URL '{}' must use http or https",
                self.translate_url
            ));
        }
        if self.metrics && self.metrics_port == self.port {
            return Err(anyhow!(
                "Metrics port {} clashes with the API port",
                self.metrics_port
            ));
        }
        Ok(self)
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_idle_per_host: self.pool_max_idle_per_host,
            idle_timeout: Duration::from_secs(self.pool_idle_timeout_secs),
        }
    }
}
