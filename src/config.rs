use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::constants::{
    DEFAULT_AGENT_MODEL, DEFAULT_PORT, DEFAULT_TIMEOUT_SECS, FORECAST_URL, GEOCODING_URL,
    OPENAI_BASE_URL,
};

/// Weather lookup and agent chat over HTTP or stdio.
#[derive(Debug, Parser)]
#[command(name = "weather-gateway", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub transport: Transport,

    #[command(flatten)]
    pub upstream: UpstreamConfig,

    #[command(flatten)]
    pub agent: AgentConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Transport {
    /// Serve the JSON API over HTTP
    Http {
        #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Serve tools and resources over standard input/output
    Stdio,
}

/// Where weather data comes from and how long to wait for it.
#[derive(Debug, Clone, Args)]
pub struct UpstreamConfig {
    #[arg(long, env = "GEOCODING_URL", default_value = GEOCODING_URL, global = true)]
    pub geocoding_url: String,

    #[arg(long, env = "FORECAST_URL", default_value = FORECAST_URL, global = true)]
    pub forecast_url: String,

    #[arg(
        long = "timeout-secs",
        env = "UPSTREAM_TIMEOUT_SECONDS",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            geocoding_url: GEOCODING_URL.to_string(),
            forecast_url: FORECAST_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct AgentConfig {
    /// Without a key every agent call fails
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = OPENAI_BASE_URL, global = true)]
    pub openai_base_url: String,

    #[arg(long, env = "AGENT_MODEL", default_value = DEFAULT_AGENT_MODEL, global = true)]
    pub agent_model: String,
}
