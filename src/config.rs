//! Configuration types for vwap-engine

use crate::engine::ParseFailurePolicy;
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::time::Duration;

/// Window size used when none (or an invalid one) is configured
pub const DEFAULT_WINDOW_SIZE: NonZeroUsize = match NonZeroUsize::new(200) {
    Some(n) => n,
    None => unreachable!(),
};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Trade feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Provenance stamped on every trade
    #[serde(default = "default_provider_name")]
    pub provider_name: String,
    /// WebSocket endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Quote currency stamped on every trade
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Products to subscribe to
    #[serde(default = "default_pairs")]
    pub pairs: Vec<String>,
    /// Frames inspected while waiting for a handshake confirmation
    #[serde(default = "default_sub_retries")]
    pub sub_retries: u32,
    /// Channel to subscribe on
    #[serde(default = "default_channel_name")]
    pub channel_name: String,
    /// Message type that confirms a subscribe/unsubscribe
    #[serde(default = "default_confirmation_type")]
    pub confirmation_type: String,
    /// Opening handshake timeout (seconds)
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Per-read deadline (seconds, 0 = wait forever)
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
    /// Exit with an error when the startup subscription fails
    #[serde(default)]
    pub fail_fast: bool,
}

fn default_provider_name() -> String {
    "coinbase.com".to_string()
}
fn default_endpoint() -> String {
    "wss://ws-feed.exchange.coinbase.com".to_string()
}
fn default_currency() -> String {
    "USD".to_string()
}
fn default_pairs() -> Vec<String> {
    vec!["BTC-USD".into(), "ETH-USD".into(), "ETH-BTC".into()]
}
fn default_sub_retries() -> u32 {
    30
}
fn default_channel_name() -> String {
    "matches".to_string()
}
fn default_confirmation_type() -> String {
    "subscriptions".to_string()
}
fn default_connect_timeout_secs() -> u64 {
    10
}
fn default_read_timeout_secs() -> u64 {
    60
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            provider_name: default_provider_name(),
            endpoint: default_endpoint(),
            currency: default_currency(),
            pairs: default_pairs(),
            sub_retries: default_sub_retries(),
            channel_name: default_channel_name(),
            confirmation_type: default_confirmation_type(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
            fail_fast: false,
        }
    }
}

impl FeedConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

/// VWAP engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Trades kept per symbol. Non-positive values fall back to the default.
    #[serde(default = "default_window_size")]
    pub window_size: i64,
    /// What to do with a trade whose price or size is not a number
    #[serde(default)]
    pub parse_failure: ParseFailurePolicy,
}

fn default_window_size() -> i64 {
    DEFAULT_WINDOW_SIZE.get() as i64
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            parse_failure: ParseFailurePolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Validated window size
    pub fn window(&self) -> NonZeroUsize {
        resolve_window_size(Some(self.window_size), DEFAULT_WINDOW_SIZE)
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Debug logging of every handshake and trade
    #[serde(default)]
    pub verbose: bool,
    /// Emit JSON log lines instead of human-readable ones
    #[serde(default)]
    pub json_logs: bool,
    /// Serve Prometheus metrics on this port
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            verbose: false,
            json_logs: false,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Resolve a requested window size, falling back when it is missing,
/// zero or negative.
pub fn resolve_window_size(requested: Option<i64>, fallback: NonZeroUsize) -> NonZeroUsize {
    match requested {
        Some(n) if n > 0 => usize::try_from(n)
            .ok()
            .and_then(NonZeroUsize::new)
            .unwrap_or(fallback),
        Some(n) => {
            tracing::warn!(
                requested = n,
                fallback = fallback.get(),
                "Invalid sliding window size, using default"
            );
            fallback
        }
        None => fallback,
    }
}
