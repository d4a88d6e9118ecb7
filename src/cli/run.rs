//! Run command implementation

use crate::config::{resolve_window_size, Config, TelemetryConfig};
use crate::engine::VwapEngine;
use crate::feed::CoinbaseFeed;
use crate::session::{FeedSession, StopReason};
use crate::telemetry::LogObserver;
use crate::ws::{WsClient, WsConfig};
use clap::{ArgAction, Args};
use std::convert::Infallible;
use tokio_util::sync::CancellationToken;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Enable verbose output
    #[arg(short, long, env = "DEBUG", action = ArgAction::SetTrue, value_parser = parse_flag)]
    pub verbose: bool,

    /// Trades kept per symbol; non-positive values keep the configured size
    #[arg(short, long, env = "DATA_SLIDE_WINDOW", allow_negative_numbers = true)]
    pub window: Option<i64>,

    /// Products to subscribe to (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub pairs: Vec<String>,

    /// WebSocket endpoint override
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Exit with an error if the startup subscription fails
    #[arg(long)]
    pub fail_fast: bool,
}

/// Truthy values are `1`, `t`, `T`, `true`, `TRUE` and `True`.
/// Anything else, including garbage, reads as false.
fn parse_flag(value: &str) -> Result<bool, Infallible> {
    Ok(matches!(value, "1" | "t" | "T" | "true" | "TRUE" | "True"))
}

impl RunArgs {
    /// Overrides that logging needs before it is initialized
    pub fn apply_telemetry(&self, telemetry: &mut TelemetryConfig) {
        if self.verbose {
            telemetry.verbose = true;
        }
    }

    /// Layer command-line and environment overrides on top of `config`
    pub fn apply(&self, config: &mut Config) {
        self.apply_telemetry(&mut config.telemetry);
        if self.window.is_some() {
            let window = resolve_window_size(self.window, config.engine.window());
            config.engine.window_size = window.get() as i64;
        }
        if !self.pairs.is_empty() {
            config.feed.pairs = self.pairs.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.feed.endpoint = endpoint.clone();
        }
        if self.fail_fast {
            config.feed.fail_fast = true;
        }
    }

    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let verbose = config.telemetry.verbose;
        let fail_fast = config.feed.fail_fast;

        let transport = WsClient::new(
            WsConfig::new()
                .connect_timeout(config.feed.connect_timeout())
                .read_timeout(config.feed.read_timeout()),
        );
        let feed = CoinbaseFeed::new(config.feed, transport).verbose(verbose);
        let engine = VwapEngine::new(config.engine.window(), config.engine.parse_failure);

        let cancel = CancellationToken::new();
        let signals = tokio::spawn(cancel_on_signal(cancel.clone()));

        let mut session = FeedSession::new(feed, engine, LogObserver::new(verbose), cancel);
        let report = session.run().await;
        signals.abort();

        tracing::info!(
            consumed = report.consumed,
            rejected = report.rejected,
            reason = ?report.reason,
            "VWAP engine stopped"
        );

        match report.reason {
            StopReason::SubscribeFailed(e) if fail_fast => {
                Err(anyhow::Error::new(e).context("startup subscription failed"))
            }
            _ => Ok(()),
        }
    }
}

/// Cancel `token` on Ctrl-C or SIGTERM
async fn cancel_on_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown requested, stopping after the current read");
    token.cancel();
}
