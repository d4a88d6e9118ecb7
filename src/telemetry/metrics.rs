//! Prometheus metrics

use crate::engine::Contribution;
use crate::session::VwapUpdate;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Current VWAP per symbol
    Vwap,
    /// Trades in the symbol's window
    WindowOccupancy,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Trades processed per symbol
    Trades,
    /// Trades with an unparseable price or size
    ParseFailures,
}

impl GaugeMetric {
    pub fn name(self) -> &'static str {
        match self {
            GaugeMetric::Vwap => "vwap_engine_vwap",
            GaugeMetric::WindowOccupancy => "vwap_engine_window_occupancy",
        }
    }
}

impl CounterMetric {
    pub fn name(self) -> &'static str {
        match self {
            CounterMetric::Trades => "vwap_engine_trades_total",
            CounterMetric::ParseFailures => "vwap_engine_parse_failures_total",
        }
    }
}

/// Start the Prometheus scrape endpoint on `0.0.0.0:port`
pub fn install_exporter(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter on {}: {}", addr, e))?;
    tracing::info!(%addr, "Prometheus metrics exporter listening");
    Ok(())
}

/// Record one processed trade
pub fn record_update(update: &VwapUpdate) {
    let symbol = update.symbol.clone();

    ::metrics::counter!(CounterMetric::Trades.name(), "symbol" => symbol.clone()).increment(1);
    if update.contribution != Contribution::Applied {
        ::metrics::counter!(CounterMetric::ParseFailures.name(), "symbol" => symbol.clone())
            .increment(1);
    }

    ::metrics::gauge!(GaugeMetric::WindowOccupancy.name(), "symbol" => symbol.clone())
        .set(update.occupancy as f64);
    if let Some(vwap) = update.vwap {
        ::metrics::gauge!(GaugeMetric::Vwap.name(), "symbol" => symbol).set(vwap);
    }
}
