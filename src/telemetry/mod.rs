//! Telemetry module
//!
//! Logging, metrics, and the session progress sink

mod logging;
mod metrics;
mod observer;

pub use logging::{effective_level, init_logging, LogFormat};
#[cfg(test)]
pub(crate) use logging::capture_logs;
pub use metrics::{install_exporter, record_update, CounterMetric, GaugeMetric};
pub use observer::LogObserver;

use crate::config::TelemetryConfig;

/// Guard that cleans up telemetry on drop
pub struct TelemetryGuard {
    _priv: (),
}

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    let format = if config.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_logging(effective_level(&config.log_level, config.verbose), format)?;

    if let Some(port) = config.metrics_port {
        install_exporter(port)?;
    }

    Ok(TelemetryGuard { _priv: () })
}
