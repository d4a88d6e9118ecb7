//! Log + metrics sink for session progress

use super::metrics::record_update;
use crate::session::{TradeObserver, VwapUpdate};

/// Logs every VWAP update and mirrors it into metrics
///
/// Updates are logged at info level when verbose and at debug otherwise.
#[derive(Debug, Default)]
pub struct LogObserver {
    verbose: bool,
}

impl LogObserver {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl TradeObserver for LogObserver {
    fn on_update(&mut self, update: &VwapUpdate) {
        record_update(update);

        let vwap = update
            .vwap
            .map_or_else(|| "no data".to_string(), |v| format!("{:.2}", v));

        if self.verbose {
            tracing::info!(
                symbol = %update.symbol,
                trades = update.occupancy,
                currency = %update.currency,
                vwap = %vwap,
                trade_id = update.trade_id,
                contribution = ?update.contribution,
                "VWAP updated"
            );
        } else {
            tracing::debug!(
                symbol = %update.symbol,
                trades = update.occupancy,
                currency = %update.currency,
                vwap = %vwap,
                "VWAP updated"
            );
        }
    }
}
