//! Sliding-window VWAP engine

use super::types::{parse_quantity, Contribution, ParseFailurePolicy, VwapUpdate};
use super::window::SymbolWindow;
use crate::feed::Trade;
use std::collections::HashMap;
use std::num::NonZeroUsize;

/// Per-symbol VWAP over the most recent `window_size` trades
///
/// Each symbol has its own independent window; trades for different
/// symbols may arrive interleaved in any order. `compute` is O(1)
/// amortized and never blocks.
#[derive(Debug, Clone)]
pub struct VwapEngine {
    window_size: NonZeroUsize,
    policy: ParseFailurePolicy,
    windows: HashMap<String, SymbolWindow>,
    consumed: u64,
    rejected: u64,
}

impl VwapEngine {
    /// Create an engine with the given window size and parse policy
    pub fn new(window_size: NonZeroUsize, policy: ParseFailurePolicy) -> Self {
        Self {
            window_size,
            policy,
            windows: HashMap::new(),
            consumed: 0,
            rejected: 0,
        }
    }

    /// Create an engine with the default zero-fill policy
    pub fn with_window(window_size: NonZeroUsize) -> Self {
        Self::new(window_size, ParseFailurePolicy::default())
    }

    /// Incorporate one trade into its symbol's window
    pub fn compute(&mut self, trade: Trade) -> Contribution {
        let (price, volume, contribution) =
            match (parse_quantity(&trade.price), parse_quantity(&trade.volume)) {
                (Some(price), Some(volume)) => (price, volume, Contribution::Applied),
                (price, volume) => {
                    tracing::warn!(
                        symbol = %trade.symbol,
                        trade_id = trade.id,
                        price = %trade.price,
                        volume = %trade.volume,
                        policy = ?self.policy,
                        "Unparseable trade quantity"
                    );
                    match self.policy {
                        ParseFailurePolicy::ZeroFill => (
                            price.unwrap_or(0.0),
                            volume.unwrap_or(0.0),
                            Contribution::ZeroFilled,
                        ),
                        ParseFailurePolicy::Skip => {
                            self.rejected += 1;
                            return Contribution::Rejected;
                        }
                    }
                }
            };

        self.consumed += 1;

        let capacity = self.window_size;
        let window = self
            .windows
            .entry(trade.symbol.clone())
            .or_insert_with(|| SymbolWindow::new(capacity));

        if let Some(evicted) = window.push(trade, price, volume, contribution) {
            tracing::trace!(trade_id = evicted.id, symbol = %evicted.symbol, "Evicted trade");
        }

        contribution
    }

    /// Current VWAP for `symbol`, `None` when there is no data
    pub fn vwap_for(&self, symbol: &str) -> Option<f64> {
        self.windows.get(symbol).and_then(SymbolWindow::vwap)
    }

    /// Read-only view of a symbol's window
    pub fn window(&self, symbol: &str) -> Option<&SymbolWindow> {
        self.windows.get(symbol)
    }

    /// Current state of `symbol`, stamped with the trade that entered its
    /// window last. `None` until a trade for `symbol` has been accepted.
    pub fn snapshot(&self, symbol: &str) -> Option<VwapUpdate> {
        let window = self.windows.get(symbol)?;
        let (newest, contribution) = window.newest_entry()?;
        Some(VwapUpdate {
            trade_id: newest.id,
            symbol: symbol.to_string(),
            occupancy: window.len(),
            currency: newest.currency.clone(),
            vwap: window.vwap(),
            contribution,
        })
    }

    /// Symbols seen so far, in no particular order
    pub fn symbols(&self) -> impl Iterator<Item = &str> + '_ {
        self.windows.keys().map(String::as_str)
    }

    pub fn window_size(&self) -> NonZeroUsize {
        self.window_size
    }

    /// Trades that entered a window
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Trades dropped by [`ParseFailurePolicy::Skip`]
    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}
