//! VWAP engine types

use serde::Deserialize;

/// Handling of a trade whose price or size text is not a usable number
///
/// Text that does not parse, parses to a non-finite value or is negative
/// counts as a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseFailurePolicy {
    /// The bad field contributes zero; the trade still occupies a window slot
    #[default]
    ZeroFill,
    /// The trade is dropped and the window is left untouched
    Skip,
}

/// How a trade was incorporated by [`super::VwapEngine::compute`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contribution {
    /// Price and size parsed
    Applied,
    /// At least one field was zero-filled
    ZeroFilled,
    /// Trade was dropped
    Rejected,
}

impl Contribution {
    /// Whether the trade entered its symbol's window
    pub fn entered_window(self) -> bool {
        !matches!(self, Contribution::Rejected)
    }
}

/// A symbol's state after a trade, as handed to observers
#[derive(Debug, Clone, PartialEq)]
pub struct VwapUpdate {
    pub trade_id: i64,
    pub symbol: String,
    /// Trades currently in the symbol's window
    pub occupancy: usize,
    pub currency: String,
    /// VWAP after this trade, `None` while the window holds no volume
    pub vwap: Option<f64>,
    pub contribution: Contribution,
}

/// Parse a decimal quantity for aggregation
pub(crate) fn parse_quantity(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}
