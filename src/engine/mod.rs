//! VWAP aggregation engine
//!
//! Keeps, per symbol, the most recent N trades and incrementally
//! maintained Σvolume and Σprice×volume so the VWAP is always current.

mod types;
mod vwap;
mod window;

pub use types::{Contribution, ParseFailurePolicy, VwapUpdate};
pub use vwap::VwapEngine;
pub use window::SymbolWindow;
