//! Per-symbol sliding window

use super::types::Contribution;
use crate::feed::Trade;
use std::collections::VecDeque;
use std::num::NonZeroUsize;

/// A trade together with the numbers that were added to the running sums
#[derive(Debug, Clone)]
struct Entry {
    trade: Trade,
    price: f64,
    volume: f64,
    contribution: Contribution,
}

/// Bounded FIFO of the most recent trades for one symbol
///
/// Maintains `sum_volume` and `sum_price_volume` incrementally: every push
/// adds the new trade's contribution and, once the window is full, subtracts
/// exactly what the evicted trade had added. No operation rescans the
/// history.
#[derive(Debug, Clone)]
pub struct SymbolWindow {
    capacity: NonZeroUsize,
    history: VecDeque<Entry>,
    sum_volume: f64,
    sum_price_volume: f64,
    /// Entries with non-zero volume
    weighted: usize,
    vwap: Option<f64>,
}

impl SymbolWindow {
    pub(crate) fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            history: VecDeque::new(),
            sum_volume: 0.0,
            sum_price_volume: 0.0,
            weighted: 0,
            vwap: None,
        }
    }

    /// Append a trade, evicting the oldest one if the window is full.
    /// Returns the evicted trade.
    pub(crate) fn push(
        &mut self,
        trade: Trade,
        price: f64,
        volume: f64,
        contribution: Contribution,
    ) -> Option<Trade> {
        let evicted = if self.history.len() >= self.capacity.get() {
            self.evict_oldest()
        } else {
            None
        };

        self.sum_volume += volume;
        self.sum_price_volume += price * volume;
        if volume != 0.0 {
            self.weighted += 1;
        }
        self.history.push_back(Entry {
            trade,
            price,
            volume,
            contribution,
        });

        // Only zero-volume trades left: drop the floating residue of the
        // subtractions instead of dividing by it.
        if self.weighted == 0 {
            self.sum_volume = 0.0;
            self.sum_price_volume = 0.0;
        }
        self.vwap = (self.sum_volume > 0.0).then(|| self.sum_price_volume / self.sum_volume);

        evicted
    }

    fn evict_oldest(&mut self) -> Option<Trade> {
        let oldest = self.history.pop_front()?;
        self.sum_volume -= oldest.volume;
        self.sum_price_volume -= oldest.price * oldest.volume;
        if oldest.volume != 0.0 {
            self.weighted -= 1;
        }
        Some(oldest.trade)
    }

    /// Number of trades in the window
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    pub fn is_full(&self) -> bool {
        self.history.len() == self.capacity.get()
    }

    /// Σ volume over the window
    pub fn sum_volume(&self) -> f64 {
        self.sum_volume
    }

    /// Σ price × volume over the window
    pub fn sum_price_volume(&self) -> f64 {
        self.sum_price_volume
    }

    /// Current VWAP, `None` while the window holds no volume
    pub fn vwap(&self) -> Option<f64> {
        self.vwap
    }

    /// Oldest trade still in the window
    pub fn oldest(&self) -> Option<&Trade> {
        self.history.front().map(|e| &e.trade)
    }

    /// Most recent trade
    pub fn newest(&self) -> Option<&Trade> {
        self.history.back().map(|e| &e.trade)
    }

    /// Most recent trade and how it entered the window
    pub(crate) fn newest_entry(&self) -> Option<(&Trade, Contribution)> {
        self.history.back().map(|e| (&e.trade, e.contribution))
    }

    /// Trades in the window, oldest first
    pub fn trades(&self) -> impl Iterator<Item = &Trade> + '_ {
        self.history.iter().map(|e| &e.trade)
    }

    /// `(price, volume)` pairs as they were added to the sums, oldest first
    pub fn contributions(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.history.iter().map(|e| (e.price, e.volume))
    }
}
