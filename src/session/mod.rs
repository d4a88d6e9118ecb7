//! Feed session orchestration
//!
//! Drives `subscribe → read → compute` for one feed and owns the session's
//! lifecycle:
//!
//! ```text
//! Idle --subscribe ok--> Subscribed --> Consuming --stopped/error/cancel--> Stopped
//!   \---------------------subscribe failed------------------------------/
//! ```
//!
//! `turn_off` is always attempted on the way to `Stopped`.

mod types;

pub use crate::engine::VwapUpdate;
pub use types::{SessionReport, SessionState, StopReason, TradeObserver};

use crate::engine::VwapEngine;
use crate::feed::TradeFeed;
use tokio_util::sync::CancellationToken;

/// One feed session feeding a [`VwapEngine`]
pub struct FeedSession<F, O> {
    feed: F,
    engine: VwapEngine,
    observer: O,
    cancel: CancellationToken,
    state: SessionState,
}

impl<F: TradeFeed, O: TradeObserver> FeedSession<F, O> {
    pub fn new(feed: F, engine: VwapEngine, observer: O, cancel: CancellationToken) -> Self {
        Self {
            feed,
            engine,
            observer,
            cancel,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn engine(&self) -> &VwapEngine {
        &self.engine
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    /// Run the session to completion
    ///
    /// Never returns an error: every way the session can end is described
    /// by the report's [`StopReason`].
    pub async fn run(&mut self) -> SessionReport {
        let consumed_before = self.engine.consumed();
        let rejected_before = self.engine.rejected();

        let reason = match self.feed.subscribe().await {
            Ok(()) => {
                self.state = SessionState::Subscribed;
                tracing::debug!("Feed subscribed");
                self.consume().await
            }
            Err(e) => StopReason::SubscribeFailed(e),
        };

        self.shutdown(&reason).await;

        SessionReport {
            state: self.state,
            reason,
            consumed: self.engine.consumed() - consumed_before,
            rejected: self.engine.rejected() - rejected_before,
        }
    }

    async fn consume(&mut self) -> StopReason {
        self.state = SessionState::Consuming;

        loop {
            // Observed only between reads; an in-flight read is never aborted.
            if self.cancel.is_cancelled() {
                return StopReason::Cancelled;
            }

            let trade = match self.feed.read().await {
                Ok(trade) => trade,
                Err(e) if e.is_stopped() => return StopReason::FeedStopped,
                Err(e) => return StopReason::ReadFailed(e),
            };

            let trade_id = trade.id;
            let symbol = trade.symbol.clone();
            let currency = trade.currency.clone();
            let contribution = self.engine.compute(trade);

            let snapshot = contribution
                .entered_window()
                .then(|| self.engine.snapshot(&symbol))
                .flatten();
            // A rejected trade leaves the window as it was
            let update = snapshot.unwrap_or_else(|| VwapUpdate {
                trade_id,
                occupancy: self.engine.window(&symbol).map_or(0, |w| w.len()),
                vwap: self.engine.vwap_for(&symbol),
                symbol,
                currency,
                contribution,
            });
            self.observer.on_update(&update);
        }
    }

    async fn shutdown(&mut self, reason: &StopReason) {
        match reason {
            StopReason::FeedStopped => tracing::info!("Feed stopped"),
            StopReason::Cancelled => tracing::info!("Feed session cancelled"),
            StopReason::SubscribeFailed(e) => {
                tracing::error!(error = %e, "Feed subscription failed")
            }
            StopReason::ReadFailed(e) => tracing::error!(error = %e, "Feed read failed"),
        }

        if let Err(e) = self.feed.turn_off().await {
            tracing::warn!(error = %e, "Feed did not turn off cleanly");
        }
        self.state = SessionState::Stopped;
    }
}
