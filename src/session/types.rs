//! Feed session types

use crate::engine::VwapUpdate;
use crate::feed::FeedError;

/// Lifecycle of one feed session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Subscribed,
    Consuming,
    Stopped,
}

/// Why a session reached [`SessionState::Stopped`]
#[derive(Debug)]
pub enum StopReason {
    /// Transport reported not-connected: an orderly end of the feed
    FeedStopped,
    /// Cancellation was requested between reads
    Cancelled,
    /// Subscription handshake failed; nothing was consumed
    SubscribeFailed(FeedError),
    /// A read failed with anything other than not-connected
    ReadFailed(FeedError),
}

impl StopReason {
    /// Whether the session ended because of an error
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            StopReason::SubscribeFailed(_) | StopReason::ReadFailed(_)
        )
    }
}

/// Summary returned when a session ends
#[derive(Debug)]
pub struct SessionReport {
    /// Always [`SessionState::Stopped`] once `run` returns
    pub state: SessionState,
    pub reason: StopReason,
    /// Trades that entered the engine during this session
    pub consumed: u64,
    /// Trades dropped by the engine's parse policy
    pub rejected: u64,
}

/// Receives one [`VwapUpdate`] per processed trade
pub trait TradeObserver: Send {
    fn on_update(&mut self, update: &VwapUpdate);
}

impl<F> TradeObserver for F
where
    F: FnMut(&VwapUpdate) + Send,
{
    fn on_update(&mut self, update: &VwapUpdate) {
        self(update)
    }
}
