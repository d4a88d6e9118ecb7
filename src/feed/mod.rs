//! Trade feed module
//!
//! Normalizes a provider's subscribe/unsubscribe JSON protocol into a
//! uniform `subscribe / read / turn_off` contract.

mod coinbase;
mod handshake;
mod serde_util;
mod types;

pub use coinbase::CoinbaseFeed;
pub use handshake::{Handshake, HandshakeFailure, HandshakeState};
pub use types::{ChannelMessage, FeedMessage, Trade, LAST_MATCH, MATCH, SUBSCRIBE, UNSUBSCRIBE};

use crate::ws::WsError;
use async_trait::async_trait;
use thiserror::Error;

/// Feed errors
#[derive(Debug, Error)]
pub enum FeedError {
    /// The transport is not connected: the feed was stopped, not broken
    #[error("feed stopped")]
    Stopped,
    /// Subscribe or unsubscribe handshake did not complete
    #[error("handshake failed: {0}")]
    Handshake(#[from] HandshakeFailure),
    /// Provider sent an error frame while streaming
    #[error("provider error: {message} reason: {reason}")]
    Provider { message: String, reason: String },
    /// Any other transport failure
    #[error("websocket read fail: {0}")]
    Transport(WsError),
    /// Frame did not match the provider's message schema
    #[error("invalid feed message: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<WsError> for FeedError {
    fn from(err: WsError) -> Self {
        match err {
            WsError::NotConnected => FeedError::Stopped,
            other => FeedError::Transport(other),
        }
    }
}

impl FeedError {
    /// True when the feed ended because the transport is gone
    pub fn is_stopped(&self) -> bool {
        matches!(self, FeedError::Stopped)
    }
}

/// Trait for trade feed implementations
#[async_trait]
pub trait TradeFeed: Send {
    /// Connect and complete the subscription handshake
    async fn subscribe(&mut self) -> Result<(), FeedError>;

    /// Wait for the next trade. Returns [`FeedError::Stopped`] once the
    /// transport is no longer connected.
    async fn read(&mut self) -> Result<Trade, FeedError>;

    /// Best-effort unsubscribe followed by disconnect
    async fn turn_off(&mut self) -> Result<(), FeedError>;
}
