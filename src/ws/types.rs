//! WebSocket types and configuration

use std::time::Duration;
use thiserror::Error;

/// WebSocket transport configuration
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// Maximum time to wait for the opening handshake
    pub connect_timeout: Duration,
    /// Maximum time a single read may wait for a frame (None = wait forever)
    pub read_timeout: Option<Duration>,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: None,
        }
    }
}

impl WsConfig {
    /// Create a config with default timeouts
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connect timeout
    pub fn connect_timeout(mut self, d: Duration) -> Self {
        self.connect_timeout = d;
        self
    }

    /// Bound every read by `d`. A zero duration disables the deadline.
    pub fn read_timeout(mut self, d: Duration) -> Self {
        self.read_timeout = (!d.is_zero()).then_some(d);
        self
    }
}

/// WebSocket errors
#[derive(Debug, Error)]
pub enum WsError {
    /// Read or write attempted before connect or after disconnect
    #[error("websocket service stopped")]
    NotConnected,
    /// Connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// Send failed
    #[error("Send failed: {0}")]
    SendFailed(String),
    /// Read failed
    #[error("Read failed: {0}")]
    ReadFailed(String),
    /// No frame arrived before the read deadline
    #[error("no message received within {0:?}")]
    Timeout(Duration),
    /// Frame was not valid JSON
    #[error("invalid JSON frame: {0}")]
    Decode(#[from] serde_json::Error),
}

impl WsError {
    /// True for the distinguished "not connected" condition
    pub fn is_not_connected(&self) -> bool {
        matches!(self, WsError::NotConnected)
    }
}
