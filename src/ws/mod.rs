//! WebSocket transport
//!
//! A duplex JSON-message channel with an explicit "not connected" signal.
//! The feed adapters only see the [`Transport`] trait, so tests can script
//! the wire without a network.

mod client;
mod types;

pub use client::WsClient;
pub use types::{WsConfig, WsError};

use async_trait::async_trait;
use serde_json::Value;

/// Connection abstraction consumed by feed adapters
///
/// Only one read or write may be outstanding at a time, which `&mut self`
/// enforces.
#[async_trait]
pub trait Transport: Send {
    /// Open the connection. Connecting an already connected transport is a no-op.
    async fn connect(&mut self, endpoint: &str) -> Result<(), WsError>;

    /// Close the connection. Fails with [`WsError::NotConnected`] if there is none.
    async fn disconnect(&mut self) -> Result<(), WsError>;

    /// Serialize and send one JSON message
    async fn send_json(&mut self, message: &Value) -> Result<(), WsError>;

    /// Wait for the next JSON message
    async fn recv_json(&mut self) -> Result<Value, WsError>;

    /// Whether the transport currently holds an open connection
    fn is_connected(&self) -> bool;
}
