//! vwap-engine: sliding-window VWAP over a live exchange trade feed
//!
//! This library provides the core components for:
//! - WebSocket transport with an explicit "not connected" signal
//! - Coinbase `matches` feed with subscribe/unsubscribe handshakes
//! - Per-symbol sliding-window VWAP aggregation
//! - Session orchestration with cooperative cancellation
//! - Logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod engine;
pub mod feed;
pub mod session;
pub mod telemetry;
pub mod ws;
