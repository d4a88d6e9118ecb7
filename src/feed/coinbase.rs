//! Coinbase Exchange WebSocket trade feed
//!
//! Subscribes to the `matches` channel and turns every `match` /
//! `last_match` frame into a [`Trade`].

use super::handshake::Handshake;
use super::types::{FeedMessage, Trade, ERROR, SUBSCRIBE, UNSUBSCRIBE};
use super::{FeedError, TradeFeed};
use crate::config::FeedConfig;
use crate::ws::{Transport, WsError};
use async_trait::async_trait;

/// Coinbase feed over any [`Transport`]
pub struct CoinbaseFeed<T> {
    config: FeedConfig,
    transport: T,
    verbose: bool,
    /// Fallback ids for frames without a `trade_id`
    next_synthetic_id: i64,
}

impl<T: Transport> CoinbaseFeed<T> {
    /// Create a feed that will speak to `config.endpoint` through `transport`
    pub fn new(config: FeedConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            verbose: false,
            next_synthetic_id: 0,
        }
    }

    /// Log successful handshakes
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a subscription request and wait for the provider's confirmation
    async fn write_and_wait(&mut self, request: &FeedMessage) -> Result<(), FeedError> {
        let value = serde_json::to_value(request)?;
        self.transport.send_json(&value).await?;
        self.wait_confirmation(&request.kind).await
    }

    async fn wait_confirmation(&mut self, op: &str) -> Result<(), FeedError> {
        let mut handshake = Handshake::new(
            op,
            &self.config.channel_name,
            &self.config.confirmation_type,
            self.config.sub_retries,
        );

        while handshake.is_waiting() {
            let parsed = match self.transport.recv_json().await {
                Ok(value) => serde_json::from_value::<FeedMessage>(value),
                // Not JSON at all: counts as an attempt like any other stray frame
                Err(WsError::Decode(e)) => Err(e),
                Err(e) => return Err(e.into()),
            };
            let msg = parsed.unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Unrecognized frame during handshake");
                FeedMessage::default()
            });
            handshake.observe(&msg);
        }

        handshake.into_result()?;
        if self.verbose {
            tracing::info!(op, channel = %self.config.channel_name, "successful {}", op);
        }
        Ok(())
    }

    /// Normalize a trade frame. Frames without a product id are dropped.
    fn to_trade(&mut self, msg: FeedMessage) -> Option<Trade> {
        let symbol = msg.product_id.filter(|s| !s.is_empty())?;
        let id = match msg.trade_id {
            Some(id) => id,
            None => {
                self.next_synthetic_id += 1;
                self.next_synthetic_id
            }
        };

        Some(Trade {
            id,
            symbol,
            price: msg.price.unwrap_or_default(),
            volume: msg.size.unwrap_or_default(),
            provider_name: self.config.provider_name.clone(),
            currency: self.config.currency.clone(),
            time: msg.time,
        })
    }
}

#[async_trait]
impl<T: Transport> TradeFeed for CoinbaseFeed<T> {
    async fn subscribe(&mut self) -> Result<(), FeedError> {
        if let Err(e) = self.transport.connect(&self.config.endpoint).await {
            tracing::error!(
                endpoint = %self.config.endpoint,
                error = %e,
                "fail to connect into websocket"
            );
            return Err(e.into());
        }

        let request = FeedMessage::subscription(
            SUBSCRIBE,
            &self.config.channel_name,
            self.config.pairs.clone(),
        );

        if let Err(e) = self.write_and_wait(&request).await {
            tracing::error!(
                endpoint = %self.config.endpoint,
                channel = %self.config.channel_name,
                max_attempts = self.config.sub_retries,
                error = %e,
                "fail to subscribe channel"
            );
            return Err(e);
        }

        tracing::info!(
            channel = %self.config.channel_name,
            pairs = ?self.config.pairs,
            "Subscribed to {} feed",
            self.config.provider_name
        );
        Ok(())
    }

    async fn read(&mut self) -> Result<Trade, FeedError> {
        loop {
            let value = match self.transport.recv_json().await {
                Ok(value) => value,
                Err(e) if e.is_not_connected() => {
                    tracing::info!("websocket stopped");
                    return Err(FeedError::Stopped);
                }
                Err(e) => {
                    tracing::error!(
                        endpoint = %self.config.endpoint,
                        channel = %self.config.channel_name,
                        error = %e,
                        "websocket read fail"
                    );
                    return Err(e.into());
                }
            };

            let msg: FeedMessage = match serde_json::from_value(value) {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!(
                        endpoint = %self.config.endpoint,
                        channel = %self.config.channel_name,
                        error = %e,
                        "invalid feed message"
                    );
                    return Err(e.into());
                }
            };

            if msg.is_trade() {
                let kind = msg.kind.clone();
                match self.to_trade(msg) {
                    Some(trade) => return Ok(trade),
                    None => tracing::warn!(kind = %kind, "Dropping trade frame without product_id"),
                }
            } else if msg.kind == ERROR {
                tracing::error!(
                    endpoint = %self.config.endpoint,
                    channel = %self.config.channel_name,
                    message = msg.message.as_deref().unwrap_or_default(),
                    reason = msg.reason.as_deref().unwrap_or_default(),
                    "provider error on feed"
                );
                return Err(FeedError::Provider {
                    message: msg.message.unwrap_or_default(),
                    reason: msg.reason.unwrap_or_default(),
                });
            } else {
                tracing::trace!(kind = %msg.kind, "Skipping non-trade frame");
            }
        }
    }

    async fn turn_off(&mut self) -> Result<(), FeedError> {
        if !self.transport.is_connected() {
            tracing::debug!("Transport already disconnected, nothing to turn off");
            return Ok(());
        }

        let request = FeedMessage::subscription(UNSUBSCRIBE, &self.config.channel_name, vec![]);
        let unsubscribed = self.write_and_wait(&request).await;
        if let Err(e) = &unsubscribed {
            tracing::warn!(
                channel = %self.config.channel_name,
                error = %e,
                "error to unsubscribe channel"
            );
        }

        if self.transport.is_connected() {
            if let Err(e) = self.transport.disconnect().await {
                tracing::error!(
                    endpoint = %self.config.endpoint,
                    error = %e,
                    "fail to disconnect from websocket"
                );
                return Err(e.into());
            }
        }

        unsubscribed
    }
}
