//! Shared helpers: an in-memory transport and the trade fixture

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use vwap_engine::feed::Trade;
use vwap_engine::ws::{Transport, WsError};

/// Transport that replays scripted inbound frames and records outbound ones.
/// Once the script runs out the "server" hangs up.
#[derive(Default)]
pub struct ScriptedTransport {
    pub connected: bool,
    pub inbound: VecDeque<Result<Value, WsError>>,
    pub sent: Vec<Value>,
    pub endpoints: Vec<String>,
    pub disconnects: usize,
    pub refuse_connect: bool,
}

impl ScriptedTransport {
    pub fn with_frames(frames: impl IntoIterator<Item = Value>) -> Self {
        Self {
            inbound: frames.into_iter().map(Ok).collect(),
            ..Default::default()
        }
    }

    pub fn push_error(&mut self, err: WsError) {
        self.inbound.push_back(Err(err));
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn connect(&mut self, endpoint: &str) -> Result<(), WsError> {
        if self.refuse_connect {
            return Err(WsError::ConnectionFailed("connection refused".into()));
        }
        self.endpoints.push(endpoint.to_string());
        self.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), WsError> {
        if !self.connected {
            return Err(WsError::NotConnected);
        }
        self.connected = false;
        self.disconnects += 1;
        Ok(())
    }

    async fn send_json(&mut self, message: &Value) -> Result<(), WsError> {
        if !self.connected {
            return Err(WsError::NotConnected);
        }
        self.sent.push(message.clone());
        Ok(())
    }

    async fn recv_json(&mut self) -> Result<Value, WsError> {
        if !self.connected {
            return Err(WsError::NotConnected);
        }
        match self.inbound.pop_front() {
            Some(frame) => frame,
            None => {
                self.connected = false;
                Err(WsError::NotConnected)
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

pub fn subscriptions() -> Value {
    json!({
        "type": "subscriptions",
        "channels": [{"name": "matches", "product_ids": ["BTC-USD", "ETH-USD", "ETH-BTC"]}]
    })
}

pub fn heartbeat() -> Value {
    json!({"type": "heartbeat", "sequence": 90, "last_trade_id": 20})
}

pub fn error_frame(message: &str, reason: &str) -> Value {
    json!({"type": "error", "message": message, "reason": reason})
}

pub fn match_frame(trade: &Trade) -> Value {
    json!({
        "type": "match",
        "trade_id": trade.id,
        "sequence": trade.id * 10,
        "product_id": trade.symbol,
        "price": trade.price,
        "size": trade.volume,
        "side": "buy",
        "time": "2021-11-05T14:03:17.512438Z"
    })
}

/// Recorded Coinbase trades, in arrival order. Trade 32 carries a malformed size.
pub fn fixture_trades() -> Vec<Trade> {
    [
        (1, "ETH-USD", "3801.13", "11.15505557"),
        (2, "ETH-USD", "3801.24", "2.105034"),
        (3, "ETH-USD", "3801.33", "0.02778985"),
        (4, "ETH-USD", "3801.42", "1.11722945"),
        (5, "ETH-USD", "3801.68", "0.50999715"),
        (6, "BTC-USD", "46140.63", "0.001"),
        (7, "BTC-USD", "46140.63", "0.00195483"),
        (8, "BTC-USD", "46142.19", "0.0021002"),
        (9, "ETH-USD", "3802.1", "0.17887"),
        (10, "BTC-USD", "46144.06", "0.001"),
        (11, "BTC-USD", "46144.06", "0.004415"),
        (12, "BTC-USD", "46144.07", "0.0109"),
        (13, "BTC-USD", "46144.39", "0.00368336"),
        (14, "ETH-BTC", "0.08239", "0.00677159"),
        (15, "ETH-USD", "3801.59", "0.5"),
        (16, "ETH-USD", "3801.61", "1.13342666"),
        (17, "ETH-USD", "3801.65", "3"),
        (18, "ETH-USD", "3801.68", "0.38"),
        (19, "ETH-USD", "3784.03", "0.00101725"),
        (20, "BTC-USD", "69889.02", "0.01599"),
        (21, "BTC-USD", "69891.71", "0.01548"),
        (22, "BTC-USD", "69891.81", "0.00117477"),
        (23, "BTC-USD", "69892.10", "0.00131033"),
        (24, "ETH-USD", "3784.18", "0.00050798"),
        (25, "BTC-USD", "69893.38", "0.01323"),
        (26, "BTC-USD", "69893.38", "0.0000143"),
        (27, "ETH-USD", "3784.36", "0.07900209"),
        (28, "BTC-USD", "69894.11", "0.01543728"),
        (29, "ETH-USD", "3784.39", "0.11510333"),
        (30, "ETH-USD", "3784.39", "0.00005285"),
        (31, "BTC-USD", "69897.48", "0.0715337"),
        (32, "BTC-USD", "69897.48", "0..0715337"),
        (33, "BTC-USD", "69897.48", "0.0715337"),
    ]
    .into_iter()
    .map(|(id, symbol, price, volume)| Trade {
        id,
        symbol: symbol.to_string(),
        price: price.to_string(),
        volume: volume.to_string(),
        provider_name: "mock".to_string(),
        currency: "USD".to_string(),
        time: None,
    })
    .collect()
}

pub fn fixture_for(symbol: &str) -> Vec<Trade> {
    fixture_trades()
        .into_iter()
        .filter(|t| t.symbol == symbol)
        .collect()
}

pub fn assert_close(got: f64, want: f64) {
    let tolerance = 1e-10 * want.abs().max(1.0);
    assert!((got - want).abs() < tolerance, "got {got}, want {want}");
}
