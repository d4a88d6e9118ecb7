//! Trade feed types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message type of a subscribe request
pub const SUBSCRIBE: &str = "subscribe";
/// Message type of an unsubscribe request
pub const UNSUBSCRIBE: &str = "unsubscribe";
/// Message type of a provider error frame
pub const ERROR: &str = "error";
/// Trade execution frame on the matches channel
pub const MATCH: &str = "match";
/// Most recent trade, sent once right after subscribing
pub const LAST_MATCH: &str = "last_match";

/// A single executed trade, normalized from a provider message
///
/// Price and volume stay as the provider's decimal text. They are parsed
/// to floating point by the VWAP engine, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Provider trade id, or a synthetic sequence number
    pub id: i64,
    /// Instrument identifier (e.g., "BTC-USD")
    pub symbol: String,
    /// Trade price as decimal text
    pub price: String,
    /// Trade size as decimal text
    pub volume: String,
    /// Provider the trade came from
    pub provider_name: String,
    /// Quote currency
    pub currency: String,
    /// Exchange timestamp, when the provider supplies one
    pub time: Option<DateTime<Utc>>,
}

/// Wire message of a subscribe/unsubscribe style JSON feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "super::serde_util::decimal_text"
    )]
    pub price: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "super::serde_util::decimal_text"
    )]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<ChannelMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Channel entry of a subscription request or confirmation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub name: String,
    #[serde(default)]
    pub product_ids: Vec<String>,
}

impl FeedMessage {
    /// Build a subscribe/unsubscribe request for a single channel
    pub fn subscription(kind: &str, channel: &str, product_ids: Vec<String>) -> Self {
        Self {
            kind: kind.to_string(),
            channels: vec![ChannelMessage {
                name: channel.to_string(),
                product_ids,
            }],
            ..Default::default()
        }
    }

    /// Whether this frame carries an executed trade
    pub fn is_trade(&self) -> bool {
        self.kind == MATCH || self.kind == LAST_MATCH
    }
}
