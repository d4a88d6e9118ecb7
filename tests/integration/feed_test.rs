//! Integration tests for the Coinbase feed adapter over a scripted transport

use crate::support::{error_frame, heartbeat, match_frame, subscriptions, ScriptedTransport};
use serde_json::json;
use vwap_engine::config::FeedConfig;
use vwap_engine::feed::{CoinbaseFeed, FeedError, HandshakeFailure, Trade, TradeFeed};
use vwap_engine::ws::WsError;

fn feed(transport: ScriptedTransport) -> CoinbaseFeed<ScriptedTransport> {
    CoinbaseFeed::new(FeedConfig::default(), transport)
}

fn feed_with_retries(transport: ScriptedTransport, sub_retries: u32) -> CoinbaseFeed<ScriptedTransport> {
    let config = FeedConfig {
        sub_retries,
        ..FeedConfig::default()
    };
    CoinbaseFeed::new(config, transport)
}

fn trade(id: i64, symbol: &str, price: &str, volume: &str) -> Trade {
    Trade {
        id,
        symbol: symbol.into(),
        price: price.into(),
        volume: volume.into(),
        provider_name: "coinbase.com".into(),
        currency: "USD".into(),
        time: None,
    }
}

#[tokio::test]
async fn test_subscribe_sends_request_and_confirms() {
    let mut feed = feed(ScriptedTransport::with_frames([subscriptions()]));

    feed.subscribe().await.unwrap();

    let transport = feed.transport();
    assert_eq!(transport.endpoints, vec!["wss://ws-feed.exchange.coinbase.com"]);
    assert_eq!(
        transport.sent,
        vec![json!({
            "type": "subscribe",
            "channels": [{"name": "matches", "product_ids": ["BTC-USD", "ETH-USD", "ETH-BTC"]}]
        })]
    );
}

#[tokio::test]
async fn test_subscribe_confirmation_on_kth_attempt() {
    let retries = 5;
    for k in 1..=retries {
        let mut frames: Vec<_> = (1..k).map(|_| heartbeat()).collect();
        frames.push(subscriptions());

        let mut feed = feed_with_retries(ScriptedTransport::with_frames(frames), retries);
        assert!(feed.subscribe().await.is_ok(), "confirmation on attempt {k}");
    }
}

#[tokio::test]
async fn test_subscribe_retries_exceeded() {
    let frames = (0..10).map(|_| heartbeat());
    let mut feed = feed_with_retries(ScriptedTransport::with_frames(frames), 3);

    let err = feed.subscribe().await.unwrap_err();
    assert!(matches!(
        err,
        FeedError::Handshake(HandshakeFailure::RetriesExceeded { attempts: 3, .. })
    ));
    // Exactly R frames were consumed
    assert_eq!(feed.transport().inbound.len(), 7);
}

#[tokio::test]
async fn test_subscribe_error_frame_fails_immediately() {
    let frames = [
        heartbeat(),
        error_frame("Failed to subscribe", "FOO-BAR is not a valid product"),
        subscriptions(),
    ];
    let mut feed = feed_with_retries(ScriptedTransport::with_frames(frames), 30);

    let err = feed.subscribe().await.unwrap_err();
    match err {
        FeedError::Handshake(HandshakeFailure::Rejected { message, reason }) => {
            assert_eq!(message, "Failed to subscribe");
            assert_eq!(reason, "FOO-BAR is not a valid product");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(feed.transport().inbound.len(), 1);
}

#[tokio::test]
async fn test_subscribe_connect_failure() {
    let mut transport = ScriptedTransport::default();
    transport.refuse_connect = true;
    let mut feed = feed(transport);

    let err = feed.subscribe().await.unwrap_err();
    assert!(matches!(err, FeedError::Transport(WsError::ConnectionFailed(_))));
    assert!(feed.transport().sent.is_empty());
}

#[tokio::test]
async fn test_subscribe_server_hangs_up_during_handshake() {
    let mut feed = feed(ScriptedTransport::with_frames([heartbeat()]));
    let err = feed.subscribe().await.unwrap_err();
    assert!(err.is_stopped());
}

#[tokio::test]
async fn test_read_normalizes_trades_and_skips_control_frames() {
    let t = trade(10, "BTC-USD", "46140.63", "0.001");
    let frames = [subscriptions(), heartbeat(), match_frame(&t)];
    let mut feed = feed(ScriptedTransport::with_frames(frames));
    feed.subscribe().await.unwrap();

    let got = feed.read().await.unwrap();
    assert_eq!(got.id, 10);
    assert_eq!(got.symbol, "BTC-USD");
    assert_eq!(got.price, "46140.63");
    assert_eq!(got.volume, "0.001");
    assert_eq!(got.provider_name, "coinbase.com");
    assert_eq!(got.currency, "USD");
    assert!(got.time.is_some());
}

#[tokio::test]
async fn test_read_last_match_is_a_trade() {
    let mut feed = feed_after_subscribe(vec![json!({
        "type": "last_match",
        "trade_id": 1,
        "product_id": "ETH-BTC",
        "price": "0.08239",
        "size": "0.00677159"
    })])
    .await;
    let got = feed.read().await.unwrap();
    assert_eq!(got.symbol, "ETH-BTC");
    assert_eq!(got.volume, "0.00677159");
}

async fn feed_after_subscribe(frames: Vec<serde_json::Value>) -> CoinbaseFeed<ScriptedTransport> {
    let mut transport = ScriptedTransport::with_frames([subscriptions()]);
    transport.inbound.extend(frames.into_iter().map(Ok));
    let mut feed = feed(transport);
    feed.subscribe().await.unwrap();
    feed
}

#[tokio::test]
async fn test_read_not_connected_is_stopped() {
    let mut feed = feed_after_subscribe(vec![]).await;
    let err = feed.read().await.unwrap_err();
    assert!(err.is_stopped());
}

#[tokio::test]
async fn test_read_transport_failure_is_not_stopped() {
    let mut transport = ScriptedTransport::with_frames([subscriptions()]);
    transport.push_error(WsError::ReadFailed("connection reset by peer".into()));
    let mut feed = feed(transport);
    feed.subscribe().await.unwrap();

    let err = feed.read().await.unwrap_err();
    assert!(matches!(err, FeedError::Transport(WsError::ReadFailed(_))));
}

#[tokio::test]
async fn test_read_provider_error_frame() {
    let mut feed = feed_after_subscribe(vec![error_frame("rate limited", "too many requests")]).await;
    let err = feed.read().await.unwrap_err();
    assert!(matches!(err, FeedError::Provider { .. }));
}

#[tokio::test]
async fn test_read_malformed_numbers_stay_text() {
    let mut feed = feed_after_subscribe(vec![match_frame(&trade(
        32,
        "BTC-USD",
        "69897.48",
        "0..0715337",
    ))])
    .await;
    let got = feed.read().await.unwrap();
    assert_eq!(got.volume, "0..0715337");
}

#[tokio::test]
async fn test_turn_off_unsubscribes_then_disconnects() {
    let mut feed = feed_after_subscribe(vec![subscriptions()]).await;

    feed.turn_off().await.unwrap();

    let transport = feed.transport();
    assert_eq!(
        transport.sent.last().unwrap(),
        &json!({"type": "unsubscribe", "channels": [{"name": "matches", "product_ids": []}]})
    );
    assert_eq!(transport.disconnects, 1);
    assert!(!transport.connected);
}

#[tokio::test]
async fn test_turn_off_disconnects_even_if_unsubscribe_fails() {
    let mut feed = feed_after_subscribe(vec![error_frame("Failed to unsubscribe", "unknown channel")]).await;

    let err = feed.turn_off().await.unwrap_err();
    assert!(matches!(
        err,
        FeedError::Handshake(HandshakeFailure::Rejected { .. })
    ));
    assert_eq!(feed.transport().disconnects, 1);
}

#[tokio::test]
async fn test_turn_off_skips_disconnect_when_not_connected() {
    let mut feed = feed_after_subscribe(vec![]).await;
    assert!(feed.read().await.unwrap_err().is_stopped());

    feed.turn_off().await.unwrap();
    assert_eq!(feed.transport().disconnects, 0);
    // Only the subscribe request went out
    assert_eq!(feed.transport().sent.len(), 1);
}
