//! WebSocket client over tokio-tungstenite

use super::types::{WsConfig, WsError};
use super::Transport;
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Request/response style WebSocket client
///
/// Unlike a background streaming task, every read is driven by the caller,
/// so frames are delivered strictly in arrival order and nothing is read
/// ahead of the consumer.
pub struct WsClient {
    config: WsConfig,
    stream: Option<WsStream>,
    endpoint: Option<String>,
}

impl WsClient {
    /// Create a new, disconnected client
    pub fn new(config: WsConfig) -> Self {
        Self {
            config,
            stream: None,
            endpoint: None,
        }
    }

    /// Endpoint of the current (or last) connection
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    async fn next_frame(&mut self) -> Result<Option<Result<Message, String>>, WsError> {
        let read_timeout = self.config.read_timeout;
        let stream = self.stream.as_mut().ok_or(WsError::NotConnected)?;

        let frame = match read_timeout {
            Some(deadline) => timeout(deadline, stream.next())
                .await
                .map_err(|_| WsError::Timeout(deadline))?,
            None => stream.next().await,
        };

        Ok(frame.map(|r| r.map_err(|e| e.to_string())))
    }
}

impl Default for WsClient {
    fn default() -> Self {
        Self::new(WsConfig::default())
    }
}

#[async_trait]
impl Transport for WsClient {
    async fn connect(&mut self, endpoint: &str) -> Result<(), WsError> {
        if self.stream.is_some() {
            return Ok(());
        }

        tracing::info!(url = %endpoint, "Connecting to WebSocket");

        let (stream, _response) = timeout(self.config.connect_timeout, connect_async(endpoint))
            .await
            .map_err(|_| {
                WsError::ConnectionFailed(format!(
                    "timed out after {:?}",
                    self.config.connect_timeout
                ))
            })?
            .map_err(|e| WsError::ConnectionFailed(e.to_string()))?;

        tracing::info!("WebSocket connected");

        self.stream = Some(stream);
        self.endpoint = Some(endpoint.to_string());
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<(), WsError> {
        let mut stream = self.stream.take().ok_or(WsError::NotConnected)?;
        stream
            .close(None)
            .await
            .map_err(|e| WsError::SendFailed(e.to_string()))?;
        tracing::info!("WebSocket disconnected");
        Ok(())
    }

    async fn send_json(&mut self, message: &Value) -> Result<(), WsError> {
        let stream = self.stream.as_mut().ok_or(WsError::NotConnected)?;
        let text = serde_json::to_string(message)?;
        stream
            .send(Message::Text(text))
            .await
            .map_err(|e| WsError::SendFailed(e.to_string()))
    }

    async fn recv_json(&mut self) -> Result<Value, WsError> {
        loop {
            match self.next_frame().await? {
                Some(Ok(Message::Text(text))) => return Ok(serde_json::from_str(&text)?),
                Some(Ok(Message::Binary(data))) => return Ok(serde_json::from_slice(&data)?),
                Some(Ok(Message::Ping(data))) => {
                    let stream = self.stream.as_mut().ok_or(WsError::NotConnected)?;
                    stream
                        .send(Message::Pong(data))
                        .await
                        .map_err(|e| WsError::SendFailed(e.to_string()))?;
                }
                Some(Ok(Message::Close(_))) => {
                    tracing::info!("Received close frame");
                    self.stream = None;
                    return Err(WsError::NotConnected);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(WsError::ReadFailed(e)),
                None => {
                    tracing::warn!("WebSocket stream ended");
                    self.stream = None;
                    return Err(WsError::NotConnected);
                }
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}
