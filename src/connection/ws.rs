use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use tokio_tungstenite::tungstenite;
use tracing::{debug, info};

use super::{FeedStream, FeedTransport};

/// WebSocket transport for the live feed
pub struct WsTransport {
    url: String,
}

impl WsTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Transport for the feed endpoint of the HTTP service at `base_url`.
    ///
    /// The feed lives on the same host and port as the hosting HTTP service,
    /// with the scheme upgraded: `http` to `ws`, `https` to `wss`.
    pub fn from_http_base(base_url: &str, ws_path: &str) -> Result<Self> {
        Ok(Self::new(feed_url(base_url, ws_path)?))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Derive the feed URL from an HTTP base URL by scheme upgrade
pub fn feed_url(base_url: &str, ws_path: &str) -> Result<String> {
    let (scheme, rest) = if let Some(rest) = base_url.strip_prefix("https://") {
        ("wss", rest)
    } else if let Some(rest) = base_url.strip_prefix("http://") {
        ("ws", rest)
    } else {
        bail!("Unsupported base URL scheme: {}", base_url);
    };
    Ok(format!("{}://{}{}", scheme, rest.trim_end_matches('/'), ws_path))
}

#[async_trait]
impl FeedTransport for WsTransport {
    type Stream = WsFeedStream;

    async fn dial(&mut self) -> Result<Self::Stream> {
        info!(url = %self.url, "Dialing feed");
        let (stream, _) = tokio_tungstenite::connect_async(self.url.as_str())
            .await
            .context("WebSocket connect failed")?;
        Ok(WsFeedStream { inner: stream })
    }
}

/// One established WebSocket feed connection
pub struct WsFeedStream {
    inner: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
}

#[async_trait]
impl FeedStream for WsFeedStream {
    async fn next_message(&mut self) -> Option<Result<String>> {
        loop {
            match self.inner.next().await? {
                Ok(tungstenite::Message::Text(text)) => return Some(Ok(text.to_string())),
                Ok(tungstenite::Message::Close(_)) => return None,
                Ok(_) => {
                    // Ping/pong is handled by tungstenite; binary is ignored
                    debug!("Ignoring non-text frame");
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
