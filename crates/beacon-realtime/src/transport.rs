//! The channel seam and its WebSocket implementation.
//!
//! [`PushTransport`] is what the connection manager drives: one `connect`
//! yields one stream of text frames, delivered through an `mpsc` receiver.
//! The receiver returning `None` is the close signal, whatever the cause.
//! [`WebSocketTransport`] is the production implementation on
//! `tokio-tungstenite`.

use async_trait::async_trait;
use futures::StreamExt;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

/// Channel connect failure.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The endpoint could not be reached or refused the upgrade.
    #[error("failed to open channel to {url}: {message}")]
    Connect {
        /// Endpoint URL.
        url: String,
        /// Underlying failure description.
        message: String,
    },
}

/// One logical push channel.
///
/// Implementations forward inbound text frames verbatim — parsing is the
/// router's job, not the transport's.
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Open the channel.
    ///
    /// On success the receiver yields text frames until the channel
    /// closes, at which point it yields `None`.
    async fn connect(&self) -> Result<mpsc::Receiver<String>, TransportError>;
}

/// Frames buffered per connection before backpressure applies.
const FRAME_BUFFER: usize = 64;

/// `tokio-tungstenite` implementation of [`PushTransport`].
pub struct WebSocketTransport {
    url: String,
}

impl WebSocketTransport {
    /// Create a transport targeting the given `ws://` / `wss://` URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl PushTransport for WebSocketTransport {
    async fn connect(&self) -> Result<mpsc::Receiver<String>, TransportError> {
        let (stream, _response) =
            connect_async(self.url.as_str())
                .await
                .map_err(|error| TransportError::Connect {
                    url: self.url.clone(),
                    message: error.to_string(),
                })?;
        debug!(url = %self.url, "channel open");

        let (tx, rx) = mpsc::channel(FRAME_BUFFER);
        let url = self.url.clone();
        drop(tokio::spawn(async move {
            let (_write, mut read) = stream.split();
            while let Some(frame) = read.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        if tx.send(text.as_str().to_owned()).await.is_err() {
                            // Receiver dropped — the subscriber went away.
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => {
                        debug!(url = %url, "channel closed by server");
                        break;
                    }
                    Ok(_) => {
                        // Binary, ping and pong frames carry no events.
                    }
                    Err(error) => {
                        warn!(url = %url, %error, "channel read failed");
                        break;
                    }
                }
            }
            // Dropping `tx` ends the receiver, which the manager reads
            // as the close signal.
        }));

        Ok(rx)
    }
}
