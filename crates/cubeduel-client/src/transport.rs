//! WebSocket transport for the client.
//!
//! Provides [`ConnectedClient`] which handles WebSocket I/O for text frames.
//! This is a thin layer that just sends/receives frames - protocol logic
//! remains in the Sans-IO [`crate::Client`].

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::{net::TcpStream, sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};
use url::Url;

/// Capacity of the frame channels in each direction.
const CHANNEL_CAPACITY: usize = 32;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server URL is not a `ws://` or `wss://` URL.
    #[error("invalid server url {url}: {reason}")]
    InvalidUrl {
        /// URL as given.
        url: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),
}

/// Something the connection task observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A text frame arrived.
    Text(String),
    /// The socket reported an error. The connection may still be usable.
    Error(String),
    /// The socket closed. No further events follow.
    Closed,
}

/// Handle to a connected client with WebSocket transport.
///
/// Provides channels for frame transport. Frames are sent/received via
/// the channels, and an internal task handles the socket I/O.
pub struct ConnectedClient {
    /// Send text frames to the server.
    pub to_server: mpsc::Sender<String>,
    /// Receive transport events.
    pub from_server: mpsc::Receiver<TransportEvent>,
    /// The connection task.
    task: JoinHandle<()>,
}

impl ConnectedClient {
    /// Stop the connection.
    ///
    /// Dropping the outgoing channel makes the connection task send a close
    /// frame and end. The returned handle resolves once it has.
    pub fn stop(self) -> JoinHandle<()> {
        let Self { to_server, from_server, task } = self;
        drop(to_server);
        drop(from_server);
        task
    }
}

/// Check that `server` is a WebSocket URL.
pub fn parse_server_url(server: &str) -> Result<Url, TransportError> {
    let url = Url::parse(server)
        .map_err(|e| TransportError::InvalidUrl { url: server.to_string(), reason: e.to_string() })?;

    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(TransportError::InvalidUrl {
            url: server.to_string(),
            reason: format!("unsupported scheme {other}"),
        }),
    }
}

/// Connect to a CubeDuel server.
///
/// Resolves once the WebSocket handshake has completed, so the connection
/// is open when this returns.
pub async fn connect(server: &str) -> Result<ConnectedClient, TransportError> {
    let url = parse_server_url(server)?;

    let (ws, _response) = tokio_tungstenite::connect_async(url.as_str())
        .await
        .map_err(|e| TransportError::Connection(e.to_string()))?;
    tracing::info!(%url, "websocket connected");

    let (to_server_tx, to_server_rx) = mpsc::channel::<String>(CHANNEL_CAPACITY);
    let (from_server_tx, from_server_rx) = mpsc::channel::<TransportEvent>(CHANNEL_CAPACITY);

    let task = tokio::spawn(run_connection(ws, to_server_rx, from_server_tx));

    Ok(ConnectedClient { to_server: to_server_tx, from_server: from_server_rx, task })
}

/// Run the connection, bridging between channels and the socket.
///
/// Ends when the socket closes or the outgoing channel is dropped; in the
/// latter case a close frame is sent first.
async fn run_connection(
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    mut to_server: mpsc::Receiver<String>,
    from_server: mpsc::Sender<TransportEvent>,
) {
    let (mut write, mut read) = ws.split();

    loop {
        tokio::select! {
            outgoing = to_server.recv() => match outgoing {
                Some(text) => {
                    if let Err(e) = write.send(Message::Text(text.into())).await {
                        tracing::warn!(error = %e, "websocket send failed");
                        if from_server.send(TransportEvent::Error(e.to_string())).await.is_err() {
                            break;
                        }
                    }
                },
                None => {
                    if let Err(e) = write.send(Message::Close(None)).await {
                        tracing::debug!(error = %e, "close frame not sent");
                    }
                    break;
                },
            },
            incoming = read.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    if from_server.send(TransportEvent::Text(text.as_str().to_string())).await.is_err() {
                        break;
                    }
                },
                Some(Ok(Message::Binary(bytes))) => {
                    let event = match String::from_utf8(bytes.to_vec()) {
                        Ok(text) => TransportEvent::Text(text),
                        Err(e) => TransportEvent::Error(format!("non-utf8 binary frame: {e}")),
                    };
                    if from_server.send(event).await.is_err() {
                        break;
                    }
                },
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!(?frame, "websocket closed by server");
                    let _ = from_server.send(TransportEvent::Closed).await;
                    break;
                },
                Some(Ok(_)) => {},
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "websocket receive failed");
                    let _ = from_server.send(TransportEvent::Error(e.to_string())).await;
                    let _ = from_server.send(TransportEvent::Closed).await;
                    break;
                },
                None => {
                    let _ = from_server.send(TransportEvent::Closed).await;
                    break;
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_websocket_urls() {
        assert!(parse_server_url("ws://localhost:8083/ws").is_ok());
        assert!(parse_server_url("wss://example.com/ws").is_ok());
    }

    #[test]
    fn rejects_other_urls() {
        assert!(matches!(
            parse_server_url("http://localhost:8083/ws"),
            Err(TransportError::InvalidUrl { .. })
        ));
        assert!(matches!(parse_server_url("not a url"), Err(TransportError::InvalidUrl { .. })));
    }
}
