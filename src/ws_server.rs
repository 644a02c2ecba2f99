// WebSocket server for communication with host clients.
//
// Reads are forwarded to the event loop as `WsEvent`s; writes come from a
// broadcast channel carrying serialized engine snapshots, so every connected
// client sees the same state stream.

use futures_util::stream::{SplitSink, SplitStream, Stream};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tracing::{info, warn};

/// Events emitted by the WebSocket server to the application layer.
#[derive(Debug, PartialEq)]
pub enum WsEvent {
    /// A new WebSocket client has connected.
    Connected { addr: String },
    /// The current WebSocket client has disconnected.
    Disconnected,
    /// A text message was received from the client (raw JSON string).
    Message(String),
}

/// Run the WebSocket server on the given port.
///
/// Binds a TCP listener on `127.0.0.1:{port}` and accepts one connection at
/// a time. Incoming text frames are forwarded through `tx` as
/// [`WsEvent::Message`]; snapshots published on `updates` are pushed to the
/// connected client. The server runs until the task is cancelled or the
/// event channel closes.
pub async fn run(
    port: u16,
    tx: mpsc::Sender<WsEvent>,
    updates: broadcast::Sender<String>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;
    let local_addr = listener.local_addr()?;
    info!("WebSocket server listening on {local_addr}");

    loop {
        let (stream, addr) = listener.accept().await?;
        let addr_str = addr.to_string();
        info!("Accepted TCP connection from {addr_str}");

        let ws_stream = match tokio_tungstenite::accept_async(stream).await {
            Ok(ws) => ws,
            Err(e) => {
                warn!("WebSocket handshake failed for {addr_str}: {e}");
                continue;
            }
        };

        if tx
            .send(WsEvent::Connected {
                addr: addr_str.clone(),
            })
            .await
            .is_err()
        {
            break;
        }

        let (write, read) = ws_stream.split();
        let writer = tokio::spawn(forward_updates(write, updates.subscribe(), addr_str.clone()));

        let read_result = process_messages(read, &tx, &addr_str).await;
        writer.abort();

        if read_result.is_err() {
            break;
        }
        if tx.send(WsEvent::Disconnected).await.is_err() {
            break;
        }
    }

    Ok(())
}

/// Push broadcast updates to one client's write half until the client drops
/// or the broadcast channel closes. A lagging client skips to the newest
/// snapshot; every snapshot is a full state, so nothing is lost.
async fn forward_updates<S>(
    mut write: SplitSink<WebSocketStream<S>, Message>,
    mut updates: broadcast::Receiver<String>,
    addr: String,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        match updates.recv().await {
            Ok(json) => {
                if write.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("client {addr} lagged, skipped {skipped} updates");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Process incoming WebSocket messages from a read stream, forwarding text
/// messages through `tx`. Returns `Err(())` if the channel is closed
/// (receiver dropped), signalling the caller to stop.
pub async fn process_messages<S>(
    read: SplitStream<WebSocketStream<S>>,
    tx: &mpsc::Sender<WsEvent>,
    addr: &str,
) -> Result<(), ()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    process_message_stream(read, tx, addr).await
}

/// Process raw WebSocket [`Message`] items from any [`Stream`], forwarding
/// text payloads through `tx`. This is a pure-logic function that requires
/// no I/O and is the primary unit-test target.
pub async fn process_message_stream<St>(
    mut stream: St,
    tx: &mpsc::Sender<WsEvent>,
    addr: &str,
) -> Result<(), ()>
where
    St: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    while let Some(msg_result) = stream.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                if tx.send(WsEvent::Message(text.to_string())).await.is_err() {
                    return Err(());
                }
            }
            Ok(Message::Close(_)) => {
                info!("Client {addr} sent close frame");
                break;
            }
            Err(e) => {
                warn!("WebSocket error from {addr}: {e}");
                break;
            }
            _ => {
                // Ignore Binary, Ping, Pong, Frame variants.
            }
        }
    }
    Ok(())
}
