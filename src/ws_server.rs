// WebSocket server for the draft client.
//
// Accepts one client at a time on localhost. Incoming text frames are
// forwarded to the app loop as events; the app replies through a
// per-connection outbound channel that a writer task drains into the socket.

use futures_util::stream::{SplitStream, Stream};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use tracing::{info, warn};

/// Events emitted by the WebSocket server to the application layer.
#[derive(Debug)]
pub enum WsEvent {
    /// A new client has connected. `reply` carries outbound JSON back to it.
    Connected {
        addr: String,
        reply: mpsc::Sender<String>,
    },
    /// The current client has disconnected.
    Disconnected,
    /// A text message was received from the client (raw JSON string).
    Message(String),
}

/// Run the WebSocket server on the given port, forwarding events through `tx`.
///
/// Binds a TCP listener on `127.0.0.1:{port}` and accepts one connection at
/// a time. For each connection it performs the WebSocket handshake, spawns a
/// writer task that drains the reply channel into the socket, then reads
/// text messages and forwards them as [`WsEvent::Message`]. The server runs
/// forever (until the task is cancelled or the process exits).
pub async fn run(port: u16, tx: mpsc::Sender<WsEvent>) -> anyhow::Result<()> {
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

        let (mut write, read) = ws_stream.split();
        let (reply_tx, mut reply_rx) = mpsc::channel::<String>(256);

        let writer_addr = addr_str.clone();
        let writer = tokio::spawn(async move {
            while let Some(json) = reply_rx.recv().await {
                if let Err(e) = write.send(Message::Text(json.into())).await {
                    warn!("failed to send to {writer_addr}: {e}");
                    break;
                }
            }
        });

        if tx
            .send(WsEvent::Connected {
                addr: addr_str.clone(),
                reply: reply_tx,
            })
            .await
            .is_err()
        {
            writer.abort();
            break;
        }

        let reader_result = process_messages(read, &tx, &addr_str).await;
        writer.abort();
        if reader_result.is_err() {
            break;
        }

        if tx.send(WsEvent::Disconnected).await.is_err() {
            break;
        }
    }

    Ok(())
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
