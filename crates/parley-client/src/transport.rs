//! WebSocket channels on top of tokio-tungstenite.
//!
//! Every channel runs in its own tokio task. The [`WsChannel`] handle feeds
//! it commands; the task reports back through the shared event queue. This
//! keeps the session loop free of any awaiting on the socket.

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
use tracing::{debug, info, warn};
use url::Url;

use parley_shared::ChannelError;

use crate::channel::{Channel, Connector};
use crate::events::{ChannelEvent, ChannelEventKind, ChannelId, EventSender};

/// Commands sent *into* a channel task.
#[derive(Debug)]
enum ChannelCommand {
    /// Send one text frame.
    Send(String),
    /// Start the closing handshake.
    Close,
}

/// Opens WebSocket channels that report to one event queue.
#[derive(Debug, Clone)]
pub struct WsConnector {
    events: EventSender,
}

impl WsConnector {
    pub fn new(events: EventSender) -> Self {
        Self { events }
    }
}

impl Connector for WsConnector {
    type Channel = WsChannel;

    /// Spawn the channel task. Must be called from within a tokio runtime.
    fn open(&mut self, id: ChannelId, endpoint: &Url) -> WsChannel {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_channel(id, endpoint.clone(), cmd_rx, self.events.clone()));
        WsChannel { id, commands: cmd_tx }
    }
}

/// Handle to a channel task. Dropping it closes the channel.
#[derive(Debug)]
pub struct WsChannel {
    id: ChannelId,
    commands: mpsc::UnboundedSender<ChannelCommand>,
}

impl Channel for WsChannel {
    fn send_text(&mut self, text: &str) -> Result<(), ChannelError> {
        self.commands
            .send(ChannelCommand::Send(text.to_string()))
            .map_err(|_| ChannelError::Closed)
    }

    fn close(&mut self) {
        if self.commands.send(ChannelCommand::Close).is_err() {
            debug!(channel = %self.id, "Close requested on finished channel");
        }
    }
}

async fn emit(events: &EventSender, id: ChannelId, kind: ChannelEventKind) {
    if events.send(ChannelEvent::new(id, kind)).await.is_err() {
        debug!(channel = %id, "Event queue closed, dropping channel event");
    }
}

/// Resolves once the handle asks for closure or is dropped.
async fn close_requested(commands: &mut mpsc::UnboundedReceiver<ChannelCommand>) {
    loop {
        match commands.recv().await {
            Some(ChannelCommand::Close) | None => return,
            Some(ChannelCommand::Send(_)) => {
                debug!("Dropping frame queued before the channel opened");
            }
        }
    }
}

/// Channel task: connect, pump frames both ways, and always finish with
/// exactly one `Closed` event.
async fn run_channel(
    id: ChannelId,
    endpoint: Url,
    mut commands: mpsc::UnboundedReceiver<ChannelCommand>,
    events: EventSender,
) {
    let ws = tokio::select! {
        result = connect_async(endpoint.as_str()) => match result {
            Ok((ws, _response)) => ws,
            Err(e) => {
                warn!(channel = %id, endpoint = %endpoint, error = %e, "Connection failed");
                emit(&events, id, ChannelEventKind::Error(e.to_string())).await;
                emit(&events, id, ChannelEventKind::Closed).await;
                return;
            }
        },
        _ = close_requested(&mut commands) => {
            info!(channel = %id, "Channel closed before it opened");
            emit(&events, id, ChannelEventKind::Closed).await;
            return;
        }
    };

    info!(channel = %id, endpoint = %endpoint, "WebSocket connected");
    emit(&events, id, ChannelEventKind::Opened).await;

    let (mut sink, mut stream) = ws.split();
    let mut closing = false;

    loop {
        tokio::select! {
            cmd = commands.recv(), if !closing => match cmd {
                Some(ChannelCommand::Send(text)) => {
                    if let Err(e) = sink.send(WsMessage::Text(text)).await {
                        warn!(channel = %id, error = %e, "Send failed");
                        emit(&events, id, ChannelEventKind::Error(e.to_string())).await;
                        break;
                    }
                }
                Some(ChannelCommand::Close) | None => {
                    debug!(channel = %id, "Starting closing handshake");
                    closing = true;
                    if let Err(e) = sink.send(WsMessage::Close(None)).await {
                        debug!(channel = %id, error = %e, "Close frame not sent");
                        break;
                    }
                }
            },

            frame = stream.next() => match frame {
                Some(Ok(WsMessage::Text(text))) => {
                    emit(&events, id, ChannelEventKind::Message(text)).await;
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    debug!(channel = %id, frame = ?frame, "Close frame received");
                    break;
                }
                // Binary, ping and pong frames carry no chat content.
                Some(Ok(_)) => {}
                Some(Err(WsError::ConnectionClosed)) | None => break,
                Some(Err(e)) => {
                    warn!(channel = %id, error = %e, "Receive failed");
                    emit(&events, id, ChannelEventKind::Error(e.to_string())).await;
                    break;
                }
            },
        }
    }

    if let Err(e) = sink.close().await {
        debug!(channel = %id, error = %e, "Socket already closed");
    }
    info!(channel = %id, "WebSocket closed");
    emit(&events, id, ChannelEventKind::Closed).await;
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::time::Duration;

    use serde_json::json;
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::oneshot;
    use tokio_tungstenite::WebSocketStream;

    use parley_shared::protocol::InboundMessage;

    use super::*;
    use crate::events::{event_queue, EventReceiver};

    async fn next_event(events: &mut EventReceiver) -> ChannelEvent {
        tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("timed out waiting for channel event")
            .expect("event queue closed")
    }

    async fn wait_for_close(events: &mut EventReceiver, id: ChannelId) {
        loop {
            let event = next_event(events).await;
            assert_eq!(event.channel, id);
            if event.kind == ChannelEventKind::Closed {
                return;
            }
        }
    }

    /// Loopback server that accepts one WebSocket and hands it to `handler`.
    async fn spawn_server<F, Fut>(handler: F) -> Url
    where
        F: FnOnce(WebSocketStream<TcpStream>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            handler(ws).await;
        });

        Url::parse(&format!("ws://{addr}/ws")).unwrap()
    }

    /// Welcomes the client, then echoes each text frame back as a chat frame.
    async fn chat_server(mut ws: WebSocketStream<TcpStream>) {
        let welcome = json!({ "type": "welcome", "nickname": "guest1" });
        ws.send(WsMessage::Text(welcome.to_string())).await.unwrap();

        while let Some(Ok(frame)) = ws.next().await {
            if let WsMessage::Text(text) = frame {
                let echo = json!({ "type": "chat", "nickname": "guest1", "message": text });
                if ws.send(WsMessage::Text(echo.to_string())).await.is_err() {
                    break;
                }
            }
        }
    }

    #[tokio::test]
    async fn test_round_trip_against_loopback_server() {
        let endpoint = spawn_server(chat_server).await;
        let (events_tx, mut events) = event_queue();
        let mut connector = WsConnector::new(events_tx);

        let id = ChannelId(1);
        let mut channel = connector.open(id, &endpoint);

        let opened = next_event(&mut events).await;
        assert_eq!(opened.channel, id);
        assert_eq!(opened.kind, ChannelEventKind::Opened);

        match next_event(&mut events).await.kind {
            ChannelEventKind::Message(raw) => assert_eq!(
                InboundMessage::decode(&raw),
                InboundMessage::Welcome {
                    nickname: "guest1".to_string()
                }
            ),
            other => panic!("expected welcome frame, got {other:?}"),
        }

        channel.send_text("hello").unwrap();
        match next_event(&mut events).await.kind {
            ChannelEventKind::Message(raw) => assert_eq!(
                InboundMessage::decode(&raw),
                InboundMessage::Chat {
                    nickname: "guest1".to_string(),
                    message: "hello".to_string()
                }
            ),
            other => panic!("expected chat frame, got {other:?}"),
        }

        channel.close();
        wait_for_close(&mut events, id).await;
    }

    #[tokio::test]
    async fn test_server_close_reports_closed() {
        let endpoint = spawn_server(|mut ws| async move {
            ws.close(None).await.unwrap();
            while let Some(Ok(_)) = ws.next().await {}
        })
        .await;
        let (events_tx, mut events) = event_queue();
        let mut connector = WsConnector::new(events_tx);
        let _channel = connector.open(ChannelId(4), &endpoint);

        assert_eq!(next_event(&mut events).await.kind, ChannelEventKind::Opened);
        assert_eq!(next_event(&mut events).await.kind, ChannelEventKind::Closed);
    }

    #[tokio::test]
    async fn test_dropping_handle_closes_socket() {
        let (saw_close_tx, saw_close_rx) = oneshot::channel();
        let endpoint = spawn_server(|mut ws| async move {
            let mut saw_close = false;
            while let Some(Ok(frame)) = ws.next().await {
                if let WsMessage::Close(_) = frame {
                    saw_close = true;
                }
            }
            let _ = saw_close_tx.send(saw_close);
        })
        .await;
        let (events_tx, mut events) = event_queue();
        let mut connector = WsConnector::new(events_tx);

        let channel = connector.open(ChannelId(5), &endpoint);
        assert_eq!(next_event(&mut events).await.kind, ChannelEventKind::Opened);
        drop(channel);

        assert_eq!(next_event(&mut events).await.kind, ChannelEventKind::Closed);
        let saw_close = tokio::time::timeout(Duration::from_secs(5), saw_close_rx)
            .await
            .unwrap()
            .unwrap();
        assert!(saw_close);
    }

    #[tokio::test]
    async fn test_refused_connection_reports_error_then_close() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (events_tx, mut events) = event_queue();
        let mut connector = WsConnector::new(events_tx);
        let endpoint = Url::parse(&format!("ws://{addr}/ws")).unwrap();
        let _channel = connector.open(ChannelId(7), &endpoint);

        let first = next_event(&mut events).await;
        assert!(matches!(first.kind, ChannelEventKind::Error(_)));
        assert_eq!(next_event(&mut events).await.kind, ChannelEventKind::Closed);
    }

    #[tokio::test]
    async fn test_close_before_open_skips_opened() {
        // Accepts TCP but never completes the WebSocket handshake.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (events_tx, mut events) = event_queue();
        let mut connector = WsConnector::new(events_tx);
        let endpoint = Url::parse(&format!("ws://{addr}/ws")).unwrap();

        let mut channel = connector.open(ChannelId(3), &endpoint);
        channel.close();

        assert_eq!(next_event(&mut events).await.kind, ChannelEventKind::Closed);
        drop(listener);
    }
}
