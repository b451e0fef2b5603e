use std::time::Duration;

use futures_util::{SinkExt, Stream, StreamExt};
use kanal::AsyncSender;
use ocrpanel_types::{AppEvent, ServerEvent};
use serde_json::Value;
use thiserror::Error;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_util::sync::CancellationToken;

use crate::channel::{ChannelEnds, ChannelHandle, pair};
use crate::protocol::{
    self, CONNECT_PACKET, EnginePacket, Handshake, PONG_PACKET, ProtocolError, SocketPacket,
};

/// How long to wait for the server's open packet
const OPEN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("server refused connection: {0}")]
    Rejected(String),
    #[error("no open packet from server")]
    NoHandshake,
    #[error("server went silent for {0:?}")]
    Timeout(Duration),
    #[error("app event receiver dropped")]
    AppClosed,
}

/// Socket task of the realtime channel. Reconnects with backoff until cancelled.
pub struct RealtimeChannel {
    url: String,
    reconnect_initial: Duration,
    reconnect_max: Duration,
    ends: ChannelEnds,
    events: AsyncSender<AppEvent>,
}

impl RealtimeChannel {
    pub fn new(
        url: impl Into<String>,
        reconnect_initial: Duration,
        reconnect_max: Duration,
        events: AsyncSender<AppEvent>,
    ) -> (ChannelHandle, Self) {
        let (handle, ends) = pair();
        let channel = Self {
            url: url.into(),
            reconnect_initial,
            reconnect_max: reconnect_max.max(reconnect_initial),
            ends,
            events,
        };
        (handle, channel)
    }

    pub async fn run(self, cancel: CancellationToken) -> anyhow::Result<()> {
        let mut backoff = self.reconnect_initial;

        loop {
            tracing::info!("Connecting to realtime channel at {}", self.url);

            let mut joined = false;
            let outcome = tokio::select! {
                _ = cancel.cancelled() => {
                    self.ends.set_connected(false);
                    tracing::info!("Realtime channel stopping");
                    return Ok(());
                }
                outcome = self.session(&mut joined) => outcome,
            };

            self.ends.set_connected(false);
            self.ends.discard_pending();

            match outcome {
                Ok(()) => tracing::warn!("Realtime channel closed by server"),
                Err(ChannelError::AppClosed) => {
                    tracing::info!("App stopped listening, closing realtime channel");
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Realtime channel error: {e}");
                    if !joined && self.publish(ServerEvent::ConnectError(e.to_string())).await.is_err() {
                        return Ok(());
                    }
                }
            }

            if joined {
                backoff = self.reconnect_initial;
                if self.publish(ServerEvent::Disconnected).await.is_err() {
                    return Ok(());
                }
            }

            tracing::debug!("Reconnecting in {backoff:?}");
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = tokio::time::sleep(backoff) => {}
            }
            backoff = (backoff * 2).min(self.reconnect_max);
        }
    }

    async fn publish(&self, event: ServerEvent) -> Result<(), ChannelError> {
        self.events
            .send(AppEvent::Server(event))
            .await
            .map_err(|_| ChannelError::AppClosed)
    }

    /// One Engine.IO session. `joined` flips once the namespace connect is acknowledged.
    async fn session(&self, joined: &mut bool) -> Result<(), ChannelError> {
        let (socket, _response) = connect_async(self.url.as_str()).await?;
        let (mut write, mut read) = socket.split();

        let handshake = tokio::time::timeout(OPEN_TIMEOUT, wait_for_open(&mut read))
            .await
            .map_err(|_| ChannelError::Timeout(OPEN_TIMEOUT))??;

        tracing::debug!("Engine session {} open", handshake.sid);
        write.send(Message::Text(CONNECT_PACKET.into())).await?;

        let liveness = Duration::from_millis(handshake.liveness_ms());
        // only inbound traffic proves the server is alive; our own emits don't count
        let silence = tokio::time::sleep(liveness);
        tokio::pin!(silence);

        loop {
            tokio::select! {
                _ = &mut silence => return Err(ChannelError::Timeout(liveness)),
                incoming = read.next() => {
                    silence.as_mut().reset(tokio::time::Instant::now() + liveness);
                    let text = match incoming {
                        Some(Ok(Message::Text(text))) => text,
                        Some(Ok(Message::Close(_))) | None => return Ok(()),
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => return Err(e.into()),
                    };

                    let packet = match protocol::decode(text.as_str()) {
                        Ok(packet) => packet,
                        Err(e) => {
                            tracing::warn!("Ignoring packet '{}': {e}", text.as_str());
                            continue;
                        }
                    };

                    match packet {
                        EnginePacket::Ping => {
                            write.send(Message::Text(PONG_PACKET.into())).await?;
                        }
                        EnginePacket::Close => return Ok(()),
                        EnginePacket::Message(SocketPacket::Connect) => {
                            *joined = true;
                            self.ends.set_connected(true);
                            tracing::info!("Realtime channel connected");
                            self.publish(ServerEvent::Connected).await?;
                        }
                        EnginePacket::Message(SocketPacket::ConnectError(message)) => {
                            return Err(ChannelError::Rejected(message));
                        }
                        EnginePacket::Message(SocketPacket::Disconnect) => return Ok(()),
                        EnginePacket::Message(SocketPacket::Event { name, args }) => {
                            self.dispatch(&name, args).await?;
                        }
                        other => tracing::trace!("Ignoring {other:?}"),
                    }
                }
                request = self.ends.outbound.recv(), if *joined => {
                    let Ok(request) = request else {
                        // every handle is gone, nothing can be sent any more
                        return Err(ChannelError::AppClosed);
                    };
                    tracing::debug!("Emitting {}", request.event_name());
                    write
                        .send(Message::Text(protocol::encode_event(request.event_name()).into()))
                        .await?;
                }
            }
        }
    }

    async fn dispatch(&self, name: &str, mut args: Vec<Value>) -> Result<(), ChannelError> {
        let payload = if args.is_empty() {
            Value::Null
        } else {
            args.swap_remove(0)
        };

        match ServerEvent::from_wire(name, payload) {
            Ok(Some(event)) => {
                tracing::debug!("Server event {name}");
                self.publish(event).await
            }
            Ok(None) => {
                tracing::debug!("Ignoring unknown server event {name}");
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Malformed {name} payload: {e}");
                Ok(())
            }
        }
    }
}

/// First text frame of a session must be the Engine.IO open packet
async fn wait_for_open<S>(read: &mut S) -> Result<Handshake, ChannelError>
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(message) = read.next().await {
        if let Message::Text(text) = message? {
            return match protocol::decode(text.as_str())? {
                EnginePacket::Open(handshake) => Ok(handshake),
                other => {
                    tracing::debug!("Expected open packet, got {other:?}");
                    Err(ChannelError::NoHandshake)
                }
            };
        }
    }
    Err(ChannelError::NoHandshake)
}
