//! Text framing of the realtime channel: Engine.IO v4 packets carrying
//! Socket.IO v5 packets.
//!
//! Only the websocket transport is spoken, so binary attachments and
//! payload batching never occur.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Sent once the Engine.IO session is open, joins the default namespace
pub const CONNECT_PACKET: &str = "40";
/// Reply to a server ping
pub const PONG_PACKET: &str = "3";

#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    #[error("empty packet")]
    Empty,
    #[error("unknown engine packet type '{0}'")]
    UnknownEngineType(char),
    #[error("unknown socket packet type '{0}'")]
    UnknownSocketType(char),
    #[error("malformed packet payload: {0}")]
    Payload(String),
}

/// Parameters of the `0{...}` open packet
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default = "default_ping_interval")]
    pub ping_interval: u64,
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout: u64,
}

fn default_ping_interval() -> u64 {
    25_000
}

fn default_ping_timeout() -> u64 {
    20_000
}

impl Handshake {
    /// Longest silence tolerated before the session is considered dead, in ms
    pub fn liveness_ms(&self) -> u64 {
        self.ping_interval + self.ping_timeout
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    Open(Handshake),
    Close,
    Ping,
    Pong,
    Message(SocketPacket),
    Upgrade,
    Noop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect,
    Disconnect,
    Event { name: String, args: Vec<Value> },
    Ack,
    ConnectError(String),
}

pub fn decode(text: &str) -> Result<EnginePacket, ProtocolError> {
    let mut chars = text.chars();
    let kind = chars.next().ok_or(ProtocolError::Empty)?;
    let rest = chars.as_str();

    let packet = match kind {
        '0' => {
            let handshake = serde_json::from_str(rest)
                .map_err(|e| ProtocolError::Payload(e.to_string()))?;
            EnginePacket::Open(handshake)
        }
        '1' => EnginePacket::Close,
        '2' => EnginePacket::Ping,
        '3' => EnginePacket::Pong,
        '4' => EnginePacket::Message(decode_socket(rest)?),
        '5' => EnginePacket::Upgrade,
        '6' => EnginePacket::Noop,
        other => return Err(ProtocolError::UnknownEngineType(other)),
    };

    Ok(packet)
}

fn decode_socket(text: &str) -> Result<SocketPacket, ProtocolError> {
    let mut chars = text.chars();
    let kind = chars.next().ok_or(ProtocolError::Empty)?;
    let body = strip_ack_id(strip_namespace(chars.as_str()));

    let packet = match kind {
        '0' => SocketPacket::Connect,
        '1' => SocketPacket::Disconnect,
        '2' => {
            let mut items: Vec<Value> = serde_json::from_str(body)
                .map_err(|e| ProtocolError::Payload(e.to_string()))?;
            if items.is_empty() {
                return Err(ProtocolError::Payload("event without a name".into()));
            }
            let name = match items.remove(0) {
                Value::String(name) => name,
                other => {
                    return Err(ProtocolError::Payload(format!("event name is not a string: {other}")));
                }
            };
            SocketPacket::Event { name, args: items }
        }
        '3' => SocketPacket::Ack,
        '4' => SocketPacket::ConnectError(connect_error_message(body)),
        other => return Err(ProtocolError::UnknownSocketType(other)),
    };

    Ok(packet)
}

/// `/admin,rest` -> `rest`. The default namespace has no prefix.
fn strip_namespace(text: &str) -> &str {
    if text.starts_with('/') {
        match text.find(',') {
            Some(idx) => &text[idx + 1..],
            None => "",
        }
    } else {
        text
    }
}

fn strip_ack_id(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_ascii_digit())
}

fn connect_error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("connection refused")
            .to_string(),
        Ok(Value::String(message)) => message,
        _ if body.is_empty() => "connection refused".to_string(),
        _ => body.to_string(),
    }
}

/// `42["name"]`, the only shape the client sends
pub fn encode_event(name: &str) -> String {
    format!("42{}", Value::from(vec![Value::from(name)]))
}
