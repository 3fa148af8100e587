//! Per-connection read, dispatch and write loop
//!
//! A session handles one frame at a time: the response to a frame is written
//! before the next frame is read. Protocol errors are answered and the loop
//! continues; a failed read or write ends the session.

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use tracing::{info, warn};

use crate::domain::tools::ToolRegistry;
use crate::mcp::codec::{decode, encode, Response};
use crate::mcp::router::route;

/// One inbound frame as seen by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Text(String),
    Binary(Vec<u8>),
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    PeerClosed,
    ReadFailed,
    WriteFailed,
}

#[derive(Debug, thiserror::Error)]
#[error("transport error: {0}")]
pub struct TransportError(pub String);

/// A bidirectional connection exchanging discrete frames.
#[async_trait]
pub trait FrameChannel: Send {
    /// Waits for the next frame. `None` means the peer went away.
    async fn recv(&mut self) -> Option<Result<Inbound, TransportError>>;

    async fn send(&mut self, text: String) -> Result<(), TransportError>;
}

#[async_trait]
impl FrameChannel for WebSocket {
    async fn recv(&mut self) -> Option<Result<Inbound, TransportError>> {
        loop {
            let message = match WebSocket::recv(self).await? {
                Ok(message) => message,
                Err(err) => return Some(Err(TransportError(err.to_string()))),
            };

            return Some(Ok(match message {
                Message::Text(text) => Inbound::Text(text.as_str().to_owned()),
                Message::Binary(bytes) => Inbound::Binary(bytes.to_vec()),
                Message::Close(_) => Inbound::Close,
                // pongs for inbound pings are queued by the websocket layer
                Message::Ping(_) | Message::Pong(_) => continue,
            }));
        }
    }

    async fn send(&mut self, text: String) -> Result<(), TransportError> {
        WebSocket::send(self, Message::Text(text.into()))
            .await
            .map_err(|err| TransportError(err.to_string()))
    }
}

/// Builds the response for one frame. `None` only if the response could not
/// be encoded, in which case nothing is sent for this frame.
pub fn handle_frame(frame: &[u8], registry: &ToolRegistry, peer: &str) -> Option<String> {
    let response = match decode(frame) {
        Ok(request) => {
            let outcome = route(&request.method, request.params, registry);
            let response = match outcome {
                Ok(result) => Response::result(request.id, result),
                Err(err) => Response::error(request.id, err),
            };
            info!(
                peer = %peer,
                method = %request.method,
                id = %response.id,
                outcome = if response.is_error() { "failure" } else { "success" },
                "mcp request handled"
            );
            response
        }
        Err(failure) => {
            warn!(peer = %peer, id = %failure.id, error = %failure, "invalid frame");
            failure.into_response()
        }
    };

    encode(&response)
}

pub async fn run_session<C: FrameChannel>(
    mut channel: C,
    registry: &ToolRegistry,
    peer: &str,
) -> CloseReason {
    info!(peer = %peer, "session opened");

    let reason = loop {
        let frame = match channel.recv().await {
            None | Some(Ok(Inbound::Close)) => break CloseReason::PeerClosed,
            Some(Err(err)) => {
                warn!(peer = %peer, error = %err, "read failed");
                break CloseReason::ReadFailed;
            }
            Some(Ok(Inbound::Text(text))) => text.into_bytes(),
            Some(Ok(Inbound::Binary(bytes))) => bytes,
        };

        let Some(text) = handle_frame(&frame, registry, peer) else {
            continue;
        };

        if let Err(err) = channel.send(text).await {
            warn!(peer = %peer, error = %err, "write failed");
            break CloseReason::WriteFailed;
        }
    };

    info!(peer = %peer, reason = ?reason, "session closed");
    reason
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use serde_json::Value;

    use super::*;
    use crate::domain::tickets::seed_tickets;
    use crate::errors::{METHOD_NOT_FOUND, PARSE_ERROR};

    /// Replays scripted frames and records what the session writes.
    #[derive(Default)]
    struct ScriptedChannel {
        inbound: VecDeque<Result<Inbound, TransportError>>,
        sent: Vec<String>,
        fail_writes_after: Option<usize>,
    }

    impl ScriptedChannel {
        fn with_text(frames: &[&str]) -> Self {
            Self {
                inbound: frames
                    .iter()
                    .map(|frame| Ok(Inbound::Text(frame.to_string())))
                    .collect(),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl FrameChannel for &mut ScriptedChannel {
        async fn recv(&mut self) -> Option<Result<Inbound, TransportError>> {
            self.inbound.pop_front()
        }

        async fn send(&mut self, text: String) -> Result<(), TransportError> {
            if self.fail_writes_after == Some(self.sent.len()) {
                return Err(TransportError("broken pipe".to_string()));
            }
            self.sent.push(text);
            Ok(())
        }
    }

    fn registry() -> ToolRegistry {
        ToolRegistry::with_ticket_tools(seed_tickets())
    }

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).expect("valid json response")
    }

    #[tokio::test]
    async fn answers_each_frame_in_order_until_peer_leaves() {
        let mut channel = ScriptedChannel::with_text(&[
            r#"{"id":"1","method":"initialize"}"#,
            r#"{"id":"2","method":"tools/list"}"#,
            r#"{"id":"3","method":"tools/call","params":{"name":"get_done_tickets"}}"#,
        ]);

        let reason = run_session(&mut channel, &registry(), "test").await;

        assert_eq!(reason, CloseReason::PeerClosed);
        let ids = channel
            .sent
            .iter()
            .map(|text| parse(text)["id"].as_str().unwrap_or_default().to_string())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[tokio::test]
    async fn parse_error_does_not_end_the_session() {
        let mut channel = ScriptedChannel::with_text(&[
            "not json at all",
            r#"{"id":"5","method":"unknown/thing"}"#,
            r#"{"id":"6","method":"tools/list"}"#,
        ]);

        let reason = run_session(&mut channel, &registry(), "test").await;

        assert_eq!(reason, CloseReason::PeerClosed);
        assert_eq!(channel.sent.len(), 3);

        let first = parse(&channel.sent[0]);
        assert_eq!(first["id"], "");
        assert_eq!(first["error"]["code"], PARSE_ERROR);

        let second = parse(&channel.sent[1]);
        assert_eq!(second["error"]["code"], METHOD_NOT_FOUND);

        let third = parse(&channel.sent[2]);
        assert!(third["result"]["tools"].is_array());
    }

    #[tokio::test]
    async fn binary_frames_are_decoded_like_text() {
        let mut channel = ScriptedChannel {
            inbound: VecDeque::from([
                Ok(Inbound::Binary(br#"{"id":"b","method":"ping"}"#.to_vec())),
                Ok(Inbound::Binary(vec![0xff, 0xfe])),
            ]),
            ..ScriptedChannel::default()
        };

        run_session(&mut channel, &registry(), "test").await;

        assert_eq!(parse(&channel.sent[0])["id"], "b");
        assert!(parse(&channel.sent[0])["result"]["pong"].is_string());
        assert_eq!(parse(&channel.sent[1])["error"]["code"], PARSE_ERROR);
    }

    #[tokio::test]
    async fn close_frame_stops_reading() {
        let mut channel = ScriptedChannel {
            inbound: VecDeque::from([
                Ok(Inbound::Close),
                Ok(Inbound::Text(r#"{"id":"x","method":"ping"}"#.to_string())),
            ]),
            ..ScriptedChannel::default()
        };

        let reason = run_session(&mut channel, &registry(), "test").await;

        assert_eq!(reason, CloseReason::PeerClosed);
        assert!(channel.sent.is_empty());
        assert_eq!(channel.inbound.len(), 1);
    }

    #[tokio::test]
    async fn read_failure_ends_the_session() {
        let mut channel = ScriptedChannel {
            inbound: VecDeque::from([
                Err(TransportError("reset by peer".to_string())),
                Ok(Inbound::Text(r#"{"id":"x","method":"ping"}"#.to_string())),
            ]),
            ..ScriptedChannel::default()
        };

        let reason = run_session(&mut channel, &registry(), "test").await;

        assert_eq!(reason, CloseReason::ReadFailed);
        assert!(channel.sent.is_empty());
    }

    #[tokio::test]
    async fn write_failure_ends_the_session() {
        let mut channel = ScriptedChannel::with_text(&[
            r#"{"id":"1","method":"ping"}"#,
            r#"{"id":"2","method":"ping"}"#,
            r#"{"id":"3","method":"ping"}"#,
        ]);
        channel.fail_writes_after = Some(1);

        let reason = run_session(&mut channel, &registry(), "test").await;

        assert_eq!(reason, CloseReason::WriteFailed);
        assert_eq!(channel.sent.len(), 1);
        assert_eq!(channel.inbound.len(), 1);
    }

    #[test]
    fn handle_frame_echoes_request_id() {
        let registry = registry();
        for id in ["", "1", "abc-123", "with \"quotes\""] {
            let frame = serde_json::json!({"id": id, "method": "tools/list"}).to_string();
            let text = handle_frame(frame.as_bytes(), &registry, "test").expect("encodes");
            assert_eq!(parse(&text)["id"], id);
        }
    }
}
