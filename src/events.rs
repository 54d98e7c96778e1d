//! Server push protocol.
//!
//! Events the hub pushes to connected clients. A connection is an
//! unbounded channel the transport layer drains onto its socket.
//! Delivery is fire-and-forget and at-most-once: a send to a closed
//! channel is ignored, and a reconnecting client recovers by fetching
//! the authoritative match state rather than replaying missed pushes.

use serde_json::Value;
use tokio::sync::mpsc;

/// Outbound handle for one client connection.
pub type ConnSender = mpsc::UnboundedSender<ServerEvent>;

/// Inbound half the transport layer drains.
pub type ConnReceiver = mpsc::UnboundedReceiver<ServerEvent>;

/// Create a connection channel pair.
pub fn connection_channel() -> (ConnSender, ConnReceiver) {
    mpsc::unbounded_channel()
}

/// An event pushed to a client.
#[derive(Debug, Clone)]
pub enum ServerEvent {
    /// A pairing succeeded; carries the initial match state.
    MatchFound { state: Value },
    /// The current player answered; carries the updated state.
    QuestionAnswered { correct: bool, state: Value },
    PiecePlaced { state: Value },
    PieceMoved { state: Value },
    PieceRemoved { state: Value },
    /// Full authoritative state, sent on resync and timer expiry.
    StateSync { state: Value },
    MatchEnded { winner_id: i64, winner_name: String },
    QueueUpdate { count: usize },
    OpponentQuit { username: String },
    ForceDisconnect { reason: String },
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MatchFound { .. } => "match_found",
            Self::QuestionAnswered { .. } => "question_answered",
            Self::PiecePlaced { .. } => "piece_placed",
            Self::PieceMoved { .. } => "piece_moved",
            Self::PieceRemoved { .. } => "piece_removed",
            Self::StateSync { .. } => "state_sync",
            Self::MatchEnded { .. } => "match_ended",
            Self::QueueUpdate { .. } => "queue_update",
            Self::OpponentQuit { .. } => "opponent_quit",
            Self::ForceDisconnect { .. } => "force_disconnect",
        }
    }

    /// Wire form: event name plus payload.
    pub fn to_json(&self) -> Value {
        let payload = match self {
            Self::MatchFound { state }
            | Self::PiecePlaced { state }
            | Self::PieceMoved { state }
            | Self::PieceRemoved { state }
            | Self::StateSync { state } => serde_json::json!({ "state": state }),
            Self::QuestionAnswered { correct, state } => {
                serde_json::json!({ "correct": correct, "state": state })
            }
            Self::MatchEnded {
                winner_id,
                winner_name,
            } => serde_json::json!({ "winner_id": winner_id, "winner_name": winner_name }),
            Self::QueueUpdate { count } => serde_json::json!({ "count": count }),
            Self::OpponentQuit { username } => serde_json::json!({ "username": username }),
            Self::ForceDisconnect { reason } => serde_json::json!({ "reason": reason }),
        };
        serde_json::json!({ "event": self.name(), "payload": payload })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let ev = ServerEvent::QueueUpdate { count: 3 };
        assert_eq!(ev.name(), "queue_update");

        let ev = ServerEvent::ForceDisconnect {
            reason: "inactive".to_string(),
        };
        assert_eq!(ev.name(), "force_disconnect");
    }

    #[test]
    fn test_to_json_shape() {
        let ev = ServerEvent::MatchEnded {
            winner_id: 7,
            winner_name: "alice".to_string(),
        };
        let json = ev.to_json();
        assert_eq!(json["event"], "match_ended");
        assert_eq!(json["payload"]["winner_id"], 7);
        assert_eq!(json["payload"]["winner_name"], "alice");
    }

    #[test]
    fn test_channel_send() {
        let (tx, mut rx) = connection_channel();
        tx.send(ServerEvent::QueueUpdate { count: 1 }).unwrap();
        let ev = rx.try_recv().unwrap();
        assert_eq!(ev.name(), "queue_update");
    }
}
