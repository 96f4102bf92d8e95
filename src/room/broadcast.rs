//! Outbound delivery seam.
//!
//! The engine never talks to sockets. Everything a client should see goes
//! through the [`Broadcaster`] trait, injected at room-manager construction;
//! the transport layer (websockets, tests, whatever) implements it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::view::{GameStateView, WinnerSummary};

/// Delivers events to clients. Implementations must tolerate unknown
/// players and rooms; delivery is best-effort.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn send_to_player(&self, room_id: &str, player_id: &str, event: Event);

    async fn broadcast_to_room(&self, room_id: &str, event: Event);
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Chat,
    System,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ChatMessage {
    pub player_name: String,
    pub content: String,
    pub kind: MessageKind,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn chat(player_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            content: content.into(),
            kind: MessageKind::Chat,
            timestamp: Utc::now(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            player_name: "System".to_string(),
            content: content.into(),
            kind: MessageKind::System,
            timestamp: Utc::now(),
        }
    }
}

/// Wire envelope: `{"type": ..., "data": ...}`.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Event {
    GameState(Box<GameStateView>),
    Chat(ChatMessage),
    Showdown { winners: Vec<WinnerSummary> },
}
