//! Room actor protocol.
//!
//! [`ClientCommand`] is the inbound wire payload (`{"action": ...,
//! "amount": ...}`); [`RoomMessage`] is the internal mailbox type, with
//! oneshot channels where the caller needs an answer.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::game::{Chips, GameStateView, PlayerId, rules::BettingMode, table::Stage};

use super::RoomId;

/// An action submitted by a client, tagged by `action`.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientCommand {
    Fold,
    Check,
    Call,
    Bet {
        #[serde(default)]
        amount: Option<Chips>,
    },
    Raise {
        #[serde(default)]
        amount: Option<Chips>,
    },
    AllIn,
    StartGame,
    Chat {
        content: String,
    },
}

#[derive(Debug)]
pub enum RoomMessage {
    Join {
        player_id: PlayerId,
        name: String,
        respond_to: oneshot::Sender<RoomResponse>,
    },
    Leave {
        player_id: PlayerId,
        respond_to: oneshot::Sender<RoomResponse>,
    },
    Command {
        player_id: PlayerId,
        command: ClientCommand,
    },
    GetState {
        player_id: PlayerId,
        respond_to: oneshot::Sender<Option<GameStateView>>,
    },
    Summary {
        respond_to: oneshot::Sender<RoomSummary>,
    },
    /// Sent by the room's own timer task. Stale generations are ignored.
    TurnTimeout {
        generation: u64,
    },
    Close {
        respond_to: oneshot::Sender<()>,
    },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RoomResponse {
    Joined,
    Left { remaining: usize },
    RoomFull,
    NotInRoom,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RoomSummary {
    pub id: RoomId,
    pub name: String,
    pub player_count: usize,
    pub max_players: usize,
    pub stage: Stage,
    pub betting_mode: BettingMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_deserialize_from_tagged_payloads() {
        let command: ClientCommand = serde_json::from_str(r#"{"action": "fold"}"#).unwrap();
        assert!(matches!(command, ClientCommand::Fold));

        let command: ClientCommand =
            serde_json::from_str(r#"{"action": "raise", "amount": 40}"#).unwrap();
        assert!(matches!(command, ClientCommand::Raise { amount: Some(40) }));

        let command: ClientCommand = serde_json::from_str(r#"{"action": "bet"}"#).unwrap();
        assert!(matches!(command, ClientCommand::Bet { amount: None }));

        let command: ClientCommand =
            serde_json::from_str(r#"{"action": "chat", "content": "gg"}"#).unwrap();
        assert!(matches!(command, ClientCommand::Chat { .. }));
    }

    #[test]
    fn unknown_actions_fail_to_parse() {
        assert!(serde_json::from_str::<ClientCommand>(r#"{"action": "cheat"}"#).is_err());
    }
}
