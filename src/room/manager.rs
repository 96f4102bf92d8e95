//! Room directory: creates, finds and tears down room actors.

use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, oneshot};
use uuid::Uuid;

use crate::game::GameStateView;

use super::{
    RoomId,
    actor::{RoomActor, RoomHandle},
    broadcast::Broadcaster,
    config::{ConfigError, RoomConfig},
    messages::{ClientCommand, RoomMessage, RoomResponse, RoomSummary},
};

/// Short, shareable room codes: the first 8 hex digits of a v4 uuid,
/// uppercased.
fn new_room_id() -> RoomId {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}

pub struct RoomManager {
    rooms: RwLock<HashMap<RoomId, RoomHandle>>,
    broadcaster: Arc<dyn Broadcaster>,
}

impl RoomManager {
    pub fn new(broadcaster: Arc<dyn Broadcaster>) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            broadcaster,
        }
    }

    /// Validate the config, spawn a room actor and return its id.
    pub async fn create_room(&self, config: RoomConfig) -> Result<RoomId, ConfigError> {
        config.validate()?;
        let room_id = new_room_id();
        let (actor, handle) = RoomActor::new(room_id.clone(), config, self.broadcaster.clone());
        tokio::spawn(actor.run());
        self.rooms.write().await.insert(room_id.clone(), handle);
        info!("created room {room_id}");
        Ok(room_id)
    }

    pub async fn room(&self, room_id: &str) -> Option<RoomHandle> {
        self.rooms.read().await.get(room_id).cloned()
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Stop a room's actor and drop it from the directory. Waits for the
    /// actor to acknowledge so callers observe a fully closed room.
    pub async fn delete_room(&self, room_id: &str) {
        let Some(handle) = self.rooms.write().await.remove(room_id) else {
            return;
        };
        let (tx, rx) = oneshot::channel();
        if handle.send(RoomMessage::Close { respond_to: tx }).await.is_ok() {
            let _ = rx.await;
        }
        info!("deleted room {room_id}");
    }

    pub async fn list_rooms(&self) -> Vec<RoomSummary> {
        let handles: Vec<RoomHandle> = self.rooms.read().await.values().cloned().collect();
        let mut summaries = Vec::with_capacity(handles.len());
        for handle in handles {
            let (tx, rx) = oneshot::channel();
            if handle.send(RoomMessage::Summary { respond_to: tx }).await.is_ok()
                && let Ok(summary) = rx.await
            {
                summaries.push(summary);
            }
        }
        summaries
    }

    /// `None` when the room does not exist.
    pub async fn join_room(
        &self,
        room_id: &str,
        player_id: &str,
        name: &str,
    ) -> Option<RoomResponse> {
        let handle = self.room(room_id).await?;
        let (tx, rx) = oneshot::channel();
        let message = RoomMessage::Join {
            player_id: player_id.to_string(),
            name: name.to_string(),
            respond_to: tx,
        };
        if handle.send(message).await.is_err() {
            return None;
        }
        rx.await.ok()
    }

    /// Leaving the last seat deletes the room.
    pub async fn leave_room(&self, room_id: &str, player_id: &str) -> Option<RoomResponse> {
        let handle = self.room(room_id).await?;
        let (tx, rx) = oneshot::channel();
        let message = RoomMessage::Leave {
            player_id: player_id.to_string(),
            respond_to: tx,
        };
        if handle.send(message).await.is_err() {
            return None;
        }
        let response = rx.await.ok()?;
        if response == (RoomResponse::Left { remaining: 0 }) {
            info!("room {room_id} is empty, removing it");
            self.delete_room(room_id).await;
        }
        Some(response)
    }

    /// Fire-and-forget: responses to commands arrive through the
    /// broadcaster, not the return path.
    pub async fn dispatch(&self, room_id: &str, player_id: &str, command: ClientCommand) {
        let Some(handle) = self.room(room_id).await else {
            warn!("command for unknown room {room_id}");
            return;
        };
        let message = RoomMessage::Command {
            player_id: player_id.to_string(),
            command,
        };
        if let Err(err) = handle.send(message).await {
            warn!("{err}");
        }
    }

    pub async fn state_for(&self, room_id: &str, player_id: &str) -> Option<GameStateView> {
        let handle = self.room(room_id).await?;
        let (tx, rx) = oneshot::channel();
        let message = RoomMessage::GetState {
            player_id: player_id.to_string(),
            respond_to: tx,
        };
        if handle.send(message).await.is_err() {
            return None;
        }
        rx.await.ok().flatten()
    }
}
