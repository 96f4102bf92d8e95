//! # Holdem Rooms
//!
//! A multiplayer Texas Hold'em engine built around private rooms.
//!
//! The crate splits in two:
//!
//! - [`game`]: the synchronous engine. Cards and decks, a 7-card hand
//!   evaluator, no-limit / fixed-limit / pot-limit betting rules behind one
//!   trait, side-pot settlement, and the [`game::Table`] state machine that
//!   owns all of it. Nothing here is async; every mutation goes through a
//!   table method that validates it first.
//! - [`room`]: the orchestration layer. Each room runs as its own tokio
//!   task owning one table; a [`room::RoomManager`] creates and finds
//!   rooms, and every outbound event flows through the injected
//!   [`room::Broadcaster`] so the engine never touches a socket. Turn
//!   clocks auto-fold players who run out of time.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use holdem_rooms::room::{Broadcaster, Event, RoomConfig, RoomManager};
//!
//! # struct NullBroadcaster;
//! # #[async_trait::async_trait]
//! # impl Broadcaster for NullBroadcaster {
//! #     async fn send_to_player(&self, _: &str, _: &str, _: Event) {}
//! #     async fn broadcast_to_room(&self, _: &str, _: Event) {}
//! # }
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = RoomManager::new(Arc::new(NullBroadcaster));
//! let room_id = manager.create_room(RoomConfig::default()).await?;
//! manager.join_room(&room_id, "player-1", "Alice").await;
//! # Ok(())
//! # }
//! ```

pub mod game;
pub mod room;

pub use game::{
    BettingMode, Card, Chips, GameError, GameStateView, HandCategory, HandValue, Stage, Table,
    TableAction, TableSettings,
    constants::MAX_PLAYERS,
};
pub use room::{
    Broadcaster, ClientCommand, ConfigError, Event, RoomConfig, RoomId, RoomManager, RoomResponse,
};
