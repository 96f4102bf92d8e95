//! Async room layer: one actor per table, a directory to find them, and
//! the broadcaster seam the transport plugs into.

pub mod actor;
pub mod broadcast;
pub mod config;
pub mod manager;
pub mod messages;

/// Short shareable room code, e.g. `A1B2C3D4`.
pub type RoomId = String;

pub use actor::{RoomActor, RoomHandle};
pub use broadcast::{Broadcaster, ChatMessage, Event, MessageKind};
pub use config::{ConfigError, RoomConfig};
pub use manager::RoomManager;
pub use messages::{ClientCommand, RoomMessage, RoomResponse, RoomSummary};
