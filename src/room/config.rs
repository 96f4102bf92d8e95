use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::game::{
    Chips,
    constants::MAX_PLAYERS,
    rules::BettingMode,
    table::TableSettings,
};

#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("room name cannot be empty")]
    EmptyName,
    #[error("blinds must be positive")]
    NonPositiveBlinds,
    #[error("big blind must be at least the small blind")]
    BlindOrder,
    #[error("max players must be between 2 and 10")]
    BadMaxPlayers,
    #[error("starting chips must cover at least one big blind plus the ante")]
    StackTooSmall,
}

/// Creation-time room settings. Validated once on room creation; a room
/// never changes configuration after that.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct RoomConfig {
    pub name: String,
    pub betting_mode: BettingMode,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Chips,
    pub starting_chips: Chips,
    pub max_players: usize,
    pub turn_timeout_secs: u64,
    /// Pause between streets when a hand runs out with nobody left to act.
    pub runout_pause_ms: u64,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            name: "Poker Room".to_string(),
            betting_mode: BettingMode::NoLimit,
            small_blind: 10,
            big_blind: 20,
            ante: 0,
            starting_chips: 1000,
            max_players: MAX_PLAYERS,
            turn_timeout_secs: 30,
            runout_pause_ms: 1000,
        }
    }
}

impl RoomConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.small_blind == 0 || self.big_blind == 0 {
            return Err(ConfigError::NonPositiveBlinds);
        }
        if self.big_blind < self.small_blind {
            return Err(ConfigError::BlindOrder);
        }
        if self.max_players < 2 || self.max_players > MAX_PLAYERS {
            return Err(ConfigError::BadMaxPlayers);
        }
        if self.starting_chips < self.big_blind + self.ante {
            return Err(ConfigError::StackTooSmall);
        }
        Ok(())
    }

    pub fn turn_timeout(&self) -> Duration {
        Duration::from_secs(self.turn_timeout_secs)
    }

    pub fn runout_pause(&self) -> Duration {
        Duration::from_millis(self.runout_pause_ms)
    }

    pub fn table_settings(&self, room_id: &str) -> TableSettings {
        TableSettings {
            room_id: room_id.to_string(),
            room_name: self.name.clone(),
            betting_mode: self.betting_mode,
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            ante: self.ante,
            max_players: self.max_players,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(RoomConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_blinds() {
        let config = RoomConfig {
            small_blind: 0,
            ..RoomConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveBlinds));

        let config = RoomConfig {
            small_blind: 50,
            big_blind: 20,
            ..RoomConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::BlindOrder));
    }

    #[test]
    fn rejects_out_of_range_seats() {
        let config = RoomConfig {
            max_players: 1,
            ..RoomConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::BadMaxPlayers));

        let config = RoomConfig {
            max_players: 11,
            ..RoomConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::BadMaxPlayers));
    }

    #[test]
    fn rejects_stacks_too_small_to_play() {
        let config = RoomConfig {
            starting_chips: 15,
            ..RoomConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::StackTooSmall));
    }

    #[test]
    fn rejects_blank_names() {
        let config = RoomConfig {
            name: "   ".to_string(),
            ..RoomConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyName));
    }
}
