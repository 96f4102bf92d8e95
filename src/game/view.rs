//! Perspective-filtered snapshots of table state.
//!
//! Every player receives their own view: their hole cards face up,
//! everyone else's hidden until showdown reveals the hands still in
//! contention.

use serde::{Deserialize, Serialize};

use super::{
    Chips, SeatIndex,
    cards::Card,
    rules::BettingMode,
    table::Stage,
};

/// A card as one player sees it. Hidden cards serialize as
/// `{"hidden": true}` so clients cannot recover them from the payload.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CardView {
    Up(Card),
    Hidden { hidden: bool },
}

impl CardView {
    pub fn hidden() -> Self {
        Self::Hidden { hidden: true }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PlayerView {
    pub name: String,
    pub position: SeatIndex,
    pub chips: Chips,
    pub current_bet: Chips,
    pub total_bet: Chips,
    pub folded: bool,
    pub all_in: bool,
    pub cards: Vec<CardView>,
    pub is_self: bool,
    pub is_dealer: bool,
    pub is_small_blind: bool,
    pub is_big_blind: bool,
    pub is_current: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct WinnerSummary {
    pub name: String,
    pub amount: Chips,
    /// Hand name, absent for uncontested wins where nothing was shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand_name: Option<String>,
}

/// One line of the recent-action feed shown with every snapshot.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ActionLogEntry {
    pub player: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Chips>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GameStateView {
    pub room_id: String,
    pub room_name: String,
    pub stage: Stage,
    pub betting_mode: BettingMode,
    pub community_cards: Vec<Card>,
    pub pot_total: Chips,
    pub current_bet: Chips,
    pub to_call: Chips,
    pub min_raise: Chips,
    pub max_raise: Chips,
    pub raise_count: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_raises: Option<u8>,
    pub can_raise: bool,
    pub dealer_position: SeatIndex,
    pub current_player_index: SeatIndex,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Chips,
    pub players: Vec<PlayerView>,
    pub is_my_turn: bool,
    pub is_room_owner: bool,
    pub can_start: bool,
    /// Seconds left on the current turn clock; 0 outside betting rounds.
    pub remaining_secs: u64,
    pub action_log: Vec<ActionLogEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winners: Option<Vec<WinnerSummary>>,
}
