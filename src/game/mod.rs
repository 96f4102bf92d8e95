//! The pure game engine: cards, hands, betting rules, pots and the table
//! state machine. Nothing in here is async or aware of rooms; the `room`
//! module drives it.

pub mod cards;
pub mod constants;
pub mod hand;
pub mod player;
pub mod pot;
pub mod rules;
pub mod table;
pub mod view;

use thiserror::Error;

/// Chip amounts. Unsigned on purpose: stacks and pots can never go
/// negative, and all debits clamp before subtracting.
pub type Chips = u32;

/// Index into a table's seat vector.
pub type SeatIndex = usize;

#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum GameError {
    #[error("requested {requested} cards but only {remaining} remain")]
    InsufficientCards { requested: usize, remaining: usize },
    #[error("at least two players are required to start a hand")]
    NotEnoughPlayers,
    #[error("the table is full")]
    TableFull,
    #[error("cannot evaluate a hand from {0} cards")]
    TooFewCards(usize),
    #[error("operation not valid during the {0} stage")]
    WrongStage(table::Stage),
}

pub use cards::{ACE, Card, Deck, Rank, Suit};
pub use hand::{HandCategory, HandValue, evaluate};
pub use player::{HandState, Player, PlayerId};
pub use pot::{Pot, SidePot, tiered_pots};
pub use rules::{BettingMode, BettingRule, BettingRules, UnknownBettingMode};
pub use table::{
    ActionOutcome, AppliedAction, Stage, Table, TableAction, TableSettings, Winning,
};
pub use view::{ActionLogEntry, CardView, GameStateView, PlayerView, WinnerSummary};
