//! Game-wide constants.

/// Hard cap on seats at a table.
pub const MAX_PLAYERS: usize = 10;

/// Hole cards dealt to each player.
pub const HOLE_CARDS: usize = 2;

/// Cards in a fresh deck.
pub const DECK_SIZE: usize = 52;
