use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{GameError, constants::DECK_SIZE};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Club, Suit::Spade, Suit::Diamond, Suit::Heart];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Spade => "♠",
            Self::Diamond => "♦",
            Self::Heart => "♥",
        };
        write!(f, "{repr}")
    }
}

/// Card rank, 2..=14 with the ace always high. The wheel straight
/// (A-2-3-4-5) is handled inside the evaluator, not here.
pub type Rank = u8;

pub const ACE: Rank = 14;

/// A card is a rank paired with a suit.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Rank, pub Suit);

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rank = match self.0 {
            14 => "A".to_string(),
            13 => "K".to_string(),
            12 => "Q".to_string(),
            11 => "J".to_string(),
            v => v.to_string(),
        };
        write!(f, "{rank}{}", self.1)
    }
}

/// An ordered deck of the 52 unique cards, owned exclusively by one table.
/// Dealing advances a cursor; `reset` reshuffles and rewinds it, so no card
/// can be dealt twice within a hand.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: [Card; DECK_SIZE],
    next: usize,
}

impl Default for Deck {
    fn default() -> Self {
        let mut cards = [Card(2, Suit::Club); DECK_SIZE];
        for (i, rank) in (2..=14).enumerate() {
            for (j, suit) in Suit::ALL.into_iter().enumerate() {
                cards[4 * i + j] = Card(rank, suit);
            }
        }
        Self { cards, next: 0 }
    }
}

impl Deck {
    /// Reshuffle all 52 cards and rewind the cursor.
    pub fn reset(&mut self) {
        self.cards.shuffle(&mut rand::rng());
        self.next = 0;
    }

    pub fn remaining(&self) -> usize {
        DECK_SIZE - self.next
    }

    /// Deal `count` cards off the top.
    pub fn draw(&mut self, count: usize) -> Result<Vec<Card>, GameError> {
        if count > self.remaining() {
            return Err(GameError::InsufficientCards {
                requested: count,
                remaining: self.remaining(),
            });
        }
        let drawn = self.cards[self.next..self.next + count].to_vec();
        self.next += count;
        Ok(drawn)
    }

    pub fn draw_one(&mut self) -> Result<Card, GameError> {
        if self.remaining() == 0 {
            return Err(GameError::InsufficientCards {
                requested: 1,
                remaining: 0,
            });
        }
        let card = self.cards[self.next];
        self.next += 1;
        Ok(card)
    }

    /// Remove one card from play without exposing it anywhere.
    pub fn burn(&mut self) -> Result<(), GameError> {
        self.draw_one().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn fresh_deck_holds_52_unique_cards() {
        let mut deck = Deck::default();
        deck.reset();
        let cards = deck.draw(DECK_SIZE).unwrap();
        let unique: HashSet<Card> = cards.into_iter().collect();
        assert_eq!(unique.len(), DECK_SIZE);
        assert_eq!(deck.remaining(), 0);
    }

    #[test]
    fn draw_and_burn_advance_the_cursor() {
        let mut deck = Deck::default();
        deck.reset();
        deck.burn().unwrap();
        let flop = deck.draw(3).unwrap();
        assert_eq!(flop.len(), 3);
        assert_eq!(deck.remaining(), DECK_SIZE - 4);
    }

    #[test]
    fn overdraw_is_an_error() {
        let mut deck = Deck::default();
        deck.reset();
        deck.draw(50).unwrap();
        assert_eq!(
            deck.draw(3),
            Err(GameError::InsufficientCards {
                requested: 3,
                remaining: 2,
            })
        );
    }

    #[test]
    fn reset_restores_a_full_deck() {
        let mut deck = Deck::default();
        deck.reset();
        deck.draw(30).unwrap();
        deck.reset();
        assert_eq!(deck.remaining(), DECK_SIZE);
    }

    #[test]
    fn card_display_uses_face_names() {
        assert_eq!(Card(14, Suit::Spade).to_string(), "A♠");
        assert_eq!(Card(10, Suit::Heart).to_string(), "10♥");
        assert_eq!(Card(11, Suit::Club).to_string(), "J♣");
    }
}
