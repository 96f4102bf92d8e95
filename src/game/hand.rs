//! Hand evaluation: ranks any 5 to 7 cards into a totally ordered value.
//!
//! For more than 5 cards every C(n,5) subset is scored and the maximum
//! kept; 21 subsets for a full 7-card hand is cheap enough that no pruning
//! is needed.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{
    GameError,
    cards::{ACE, Card, Rank},
};

/// The ten hand categories, weakest first. Ordering on the enum is the
/// ordering between categories.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum HandCategory {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::HighCard => "High Card",
            Self::Pair => "Pair",
            Self::TwoPair => "Two Pair",
            Self::ThreeOfAKind => "Three of a Kind",
            Self::Straight => "Straight",
            Self::Flush => "Flush",
            Self::FullHouse => "Full House",
            Self::FourOfAKind => "Four of a Kind",
            Self::StraightFlush => "Straight Flush",
            Self::RoyalFlush => "Royal Flush",
        };
        write!(f, "{repr}")
    }
}

/// A comparable hand value: category first, then the category-specific
/// kicker sequence compared lexicographically. Derived `Ord` gives exactly
/// that because of the field order.
#[derive(Clone, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct HandValue {
    pub category: HandCategory,
    pub kickers: Vec<Rank>,
}

impl HandValue {
    pub fn name(&self) -> String {
        self.category.to_string()
    }
}

impl fmt::Display for HandValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.category)
    }
}

/// Rank the best 5-card hand out of `cards` (5 to 7 of them).
pub fn evaluate(cards: &[Card]) -> Result<HandValue, GameError> {
    if cards.len() < 5 {
        return Err(GameError::TooFewCards(cards.len()));
    }
    if cards.len() == 5 {
        return Ok(evaluate_five(cards));
    }
    cards
        .iter()
        .copied()
        .combinations(5)
        .map(|combo| evaluate_five(&combo))
        .max()
        .ok_or(GameError::TooFewCards(cards.len()))
}

/// High card of a straight, if the 5 ranks form one. The wheel
/// (A-2-3-4-5) counts with the ace low, so its high card is 5.
fn straight_high(ranks_desc: &[Rank]) -> Option<Rank> {
    let mut distinct = ranks_desc.to_vec();
    distinct.dedup();
    if distinct.len() != 5 {
        return None;
    }
    if distinct[0] - distinct[4] == 4 {
        Some(distinct[0])
    } else if distinct == [14, 5, 4, 3, 2] {
        Some(5)
    } else {
        None
    }
}

fn evaluate_five(cards: &[Card]) -> HandValue {
    debug_assert_eq!(cards.len(), 5);

    let mut ranks: Vec<Rank> = cards.iter().map(|c| c.0).collect();
    ranks.sort_unstable_by(|a, b| b.cmp(a));

    let is_flush = cards.iter().all(|c| c.1 == cards[0].1);
    let straight = straight_high(&ranks);

    if let Some(high) = straight
        && is_flush
    {
        return if high == ACE {
            HandValue {
                category: HandCategory::RoyalFlush,
                kickers: vec![ACE],
            }
        } else {
            HandValue {
                category: HandCategory::StraightFlush,
                kickers: vec![high],
            }
        };
    }

    // Group ranks by multiplicity: highest count first, ties broken by rank.
    let mut counts = [0u8; 15];
    for &r in &ranks {
        counts[r as usize] += 1;
    }
    let mut groups: Vec<(u8, Rank)> = counts
        .iter()
        .enumerate()
        .filter(|&(_, &c)| c > 0)
        .map(|(r, &c)| (c, r as Rank))
        .collect();
    groups.sort_unstable_by(|a, b| b.cmp(a));

    let shape: Vec<u8> = groups.iter().map(|&(c, _)| c).collect();
    let by_group: Vec<Rank> = groups.iter().map(|&(_, r)| r).collect();

    match shape.as_slice() {
        [4, 1] => HandValue {
            category: HandCategory::FourOfAKind,
            kickers: by_group,
        },
        [3, 2] => HandValue {
            category: HandCategory::FullHouse,
            kickers: by_group,
        },
        _ if is_flush => HandValue {
            category: HandCategory::Flush,
            kickers: ranks,
        },
        _ if straight.is_some() => HandValue {
            category: HandCategory::Straight,
            kickers: vec![straight.unwrap_or_default()],
        },
        [3, 1, 1] => HandValue {
            category: HandCategory::ThreeOfAKind,
            kickers: by_group,
        },
        [2, 2, 1] => HandValue {
            category: HandCategory::TwoPair,
            kickers: by_group,
        },
        [2, 1, 1, 1] => HandValue {
            category: HandCategory::Pair,
            kickers: by_group,
        },
        _ => HandValue {
            category: HandCategory::HighCard,
            kickers: ranks,
        },
    }
}
