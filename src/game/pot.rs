//! Pot accounting.
//!
//! During betting everything accumulates in a single main pot. Side-pot
//! partitioning happens once, at showdown, from each player's `total_bet`:
//! the distinct contribution levels of the players still in the hand define
//! the tiers, and every chip lands in exactly one tier.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Chips, SeatIndex, player::Player};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SidePot {
    pub amount: Chips,
    /// Seats that can win this pot; non-folded players who contributed at
    /// least this tier's threshold.
    pub eligible: BTreeSet<SeatIndex>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Pot {
    main: Chips,
}

impl Pot {
    pub fn add(&mut self, amount: Chips) {
        self.main += amount;
    }

    pub fn total(&self) -> Chips {
        self.main
    }

    pub fn reset(&mut self) {
        self.main = 0;
    }
}

/// Partition every player's hand contribution into tiers. The first entry
/// is the main pot; each later entry is a side pot open to progressively
/// fewer players. Folded contributions stay in the tiers they reach, and
/// any folded excess above the top threshold collapses into the last pot.
pub fn tiered_pots(players: &[Player]) -> Vec<SidePot> {
    let mut thresholds: Vec<Chips> = players
        .iter()
        .filter(|p| !p.hand.folded && p.hand.total_bet > 0)
        .map(|p| p.hand.total_bet)
        .collect();
    thresholds.sort_unstable();
    thresholds.dedup();

    if thresholds.is_empty() {
        return Vec::new();
    }
    let top = *thresholds.last().unwrap_or(&0);

    let mut pots = Vec::with_capacity(thresholds.len());
    let mut prev = 0;
    for (i, &t) in thresholds.iter().enumerate() {
        let mut amount = 0;
        let mut eligible = BTreeSet::new();
        for player in players {
            amount += player.hand.total_bet.min(t).saturating_sub(prev);
            // Folded chips above the live players' ceiling have no tier of
            // their own; they go to whoever wins the last pot.
            if i == thresholds.len() - 1 {
                amount += player.hand.total_bet.saturating_sub(top);
            }
            if !player.hand.folded && player.hand.total_bet >= t {
                eligible.insert(player.seat);
            }
        }
        pots.push(SidePot { amount, eligible });
        prev = t;
    }

    debug_assert_eq!(
        pots.iter().map(|p| p.amount).sum::<Chips>(),
        players.iter().map(|p| p.hand.total_bet).sum::<Chips>(),
    );
    pots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contributor(seat: SeatIndex, total_bet: Chips, folded: bool) -> Player {
        let mut player = Player::new(format!("p{seat}"), format!("P{seat}"), 1000, seat);
        player.hand.total_bet = total_bet;
        player.hand.folded = folded;
        player
    }

    #[test]
    fn equal_bets_make_a_single_pot() {
        let players = vec![
            contributor(0, 100, false),
            contributor(1, 100, false),
            contributor(2, 100, false),
        ];
        let pots = tiered_pots(&players);
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].amount, 300);
        assert_eq!(pots[0].eligible, BTreeSet::from([0, 1, 2]));
    }

    #[test]
    fn short_all_ins_split_into_tiers() {
        // 50 / 200 / 500: main pot 150 (all three), side 300 (two), side 300 (one).
        let players = vec![
            contributor(0, 50, false),
            contributor(1, 200, false),
            contributor(2, 500, false),
        ];
        let pots = tiered_pots(&players);
        assert_eq!(pots.len(), 3);
        assert_eq!(pots[0].amount, 150);
        assert_eq!(pots[0].eligible, BTreeSet::from([0, 1, 2]));
        assert_eq!(pots[1].amount, 300);
        assert_eq!(pots[1].eligible, BTreeSet::from([1, 2]));
        assert_eq!(pots[2].amount, 300);
        assert_eq!(pots[2].eligible, BTreeSet::from([2]));
    }

    #[test]
    fn folded_chips_stay_in_reached_tiers() {
        // The folder put in 120: 50 reaches tier one, 70 reaches tier two.
        let players = vec![
            contributor(0, 50, false),
            contributor(1, 200, false),
            contributor(2, 120, true),
        ];
        let pots = tiered_pots(&players);
        assert_eq!(pots.len(), 2);
        assert_eq!(pots[0].amount, 150);
        assert_eq!(pots[1].amount, 220);
        assert!(!pots[1].eligible.contains(&2));
    }

    #[test]
    fn folded_excess_above_the_top_threshold_joins_the_last_pot() {
        let players = vec![
            contributor(0, 100, false),
            contributor(1, 100, false),
            contributor(2, 300, true),
        ];
        let pots = tiered_pots(&players);
        assert_eq!(pots.len(), 1);
        assert_eq!(pots[0].amount, 500);
        assert_eq!(pots[0].eligible, BTreeSet::from([0, 1]));
    }

    #[test]
    fn no_contributions_means_no_pots() {
        let players = vec![contributor(0, 0, false)];
        assert!(tiered_pots(&players).is_empty());
    }
}
