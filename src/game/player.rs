use serde::{Deserialize, Serialize};

use super::{Chips, SeatIndex, cards::Card};

pub type PlayerId = String;

/// Per-hand state, replaced wholesale when a new hand starts. Anything in
/// here is meaningless outside the current hand.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct HandState {
    pub cards: Vec<Card>,
    pub folded: bool,
    pub all_in: bool,
    /// Chips committed in the current betting round.
    pub current_bet: Chips,
    /// Chips committed across the whole hand; drives side-pot tiering.
    pub total_bet: Chips,
    pub has_acted: bool,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub chips: Chips,
    pub seat: SeatIndex,
    pub hand: HandState,
}

impl Player {
    pub fn new(id: PlayerId, name: String, chips: Chips, seat: SeatIndex) -> Self {
        Self {
            id,
            name,
            chips,
            seat,
            hand: HandState::default(),
        }
    }

    /// Fresh per-hand state; nothing from the previous hand survives.
    pub fn begin_hand(&mut self) {
        self.hand = HandState::default();
    }

    /// Start a new betting round. Players who cannot act (folded, all-in,
    /// or felted) are marked acted so round completion can ignore them.
    pub fn begin_round(&mut self) {
        self.hand.current_bet = 0;
        self.hand.has_acted = !self.can_act();
    }

    pub fn fold(&mut self) {
        self.hand.folded = true;
        self.hand.has_acted = true;
    }

    /// Move up to `amount` chips from the stack into the current bet,
    /// clamping to what the player has. Returns the chips actually moved.
    pub fn place_bet(&mut self, amount: Chips) -> Chips {
        let paid = amount.min(self.chips);
        self.chips -= paid;
        self.hand.current_bet += paid;
        self.hand.total_bet += paid;
        if self.chips == 0 {
            self.hand.all_in = true;
        }
        self.hand.has_acted = true;
        paid
    }

    /// Whether the player still has decisions to make this hand. Players
    /// without hole cards joined mid-hand and sit out until the next deal.
    pub fn can_act(&self) -> bool {
        !self.hand.cards.is_empty() && !self.hand.folded && !self.hand.all_in && self.chips > 0
    }

    /// Whether the player still holds a claim on the pot.
    pub fn in_hand(&self) -> bool {
        !self.hand.folded && !self.hand.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::cards::Suit;

    fn dealt_player(chips: Chips) -> Player {
        let mut player = Player::new("p1".into(), "Alice".into(), chips, 0);
        player.hand.cards = vec![Card(14, Suit::Spade), Card(13, Suit::Heart)];
        player
    }

    #[test]
    fn bets_are_clamped_to_the_stack() {
        let mut player = dealt_player(100);
        let paid = player.place_bet(250);
        assert_eq!(paid, 100);
        assert_eq!(player.chips, 0);
        assert!(player.hand.all_in);
        assert!(player.hand.has_acted);
        assert_eq!(player.hand.total_bet, 100);
    }

    #[test]
    fn begin_round_clears_the_round_bet_only() {
        let mut player = dealt_player(100);
        player.place_bet(40);
        player.begin_round();
        assert_eq!(player.hand.current_bet, 0);
        assert_eq!(player.hand.total_bet, 40);
        assert!(!player.hand.has_acted);
    }

    #[test]
    fn all_in_players_start_rounds_already_acted() {
        let mut player = dealt_player(40);
        player.place_bet(40);
        player.begin_round();
        assert!(player.hand.has_acted);
        assert!(!player.can_act());
    }

    #[test]
    fn undealt_players_cannot_act() {
        let player = Player::new("p1".into(), "Alice".into(), 100, 0);
        assert!(!player.can_act());
    }

    #[test]
    fn begin_hand_wipes_prior_state() {
        let mut player = dealt_player(100);
        player.place_bet(30);
        player.fold();
        player.begin_hand();
        assert!(!player.hand.folded);
        assert!(player.hand.cards.is_empty());
        assert_eq!(player.hand.total_bet, 0);
        assert_eq!(player.chips, 70);
    }
}
