//! The table state machine.
//!
//! A [`Table`] owns the deck, pot, seats and stage, and is the only thing
//! allowed to mutate them. Callers submit [`TableAction`]s; illegal or
//! out-of-turn submissions come back as [`ActionOutcome::Ignored`] rather
//! than corrupting state.

use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::{
    Chips, GameError, SeatIndex,
    cards::{Card, Deck},
    constants::HOLE_CARDS,
    hand::{self, HandValue},
    player::{Player, PlayerId},
    pot::{Pot, tiered_pots},
    rules::{BettingMode, BettingRule, BettingRules},
    view::{CardView, GameStateView, PlayerView, WinnerSummary},
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Waiting,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Stage {
    pub fn is_betting(&self) -> bool {
        matches!(self, Self::Preflop | Self::Flop | Self::Turn | Self::River)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Waiting => "waiting",
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Showdown => "showdown",
        };
        write!(f, "{repr}")
    }
}

/// An action as submitted. Bet and raise amounts are optional; a missing
/// amount means the table minimum.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TableAction {
    Fold,
    Check,
    Call,
    Bet(Option<Chips>),
    Raise(Option<Chips>),
    AllIn,
}

/// The action as it actually landed after clamping.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AppliedAction {
    Fold,
    Check,
    Call,
    Bet,
    Raise,
    AllIn,
}

impl fmt::Display for AppliedAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Fold => "folds",
            Self::Check => "checks",
            Self::Call => "calls",
            Self::Bet => "bets",
            Self::Raise => "raises",
            Self::AllIn => "goes all-in",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActionOutcome {
    /// Out of turn, wrong stage, or illegal for the current bet; no state
    /// changed.
    Ignored,
    Applied {
        action: AppliedAction,
        amount: Chips,
    },
}

/// One player's share of a settled hand.
#[derive(Clone, Debug)]
pub struct Winning {
    pub player_id: PlayerId,
    pub name: String,
    pub amount: Chips,
    /// `None` when the pot was won uncontested and nothing was shown.
    pub hand: Option<HandValue>,
}

impl Winning {
    pub fn summary(&self) -> WinnerSummary {
        WinnerSummary {
            name: self.name.clone(),
            amount: self.amount,
            hand_name: self.hand.as_ref().map(HandValue::name),
        }
    }
}

/// Everything a table needs to know about the room hosting it.
#[derive(Clone, Debug)]
pub struct TableSettings {
    pub room_id: String,
    pub room_name: String,
    pub betting_mode: BettingMode,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub ante: Chips,
    pub max_players: usize,
}

#[derive(Debug)]
pub struct Table {
    settings: TableSettings,
    rules: BettingRule,
    stage: Stage,
    players: Vec<Player>,
    deck: Deck,
    community_cards: Vec<Card>,
    pot: Pot,
    dealer_position: SeatIndex,
    current_player_index: SeatIndex,
    current_bet: Chips,
    last_raise_amount: Chips,
    raise_count: u8,
    room_owner: Option<PlayerId>,
    /// Contributions of players who left mid-hand. They stay in the pot
    /// and must flow into the settlement tiers.
    departed_bets: Vec<Chips>,
}

impl Table {
    pub fn new(settings: TableSettings) -> Self {
        let rules = BettingRule::from(settings.betting_mode);
        Self {
            settings,
            rules,
            stage: Stage::Waiting,
            players: Vec::new(),
            deck: Deck::default(),
            community_cards: Vec::new(),
            pot: Pot::default(),
            dealer_position: 0,
            current_player_index: 0,
            current_bet: 0,
            last_raise_amount: 0,
            raise_count: 0,
            room_owner: None,
            departed_bets: Vec::new(),
        }
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_owner(&self, player_id: &str) -> bool {
        self.room_owner.as_deref() == Some(player_id)
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn pot_total(&self) -> Chips {
        self.pot.total()
    }

    pub fn community_cards(&self) -> &[Card] {
        &self.community_cards
    }

    /// Seat a player. Re-joining with the same id is a no-op. The first
    /// player to sit becomes the room owner.
    pub fn add_player(
        &mut self,
        id: PlayerId,
        name: String,
        chips: Chips,
    ) -> Result<SeatIndex, GameError> {
        if let Some(existing) = self.players.iter().position(|p| p.id == id) {
            return Ok(existing);
        }
        if self.players.len() >= self.settings.max_players {
            return Err(GameError::TableFull);
        }
        let seat = self.players.len();
        if self.room_owner.is_none() {
            self.room_owner = Some(id.clone());
        }
        self.players.push(Player::new(id, name, chips, seat));
        Ok(seat)
    }

    /// Unseat a player and compact the remaining seats. Ownership passes
    /// to the earliest remaining seat; the dealer and turn markers are
    /// shifted so they keep pointing at the same people.
    pub fn remove_player(&mut self, player_id: &str) -> Option<Player> {
        let idx = self.players.iter().position(|p| p.id == player_id)?;
        let was_current = idx == self.current_player_index;
        let removed = self.players.remove(idx);
        if self.stage.is_betting() && removed.hand.total_bet > 0 {
            self.departed_bets.push(removed.hand.total_bet);
        }
        for (i, player) in self.players.iter_mut().enumerate() {
            player.seat = i;
        }
        if self.room_owner.as_deref() == Some(player_id) {
            self.room_owner = self.players.first().map(|p| p.id.clone());
        }
        if self.players.is_empty() {
            self.stage = Stage::Waiting;
            self.dealer_position = 0;
            self.current_player_index = 0;
            return Some(removed);
        }
        let n = self.players.len();
        if self.dealer_position > idx {
            self.dealer_position -= 1;
        }
        self.dealer_position %= n;
        if self.current_player_index > idx {
            self.current_player_index -= 1;
        }
        self.current_player_index %= n;
        if self.stage.is_betting()
            && was_current
            && !self.players[self.current_player_index].can_act()
            && let Some(next) = self.next_active_after(self.current_player_index)
        {
            self.current_player_index = next;
        }
        Some(removed)
    }

    /// Shuffle, deal, collect antes and post blinds. Fails when fewer
    /// than two players are seated.
    pub fn start_new_hand(&mut self) -> Result<(), GameError> {
        if self.players.len() < 2 {
            return Err(GameError::NotEnoughPlayers);
        }
        self.deck.reset();
        self.pot.reset();
        self.community_cards.clear();
        self.departed_bets.clear();
        self.current_bet = 0;
        self.last_raise_amount = self.settings.big_blind;
        self.raise_count = 0;
        for player in &mut self.players {
            player.begin_hand();
        }
        // Two passes around the table, one card each.
        for _ in 0..HOLE_CARDS {
            for i in 0..self.players.len() {
                let card = self.deck.draw_one()?;
                self.players[i].hand.cards.push(card);
            }
        }
        self.stage = Stage::Preflop;
        if self.settings.ante > 0 {
            for i in 0..self.players.len() {
                self.post_ante(i);
            }
        }
        self.post_blinds();
        info!(
            "room {}: new hand, {} players, dealer at seat {}",
            self.settings.room_id,
            self.players.len(),
            self.dealer_position,
        );
        Ok(())
    }

    /// Antes go straight to the pot; they are not part of the bet a
    /// player must match and do not count as acting.
    fn post_ante(&mut self, seat: SeatIndex) {
        let player = &mut self.players[seat];
        let paid = self.settings.ante.min(player.chips);
        player.chips -= paid;
        player.hand.total_bet += paid;
        if player.chips == 0 {
            player.hand.all_in = true;
        }
        self.pot.add(paid);
    }

    fn post_blinds(&mut self) {
        let n = self.players.len();
        let (sb, bb, first) = if n == 2 {
            // Heads-up: the dealer posts the small blind and acts first.
            (
                self.dealer_position,
                (self.dealer_position + 1) % n,
                self.dealer_position,
            )
        } else {
            (
                (self.dealer_position + 1) % n,
                (self.dealer_position + 2) % n,
                (self.dealer_position + 3) % n,
            )
        };
        let paid = self.players[sb].place_bet(self.settings.small_blind);
        self.pot.add(paid);
        let paid = self.players[bb].place_bet(self.settings.big_blind);
        self.pot.add(paid);
        self.current_bet = self.settings.big_blind;
        self.last_raise_amount = self.settings.big_blind;
        self.current_player_index = first;
        if !self.players[first].can_act()
            && let Some(next) = self.next_active_after(first)
        {
            self.current_player_index = next;
        }
    }

    pub fn sb_position(&self) -> SeatIndex {
        let n = self.players.len().max(1);
        if n == 2 {
            self.dealer_position
        } else {
            (self.dealer_position + 1) % n
        }
    }

    pub fn bb_position(&self) -> SeatIndex {
        let n = self.players.len().max(1);
        if n == 2 {
            (self.dealer_position + 1) % n
        } else {
            (self.dealer_position + 2) % n
        }
    }

    /// Deal the next street and open a fresh betting round, or move to
    /// showdown after the river.
    pub fn advance_stage(&mut self) -> Result<(), GameError> {
        let next = match self.stage {
            Stage::Preflop => {
                self.deck.burn()?;
                let mut flop = self.deck.draw(3)?;
                self.community_cards.append(&mut flop);
                Stage::Flop
            }
            Stage::Flop => {
                self.deck.burn()?;
                self.community_cards.push(self.deck.draw_one()?);
                Stage::Turn
            }
            Stage::Turn => {
                self.deck.burn()?;
                self.community_cards.push(self.deck.draw_one()?);
                Stage::River
            }
            Stage::River => Stage::Showdown,
            other => return Err(GameError::WrongStage(other)),
        };
        self.stage = next;
        self.current_bet = 0;
        self.last_raise_amount = self.settings.big_blind;
        self.raise_count = 0;
        for player in &mut self.players {
            player.begin_round();
        }
        if self.stage.is_betting()
            && let Some(first) = self.next_active_after(self.dealer_position)
        {
            self.current_player_index = first;
        }
        Ok(())
    }

    /// The next seat clockwise from `pos` that can still act.
    pub fn next_active_after(&self, pos: SeatIndex) -> Option<SeatIndex> {
        let n = self.players.len();
        (1..=n)
            .map(|step| (pos + step) % n)
            .find(|&i| self.players[i].can_act())
    }

    pub fn to_call(&self, player: &Player) -> Chips {
        self.current_bet.saturating_sub(player.hand.current_bet)
    }

    pub fn min_bet(&self) -> Chips {
        self.rules.min_bet(self.settings.big_blind, self.stage)
    }

    pub fn min_raise(&self) -> Chips {
        self.rules
            .min_raise(self.last_raise_amount, self.settings.big_blind, self.stage)
    }

    pub fn max_raise_for(&self, player: &Player) -> Chips {
        self.rules.max_raise(
            player,
            self.current_bet,
            self.pot.total(),
            self.settings.big_blind,
            self.stage,
        )
    }

    pub fn can_raise(&self) -> bool {
        self.rules.can_raise(self.raise_count)
    }

    pub fn raise_count(&self) -> u8 {
        self.raise_count
    }

    /// A betting round is over when at most one player can still act, or
    /// when every player who can has acted and matched the table bet. A
    /// covering all-in therefore closes the round immediately; any
    /// unmatched excess comes back to the bettor through their own
    /// settlement tier.
    pub fn is_betting_round_complete(&self) -> bool {
        if self.active_player_count() <= 1 {
            return true;
        }
        self.players.iter().filter(|p| p.can_act()).all(|p| {
            p.hand.has_acted && p.hand.current_bet == self.current_bet
        })
    }

    /// How many players could still make a decision this hand.
    pub fn active_player_count(&self) -> usize {
        self.players.iter().filter(|p| p.can_act()).count()
    }

    pub fn players_in_hand(&self) -> usize {
        self.players.iter().filter(|p| p.in_hand()).count()
    }

    /// Everyone but the bettor gets the floor back after a full raise.
    fn reopen_round(&mut self, bettor: SeatIndex) {
        for (i, player) in self.players.iter_mut().enumerate() {
            if i != bettor && player.can_act() {
                player.hand.has_acted = false;
            }
        }
    }

    /// Apply one action from `player_id`. Out-of-turn and illegal actions
    /// are ignored; legal ones are clamped to the mode's bounds and
    /// applied, and the turn passes to the next active seat.
    pub fn apply_action(&mut self, player_id: &str, action: TableAction) -> ActionOutcome {
        if !self.stage.is_betting() {
            return ActionOutcome::Ignored;
        }
        let seat = self.current_player_index;
        let Some(player) = self.players.get(seat) else {
            return ActionOutcome::Ignored;
        };
        if player.id != player_id || !player.can_act() {
            return ActionOutcome::Ignored;
        }
        let to_call = self.to_call(player);

        let outcome = match action {
            TableAction::Fold => {
                self.players[seat].fold();
                ActionOutcome::Applied {
                    action: AppliedAction::Fold,
                    amount: 0,
                }
            }
            TableAction::Check => {
                if to_call > 0 {
                    return ActionOutcome::Ignored;
                }
                self.players[seat].hand.has_acted = true;
                ActionOutcome::Applied {
                    action: AppliedAction::Check,
                    amount: 0,
                }
            }
            TableAction::Call => {
                let paid = self.players[seat].place_bet(to_call);
                self.pot.add(paid);
                ActionOutcome::Applied {
                    action: AppliedAction::Call,
                    amount: paid,
                }
            }
            TableAction::Bet(requested) => {
                if self.current_bet > 0 || !self.can_raise() {
                    return ActionOutcome::Ignored;
                }
                let max = self.max_raise_for(player);
                let amount = requested.unwrap_or_else(|| self.min_bet()).max(self.min_bet()).min(max.max(self.min_bet()));
                let paid = self.players[seat].place_bet(amount);
                self.pot.add(paid);
                let new_bet = self.players[seat].hand.current_bet;
                self.last_raise_amount = new_bet;
                self.current_bet = new_bet;
                self.raise_count += 1;
                self.reopen_round(seat);
                ActionOutcome::Applied {
                    action: AppliedAction::Bet,
                    amount: paid,
                }
            }
            TableAction::Raise(requested) => {
                if self.current_bet == 0 || !self.can_raise() {
                    return ActionOutcome::Ignored;
                }
                let increment = requested.unwrap_or_else(|| self.min_raise()).max(self.min_raise());
                let target = (self.current_bet + increment).min(self.max_raise_for(player));
                self.apply_raise_to(seat, target, AppliedAction::Raise)
            }
            TableAction::AllIn => {
                let player = &self.players[seat];
                let target = player.hand.current_bet + player.chips;
                self.apply_raise_to(seat, target, AppliedAction::AllIn)
            }
        };

        if let ActionOutcome::Applied { .. } = outcome
            && self.stage.is_betting()
            && let Some(next) = self.next_active_after(seat)
        {
            self.current_player_index = next;
        }
        outcome
    }

    /// Bring `seat`'s bet up to `target`. A full raise moves the table
    /// bet and reopens the round; a short all-in that fails to top the
    /// table bet is just chips in the middle.
    fn apply_raise_to(
        &mut self,
        seat: SeatIndex,
        target: Chips,
        label: AppliedAction,
    ) -> ActionOutcome {
        let owed = target.saturating_sub(self.players[seat].hand.current_bet);
        if owed == 0 {
            return ActionOutcome::Ignored;
        }
        let paid = self.players[seat].place_bet(owed);
        self.pot.add(paid);
        let new_bet = self.players[seat].hand.current_bet;
        if new_bet > self.current_bet {
            self.last_raise_amount = new_bet - self.current_bet;
            self.current_bet = new_bet;
            self.raise_count += 1;
            self.reopen_round(seat);
        }
        ActionOutcome::Applied {
            action: label,
            amount: paid,
        }
    }

    /// If only one player still holds a claim on the pot, they win it
    /// without a showdown.
    pub fn award_uncontested(&mut self) -> Option<Winning> {
        if self.stage == Stage::Waiting || self.players_in_hand() != 1 {
            return None;
        }
        let amount = self.pot.total();
        let winner = self.players.iter_mut().find(|p| p.in_hand())?;
        winner.chips += amount;
        let winning = Winning {
            player_id: winner.id.clone(),
            name: winner.name.clone(),
            amount,
            hand: None,
        };
        self.pot.reset();
        self.stage = Stage::Showdown;
        info!(
            "room {}: {} wins {} uncontested",
            self.settings.room_id, winning.name, amount,
        );
        Some(winning)
    }

    /// Evaluate every live hand, split the contributions into tiered pots
    /// and pay each pot to its best eligible hand. Odd chips go to the
    /// tied winner nearest clockwise from the dealer.
    pub fn settle_showdown(&mut self) -> Result<Vec<Winning>, GameError> {
        self.stage = Stage::Showdown;
        let mut values: HashMap<SeatIndex, HandValue> = HashMap::new();
        for player in &self.players {
            if player.in_hand() {
                let mut cards = player.hand.cards.clone();
                cards.extend_from_slice(&self.community_cards);
                values.insert(player.seat, hand::evaluate(&cards)?);
            }
        }

        let n = self.players.len();
        let dealer = self.dealer_position;
        let clockwise_from_dealer = |seat: SeatIndex| (seat + n - dealer - 1) % n;

        // Chips from players who left mid-hand still fund the pots. They
        // enter the tiering as folded contributors, so they can never be
        // eligible for a payout themselves.
        let mut contributors = self.players.clone();
        for &bet in &self.departed_bets {
            let seat = contributors.len();
            let mut ghost = Player::new(format!("departed-{seat}"), String::new(), 0, seat);
            ghost.hand.total_bet = bet;
            ghost.hand.folded = true;
            contributors.push(ghost);
        }

        let mut credited: HashMap<SeatIndex, Chips> = HashMap::new();
        for pot in tiered_pots(&contributors) {
            let best = pot
                .eligible
                .iter()
                .filter_map(|seat| values.get(seat))
                .max()
                .cloned();
            let Some(best) = best else { continue };
            let mut winners: Vec<SeatIndex> = pot
                .eligible
                .iter()
                .copied()
                .filter(|seat| values.get(seat) == Some(&best))
                .collect();
            winners.sort_unstable_by_key(|&seat| clockwise_from_dealer(seat));
            let share = pot.amount / winners.len() as Chips;
            let remainder = pot.amount % winners.len() as Chips;
            for (i, &seat) in winners.iter().enumerate() {
                let extra = if i == 0 { remainder } else { 0 };
                *credited.entry(seat).or_default() += share + extra;
            }
        }

        let mut winnings = Vec::new();
        for (&seat, &amount) in &credited {
            let player = &mut self.players[seat];
            player.chips += amount;
            winnings.push(Winning {
                player_id: player.id.clone(),
                name: player.name.clone(),
                amount,
                hand: values.get(&seat).cloned(),
            });
        }
        winnings.sort_unstable_by(|a, b| b.amount.cmp(&a.amount));
        self.pot.reset();
        info!(
            "room {}: showdown settled across {} winner(s)",
            self.settings.room_id,
            winnings.len(),
        );
        Ok(winnings)
    }

    /// Close the hand out and rotate the button.
    pub fn end_hand(&mut self) {
        self.stage = Stage::Waiting;
        if !self.players.is_empty() {
            self.dealer_position = (self.dealer_position + 1) % self.players.len();
        }
    }

    /// Build `player_id`'s snapshot. Other players' hole cards are hidden
    /// unless the hand reached showdown and they never folded.
    pub fn view_for(&self, player_id: &str) -> Option<GameStateView> {
        let viewer = self.player(player_id)?;
        let showdown = self.stage == Stage::Showdown;
        let players = self
            .players
            .iter()
            .map(|p| {
                let is_self = p.id == viewer.id;
                let face_up = is_self || (showdown && !p.hand.folded);
                let cards = if face_up {
                    p.hand.cards.iter().copied().map(CardView::Up).collect()
                } else {
                    p.hand.cards.iter().map(|_| CardView::hidden()).collect()
                };
                PlayerView {
                    name: p.name.clone(),
                    position: p.seat,
                    chips: p.chips,
                    current_bet: p.hand.current_bet,
                    total_bet: p.hand.total_bet,
                    folded: p.hand.folded,
                    all_in: p.hand.all_in,
                    cards,
                    is_self,
                    is_dealer: p.seat == self.dealer_position,
                    is_small_blind: p.seat == self.sb_position(),
                    is_big_blind: p.seat == self.bb_position(),
                    is_current: self.stage.is_betting() && p.seat == self.current_player_index,
                }
            })
            .collect();

        let is_my_turn = self.stage.is_betting()
            && self.current_player().is_some_and(|p| p.id == viewer.id);
        let is_room_owner = self.is_owner(&viewer.id);
        Some(GameStateView {
            room_id: self.settings.room_id.clone(),
            room_name: self.settings.room_name.clone(),
            stage: self.stage,
            betting_mode: self.settings.betting_mode,
            community_cards: self.community_cards.clone(),
            pot_total: self.pot.total(),
            current_bet: self.current_bet,
            to_call: self.to_call(viewer),
            min_raise: self.min_raise(),
            // Zero tells the client no raise is permitted right now.
            max_raise: if self.can_raise() {
                self.max_raise_for(viewer)
            } else {
                0
            },
            raise_count: self.raise_count,
            max_raises: self.rules.max_raises_per_round(),
            can_raise: self.can_raise(),
            dealer_position: self.dealer_position,
            current_player_index: self.current_player_index,
            small_blind: self.settings.small_blind,
            big_blind: self.settings.big_blind,
            ante: self.settings.ante,
            players,
            is_my_turn,
            is_room_owner,
            can_start: is_room_owner
                && self.stage == Stage::Waiting
                && self.players.len() >= 2,
            remaining_secs: 0,
            action_log: Vec::new(),
            winners: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(mode: BettingMode) -> TableSettings {
        TableSettings {
            room_id: "TESTROOM".into(),
            room_name: "Test".into(),
            betting_mode: mode,
            small_blind: 10,
            big_blind: 20,
            ante: 0,
            max_players: 10,
        }
    }

    fn seated_table(mode: BettingMode, stacks: &[Chips]) -> Table {
        let mut table = Table::new(settings(mode));
        for (i, &chips) in stacks.iter().enumerate() {
            table
                .add_player(format!("p{i}"), format!("P{i}"), chips)
                .unwrap();
        }
        table
    }

    fn current_id(table: &Table) -> String {
        table.current_player().unwrap().id.clone()
    }

    #[test]
    fn every_player_count_deals_two_unique_cards_each() {
        for n in 2..=10 {
            let mut table = seated_table(BettingMode::NoLimit, &vec![1000; n]);
            table.start_new_hand().unwrap();
            let cards: Vec<Card> = table
                .players()
                .iter()
                .flat_map(|p| p.hand.cards.iter().copied())
                .collect();
            assert_eq!(cards.len(), 2 * n);
            let unique: std::collections::HashSet<Card> = cards.into_iter().collect();
            assert_eq!(unique.len(), 2 * n);
        }
    }

    #[test]
    fn needs_two_players_to_deal() {
        let mut table = seated_table(BettingMode::NoLimit, &[1000]);
        assert!(matches!(
            table.start_new_hand(),
            Err(GameError::NotEnoughPlayers)
        ));
    }

    #[test]
    fn table_full_rejects_the_eleventh_player() {
        let mut table = seated_table(BettingMode::NoLimit, &[1000; 10]);
        assert!(matches!(
            table.add_player("p10".into(), "P10".into(), 1000),
            Err(GameError::TableFull)
        ));
        // Rejoining an existing seat is fine.
        assert_eq!(table.add_player("p3".into(), "P3".into(), 1000), Ok(3));
    }

    #[test]
    fn heads_up_dealer_posts_small_blind_and_acts_first() {
        let mut table = seated_table(BettingMode::NoLimit, &[1000, 1000]);
        table.start_new_hand().unwrap();
        assert_eq!(table.stage(), Stage::Preflop);
        assert_eq!(table.sb_position(), 0);
        assert_eq!(table.bb_position(), 1);
        assert_eq!(current_id(&table), "p0");
        assert_eq!(table.players()[0].hand.current_bet, 10);
        assert_eq!(table.players()[1].hand.current_bet, 20);
        assert_eq!(table.pot_total(), 30);
    }

    #[test]
    fn three_handed_blinds_and_first_to_act() {
        let mut table = seated_table(BettingMode::NoLimit, &[1000, 1000, 1000]);
        table.start_new_hand().unwrap();
        assert_eq!(table.sb_position(), 1);
        assert_eq!(table.bb_position(), 2);
        assert_eq!(current_id(&table), "p0");
    }

    #[test]
    fn out_of_turn_actions_are_ignored() {
        let mut table = seated_table(BettingMode::NoLimit, &[1000, 1000, 1000]);
        table.start_new_hand().unwrap();
        assert_eq!(
            table.apply_action("p2", TableAction::Fold),
            ActionOutcome::Ignored
        );
        assert!(!table.players()[2].hand.folded);
    }

    #[test]
    fn check_with_a_live_bet_is_ignored() {
        let mut table = seated_table(BettingMode::NoLimit, &[1000, 1000]);
        table.start_new_hand().unwrap();
        assert_eq!(
            table.apply_action("p0", TableAction::Check),
            ActionOutcome::Ignored
        );
    }

    #[test]
    fn preflop_call_and_check_completes_the_round() {
        let mut table = seated_table(BettingMode::NoLimit, &[1000, 1000]);
        table.start_new_hand().unwrap();
        assert_eq!(
            table.apply_action("p0", TableAction::Call),
            ActionOutcome::Applied {
                action: AppliedAction::Call,
                amount: 10,
            }
        );
        assert!(table.is_betting_round_complete());
        table.advance_stage().unwrap();
        assert_eq!(table.stage(), Stage::Flop);
        assert_eq!(table.community_cards().len(), 3);
        // Big blind acts first postflop heads-up.
        assert_eq!(current_id(&table), "p1");
    }

    #[test]
    fn raise_moves_the_table_bet_and_reopens_action() {
        let mut table = seated_table(BettingMode::NoLimit, &[1000, 1000]);
        table.start_new_hand().unwrap();
        let outcome = table.apply_action("p0", TableAction::Raise(Some(40)));
        // Raise of 40 over the 20 blind: p0 had 10 in, pays 50 to reach 60.
        assert_eq!(
            outcome,
            ActionOutcome::Applied {
                action: AppliedAction::Raise,
                amount: 50,
            }
        );
        assert!(!table.is_betting_round_complete());
        let bb = table.player("p1").unwrap();
        assert_eq!(table.to_call(bb), 40);
    }

    #[test]
    fn raise_below_minimum_is_bumped_to_minimum() {
        let mut table = seated_table(BettingMode::NoLimit, &[1000, 1000]);
        table.start_new_hand().unwrap();
        table.apply_action("p0", TableAction::Raise(Some(5)));
        // Minimum raise is the big blind, so the table bet becomes 40.
        let bb = table.player("p1").unwrap();
        assert_eq!(table.to_call(bb), 20);
    }

    #[test]
    fn short_all_in_does_not_reopen_the_round() {
        let mut table = seated_table(BettingMode::NoLimit, &[1000, 1000, 35]);
        table.start_new_hand().unwrap();
        // p0 raises to 60; p1 folds; p2 (bb, 15 behind after blind) jams
        // short of the bet.
        table.apply_action("p0", TableAction::Raise(Some(40)));
        table.apply_action("p1", TableAction::Fold);
        let outcome = table.apply_action("p2", TableAction::AllIn);
        assert_eq!(
            outcome,
            ActionOutcome::Applied {
                action: AppliedAction::AllIn,
                amount: 15,
            }
        );
        // Table bet is untouched and the aggressor gets no new option.
        assert_eq!(table.raise_count(), 1);
        assert!(table.is_betting_round_complete());
    }

    #[test]
    fn limit_rejects_the_fifth_raise() {
        let mut table = seated_table(BettingMode::Limit, &[1000, 1000]);
        table.start_new_hand().unwrap();
        // Preflop the blind already sets the bet; four raises cap it.
        for _ in 0..4 {
            let who = current_id(&table);
            assert_ne!(
                table.apply_action(&who, TableAction::Raise(None)),
                ActionOutcome::Ignored
            );
        }
        assert_eq!(table.raise_count(), 4);
        let who = current_id(&table);
        assert_eq!(
            table.apply_action(&who, TableAction::Raise(None)),
            ActionOutcome::Ignored
        );
        // Capped at blind + four 20-chip raises.
        assert_eq!(table.current_bet, 100);
    }

    #[test]
    fn uncontested_pot_goes_to_the_last_player_standing() {
        let mut table = seated_table(BettingMode::NoLimit, &[1000, 1000]);
        table.start_new_hand().unwrap();
        table.apply_action("p0", TableAction::Fold);
        let winning = table.award_uncontested().unwrap();
        assert_eq!(winning.player_id, "p1");
        assert_eq!(winning.amount, 30);
        assert!(winning.hand.is_none());
        assert_eq!(table.player("p1").unwrap().chips, 1010);
        assert_eq!(table.pot_total(), 0);
    }

    #[test]
    fn chips_are_conserved_through_a_settled_hand() {
        let mut table = seated_table(BettingMode::NoLimit, &[1000, 1000, 1000]);
        table.start_new_hand().unwrap();
        while !table.is_betting_round_complete() {
            let who = current_id(&table);
            table.apply_action(&who, TableAction::Call);
        }
        for _ in 0..3 {
            table.advance_stage().unwrap();
            while !table.is_betting_round_complete() {
                let who = current_id(&table);
                table.apply_action(&who, TableAction::Check);
            }
        }
        let winnings = table.settle_showdown().unwrap();
        let won: Chips = winnings.iter().map(|w| w.amount).sum();
        assert_eq!(won, 60);
        let total: Chips = table.players().iter().map(|p| p.chips).sum();
        assert_eq!(total, 3000);
    }

    #[test]
    fn end_hand_rotates_the_button() {
        let mut table = seated_table(BettingMode::NoLimit, &[1000, 1000, 1000]);
        assert_eq!(table.dealer_position, 0);
        table.end_hand();
        assert_eq!(table.dealer_position, 1);
        assert_eq!(table.stage(), Stage::Waiting);
    }

    #[test]
    fn views_hide_other_players_hole_cards() {
        let mut table = seated_table(BettingMode::NoLimit, &[1000, 1000]);
        table.start_new_hand().unwrap();
        let view = table.view_for("p0").unwrap();
        let me = view.players.iter().find(|p| p.is_self).unwrap();
        let them = view.players.iter().find(|p| !p.is_self).unwrap();
        assert!(me.cards.iter().all(|c| matches!(c, CardView::Up(_))));
        assert!(them
            .cards
            .iter()
            .all(|c| matches!(c, CardView::Hidden { .. })));
        assert!(view.is_my_turn);
        assert!(table.view_for("stranger").is_none());
    }

    #[test]
    fn showdown_reveals_live_hands_only() {
        let mut table = seated_table(BettingMode::NoLimit, &[1000, 1000, 1000]);
        table.start_new_hand().unwrap();
        table.apply_action("p0", TableAction::Fold);
        while !table.is_betting_round_complete() {
            let who = current_id(&table);
            table.apply_action(&who, TableAction::Call);
        }
        for _ in 0..3 {
            table.advance_stage().unwrap();
            while !table.is_betting_round_complete() {
                let who = current_id(&table);
                table.apply_action(&who, TableAction::Check);
            }
        }
        table.settle_showdown().unwrap();
        let view = table.view_for("p1").unwrap();
        let folded = view.players.iter().find(|p| p.folded).unwrap();
        let live = view
            .players
            .iter()
            .find(|p| !p.folded && !p.is_self)
            .unwrap();
        assert!(folded
            .cards
            .iter()
            .all(|c| matches!(c, CardView::Hidden { .. })));
        assert!(live.cards.iter().all(|c| matches!(c, CardView::Up(_))));
    }

    #[test]
    fn covering_all_in_closes_the_round() {
        let mut table = seated_table(BettingMode::NoLimit, &[500, 500]);
        table.start_new_hand().unwrap();
        table.apply_action("p0", TableAction::AllIn);
        // Only the big blind could still act, so the round is over and the
        // board runs out; the uncalled excess comes back as its own tier.
        assert_eq!(table.active_player_count(), 1);
        assert!(table.is_betting_round_complete());
        while table.stage() != Stage::River {
            table.advance_stage().unwrap();
        }
        let winnings = table.settle_showdown().unwrap();
        let won: Chips = winnings.iter().map(|w| w.amount).sum();
        assert_eq!(won, 520);
        let total: Chips = table.players().iter().map(|p| p.chips).sum();
        assert_eq!(total, 1000);
    }

    #[test]
    fn mid_hand_leaver_chips_stay_in_the_pot() {
        let mut table = seated_table(BettingMode::NoLimit, &[1000, 1000, 1000]);
        table.start_new_hand().unwrap();
        table.apply_action("p0", TableAction::Raise(Some(40)));
        let leaver = table.remove_player("p0").unwrap();
        assert_eq!(leaver.chips, 940);
        assert_eq!(table.pot_total(), 90);
        while !table.is_betting_round_complete() {
            let who = current_id(&table);
            table.apply_action(&who, TableAction::Call);
        }
        for _ in 0..3 {
            table.advance_stage().unwrap();
            while !table.is_betting_round_complete() {
                let who = current_id(&table);
                table.apply_action(&who, TableAction::Check);
            }
        }
        let winnings = table.settle_showdown().unwrap();
        // The leaver's 60 chips are still in the pot and get paid out.
        let won: Chips = winnings.iter().map(|w| w.amount).sum();
        assert_eq!(won, 180);
        let seated: Chips = table.players().iter().map(|p| p.chips).sum();
        assert_eq!(seated + leaver.chips, 3000);
    }

    #[test]
    fn view_reports_no_raise_room_at_the_cap() {
        let mut table = seated_table(BettingMode::Limit, &[1000, 1000]);
        table.start_new_hand().unwrap();
        for _ in 0..4 {
            let who = current_id(&table);
            table.apply_action(&who, TableAction::Raise(None));
        }
        let who = current_id(&table);
        let view = table.view_for(&who).unwrap();
        assert!(!view.can_raise);
        assert_eq!(view.max_raise, 0);
        assert_eq!(view.max_raises, Some(4));
    }

    #[test]
    fn leaving_mid_hand_compacts_seats_and_fixes_markers() {
        let mut table = seated_table(BettingMode::NoLimit, &[1000, 1000, 1000]);
        table.start_new_hand().unwrap();
        // p0 is first to act; removing p0 hands the turn to the next seat.
        let removed = table.remove_player("p0").unwrap();
        assert_eq!(removed.id, "p0");
        assert_eq!(table.player_count(), 2);
        assert_eq!(table.players()[0].id, "p1");
        assert_eq!(table.players()[0].seat, 0);
        assert!(table.is_owner("p1"));
        assert_eq!(current_id(&table), "p1");
    }
}
