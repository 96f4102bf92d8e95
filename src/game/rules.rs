//! Betting-mode strategies.
//!
//! Each mode answers the same four questions (minimum bet, minimum raise
//! increment, maximum raise target, raise cap); the table asks through the
//! [`BettingRules`] trait and never branches on the mode itself.

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Chips, player::Player, table::Stage};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BettingMode {
    NoLimit,
    Limit,
    PotLimit,
}

impl fmt::Display for BettingMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::NoLimit => "no_limit",
            Self::Limit => "limit",
            Self::PotLimit => "pot_limit",
        };
        write!(f, "{repr}")
    }
}

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
#[error("unknown betting mode: {0}")]
pub struct UnknownBettingMode(pub String);

impl FromStr for BettingMode {
    type Err = UnknownBettingMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no_limit" => Ok(Self::NoLimit),
            "limit" => Ok(Self::Limit),
            "pot_limit" => Ok(Self::PotLimit),
            other => Err(UnknownBettingMode(other.to_string())),
        }
    }
}

/// The per-mode betting contract. `max_raise` returns the highest legal
/// total bet the player may raise to this action, already clamped to their
/// stack.
#[enum_dispatch]
pub trait BettingRules {
    fn min_bet(&self, big_blind: Chips, stage: Stage) -> Chips;

    fn min_raise(&self, last_raise_amount: Chips, big_blind: Chips, stage: Stage) -> Chips;

    fn max_raise(
        &self,
        player: &Player,
        current_bet: Chips,
        pot_total: Chips,
        big_blind: Chips,
        stage: Stage,
    ) -> Chips;

    /// `None` means unlimited raises per round.
    fn max_raises_per_round(&self) -> Option<u8> {
        None
    }

    fn can_raise(&self, raise_count: u8) -> bool {
        self.max_raises_per_round()
            .is_none_or(|cap| raise_count < cap)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NoLimitRule;

impl BettingRules for NoLimitRule {
    fn min_bet(&self, big_blind: Chips, _stage: Stage) -> Chips {
        big_blind
    }

    fn min_raise(&self, last_raise_amount: Chips, big_blind: Chips, _stage: Stage) -> Chips {
        last_raise_amount.max(big_blind)
    }

    fn max_raise(
        &self,
        player: &Player,
        _current_bet: Chips,
        _pot_total: Chips,
        _big_blind: Chips,
        _stage: Stage,
    ) -> Chips {
        player.hand.current_bet + player.chips
    }
}

/// Fixed-limit: the small bet (one big blind) on preflop and flop, the big
/// bet (two big blinds) on turn and river, and at most four raises per
/// round counting the opening bet.
#[derive(Clone, Copy, Debug, Default)]
pub struct LimitRule;

impl LimitRule {
    const MAX_RAISES: u8 = 4;

    fn bet_increment(big_blind: Chips, stage: Stage) -> Chips {
        match stage {
            Stage::Preflop | Stage::Flop => big_blind,
            _ => big_blind * 2,
        }
    }
}

impl BettingRules for LimitRule {
    fn min_bet(&self, big_blind: Chips, stage: Stage) -> Chips {
        Self::bet_increment(big_blind, stage)
    }

    fn min_raise(&self, _last_raise_amount: Chips, big_blind: Chips, stage: Stage) -> Chips {
        Self::bet_increment(big_blind, stage)
    }

    fn max_raise(
        &self,
        player: &Player,
        current_bet: Chips,
        _pot_total: Chips,
        big_blind: Chips,
        stage: Stage,
    ) -> Chips {
        let target = current_bet + Self::bet_increment(big_blind, stage);
        target.min(player.hand.current_bet + player.chips)
    }

    fn max_raises_per_round(&self) -> Option<u8> {
        Some(Self::MAX_RAISES)
    }
}

/// Pot-limit: the raise increment may not exceed the pot after the caller's
/// hypothetical call.
#[derive(Clone, Copy, Debug, Default)]
pub struct PotLimitRule;

impl BettingRules for PotLimitRule {
    fn min_bet(&self, big_blind: Chips, _stage: Stage) -> Chips {
        big_blind
    }

    fn min_raise(&self, last_raise_amount: Chips, big_blind: Chips, _stage: Stage) -> Chips {
        last_raise_amount.max(big_blind)
    }

    fn max_raise(
        &self,
        player: &Player,
        current_bet: Chips,
        pot_total: Chips,
        _big_blind: Chips,
        _stage: Stage,
    ) -> Chips {
        let to_call = current_bet.saturating_sub(player.hand.current_bet);
        let pot_after_call = pot_total + to_call;
        let target = current_bet + pot_after_call;
        target.min(player.hand.current_bet + player.chips)
    }
}

#[enum_dispatch(BettingRules)]
#[derive(Clone, Copy, Debug)]
pub enum BettingRule {
    NoLimit(NoLimitRule),
    Limit(LimitRule),
    PotLimit(PotLimitRule),
}

impl From<BettingMode> for BettingRule {
    fn from(mode: BettingMode) -> Self {
        match mode {
            BettingMode::NoLimit => Self::NoLimit(NoLimitRule),
            BettingMode::Limit => Self::Limit(LimitRule),
            BettingMode::PotLimit => Self::PotLimit(PotLimitRule),
        }
    }
}
