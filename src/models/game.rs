//! Pairing, MatchMode and MatchReport for 1v1 games.

use crate::models::player::{Opponent, PlayerId};
use serde::{Deserialize, Serialize};

/// Two sides meeting in one round. At most one side is the bye.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    pub first: Opponent,
    pub second: Opponent,
}

impl Pairing {
    pub fn new(first: impl Into<Opponent>, second: impl Into<Opponent>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }

    pub fn has_bye(&self) -> bool {
        self.first.is_bye() || self.second.is_bye()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.first == Opponent::Real(id) || self.second == Opponent::Real(id)
    }
}

/// How a round's matches are resolved.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Rematches are forbidden, ties are draws.
    #[default]
    Standard,
    /// Knock-out: the loser is placed at `rank_if_lost`, the survivor at half of it.
    Elimination { rank_if_lost: u32 },
}

impl MatchMode {
    pub fn is_elimination(self) -> bool {
        matches!(self, MatchMode::Elimination { .. })
    }
}

/// What happened in a single resolved match (for logging and tests).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub winner: PlayerId,
    pub loser: PlayerId,
    pub winner_points: u32,
    pub loser_points: u32,
    /// In elimination mode: who was knocked out. Differs from `loser` only on a coin-flipped tie.
    pub knocked_out: Option<PlayerId>,
}

impl MatchReport {
    pub fn diff(&self) -> u32 {
        self.winner_points - self.loser_points
    }

    pub fn is_tie(&self) -> bool {
        self.winner_points == self.loser_points
    }
}
