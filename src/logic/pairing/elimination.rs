//! Single-elimination bracket, seeded top to bottom and padded with byes.

use super::{pairing_failed, PairingStrategy};
use crate::models::{MatchMode, Opponent, Pairing, Player, PlayerId, TournamentError};
use rand::RngCore;
use std::collections::HashMap;

/// Seeded knock-out bracket.
///
/// Slot `i` of each round is the survivor of pairing `i` of the previous
/// round; slots are folded first half against reversed second half, so the
/// top seed's path only meets the bottom seed in the final.
#[derive(Clone, Debug)]
pub struct EliminationBracket {
    seeds: Vec<Opponent>,
    bracket: Vec<Pairing>,
}

impl EliminationBracket {
    /// `seeded` is ordered best seed first. The bracket is padded to the next
    /// power of two (at least 2) with byes in the weakest seed positions.
    pub fn new(seeded: &[PlayerId]) -> Result<Self, TournamentError> {
        if seeded.is_empty() {
            return Err(TournamentError::NotEnoughPlayers);
        }
        let size = seeded.len().next_power_of_two().max(2);
        let mut seeds: Vec<Opponent> = seeded.iter().copied().map(Opponent::Real).collect();
        seeds.resize(size, Opponent::Bye);
        Ok(Self {
            seeds,
            bracket: Vec::new(),
        })
    }

    /// Bracket slots in seed order, byes included.
    pub fn seeds(&self) -> &[Opponent] {
        &self.seeds
    }

    pub fn size(&self) -> usize {
        self.seeds.len()
    }

    /// Pairings of the most recently built round.
    pub fn current(&self) -> &[Pairing] {
        &self.bracket
    }

    /// Winners of the current bracket, one per pairing, in bracket order.
    fn survivors(&self, players: &[Player]) -> Result<Vec<Opponent>, TournamentError> {
        let by_id: HashMap<PlayerId, &Player> = players.iter().map(|p| (p.id, p)).collect();
        let alive = |side: Opponent| match side {
            Opponent::Real(id) => by_id.get(&id).is_some_and(|p| !p.eliminated),
            Opponent::Bye => false,
        };
        self.bracket
            .iter()
            .map(|pairing| {
                [pairing.first, pairing.second]
                    .into_iter()
                    .find(|side| alive(*side))
                    .ok_or_else(|| pairing_failed(players, 0))
            })
            .collect()
    }
}

fn fold(slots: &[Opponent]) -> Vec<Pairing> {
    let half = slots.len() / 2;
    slots[..half]
        .iter()
        .zip(slots[half..].iter().rev())
        .map(|(a, b)| Pairing::new(*a, *b))
        .collect()
}

impl PairingStrategy for EliminationBracket {
    fn name(&self) -> &'static str {
        "single-elimination"
    }

    fn round_count(&self, _player_count: usize) -> usize {
        self.size().trailing_zeros() as usize
    }

    fn pairings(
        &mut self,
        players: &[Player],
        round: usize,
        _rng: &mut dyn RngCore,
    ) -> Result<Vec<Pairing>, TournamentError> {
        let slots = if round == 0 || self.bracket.is_empty() {
            self.seeds.clone()
        } else {
            self.survivors(players)?
        };
        self.bracket = fold(&slots);
        Ok(self.bracket.clone())
    }

    /// Losers this round are placed at twice the number of pairings.
    fn match_mode(&self, pairings: &[Pairing]) -> MatchMode {
        MatchMode::Elimination {
            rank_if_lost: pairings.len() as u32 * 2,
        }
    }
}
