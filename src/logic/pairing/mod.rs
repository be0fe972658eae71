//! Pairing strategies: random, Swiss and single-elimination.
//!
//! A strategy turns the current player pool into one round of disjoint pairs.
//! Random and Swiss search by bounded retry and fail with
//! [`TournamentError::Pairing`] once their attempt budget is spent.

mod elimination;
mod random;
mod swiss;

pub use elimination::EliminationBracket;
pub use random::RandomPairing;
pub use swiss::{swiss_round_count, SwissPairing, SWISS_MAX_ATTEMPTS};

use crate::models::{MatchMode, Opponent, Pairing, Player, PlayerId, TournamentError};
use rand::RngCore;
use std::collections::HashMap;
use std::fmt;

/// Produces each round's pairings for a tournament.
pub trait PairingStrategy: fmt::Debug {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Number of rounds a tournament of `player_count` players runs for.
    fn round_count(&self, player_count: usize) -> usize;

    /// Pair the active players for round `round` (0-based).
    fn pairings(
        &mut self,
        players: &[Player],
        round: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Pairing>, TournamentError>;

    /// How the matches of `pairings` are resolved.
    fn match_mode(&self, _pairings: &[Pairing]) -> MatchMode {
        MatchMode::Standard
    }
}

/// Ids of players not yet eliminated, in pool order.
pub(crate) fn active_slots(players: &[Player]) -> Vec<Opponent> {
    players
        .iter()
        .filter(|p| !p.eliminated)
        .map(Player::as_opponent)
        .collect()
}

/// Pair slot 0 with 1, 2 with 3, and so on. `slots` must have even length.
pub(crate) fn pair_adjacent(slots: &[Opponent]) -> Vec<Pairing> {
    slots
        .chunks_exact(2)
        .map(|c| Pairing::new(c[0], c[1]))
        .collect()
}

pub(crate) fn pairing_failed(players: &[Player], attempts: usize) -> TournamentError {
    TournamentError::Pairing {
        attempts,
        players: players.to_vec(),
    }
}

/// Check a round's pairings against the players' existing history.
///
/// Valid when no pair has met before (the bye counts as an opponent),
/// no pair is bye against bye, and every active player appears exactly once.
pub fn validate_pairings(players: &[Player], pairings: &[Pairing]) -> bool {
    let by_id: HashMap<PlayerId, &Player> = players.iter().map(|p| (p.id, p)).collect();
    let mut seen: HashMap<PlayerId, usize> = HashMap::new();

    for pairing in pairings {
        if pairing.first.is_bye() && pairing.second.is_bye() {
            return false;
        }
        for (side, other) in [
            (pairing.first, pairing.second),
            (pairing.second, pairing.first),
        ] {
            let Opponent::Real(id) = side else {
                continue;
            };
            let Some(player) = by_id.get(&id) else {
                return false;
            };
            if player.eliminated || player.has_faced(other) {
                return false;
            }
            *seen.entry(id).or_default() += 1;
        }
    }

    let active = players.iter().filter(|p| !p.eliminated).count();
    seen.len() == active && seen.values().all(|&n| n == 1)
}
