//! Random pairing: shuffle the whole pool until a shuffle has no rematches.

use super::{active_slots, pair_adjacent, pairing_failed, validate_pairings, PairingStrategy};
use crate::models::{Opponent, Pairing, Player, TournamentError};
use rand::seq::SliceRandom;
use rand::RngCore;

/// Random pairing for a fixed number of rounds.
#[derive(Clone, Debug)]
pub struct RandomPairing {
    rounds: usize,
}

impl RandomPairing {
    pub fn new(rounds: usize) -> Self {
        Self { rounds }
    }
}

impl PairingStrategy for RandomPairing {
    fn name(&self) -> &'static str {
        "random"
    }

    fn round_count(&self, _player_count: usize) -> usize {
        self.rounds
    }

    /// Up to `players²` shuffles of the pool (plus a bye if odd), paired adjacently.
    fn pairings(
        &mut self,
        players: &[Player],
        _round: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Pairing>, TournamentError> {
        let mut slots = active_slots(players);
        let attempts = slots.len().pow(2);
        if slots.len() % 2 != 0 {
            slots.push(Opponent::Bye);
        }

        for _ in 0..attempts {
            slots.shuffle(rng);
            let pairings = pair_adjacent(&slots);
            if validate_pairings(players, &pairings) {
                return Ok(pairings);
            }
        }

        log::warn!("random pairing gave up after {} attempts", attempts);
        Err(pairing_failed(players, attempts))
    }
}
