//! Swiss pairing: players meet others on the same score, with one pair-down per odd tier.

use super::{active_slots, pair_adjacent, pairing_failed, validate_pairings, PairingStrategy};
use crate::models::{Opponent, Pairing, Player, PlayerId, TournamentError};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use std::collections::BTreeMap;

/// Tiering attempts per round before giving up.
pub const SWISS_MAX_ATTEMPTS: usize = 1000;

/// Rounds for a Swiss event of `player_count` players.
pub fn swiss_round_count(player_count: usize) -> usize {
    match player_count {
        0..=8 => 3,
        9..=24 => 4,
        25..=40 => 5,
        41..=288 => 6,
        289..=512 => 7,
        _ => 8,
    }
}

#[derive(Clone, Debug, Default)]
pub struct SwissPairing;

impl SwissPairing {
    pub fn new() -> Self {
        Self
    }
}

/// One randomized arrangement of slots, highest score tier first.
///
/// An odd tier floats one random member down; that player is paired with a
/// random member of the next tier before the rest of the tier is shuffled.
/// A player still floating below the last tier gets the bye.
fn tiered_slots<R: Rng + ?Sized>(players: &[Player], rng: &mut R) -> Vec<Opponent> {
    let mut tiers: BTreeMap<u32, Vec<PlayerId>> = BTreeMap::new();
    for p in players.iter().filter(|p| !p.eliminated) {
        tiers.entry(p.points()).or_default().push(p.id);
    }

    let mut slots = Vec::with_capacity(players.len() + 1);
    let mut pair_down: Option<PlayerId> = None;

    for (_, mut tier) in tiers.into_iter().rev() {
        if let Some(down) = pair_down.take() {
            let partner = tier.swap_remove(rng.gen_range(0..tier.len()));
            slots.push(Opponent::Real(down));
            slots.push(Opponent::Real(partner));
        }
        if tier.len() % 2 != 0 {
            pair_down = Some(tier.swap_remove(rng.gen_range(0..tier.len())));
        }
        tier.shuffle(rng);
        slots.extend(tier.into_iter().map(Opponent::Real));
    }

    if let Some(down) = pair_down {
        slots.push(Opponent::Real(down));
        slots.push(Opponent::Bye);
    }
    slots
}

impl PairingStrategy for SwissPairing {
    fn name(&self) -> &'static str {
        "swiss"
    }

    fn round_count(&self, player_count: usize) -> usize {
        swiss_round_count(player_count)
    }

    fn pairings(
        &mut self,
        players: &[Player],
        round: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Pairing>, TournamentError> {
        if round == 0 {
            let mut slots = active_slots(players);
            if slots.len() % 2 != 0 {
                slots.push(Opponent::Bye);
            }
            slots.shuffle(rng);
            return Ok(pair_adjacent(&slots));
        }

        for _ in 0..SWISS_MAX_ATTEMPTS {
            let pairings = pair_adjacent(&tiered_slots(players, rng));
            if validate_pairings(players, &pairings) {
                return Ok(pairings);
            }
        }

        log::warn!(
            "swiss pairing for round {} gave up after {} attempts",
            round + 1,
            SWISS_MAX_ATTEMPTS
        );
        Err(pairing_failed(players, SWISS_MAX_ATTEMPTS))
    }
}
