//! Player, Opponent and per-round Outcome data structures.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::{Builder, Uuid};

/// Unique identifier for a player (used in pairings and lookups).
pub type PlayerId = Uuid;

/// Elimination rank of a player that has not been placed by a bracket yet.
/// Compares worse than any real rank.
pub const UNRANKED: u32 = u32::MAX;

/// The other side of a pairing: a real player or the bye placeholder.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Opponent {
    Real(PlayerId),
    Bye,
}

impl Opponent {
    pub fn is_bye(self) -> bool {
        matches!(self, Opponent::Bye)
    }

    /// Player id, or None for the bye.
    pub fn player_id(self) -> Option<PlayerId> {
        match self {
            Opponent::Real(id) => Some(id),
            Opponent::Bye => None,
        }
    }
}

impl From<PlayerId> for Opponent {
    fn from(id: PlayerId) -> Self {
        Opponent::Real(id)
    }
}

/// One scoring line item in a player's record.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    FullWin,
    ModifiedWin,
    Loss,
    Draw,
}

impl Outcome {
    /// Tournament points this line item is worth.
    pub const fn points(self) -> u32 {
        match self {
            Outcome::FullWin => 5,
            Outcome::ModifiedWin => 3,
            Outcome::Draw => 1,
            Outcome::Loss => 0,
        }
    }
}

/// A player in the tournament.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Latent skill in standard deviations from average. Never read by pairing.
    pub skill: f64,
    pub record: Vec<Outcome>,
    /// Margin of victory accumulated over all matches.
    pub mov: i64,
    /// Everyone this player has been paired with, the bye included.
    pub opponents_faced: HashSet<Opponent>,
    pub eliminated: bool,
    pub elimination_rank: u32,
}

impl Player {
    /// Create a new player with the given name and skill. Other fields start empty.
    pub fn new(name: impl Into<String>, skill: f64) -> Self {
        Self::with_id(Uuid::new_v4(), name, skill)
    }

    pub fn with_id(id: PlayerId, name: impl Into<String>, skill: f64) -> Self {
        Self {
            id,
            name: name.into(),
            skill,
            record: Vec::new(),
            mov: 0,
            opponents_faced: HashSet::new(),
            eliminated: false,
            elimination_rank: UNRANKED,
        }
    }

    /// Player with a standard-normal skill; id and skill both come from `rng`.
    pub fn random<R: Rng + ?Sized>(name: impl Into<String>, rng: &mut R) -> Self {
        let id = Builder::from_random_bytes(rng.gen()).into_uuid();
        let skill: f64 = rng.sample(StandardNormal);
        Self::with_id(id, name, skill)
    }

    pub fn as_opponent(&self) -> Opponent {
        Opponent::Real(self.id)
    }

    /// Sum of the point values of every record entry.
    pub fn points(&self) -> u32 {
        self.record.iter().map(|o| o.points()).sum()
    }

    pub fn losses(&self) -> usize {
        self.record.iter().filter(|o| **o == Outcome::Loss).count()
    }

    /// Rounds this player has been paired in (byes included).
    pub fn rounds_played(&self) -> usize {
        self.opponents_faced.len()
    }

    pub fn has_faced(&self, opponent: Opponent) -> bool {
        self.opponents_faced.contains(&opponent)
    }

    pub fn record_outcome(&mut self, outcome: Outcome) {
        self.record.push(outcome);
    }

    /// Knock the player out with a final rank. A rank, once assigned, is kept.
    pub fn eliminate(&mut self, rank: u32) {
        if self.eliminated {
            return;
        }
        self.eliminated = true;
        self.elimination_rank = rank;
    }

    /// Provisional rank for a player still alive in the bracket.
    pub fn advance(&mut self, rank: u32) {
        if !self.eliminated {
            self.elimination_rank = rank;
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Player \"{}\" skill={:.2} rank=", self.name, self.skill)?;
        if self.elimination_rank == UNRANKED {
            write!(f, "-")?;
        } else {
            write!(f, "{}", self.elimination_rank)?;
        }
        write!(f, " points={} mov={}>", self.points(), self.mov)
    }
}

/// Create `n` random players named "Player 1" through "Player n".
pub fn generate_players<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<Player> {
    (0..n)
        .map(|i| Player::random(format!("Player {}", i + 1), rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn points_sum_record_values() {
        let mut p = Player::new("A", 0.0);
        p.record_outcome(Outcome::FullWin);
        p.record_outcome(Outcome::Loss);
        p.record_outcome(Outcome::ModifiedWin);
        p.record_outcome(Outcome::Draw);
        assert_eq!(p.points(), 9);
        assert_eq!(p.losses(), 1);
    }

    #[test]
    fn eliminate_keeps_first_rank() {
        let mut p = Player::new("A", 0.0);
        p.advance(4);
        assert_eq!(p.elimination_rank, 4);
        p.eliminate(4);
        p.eliminate(2);
        p.advance(1);
        assert!(p.eliminated);
        assert_eq!(p.elimination_rank, 4);
    }

    #[test]
    fn random_players_are_reproducible_from_seed() {
        let a = generate_players(5, &mut ChaCha8Rng::seed_from_u64(7));
        let b = generate_players(5, &mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(a[4].name, "Player 5");
        let ids: HashSet<_> = a.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn display_marks_unranked() {
        let p = Player::new("A", 1.234);
        assert_eq!(p.to_string(), "<Player \"A\" skill=1.23 rank=- points=0 mov=0>");
    }
}
