//! Tournament, TournamentState and TournamentError.

use crate::logic::{EliminationBracket, PairingStrategy, RandomPairing, SwissPairing};
use crate::models::config::MatchConfig;
use crate::models::player::{Outcome, Player, PlayerId, UNRANKED};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use thiserror::Error;
use uuid::{Builder, Uuid};

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TournamentError {
    /// The pairing strategy spent its attempt budget without a valid round.
    /// Carries the player pool as it was when pairing failed.
    #[error("pairing failed after {attempts} attempts ({} players)", .players.len())]
    Pairing { attempts: usize, players: Vec<Player> },
    #[error("duplicate opponent: {player} has already played {opponent}")]
    DuplicateOpponent { player: PlayerId, opponent: PlayerId },
    #[error("duplicate bye: {player} already had a bye")]
    DuplicateBye { player: PlayerId },
    #[error("player not found: {0}")]
    UnknownPlayer(PlayerId),
    #[error("need at least one player")]
    NotEnoughPlayers,
    #[error("invalid state for this action")]
    InvalidState,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Lifecycle of a tournament run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    #[default]
    NotStarted,
    /// Last round started (0-based).
    Running { round: usize },
    Completed,
    /// A round could not be paired or resolved. Results are void.
    Failed,
}

/// Ranking view of one player (for reports).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub place: usize,
    pub id: PlayerId,
    pub name: String,
    pub skill: f64,
    pub points: u32,
    pub mov: i64,
    /// None while the player has not been placed by a bracket.
    pub elimination_rank: Option<u32>,
    pub eliminated: bool,
    pub record: Vec<Outcome>,
}

/// A tournament: a fixed player pool, a pairing strategy and the RNG driving both.
#[derive(Debug)]
pub struct Tournament {
    pub id: TournamentId,
    pub players: Vec<Player>,
    pub state: TournamentState,
    pub round_count: usize,
    /// Next round to play (0-based).
    pub current_round: usize,
    pub config: MatchConfig,
    pub(crate) strategy: Box<dyn PairingStrategy>,
    pub(crate) rng: ChaCha8Rng,
}

/// Ranking order: lower elimination rank first, then more points, then more mov.
pub fn ranking_cmp(a: &Player, b: &Player) -> Ordering {
    (a.elimination_rank, Reverse(a.points()), Reverse(a.mov)).cmp(&(
        b.elimination_rank,
        Reverse(b.points()),
        Reverse(b.mov),
    ))
}

impl Tournament {
    /// Create a tournament with an explicit pairing strategy. The RNG drives
    /// pairing and match resolution, so a seeded RNG gives a reproducible run.
    pub fn new(
        players: Vec<Player>,
        strategy: Box<dyn PairingStrategy>,
        config: MatchConfig,
        mut rng: ChaCha8Rng,
    ) -> Result<Self, TournamentError> {
        config.validate()?;
        let round_count = strategy.round_count(players.len());
        let id = Builder::from_random_bytes(rng.gen()).into_uuid();
        Ok(Self {
            id,
            players,
            state: TournamentState::NotStarted,
            round_count,
            current_round: 0,
            config,
            strategy,
            rng,
        })
    }

    /// Randomly paired tournament of `rounds` rounds.
    pub fn random(
        players: Vec<Player>,
        rounds: usize,
        config: MatchConfig,
        rng: ChaCha8Rng,
    ) -> Result<Self, TournamentError> {
        Self::new(players, Box::new(RandomPairing::new(rounds)), config, rng)
    }

    /// Swiss tournament; the round count comes from [`crate::swiss_round_count`].
    pub fn swiss(
        players: Vec<Player>,
        config: MatchConfig,
        rng: ChaCha8Rng,
    ) -> Result<Self, TournamentError> {
        Self::new(players, Box::new(SwissPairing::new()), config, rng)
    }

    /// Knock-out bracket; `seeded` is ordered best seed first.
    pub fn single_elimination(
        seeded: Vec<Player>,
        config: MatchConfig,
        rng: ChaCha8Rng,
    ) -> Result<Self, TournamentError> {
        let ids: Vec<PlayerId> = seeded.iter().map(|p| p.id).collect();
        let bracket = EliminationBracket::new(&ids)?;
        Self::new(seeded, Box::new(bracket), config, rng)
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Players still in contention (not knocked out).
    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.eliminated)
    }

    /// All players, best first. Exactly equal keys keep pool order.
    pub fn ranked(&self) -> Vec<&Player> {
        let mut ranked: Vec<&Player> = self.players.iter().collect();
        ranked.sort_by(|a, b| ranking_cmp(a, b));
        ranked
    }

    /// Top `n` players by ranking, cloned so they can seed another stage.
    pub fn cut(&self, n: usize) -> Vec<Player> {
        self.ranked().into_iter().take(n).cloned().collect()
    }

    pub fn standings(&self) -> Vec<Standing> {
        self.ranked()
            .into_iter()
            .enumerate()
            .map(|(i, p)| Standing {
                place: i + 1,
                id: p.id,
                name: p.name.clone(),
                skill: p.skill,
                points: p.points(),
                mov: p.mov,
                elimination_rank: (p.elimination_rank != UNRANKED).then_some(p.elimination_rank),
                eliminated: p.eliminated,
                record: p.record.clone(),
            })
            .collect()
    }

    /// Log the current rankings at info level.
    pub fn log_rankings(&self) -> &Self {
        for player in self.ranked() {
            log::info!("{}", player);
        }
        self
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self.state,
            TournamentState::Completed | TournamentState::Failed
        )
    }
}
