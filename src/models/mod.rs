//! Data structures for tournament simulation: players, pairings, configuration, tournament state.

mod config;
mod game;
mod player;
mod tournament;

pub use config::{Format, MatchConfig, SimulationConfig};
pub use game::{MatchMode, MatchReport, Pairing};
pub use player::{generate_players, Opponent, Outcome, Player, PlayerId, UNRANKED};
pub use tournament::{
    ranking_cmp, Standing, Tournament, TournamentError, TournamentId, TournamentState,
};
