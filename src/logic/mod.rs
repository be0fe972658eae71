//! Tournament business logic: pairing, match resolution, rounds, batch simulation.

mod pairing;
mod resolver;
mod rounds;
mod simulation;

pub use pairing::{
    swiss_round_count, validate_pairings, EliminationBracket, PairingStrategy, RandomPairing,
    SwissPairing, SWISS_MAX_ATTEMPTS,
};
pub use resolver::{play, play_bye};
pub use rounds::{play_round, resolve_pairing, run_tournament};
pub use simulation::{
    one_loss_analysis, simulate, OneLossReport, RankStats, SimulationReport, SkillSummary,
};
