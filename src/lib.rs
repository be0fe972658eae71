//! Tournament simulator: library with models and pairing/match logic.

pub mod logic;
pub mod models;

pub use logic::{
    one_loss_analysis, play, play_bye, play_round, resolve_pairing, run_tournament, simulate,
    swiss_round_count, validate_pairings, EliminationBracket, OneLossReport, PairingStrategy,
    RandomPairing, RankStats, SimulationReport, SkillSummary, SwissPairing, SWISS_MAX_ATTEMPTS,
};
pub use models::{
    generate_players, ranking_cmp, Format, MatchConfig, MatchMode, MatchReport, Opponent,
    Outcome, Pairing, Player, PlayerId, SimulationConfig, Standing, Tournament, TournamentError,
    TournamentId, TournamentState, UNRANKED,
};
