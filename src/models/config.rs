//! Match-resolution and batch-simulation parameters.

use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};

/// Parameters of the stochastic performance and point models.
/// Every field is optional when deserializing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Std deviation of a player's per-match performance around their skill.
    pub performance_sigma: f64,
    pub winner_points_mean: f64,
    pub winner_points_std: f64,
    pub loser_points_mean: f64,
    pub loser_points_std: f64,
    /// Point differential at or above which the winner earns a full win.
    pub modified_win_threshold: u32,
    /// Margin of victory credited for a bye.
    pub bye_mov: i64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            performance_sigma: 0.7,
            winner_points_mean: 80.0,
            winner_points_std: 15.0,
            loser_points_mean: 50.0,
            loser_points_std: 25.0,
            modified_win_threshold: 12,
            bye_mov: 150,
        }
    }
}

impl MatchConfig {
    /// Reject parameters the normal distributions cannot be built from.
    pub fn validate(&self) -> Result<(), TournamentError> {
        let stds = [
            ("performance_sigma", self.performance_sigma),
            ("winner_points_std", self.winner_points_std),
            ("loser_points_std", self.loser_points_std),
        ];
        for (name, v) in stds {
            if !v.is_finite() || v < 0.0 {
                return Err(TournamentError::InvalidConfig(format!(
                    "{} must be finite and non-negative (got {})",
                    name, v
                )));
            }
        }
        for (name, v) in [
            ("winner_points_mean", self.winner_points_mean),
            ("loser_points_mean", self.loser_points_mean),
        ] {
            if !v.is_finite() {
                return Err(TournamentError::InvalidConfig(format!("{} must be finite", name)));
            }
        }
        Ok(())
    }

    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(s: &str) -> Result<Self, TournamentError> {
        let config: Self =
            serde_json::from_str(s).map_err(|e| TournamentError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Tournament format of a batch simulation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Random,
    #[default]
    Swiss,
    /// Bracket seeded in generation order (skills are random, so seeding is too).
    SingleElimination,
}

impl std::str::FromStr for Format {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Format::Random),
            "swiss" => Ok(Format::Swiss),
            "elimination" | "single_elimination" | "single-elimination" => {
                Ok(Format::SingleElimination)
            }
            other => Err(TournamentError::InvalidConfig(format!(
                "unknown format: {}",
                other
            ))),
        }
    }
}

/// Parameters of a batch of independent tournament runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub format: Format,
    pub players: usize,
    pub iterations: usize,
    /// Rounds for the random format; defaults to ceil(log2(players)).
    pub rounds: Option<usize>,
    /// Master seed; each run gets its own seed drawn from it.
    pub seed: u64,
    pub match_config: MatchConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            format: Format::Swiss,
            players: 64,
            iterations: 1000,
            rounds: None,
            seed: 0,
            match_config: MatchConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn random_rounds(&self) -> usize {
        self.rounds
            .unwrap_or_else(|| self.players.next_power_of_two().trailing_zeros() as usize)
    }
}
