//! Batch simulation: many independent runs, failed runs discarded, statistics over the rest.

use crate::models::{
    generate_players, Format, Opponent, Outcome, Player, PlayerId, SimulationConfig, Tournament,
    TournamentError,
};
use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tournament points of the players at one skill rank (0 = most skilled).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankStats {
    pub skill_rank: usize,
    pub mean_points: f64,
    pub std_points: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub format: Format,
    pub players: usize,
    pub iterations: usize,
    pub completed: usize,
    /// Runs abandoned because a round could not be paired.
    pub failed: usize,
    pub rank_stats: Vec<RankStats>,
    pub generated_at: DateTime<Utc>,
}

/// Skill of a group of players and how much stronger their opponents were.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillSummary {
    pub count: usize,
    pub mean_skill: f64,
    pub std_skill: f64,
    /// Opponent skill minus player skill, over real opponents.
    pub mean_opponent_diff: f64,
    pub std_opponent_diff: f64,
}

/// Players with exactly one loss, split by whether it came first or last.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OneLossReport {
    pub completed: usize,
    pub failed: usize,
    pub lost_first_round: SkillSummary,
    pub lost_last_round: SkillSummary,
    pub generated_at: DateTime<Utc>,
}

/// Population mean and standard deviation; (0, 0) when empty.
fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

fn build(config: &SimulationConfig, rng: &mut ChaCha8Rng) -> Result<Tournament, TournamentError> {
    let players = generate_players(config.players, rng);
    let run_rng = ChaCha8Rng::seed_from_u64(rng.gen());
    let match_config = config.match_config.clone();
    match config.format {
        Format::Random => Tournament::random(players, config.random_rounds(), match_config, run_rng),
        Format::Swiss => Tournament::swiss(players, match_config, run_rng),
        Format::SingleElimination => Tournament::single_elimination(players, match_config, run_rng),
    }
}

/// Run `config.iterations` tournaments, calling `on_completed` for each one
/// that finished. Returns (completed, failed). Only pairing failures are
/// tolerated; any other error aborts the batch.
fn run_batch<F>(config: &SimulationConfig, mut on_completed: F) -> Result<(usize, usize), TournamentError>
where
    F: FnMut(&Tournament),
{
    let mut master = ChaCha8Rng::seed_from_u64(config.seed);
    let (mut completed, mut failed) = (0, 0);

    for i in 0..config.iterations {
        let mut rng = ChaCha8Rng::seed_from_u64(master.gen());
        let mut tournament = build(config, &mut rng)?;
        match tournament.run() {
            Ok(t) => {
                completed += 1;
                on_completed(t);
            }
            Err(TournamentError::Pairing { attempts, .. }) => {
                log::debug!("run {} discarded: pairing failed after {} attempts", i, attempts);
                failed += 1;
            }
            Err(e) => return Err(e),
        }
    }

    log::info!(
        "{:?}: {} of {} runs completed ({} failed)",
        config.format,
        completed,
        config.iterations,
        failed
    );
    Ok((completed, failed))
}

/// Tournament points by skill rank over all completed runs.
pub fn simulate(config: &SimulationConfig) -> Result<SimulationReport, TournamentError> {
    config.match_config.validate()?;
    let mut points_by_rank: Vec<Vec<f64>> = vec![Vec::new(); config.players];

    let (completed, failed) = run_batch(config, |t| {
        let mut by_skill: Vec<&Player> = t.players.iter().collect();
        by_skill.sort_by(|a, b| b.skill.total_cmp(&a.skill));
        for (rank, p) in by_skill.into_iter().enumerate() {
            points_by_rank[rank].push(f64::from(p.points()));
        }
    })?;

    let rank_stats = if completed == 0 {
        Vec::new()
    } else {
        points_by_rank
            .iter()
            .enumerate()
            .map(|(skill_rank, points)| {
                let (mean_points, std_points) = mean_std(points);
                RankStats {
                    skill_rank,
                    mean_points,
                    std_points,
                }
            })
            .collect()
    };

    Ok(SimulationReport {
        format: config.format,
        players: config.players,
        iterations: config.iterations,
        completed,
        failed,
        rank_stats,
        generated_at: Utc::now(),
    })
}

#[derive(Default)]
struct LossSamples {
    skills: Vec<f64>,
    opponent_diffs: Vec<f64>,
}

impl LossSamples {
    fn summary(&self) -> SkillSummary {
        let (mean_skill, std_skill) = mean_std(&self.skills);
        let (mean_opponent_diff, std_opponent_diff) = mean_std(&self.opponent_diffs);
        SkillSummary {
            count: self.skills.len(),
            mean_skill,
            std_skill,
            mean_opponent_diff,
            std_opponent_diff,
        }
    }
}

/// Compare one-loss players who lost their first match with those who lost their last.
pub fn one_loss_analysis(config: &SimulationConfig) -> Result<OneLossReport, TournamentError> {
    config.match_config.validate()?;
    let mut first = LossSamples::default();
    let mut last = LossSamples::default();

    let (completed, failed) = run_batch(config, |t| {
        let skills: HashMap<PlayerId, f64> = t.players.iter().map(|p| (p.id, p.skill)).collect();
        for p in &t.players {
            if p.losses() != 1 {
                continue;
            }
            let samples = if p.record.first() == Some(&Outcome::Loss) {
                &mut first
            } else if p.record.last() == Some(&Outcome::Loss) {
                &mut last
            } else {
                continue;
            };
            samples.skills.push(p.skill);
            samples.opponent_diffs.extend(
                p.opponents_faced
                    .iter()
                    .filter_map(|o| match o {
                        Opponent::Real(id) => skills.get(id),
                        Opponent::Bye => None,
                    })
                    .map(|s| s - p.skill),
            );
        }
    })?;

    Ok(OneLossReport {
        completed,
        failed,
        lost_first_round: first.summary(),
        lost_last_round: last.summary(),
        generated_at: Utc::now(),
    })
}
