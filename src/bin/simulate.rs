//! Batch tournament simulator: runs many tournaments and prints a JSON report.
//! Run with: cargo run --bin simulate
//! Configured through env: SIM_FORMAT (random, swiss, elimination, swiss-cut),
//! SIM_PLAYERS, SIM_ROUNDS, SIM_ITERATIONS, SIM_SEED, SIM_SIGMA, SIM_CUT,
//! SIM_ANALYSIS (points or one-loss), SIM_CONFIG (JSON match config path)
//! and SIM_CSV (per-rank CSV output path).

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::error::Error;
use std::str::FromStr;
use tournament_sim::{
    generate_players, one_loss_analysis, simulate, Format, MatchConfig, SimulationConfig,
    SimulationReport, Standing, Tournament,
};

fn default_players() -> usize {
    64
}

fn default_iterations() -> usize {
    1000
}

fn default_cut() -> usize {
    8
}

/// Parse an env var, falling back to `default` when unset.
fn env_or<T: FromStr>(name: &str, default: T) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(v) => v
            .trim()
            .parse()
            .map_err(|e| format!("{}={:?}: {}", name, v, e)),
        Err(_) => Ok(default),
    }
}

fn match_config() -> Result<MatchConfig, Box<dyn Error>> {
    let mut config = match std::env::var("SIM_CONFIG") {
        Ok(path) => {
            log::info!("Loading match config from {}", path);
            MatchConfig::from_json(&std::fs::read_to_string(path)?)?
        }
        Err(_) => MatchConfig::default(),
    };
    config.performance_sigma = env_or("SIM_SIGMA", config.performance_sigma)?;
    config.validate()?;
    Ok(config)
}

#[derive(Serialize)]
struct StageReport {
    swiss: Vec<Standing>,
    elimination: Vec<Standing>,
}

/// Swiss stage, then the top `cut` players seeded into a knock-out bracket.
fn swiss_cut(config: MatchConfig, players: usize, cut: usize, seed: u64) -> Result<StageReport, Box<dyn Error>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let pool = generate_players(players, &mut rng);

    let mut swiss = Tournament::swiss(pool, config.clone(), ChaCha8Rng::seed_from_u64(seed ^ 1))?;
    swiss.run()?.log_rankings();

    let mut elimination = Tournament::single_elimination(
        swiss.cut(cut),
        config,
        ChaCha8Rng::seed_from_u64(seed ^ 2),
    )?;
    elimination.run()?.log_rankings();

    Ok(StageReport {
        swiss: swiss.standings(),
        elimination: elimination.standings(),
    })
}

fn write_csv(path: &str, report: &SimulationReport) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(path)?;
    for stats in &report.rank_stats {
        writer.serialize(stats)?;
    }
    writer.flush()?;
    log::info!("Wrote {} rows to {}", report.rank_stats.len(), path);
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let format_name = std::env::var("SIM_FORMAT").unwrap_or_else(|_| "swiss".to_string());
    let players: usize = env_or("SIM_PLAYERS", default_players())?;
    let seed: u64 = env_or("SIM_SEED", 0)?;
    let config = match_config()?;

    if format_name.trim().eq_ignore_ascii_case("swiss-cut") {
        let cut: usize = env_or("SIM_CUT", default_cut())?;
        log::info!("Swiss stage of {} players, top {} advance", players, cut);
        let report = swiss_cut(config, players, cut, seed)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let sim = SimulationConfig {
        format: Format::from_str(&format_name)?,
        players,
        iterations: env_or("SIM_ITERATIONS", default_iterations())?,
        rounds: std::env::var("SIM_ROUNDS")
            .ok()
            .map(|r| r.trim().parse())
            .transpose()?,
        seed,
        match_config: config,
    };
    log::info!(
        "Simulating {} {:?} tournaments of {} players (sigma={})",
        sim.iterations,
        sim.format,
        sim.players,
        sim.match_config.performance_sigma
    );

    let analysis = std::env::var("SIM_ANALYSIS").unwrap_or_else(|_| "points".to_string());
    if analysis.trim().eq_ignore_ascii_case("one-loss") {
        let report = one_loss_analysis(&sim)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let report = simulate(&sim)?;
    if let Ok(path) = std::env::var("SIM_CSV") {
        write_csv(&path, &report)?;
    }
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
