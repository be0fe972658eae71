//! Match resolution: decide a winner from noisy performances, draw point totals, update both players.

use crate::models::{
    MatchConfig, MatchMode, MatchReport, Opponent, Outcome, Player, TournamentError,
};
use rand::Rng;
use rand_distr::{Distribution, Normal};

const WINNER_POINTS_RANGE: (f64, f64) = (10.0, 100.0);
const LOSER_POINTS_RANGE: (f64, f64) = (0.0, 100.0);

/// Base margin of victory both sides receive before the differential is applied.
const MOV_BASE: i64 = 100;

fn normal(mean: f64, std: f64) -> Result<Normal<f64>, TournamentError> {
    Normal::new(mean, std).map_err(|e| TournamentError::InvalidConfig(e.to_string()))
}

/// One clamped, integer point total.
fn draw_points<R: Rng + ?Sized>(
    rng: &mut R,
    mean: f64,
    std: f64,
    (lo, hi): (f64, f64),
) -> Result<u32, TournamentError> {
    let sample = normal(mean, std)?.sample(rng);
    Ok(sample.round().clamp(lo, hi) as u32)
}

/// (winner points, loser points): the higher draw always goes to the winner.
fn determine_match_points<R: Rng + ?Sized>(
    config: &MatchConfig,
    rng: &mut R,
) -> Result<(u32, u32), TournamentError> {
    let a = draw_points(
        rng,
        config.winner_points_mean,
        config.winner_points_std,
        WINNER_POINTS_RANGE,
    )?;
    let b = draw_points(
        rng,
        config.loser_points_mean,
        config.loser_points_std,
        LOSER_POINTS_RANGE,
    )?;
    Ok((a.max(b), a.min(b)))
}

/// True if `a` outperforms `b` this match. An exact performance tie goes to `b`.
fn first_outperforms<R: Rng + ?Sized>(
    a: &Player,
    b: &Player,
    sigma: f64,
    rng: &mut R,
) -> Result<bool, TournamentError> {
    let a_perf = normal(a.skill, sigma)?.sample(rng);
    let b_perf = normal(b.skill, sigma)?.sample(rng);
    Ok(a_perf > b_perf)
}

/// Play a match between two real players and record the result in both.
///
/// Outside elimination mode, a pair that has met before is rejected with
/// [`TournamentError::DuplicateOpponent`] before anything is mutated.
pub fn play<R: Rng + ?Sized>(
    player: &mut Player,
    other: &mut Player,
    config: &MatchConfig,
    mode: MatchMode,
    rng: &mut R,
) -> Result<MatchReport, TournamentError> {
    if !mode.is_elimination()
        && (player.has_faced(other.as_opponent()) || other.has_faced(player.as_opponent()))
    {
        return Err(TournamentError::DuplicateOpponent {
            player: player.id,
            opponent: other.id,
        });
    }

    let player_wins = first_outperforms(player, other, config.performance_sigma, rng)?;
    let (winner_points, loser_points) = determine_match_points(config, rng)?;

    player.opponents_faced.insert(other.as_opponent());
    other.opponents_faced.insert(player.as_opponent());

    let (winner, loser) = if player_wins {
        (player, other)
    } else {
        (other, player)
    };
    let diff = i64::from(winner_points) - i64::from(loser_points);
    winner.mov += MOV_BASE + diff;
    loser.mov += MOV_BASE - diff;

    let mut report = MatchReport {
        winner: winner.id,
        loser: loser.id,
        winner_points,
        loser_points,
        knocked_out: None,
    };

    if winner_points != loser_points {
        loser.record_outcome(Outcome::Loss);
        if let MatchMode::Elimination { rank_if_lost } = mode {
            loser.eliminate(rank_if_lost);
            winner.advance(rank_if_lost / 2);
            report.knocked_out = Some(loser.id);
        }
        if report.diff() >= config.modified_win_threshold {
            winner.record_outcome(Outcome::FullWin);
        } else {
            // close loss: partial credit to the loser, nothing extra for the winner
            loser.record_outcome(Outcome::ModifiedWin);
        }
    } else if let MatchMode::Elimination { rank_if_lost } = mode {
        // tied on points: a coin flip decides who goes out
        let (out, survivor) = if rng.gen_bool(0.5) {
            (winner, loser)
        } else {
            (loser, winner)
        };
        out.eliminate(rank_if_lost);
        survivor.record_outcome(Outcome::FullWin);
        survivor.advance(rank_if_lost / 2);
        report.knocked_out = Some(out.id);
    } else {
        winner.record_outcome(Outcome::Draw);
        loser.record_outcome(Outcome::Draw);
    }

    log::debug!(
        "{} defeats {}: score {} - {}",
        report.winner,
        report.loser,
        winner_points,
        loser_points
    );
    if let Some(id) = report.knocked_out {
        log::debug!("...{} is knocked out", id);
    }

    Ok(report)
}

/// Give `player` a bye: a full win plus the configured bye margin of victory.
///
/// Outside elimination mode a second bye is rejected with [`TournamentError::DuplicateBye`].
pub fn play_bye(
    player: &mut Player,
    config: &MatchConfig,
    mode: MatchMode,
) -> Result<(), TournamentError> {
    if !mode.is_elimination() && player.has_faced(Opponent::Bye) {
        return Err(TournamentError::DuplicateBye { player: player.id });
    }
    player.opponents_faced.insert(Opponent::Bye);
    player.mov += config.bye_mov;
    player.record_outcome(Outcome::FullWin);
    if let MatchMode::Elimination { rank_if_lost } = mode {
        player.advance(rank_if_lost / 2);
    }
    log::debug!("{} has a bye", player);
    Ok(())
}
