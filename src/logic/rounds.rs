//! Round orchestration: pair, resolve every pairing, advance.

use crate::logic::resolver::{play, play_bye};
use crate::models::{
    MatchConfig, MatchMode, MatchReport, Opponent, Pairing, Player, PlayerId, Tournament,
    TournamentError, TournamentState,
};
use rand::Rng;

fn position(players: &[Player], id: PlayerId) -> Result<usize, TournamentError> {
    players
        .iter()
        .position(|p| p.id == id)
        .ok_or(TournamentError::UnknownPlayer(id))
}

/// Two distinct players of the pool, mutably.
fn two_players_mut(
    players: &mut [Player],
    a: PlayerId,
    b: PlayerId,
) -> Result<(&mut Player, &mut Player), TournamentError> {
    let i = position(players, a)?;
    let j = position(players, b)?;
    if i == j {
        return Err(TournamentError::DuplicateOpponent {
            player: a,
            opponent: b,
        });
    }
    if i < j {
        let (left, right) = players.split_at_mut(j);
        Ok((&mut left[i], &mut right[0]))
    } else {
        let (left, right) = players.split_at_mut(i);
        Ok((&mut right[0], &mut left[j]))
    }
}

/// Resolve one pairing against the pool. Returns None for bye pairings.
pub fn resolve_pairing<R: Rng + ?Sized>(
    players: &mut [Player],
    pairing: &Pairing,
    config: &MatchConfig,
    mode: MatchMode,
    rng: &mut R,
) -> Result<Option<MatchReport>, TournamentError> {
    match (pairing.first, pairing.second) {
        (Opponent::Real(a), Opponent::Real(b)) => {
            let (first, second) = two_players_mut(players, a, b)?;
            play(first, second, config, mode, rng).map(Some)
        }
        (Opponent::Real(id), Opponent::Bye) | (Opponent::Bye, Opponent::Real(id)) => {
            let i = position(players, id)?;
            play_bye(&mut players[i], config, mode)?;
            Ok(None)
        }
        (Opponent::Bye, Opponent::Bye) => Ok(None),
    }
}

/// Play the next round. Any pairing or resolution error fails the tournament;
/// a finished tournament rejects further rounds with [`TournamentError::InvalidState`].
pub fn play_round(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.is_finished() {
        return Err(TournamentError::InvalidState);
    }
    if tournament.current_round >= tournament.round_count {
        tournament.state = TournamentState::Completed;
        return Ok(());
    }

    let round = tournament.current_round;
    tournament.state = TournamentState::Running { round };
    log::debug!(
        "<<< {} round {} of {}",
        tournament.strategy.name(),
        round + 1,
        tournament.round_count
    );

    let pairings = match tournament
        .strategy
        .pairings(&tournament.players, round, &mut tournament.rng)
    {
        Ok(pairings) => pairings,
        Err(e) => {
            tournament.state = TournamentState::Failed;
            return Err(e);
        }
    };
    let mode = tournament.strategy.match_mode(&pairings);

    for pairing in &pairings {
        if let Err(e) = resolve_pairing(
            &mut tournament.players,
            pairing,
            &tournament.config,
            mode,
            &mut tournament.rng,
        ) {
            log::warn!("round {} aborted: {}", round + 1, e);
            tournament.state = TournamentState::Failed;
            return Err(e);
        }
    }

    log::debug!(">>> end of round {} of {}", round + 1, tournament.round_count);
    tournament.current_round += 1;
    if tournament.current_round == tournament.round_count {
        tournament.state = TournamentState::Completed;
    }
    Ok(())
}

/// Play every remaining round.
pub fn run_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    while tournament.state != TournamentState::Completed {
        play_round(tournament)?;
    }
    Ok(())
}

impl Tournament {
    /// Play every remaining round, returning the tournament for chaining.
    pub fn run(&mut self) -> Result<&mut Self, TournamentError> {
        run_tournament(self)?;
        Ok(self)
    }

    pub fn play_round(&mut self) -> Result<(), TournamentError> {
        play_round(self)
    }
}
