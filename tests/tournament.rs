//! Integration tests for tournament runs: Swiss, random and knock-out formats, ranking and cut.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::cmp::Ordering;
use std::collections::HashMap;
use tournament_sim::{
    generate_players, ranking_cmp, MatchConfig, Opponent, Outcome, Player, PlayerId, Tournament,
    TournamentError, TournamentState, UNRANKED,
};

fn swiss(n: usize, seed: u64, config: MatchConfig) -> Tournament {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let players = generate_players(n, &mut rng);
    Tournament::swiss(players, config, ChaCha8Rng::seed_from_u64(seed + 1)).unwrap()
}

fn no_modified_wins() -> MatchConfig {
    MatchConfig {
        modified_win_threshold: 0,
        ..MatchConfig::default()
    }
}

fn assert_no_rematches(players: &[Player], rounds: usize) {
    for p in players {
        // every round adds one distinct opponent, so duplicates would shrink the set
        assert_eq!(p.opponents_faced.len(), rounds, "{}", p);
        for opp in &p.opponents_faced {
            if let Opponent::Real(id) = opp {
                let other = players.iter().find(|o| o.id == *id).unwrap();
                assert!(other.has_faced(p.as_opponent()));
            }
        }
    }
}

#[test]
fn eight_player_swiss_runs_three_rounds() {
    let mut completed = 0;
    for seed in 0..1000 {
        let mut t = swiss(8, seed * 2, no_modified_wins());
        assert_eq!(t.round_count, 3);
        match t.run().map(|_| ()) {
            Ok(()) => {
                completed += 1;
                assert_eq!(t.state, TournamentState::Completed);
                for p in &t.players {
                    assert_eq!(p.record.len(), 3, "{}", p);
                }
                assert_no_rematches(&t.players, 3);
            }
            Err(TournamentError::Pairing { .. }) => {
                assert_eq!(t.state, TournamentState::Failed);
            }
            Err(e) => panic!("seed {seed}: unexpected error {e}"),
        }
    }
    assert!(completed >= 500, "only {completed} of 1000 runs completed");
}

#[test]
fn swiss_with_modified_wins_still_plays_every_round() {
    let mut completed = 0;
    for seed in 0..200 {
        let mut t = swiss(13, seed * 2, MatchConfig::default());
        if t.run().is_ok() {
            completed += 1;
            assert_no_rematches(&t.players, 4);
            let byes = t
                .players
                .iter()
                .filter(|p| p.has_faced(Opponent::Bye))
                .count();
            // one bye per round, never twice to the same player
            assert_eq!(byes, 4);
        }
    }
    assert!(completed > 0);
}

#[test]
fn cut_returns_top_players_in_ranking_order() {
    let mut t = swiss(8, 42, MatchConfig::default());
    let mut seed = 42;
    while t.run().is_err() {
        seed += 2;
        t = swiss(8, seed, MatchConfig::default());
    }

    let top = t.cut(4);
    assert_eq!(top.len(), 4);
    for pair in top.windows(2) {
        assert_ne!(ranking_cmp(&pair[0], &pair[1]), Ordering::Greater);
    }

    let mut all: Vec<Player> = t.players.clone();
    all.sort_by(ranking_cmp);
    assert_eq!(top, all[..4].to_vec());
    // no one is eliminated in Swiss: points then mov decide
    assert!(top
        .windows(2)
        .all(|w| (w[0].points(), w[0].mov) >= (w[1].points(), w[1].mov)));
    assert!(t.players.iter().all(|p| p.elimination_rank == UNRANKED));
}

#[test]
fn ranking_puts_lower_elimination_rank_first() {
    let mut champion = Player::new("Champion", 0.0);
    champion.advance(1);
    let mut finalist = Player::new("Finalist", 0.0);
    finalist.eliminate(2);
    finalist.record_outcome(Outcome::FullWin);
    finalist.record_outcome(Outcome::FullWin);
    let mut semi = Player::new("Semi", 0.0);
    semi.eliminate(4);
    let mut a = Player::new("A", 0.0);
    a.eliminate(8);
    a.mov = 10;
    let mut b = Player::new("B", 0.0);
    b.eliminate(8);
    b.mov = 20;

    let t = Tournament::swiss(
        vec![a, semi, b, finalist, champion],
        MatchConfig::default(),
        ChaCha8Rng::seed_from_u64(0),
    )
    .unwrap();
    let names: Vec<&str> = t.ranked().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Champion", "Finalist", "Semi", "B", "A"]);

    let standings = t.standings();
    assert_eq!(standings[0].place, 1);
    assert_eq!(standings[0].elimination_rank, Some(1));
    assert_eq!(standings[1].points, 10);
}

#[test]
fn single_elimination_places_every_player() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let seeded = generate_players(8, &mut rng);
    let mut t = Tournament::single_elimination(seeded, MatchConfig::default(), rng).unwrap();
    assert_eq!(t.round_count, 3);
    t.run().unwrap();

    let mut ranks: Vec<u32> = t.players.iter().map(|p| p.elimination_rank).collect();
    ranks.sort_unstable();
    assert_eq!(ranks, [1, 2, 4, 4, 8, 8, 8, 8]);

    let alive: Vec<&Player> = t.active_players().collect();
    assert_eq!(alive.len(), 1);
    assert_eq!(alive[0].elimination_rank, 1);
    assert_eq!(t.ranked()[0].id, alive[0].id);
    assert_eq!(alive[0].opponents_faced.len(), 3);
}

#[test]
fn single_elimination_gives_top_seeds_the_byes() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let seeded = generate_players(5, &mut rng);
    let ids: Vec<PlayerId> = seeded.iter().map(|p| p.id).collect();
    let mut t = Tournament::single_elimination(seeded, MatchConfig::default(), rng).unwrap();
    assert_eq!(t.round_count, 3);

    t.play_round().unwrap();
    let by_id: HashMap<PlayerId, &Player> = t.players.iter().map(|p| (p.id, p)).collect();
    for id in &ids[..3] {
        let p = by_id[id];
        assert!(p.has_faced(Opponent::Bye));
        assert_eq!(p.record, vec![Outcome::FullWin]);
        assert_eq!(p.elimination_rank, 4);
    }
    assert!(by_id[&ids[3]].eliminated != by_id[&ids[4]].eliminated);

    t.run().unwrap();
    assert_eq!(t.active_players().count(), 1);
    let mut ranks: Vec<u32> = t.players.iter().map(|p| p.elimination_rank).collect();
    ranks.sort_unstable();
    assert_eq!(ranks, [1, 2, 4, 4, 8]);
}

#[test]
fn swiss_cut_feeds_an_elimination_stage() {
    let mut t = swiss(16, 7, MatchConfig::default());
    let mut seed = 7;
    while t.run().is_err() {
        seed += 2;
        t = swiss(16, seed, MatchConfig::default());
    }
    let top = t.cut(8);
    let swiss_rounds = t.round_count;

    let mut ko = Tournament::single_elimination(
        top.clone(),
        MatchConfig::default(),
        ChaCha8Rng::seed_from_u64(seed + 1000),
    )
    .unwrap();
    ko.run().unwrap();

    assert_eq!(ko.players.len(), 8);
    assert!(ko.players.iter().all(|p| p.rounds_played() >= swiss_rounds));
    assert_eq!(ko.ranked()[0].elimination_rank, 1);
}

#[test]
fn failed_round_fails_the_tournament() {
    // four players have only three distinct opponents
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let players = generate_players(4, &mut rng);
    let mut t = Tournament::random(players, 4, MatchConfig::default(), rng).unwrap();

    let err = t.run().unwrap_err();
    assert!(matches!(err, TournamentError::Pairing { .. }));
    assert_eq!(t.state, TournamentState::Failed);
    assert_eq!(t.play_round(), Err(TournamentError::InvalidState));
}

#[test]
fn single_player_random_tournament_gets_a_bye() {
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let players = generate_players(1, &mut rng);
    let mut t = Tournament::random(players, 1, MatchConfig::default(), rng).unwrap();
    t.run().unwrap();
    assert_eq!(t.players[0].record, vec![Outcome::FullWin]);
    assert_eq!(t.players[0].mov, 150);
}

#[test]
fn seeded_runs_are_reproducible() {
    let mut a = swiss(10, 99, MatchConfig::default());
    let mut b = swiss(10, 99, MatchConfig::default());
    let ra = a.run().map(|t| t.standings());
    let rb = b.run().map(|t| t.standings());
    assert_eq!(ra, rb);
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let config = MatchConfig {
        performance_sigma: f64::NAN,
        ..MatchConfig::default()
    };
    let players = generate_players(4, &mut ChaCha8Rng::seed_from_u64(1));
    assert!(matches!(
        Tournament::swiss(players, config, ChaCha8Rng::seed_from_u64(2)),
        Err(TournamentError::InvalidConfig(_))
    ));
}
