//! Integration tests for finalizing matches and advancing the bracket.

mod common;

use chrono::Duration;
use common::{seeded, start_date, unseeded};
use std::sync::Arc;
use tennis_bracket_web::{
    finalize_match, set_referee_availability, BracketMatch, EngineConfig, MatchResult, MatchStatus, NewMatch, PhaseName,
    Store, TournamentError, TournamentStatus,
};

fn phase_matches(store: &Store, tournament_id: u64, name: PhaseName) -> Vec<BracketMatch> {
    store
        .read(|s| match s.phase_by_name(tournament_id, name) {
            Some(phase) => s.matches_in_phase(tournament_id, phase.id).cloned().collect(),
            None => Vec::new(),
        })
}

#[test]
fn round_of_16_advances_after_last_match() {
    let f = seeded(16);
    assert_eq!(f.opening.len(), 8);

    for &m in &f.opening[..7] {
        let outcome = f.finalize_first(m);
        assert!(!outcome.phase_completed);
        assert!(outcome.next_phase_matches.is_empty());
    }
    assert!(phase_matches(&f.store, f.tournament_id, PhaseName::Quarterfinal).is_empty());

    let outcome = f.finalize_first(f.opening[7]);
    assert!(outcome.phase_completed);
    assert_eq!(outcome.next_phase, Some(PhaseName::Quarterfinal));
    assert_eq!(outcome.next_phase_matches.len(), 4);
    assert!(outcome.byes.is_empty());

    // Seeding paired (p0, p1), (p2, p3), ...; player one won every match.
    let p = &f.players;
    let quarterfinals = phase_matches(&f.store, f.tournament_id, PhaseName::Quarterfinal);
    let pairs: Vec<_> = quarterfinals
        .iter()
        .map(|m| (m.player_one, m.player_two))
        .collect();
    assert_eq!(
        pairs,
        vec![(p[0], p[2]), (p[4], p[6]), (p[8], p[10]), (p[12], p[14])]
    );
    assert_eq!(
        quarterfinals.iter().map(|m| m.id).collect::<Vec<_>>(),
        outcome.next_phase_matches
    );
    for m in &quarterfinals {
        assert_eq!(m.status, MatchStatus::Scheduled);
        assert_eq!(m.winner, None);
        assert_eq!(m.score, None);
    }
}

#[test]
fn next_phase_matches_follow_schedule_policy() {
    let f = seeded(16);
    for &m in &f.opening {
        f.finalize_first(m);
    }
    let quarterfinals = phase_matches(&f.store, f.tournament_id, PhaseName::Quarterfinal);
    // QUARTERFINAL is the second phase of a 16-player bracket: days 2..3.
    let phase_start = start_date() + Duration::days(2);
    for (i, m) in quarterfinals.iter().enumerate() {
        assert_eq!(m.match_date, phase_start + Duration::minutes(120 * i as i64));
        assert_eq!(m.court_number, (i % 4) as u32 + 1);
        assert_eq!(m.referee_id, f.referees[i % f.referees.len()]);
    }
}

#[test]
fn scoring_follows_phase_table() {
    let f = seeded(16);
    let m = f.opening[0];
    let (winner, loser, referee) = f
        .store
        .read(|s| {
            let m = s.bracket_match(m).unwrap();
            (m.player_one, m.player_two, m.referee_id)
        });

    let outcome = f.finalize(m, winner).unwrap();
    assert_eq!(outcome.phase, PhaseName::RoundOf16);
    assert_eq!(outcome.scores.winner.points, 10);
    assert_eq!(outcome.scores.loser.points, 5);
    assert_eq!(outcome.scores.referee.points, 3);
    assert_eq!(f.score_of(winner), 10);
    assert_eq!(f.score_of(loser), 5);
    assert_eq!(f.referee_score(referee), 3);
}

#[test]
fn phase_outside_table_leaves_scores_unchanged() {
    let f = seeded(64);
    let m = f.opening[0];
    let winner = f.player_one(m);
    let outcome = f.finalize(m, winner).unwrap();
    assert_eq!(outcome.phase, PhaseName::RoundOf64);
    assert_eq!(outcome.scores.winner.points, 0);
    assert_eq!(f.score_of(winner), 0);
}

#[test]
fn final_crowns_champion_with_full_bonus() {
    let f = seeded(2);
    let m = f.opening[0];
    let (champion, runner_up) = (f.players[0], f.players[1]);

    let outcome = f.finalize(m, champion).unwrap();
    assert!(outcome.phase_completed);
    assert_eq!(outcome.champion, Some(champion));
    assert_eq!(outcome.champion_bonus, 100);
    assert_eq!(outcome.scores.winner.points, 200);
    assert_eq!(f.score_of(champion), 200);
    assert_eq!(f.score_of(runner_up), 60);
    assert_eq!(outcome.next_phase, None);

    let tournament = f
        .store
        .read(|s| s.tournament(f.tournament_id).cloned())
        .unwrap();
    assert_eq!(tournament.status, TournamentStatus::Completed);
    assert_eq!(tournament.champion, Some(champion));
}

#[test]
fn progressive_table_pays_terminal_value() {
    let mut f = seeded(2);
    f.config = EngineConfig {
        scoring: tennis_bracket_web::ScoringTable::progressive(),
        ..EngineConfig::default()
    };
    let outcome = f.finalize(f.opening[0], f.players[1]).unwrap();
    assert_eq!(outcome.champion_bonus, 160);
    assert_eq!(f.score_of(f.players[1]), 320);
    assert_eq!(f.score_of(f.players[0]), 0);
}

#[test]
fn eight_player_bracket_plays_to_completion() {
    let f = seeded(8);
    let mut current = f.opening.clone();
    let mut phases = Vec::new();
    loop {
        let mut last = None;
        for &m in &current {
            last = Some(f.finalize_first(m));
        }
        let last = last.unwrap();
        phases.push(last.phase);
        if last.champion.is_some() {
            assert_eq!(last.champion, Some(f.players[0]));
            break;
        }
        current = last.next_phase_matches;
    }
    assert_eq!(
        phases,
        vec![PhaseName::Quarterfinal, PhaseName::Semifinal, PhaseName::Final]
    );
    // 25 + 50 + 100 + 100 bonus
    assert_eq!(f.score_of(f.players[0]), 275);
    // Lost the final after winning QF and SF: 25 + 50 + 60
    assert_eq!(f.score_of(f.players[4]), 135);
    let all_completed = f
        .store
        .read(|s| s.matches_of(f.tournament_id).all(|m| m.is_completed()));
    assert!(all_completed);
}

#[test]
fn invalid_winner_changes_nothing() {
    let f = seeded(4);
    let m = f.opening[0];
    let outsider = f.players[3];
    let err = f.finalize(m, outsider).unwrap_err();
    assert_eq!(
        err,
        TournamentError::InvalidWinner {
            match_id: m,
            winner: outsider
        }
    );
    let stored = f
        .store
        .read(|s| s.bracket_match(m).cloned())
        .unwrap();
    assert_eq!(stored.status, MatchStatus::Scheduled);
    assert_eq!(stored.winner, None);
    assert!(f.players.iter().all(|&p| f.score_of(p) == 0));
}

#[test]
fn second_finalize_is_rejected_without_double_scoring() {
    let f = seeded(4);
    let m = f.opening[0];
    let winner = f.player_one(m);
    f.finalize(m, winner).unwrap();
    assert_eq!(f.score_of(winner), 50);

    let err = f.finalize(m, winner).unwrap_err();
    assert_eq!(err, TournamentError::AlreadyCompleted(m));
    assert_eq!(f.score_of(winner), 50);
}

#[test]
fn blank_score_and_unknown_match_are_rejected() {
    let f = seeded(4);
    let m = f.opening[0];
    let winner = f.player_one(m);
    let blank = MatchResult {
        score: "  ".into(),
        winner,
    };
    let err = f
        .store
        .transaction(|s| finalize_match(s, &f.config, m, blank))
        .unwrap_err();
    assert_eq!(err, TournamentError::EmptyScore(m));

    let err = f.finalize(9_999, winner).unwrap_err();
    assert_eq!(err, TournamentError::MatchNotFound(9_999));
    assert_eq!(err.kind(), tennis_bracket_web::ErrorKind::NotFound);
}

#[test]
fn in_progress_match_can_be_finalized() {
    let f = seeded(4);
    let m = f.opening[0];
    f.store
        .transaction(|s| tennis_bracket_web::start_match(s, m))
        .unwrap();
    let outcome = f.finalize_first(m);
    assert!(!outcome.phase_completed);
    let err = f
        .store
        .transaction(|s| tennis_bracket_web::start_match(s, m))
        .unwrap_err();
    assert_eq!(err, TournamentError::AlreadyCompleted(m));
}

#[test]
fn odd_phase_gives_leftover_winner_a_bye() {
    let f = unseeded(6, 1);
    let p = f.players.clone();
    let referee = f.referees[0];
    let matches = f
        .store
        .transaction(|s| {
            let qf = s.insert_phase(
                f.tournament_id,
                PhaseName::Quarterfinal,
                start_date(),
                start_date() + Duration::days(1),
            );
            let ids: Vec<_> = [(p[0], p[1]), (p[2], p[3]), (p[4], p[5])]
                .iter()
                .enumerate()
                .map(|(i, &(a, b))| {
                    s.insert_match(NewMatch {
                        tournament_id: f.tournament_id,
                        phase_id: qf,
                        player_one: a,
                        player_two: b,
                        referee_id: referee,
                        match_date: start_date(),
                        court_number: i as u32 + 1,
                    })
                })
                .collect();
            Ok::<_, TournamentError>(ids)
        })
        .unwrap();

    f.finalize_first(matches[0]);
    f.finalize_first(matches[1]);
    let outcome = f.finalize_first(matches[2]);
    assert_eq!(outcome.next_phase, Some(PhaseName::Semifinal));
    assert_eq!(outcome.next_phase_matches.len(), 1);
    assert_eq!(outcome.byes, vec![p[4]]);

    // The semifinal phase did not exist yet; it starts where the quarterfinal ended.
    let semifinal = f
        .store
        .read(|s| s.phase_by_name(f.tournament_id, PhaseName::Semifinal).cloned())
        .unwrap();
    assert_eq!(semifinal.start_date, start_date() + Duration::days(1));

    let sf = phase_matches(&f.store, f.tournament_id, PhaseName::Semifinal);
    assert_eq!((sf[0].player_one, sf[0].player_two), (p[0], p[2]));

    let outcome = f.finalize_first(sf[0].id);
    assert_eq!(outcome.next_phase, Some(PhaseName::Final));
    let finals = phase_matches(&f.store, f.tournament_id, PhaseName::Final);
    assert_eq!(finals.len(), 1);
    assert_eq!((finals[0].player_one, finals[0].player_two), (p[0], p[4]));
}

#[test]
fn sole_survivor_of_semifinal_is_champion_without_bonus() {
    let f = unseeded(2, 1);
    let m = f
        .store
        .transaction(|s| {
            let phase = s.insert_phase(
                f.tournament_id,
                PhaseName::Semifinal,
                start_date(),
                start_date() + Duration::days(1),
            );
            Ok::<_, TournamentError>(s.insert_match(NewMatch {
                tournament_id: f.tournament_id,
                phase_id: phase,
                player_one: f.players[0],
                player_two: f.players[1],
                referee_id: f.referees[0],
                match_date: start_date(),
                court_number: 1,
            }))
        })
        .unwrap();

    let winner = f.players[1];
    let outcome = f.finalize(m, winner).unwrap();
    assert!(outcome.phase_completed);
    assert_eq!(outcome.champion, Some(winner));
    assert_eq!(outcome.champion_bonus, 0);
    assert_eq!(outcome.next_phase, None);
    assert!(outcome.next_phase_matches.is_empty());
    assert_eq!(f.score_of(winner), 50);

    let tournament = f
        .store
        .read(|s| s.tournament(f.tournament_id).cloned())
        .unwrap();
    assert_eq!(tournament.status, TournamentStatus::Completed);
    assert_eq!(tournament.champion, Some(winner));
    assert!(phase_matches(&f.store, f.tournament_id, PhaseName::Final).is_empty());
}

#[test]
fn withdrawn_referees_are_replaced_by_previous_phase_officials() {
    let f = seeded(8);
    let opening_referees: Vec<_> = f.store.read(|s| {
        f.opening
            .iter()
            .map(|&m| s.bracket_match(m).unwrap().referee_id)
            .collect()
    });
    assert_eq!(
        opening_referees,
        vec![f.referees[0], f.referees[1], f.referees[2], f.referees[0]]
    );
    f.store
        .transaction(|s| {
            for &r in &f.referees {
                set_referee_availability(s, f.tournament_id, r, false)?;
            }
            Ok::<_, TournamentError>(())
        })
        .unwrap();

    for &m in &f.opening {
        f.finalize_first(m);
    }
    let semifinals = phase_matches(&f.store, f.tournament_id, PhaseName::Semifinal);
    let referees: Vec<_> = semifinals.iter().map(|m| m.referee_id).collect();
    assert_eq!(referees, opening_referees[..2].to_vec());
}

#[test]
fn first_round_placeholder_never_advances() {
    let f = unseeded(2, 1);
    let m = f
        .store
        .transaction(|s| {
            let phase = s.insert_phase(
                f.tournament_id,
                PhaseName::FirstRound,
                start_date(),
                start_date() + Duration::days(1),
            );
            Ok::<_, TournamentError>(s.insert_match(NewMatch {
                tournament_id: f.tournament_id,
                phase_id: phase,
                player_one: f.players[0],
                player_two: f.players[1],
                referee_id: f.referees[0],
                match_date: start_date(),
                court_number: 1,
            }))
        })
        .unwrap();
    let outcome = f.finalize_first(m);
    assert!(outcome.phase_completed);
    assert_eq!(outcome.next_phase, None);
    assert!(outcome.next_phase_matches.is_empty());
    assert_eq!(outcome.champion, None);
    assert_eq!(f.score_of(f.players[0]), 0);
}

#[test]
fn existing_next_phase_matches_abort_the_whole_finalize() {
    let f = seeded(4);
    let final_phase = f
        .store
        .read(|s| s.phase_by_name(f.tournament_id, PhaseName::Final).map(|p| p.id))
        .unwrap();
    f.store
        .transaction(|s| {
            Ok::<_, TournamentError>(s.insert_match(NewMatch {
                tournament_id: f.tournament_id,
                phase_id: final_phase,
                player_one: f.players[0],
                player_two: f.players[2],
                referee_id: f.referees[0],
                match_date: start_date(),
                court_number: 1,
            }))
        })
        .unwrap();

    f.finalize_first(f.opening[0]);
    let last = f.opening[1];
    let err = f.finalize(last, f.player_one(last)).unwrap_err();
    assert_eq!(
        err,
        TournamentError::NextPhaseAlreadyGenerated {
            tournament_id: f.tournament_id,
            phase: PhaseName::Final
        }
    );
    // Rolled back: the match is still open and its players unscored.
    let stored = f
        .store
        .read(|s| s.bracket_match(last).cloned())
        .unwrap();
    assert!(!stored.is_completed());
    assert_eq!(f.score_of(stored.player_one), 0);
}

#[test]
fn missing_referee_is_an_integrity_error_and_rolls_back() {
    let f = unseeded(2, 1);
    let m = f
        .store
        .transaction(|s| {
            let phase = s.insert_phase(
                f.tournament_id,
                PhaseName::Final,
                start_date(),
                start_date() + Duration::days(1),
            );
            Ok::<_, TournamentError>(s.insert_match(NewMatch {
                tournament_id: f.tournament_id,
                phase_id: phase,
                player_one: f.players[0],
                player_two: f.players[1],
                referee_id: 4_242,
                match_date: start_date(),
                court_number: 1,
            }))
        })
        .unwrap();
    let err = f.finalize(m, f.players[0]).unwrap_err();
    assert_eq!(
        err,
        TournamentError::DanglingReferee {
            match_id: m,
            referee_id: 4_242
        }
    );
    assert_eq!(err.kind(), tennis_bracket_web::ErrorKind::Integrity);
    assert_eq!(f.score_of(f.players[0]), 0);
    let completed = f
        .store
        .read(|s| s.bracket_match(m).map(|m| m.is_completed()))
        .unwrap();
    assert!(!completed);
}

#[test]
fn concurrent_last_matches_generate_next_phase_once() {
    for _ in 0..20 {
        let f = Arc::new(seeded(4));
        std::thread::scope(|scope| {
            for &m in &f.opening {
                let f = Arc::clone(&f);
                scope.spawn(move || f.finalize_first(m));
            }
        });
        let finals = phase_matches(&f.store, f.tournament_id, PhaseName::Final);
        assert_eq!(finals.len(), 1);
        assert_ne!(finals[0].player_one, finals[0].player_two);
    }
}
