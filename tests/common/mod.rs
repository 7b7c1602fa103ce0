//! Shared fixtures: a tournament with registered players, available referees and a seeded bracket.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use tennis_bracket_web::{
    create_tournament, finalize_match, register_player, seed_bracket, set_referee_availability,
    EngineConfig, FinalizeOutcome, MatchId, MatchResult, NewPlayer, NewReferee, NewTournament,
    PlayerId, RefereeId, Store, TournamentError, TournamentId,
};

pub struct Fixture {
    pub store: Store,
    pub config: EngineConfig,
    pub tournament_id: TournamentId,
    pub players: Vec<PlayerId>,
    pub referees: Vec<RefereeId>,
    /// Opening-phase matches in creation order.
    pub opening: Vec<MatchId>,
}

pub fn start_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
}

pub fn new_tournament() -> NewTournament {
    NewTournament {
        name: "Summer Championship".into(),
        edition: "2025".into(),
        start_date: start_date(),
        end_date: start_date() + chrono::Duration::days(14),
        min_level: 2,
        min_referee_level: 3,
        court_type: "clay".into(),
        courts: 4,
    }
}

/// Tournament with `n` registered players and `referees` available referees, not yet seeded.
pub fn unseeded(n: usize, referees: usize) -> Fixture {
    let store = Store::new();
    let (tournament_id, players, referee_ids) = store
        .transaction(|s| {
            let tournament_id = create_tournament(s, new_tournament())?;
            let players: Vec<PlayerId> = (0..n)
                .map(|i| {
                    s.insert_player(NewPlayer {
                        name: format!("P{i}"),
                        level: 5,
                        score: 0,
                    })
                })
                .collect();
            let referee_ids: Vec<RefereeId> = (0..referees)
                .map(|i| {
                    s.insert_referee(NewReferee {
                        name: format!("R{i}"),
                        last_name: "Arbitro".into(),
                        level: 4,
                        score: 0,
                        fiscal_code: format!("FC{i:04}"),
                    })
                })
                .collect();
            for &p in &players {
                register_player(s, tournament_id, p, start_date())?;
            }
            for &r in &referee_ids {
                set_referee_availability(s, tournament_id, r, true)?;
            }
            Ok::<_, TournamentError>((tournament_id, players, referee_ids))
        })
        .unwrap();
    Fixture {
        store,
        config: EngineConfig::default(),
        tournament_id,
        players,
        referees: referee_ids,
        opening: Vec::new(),
    }
}

/// Tournament with `n` players seeded in id order and three referees.
pub fn seeded(n: usize) -> Fixture {
    let mut fixture = unseeded(n, 3);
    let opening = fixture
        .store
        .transaction(|s| seed_bracket(s, &fixture.config, fixture.tournament_id, &fixture.players))
        .unwrap();
    fixture.opening = opening;
    fixture
}

impl Fixture {
    pub fn finalize(&self, match_id: MatchId, winner: PlayerId) -> Result<FinalizeOutcome, TournamentError> {
        let result = MatchResult {
            score: "6-4, 6-3".into(),
            winner,
        };
        self.store
            .transaction(|s| finalize_match(s, &self.config, match_id, result))
    }

    /// Finalize with the first-listed participant winning.
    pub fn finalize_first(&self, match_id: MatchId) -> FinalizeOutcome {
        let winner = self.player_one(match_id);
        self.finalize(match_id, winner).unwrap()
    }

    pub fn player_one(&self, match_id: MatchId) -> PlayerId {
        self.store
            .read(|s| s.bracket_match(match_id).map(|m| m.player_one))
            .unwrap()
    }

    pub fn score_of(&self, player: PlayerId) -> u32 {
        self.store
            .read(|s| s.player(player).map(|p| p.score))
            .unwrap()
    }

    pub fn referee_score(&self, referee: RefereeId) -> u32 {
        self.store
            .read(|s| s.referee(referee).map(|r| r.score))
            .unwrap()
    }
}
