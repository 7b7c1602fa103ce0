//! Version 1 of the JSON payloads served over HTTP.

use crate::logic::{FinalizeOutcome, RankingEntry, ScoreChange};
use crate::models::{
    BracketMatch, ErrorKind, MatchId, MatchStatus, Phase, PhaseName, Player, PlayerId, Referee,
    RefereeId, Tournament, TournamentError, TournamentId, TournamentStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const VERSION: u32 = 1;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreView {
    pub id: u64,
    pub points_awarded: u32,
    pub score: u32,
}

impl From<ScoreChange> for ScoreView {
    fn from(change: ScoreChange) -> Self {
        Self {
            id: change.id,
            points_awarded: change.points,
            score: change.total,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UpdatedScores {
    pub winner: ScoreView,
    pub loser: ScoreView,
    pub referee: ScoreView,
}

/// Response to `PUT /api/matches/{id}/result`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FinalizeResponse {
    pub version: u32,
    pub match_id: MatchId,
    pub phase: PhaseName,
    pub updated_scores: UpdatedScores,
    pub champion_bonus: u32,
    pub phase_completed: bool,
    pub next_phase: Option<PhaseName>,
    pub next_phase_matches: Vec<MatchId>,
    pub byes: Vec<PlayerId>,
    pub champion: Option<PlayerId>,
}

impl From<FinalizeOutcome> for FinalizeResponse {
    fn from(outcome: FinalizeOutcome) -> Self {
        Self {
            version: VERSION,
            match_id: outcome.match_id,
            phase: outcome.phase,
            updated_scores: UpdatedScores {
                winner: outcome.scores.winner.into(),
                loser: outcome.scores.loser.into(),
                referee: outcome.scores.referee.into(),
            },
            champion_bonus: outcome.champion_bonus,
            phase_completed: outcome.phase_completed,
            next_phase: outcome.next_phase,
            next_phase_matches: outcome.next_phase_matches,
            byes: outcome.byes,
            champion: outcome.champion,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchView {
    pub id: MatchId,
    pub player_one: PlayerId,
    pub player_two: PlayerId,
    pub referee_id: u64,
    pub match_date: DateTime<Utc>,
    pub court_number: u32,
    pub status: MatchStatus,
    pub score: Option<String>,
    pub winner: Option<PlayerId>,
}

impl From<&BracketMatch> for MatchView {
    fn from(m: &BracketMatch) -> Self {
        Self {
            id: m.id,
            player_one: m.player_one,
            player_two: m.player_two,
            referee_id: m.referee_id,
            match_date: m.match_date,
            court_number: m.court_number,
            status: m.status,
            score: m.score.clone(),
            winner: m.winner,
        }
    }
}

/// One phase of a tournament with its matches in creation order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PhaseView {
    pub name: PhaseName,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub matches: Vec<MatchView>,
    pub byes: Vec<PlayerId>,
}

impl PhaseView {
    pub fn new(phase: &Phase, matches: Vec<MatchView>, byes: Vec<PlayerId>) -> Self {
        Self {
            name: phase.name,
            start_date: phase.start_date,
            end_date: phase.end_date,
            matches,
            byes,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketView {
    pub version: u32,
    pub tournament_id: TournamentId,
    pub phases: Vec<PhaseView>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentView {
    pub id: TournamentId,
    pub name: String,
    pub edition: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub min_level: u32,
    pub court_type: String,
    pub status: TournamentStatus,
    pub champion: Option<PlayerId>,
}

impl From<&Tournament> for TournamentView {
    fn from(t: &Tournament) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            edition: t.edition.clone(),
            start_date: t.start_date,
            end_date: t.end_date,
            min_level: t.min_level,
            court_type: t.court_type.clone(),
            status: t.status,
            champion: t.champion,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankingView {
    pub version: u32,
    pub entries: Vec<RankingEntry>,
}

impl From<Vec<RankingEntry>> for RankingView {
    fn from(entries: Vec<RankingEntry>) -> Self {
        Self {
            version: VERSION,
            entries,
        }
    }
}

/// A player with the position it currently holds in the ranking.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub level: u32,
    pub score: u32,
    pub rank: usize,
}

impl PlayerView {
    pub fn new(player: &Player, rank: usize) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            level: player.level,
            score: player.score,
            rank,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RefereeView {
    pub id: RefereeId,
    pub name: String,
    pub last_name: String,
    pub level: u32,
    pub score: u32,
}

impl From<&Referee> for RefereeView {
    fn from(r: &Referee) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            last_name: r.last_name.clone(),
            level: r.level,
            score: r.score,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: u64,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeededResponse {
    pub version: u32,
    pub tournament_id: TournamentId,
    pub matches: Vec<MatchId>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: ErrorKind,
}

impl From<&TournamentError> for ErrorBody {
    fn from(e: &TournamentError) -> Self {
        Self {
            error: e.to_string(),
            kind: e.kind(),
        }
    }
}
