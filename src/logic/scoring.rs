//! Phase scoring tables and their application to player/referee scores.

use crate::models::{BracketMatch, MatchId, PhaseName, PlayerId, RefereeId, TournamentError};
use crate::store::Session;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Points awarded for one completed match of a phase.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PhasePoints {
    pub winner: u32,
    #[serde(default)]
    pub loser: u32,
    #[serde(default)]
    pub referee: u32,
}

impl PhasePoints {
    pub const fn new(winner: u32, loser: u32, referee: u32) -> Self {
        Self {
            winner,
            loser,
            referee,
        }
    }
}

/// Scoring configuration keyed by phase. Phases absent from `phases` award nothing.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoringTable {
    pub phases: BTreeMap<PhaseName, PhasePoints>,
    /// Total the champion should have earned from the final; the difference to
    /// the FINAL winner points is paid as a bonus.
    pub champion: u32,
}

impl Default for ScoringTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScoringTable {
    /// Winner and loser both score, scaled by round.
    pub fn standard() -> Self {
        let phases = BTreeMap::from([
            (PhaseName::RoundOf16, PhasePoints::new(10, 5, 3)),
            (PhaseName::Quarterfinal, PhasePoints::new(25, 15, 5)),
            (PhaseName::Semifinal, PhasePoints::new(50, 30, 7)),
            (PhaseName::Final, PhasePoints::new(100, 60, 10)),
        ]);
        Self {
            phases,
            champion: 200,
        }
    }

    /// Only winners score; points double with each round reached.
    pub fn progressive() -> Self {
        let phases = BTreeMap::from([
            (PhaseName::RoundOf32, PhasePoints::new(10, 0, 0)),
            (PhaseName::RoundOf16, PhasePoints::new(20, 0, 3)),
            (PhaseName::Quarterfinal, PhasePoints::new(40, 0, 5)),
            (PhaseName::Semifinal, PhasePoints::new(80, 0, 7)),
            (PhaseName::Final, PhasePoints::new(160, 0, 10)),
        ]);
        Self {
            phases,
            champion: 320,
        }
    }

    pub fn points_for(&self, phase: PhaseName) -> PhasePoints {
        self.phases.get(&phase).copied().unwrap_or_default()
    }

    /// Extra points for winning the final, on top of the FINAL winner points.
    pub fn champion_bonus(&self) -> u32 {
        self.champion
            .saturating_sub(self.points_for(PhaseName::Final).winner)
    }
}

/// Points added to one score counter and the resulting total.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreChange {
    pub id: u64,
    pub points: u32,
    pub total: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreUpdates {
    pub winner: ScoreChange,
    pub loser: ScoreChange,
    pub referee: ScoreChange,
}

/// Credit winner, loser and referee of a just-completed match.
pub(crate) fn apply_match_scoring(
    session: &mut Session,
    table: &ScoringTable,
    phase: PhaseName,
    bracket_match: &BracketMatch,
    winner: PlayerId,
    loser: PlayerId,
) -> Result<ScoreUpdates, TournamentError> {
    let points = table.points_for(phase);
    let winner = award_player(session, bracket_match.id, winner, points.winner)?;
    let loser = award_player(session, bracket_match.id, loser, points.loser)?;
    let referee = award_referee(
        session,
        bracket_match.id,
        bracket_match.referee_id,
        points.referee,
    )?;
    log::debug!(
        "Match {} ({}): winner {} +{}, loser {} +{}, referee {} +{}",
        bracket_match.id,
        phase,
        winner.id,
        winner.points,
        loser.id,
        loser.points,
        referee.id,
        referee.points
    );
    Ok(ScoreUpdates {
        winner,
        loser,
        referee,
    })
}

pub(crate) fn award_player(
    session: &mut Session,
    match_id: MatchId,
    player_id: PlayerId,
    points: u32,
) -> Result<ScoreChange, TournamentError> {
    let player = session
        .player_mut(player_id)
        .ok_or(TournamentError::DanglingPlayer {
            match_id,
            player_id,
        })?;
    player.add_points(points);
    Ok(ScoreChange {
        id: player_id,
        points,
        total: player.score,
    })
}

fn award_referee(
    session: &mut Session,
    match_id: MatchId,
    referee_id: RefereeId,
    points: u32,
) -> Result<ScoreChange, TournamentError> {
    let referee = session
        .referee_mut(referee_id)
        .ok_or(TournamentError::DanglingReferee {
            match_id,
            referee_id,
        })?;
    referee.add_points(points);
    Ok(ScoreChange {
        id: referee_id,
        points,
        total: referee.score,
    })
}
