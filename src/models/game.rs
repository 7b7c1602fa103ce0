//! Match rows and their status transitions.

use crate::models::phase::PhaseId;
use crate::models::player::{PlayerId, RefereeId};
use crate::models::tournament::{TournamentError, TournamentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a match.
pub type MatchId = u64;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
}

/// A single scheduled contest between two players within a phase.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub phase_id: PhaseId,
    pub player_one: PlayerId,
    pub player_two: PlayerId,
    pub referee_id: RefereeId,
    pub match_date: DateTime<Utc>,
    pub court_number: u32,
    pub status: MatchStatus,
    /// Display-only result, e.g. "6-4, 7-6". Set on completion.
    pub score: Option<String>,
    /// Always one of the two participants; set iff status is `Completed`.
    pub winner: Option<PlayerId>,
}

/// Fields needed to schedule a match; the store assigns the id.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewMatch {
    pub tournament_id: TournamentId,
    pub phase_id: PhaseId,
    pub player_one: PlayerId,
    pub player_two: PlayerId,
    pub referee_id: RefereeId,
    pub match_date: DateTime<Utc>,
    pub court_number: u32,
}

/// Result submitted for a match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub score: String,
    pub winner: PlayerId,
}

impl BracketMatch {
    pub fn from_new(id: MatchId, new: NewMatch) -> Self {
        Self {
            id,
            tournament_id: new.tournament_id,
            phase_id: new.phase_id,
            player_one: new.player_one,
            player_two: new.player_two,
            referee_id: new.referee_id,
            match_date: new.match_date,
            court_number: new.court_number,
            status: MatchStatus::Scheduled,
            score: None,
            winner: None,
        }
    }

    pub fn participants(&self) -> [PlayerId; 2] {
        [self.player_one, self.player_two]
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// The other participant, or `None` if `player` did not play this match.
    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        if player == self.player_one {
            Some(self.player_two)
        } else if player == self.player_two {
            Some(self.player_one)
        } else {
            None
        }
    }

    /// Mark the match as being played. Already in progress is fine.
    pub fn start(&mut self) -> Result<(), TournamentError> {
        match self.status {
            MatchStatus::Completed => Err(TournamentError::AlreadyCompleted(self.id)),
            MatchStatus::Scheduled | MatchStatus::InProgress => {
                self.status = MatchStatus::InProgress;
                Ok(())
            }
        }
    }

    /// Record the final result. One-way: a completed match is never reopened.
    /// Returns the loser.
    pub fn complete(&mut self, result: MatchResult) -> Result<PlayerId, TournamentError> {
        if self.is_completed() {
            return Err(TournamentError::AlreadyCompleted(self.id));
        }
        let score = result.score.trim();
        if score.is_empty() {
            return Err(TournamentError::EmptyScore(self.id));
        }
        let loser = self
            .opponent_of(result.winner)
            .ok_or(TournamentError::InvalidWinner {
                match_id: self.id,
                winner: result.winner,
            })?;
        self.score = Some(score.to_string());
        self.winner = Some(result.winner);
        self.status = MatchStatus::Completed;
        Ok(loser)
    }
}
