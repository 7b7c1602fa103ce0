//! Tournament, registration rows, and the error type shared by all operations.

use crate::models::game::MatchId;
use crate::models::phase::{PhaseId, PhaseName};
use crate::models::player::{PlayerId, RefereeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a tournament.
pub type TournamentId = u64;

/// Broad class of a [`TournamentError`], used by callers to pick a response.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    Conflict,
    /// A referenced row vanished; unreachable while foreign keys hold.
    Integrity,
}

/// Errors that can occur during tournament operations.
///
/// Any error returned inside [`crate::Store::transaction`] discards every
/// write made by that transaction.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TournamentError {
    #[error("match {0} not found")]
    MatchNotFound(MatchId),
    #[error("phase {0} not found")]
    PhaseNotFound(PhaseId),
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),
    #[error("referee {0} not found")]
    RefereeNotFound(RefereeId),
    #[error("tournament {0} not found")]
    TournamentNotFound(TournamentId),

    #[error("player {winner} is not a participant of match {match_id}")]
    InvalidWinner { match_id: MatchId, winner: PlayerId },
    #[error("result for match {0} has an empty score")]
    EmptyScore(MatchId),
    #[error("a bracket needs 2, 4, 8, 16, 32 or 64 entrants, got {0}")]
    UnsupportedEntrantCount(usize),
    #[error("player {0} is entered more than once")]
    DuplicateEntrant(PlayerId),
    #[error("player {player_id} is not registered for tournament {tournament_id}")]
    PlayerNotRegistered {
        tournament_id: TournamentId,
        player_id: PlayerId,
    },
    #[error("player {player_id} has level {level}, tournament requires {min_level}")]
    PlayerLevelTooLow {
        player_id: PlayerId,
        level: u32,
        min_level: u32,
    },
    #[error("referee {referee_id} has level {level}, tournament requires {min_level}")]
    RefereeLevelTooLow {
        referee_id: RefereeId,
        level: u32,
        min_level: u32,
    },
    #[error("no referee is available for tournament {0}")]
    NoRefereeAvailable(TournamentId),
    #[error("invalid tournament: {0}")]
    InvalidTournament(String),
    #[error("invalid player: {0}")]
    InvalidPlayer(String),
    #[error("invalid referee: {0}")]
    InvalidReferee(String),

    #[error("match {0} is already completed")]
    AlreadyCompleted(MatchId),
    #[error("{phase} of tournament {tournament_id} has already been generated")]
    NextPhaseAlreadyGenerated {
        tournament_id: TournamentId,
        phase: PhaseName,
    },
    #[error("tournament {0} already has a bracket")]
    BracketAlreadySeeded(TournamentId),
    #[error("player {player_id} is already registered for tournament {tournament_id}")]
    AlreadyRegistered {
        tournament_id: TournamentId,
        player_id: PlayerId,
    },
    #[error("tournament {0} is completed")]
    TournamentCompleted(TournamentId),
    #[error("a player named {0:?} already exists")]
    PlayerNameTaken(String),
    #[error("fiscal code {0} is already in use")]
    FiscalCodeTaken(String),

    #[error("match {match_id} references missing player {player_id}")]
    DanglingPlayer { match_id: MatchId, player_id: PlayerId },
    #[error("match {match_id} references missing referee {referee_id}")]
    DanglingReferee {
        match_id: MatchId,
        referee_id: RefereeId,
    },
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        use TournamentError::*;
        match self {
            MatchNotFound(_) | PhaseNotFound(_) | PlayerNotFound(_) | RefereeNotFound(_)
            | TournamentNotFound(_) => ErrorKind::NotFound,
            InvalidWinner { .. }
            | EmptyScore(_)
            | UnsupportedEntrantCount(_)
            | DuplicateEntrant(_)
            | PlayerNotRegistered { .. }
            | PlayerLevelTooLow { .. }
            | RefereeLevelTooLow { .. }
            | NoRefereeAvailable(_)
            | InvalidTournament(_)
            | InvalidPlayer(_)
            | InvalidReferee(_) => ErrorKind::InvalidInput,
            AlreadyCompleted(_)
            | NextPhaseAlreadyGenerated { .. }
            | BracketAlreadySeeded(_)
            | AlreadyRegistered { .. }
            | TournamentCompleted(_)
            | PlayerNameTaken(_)
            | FiscalCodeTaken(_) => ErrorKind::Conflict,
            DanglingPlayer { .. } | DanglingReferee { .. } => ErrorKind::Integrity,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Created; no bracket yet.
    #[default]
    Upcoming,
    /// Bracket seeded, matches being played.
    Active,
    /// Every match completed; champion decided.
    Completed,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub edition: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Players below this level cannot register.
    pub min_level: u32,
    /// Referees below this level cannot officiate.
    pub min_referee_level: u32,
    pub court_type: String,
    /// Courts are numbered 1..=courts and assigned round-robin.
    pub courts: u32,
    pub status: TournamentStatus,
    pub champion: Option<PlayerId>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewTournament {
    pub name: String,
    #[serde(default)]
    pub edition: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub min_level: u32,
    #[serde(default)]
    pub min_referee_level: u32,
    #[serde(default)]
    pub court_type: String,
    #[serde(default = "default_courts")]
    pub courts: u32,
}

fn default_courts() -> u32 {
    4
}

impl Tournament {
    pub fn from_new(id: TournamentId, new: NewTournament) -> Self {
        Self {
            id,
            name: new.name,
            edition: new.edition,
            start_date: new.start_date,
            end_date: new.end_date,
            min_level: new.min_level,
            min_referee_level: new.min_referee_level,
            court_type: new.court_type,
            courts: new.courts,
            status: TournamentStatus::Upcoming,
            champion: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TournamentStatus::Completed
    }

    /// Close the tournament with its champion.
    pub fn complete(&mut self, champion: PlayerId) {
        self.status = TournamentStatus::Completed;
        self.champion = Some(champion);
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TournamentRegistration {
    pub id: u64,
    pub tournament_id: TournamentId,
    pub player_id: PlayerId,
    pub registration_date: DateTime<Utc>,
}

/// Whether a referee can be assigned matches in a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RefereeAvailability {
    pub id: u64,
    pub tournament_id: TournamentId,
    pub referee_id: RefereeId,
    pub is_available: bool,
}

/// Automatic advancement of a player into `phase_id` without a played match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bye {
    pub id: u64,
    pub tournament_id: TournamentId,
    pub phase_id: PhaseId,
    pub player_id: PlayerId,
}
