//! Data structures for the tennis tournament: players, phases, matches, tournaments.

mod game;
mod phase;
mod player;
mod tournament;

pub use game::{BracketMatch, MatchId, MatchResult, MatchStatus, NewMatch};
pub use phase::{Phase, PhaseId, PhaseName, BRACKET_ORDER};
pub use player::{NewPlayer, NewReferee, Player, PlayerId, Referee, RefereeId};
pub use tournament::{
    Bye, ErrorKind, NewTournament, RefereeAvailability, Tournament, TournamentError,
    TournamentId, TournamentRegistration, TournamentStatus,
};
