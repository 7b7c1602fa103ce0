//! Tennis tournament bracket engine: models, store, business logic and the HTTP layer.

pub mod api;
pub mod config;
pub mod http;
pub mod logic;
pub mod models;
pub mod roster;
pub mod store;

pub use config::{EngineConfig, ServerConfig};
pub use logic::{
    adjust_player_points, create_player, create_referee, create_tournament, finalize_match,
    phase_is_complete, player_rankings, referee_rankings, register_player, seed_bracket,
    set_referee_availability, start_match, FinalizeOutcome, PhasePoints, RankingEntry,
    ScoreChange, ScoreUpdates, ScoringTable,
};
pub use models::{
    BracketMatch, ErrorKind, MatchId, MatchResult, MatchStatus, NewMatch, NewPlayer, NewReferee,
    NewTournament, Phase, PhaseId, PhaseName, Player, PlayerId, Referee, RefereeId, Tournament,
    TournamentError, TournamentId, TournamentStatus,
};
pub use store::{Session, Store};
