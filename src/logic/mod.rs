//! Tournament business logic: setup, registration, bracket advancement, scoring, rankings.

mod advancement;
mod players;
mod rankings;
mod registration;
mod schedule;
mod scoring;
mod setup;

pub use advancement::{finalize_match, phase_is_complete, FinalizeOutcome};
pub use players::{adjust_player_points, create_player, create_referee};
pub use rankings::{player_rankings, referee_rankings, RankingEntry};
pub use registration::{register_player, set_referee_availability};
pub use schedule::{court_for, match_slot, pair_entrants, referee_for};
pub use scoring::{PhasePoints, ScoreChange, ScoreUpdates, ScoringTable};
pub use setup::{create_tournament, seed_bracket, start_match};
