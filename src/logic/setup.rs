//! Setup: create a tournament, seed its opening phase, start matches.

use crate::config::EngineConfig;
use crate::logic::schedule::{pair_entrants, schedule_pairs, shift};
use crate::models::{
    MatchId, NewTournament, PhaseName, PlayerId, TournamentError, TournamentId, TournamentStatus,
    BRACKET_ORDER,
};
use crate::store::Session;
use chrono::Duration;
use std::collections::HashSet;

/// Create a tournament in `Upcoming` state.
pub fn create_tournament(
    session: &mut Session,
    new: NewTournament,
) -> Result<TournamentId, TournamentError> {
    if new.name.trim().is_empty() {
        return Err(TournamentError::InvalidTournament("name is empty".into()));
    }
    if new.end_date < new.start_date {
        return Err(TournamentError::InvalidTournament(
            "end date is before start date".into(),
        ));
    }
    if new.courts == 0 {
        return Err(TournamentError::InvalidTournament(
            "at least one court is required".into(),
        ));
    }
    // The longest bracket must fit on the calendar.
    shift(new.start_date, phase_offset(BRACKET_ORDER.len()))?;
    let id = session.insert_tournament(new);
    log::info!("Created tournament {}", id);
    Ok(id)
}

/// Create every phase from the opening round to the final and schedule the opening matches.
///
/// `entrants` are paired in the given order: (0, 1), (2, 3), ... The opening
/// phase follows from their count (2 → FINAL, ..., 64 → ROUND_OF_64). Phase k
/// of the bracket spans days 2k to 2k + 1 after the tournament start.
pub fn seed_bracket(
    session: &mut Session,
    config: &EngineConfig,
    tournament_id: TournamentId,
    entrants: &[PlayerId],
) -> Result<Vec<MatchId>, TournamentError> {
    let tournament = session.tournament(tournament_id)?.clone();
    if tournament.status == TournamentStatus::Completed {
        return Err(TournamentError::TournamentCompleted(tournament_id));
    }
    if session.phases_of(tournament_id).next().is_some() {
        return Err(TournamentError::BracketAlreadySeeded(tournament_id));
    }
    let opening = PhaseName::opening_for(entrants.len())
        .ok_or(TournamentError::UnsupportedEntrantCount(entrants.len()))?;

    let mut seen = HashSet::with_capacity(entrants.len());
    for &player_id in entrants {
        if !seen.insert(player_id) {
            return Err(TournamentError::DuplicateEntrant(player_id));
        }
        if session.player(player_id).is_none() {
            return Err(TournamentError::PlayerNotFound(player_id));
        }
        if !session.is_registered(tournament_id, player_id) {
            return Err(TournamentError::PlayerNotRegistered {
                tournament_id,
                player_id,
            });
        }
    }

    let pool = session.referee_pool(tournament_id);
    if pool.is_empty() {
        return Err(TournamentError::NoRefereeAvailable(tournament_id));
    }

    let mut opening_phase = None;
    for (k, &name) in opening.remaining().iter().enumerate() {
        let start = shift(tournament.start_date, phase_offset(k))?;
        let end = shift(start, Duration::days(1))?;
        let id = session.insert_phase(tournament_id, name, start, end);
        if name == opening {
            opening_phase = Some(id);
        }
    }
    let opening_phase = opening_phase.ok_or_else(|| {
        TournamentError::InvalidTournament("opening phase was not created".into())
    })?;
    let phase = session.phase(opening_phase)?.clone();

    let (pairs, _) = pair_entrants(entrants);
    let matches = schedule_pairs(session, config, &tournament, &phase, &pairs, &pool)?;
    session.tournament_mut(tournament_id)?.status = TournamentStatus::Active;
    log::info!(
        "Seeded tournament {} with {} {} match(es)",
        tournament_id,
        matches.len(),
        opening
    );
    Ok(matches)
}

/// Offset of the `k`-th phase of a bracket from the tournament start.
fn phase_offset(k: usize) -> Duration {
    Duration::days(2 * k as i64)
}

/// Mark a match as in progress.
pub fn start_match(session: &mut Session, match_id: MatchId) -> Result<(), TournamentError> {
    session.bracket_match_mut(match_id)?.start()
}
