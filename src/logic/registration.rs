//! Player registration and referee availability, both gated by tournament level.

use crate::models::{PlayerId, RefereeId, TournamentError, TournamentId};
use crate::store::Session;
use chrono::{DateTime, Utc};

/// Register a player for a tournament. Returns the registration id.
pub fn register_player(
    session: &mut Session,
    tournament_id: TournamentId,
    player_id: PlayerId,
    now: DateTime<Utc>,
) -> Result<u64, TournamentError> {
    let tournament = session.tournament(tournament_id)?;
    if tournament.is_completed() {
        return Err(TournamentError::TournamentCompleted(tournament_id));
    }
    let min_level = tournament.min_level;
    let player = session
        .player(player_id)
        .ok_or(TournamentError::PlayerNotFound(player_id))?;
    if player.level < min_level {
        return Err(TournamentError::PlayerLevelTooLow {
            player_id,
            level: player.level,
            min_level,
        });
    }
    if session.is_registered(tournament_id, player_id) {
        return Err(TournamentError::AlreadyRegistered {
            tournament_id,
            player_id,
        });
    }
    Ok(session.insert_registration(tournament_id, player_id, now))
}

/// Mark a referee as available (or not) to officiate a tournament's matches.
/// Already scheduled matches keep their referee.
pub fn set_referee_availability(
    session: &mut Session,
    tournament_id: TournamentId,
    referee_id: RefereeId,
    is_available: bool,
) -> Result<(), TournamentError> {
    let min_level = session.tournament(tournament_id)?.min_referee_level;
    let referee = session
        .referee(referee_id)
        .ok_or(TournamentError::RefereeNotFound(referee_id))?;
    if is_available && referee.level < min_level {
        return Err(TournamentError::RefereeLevelTooLow {
            referee_id,
            level: referee.level,
            min_level,
        });
    }
    session.upsert_availability(tournament_id, referee_id, is_available);
    Ok(())
}
