//! Adding players and referees while the server runs, and manual point adjustments.

use crate::models::{NewPlayer, NewReferee, PlayerId, RefereeId, TournamentError};
use crate::store::Session;

/// Insert a player. Names are unique.
pub fn create_player(
    session: &mut Session,
    mut new: NewPlayer,
) -> Result<PlayerId, TournamentError> {
    new.name = new.name.trim().to_string();
    if new.name.is_empty() {
        return Err(TournamentError::InvalidPlayer("name is empty".into()));
    }
    if session.players().any(|p| p.name == new.name) {
        return Err(TournamentError::PlayerNameTaken(new.name));
    }
    let id = session.insert_player(new);
    log::info!("Created player {}", id);
    Ok(id)
}

/// Insert a referee. Fiscal codes are unique.
pub fn create_referee(
    session: &mut Session,
    mut new: NewReferee,
) -> Result<RefereeId, TournamentError> {
    new.name = new.name.trim().to_string();
    new.fiscal_code = new.fiscal_code.trim().to_string();
    if new.name.is_empty() {
        return Err(TournamentError::InvalidReferee("name is empty".into()));
    }
    if new.fiscal_code.is_empty() {
        return Err(TournamentError::InvalidReferee("fiscal code is empty".into()));
    }
    if session.referees().any(|r| r.fiscal_code == new.fiscal_code) {
        return Err(TournamentError::FiscalCodeTaken(new.fiscal_code));
    }
    let id = session.insert_referee(new);
    log::info!("Created referee {}", id);
    Ok(id)
}

/// Add `delta` (possibly negative) to a player's score, clamped to `0..=u32::MAX`.
/// Returns the new score.
pub fn adjust_player_points(
    session: &mut Session,
    player_id: PlayerId,
    delta: i32,
) -> Result<u32, TournamentError> {
    let player = session
        .player_mut(player_id)
        .ok_or(TournamentError::PlayerNotFound(player_id))?;
    player.score = player.score.saturating_add_signed(delta);
    log::info!(
        "Adjusted player {} by {}, score now {}",
        player_id,
        delta,
        player.score
    );
    Ok(player.score)
}
