//! Pairing and slot assignment shared by bracket seeding and advancement.

use crate::config::EngineConfig;
use crate::models::{MatchId, NewMatch, Phase, PlayerId, RefereeId, Tournament, TournamentError};
use crate::store::Session;
use chrono::{DateTime, Duration, Utc};

/// Pair entrants in order: (0, 1), (2, 3), ... A trailing odd entrant is returned separately.
pub fn pair_entrants(entrants: &[PlayerId]) -> (Vec<(PlayerId, PlayerId)>, Option<PlayerId>) {
    let mut chunks = entrants.chunks_exact(2);
    let pairs = chunks.by_ref().map(|c| (c[0], c[1])).collect();
    let leftover = chunks.remainder().first().copied();
    (pairs, leftover)
}

/// Start time of the `index`-th match of a phase, or `None` past the end of the calendar.
pub fn match_slot(
    phase_start: DateTime<Utc>,
    index: usize,
    stride_minutes: u32,
) -> Option<DateTime<Utc>> {
    let offset = i64::from(stride_minutes).checked_mul(i64::try_from(index).ok()?)?;
    phase_start.checked_add_signed(Duration::try_minutes(offset)?)
}

/// `start + delta`, or [`TournamentError::InvalidTournament`] past the end of the calendar.
pub(crate) fn shift(
    start: DateTime<Utc>,
    delta: Duration,
) -> Result<DateTime<Utc>, TournamentError> {
    start.checked_add_signed(delta).ok_or_else(|| {
        TournamentError::InvalidTournament(format!("{start} + {delta} is out of range"))
    })
}

/// Courts are numbered from 1 and reused round-robin.
pub fn court_for(index: usize, courts: u32) -> u32 {
    let courts = courts.max(1) as usize;
    (index % courts) as u32 + 1
}

pub fn referee_for(index: usize, pool: &[RefereeId]) -> Option<RefereeId> {
    if pool.is_empty() {
        None
    } else {
        pool.get(index % pool.len()).copied()
    }
}

/// Insert one scheduled match per pair into `phase`.
pub(crate) fn schedule_pairs(
    session: &mut Session,
    config: &EngineConfig,
    tournament: &Tournament,
    phase: &Phase,
    pairs: &[(PlayerId, PlayerId)],
    pool: &[RefereeId],
) -> Result<Vec<MatchId>, TournamentError> {
    pairs
        .iter()
        .enumerate()
        .map(|(i, &(player_one, player_two))| {
            let referee_id =
                referee_for(i, pool).ok_or(TournamentError::NoRefereeAvailable(tournament.id))?;
            let match_date = match_slot(phase.start_date, i, config.match_stride_minutes)
                .ok_or_else(|| {
                    TournamentError::InvalidTournament(format!(
                        "match {} of {} starts past the end of the calendar",
                        i + 1,
                        phase.name
                    ))
                })?;
            Ok(session.insert_match(NewMatch {
                tournament_id: tournament.id,
                phase_id: phase.id,
                player_one,
                player_two,
                referee_id,
                match_date,
                court_number: court_for(i, tournament.courts),
            }))
        })
        .collect()
}
