//! Bracket advancement: finalize a match, score it, and open the next phase when its phase is done.

use crate::config::EngineConfig;
use crate::logic::schedule::{pair_entrants, schedule_pairs, shift};
use crate::logic::scoring::{apply_match_scoring, award_player, ScoreUpdates};
use crate::models::{
    MatchId, MatchResult, Phase, PhaseName, PlayerId, RefereeId, TournamentError, TournamentId,
    TournamentStatus,
};
use crate::store::Session;
use serde::Serialize;

/// Everything a finalize call changed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FinalizeOutcome {
    pub match_id: MatchId,
    pub tournament_id: TournamentId,
    pub phase: PhaseName,
    /// Winner points include `champion_bonus`.
    pub scores: ScoreUpdates,
    pub champion_bonus: u32,
    pub phase_completed: bool,
    pub next_phase: Option<PhaseName>,
    pub next_phase_matches: Vec<MatchId>,
    /// Players advanced into `next_phase` without a match.
    pub byes: Vec<PlayerId>,
    pub champion: Option<PlayerId>,
}

/// Record the result of a match and advance the bracket.
///
/// 1. Completes the match (rejecting completed matches and non-participant winners).
/// 2. Credits winner, loser and referee from the phase scoring table.
/// 3. If that was the last open match of its phase, pairs the phase's winners
///    (creation order, then earlier byes) into the next phase, or crowns the
///    champion after the final.
///
/// Run it inside [`crate::Store::transaction`]: on error nothing it wrote is kept.
pub fn finalize_match(
    session: &mut Session,
    config: &EngineConfig,
    match_id: MatchId,
    result: MatchResult,
) -> Result<FinalizeOutcome, TournamentError> {
    let winner = result.winner;
    let (completed, loser) = {
        let bracket_match = session.bracket_match_mut(match_id)?;
        let loser = bracket_match.complete(result)?;
        (bracket_match.clone(), loser)
    };
    let tournament_id = completed.tournament_id;

    let phase = session.phase(completed.phase_id)?.clone();
    if phase.tournament_id != tournament_id {
        return Err(TournamentError::PhaseNotFound(phase.id));
    }
    let tournament = session.tournament_mut(tournament_id)?;
    if tournament.status == TournamentStatus::Upcoming {
        tournament.status = TournamentStatus::Active;
    }

    let scores = apply_match_scoring(session, &config.scoring, phase.name, &completed, winner, loser)?;
    let mut outcome = FinalizeOutcome {
        match_id,
        tournament_id,
        phase: phase.name,
        scores,
        champion_bonus: 0,
        phase_completed: false,
        next_phase: None,
        next_phase_matches: Vec::new(),
        byes: Vec::new(),
        champion: None,
    };

    if !phase_is_complete(session, &phase) {
        return Ok(outcome);
    }
    outcome.phase_completed = true;
    log::info!("{} of tournament {} completed", phase.name, tournament_id);

    if phase.name.is_terminal() {
        let bonus = config.scoring.champion_bonus();
        let change = award_player(session, match_id, winner, bonus)?;
        outcome.scores.winner.points += bonus;
        outcome.scores.winner.total = change.total;
        outcome.champion_bonus = bonus;
        crown(session, tournament_id, winner)?;
        outcome.champion = Some(winner);
        return Ok(outcome);
    }

    let Some(next_name) = phase.name.next() else {
        return Ok(outcome);
    };

    let advancing = advancing_entrants(session, &phase);
    if let [sole] = advancing[..] {
        // Nobody left to play.
        crown(session, tournament_id, sole)?;
        outcome.champion = Some(sole);
        return Ok(outcome);
    }

    let next = ensure_phase(session, &phase, next_name)?;
    let already_generated = session.matches_in_phase(tournament_id, next.id).next().is_some()
        || session.byes_into(tournament_id, next.id).next().is_some();
    if already_generated {
        return Err(TournamentError::NextPhaseAlreadyGenerated {
            tournament_id,
            phase: next_name,
        });
    }

    let (pairs, leftover) = pair_entrants(&advancing);
    let pool = referee_pool(session, &phase);
    let tournament = session.tournament(tournament_id)?.clone();
    outcome.next_phase_matches = schedule_pairs(session, config, &tournament, &next, &pairs, &pool)?;
    if let Some(player_id) = leftover {
        log::warn!(
            "Odd number of players left {} of tournament {}; player {} gets a bye into {}",
            phase.name,
            tournament_id,
            player_id,
            next_name
        );
        session.insert_bye(tournament_id, next.id, player_id);
        outcome.byes.push(player_id);
    }
    outcome.next_phase = Some(next_name);
    log::info!(
        "Generated {} {} match(es) for tournament {}",
        outcome.next_phase_matches.len(),
        next_name,
        tournament_id
    );
    Ok(outcome)
}

/// Whether every match scheduled in `phase` has been completed.
pub fn phase_is_complete(session: &Session, phase: &Phase) -> bool {
    let (total, completed) = session
        .matches_in_phase(phase.tournament_id, phase.id)
        .fold((0usize, 0usize), |(total, completed), m| {
            (total + 1, completed + usize::from(m.is_completed()))
        });
    total == completed
}

/// Winners of `phase` in match creation order, followed by players given a bye into it.
fn advancing_entrants(session: &Session, phase: &Phase) -> Vec<PlayerId> {
    let winners = session
        .matches_in_phase(phase.tournament_id, phase.id)
        .filter_map(|m| m.winner);
    let byes = session
        .byes_into(phase.tournament_id, phase.id)
        .map(|b| b.player_id);
    winners.chain(byes).collect()
}

/// The tournament's available referees, or failing that the ones who officiated `phase`.
fn referee_pool(session: &Session, phase: &Phase) -> Vec<RefereeId> {
    let pool = session.referee_pool(phase.tournament_id);
    if !pool.is_empty() {
        return pool;
    }
    let mut officiated: Vec<RefereeId> = Vec::new();
    for m in session.matches_in_phase(phase.tournament_id, phase.id) {
        if !officiated.contains(&m.referee_id) {
            officiated.push(m.referee_id);
        }
    }
    officiated
}

/// Look up the `name` phase of the tournament, creating it right after `previous` if missing.
fn ensure_phase(
    session: &mut Session,
    previous: &Phase,
    name: PhaseName,
) -> Result<Phase, TournamentError> {
    if let Some(existing) = session.phase_by_name(previous.tournament_id, name) {
        return Ok(existing.clone());
    }
    let start = previous.end_date;
    let end = shift(start, previous.end_date - previous.start_date)?;
    let id = session.insert_phase(previous.tournament_id, name, start, end);
    Ok(Phase {
        id,
        tournament_id: previous.tournament_id,
        name,
        start_date: start,
        end_date: end,
    })
}

fn crown(
    session: &mut Session,
    tournament_id: TournamentId,
    champion: PlayerId,
) -> Result<(), TournamentError> {
    session.tournament_mut(tournament_id)?.complete(champion);
    log::info!("Tournament {} completed, champion {}", tournament_id, champion);
    Ok(())
}
