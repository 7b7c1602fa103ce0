//! In-memory relational store with serializable transactions.
//!
//! Rows live in ordered maps keyed by surrogate ids drawn from one sequence,
//! so iterating a table yields rows in creation order. Writers go through
//! [`Store::transaction`], which stages changes on a copy of the tables and
//! publishes them only if the closure succeeds.

use crate::models::{
    BracketMatch, Bye, MatchId, NewMatch, NewPlayer, NewReferee, NewTournament, Phase, PhaseId,
    PhaseName, Player, PlayerId, Referee, RefereeAvailability, RefereeId, Tournament,
    TournamentError, TournamentId, TournamentRegistration,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

/// Tables visible to one transaction (or one read).
#[derive(Clone, Debug, Default)]
pub struct Session {
    next_id: u64,
    tournaments: BTreeMap<TournamentId, Tournament>,
    phases: BTreeMap<PhaseId, Phase>,
    matches: BTreeMap<MatchId, BracketMatch>,
    players: BTreeMap<PlayerId, Player>,
    referees: BTreeMap<RefereeId, Referee>,
    registrations: BTreeMap<u64, TournamentRegistration>,
    availability: BTreeMap<u64, RefereeAvailability>,
    byes: BTreeMap<u64, Bye>,
}

impl Session {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn insert_tournament(&mut self, new: NewTournament) -> TournamentId {
        let id = self.next_id();
        self.tournaments.insert(id, Tournament::from_new(id, new));
        id
    }

    pub fn insert_player(&mut self, new: NewPlayer) -> PlayerId {
        let id = self.next_id();
        self.players.insert(id, Player::from_new(id, new));
        id
    }

    pub fn insert_referee(&mut self, new: NewReferee) -> RefereeId {
        let id = self.next_id();
        self.referees.insert(id, Referee::from_new(id, new));
        id
    }

    pub fn insert_phase(
        &mut self,
        tournament_id: TournamentId,
        name: PhaseName,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> PhaseId {
        let id = self.next_id();
        self.phases.insert(
            id,
            Phase {
                id,
                tournament_id,
                name,
                start_date,
                end_date,
            },
        );
        id
    }

    pub fn insert_match(&mut self, new: NewMatch) -> MatchId {
        let id = self.next_id();
        self.matches.insert(id, BracketMatch::from_new(id, new));
        id
    }

    pub fn insert_bye(
        &mut self,
        tournament_id: TournamentId,
        phase_id: PhaseId,
        player_id: PlayerId,
    ) -> u64 {
        let id = self.next_id();
        self.byes.insert(
            id,
            Bye {
                id,
                tournament_id,
                phase_id,
                player_id,
            },
        );
        id
    }

    pub fn insert_registration(
        &mut self,
        tournament_id: TournamentId,
        player_id: PlayerId,
        registration_date: DateTime<Utc>,
    ) -> u64 {
        let id = self.next_id();
        self.registrations.insert(
            id,
            TournamentRegistration {
                id,
                tournament_id,
                player_id,
                registration_date,
            },
        );
        id
    }

    /// Set the availability flag of a referee for a tournament, creating the row if needed.
    pub fn upsert_availability(
        &mut self,
        tournament_id: TournamentId,
        referee_id: RefereeId,
        is_available: bool,
    ) {
        let existing = self
            .availability
            .values_mut()
            .find(|a| a.tournament_id == tournament_id && a.referee_id == referee_id);
        if let Some(row) = existing {
            row.is_available = is_available;
            return;
        }
        let id = self.next_id();
        self.availability.insert(
            id,
            RefereeAvailability {
                id,
                tournament_id,
                referee_id,
                is_available,
            },
        );
    }

    pub fn tournament(&self, id: TournamentId) -> Result<&Tournament, TournamentError> {
        self.tournaments
            .get(&id)
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    pub fn tournament_mut(&mut self, id: TournamentId) -> Result<&mut Tournament, TournamentError> {
        self.tournaments
            .get_mut(&id)
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    pub fn tournaments(&self) -> impl Iterator<Item = &Tournament> {
        self.tournaments.values()
    }

    pub fn phase(&self, id: PhaseId) -> Result<&Phase, TournamentError> {
        self.phases.get(&id).ok_or(TournamentError::PhaseNotFound(id))
    }

    pub fn phase_by_name(&self, tournament_id: TournamentId, name: PhaseName) -> Option<&Phase> {
        self.phases
            .values()
            .find(|p| p.tournament_id == tournament_id && p.name == name)
    }

    pub fn phases_of(&self, tournament_id: TournamentId) -> impl Iterator<Item = &Phase> {
        self.phases
            .values()
            .filter(move |p| p.tournament_id == tournament_id)
    }

    pub fn bracket_match(&self, id: MatchId) -> Result<&BracketMatch, TournamentError> {
        self.matches.get(&id).ok_or(TournamentError::MatchNotFound(id))
    }

    pub fn bracket_match_mut(&mut self, id: MatchId) -> Result<&mut BracketMatch, TournamentError> {
        self.matches
            .get_mut(&id)
            .ok_or(TournamentError::MatchNotFound(id))
    }

    /// Matches of one phase in creation order.
    pub fn matches_in_phase(
        &self,
        tournament_id: TournamentId,
        phase_id: PhaseId,
    ) -> impl Iterator<Item = &BracketMatch> {
        self.matches
            .values()
            .filter(move |m| m.tournament_id == tournament_id && m.phase_id == phase_id)
    }

    pub fn matches_of(&self, tournament_id: TournamentId) -> impl Iterator<Item = &BracketMatch> {
        self.matches
            .values()
            .filter(move |m| m.tournament_id == tournament_id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn referee(&self, id: RefereeId) -> Option<&Referee> {
        self.referees.get(&id)
    }

    pub fn referee_mut(&mut self, id: RefereeId) -> Option<&mut Referee> {
        self.referees.get_mut(&id)
    }

    pub fn referees(&self) -> impl Iterator<Item = &Referee> {
        self.referees.values()
    }

    pub fn is_registered(&self, tournament_id: TournamentId, player_id: PlayerId) -> bool {
        self.registrations
            .values()
            .any(|r| r.tournament_id == tournament_id && r.player_id == player_id)
    }

    pub fn registrations_of(
        &self,
        tournament_id: TournamentId,
    ) -> impl Iterator<Item = &TournamentRegistration> {
        self.registrations
            .values()
            .filter(move |r| r.tournament_id == tournament_id)
    }

    /// Referees marked available for a tournament, by ascending referee id.
    pub fn referee_pool(&self, tournament_id: TournamentId) -> Vec<RefereeId> {
        let mut pool: Vec<RefereeId> = self
            .availability
            .values()
            .filter(|a| a.tournament_id == tournament_id && a.is_available)
            .map(|a| a.referee_id)
            .filter(|id| self.referees.contains_key(id))
            .collect();
        pool.sort_unstable();
        pool.dedup();
        pool
    }

    /// Byes into one phase in creation order.
    pub fn byes_into(
        &self,
        tournament_id: TournamentId,
        phase_id: PhaseId,
    ) -> impl Iterator<Item = &Bye> {
        self.byes
            .values()
            .filter(move |b| b.tournament_id == tournament_id && b.phase_id == phase_id)
    }
}

/// Shared handle to the tables. Writers are serialized; readers run concurrently.
#[derive(Debug, Default)]
pub struct Store {
    session: RwLock<Session>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` as one atomic unit.
    ///
    /// Holds the write lock for the whole call, so the closure sees no
    /// concurrent writer. Changes are published only when `f` returns `Ok`;
    /// on `Err` they are dropped.
    ///
    /// `f` only ever mutates a staged copy, so a panic inside it leaves the
    /// committed tables untouched. A lock poisoned that way is therefore
    /// taken over rather than reported.
    pub fn transaction<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Session) -> Result<T, E>,
    {
        let mut guard = self.session.write().unwrap_or_else(PoisonError::into_inner);
        let mut staged = guard.clone();
        let out = f(&mut staged)?;
        *guard = staged;
        Ok(out)
    }

    /// Run a read-only query against the committed tables.
    pub fn read<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&Session) -> T,
    {
        let guard = self.session.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewPlayer;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn player(name: &str) -> NewPlayer {
        NewPlayer {
            name: name.into(),
            level: 3,
            score: 0,
        }
    }

    #[test]
    fn failed_transaction_publishes_nothing() {
        let store = Store::new();
        let err = store
            .transaction(|s| {
                s.insert_player(player("Ada"));
                Err::<(), _>(TournamentError::PlayerNotFound(7))
            })
            .unwrap_err();
        assert_eq!(err, TournamentError::PlayerNotFound(7));
        assert_eq!(store.read(|s| s.players().count()), 0);
    }

    #[test]
    fn panicking_writer_leaves_store_usable() {
        let store = Store::new();
        store
            .transaction(|s| Ok::<_, TournamentError>(s.insert_player(player("Ada"))))
            .unwrap();

        let panicked = catch_unwind(AssertUnwindSafe(|| {
            store.transaction(|s| -> Result<(), TournamentError> {
                s.insert_player(player("Bea"));
                panic!("writer failed")
            })
        }));
        assert!(panicked.is_err());

        assert_eq!(store.read(|s| s.players().count()), 1);
        store
            .transaction(|s| Ok::<_, TournamentError>(s.insert_player(player("Cleo"))))
            .unwrap();
        let names: Vec<String> = store.read(|s| s.players().map(|p| p.name.clone()).collect());
        assert_eq!(names, vec!["Ada", "Cleo"]);
    }
}
