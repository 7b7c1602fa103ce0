//! Phase names, their bracket order, and the Phase row.

use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a phase.
pub type PhaseId = u64;

/// Named round of a tournament.
///
/// `FirstRound` is a non-elimination placeholder: it has no place in the
/// bracket order, awards no points by default and never advances.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseName {
    FirstRound,
    #[serde(rename = "ROUND_OF_64")]
    RoundOf64,
    #[serde(rename = "ROUND_OF_32")]
    RoundOf32,
    #[serde(rename = "ROUND_OF_16")]
    RoundOf16,
    Quarterfinal,
    Semifinal,
    Final,
}

/// Elimination phases from earliest to last.
pub const BRACKET_ORDER: [PhaseName; 6] = [
    PhaseName::RoundOf64,
    PhaseName::RoundOf32,
    PhaseName::RoundOf16,
    PhaseName::Quarterfinal,
    PhaseName::Semifinal,
    PhaseName::Final,
];

impl PhaseName {
    /// Position in [`BRACKET_ORDER`], `None` for the placeholder round.
    pub fn bracket_index(self) -> Option<usize> {
        BRACKET_ORDER.iter().position(|&p| p == self)
    }

    /// The phase that follows this one, if any.
    pub fn next(self) -> Option<PhaseName> {
        let idx = self.bracket_index()?;
        BRACKET_ORDER.get(idx + 1).copied()
    }

    pub fn is_terminal(self) -> bool {
        self == PhaseName::Final
    }

    /// First phase of a bracket with `entrants` players (2, 4, ..., 64).
    pub fn opening_for(entrants: usize) -> Option<PhaseName> {
        match entrants {
            64 => Some(PhaseName::RoundOf64),
            32 => Some(PhaseName::RoundOf32),
            16 => Some(PhaseName::RoundOf16),
            8 => Some(PhaseName::Quarterfinal),
            4 => Some(PhaseName::Semifinal),
            2 => Some(PhaseName::Final),
            _ => None,
        }
    }

    /// This phase and every phase after it, ending with `Final`.
    pub fn remaining(self) -> &'static [PhaseName] {
        match self.bracket_index() {
            Some(idx) => &BRACKET_ORDER[idx..],
            None => &[],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PhaseName::FirstRound => "FIRST_ROUND",
            PhaseName::RoundOf64 => "ROUND_OF_64",
            PhaseName::RoundOf32 => "ROUND_OF_32",
            PhaseName::RoundOf16 => "ROUND_OF_16",
            PhaseName::Quarterfinal => "QUARTERFINAL",
            PhaseName::Semifinal => "SEMIFINAL",
            PhaseName::Final => "FINAL",
        }
    }
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One phase instance of a tournament, with its scheduling window.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub id: PhaseId,
    pub tournament_id: TournamentId,
    pub name: PhaseName,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}
