//! Player and Referee rows.

use serde::{Deserialize, Serialize};

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = u64;

/// Unique identifier for a referee.
pub type RefereeId = u64;

/// A player. Ranking is never stored; see [`crate::logic::player_rankings`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Compared against a tournament's minimum level on registration.
    pub level: u32,
    /// Points accumulated over the player's tournament history.
    pub score: u32,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub name: String,
    pub level: u32,
    #[serde(default)]
    pub score: u32,
}

impl Player {
    pub fn from_new(id: PlayerId, new: NewPlayer) -> Self {
        Self {
            id,
            name: new.name,
            level: new.level,
            score: new.score,
        }
    }

    /// Add points to the running score.
    pub fn add_points(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }
}

/// A referee, scored per officiated match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Referee {
    pub id: RefereeId,
    pub name: String,
    pub last_name: String,
    pub level: u32,
    pub score: u32,
    pub fiscal_code: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewReferee {
    pub name: String,
    pub last_name: String,
    pub level: u32,
    #[serde(default)]
    pub score: u32,
    pub fiscal_code: String,
}

impl Referee {
    pub fn from_new(id: RefereeId, new: NewReferee) -> Self {
        Self {
            id,
            name: new.name,
            last_name: new.last_name,
            level: new.level,
            score: new.score,
            fiscal_code: new.fiscal_code,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }

    pub fn add_points(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }
}
