//! CSV roster import for players and referees.
//!
//! Header: `role,name,last_name,level,score,fiscal_code`. `role` is `player`
//! or `referee`; `score` may be empty; referees need a unique fiscal code.

use crate::logic::{create_player, create_referee};
use crate::models::{NewPlayer, NewReferee, TournamentError};
use crate::store::Store;
use serde::Deserialize;
use std::io;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Store(#[from] TournamentError),
    #[error("referee on line {line} has no fiscal code")]
    MissingFiscalCode { line: u64 },
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
enum Role {
    Player,
    Referee,
}

#[derive(Debug, Deserialize)]
struct RosterRecord {
    role: Role,
    name: String,
    #[serde(default)]
    last_name: String,
    level: u32,
    score: Option<u32>,
    #[serde(default)]
    fiscal_code: String,
}

/// Rows inserted by one import.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RosterSummary {
    pub players: usize,
    pub referees: usize,
}

/// Parse the whole roster, then insert it in one transaction.
pub fn load_roster<R: io::Read>(store: &Store, reader: R) -> Result<RosterSummary, RosterError> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut players = Vec::new();
    let mut referees = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let line = row.position().map_or(0, |p| p.line());
        let record: RosterRecord = row.deserialize(Some(&headers))?;
        match record.role {
            Role::Player => players.push(NewPlayer {
                name: record.name,
                level: record.level,
                score: record.score.unwrap_or_default(),
            }),
            Role::Referee => {
                if record.fiscal_code.is_empty() {
                    return Err(RosterError::MissingFiscalCode { line });
                }
                referees.push(NewReferee {
                    name: record.name,
                    last_name: record.last_name,
                    level: record.level,
                    score: record.score.unwrap_or_default(),
                    fiscal_code: record.fiscal_code,
                })
            }
        }
    }

    store.transaction(|session| {
        let summary = RosterSummary {
            players: players.len(),
            referees: referees.len(),
        };
        for player in players {
            create_player(session, player)?;
        }
        for referee in referees {
            create_referee(session, referee)?;
        }
        log::info!(
            "Loaded roster: {} player(s), {} referee(s)",
            summary.players,
            summary.referees
        );
        Ok::<_, RosterError>(summary)
    })
}

pub fn load_roster_file(store: &Store, path: &Path) -> Result<RosterSummary, RosterError> {
    let file = std::fs::File::open(path)?;
    load_roster(store, file)
}
