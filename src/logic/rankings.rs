//! Rankings are computed on every query from current scores; nothing is stored.

use crate::store::Session;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// 1-based position.
    pub rank: usize,
    pub id: u64,
    pub name: String,
    pub score: u32,
}

/// Sort by score descending, lower id first on ties, and number from 1.
fn rank(mut rows: Vec<(u64, String, u32)>) -> Vec<RankingEntry> {
    rows.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));
    rows.into_iter()
        .enumerate()
        .map(|(i, (id, name, score))| RankingEntry {
            rank: i + 1,
            id,
            name,
            score,
        })
        .collect()
}

pub fn player_rankings(session: &Session) -> Vec<RankingEntry> {
    rank(
        session
            .players()
            .map(|p| (p.id, p.name.clone(), p.score))
            .collect(),
    )
}

pub fn referee_rankings(session: &Session) -> Vec<RankingEntry> {
    rank(
        session
            .referees()
            .map(|r| (r.id, r.full_name(), r.score))
            .collect(),
    )
}
