use schulze_voting::Ballot;

use serde::{Deserialize, Serialize};

/// One rank position in a stored ballot: a single candidate index, or a group
/// of indices tied at that position.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RankEntry {
    Single(String),
    Tied(Vec<String>),
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BallotRecord {
    /// The number of identical ballots this record stands for.
    #[serde(default = "default_count")]
    pub count: u64,
    /// Rank entries, most preferred first.
    pub ranking: Vec<RankEntry>,
}

fn default_count() -> u64 {
    1
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PollFile {
    pub name: Option<String>,
    pub candidates: Vec<String>,
    #[serde(default = "default_winners")]
    pub winners: usize,
    pub ballots: Vec<BallotRecord>,
}

fn default_winners() -> usize {
    1
}

pub fn assemble_ballots(records: &[BallotRecord]) -> Vec<Ballot> {
    records
        .iter()
        .map(|record| Ballot {
            ranking: record
                .ranking
                .iter()
                .map(|entry| match entry {
                    RankEntry::Single(name) => vec![name.clone()],
                    RankEntry::Tied(names) => names.clone(),
                })
                .collect(),
            count: record.count,
        })
        .collect()
}
