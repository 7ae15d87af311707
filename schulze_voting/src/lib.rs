pub mod builder;
mod committee;
mod config;
pub mod manual;
pub mod quick_start;

use log::{debug, info};

use std::{
    collections::HashMap,
    ops::{Add, AddAssign},
};

pub use crate::config::*;

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub(crate) struct CandidateId(pub(crate) u32);

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
pub(crate) struct VoteWeight(pub(crate) u64);

impl VoteWeight {
    pub(crate) const EMPTY: VoteWeight = VoteWeight(0);
}

impl std::iter::Sum for VoteWeight {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        VoteWeight(iter.map(|w| w.0).sum())
    }
}

impl AddAssign for VoteWeight {
    fn add_assign(&mut self, rhs: VoteWeight) {
        self.0 += rhs.0;
    }
}

impl Add for VoteWeight {
    type Output = VoteWeight;
    fn add(self: VoteWeight, rhs: VoteWeight) -> VoteWeight {
        VoteWeight(self.0 + rhs.0)
    }
}

// A validated ranking with every rank group sorted by candidate id.
// Invariant: every candidate of the poll appears in exactly one group.
#[derive(Eq, PartialEq, Debug, Clone, Hash, PartialOrd, Ord)]
pub(crate) struct CanonicalOrdering {
    pub(crate) ranks: Vec<Vec<CandidateId>>,
}

// The unit the resolver works on: one distinct ordering and the total weight
// of the ballots that expressed it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub(crate) struct WeightedOrdering {
    pub(crate) ordering: CanonicalOrdering,
    pub(crate) weight: VoteWeight,
}

impl WeightedOrdering {
    /// Rank-group position of every candidate, indexed by candidate id.
    pub(crate) fn rank_positions(&self, num_candidates: usize) -> Vec<usize> {
        let mut pos = vec![usize::MAX; num_candidates];
        for (rank, group) in self.ordering.ranks.iter().enumerate() {
            for cid in group {
                pos[cid.0 as usize] = rank;
            }
        }
        pos
    }
}

// The candidate set of one poll, interned to dense ids in canonical
// (lexicographic) order.
struct Roster {
    labels: Vec<String>,
    ids: HashMap<String, CandidateId>,
}

fn build_roster(candidates: &[String]) -> Result<Roster, ResolutionError> {
    if candidates.is_empty() {
        return Err(ResolutionError::EmptyElection);
    }
    let mut labels = candidates.to_vec();
    labels.sort();
    for pair in labels.windows(2) {
        if pair[0] == pair[1] {
            return Err(ResolutionError::DuplicateCandidate {
                index: pair[0].clone(),
            });
        }
    }
    let ids = labels
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.clone(), CandidateId(idx as u32)))
        .collect();
    Ok(Roster { labels, ids })
}

// Interns and validates every ballot against the roster. A ballot that does
// not rank exactly the candidate set once each is rejected, never repaired.
fn check_ballots(
    ballots: &[Ballot],
    roster: &Roster,
) -> Result<Vec<(CanonicalOrdering, VoteWeight)>, ResolutionError> {
    let n = roster.labels.len();
    let mut checked = Vec::with_capacity(ballots.len());
    for ballot in ballots {
        if ballot.count == 0 {
            return Err(ResolutionError::InvalidBallot {
                reason: "ballot with a zero count".to_string(),
            });
        }
        let mut seen = vec![false; n];
        let mut ranked = 0usize;
        let mut ranks = Vec::with_capacity(ballot.ranking.len());
        for group in &ballot.ranking {
            if group.is_empty() {
                return Err(ResolutionError::InvalidBallot {
                    reason: "empty rank group".to_string(),
                });
            }
            let mut ids = Vec::with_capacity(group.len());
            for name in group {
                let cid = match roster.ids.get(name) {
                    Some(cid) => *cid,
                    None => {
                        return Err(ResolutionError::InvalidBallot {
                            reason: format!("unknown candidate {:?}", name),
                        })
                    }
                };
                if seen[cid.0 as usize] {
                    return Err(ResolutionError::InvalidBallot {
                        reason: format!("candidate {:?} ranked more than once", name),
                    });
                }
                seen[cid.0 as usize] = true;
                ranked += 1;
                ids.push(cid);
            }
            ids.sort_unstable();
            ranks.push(ids);
        }
        if ranked != n {
            return Err(ResolutionError::InvalidBallot {
                reason: format!("ballot ranks {} of {} candidates", ranked, n),
            });
        }
        checked.push((CanonicalOrdering { ranks }, VoteWeight(ballot.count)));
    }
    Ok(checked)
}

// Collapses structurally identical orderings into weighted orderings. The
// resolution only depends on distinct orderings and their total weights.
fn aggregate_ballots(checked: Vec<(CanonicalOrdering, VoteWeight)>) -> Vec<WeightedOrdering> {
    let mut groups: HashMap<CanonicalOrdering, VoteWeight> = HashMap::new();
    for (ordering, weight) in checked {
        *groups.entry(ordering).or_insert(VoteWeight::EMPTY) += weight;
    }
    let mut orderings: Vec<WeightedOrdering> = groups
        .into_iter()
        .map(|(ordering, weight)| WeightedOrdering { ordering, weight })
        .collect();
    // Fixed order so that repeated runs are identical bit for bit.
    orderings.sort_by(|a, b| a.ordering.cmp(&b.ordering));
    orderings
}

// d[a][b]: total weight strictly preferring a over b. Candidates tied in the
// same rank group contribute nothing between themselves.
fn pairwise_matrix(orderings: &[WeightedOrdering], num_candidates: usize) -> Vec<Vec<u64>> {
    let n = num_candidates;
    let mut d = vec![vec![0u64; n]; n];
    for wo in orderings {
        let pos = wo.rank_positions(n);
        for a in 0..n {
            for b in 0..n {
                if pos[a] < pos[b] {
                    d[a][b] += wo.weight.0;
                }
            }
        }
    }
    d
}

// Widest-path closure. A pair contributes a direct edge only when it is won
// outright; every pair is then relaxed through every intermediate candidate.
fn widest_path_closure(d: &[Vec<u64>]) -> Vec<Vec<u64>> {
    let n = d.len();
    let mut p = vec![vec![0u64; n]; n];
    for a in 0..n {
        for b in 0..n {
            if a != b && d[a][b] > d[b][a] {
                p[a][b] = d[a][b];
            }
        }
    }
    for i in 0..n {
        for a in 0..n {
            if a == i {
                continue;
            }
            for b in 0..n {
                if b == i || b == a {
                    continue;
                }
                let through = p[a][i].min(p[i][b]);
                if through > p[a][b] {
                    p[a][b] = through;
                }
            }
        }
    }
    p
}

// A candidate dominates when its strongest path towards every rival is at
// least as strong as the rival's path back.
fn dominant_candidates(p: &[Vec<u64>]) -> Vec<usize> {
    let n = p.len();
    (0..n)
        .filter(|&a| (0..n).all(|b| p[a][b] >= p[b][a]))
        .collect()
}

// Picks one entry among the tied outcomes, or None when the policy is to
// report the tie. `keys` must already be in candidate order.
fn pick_tied_entry(keys: &[String], mode: TieBreakMode) -> Option<usize> {
    if keys.len() == 1 {
        return Some(0);
    }
    match mode {
        TieBreakMode::SurfaceTies => None,
        TieBreakMode::CandidateOrder => Some(0),
        TieBreakMode::Random(seed) => keys
            .iter()
            .enumerate()
            .min_by_key(|(_, key)| sha256::digest(format!("{:08}{}", seed, key)))
            .map(|(idx, _)| idx),
    }
}

/// Resolves a closed poll into a winner or a committee of winners.
///
/// Arguments:
/// * `ballots` all the ballots cast before the poll closed. Each one must rank
///   exactly the members of `candidates`, once each.
/// * `candidates` the candidate set, fixed for the lifetime of the poll.
/// * `num_winners` 1 for a single seat, more for a proportional committee.
/// * `rules` the tie-break policy and the committee search ceiling.
///
/// The computation is pure: no state is retained between calls and the same
/// inputs always produce the same output.
pub fn resolve(
    ballots: &[Ballot],
    candidates: &[String],
    num_winners: usize,
    rules: &ResolutionRules,
) -> Result<ResolutionResult, ResolutionError> {
    let roster = build_roster(candidates)?;
    let n = roster.labels.len();
    if num_winners == 0 || num_winners > n {
        return Err(ResolutionError::InvalidWinnerCount {
            requested: num_winners,
            candidates: n,
        });
    }
    info!(
        "resolve: processing {} ballots, {} candidates, {} winner(s)",
        ballots.len(),
        n,
        num_winners
    );
    for (idx, name) in roster.labels.iter().enumerate() {
        debug!("Candidate {}: {}", idx, name);
    }

    let checked = check_ballots(ballots, &roster)?;
    let orderings = aggregate_ballots(checked);
    info!("resolve: {} distinct orderings", orderings.len());

    let d = pairwise_matrix(&orderings, n);
    let p = widest_path_closure(&d);
    debug!("resolve: pairwise preferences: {:?}", d);
    debug!("resolve: strongest paths: {:?}", p);

    // Every candidate gets a seat; the ballots cannot change that.
    if num_winners == n {
        return Ok(ResolutionResult {
            winners: Some(roster.labels.clone()),
            tied: vec![roster.labels.clone()],
            candidates: roster.labels,
            pairwise_preferences: d,
            strongest_paths: p,
            committees: None,
        });
    }

    if num_winners == 1 {
        let dominant = dominant_candidates(&p);
        let tied: Vec<Vec<String>> = dominant
            .iter()
            .map(|&a| vec![roster.labels[a].clone()])
            .collect();
        let keys: Vec<String> = tied.iter().map(|set| set.join("/")).collect();
        let winners = pick_tied_entry(&keys, rules.tie_break_mode).map(|idx| tied[idx].clone());
        info!("resolve: dominant candidates {:?}, elected {:?}", tied, winners);
        Ok(ResolutionResult {
            winners,
            tied,
            candidates: roster.labels,
            pairwise_preferences: d,
            strongest_paths: p,
            committees: None,
        })
    } else {
        let resolution =
            committee::resolve_committees(&orderings, n, num_winners, rules.max_committee_count)?;
        let members: Vec<Vec<String>> = resolution
            .committees
            .iter()
            .map(|committee| {
                committee
                    .iter()
                    .map(|cid| roster.labels[cid.0 as usize].clone())
                    .collect()
            })
            .collect();
        let tied: Vec<Vec<String>> = resolution
            .dominant
            .iter()
            .map(|&idx| members[idx].clone())
            .collect();
        let keys: Vec<String> = tied.iter().map(|set| set.join("/")).collect();
        let winners = pick_tied_entry(&keys, rules.tie_break_mode).map(|idx| tied[idx].clone());
        info!("resolve: dominant committees {:?}, elected {:?}", tied, winners);
        Ok(ResolutionResult {
            winners,
            tied,
            candidates: roster.labels,
            pairwise_preferences: d,
            strongest_paths: p,
            committees: Some(CommitteeTally {
                members,
                strongest_paths: resolution.strengths,
            }),
        })
    }
}
