//! Committee (multi-winner) resolution.
//!
//! Candidate committees of the required size are compared with the same
//! strongest-path machinery as single candidates. The strength of a committee
//! against an outside challenger is the best guaranteed support each member
//! can be given by the voters who prefer that member over the challenger;
//! tied rank groups are first resolved by proportional completion, which is
//! why everything here is computed with exact rationals.

use log::debug;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

use std::collections::HashMap;

use crate::{CandidateId, ResolutionError, WeightedOrdering};

pub(crate) struct CommitteeResolution {
    /// All size-k committees, each sorted, in lexicographic order.
    pub(crate) committees: Vec<Vec<CandidateId>>,
    /// Widest-path strengths between committees.
    pub(crate) strengths: Vec<Vec<BigRational>>,
    /// Indices of the committees that dominate every other committee.
    pub(crate) dominant: Vec<usize>,
}

fn ratio(value: u64) -> BigRational {
    BigRational::from_integer(BigInt::from(value))
}

fn binomial(n: u64, k: u64) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        acc = acc.saturating_mul((n - i) as u128) / (i as u128 + 1);
    }
    acc
}

// The committee closure is cubic in C(n, k) and the tie completion works over
// 2^k patterns; both must stay under the ceiling or the search is refused.
fn check_tractable(n: usize, k: usize, limit: u64) -> Result<(), ResolutionError> {
    let committees = binomial(n as u64, k as u64);
    if committees > limit as u128 {
        return Err(ResolutionError::IntractableElection {
            required: committees.min(u64::MAX as u128) as u64,
            limit,
        });
    }
    let patterns: u128 = if k >= 64 { u128::MAX } else { 1u128 << k };
    if patterns > limit as u128 {
        return Err(ResolutionError::IntractableElection {
            required: patterns.min(u64::MAX as u128) as u64,
            limit,
        });
    }
    Ok(())
}

// All k-subsets of the candidate ids, in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<CandidateId>> {
    let mut combos = Vec::new();
    if k == 0 || k > n {
        return combos;
    }
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        combos.push(idx.iter().map(|&i| CandidateId(i as u32)).collect());
        // Rightmost position that can still advance.
        let pos = match (0..k).rev().find(|&i| idx[i] != n - k + i) {
            Some(pos) => pos,
            None => return combos,
        };
        idx[pos] += 1;
        for i in pos + 1..k {
            idx[i] = idx[i - 1] + 1;
        }
    }
}

// Preference pattern of one ballot over the committee members, against a
// challenger. Bit i of the first mask is set when member i is ranked strictly
// above the challenger, bit i of the second when the two share a rank group.
type Pattern = (u32, u32);

// Tallies the ballot patterns for `members` against `challenger` and resolves
// every tied position by proportional completion: the weight of a pattern
// tied at a position moves to its two strict refinements in proportion to the
// weight those refinements already carry, half and half when neither carries
// any. Returns the completed weights indexed by preferred-member mask.
fn completed_profile(
    positions: &[(Vec<usize>, u64)],
    members: &[CandidateId],
    challenger: CandidateId,
) -> Vec<BigRational> {
    let k = members.len();
    let mut profile: HashMap<Pattern, BigRational> = HashMap::new();
    for (pos, weight) in positions {
        let challenger_rank = pos[challenger.0 as usize];
        let mut preferred = 0u32;
        let mut tied = 0u32;
        for (i, member) in members.iter().enumerate() {
            let member_rank = pos[member.0 as usize];
            if member_rank < challenger_rank {
                preferred |= 1 << i;
            } else if member_rank == challenger_rank {
                tied |= 1 << i;
            }
        }
        let entry = profile
            .entry((preferred, tied))
            .or_insert_with(BigRational::zero);
        *entry += ratio(*weight);
    }

    for i in 0..k {
        let bit = 1u32 << i;
        let tied_entries: Vec<(Pattern, BigRational)> = profile
            .iter()
            .filter(|((_, tied), _)| tied & bit != 0)
            .map(|(pattern, weight)| (*pattern, weight.clone()))
            .collect();
        if tied_entries.is_empty() {
            continue;
        }
        for (pattern, _) in &tied_entries {
            profile.remove(pattern);
        }
        let half = BigRational::new(BigInt::from(1), BigInt::from(2));
        let mut moved: Vec<(Pattern, BigRational)> = Vec::new();
        for ((preferred, tied), weight) in tied_entries {
            let refined_pref = (preferred | bit, tied & !bit);
            let refined_against = (preferred, tied & !bit);
            let base_pref = profile
                .get(&refined_pref)
                .cloned()
                .unwrap_or_else(BigRational::zero);
            let base_against = profile
                .get(&refined_against)
                .cloned()
                .unwrap_or_else(BigRational::zero);
            let base_total = &base_pref + &base_against;
            if base_total.is_zero() {
                moved.push((refined_pref, &weight * &half));
                moved.push((refined_against, &weight * &half));
            } else {
                moved.push((refined_pref, &weight * &base_pref / &base_total));
                moved.push((refined_against, &weight * &base_against / &base_total));
            }
        }
        for (pattern, weight) in moved {
            let entry = profile.entry(pattern).or_insert_with(BigRational::zero);
            *entry += weight;
        }
    }

    let mut by_mask = vec![BigRational::zero(); 1usize << k];
    for ((preferred, tied), weight) in profile {
        debug_assert_eq!(tied, 0, "completion left a tied position behind");
        by_mask[preferred as usize] += weight;
    }
    by_mask
}

// Largest r such that the pattern weights can be routed to the members (a
// pattern may feed any member it prefers over the challenger) with every
// member receiving at least r. By max-flow duality this is the minimum, over
// nonempty member subsets U, of the weight able to reach U divided by |U|.
fn vote_management_strength(by_mask: Vec<BigRational>, k: usize) -> BigRational {
    let full = (1usize << k) - 1;
    // inside[v]: total weight of patterns whose support lies within v.
    let mut inside = by_mask;
    for i in 0..k {
        let bit = 1usize << i;
        for v in 0..=full {
            if v & bit != 0 {
                let lower = inside[v ^ bit].clone();
                inside[v] += lower;
            }
        }
    }
    let total = inside[full].clone();
    let mut strength: Option<BigRational> = None;
    for u in 1..=full {
        let reachable = &total - &inside[full ^ u];
        let candidate = reachable / ratio(u.count_ones() as u64);
        if strength.as_ref().map_or(true, |s| candidate < *s) {
            strength = Some(candidate);
        }
    }
    strength.unwrap_or_else(BigRational::zero)
}

pub(crate) fn resolve_committees(
    orderings: &[WeightedOrdering],
    num_candidates: usize,
    committee_size: usize,
    max_committee_count: u64,
) -> Result<CommitteeResolution, ResolutionError> {
    let n = num_candidates;
    let k = committee_size;
    check_tractable(n, k, max_committee_count)?;

    let committees = combinations(n, k);
    let count = committees.len();
    let index: HashMap<Vec<CandidateId>, usize> = committees
        .iter()
        .cloned()
        .enumerate()
        .map(|(idx, committee)| (committee, idx))
        .collect();
    debug!(
        "resolve_committees: {} committees of size {} over {} candidates",
        count, k, n
    );

    let positions: Vec<(Vec<usize>, u64)> = orderings
        .iter()
        .map(|wo| (wo.rank_positions(n), wo.weight.0))
        .collect();

    // Direct strengths: the strength of committee S against challenger c
    // weights the links from S to every committee trading one member for c.
    let mut direct = vec![vec![BigRational::zero(); count]; count];
    for extended in combinations(n, k + 1) {
        for (ci, challenger) in extended.iter().enumerate() {
            let mut members = extended.clone();
            members.remove(ci);
            let profile = completed_profile(&positions, &members, *challenger);
            let strength = vote_management_strength(profile, k);
            if strength.is_zero() {
                continue;
            }
            debug!(
                "resolve_committees: {:?} holds {} against {:?}",
                members, strength, challenger
            );
            let from = index[&members];
            for mi in 0..k {
                let mut target = members.clone();
                target[mi] = *challenger;
                target.sort_unstable();
                direct[from][index[&target]] = strength.clone();
            }
        }
    }

    // The same init and widest-path closure as the single-candidate mode,
    // lifted to committees.
    let mut strengths = vec![vec![BigRational::zero(); count]; count];
    for a in 0..count {
        for b in 0..count {
            if a != b && direct[a][b] > direct[b][a] {
                strengths[a][b] = direct[a][b].clone();
            }
        }
    }
    for i in 0..count {
        for a in 0..count {
            if a == i {
                continue;
            }
            for b in 0..count {
                if b == i || b == a {
                    continue;
                }
                let through = {
                    let left = &strengths[a][i];
                    let right = &strengths[i][b];
                    if left <= right {
                        left.clone()
                    } else {
                        right.clone()
                    }
                };
                if through > strengths[a][b] {
                    strengths[a][b] = through;
                }
            }
        }
    }

    let dominant: Vec<usize> = (0..count)
        .filter(|&a| (0..count).all(|b| strengths[a][b] >= strengths[b][a]))
        .collect();

    Ok(CommitteeResolution {
        committees,
        strengths,
        dominant,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        resolve, Ballot, CanonicalOrdering, ResolutionRules, TieBreakMode, VoteWeight,
    };

    fn names(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    fn strict(ordering: &str, count: u64) -> Ballot {
        Ballot {
            ranking: ordering
                .split_whitespace()
                .map(|c| vec![c.to_string()])
                .collect(),
            count,
        }
    }

    fn ordering(groups: &[&[u32]], weight: u64) -> WeightedOrdering {
        WeightedOrdering {
            ordering: CanonicalOrdering {
                ranks: groups
                    .iter()
                    .map(|group| group.iter().map(|&id| CandidateId(id)).collect())
                    .collect(),
            },
            weight: VoteWeight(weight),
        }
    }

    #[test]
    fn binomial_values() {
        assert_eq!(binomial(5, 2), 10);
        assert_eq!(binomial(4, 0), 1);
        assert_eq!(binomial(3, 5), 0);
        assert_eq!(binomial(30, 15), 155_117_520);
    }

    #[test]
    fn combinations_are_lexicographic() {
        let combos = combinations(4, 2);
        let expected: Vec<Vec<CandidateId>> = vec![
            vec![CandidateId(0), CandidateId(1)],
            vec![CandidateId(0), CandidateId(2)],
            vec![CandidateId(0), CandidateId(3)],
            vec![CandidateId(1), CandidateId(2)],
            vec![CandidateId(1), CandidateId(3)],
            vec![CandidateId(2), CandidateId(3)],
        ];
        assert_eq!(combos, expected);
    }

    #[test]
    fn strength_is_limited_by_the_shared_support() {
        // 50 ballots support both members, 50 support neither: the members
        // can split no more than 25 each.
        let by_mask = vec![ratio(50), BigRational::zero(), BigRational::zero(), ratio(50)];
        assert_eq!(vote_management_strength(by_mask, 2), ratio(25));
    }

    #[test]
    fn strength_is_zero_without_support() {
        let by_mask = vec![ratio(80), BigRational::zero(), BigRational::zero(), BigRational::zero()];
        assert_eq!(vote_management_strength(by_mask, 2), BigRational::zero());
    }

    #[test]
    fn completion_splits_evenly_without_strict_evidence() {
        // Candidates A=0, B=1, C=2. Members {A, C} against B.
        // 60 ballots (A B) > C, 40 ballots C > (A B): every ballot ties A
        // with B, and no strict evidence exists for either refinement.
        let positions = vec![
            (vec![0usize, 0, 1], 60u64),
            (vec![1usize, 1, 0], 40u64),
        ];
        let members = vec![CandidateId(0), CandidateId(2)];
        let by_mask = completed_profile(&positions, &members, CandidateId(1));
        assert_eq!(by_mask[0b00], ratio(30));
        assert_eq!(by_mask[0b01], ratio(30));
        assert_eq!(by_mask[0b10], ratio(20));
        assert_eq!(by_mask[0b11], ratio(20));
        assert_eq!(vote_management_strength(by_mask, 2), ratio(35));
    }

    #[test]
    fn two_factions_elect_one_member_each() {
        let candidates = names(&["A", "B", "C", "D"]);
        let ballots = vec![strict("A B C D", 50), strict("C D A B", 50)];
        let res = resolve(&ballots, &candidates, 2, &ResolutionRules::DEFAULT_RULES).unwrap();
        assert_eq!(res.winners, Some(names(&["A", "C"])));
        assert_eq!(res.tied, vec![names(&["A", "C"])]);
        let tally = res.committees.unwrap();
        assert_eq!(tally.members.len(), 6);
    }

    #[test]
    fn symmetric_electorate_surfaces_both_committees() {
        let candidates = names(&["A", "B", "C"]);
        let ballots = vec![
            Ballot {
                ranking: vec![
                    vec!["A".to_string(), "B".to_string()],
                    vec!["C".to_string()],
                ],
                count: 60,
            },
            Ballot {
                ranking: vec![
                    vec!["C".to_string()],
                    vec!["A".to_string(), "B".to_string()],
                ],
                count: 40,
            },
        ];
        let res = resolve(&ballots, &candidates, 2, &ResolutionRules::DEFAULT_RULES).unwrap();
        // A and B are interchangeable on every ballot, so the two committees
        // containing C dominate equally.
        assert_eq!(res.winners, None);
        assert_eq!(res.tied, vec![names(&["A", "C"]), names(&["B", "C"])]);

        let rules = ResolutionRules {
            tie_break_mode: TieBreakMode::CandidateOrder,
            ..ResolutionRules::DEFAULT_RULES
        };
        let res = resolve(&ballots, &candidates, 2, &rules).unwrap();
        assert_eq!(res.winners, Some(names(&["A", "C"])));
    }

    #[test]
    fn single_seat_committees_reduce_to_pairwise_preferences() {
        // With strict ballots and committees of one, the committee strengths
        // are exactly the pairwise preferences, so the dominant singleton must
        // be the single-winner result of the same election.
        let orderings = vec![
            ordering(&[&[0], &[2], &[1], &[4], &[3]], 5),
            ordering(&[&[0], &[3], &[4], &[2], &[1]], 5),
            ordering(&[&[1], &[4], &[3], &[0], &[2]], 8),
            ordering(&[&[2], &[0], &[1], &[4], &[3]], 3),
            ordering(&[&[2], &[0], &[4], &[1], &[3]], 7),
            ordering(&[&[2], &[1], &[0], &[3], &[4]], 2),
            ordering(&[&[3], &[2], &[4], &[1], &[0]], 7),
            ordering(&[&[4], &[1], &[0], &[3], &[2]], 8),
        ];
        let res = resolve_committees(&orderings, 5, 1, 10_000).unwrap();
        assert_eq!(res.committees.len(), 5);
        assert_eq!(res.dominant, vec![4]);
        // Strongest path from {E} to {D} mirrors the candidate-level value.
        assert_eq!(res.strengths[4][3], ratio(31));
    }

    #[test]
    fn ceiling_guards_both_search_spaces() {
        assert!(check_tractable(30, 15, 10_000).is_err());
        assert!(check_tractable(21, 20, 10_000).is_err());
        assert!(check_tractable(10, 3, 10_000).is_ok());
    }
}
