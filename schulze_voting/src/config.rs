// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

pub use num_rational::BigRational;

/// One voter's ranking over the candidates of a poll.
///
/// The ranking is expressed in grouping notation: a sequence of rank groups,
/// most preferred first, where each group holds the candidate indices tied at
/// that preference level. A strict ordering is simply a sequence of singleton
/// groups.
///
/// A ballot must rank every candidate of the poll exactly once. Completing
/// partial ballots (for example by appending all unranked candidates as one
/// last tied group) is a policy of the layer that collects the votes, not of
/// the resolution engine.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Ballot {
    /// Rank groups, most preferred first.
    pub ranking: Vec<Vec<String>>,
    /// The number of identical ballots this entry stands for. Must be >= 1.
    pub count: u64,
}

impl Ballot {
    /// A ballot with a strict ordering (no ties) and a count of one.
    pub fn simple(ordering: &[String]) -> Ballot {
        Ballot {
            ranking: ordering.iter().map(|c| vec![c.clone()]).collect(),
            count: 1,
        }
    }
}

// ******** Output data structures *********

/// Strength matrix over the enumerated committees in multi-winner mode.
///
/// Strengths are exact rationals: proportional completion splits the weight of
/// tied rank groups, and comparing approximate values would make genuine ties
/// undetectable.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CommitteeTally {
    /// Every enumerated committee, each sorted by candidate index, in
    /// lexicographic order. Row/column indices of `strongest_paths` refer to
    /// this list.
    pub members: Vec<Vec<String>>,
    /// Widest-bottleneck path strengths between committees.
    pub strongest_paths: Vec<Vec<BigRational>>,
}

/// The outcome of resolving one poll.
///
/// The matrices are audit artifacts: they are exactly the evidence the winner
/// determination was made from, and resolving the same ballots again produces
/// identical copies.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResolutionResult {
    /// The elected candidate(s), sorted by candidate index. `None` when more
    /// than one outcome dominates and the rules say to surface ties instead of
    /// breaking them.
    pub winners: Option<Vec<String>>,
    /// All dominant outcomes, each sorted by candidate index. A decisive
    /// election has exactly one entry; entries are singletons in single-winner
    /// mode.
    pub tied: Vec<Vec<String>>,
    /// The candidates in canonical (lexicographic) order. Row/column indices
    /// of the two matrices below refer to this list.
    pub candidates: Vec<String>,
    /// `pairwise_preferences[a][b]` is the total ballot weight strictly
    /// preferring candidate `a` over candidate `b`. The diagonal is zero.
    pub pairwise_preferences: Vec<Vec<u64>>,
    /// `strongest_paths[a][b]` is the strength of the strongest beat-path from
    /// `a` to `b`.
    pub strongest_paths: Vec<Vec<u64>>,
    /// Committee-level audit data, present in multi-winner mode only.
    pub committees: Option<CommitteeTally>,
}

/// Errors that prevent a resolution from completing.
///
/// All of them are pure functions of the input: retrying the same ballots
/// yields the same error.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ResolutionError {
    /// No candidates were supplied.
    EmptyElection,
    /// Two candidates carry the same index.
    DuplicateCandidate { index: String },
    /// The number of required winners is zero or exceeds the candidate count.
    InvalidWinnerCount { requested: usize, candidates: usize },
    /// A ballot does not rank exactly the candidate set once each. The engine
    /// never repairs or drops a malformed ballot.
    InvalidBallot { reason: String },
    /// The committee search space exceeds the configured ceiling.
    IntractableElection { required: u64, limit: u64 },
}

impl Error for ResolutionError {}

impl Display for ResolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionError::EmptyElection => write!(f, "no candidates in the election"),
            ResolutionError::DuplicateCandidate { index } => {
                write!(f, "duplicate candidate index {:?}", index)
            }
            ResolutionError::InvalidWinnerCount {
                requested,
                candidates,
            } => write!(
                f,
                "cannot elect {} winners out of {} candidates",
                requested, candidates
            ),
            ResolutionError::InvalidBallot { reason } => {
                write!(f, "invalid ballot: {}", reason)
            }
            ResolutionError::IntractableElection { required, limit } => write!(
                f,
                "committee search needs {} entries, above the ceiling of {}",
                required, limit
            ),
        }
    }
}

// ********* Configuration **********

/// What to do when several candidates (or committees) dominate equally.
///
/// A genuine tie is a property of the method, not an engine fault; the policy
/// below decides whether the engine picks one outcome or reports all of them.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TieBreakMode {
    /// Report the full set of tied outcomes and leave `winners` empty.
    SurfaceTies,
    /// Pick the first tied outcome by candidate order (committees compare as
    /// sorted tuples).
    CandidateOrder,
    // Note: the random mode uses a cryptographic hash keyed by the seed
    // instead of relying on language randomness primitives, so the pick is
    // reproducible across runs and platforms.
    Random(u32),
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ResolutionRules {
    pub tie_break_mode: TieBreakMode,
    /// Ceiling on the committee enumeration (`C(n, k)` committees) and on the
    /// tie-completion pattern space (`2^k`). Multi-winner resolution fails
    /// with [`ResolutionError::IntractableElection`] instead of exceeding it.
    /// The committee closure is cubic in the committee count, so this should
    /// stay in the thousands.
    pub max_committee_count: u64,
}

impl ResolutionRules {
    pub const DEFAULT_RULES: ResolutionRules = ResolutionRules {
        tie_break_mode: TieBreakMode::SurfaceTies,
        max_committee_count: 10_000,
    };
}
