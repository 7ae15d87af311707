pub use crate::config::*;

/// A builder for assembling a poll ballot by ballot.
///
/// ```
/// use schulze_voting::builder::Builder;
/// use schulze_voting::ResolutionRules;
/// # use schulze_voting::ResolutionError;
///
/// let mut builder = Builder::new(&ResolutionRules::DEFAULT_RULES)?
///     .candidates(&["Anna".to_string(), "Bob".to_string()])?;
///
/// builder.add_ranking(&["Anna".to_string(), "Bob".to_string()])?;
/// builder.add_ranking(&["Bob".to_string(), "Anna".to_string()])?;
/// builder.add_ranking(&["Anna".to_string(), "Bob".to_string()])?;
///
/// let result = builder.resolve(1)?;
/// assert_eq!(result.winners, Some(vec!["Anna".to_string()]));
///
/// # Ok::<(), ResolutionError>(())
/// ```
pub struct Builder {
    pub(crate) _rules: ResolutionRules,
    pub(crate) _candidates: Option<Vec<String>>,
    pub(crate) _ballots: Vec<Ballot>,
}

impl Builder {
    pub fn new(rules: &ResolutionRules) -> Result<Builder, ResolutionError> {
        Ok(Builder {
            _rules: rules.clone(),
            _candidates: None,
            _ballots: Vec::new(),
        })
    }

    /// Declares the candidate set of the poll. Must be called before
    /// resolving; ballots are validated against this set.
    pub fn candidates(self, cands: &[String]) -> Result<Builder, ResolutionError> {
        Ok(Builder {
            _rules: self._rules,
            _candidates: Some(cands.to_vec()),
            _ballots: self._ballots,
        })
    }

    /// Adds a single ballot with a strict ordering, most preferred first.
    ///
    /// It is the simplest use case for most polls.
    pub fn add_ranking(&mut self, ordering: &[String]) -> Result<(), ResolutionError> {
        self.add_ballot(&Ballot::simple(ordering))
    }

    /// Adds a ballot in grouping notation, with a weight attached to it.
    ///
    /// `ranking`: the rank groups in order of preference; candidates inside a
    /// group are tied. The groups must cover the candidate set exactly.
    pub fn add_grouped(&mut self, ranking: &[Vec<String>], count: u64) -> Result<(), ResolutionError> {
        self.add_ballot(&Ballot {
            ranking: ranking.to_vec(),
            count,
        })
    }

    pub fn add_ballot(&mut self, ballot: &Ballot) -> Result<(), ResolutionError> {
        self._ballots.push(ballot.clone());
        Ok(())
    }

    /// Runs the resolution over everything added so far.
    ///
    /// Malformed ballots are reported here rather than at insertion time, so
    /// that ballots may be added before the candidate set is declared.
    pub fn resolve(&self, num_winners: usize) -> Result<ResolutionResult, ResolutionError> {
        let candidates = match &self._candidates {
            Some(cands) => cands.as_slice(),
            None => return Err(ResolutionError::EmptyElection),
        };
        crate::resolve(&self._ballots, candidates, num_winners, &self._rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_candidates() {
        let builder = Builder::new(&ResolutionRules::DEFAULT_RULES).unwrap();
        assert_eq!(builder.resolve(1), Err(ResolutionError::EmptyElection));
    }

    #[test]
    fn builder_resolves_grouped_ballots() {
        let mut builder = Builder::new(&ResolutionRules::DEFAULT_RULES)
            .unwrap()
            .candidates(&["A".to_string(), "B".to_string(), "C".to_string()])
            .unwrap();
        builder
            .add_grouped(
                &[
                    vec!["A".to_string(), "B".to_string()],
                    vec!["C".to_string()],
                ],
                2,
            )
            .unwrap();
        builder
            .add_grouped(&[vec!["C".to_string()], vec!["A".to_string(), "B".to_string()]], 1)
            .unwrap();
        let result = builder.resolve(1).unwrap();
        // A and B are tied on every ballot and both beat C.
        assert_eq!(result.winners, None);
        assert_eq!(
            result.tied,
            vec![vec!["A".to_string()], vec!["B".to_string()]]
        );
    }
}
