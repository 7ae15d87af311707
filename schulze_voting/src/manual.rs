/*!

This is the long-form manual for `schulze_voting` and `condorcet`.

## Ballots

A ballot is a ranking over the full candidate set of a poll, written in
grouping notation: a sequence of rank groups, most preferred first. Candidates
inside the same group are tied. The ballot

```text
[["A"], ["B", "C"], ["D"]]
```

prefers `A` over everything, ties `B` with `C` below it, and puts `D` last.

Every ballot must rank every candidate of the poll exactly once. If the vote
collection layer allows partial ballots, it must complete them (for example by
appending the unranked candidates as one last tied group) before handing them
to the engine; the engine rejects incomplete ballots instead of guessing.

Ballots carry a count so that identical rankings can be submitted in aggregate
form. The engine groups identical rankings itself either way, so submitting
465 individual ballots or 20 weighted ones makes no difference to the result.

## Single winner

With one seat, the engine runs the Schulze method:

1. `d[a][b]` counts the total ballot weight strictly preferring `a` over `b`.
2. A pair contributes a direct beat-path edge of strength `d[a][b]` when
   `d[a][b] > d[b][a]`.
3. The strongest (widest-bottleneck) path strength `p[a][b]` is computed
   between every pair of candidates.
4. A candidate `a` wins when `p[a][b] >= p[b][a]` against every rival `b`.

A candidate who beats every rival head to head always wins. More than one
winner can survive step 4 only on an exact strength tie; see
[Tie-breaking](#tie-breaking).

## Committees

With more than one seat, the engine runs the proportional generalization of
the method over candidate committees. The strength of a committee `S` against
an outside challenger `c` is the best guaranteed support the voters can give
its members: each voter may back any member they rank strictly above `c`, and
the strength is the largest amount every member can be brought to
simultaneously. Voters who tie a member with the challenger are split between
the two strict readings of their ballot in proportion to the voters who were
strict, which introduces exact rational weights.

These strengths weight the links between committees that differ in exactly one
member, and the same widest-path closure as the single-winner mode then runs
over all `C(n, k)` committees. A committee that holds at least as strong a
path towards every rival committee as the path back is dominant.

The committee search is refused with an `IntractableElection` error when
`C(n, k)` (or the `2^k` tie-completion space) exceeds the configured ceiling;
see [`ResolutionRules::max_committee_count`](crate::ResolutionRules).

When `winners` equals 1 the single-winner method runs instead, and when it
equals the candidate count the full set is returned without a search.

## Tie-breaking

An exact tie between candidates or committees is a property of the method, not
a fault, and the engine never hides one: the full dominant set is always part
of the result. The `tie_break_mode` rule decides what `winners` reports:

* `SurfaceTies` (default): no winner is picked; the caller sees the tie.
* `CandidateOrder`: the first dominant entry by candidate index order.
* `Random(seed)`: the dominant entry with the smallest cryptographic digest of
  the seed and the entry's members. Reproducible for a fixed seed, hard to
  predict before the seed is chosen.

## Auditing

The result carries the `d` and `p` matrices (and the committee strength matrix
in multi-winner mode) so that the winner determination can be re-checked from
the published numbers alone. Resolving the same ballots twice yields
bit-identical artifacts.

*/
