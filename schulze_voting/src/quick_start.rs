/*!

# Quick start

This example runs a small poll end to end with the `condorcet` command line
tool. Three candidates compete for one seat.

**Describing the poll** Write the candidates, the ballots and the number of
seats into a JSON file, `poll.json`:

```json
{
    "name": "Snack of the month",
    "winners": 1,
    "candidates": ["Alice", "Bob", "Charlie"],
    "ballots": [
        { "count": 4, "ranking": ["Alice", "Bob", "Charlie"] },
        { "count": 3, "ranking": ["Bob", "Charlie", "Alice"] },
        { "count": 2, "ranking": ["Charlie", "Alice", "Bob"] }
    ]
}
```

A rank entry is a candidate name, or an array of names for candidates tied at
that position: `["Alice", ["Bob", "Charlie"]]` ties Bob with Charlie behind
Alice. Every ballot must rank all the candidates.

**Resolving** Run the tool on the file:

```bash
condorcet --input poll.json
```

The summary of the resolution is printed as JSON:

```text
{
  "poll": "Snack of the month",
  "winners": ["Alice"],
  ...
}
```

Alice beats Bob 6:3 and Charlie 7:2 head to head, so she wins the seat no
matter how the other preferences fall.

**Committees** To elect a committee instead, raise `winners` in the file or
override it on the command line:

```bash
condorcet --input poll.json --winners 2
```

**Ties** A poll can end in an exact tie. By default the tool picks the first
tied outcome by candidate order and the summary lists the full tied set under
`"tied"`. Pass `--tie-break surface` to refuse the pick and report the tie
only, or `--tie-break random:<seed>` for a reproducible seeded pick.

The summary can be written to a file with `--out`, and checked against a
previously stored summary with `--reference`; any difference is printed and
the run fails.

*/
