use log::{info, warn};

use schulze_voting::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::tally::poll_reader::{assemble_ballots, PollFile};

pub mod poll_reader;

#[derive(Debug, Snafu)]
pub enum TallyError {
    #[snafu(display("Error reading poll file {path}"))]
    ReadingPoll {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing poll file {path}"))]
    ParsingPoll {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error resolving the poll: {source}"))]
    Resolving { source: ResolutionError },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading reference summary {path}"))]
    ReadingReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing reference summary {path}"))]
    ParsingReference {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("The computed summary differs from the reference"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type TallyResult<T> = Result<T, TallyError>;

fn parse_tie_break(arg: &Option<String>) -> TallyResult<TieBreakMode> {
    match arg.as_deref() {
        None | Some("order") => Ok(TieBreakMode::CandidateOrder),
        Some("surface") => Ok(TieBreakMode::SurfaceTies),
        Some(other) => {
            if let Some(seed) = other.strip_prefix("random:") {
                if let Ok(seed) = seed.parse::<u32>() {
                    return Ok(TieBreakMode::Random(seed));
                }
            }
            whatever!("Unknown tie-break mode {:?}", other)
        }
    }
}

// Matrices are keyed by candidate on both axes; the diagonal is omitted.
// Counts are rendered as strings, like every number in the summary.
fn matrix_to_json(candidates: &[String], matrix: &[Vec<u64>]) -> JSValue {
    let mut rows = JSMap::new();
    for (a, row_label) in candidates.iter().enumerate() {
        let mut cols = JSMap::new();
        for (b, col_label) in candidates.iter().enumerate() {
            if a != b {
                cols.insert(col_label.clone(), json!(matrix[a][b].to_string()));
            }
        }
        rows.insert(row_label.clone(), JSValue::Object(cols));
    }
    JSValue::Object(rows)
}

fn result_to_json(name: &Option<String>, result: &ResolutionResult) -> JSValue {
    let mut summary = JSMap::new();
    summary.insert("poll".to_string(), json!(name));
    summary.insert("winners".to_string(), json!(result.winners));
    summary.insert("tied".to_string(), json!(result.tied));
    summary.insert("candidates".to_string(), json!(result.candidates));
    summary.insert(
        "pairwisePreferences".to_string(),
        matrix_to_json(&result.candidates, &result.pairwise_preferences),
    );
    summary.insert(
        "strongestPaths".to_string(),
        matrix_to_json(&result.candidates, &result.strongest_paths),
    );
    if let Some(tally) = &result.committees {
        let strengths: Vec<Vec<String>> = tally
            .strongest_paths
            .iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect();
        summary.insert(
            "committees".to_string(),
            json!({
                "members": tally.members,
                "strongestPaths": strengths,
            }),
        );
    }
    JSValue::Object(summary)
}

pub fn run_election(args: &Args) -> TallyResult<()> {
    let contents = fs::read_to_string(&args.input).context(ReadingPollSnafu {
        path: args.input.clone(),
    })?;
    let poll: PollFile = serde_json::from_str(&contents).context(ParsingPollSnafu {
        path: args.input.clone(),
    })?;
    info!(
        "run_election: poll {:?}: {} candidates, {} ballot records",
        poll.name,
        poll.candidates.len(),
        poll.ballots.len()
    );

    let num_winners = args.winners.unwrap_or(poll.winners);
    let rules = ResolutionRules {
        tie_break_mode: parse_tie_break(&args.tie_break)?,
        ..ResolutionRules::DEFAULT_RULES
    };
    let ballots = assemble_ballots(&poll.ballots);
    let result = resolve(&ballots, &poll.candidates, num_winners, &rules).context(ResolvingSnafu)?;

    match &result.winners {
        Some(winners) => info!("run_election: elected {:?}", winners),
        None => warn!("run_election: exact tie between {:?}", result.tied),
    }

    let summary = json!({ "results": result_to_json(&poll.name, &result) });
    let pretty = serde_json::to_string_pretty(&summary).unwrap();

    match args.out.as_deref() {
        None | Some("stdout") => println!("{}", pretty),
        Some(path) => {
            fs::write(path, pretty.as_bytes()).context(WritingSummarySnafu {
                path: path.to_string(),
            })?;
            info!("run_election: summary written to {}", path);
        }
    }

    // The reference summary, if provided for comparison.
    if let Some(ref_path) = &args.reference {
        let ref_contents = fs::read_to_string(ref_path).context(ReadingReferenceSnafu {
            path: ref_path.clone(),
        })?;
        let reference: JSValue = serde_json::from_str(&ref_contents).context(ParsingReferenceSnafu {
            path: ref_path.clone(),
        })?;
        let pretty_ref = serde_json::to_string_pretty(&reference).unwrap();
        if pretty_ref != pretty {
            warn!("Found differences with the reference summary");
            print_diff(pretty_ref.as_str(), pretty.as_str(), "\n");
            return Err(TallyError::ReferenceMismatch {});
        }
        info!("run_election: summary matches the reference");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tie_break_modes_parse() {
        assert_eq!(parse_tie_break(&None).unwrap(), TieBreakMode::CandidateOrder);
        assert_eq!(
            parse_tie_break(&Some("order".to_string())).unwrap(),
            TieBreakMode::CandidateOrder
        );
        assert_eq!(
            parse_tie_break(&Some("surface".to_string())).unwrap(),
            TieBreakMode::SurfaceTies
        );
        assert_eq!(
            parse_tie_break(&Some("random:42".to_string())).unwrap(),
            TieBreakMode::Random(42)
        );
        assert!(parse_tie_break(&Some("coin-flip".to_string())).is_err());
    }

    #[test]
    fn summary_includes_the_matrices() {
        let ballots = vec![
            Ballot::simple(&["A".to_string(), "B".to_string()]),
            Ballot::simple(&["A".to_string(), "B".to_string()]),
            Ballot::simple(&["B".to_string(), "A".to_string()]),
        ];
        let candidates = vec!["A".to_string(), "B".to_string()];
        let result = resolve(&ballots, &candidates, 1, &ResolutionRules::DEFAULT_RULES).unwrap();
        let js = result_to_json(&Some("demo".to_string()), &result);
        assert_eq!(js["winners"], json!(["A"]));
        assert_eq!(js["pairwisePreferences"]["A"]["B"], json!("2"));
        assert_eq!(js["pairwisePreferences"]["B"]["A"], json!("1"));
        assert_eq!(js["strongestPaths"]["B"]["A"], json!("0"));
        assert!(js.get("committees").is_none());
    }
}
