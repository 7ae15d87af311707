use clap::Parser;

/// This is a ranked-ballot poll resolution program using the Schulze method.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The poll to resolve: candidates, ballots and the number of
    /// seats, in JSON format. For more information about the file format, read
    /// the documentation of the schulze_voting crate.
    #[clap(short, long, value_parser)]
    pub input: String,

    /// If specified, overrides the number of winners declared in the poll file.
    #[clap(short, long, value_parser)]
    pub winners: Option<usize>,

    /// (default 'order') The tie-break policy: 'order' picks the first tied
    /// outcome by candidate order, 'surface' refuses to pick and only reports
    /// the tie, 'random:<seed>' picks with a reproducible seeded permutation.
    #[clap(short, long, value_parser)]
    pub tie_break: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the poll
    /// resolution will be written in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the summary of a previous
    /// resolution in JSON format. If provided, condorcet will check that the
    /// freshly computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
