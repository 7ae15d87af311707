use clap::Parser;
use log::debug;

mod args;
mod tally;

use crate::args::Args;

fn main() {
    let args = Args::parse();
    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
    debug!("arguments: {:?}", args);

    if let Err(err) = tally::run_election(&args) {
        eprintln!("Error: {}", err);
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            eprintln!("Caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}
