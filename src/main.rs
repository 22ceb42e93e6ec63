//! Word frequency explorer for 1-gram style corpus data, in the spirit of the
//! Google Books Ngram dataset: each input record gives the number of
//! occurrences of one word over one year, and once everything is loaded the
//! corpus can be queried for occurrence counts, frequency ranks over arbitrary
//! year ranges, and an overall Zipf's Law goodness-of-fit measure.

mod commands;
mod corpus;
mod progress;
mod rank;
mod store;
mod zipf;

use crate::progress::ProgressReport;
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

/// Load a word data file, then answer count, rank and Zipf queries about it
///
/// The input is a headerless CSV file with one `word,year,count` record per
/// line. Gzipped files are decompressed on the fly when the file name ends in
/// `.gz`. After the corpus is loaded, commands are read from standard input
/// (see the `help` command) until `q` or end of input.
#[derive(Parser, Debug)]
#[command(version, author)]
pub struct Args {
    /// Path of the word data file to load
    ///
    /// Will interactively prompt for a file if not specified.
    file: Option<PathBuf>,

    /// Execute a single command instead of entering the interactive loop
    ///
    /// The command uses the same syntax as interactive input, e.g.
    /// "rank carriage 1800 1899".
    #[arg(short, long, default_value = None)]
    command: Option<String>,
}
//
impl Args {
    /// Decode and validate CLI arguments
    pub fn parse_and_check() -> Result<Self> {
        // Decode CLI arguments
        let args = Args::parse();

        // Check CLI arguments for basic sanity
        if let Some(file) = &args.file {
            anyhow::ensure!(
                file.is_file(),
                "word data file {} does not exist",
                file.display()
            );
        }
        if let Some(command) = &args.command {
            anyhow::ensure!(
                !command.trim().is_empty(),
                "--command was specified but is empty"
            );
        }
        Ok(args)
    }
}
//
#[tokio::main]
async fn main() -> Result<()> {
    // Set up logging
    setup_logging().map_err(|e| anyhow::format_err!("{e}"))?;

    // Decode CLI arguments
    let args = Args::parse_and_check()?;

    // Pick a word data file
    let corpus_path = corpus::pick(&args)?;

    // Set up progress reporting
    let report = ProgressReport::new();

    // Load the corpus; it is immutable from this point on
    let store = corpus::load(&corpus_path, &report).await?;

    // Answer queries about it
    match &args.command {
        Some(line) => commands::execute_line(&store, line),
        None => commands::run(&store),
    }
}

/// Use anyhow for Result type erasure
pub use anyhow::Result;

/// Case-normalized word
pub type Word = Box<str>;

/// Year of Gregorian Calendar
pub type Year = i16;

/// Number of recorded occurrences of a word, over a year or a range of years
///
/// The most common English words occur billions of times per year in the
/// Google Books dataset, so u32 totals would be at risk of overflow.
pub type YearCount = u64;

/// Set up logging
fn setup_logging() -> syslog::Result<()> {
    syslog::init(
        syslog::Facility::LOG_USER,
        if cfg!(feature = "log-trace") {
            LevelFilter::Trace
        } else if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        None,
    )
}
