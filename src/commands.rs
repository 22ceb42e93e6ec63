//! Interactive query commands
//!
//! Once the corpus is loaded, the program answers queries typed on standard
//! input, one command per line. Each input line is parsed into a [`Command`]
//! value which is then dispatched to the store; input errors are reported and
//! the loop carries on. The same parser serves the `--command` one-shot mode.

use crate::{
    store::{InvalidRange, Scope, WordStore},
    zipf::ZipfFit,
    Result, Year,
};
use std::io::{self, BufRead, BufWriter, Write};
use thiserror::Error;

/// Command table: name, argument form, description
///
/// This is the single source of truth for the argument forms reported by
/// usage errors and for the `help` display.
const COMMANDS: &[(&str, &str, &str)] = &[
    ("zipf", "[ table ]", "Compute a Zipf's law fit over the corpus."),
    (
        "count",
        "word [ start-year [ end-year ] ]",
        "Show occurrences of a word.",
    ),
    (
        "rank",
        "word [ start-year [ end-year ] ]",
        "Show the frequency rank of a word.",
    ),
    ("dump", "", "Dump every recorded (word, year, count) triple."),
    ("stats", "", "Show corpus size statistics."),
    ("help", "", "Show this message."),
    ("q", "", "Quit."),
];

/// One query command, as typed by the user
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// Zipf's law fit over the whole corpus
    Zipf {
        /// Show the per-rank table of values along with the summary
        table: bool,
    },

    /// Occurrence count of a word within a scope
    Count {
        /// Word to be looked up
        word: String,

        /// Year restriction of the query
        scope: Scope,
    },

    /// Frequency rank of a word within a scope
    Rank {
        /// Word to be looked up
        word: String,

        /// Year restriction of the query
        scope: Scope,
    },

    /// Diagnostic dump of every recorded (word, year, count) triple
    Dump,

    /// Corpus size statistics
    Stats,

    /// Show the command table
    Help,

    /// Leave the command loop
    Quit,
}

/// Reasons why an input line could be rejected
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum CommandError {
    /// First token does not name a command
    #[error("no such command {0:?}, try \"help\"")]
    Unknown(String),

    /// Argument list does not match the command's form
    #[error("usage: {0} {1}")]
    Usage(&'static str, &'static str),

    /// A year argument is not an integer
    #[error("years must be integer values")]
    BadYear,

    /// A year range was given back to front
    #[error(transparent)]
    InvalidRange(#[from] InvalidRange),
}

/// Decode an input line into a command, if there is one on it
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let mut tokens = line.split_whitespace();
    let Some(name) = tokens.next() else {
        return Ok(None);
    };
    let args = tokens.collect::<Vec<_>>();
    let command = match name {
        "zipf" => match &args[..] {
            [] => Command::Zipf { table: false },
            ["table"] => Command::Zipf { table: true },
            _ => return Err(usage("zipf")),
        },
        "count" => {
            let (word, scope) = word_and_scope("count", &args)?;
            Command::Count { word, scope }
        }
        "rank" => {
            let (word, scope) = word_and_scope("rank", &args)?;
            Command::Rank { word, scope }
        }
        "dump" => no_args("dump", &args, Command::Dump)?,
        "stats" => no_args("stats", &args, Command::Stats)?,
        "help" => no_args("help", &args, Command::Help)?,
        "q" => no_args("q", &args, Command::Quit)?,
        other => return Err(CommandError::Unknown(other.to_owned())),
    };
    Ok(Some(command))
}

/// Usage error for a command from the command table
fn usage(name: &str) -> CommandError {
    let &(name, form, _hint) = (COMMANDS.iter())
        .find(|(entry, _form, _hint)| *entry == name)
        .expect("the command table covers every parsed command");
    CommandError::Usage(name, form)
}

/// Decode the `word [ start-year [ end-year ] ]` argument form
fn word_and_scope(name: &'static str, args: &[&str]) -> Result<(String, Scope), CommandError> {
    let scope = match args {
        [_word] => Scope::AllTime,
        [_word, year] => Scope::single_year(parse_year(year)?),
        [_word, first, last] => Scope::years(parse_year(first)?, parse_year(last)?)?,
        _ => return Err(usage(name)),
    };
    Ok((args[0].to_owned(), scope))
}

/// Decode a year argument
fn parse_year(token: &str) -> Result<Year, CommandError> {
    token.parse().map_err(|_| CommandError::BadYear)
}

/// Reject any argument to a command that takes none
fn no_args(name: &'static str, args: &[&str], command: Command) -> Result<Command, CommandError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(usage(name))
    }
}

/// Read and execute commands from standard input until `q` or end of input
pub fn run(store: &WordStore) -> Result<()> {
    execute(store, Command::Help)?;
    prompt()?;
    for line in io::stdin().lock().lines() {
        if !execute_parsed(store, &line?)? {
            return Ok(());
        }
        prompt()?;
    }
    Ok(())
}

/// Execute a single command line, as given through `--command`
pub fn execute_line(store: &WordStore, line: &str) -> Result<()> {
    execute_parsed(store, line).map(|_keep_going| ())
}

/// Display the command prompt
fn prompt() -> Result<()> {
    let mut out = io::stdout().lock();
    write!(out, "> ")?;
    out.flush()?;
    Ok(())
}

/// Parse and execute one input line, reporting input errors to the user
///
/// Returns truth that the command loop should keep going.
fn execute_parsed(store: &WordStore, line: &str) -> Result<bool> {
    match parse(line) {
        Ok(Some(command)) => execute(store, command),
        Ok(None) => Ok(true),
        Err(error) => {
            println!("{error}");
            Ok(true)
        }
    }
}

/// Execute one command against the store
///
/// Returns truth that the command loop should keep going.
pub fn execute(store: &WordStore, command: Command) -> Result<bool> {
    let mut out = BufWriter::new(io::stdout().lock());
    match command {
        Command::Zipf { table } => zipf(&mut out, store, table)?,
        Command::Count { word, scope } => {
            let count = store.count_for(&word, scope);
            writeln!(out, "Count of {word}{}: {count}", scope_suffix(scope))?;
        }
        Command::Rank { word, scope } => {
            let suffix = scope_suffix(scope);
            match store.rank_for(&word, scope) {
                Some(rank) => writeln!(out, "Rank of {word}{suffix}: {rank}")?,
                None => writeln!(out, "Rank of {word}{suffix}: unranked")?,
            }
        }
        Command::Dump => {
            for (word, year, count) in store.dump_all() {
                writeln!(out, "word='{word}', count={count}, year={year}")?;
            }
        }
        Command::Stats => {
            writeln!(
                out,
                "{} records ingested, {} distinct words",
                store.total_words(),
                store.len()
            )?;
        }
        Command::Help => {
            for (name, form, hint) in COMMANDS {
                writeln!(out, "{name:>8} {form:<35} -- {hint}")?;
            }
        }
        Command::Quit => return Ok(false),
    }
    out.flush()?;
    Ok(true)
}

/// Display of the year restriction in query answers
fn scope_suffix(scope: Scope) -> String {
    match scope {
        Scope::AllTime => String::new(),
        Scope::Years(range) if range.first() == range.last() => {
            format!(" in {}", range.first())
        }
        Scope::Years(range) => format!(" from {}-{}", range.first(), range.last()),
    }
}

/// Run the Zipf fit and display its results
fn zipf(out: &mut impl Write, store: &WordStore, table: bool) -> Result<()> {
    let Some(fit) = ZipfFit::measure(store) else {
        writeln!(out, "The corpus has no ranked word, there is nothing to fit.")?;
        return Ok(());
    };
    if table {
        for point in fit.points() {
            writeln!(
                out,
                "{}. {} {}: {}, {}",
                point.rank, point.word, point.count, point.log_rank, point.log_freq_ratio
            )?;
        }
    }
    writeln!(
        out,
        "\n mean difference {}; std. dev. {} over {} ranked words",
        fit.mean(),
        fit.std_dev(),
        fit.ranked_words()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CorpusBuilder;

    fn small_store() -> WordStore {
        let mut builder = CorpusBuilder::new();
        for (word, year, count) in [("the", 1900, 100), ("cat", 1900, 10), ("the", 1901, 50)] {
            builder.ingest(word, year, count).unwrap();
        }
        builder.finish()
    }

    #[test]
    fn parses_well_formed_commands() {
        assert_eq!(parse("zipf"), Ok(Some(Command::Zipf { table: false })));
        assert_eq!(parse("zipf table"), Ok(Some(Command::Zipf { table: true })));
        assert_eq!(
            parse("count the"),
            Ok(Some(Command::Count {
                word: "the".to_owned(),
                scope: Scope::AllTime,
            }))
        );
        assert_eq!(
            parse("count the 1901"),
            Ok(Some(Command::Count {
                word: "the".to_owned(),
                scope: Scope::single_year(1901),
            }))
        );
        assert_eq!(
            parse("rank the 1900 1999"),
            Ok(Some(Command::Rank {
                word: "the".to_owned(),
                scope: Scope::years(1900, 1999).unwrap(),
            }))
        );
        assert_eq!(parse("dump"), Ok(Some(Command::Dump)));
        assert_eq!(parse("stats"), Ok(Some(Command::Stats)));
        assert_eq!(parse("help"), Ok(Some(Command::Help)));
        assert_eq!(parse("  q  "), Ok(Some(Command::Quit)));
    }

    #[test]
    fn blank_lines_are_not_commands() {
        assert_eq!(parse(""), Ok(None));
        assert_eq!(parse("   \t "), Ok(None));
    }

    #[test]
    fn rejects_malformed_commands() {
        assert_eq!(
            parse("flurb"),
            Err(CommandError::Unknown("flurb".to_owned()))
        );
        assert_eq!(
            parse("count"),
            Err(CommandError::Usage(
                "count",
                "word [ start-year [ end-year ] ]"
            ))
        );
        assert_eq!(parse("zipf tables"), Err(CommandError::Usage("zipf", "[ table ]")));
        assert_eq!(parse("q now"), Err(CommandError::Usage("q", "")));
        assert_eq!(parse("count the abc"), Err(CommandError::BadYear));
        assert_eq!(parse("rank the 12345678"), Err(CommandError::BadYear));
        assert!(matches!(
            parse("rank the 1999 1900"),
            Err(CommandError::InvalidRange(_))
        ));
    }

    #[test]
    fn executes_against_a_store() {
        let store = small_store();
        for command in [
            Command::Zipf { table: true },
            Command::Count {
                word: "the".to_owned(),
                scope: Scope::AllTime,
            },
            Command::Rank {
                word: "dog".to_owned(),
                scope: Scope::single_year(1900),
            },
            Command::Dump,
            Command::Stats,
            Command::Help,
        ] {
            assert!(execute(&store, command).unwrap());
        }
        assert!(!execute(&store, Command::Quit).unwrap());
    }

    #[test]
    fn input_errors_do_not_stop_the_loop() {
        let store = small_store();
        assert!(execute_parsed(&store, "flurb").unwrap());
        assert!(execute_parsed(&store, "count the 1999 1900").unwrap());
        assert!(execute_parsed(&store, "").unwrap());
        assert!(!execute_parsed(&store, "q").unwrap());
    }
}
