use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use textdesk::{Console, DeskError, MatcherConfig, PatternMatcher, StoreConfig, ViewFormat};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "textdesk")]
#[command(about = "Regex search/replace and an interactive key-value store", long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every match of a pattern, one per line
    Find {
        pattern: String,

        /// Print `start..end<TAB>match` instead of just the match
        #[arg(long)]
        spans: bool,

        #[command(flatten)]
        opts: PatternOpts,
    },
    /// Replace every match of a pattern
    Replace {
        pattern: String,

        /// Replacement text; `$1` and `${name}` refer to groups
        replacement: String,

        /// Insert the replacement verbatim
        #[arg(long)]
        literal: bool,

        #[command(flatten)]
        opts: PatternOpts,
    },
    /// Manage key-value records interactively on stdin
    Records {
        /// Render the view as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct PatternOpts {
    /// Read the subject from a file instead of stdin
    #[arg(long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Case-insensitive matching
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// `^` and `$` match at line boundaries
    #[arg(short = 'm', long)]
    multi_line: bool,

    /// `.` matches newlines
    #[arg(short = 's', long)]
    dot_all: bool,

    /// Ignore whitespace and `#` comments in the pattern
    #[arg(short = 'x', long)]
    extended: bool,

    /// Compiled pattern size limit in bytes
    #[arg(long)]
    size_limit: Option<usize>,
}

impl PatternOpts {
    fn matcher_config(&self, literal_replacement: bool) -> MatcherConfig {
        let defaults = MatcherConfig::default();
        MatcherConfig {
            case_insensitive: self.ignore_case,
            multi_line: self.multi_line,
            dot_matches_new_line: self.dot_all,
            ignore_whitespace: self.extended,
            literal_replacement,
            size_limit: self.size_limit.unwrap_or(defaults.size_limit),
        }
    }

    fn read_subject(&self) -> Result<String, DeskError> {
        match self.input {
            Some(ref path) => {
                debug!("Reading subject from {}", path.display());
                Ok(fs::read_to_string(path)?)
            }
            None => {
                let mut subject = String::new();
                io::stdin().read_to_string(&mut subject)?;
                Ok(subject)
            }
        }
    }
}

/// Write one match per line. Returns false when there was nothing to write.
fn write_found<W: Write>(mut out: W, lines: &[String]) -> io::Result<bool> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(!lines.is_empty())
}

fn run(command: Commands) -> Result<(), DeskError> {
    match command {
        Commands::Find {
            pattern,
            spans,
            opts,
        } => {
            let matcher = PatternMatcher::with_config(opts.matcher_config(false));
            let subject = opts.read_subject()?;
            let lines: Vec<String> = if spans {
                matcher
                    .find_match_spans(&pattern, &subject)?
                    .into_iter()
                    .map(|m| format!("{}..{}\t{}", m.start, m.end, m.text))
                    .collect()
            } else {
                matcher.find_matches(&pattern, &subject)?
            };
            if !write_found(io::stdout().lock(), &lines)? {
                eprintln!("No matches found.");
            }
        }
        Commands::Replace {
            pattern,
            replacement,
            literal,
            opts,
        } => {
            let matcher = PatternMatcher::with_config(opts.matcher_config(literal));
            let subject = opts.read_subject()?;
            print!("{}", matcher.replace_all(&pattern, &replacement, &subject)?);
        }
        Commands::Records { json } => {
            // Empty keys never get past the command parser.
            let config = StoreConfig::default();
            let format = if json {
                ViewFormat::Json
            } else {
                ViewFormat::Table
            };
            let mut console = Console::new(config, format);
            console.run(io::stdin().lock(), io::stdout().lock())?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("failed to install log subscriber");
    }

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ DeskError::InvalidPattern(_)) => {
            eprintln!("{e}");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_found_reports_empty() {
        let mut out = Vec::new();
        assert!(!write_found(&mut out, &[]).unwrap());
        assert!(out.is_empty());
    }

    #[test]
    fn test_write_found_one_per_line() {
        let matches = textdesk::find_matches(r"\d+", "a12b345").unwrap();
        let mut out = Vec::new();
        assert!(write_found(&mut out, &matches).unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), "12\n345\n");
    }
}
