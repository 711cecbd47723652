//! Command-line interface for fdoc.
//!
//! Defines CLI arguments using clap builder API

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

/// CLI arguments parsed from command line
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Fortran source files, in collision-resolution order
    pub inputs: Vec<PathBuf>,

    /// Characters following `!` that mark doc comments
    pub doc_chars: Option<String>,

    /// Registry name of the lexer
    pub lexer: Option<String>,

    /// Config file path
    pub config: Option<PathBuf>,

    /// Rewrite doc strings as reStructuredText
    pub normalize: bool,

    /// Pretty-print the JSON output
    pub pretty: bool,

    /// Number of parallel jobs (0 = auto, 1 = sequential)
    pub jobs: Option<usize>,

    /// Enable debug output
    pub debug: bool,
}

/// Build the clap Command for parsing CLI arguments
#[must_use]
pub fn build_cli() -> Command {
    Command::new("fdoc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract documented symbols from modern Fortran sources as JSON")
        .arg(
            Arg::new("inputs")
                .help("Fortran files to parse; earlier files win name collisions")
                .value_name("FILE")
                .num_args(1..)
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("doc-chars")
                .short('d')
                .long("doc-chars")
                .help("Characters that follow '!' to mark a doc comment [default: >]")
                .value_name("CHARS"),
        )
        .arg(
            Arg::new("lexer")
                .short('l')
                .long("lexer")
                .help("Lexer to parse with [default: regex]")
                .value_name("NAME"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to config file (disables config discovery)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("normalize")
                .short('n')
                .long("normalize")
                .help("Rewrite Markdown-style doc strings as reStructuredText")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("pretty")
                .short('p')
                .long("pretty")
                .help("Pretty-print the JSON output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help("Number of parallel jobs (0=auto, 1=sequential)")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("debug")
                .short('D')
                .long("debug")
                .help("Enable debug output (shows parsed units and dropped duplicates)")
                .action(ArgAction::SetTrue),
        )
}

/// Parse CLI arguments from command line
#[must_use]
pub fn parse_args() -> CliArgs {
    args_from_matches(&build_cli().get_matches())
}

/// Parse CLI arguments from an iterator (for testing)
#[must_use]
pub fn parse_args_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    args_from_matches(&build_cli().get_matches_from(args))
}

/// Convert clap `ArgMatches` to `CliArgs`
fn args_from_matches(matches: &clap::ArgMatches) -> CliArgs {
    CliArgs {
        inputs: matches
            .get_many::<PathBuf>("inputs")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        doc_chars: matches.get_one::<String>("doc-chars").cloned(),
        lexer: matches.get_one::<String>("lexer").cloned(),
        config: matches.get_one::<PathBuf>("config").cloned(),
        normalize: matches.get_flag("normalize"),
        pretty: matches.get_flag("pretty"),
        jobs: matches.get_one::<usize>("jobs").copied(),
        debug: matches.get_flag("debug"),
    }
}
