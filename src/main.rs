//! fdoc - Documented symbol extraction for modern Fortran sources

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::io::{self, Write};

use anyhow::Context;
use fdoc::{build_cli, normalize, parse_args, CliArgs, Config, LexerRegistry, ParseResult};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = parse_args();
    init_logging(args.debug);

    if args.inputs.is_empty() {
        build_cli().print_help()?;
        println!();
        return Ok(());
    }

    let config = build_config(&args)?;

    // Configure thread pool if --jobs specified
    if let Some(jobs) = args.jobs {
        if jobs > 0 {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build_global()
            {
                warn!(error = %e, "failed to configure thread pool");
            }
        }
    }

    let markers = config.doc_markers()?;
    let lexer = LexerRegistry::with_builtin().resolve(&config.lexer)?;
    debug!(lexer = lexer.name(), ?markers, files = args.inputs.len(), "starting build");

    let mut result = lexer.parse(&args.inputs, &markers)?;
    if config.normalize_docs {
        result = result.map_docs(normalize);
    }

    write_json(&result, args.pretty)
}

/// Install the stderr subscriber; `RUST_LOG` applies unless `--debug` is given
fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Build configuration from CLI args and config files
///
/// An explicit `--config` replaces discovery from the current directory.
fn build_config(args: &CliArgs) -> anyhow::Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        debug!(path = %config_path.display(), "using explicit config file");
        Config::from_toml_file(config_path)?
    } else {
        let cwd = std::env::current_dir().context("cannot determine current directory")?;
        let discovered = Config::discover_config_files(&cwd);
        debug!(?discovered, "discovered config files");
        Config::from_discovered_files(&cwd)
    };

    // Override with CLI arguments
    if let Some(doc_chars) = &args.doc_chars {
        config.doc_chars.clone_from(doc_chars);
    }
    if let Some(lexer) = &args.lexer {
        config.lexer.clone_from(lexer);
    }
    if args.normalize {
        config.normalize_docs = true;
    }

    debug!(?config, "configuration");

    // Validate configuration
    if let Some(error) = config.validate() {
        anyhow::bail!("Invalid configuration: {error}");
    }

    Ok(config)
}

fn write_json(result: &ParseResult, pretty: bool) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, result)?;
    } else {
        serde_json::to_writer(&mut out, result)?;
    }
    writeln!(out)?;
    Ok(())
}
