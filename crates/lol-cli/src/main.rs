use anyhow::Result;
use clap::Parser;
use lol_runtime::{ColorMode, DEFAULT_MAX_CALL_DEPTH};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

/// Interpreter for a small LOLCODE-style language.
///
/// Runs a program written between HAI and KTHXBYE, printing whatever it
/// VISIBLEs. Errors are reported on stderr with a source snippet, and the
/// process exits with status 1.
///
/// EXAMPLES:
///     lol hello.lol                    Run a program
///     lol hello.lol --quiet            Run without the success message
///     lol hello.lol --dump-ast         Print the parsed AST as JSON
///     lol hello.lol --json             Report errors as JSON
///
/// ENVIRONMENT VARIABLES:
///     LOL_DIAGNOSTICS      Set to 'json' for JSON diagnostics by default
///     LOL_MAX_CALL_DEPTH   Default call-depth limit
///     LOL_LOG              Log filter, e.g. 'debug' or 'lol_runtime=trace'
///     NO_COLOR             Set to disable colored output
#[derive(Parser)]
#[command(name = "lol")]
#[command(version)]
struct Cli {
    /// Path to the program source file
    file: PathBuf,
    /// Output diagnostics in JSON format
    #[arg(long)]
    json: bool,
    /// Print the AST as JSON instead of running the program
    #[arg(long)]
    dump_ast: bool,
    /// Don't print the success message
    #[arg(long, short = 'q')]
    quiet: bool,
    /// Maximum nesting of function calls
    #[arg(long, value_name = "N")]
    max_call_depth: Option<usize>,
    /// Enable debug logging on stderr
    #[arg(long, short = 'v')]
    verbose: bool,
    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match dispatch(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli) -> Result<ExitCode> {
    let cli_config = config::Config::from_env();

    // Command-line flags override environment variables
    let report = commands::Report {
        json: cli.json || cli_config.default_json,
        color: if cli.no_color || cli_config.no_color || !io::stderr().is_terminal() {
            ColorMode::Never
        } else {
            ColorMode::Auto
        },
    };

    if cli.dump_ast {
        return commands::ast::run(&cli.file, &report).map(ExitCode::from);
    }

    let options = commands::run::RunOptions {
        quiet: cli.quiet,
        max_call_depth: cli
            .max_call_depth
            .or(cli_config.max_call_depth)
            .unwrap_or(DEFAULT_MAX_CALL_DEPTH),
    };
    commands::run::run(&cli.file, &options, &report).map(ExitCode::from)
}

/// Install the stderr log subscriber; `LOL_LOG` overrides the default level
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("LOL_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
