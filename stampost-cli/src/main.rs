//! `stampost` binary entry point
//!
//! Parses CLI arguments, initialises tracing, and dispatches to the
//! subcommand handlers. Errors print to stderr and map to exit codes via
//! [`CliError::exit_code`].

use clap::Parser;

use stampost_cli::cli::{Cli, Commands};
use stampost_cli::commands;
use stampost_cli::error::CliError;
use stampost_cli::output::OutputWriter;

fn main() {
    let cli = Cli::parse();

    init_tracing(&cli);

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer),
        Commands::Generate(args) => commands::generate::execute(args, &cli.config, &writer),
    }
}

/// Initialise the JSON tracing subscriber on stderr, keeping stdout free for
/// command output. Filter precedence: `--log-level`, then `RUST_LOG`, then
/// `info`.
fn init_tracing(cli: &Cli) {
    let filter = match &cli.log_level {
        Some(level) => level.clone(),
        None => std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_owned()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .init();
}
