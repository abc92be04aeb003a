//! fin CLI entry point.

use clap::Parser;
use fin::cli::commands;
use fin::cli::{Cli, Commands};
use fin::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,rusqlite=info,reqwest=info,hyper=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli) -> Result<(), Error> {
    let db = cli.db.as_ref();
    let user = cli.user.as_deref();
    let json = cli.json;

    match &cli.command {
        Commands::Init { force } => commands::init::execute(db, *force, json),
        Commands::Version => commands::version::execute(json),
        Commands::Profile { command } => commands::profile::execute(command, db, user, json),
        Commands::Budget { command } => commands::budget::execute(command, db, user, json),
        Commands::Tx { command } => commands::transaction::execute(command, db, user, json),
        Commands::Goal { command } => commands::goal::execute(command, db, user, json),
        Commands::Subscription { command } => {
            commands::subscription::execute(command, db, user, json)
        }
        Commands::Alert { command } => commands::alert::execute(command, db, user, json),
        Commands::Advice { command } => commands::advice::execute(command, db, user, json),
        Commands::Config { command } => commands::config::execute(command, json),
        Commands::Completions { shell } => commands::completions::execute(shell),
    }
}
