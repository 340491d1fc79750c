// src/bin/nbclone.rs
use clap::{CommandFactory, Parser};
use colored::Colorize;
use nbclone_core::cli::{self, Cli};
use nbclone_core::exit::NbcloneExit;
use tracing_subscriber::EnvFilter;

fn main() -> NbcloneExit {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.command.is_none() {
        let _ = Cli::command().print_help();
        return NbcloneExit::Success;
    }

    match cli::dispatch::execute(cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red());
            NbcloneExit::Error
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
