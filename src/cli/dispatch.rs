//! Command dispatch logic extracted from the binary.

use super::args::{Cli, Commands};
use super::handlers::{self, Session};
use crate::exit::NbcloneExit;
use anyhow::Result;

/// Executes the parsed command.
///
/// # Errors
/// Returns error if the command handler fails.
pub fn execute(cli: Cli) -> Result<NbcloneExit> {
    let Some(command) = cli.command else {
        return Ok(NbcloneExit::InvalidInput);
    };
    if !handlers::inputs_present(&command) {
        return Ok(NbcloneExit::InvalidInput);
    }
    let session = Session::open(cli.config.as_deref(), cli.output_dir, cli.threads_per_core)?;

    match command {
        Commands::Clones {
            nb_path,
            repro_file,
            stats_only,
        } => handlers::handle_clones(&session, &nb_path, repro_file.as_deref(), stats_only),
        Commands::All {
            nb_path,
            repro_file,
        } => handlers::handle_all(&session, &nb_path, repro_file.as_deref()),
        Commands::Loc { nb_path } => handlers::handle_loc(&session, &nb_path),
        Commands::Count { nb_path } => handlers::handle_count(&session, &nb_path),
        Commands::Scc {
            stats_file,
            pair_file,
            repro_file,
            stats_only,
        } => handlers::handle_scc(&session, &stats_file, &pair_file, &repro_file, stats_only),
    }
}
