// src/cli/handlers/mod.rs
//! Command handlers.

use super::args::Commands;
use crate::clones::external;
use crate::config::Config;
use crate::corpus::Corpus;
use crate::exit::NbcloneExit;
use crate::report::{CloneReportSet, ReportWriter};
use crate::repos::RepositoryMap;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Config and report destination shared by every command of one run.
#[derive(Debug)]
pub struct Session {
    pub config: Config,
    pub writer: ReportWriter,
}

impl Session {
    /// Loads the config, applies command-line overrides and prepares the
    /// output directory.
    ///
    /// # Errors
    /// Returns error if the config is invalid or the output directory cannot
    /// be created.
    pub fn open(
        config_file: Option<&Path>,
        output_dir: Option<PathBuf>,
        threads_per_core: Option<usize>,
    ) -> Result<Self> {
        let mut config = Config::load(config_file).context("Failed to load configuration")?;
        config.apply_overrides(output_dir, threads_per_core);
        let writer = ReportWriter::new(&config.output.dir, config.report_suffix())
            .context("Failed to prepare output directory")?;
        Ok(Self { config, writer })
    }
}

/// Handles `clones`: live corpus to clone reports.
///
/// # Errors
/// Returns error if the repository file cannot be read or a report cannot
/// be written.
pub fn handle_clones(
    session: &Session,
    nb_path: &Path,
    repro_file: Option<&Path>,
    stats_only: bool,
) -> Result<NbcloneExit> {
    let corpus = open_corpus(session, nb_path, repro_file)?;
    let start = Instant::now();
    let clones = corpus.clones();
    let set = if stats_only {
        CloneReportSet::Statistics
    } else {
        CloneReportSet::Full
    };
    let written = session.writer.write_clone_reports(&clones, set)?;
    print_written(&written);
    info!("Clone analysis finished in {:?}", start.elapsed());
    Ok(NbcloneExit::Success)
}

/// Handles `all`: clone, LOC and code-cell reports from one pass.
///
/// # Errors
/// Returns error if the repository file cannot be read or a report cannot
/// be written.
pub fn handle_all(session: &Session, nb_path: &Path, repro_file: Option<&Path>) -> Result<NbcloneExit> {
    let corpus = open_corpus(session, nb_path, repro_file)?;
    let analysis = corpus.analyze();
    let mut written = session
        .writer
        .write_clone_reports(&analysis.clones, CloneReportSet::Full)?;
    written.push(session.writer.write_loc(&analysis.loc)?);
    written.push(session.writer.write_code_cells(&analysis.code_cells)?);
    print_written(&written);
    Ok(NbcloneExit::Success)
}

/// Handles `loc`.
///
/// # Errors
/// Returns error if the report cannot be written.
pub fn handle_loc(session: &Session, nb_path: &Path) -> Result<NbcloneExit> {
    let corpus = open_corpus(session, nb_path, None)?;
    let path = session.writer.write_loc(&corpus.loc())?;
    print_written(&[path]);
    Ok(NbcloneExit::Success)
}

/// Handles `count`.
///
/// # Errors
/// Returns error if the report cannot be written.
pub fn handle_count(session: &Session, nb_path: &Path) -> Result<NbcloneExit> {
    let corpus = open_corpus(session, nb_path, None)?;
    let path = session.writer.write_code_cells(&corpus.code_cells())?;
    print_written(&[path]);
    Ok(NbcloneExit::Success)
}

/// Handles `scc`: external detector output to clone reports.
///
/// # Errors
/// Returns error if an input file cannot be read or a report cannot be
/// written.
pub fn handle_scc(
    session: &Session,
    stats_file: &Path,
    pair_file: &Path,
    repro_file: &Path,
    stats_only: bool,
) -> Result<NbcloneExit> {
    println!("{}", "Analyzing clones based on clone detector output.".cyan());
    println!(
        "{}",
        "Notebooks without snippets are not part of that output and are not reported.".dimmed()
    );
    let repos = load_repos(repro_file)?;
    let clones = external::ingest(stats_file, pair_file, &repos)
        .with_context(|| format!("Failed to ingest {}", pair_file.display()))?;
    let set = if stats_only {
        CloneReportSet::Statistics
    } else {
        CloneReportSet::Full
    };
    let written = session.writer.write_clone_reports(&clones, set)?;
    print_written(&written);
    Ok(NbcloneExit::Success)
}

/// Reports every input of `command` that does not exist.
///
/// Returns false if any is missing; nothing should be written then.
#[must_use]
pub fn inputs_present(command: &Commands) -> bool {
    let missing: Vec<&Path> = command
        .inputs()
        .into_iter()
        .filter(|p| !p.exists())
        .collect();
    for path in &missing {
        eprintln!("{} {} not found", "error:".red().bold(), path.display());
    }
    if !missing.is_empty() {
        eprintln!("Analysis will not be run!");
    }
    missing.is_empty()
}

fn open_corpus(session: &Session, nb_path: &Path, repro_file: Option<&Path>) -> Result<Corpus> {
    let repos = repro_file.map(load_repos).transpose()?;
    let corpus = Corpus::open(nb_path, repos.as_ref(), &session.config)
        .with_context(|| format!("Failed to open corpus at {}", nb_path.display()))?;
    println!(
        "{} {} notebooks",
        "Analyzing".cyan().bold(),
        corpus.len().to_string().bold()
    );
    Ok(corpus)
}

fn load_repos(path: &Path) -> Result<RepositoryMap> {
    let repos = RepositoryMap::load(path)
        .with_context(|| format!("Failed to read repository file {}", path.display()))?;
    if repos.is_empty() {
        warn!(
            "No repository information in {}; all notebooks count as one repository",
            path.display()
        );
    }
    Ok(repos)
}

fn print_written(paths: &[PathBuf]) {
    for path in paths {
        println!("{} {}", "✓".green(), path.display());
    }
}
