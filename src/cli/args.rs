// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "nbclone",
    version,
    about = "Clone mining and connectivity statistics for notebook corpora"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    /// Config file (default: ./nbclone.toml if present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Directory for the report files
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
    /// Worker threads per available core
    #[arg(long, global = true, value_name = "N")]
    pub threads_per_core: Option<usize>,
    /// Debug logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Index the code cells of a notebook corpus and write the clone reports
    Clones {
        /// Notebook file or directory searched recursively
        #[arg(long, value_name = "PATH")]
        nb_path: PathBuf,
        /// File of `<notebookNumber>,<repository>` lines
        #[arg(long, value_name = "FILE")]
        repro_file: Option<PathBuf>,
        /// Skip file2hashes and hash2files
        #[arg(long)]
        stats_only: bool,
    },
    /// Clone reports plus LOC and code-cell reports, in one pass
    All {
        #[arg(long, value_name = "PATH")]
        nb_path: PathBuf,
        #[arg(long, value_name = "FILE")]
        repro_file: Option<PathBuf>,
    },
    /// Lines of code per notebook
    Loc {
        #[arg(long, value_name = "PATH")]
        nb_path: PathBuf,
    },
    /// Code cells per notebook
    Count {
        #[arg(long, value_name = "PATH")]
        nb_path: PathBuf,
    },
    /// Clone reports from the output of an external clone detector
    Scc {
        /// Per-snippet statistics file
        #[arg(long, value_name = "FILE")]
        stats_file: PathBuf,
        /// Clone pairs, plain text or zipped
        #[arg(long, value_name = "FILE")]
        pair_file: PathBuf,
        #[arg(long, value_name = "FILE")]
        repro_file: PathBuf,
        /// Skip file2hashes and hash2files
        #[arg(long)]
        stats_only: bool,
    },
}

impl Commands {
    /// Input files and directories the command reads.
    #[must_use]
    pub fn inputs(&self) -> Vec<&Path> {
        match self {
            Self::Clones {
                nb_path,
                repro_file,
                ..
            }
            | Self::All {
                nb_path,
                repro_file,
            } => std::iter::once(nb_path.as_path())
                .chain(repro_file.as_deref())
                .collect(),
            Self::Loc { nb_path } | Self::Count { nb_path } => vec![nb_path.as_path()],
            Self::Scc {
                stats_file,
                pair_file,
                repro_file,
                ..
            } => vec![stats_file.as_path(), pair_file.as_path(), repro_file.as_path()],
        }
    }
}
