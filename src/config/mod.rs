// src/config/mod.rs
pub mod types;

pub use self::types::{CacheConfig, Config, OutputConfig, PoolConfig};

use crate::error::{CloneError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = "nbclone.toml";

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `path`, or `nbclone.toml` from the working directory if it exists.
    ///
    /// An explicitly named file must exist; the implicit one is optional.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not valid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let local = Path::new(CONFIG_FILE);
                if local.exists() {
                    Self::from_file(local)
                } else {
                    Ok(Self::new())
                }
            }
        }
    }

    /// Reads and parses one config file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CloneError::io(e, path))?;
        let config = Self::parse_toml(&content)
            .map_err(|e| CloneError::Config(format!("{}: {e}", path.display())))?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parses config text.
    ///
    /// # Errors
    /// Returns error if `content` is not valid TOML for this schema.
    pub fn parse_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Applies command-line overrides.
    pub fn apply_overrides(&mut self, output_dir: Option<PathBuf>, threads_per_core: Option<usize>) {
        if let Some(dir) = output_dir {
            self.output.dir = dir;
        }
        if let Some(n) = threads_per_core {
            self.pool.threads_per_core = n;
        }
    }

    /// Worker threads: `threads_per_core` times the available cores, at least 1.
    #[must_use]
    pub fn worker_threads(&self) -> usize {
        let cores = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
        self.pool.threads_per_core.saturating_mul(cores).max(1)
    }

    /// The suffix appended to report names for this run.
    #[must_use]
    pub fn report_suffix(&self) -> String {
        self.output
            .suffix
            .clone()
            .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%dT%H%M%S%.3f").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() -> Result<()> {
        let config = Config::parse_toml("")?;
        assert_eq!(config, Config::default());
        assert_eq!(config.pool.threads_per_core, 2);
        assert_eq!(config.cache.documents, 256);
        assert_eq!(config.output.dir, PathBuf::from("."));
        Ok(())
    }

    #[test]
    fn test_partial_sections() -> Result<()> {
        let config = Config::parse_toml("[output]\nsuffix = \"run1\"\n[cache]\ndocuments = 0\n")?;
        assert_eq!(config.report_suffix(), "run1");
        assert_eq!(config.cache.documents, 0);
        assert_eq!(config.pool.threads_per_core, 2);
        Ok(())
    }

    #[test]
    fn test_overrides_win() {
        let mut config = Config::new();
        config.apply_overrides(Some(PathBuf::from("out")), Some(0));
        assert_eq!(config.output.dir, PathBuf::from("out"));
        assert_eq!(config.worker_threads(), 1);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        assert!(matches!(
            Config::parse_toml("[pool]\nthreads_per_core = \"many\""),
            Err(CloneError::Config(_))
        ));
    }
}
