// src/config/types.rs
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Contents of `nbclone.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the reports are written to.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    /// Fixed suffix for report names. A local timestamp is used when unset.
    #[serde(default)]
    pub suffix: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            suffix: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    #[serde(default = "default_threads_per_core")]
    pub threads_per_core: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            threads_per_core: default_threads_per_core(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Parsed documents kept in memory; 0 disables caching.
    #[serde(default = "default_cached_documents")]
    pub documents: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            documents: default_cached_documents(),
        }
    }
}

fn default_output_dir() -> PathBuf { PathBuf::from(".") }
const fn default_threads_per_core() -> usize { 2 }
const fn default_cached_documents() -> usize { 256 }
