// src/repos.rs
//! Mapping from notebook number to the repository it was collected from.
//!
//! The file has one `<notebookNumber>,<repository>` pair per line. Notebook
//! number `n` names the notebook `nb_<n>.ipynb`.

use crate::clones::types::{numbered_notebook_name, RepoName};
use crate::error::{CloneError, Result};
use crate::lines;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Default, Clone)]
pub struct RepositoryMap {
    by_number: HashMap<u64, RepoName>,
    by_name: HashMap<String, RepoName>,
    interned: HashMap<String, RepoName>,
}

impl RepositoryMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the repository file at `path`.
    ///
    /// # Errors
    /// Returns error if the file cannot be opened or read.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| CloneError::io(e, path))?;
        let map = Self::read(BufReader::new(file)).map_err(|e| match e {
            CloneError::Io { source, .. } => CloneError::io(source, path),
            other => other,
        })?;
        debug!(
            "Loaded {} notebook/repository pairs ({} repositories) from {}",
            map.by_number.len(),
            map.repository_count(),
            path.display()
        );
        Ok(map)
    }

    /// Reads repository pairs from any buffered source. Lines whose notebook
    /// number is not an integer are skipped with a warning.
    ///
    /// # Errors
    /// Returns error only on read failure.
    pub fn read<R: BufRead>(reader: R) -> Result<Self> {
        let mut map = Self::new();
        lines::for_each_line(reader, |line| {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("Line in repository file is not UTF-8 ({e}). Skipping line!");
                    return;
                }
            };
            if line.trim().is_empty() {
                return;
            }
            let Some((number, repo)) = line.split_once(',') else {
                warn!("Invalid line \"{line}\" in repository file. Skipping line!");
                return;
            };
            match number.trim().parse::<u64>() {
                Ok(number) => map.insert(number, repo.trim()),
                Err(_) => warn!(
                    "Notebook numbers in repository file must be integers! \
                     Notebook with \"number\" '{number}' is excluded from mapping!"
                ),
            }
        })?;
        Ok(map)
    }

    /// Records that notebook `number` lives in `repository`.
    pub fn insert(&mut self, number: u64, repository: &str) {
        let repo = self.intern(repository);
        self.by_name
            .insert(numbered_notebook_name(number), Arc::clone(&repo));
        self.by_number.insert(number, repo);
    }

    #[must_use]
    pub fn by_number(&self, number: u64) -> Option<RepoName> {
        self.by_number.get(&number).cloned()
    }

    #[must_use]
    pub fn by_name(&self, notebook_name: &str) -> Option<RepoName> {
        self.by_name.get(notebook_name).cloned()
    }

    /// Number of distinct repositories.
    #[must_use]
    pub fn repository_count(&self) -> usize {
        self.interned.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_number.is_empty()
    }

    fn intern(&mut self, name: &str) -> RepoName {
        if let Some(repo) = self.interned.get(name) {
            return Arc::clone(repo);
        }
        let repo: RepoName = Arc::from(name);
        self.interned.insert(name.to_string(), Arc::clone(&repo));
        repo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_pairs_and_skips_bad_numbers() {
        let input = "1,alpha\nx,beta\n2,alpha\n\n3\n4, gamma \n";
        let map = RepositoryMap::read(input.as_bytes()).unwrap_or_default();
        assert_eq!(map.by_number(1).as_deref(), Some("alpha"));
        assert_eq!(map.by_name("nb_2.ipynb").as_deref(), Some("alpha"));
        assert_eq!(map.by_number(4).as_deref(), Some("gamma"));
        assert!(map.by_number(3).is_none());
        assert_eq!(map.repository_count(), 2);
    }

    #[test]
    fn test_non_utf8_line_is_skipped() {
        let input: &[u8] = b"1,alpha\n\xff,beta\n2,gamma\n";
        let map = RepositoryMap::read(input).unwrap_or_default();
        assert_eq!(map.by_number(1).as_deref(), Some("alpha"));
        assert_eq!(map.by_number(2).as_deref(), Some("gamma"));
        assert_eq!(map.repository_count(), 2);
        assert!(!map.is_empty());
    }

    #[test]
    fn test_same_repository_is_shared() {
        let mut map = RepositoryMap::new();
        map.insert(1, "r");
        map.insert(2, "r");
        let (Some(a), Some(b)) = (map.by_number(1), map.by_number(2)) else {
            panic!("missing repositories");
        };
        assert!(Arc::ptr_eq(&a, &b));
    }
}
