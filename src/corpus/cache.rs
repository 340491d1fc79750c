// src/corpus/cache.rs
//! Bounded cache of parsed notebook documents.

use super::notebook::Document;
use crate::error::Result;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Least-recently-used cache from notebook path to parsed document.
///
/// Evicted documents are simply parsed again on the next request. A cache
/// built with capacity 0 stores nothing.
#[derive(Debug)]
pub struct DocumentCache {
    entries: Option<Mutex<LruCache<PathBuf, Arc<Document>>>>,
}

impl DocumentCache {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self::new(0)
    }

    /// Returns the cached document for `path`, or calls `load` and caches
    /// its result.
    ///
    /// The lock is not held while loading, so two threads may both parse a
    /// missing document; the later insert wins.
    ///
    /// # Errors
    /// Returns whatever `load` returns; failures are not cached.
    pub fn get_or_load<F>(&self, path: &Path, load: F) -> Result<Arc<Document>>
    where
        F: FnOnce() -> Result<Document>,
    {
        let Some(entries) = &self.entries else {
            return load().map(Arc::new);
        };
        if let Some(doc) = entries.lock().get(path) {
            return Ok(Arc::clone(doc));
        }
        let doc = Arc::new(load()?);
        entries.lock().put(path.to_path_buf(), Arc::clone(&doc));
        Ok(doc)
    }

    /// Number of documents currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |e| e.lock().len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DocumentCache {
    fn default() -> Self {
        Self::new(256)
    }
}
