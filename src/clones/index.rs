// src/clones/index.rs
//! The clone index: snippet identity -> every occurrence of that identity.
//!
//! Both ingestion paths feed a [`CorpusBuilder`]; the finished
//! [`CloneCorpus`] is the only thing the analyzers and writers see.

use super::types::{NotebookHandle, Occurrence, SnippetIdentity};
use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::warn;

/// Multimap from identity to occurrences, in insertion order.
///
/// Not synchronized. All registrations happen on the coordinating thread.
#[derive(Debug, Default, Clone)]
pub struct CloneIndex {
    entries: IndexMap<SnippetIdentity, Vec<Occurrence>>,
}

impl CloneIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `occurrence` to the list for `identity`, creating it if absent.
    ///
    /// Returns the identity as stored in the index, so callers can share its
    /// digest allocation instead of keeping their own copy.
    pub fn register(&mut self, identity: SnippetIdentity, occurrence: Occurrence) -> SnippetIdentity {
        match self.entries.entry(identity) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().push(occurrence);
                entry.key().clone()
            }
            Entry::Vacant(entry) => {
                let key = entry.key().clone();
                entry.insert(vec![occurrence]);
                key
            }
        }
    }

    #[must_use]
    pub fn get(&self, identity: &SnippetIdentity) -> Option<&[Occurrence]> {
        self.entries.get(identity).map(Vec::as_slice)
    }

    /// Number of occurrences of `identity` (0 if it was never registered).
    #[must_use]
    pub fn count(&self, identity: &SnippetIdentity) -> usize {
        self.entries.get(identity).map_or(0, Vec::len)
    }

    /// True if `identity` occurs at least twice.
    #[must_use]
    pub fn is_clone(&self, identity: &SnippetIdentity) -> bool {
        self.count(identity) >= 2
    }

    /// Number of distinct identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SnippetIdentity, &[Occurrence])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Identities with two or more occurrences.
    pub fn clone_groups(&self) -> impl Iterator<Item = (&SnippetIdentity, &[Occurrence])> {
        self.iter().filter(|(_, occ)| occ.len() >= 2)
    }

    /// Total number of registered occurrences.
    #[must_use]
    pub fn total_occurrences(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

/// A finished corpus: each notebook's snippet identities in file order, and
/// the clone index built from them.
#[derive(Debug, Default, Clone)]
pub struct CloneCorpus {
    snippets: IndexMap<NotebookHandle, Vec<SnippetIdentity>>,
    index: CloneIndex,
}

impl CloneCorpus {
    #[must_use]
    pub fn index(&self) -> &CloneIndex {
        &self.index
    }

    /// Notebooks with their snippet identities, in merge order.
    pub fn notebooks(&self) -> impl Iterator<Item = (&NotebookHandle, &[SnippetIdentity])> {
        self.snippets.iter().map(|(k, v)| (k, v.as_slice()))
    }

    #[must_use]
    pub fn snippets_of(&self, notebook: &NotebookHandle) -> Option<&[SnippetIdentity]> {
        self.snippets.get(notebook).map(Vec::as_slice)
    }

    #[must_use]
    pub fn notebook_count(&self) -> usize {
        self.snippets.len()
    }

    #[must_use]
    pub fn snippet_count(&self) -> usize {
        self.snippets.values().map(Vec::len).sum()
    }
}

/// Accumulates notebooks one at a time into a [`CloneCorpus`].
#[derive(Debug, Default)]
pub struct CorpusBuilder {
    corpus: CloneCorpus,
}

impl CorpusBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every snippet of `notebook`, indexed by position.
    ///
    /// A notebook name seen before is skipped with a warning; registering it
    /// twice would duplicate its occurrences.
    pub fn add_notebook(&mut self, notebook: NotebookHandle, identities: Vec<SnippetIdentity>) {
        self.add_indexed(notebook, identities.into_iter().enumerate());
    }

    /// Registers snippets that carry their own cell index.
    ///
    /// The notebook's snippet list keeps the order given here; callers that
    /// need index order must sort first.
    pub fn add_indexed<I>(&mut self, notebook: NotebookHandle, snippets: I)
    where
        I: IntoIterator<Item = (usize, SnippetIdentity)>,
    {
        if self.corpus.snippets.contains_key(&notebook) {
            warn!("Notebook {notebook} already registered. Skipping duplicate!");
            return;
        }
        let shared: Vec<SnippetIdentity> = snippets
            .into_iter()
            .map(|(i, identity)| {
                self.corpus
                    .index
                    .register(identity, Occurrence::of(&notebook, i))
            })
            .collect();
        self.corpus.snippets.insert(notebook, shared);
    }

    #[must_use]
    pub fn finish(self) -> CloneCorpus {
        self.corpus
    }
}
