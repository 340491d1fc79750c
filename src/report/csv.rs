// src/report/csv.rs
//! Row rendering for the CSV reports.
//!
//! Fields are separated by `, `. Every function writes a header line (except
//! `clone_loc`) followed by one line per row.

use crate::clones::connectivity::{CloneFrequency, ConnectionStats};
use crate::clones::index::CloneCorpus;
use crate::corpus::{CodeCellRow, LocRow};
use std::io::{self, Write};

pub const SEP: &str = ", ";

pub const FILE2HASHES_HEADER: &str = "file, snippets";
pub const HASH2FILES_HEADER: &str = "hash, LOC, file, index, ...";
pub const CLONE_FREQUENCY_HEADER: &str = "file, unique, clones, empty, clone frequency, \
     non-empty clone frequency, intra clones, non-empty intra clones";
pub const CONNECTIONS_HEADER: &str = "file, connections, connections normalized, \
     non-empty connections, non-empty connections normalized, intra repo connections, \
     non-empty intra repo connections, mean inter repo connections, \
     mean non-empty inter repo connections";
pub const LOC_HEADER: &str = "file, total LOC, non-blank LOC, blank LOC";
pub const CODE_CELLS_HEADER: &str = "file, code cells";

/// One line per notebook with the digest of each snippet, in cell order.
/// With `non_empty_only`, snippets without non-blank lines are left out.
///
/// # Errors
/// Returns error if writing fails.
pub fn file2hashes<W: Write>(out: &mut W, corpus: &CloneCorpus, non_empty_only: bool) -> io::Result<()> {
    writeln!(out, "{FILE2HASHES_HEADER}")?;
    for (notebook, snippets) in corpus.notebooks() {
        write!(out, "{notebook}")?;
        for snippet in snippets {
            if non_empty_only && snippet.is_empty() {
                continue;
            }
            write!(out, "{SEP}{snippet}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// One line per identity: digest, line count, then every occurrence.
///
/// # Errors
/// Returns error if writing fails.
pub fn hash2files<W: Write>(out: &mut W, corpus: &CloneCorpus) -> io::Result<()> {
    writeln!(out, "{HASH2FILES_HEADER}")?;
    for (identity, occurrences) in corpus.index().iter() {
        write!(out, "{identity}{SEP}{}", identity.line_count())?;
        for occurrence in occurrences {
            write!(out, "{SEP}{occurrence}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// # Errors
/// Returns error if writing fails.
pub fn clone_frequency<W: Write>(out: &mut W, rows: &[CloneFrequency]) -> io::Result<()> {
    writeln!(out, "{CLONE_FREQUENCY_HEADER}")?;
    for r in rows {
        writeln!(
            out,
            "{}{SEP}{}{SEP}{}{SEP}{}{SEP}{}{SEP}{}{SEP}{}{SEP}{}",
            r.notebook,
            r.unique,
            r.clones,
            r.empty,
            r.clone_frequency(),
            r.non_empty_clone_frequency(),
            r.intra_clones,
            r.non_empty_intra_clones
        )?;
    }
    Ok(())
}

/// # Errors
/// Returns error if writing fails.
pub fn connections<W: Write>(out: &mut W, rows: &[ConnectionStats]) -> io::Result<()> {
    writeln!(out, "{CONNECTIONS_HEADER}")?;
    for r in rows {
        writeln!(
            out,
            "{}{SEP}{}{SEP}{}{SEP}{}{SEP}{}{SEP}{}{SEP}{}{SEP}{}{SEP}{}",
            r.notebook,
            r.connections,
            r.connections_normalized(),
            r.non_empty_connections,
            r.non_empty_connections_normalized(),
            r.intra_repo_connections,
            r.non_empty_intra_repo_connections,
            r.mean_inter_repo_connections(),
            r.mean_non_empty_inter_repo_connections()
        )?;
    }
    Ok(())
}

/// Line count of every occurrence of a cloned identity. No header.
///
/// # Errors
/// Returns error if writing fails.
pub fn clone_loc<W: Write>(out: &mut W, corpus: &CloneCorpus) -> io::Result<()> {
    for (identity, occurrences) in corpus.index().clone_groups() {
        for _ in occurrences {
            writeln!(out, "{}", identity.line_count())?;
        }
    }
    Ok(())
}

/// # Errors
/// Returns error if writing fails.
pub fn loc<W: Write>(out: &mut W, rows: &[LocRow]) -> io::Result<()> {
    writeln!(out, "{LOC_HEADER}")?;
    for r in rows {
        writeln!(
            out,
            "{}{SEP}{}{SEP}{}{SEP}{}",
            r.notebook, r.loc.total, r.loc.non_blank, r.loc.blank
        )?;
    }
    Ok(())
}

/// # Errors
/// Returns error if writing fails.
pub fn code_cells<W: Write>(out: &mut W, rows: &[CodeCellRow]) -> io::Result<()> {
    writeln!(out, "{CODE_CELLS_HEADER}")?;
    for r in rows {
        writeln!(out, "{}{SEP}{}", r.notebook, r.code_cells)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clones::index::CorpusBuilder;
    use crate::clones::types::{NotebookHandle, SnippetIdentity};

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        assert!(f(&mut buf).is_ok());
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn sample() -> CloneCorpus {
        let mut b = CorpusBuilder::new();
        b.add_notebook(
            NotebookHandle::new("a.ipynb"),
            vec![SnippetIdentity::new("X", 2), SnippetIdentity::new("E", 0)],
        );
        b.add_notebook(NotebookHandle::new("b.ipynb"), vec![SnippetIdentity::new("X", 2)]);
        b.add_notebook(NotebookHandle::new("c.ipynb"), Vec::new());
        b.finish()
    }

    #[test]
    fn test_file2hashes_variants() {
        let corpus = sample();
        let all = render(|w| file2hashes(w, &corpus, false));
        assert_eq!(all, "file, snippets\na.ipynb, X, E\nb.ipynb, X\nc.ipynb\n");
        let ne = render(|w| file2hashes(w, &corpus, true));
        assert_eq!(ne, "file, snippets\na.ipynb, X\nb.ipynb, X\nc.ipynb\n");
    }

    #[test]
    fn test_hash2files_and_clone_loc() {
        let corpus = sample();
        let text = render(|w| hash2files(w, &corpus));
        assert_eq!(
            text,
            "hash, LOC, file, index, ...\nX, 2, a.ipynb, 0, b.ipynb, 0\nE, 0, a.ipynb, 1\n"
        );
        assert_eq!(render(|w| clone_loc(w, &corpus)), "2\n2\n");
    }
}
