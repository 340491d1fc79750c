// src/clones/external/stats.rs
//! Parsing of the clone detector's per-snippet statistics file.

use crate::error::{CloneError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Index of the path column in a stats line.
const PATH_COLUMN: usize = 2;
/// Index of the lines-of-code column in a stats line.
const LOC_COLUMN: usize = 8;

// Basename ends in `_<notebookNumber>_<snippetIndex>` followed by an
// optional extension.
static SNIPPET_FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"_(\d+)_(\d+)(?:\.[^._]*)?$").unwrap_or_else(|_| panic!("Invalid Regex"))
});

/// A snippet id in the clone detector's own numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToolSnippetId {
    pub notebook: u64,
    pub snippet: u64,
}

impl ToolSnippetId {
    #[must_use]
    pub fn new(notebook: u64, snippet: u64) -> Self {
        Self { notebook, snippet }
    }
}

impl fmt::Display for ToolSnippetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.notebook, self.snippet)
    }
}

/// One parsed stats line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsLine {
    pub id: ToolSnippetId,
    pub notebook_number: u64,
    pub snippet_index: usize,
    pub loc: usize,
}

/// Parses a stats line.
///
/// # Errors
/// Returns `CloneError::Parse` if the line has too few columns, a column is
/// not a non-negative integer, or the path does not name a snippet file.
pub fn parse_stats_line(line: &str) -> Result<StatsLine> {
    let columns: Vec<&str> = line.split(',').collect();
    if columns.len() <= LOC_COLUMN {
        return Err(CloneError::Parse(format!(
            "expected at least {} columns, found {}",
            LOC_COLUMN + 1,
            columns.len()
        )));
    }
    let id = ToolSnippetId::new(
        parse_number(columns[0], "notebook id")?,
        parse_number(columns[1], "snippet id")?,
    );
    let (notebook_number, snippet_index) = parse_snippet_path(columns[PATH_COLUMN])?;
    let loc = parse_number(columns[LOC_COLUMN], "LOC")?;
    Ok(StatsLine {
        id,
        notebook_number,
        snippet_index: usize::try_from(snippet_index)
            .map_err(|_| CloneError::Parse(format!("snippet index {snippet_index} too large")))?,
        loc: usize::try_from(loc)
            .map_err(|_| CloneError::Parse(format!("LOC {loc} too large")))?,
    })
}

/// Extracts `(notebookNumber, snippetIndex)` from a snippet file path.
///
/// # Errors
/// Returns `CloneError::Parse` if the basename does not end in
/// `_<number>_<number>` (before its extension) or a number overflows.
pub fn parse_snippet_path(path: &str) -> Result<(u64, u64)> {
    let path = path.trim().trim_matches('"');
    let basename = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let caps = SNIPPET_FILE_RE
        .captures(basename)
        .ok_or_else(|| CloneError::Parse(format!("cannot read snippet file name '{basename}'")))?;
    let notebook = parse_number(&caps[1], "notebook number")?;
    let snippet = parse_number(&caps[2], "snippet index")?;
    Ok((notebook, snippet))
}

fn parse_number(text: &str, what: &str) -> Result<u64> {
    text.trim()
        .parse::<u64>()
        .map_err(|e| CloneError::Parse(format!("invalid {what} '{}': {e}", text.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_full_line() -> Result<()> {
        let line = "7,12,/data/snippets/nb_42_3.py,x,y,z,a,b,5";
        let parsed = parse_stats_line(line)?;
        assert_eq!(parsed.id, ToolSnippetId::new(7, 12));
        assert_eq!(parsed.notebook_number, 42);
        assert_eq!(parsed.snippet_index, 3);
        assert_eq!(parsed.loc, 5);
        Ok(())
    }

    #[test]
    fn test_path_forms() -> Result<()> {
        assert_eq!(parse_snippet_path("nb_1_0.py")?, (1, 0));
        assert_eq!(parse_snippet_path("\"C:\\snips\\my_prefix_10_2.py\"")?, (10, 2));
        assert_eq!(parse_snippet_path("dir.v2/nb_5_1")?, (5, 1));
        assert!(parse_snippet_path("nb_x_1.py").is_err());
        assert!(parse_snippet_path("nb_1.py").is_err());
        Ok(())
    }

    #[test]
    fn test_short_or_bad_lines_rejected() {
        assert!(parse_stats_line("1,2,nb_1_0.py").is_err());
        assert!(parse_stats_line("1,-2,nb_1_0.py,,,,,,3").is_err());
        assert!(parse_stats_line("1,2,nb_1_0.py,,,,,,many").is_err());
        assert!(parse_stats_line("99999999999999999999,2,nb_1_0.py,,,,,,3").is_err());
    }
}
