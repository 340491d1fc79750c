// src/clones/external/pairs.rs
//! Reading of the clone detector's pair file, plain or zipped.

use super::stats::ToolSnippetId;
use crate::error::{CloneError, Result};
use crate::lines::{self, LineResult};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};
use zip::ZipArchive;

/// Pair lines between two progress messages.
pub const PAIR_HEARTBEAT: u64 = 10_000_000;

/// Parses `notebookA,snippetA,notebookB,snippetB`.
///
/// # Errors
/// Returns `CloneError::Parse` unless the line holds exactly four
/// comma-separated non-negative integers that fit in 64 bits.
pub fn parse_pair_line(line: &str) -> Result<(ToolSnippetId, ToolSnippetId)> {
    let fields: Vec<&str> = line.split(',').collect();
    let [a, b, c, d] = fields.as_slice() else {
        return Err(CloneError::Parse(format!(
            "expected 4 fields, found {}",
            fields.len()
        )));
    };
    let number = |text: &str| {
        text.trim()
            .parse::<u64>()
            .map_err(|e| CloneError::Parse(format!("invalid id '{}': {e}", text.trim())))
    };
    Ok((
        ToolSnippetId::new(number(a)?, number(b)?),
        ToolSnippetId::new(number(c)?, number(d)?),
    ))
}

/// Feeds every line of the pair file at `path` to `on_line`.
///
/// A path ending in `.zip` is opened as an archive and each of its entries
/// is read in archive order. Lines that are not UTF-8 are passed as `Err`.
/// Returns the number of lines read.
///
/// # Errors
/// Returns error if the file or an archive entry cannot be read.
pub fn for_each_line<F>(path: &Path, mut on_line: F) -> Result<u64>
where
    F: FnMut(LineResult<'_>),
{
    let file = File::open(path).map_err(|e| CloneError::io(e, path))?;
    let is_zip = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
    if !is_zip {
        return read_lines(BufReader::new(file), 0, &mut on_line)
            .map_err(|e| reattach_path(e, path));
    }

    let mut archive = ZipArchive::new(BufReader::new(file))?;
    let mut total = 0;
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        debug!("Reading pair file entry {}", entry.name());
        total = read_lines(BufReader::new(entry), total, &mut on_line)
            .map_err(|e| reattach_path(e, path))?;
    }
    Ok(total)
}

/// Feeds lines from `reader`, continuing the count from `read_so_far`.
///
/// # Errors
/// Returns error on read failure.
pub fn read_lines<R, F>(reader: R, read_so_far: u64, on_line: &mut F) -> Result<u64>
where
    R: BufRead,
    F: FnMut(LineResult<'_>),
{
    let mut read = read_so_far;
    lines::for_each_line(reader, |line| {
        if read > 0 && read % PAIR_HEARTBEAT == 0 {
            info!("Reading clone pair {read}.");
        }
        on_line(line);
        read += 1;
    })?;
    Ok(read)
}

fn reattach_path(err: CloneError, path: &Path) -> CloneError {
    match err {
        CloneError::Io { source, .. } => CloneError::io(source, path),
        other => other,
    }
}
