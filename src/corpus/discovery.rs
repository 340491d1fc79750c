// src/corpus/discovery.rs
use crate::error::{CloneError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extension of notebook files.
pub const NOTEBOOK_EXT: &str = "ipynb";

/// Finds every notebook file under `root` (or `root` itself if it is one).
///
/// Paths are returned in walk order, sorted by file name within each
/// directory. Unreadable entries are counted and logged, not fatal.
///
/// # Errors
/// Returns error if `root` does not exist.
pub fn discover(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(CloneError::io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
            root,
        ));
    }
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    let (paths, error_count) = accumulate_walker(walker);
    if error_count > 0 {
        warn!("Encountered {error_count} errors while walking {}", root.display());
    }
    debug!("Found {} notebooks under {}", paths.len(), root.display());
    Ok(paths)
}

fn accumulate_walker<I>(walker: I) -> (Vec<PathBuf>, usize)
where
    I: Iterator<Item = walkdir::Result<walkdir::DirEntry>>,
{
    let mut paths = Vec::new();
    let mut errors = 0;
    for item in walker {
        match item {
            Ok(entry) => {
                if entry.file_type().is_file() && is_notebook(entry.path()) {
                    paths.push(entry.into_path());
                }
            }
            Err(e) => {
                debug!("Walk error: {}", CloneError::from(e));
                errors += 1;
            }
        }
    }
    (paths, errors)
}

/// True if `path` has the notebook extension.
#[must_use]
pub fn is_notebook(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == NOTEBOOK_EXT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_finds_nested_notebooks_only() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::create_dir(dir.path().join("sub"))?;
        fs::write(dir.path().join("b.ipynb"), "{}")?;
        fs::write(dir.path().join("a.ipynb"), "{}")?;
        fs::write(dir.path().join("notes.txt"), "")?;
        fs::write(dir.path().join("sub").join("c.ipynb"), "{}")?;

        let found = discover(dir.path())?;
        let names: Vec<_> = found
            .iter()
            .filter_map(|p| p.file_name()?.to_str())
            .collect();
        assert_eq!(names, vec!["a.ipynb", "b.ipynb", "c.ipynb"]);
        Ok(())
    }

    #[test]
    fn test_single_file_root() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let nb = dir.path().join("x.ipynb");
        fs::write(&nb, "{}")?;
        assert_eq!(discover(&nb)?, vec![nb]);
        Ok(())
    }

    #[test]
    fn test_missing_root_is_error() {
        assert!(discover(Path::new("/definitely/not/here")).is_err());
    }
}
