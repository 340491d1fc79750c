// src/clones/canonical.rs
//! Snippet canonicalization.
//!
//! Two snippets that differ only in whitespace (indentation, blank lines,
//! spacing inside a line) canonicalize to the same digest. The line count
//! of an identity is the number of non-blank lines.

use super::types::SnippetIdentity;
use md5::{Digest, Md5};

/// Characters deleted by [`normalize`]: space, tab, line feed, vertical
/// tab, form feed and carriage return. Unicode spaces such as U+00A0 are
/// content.
#[must_use]
pub fn is_code_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r')
}

/// Concatenates all lines with every whitespace character removed.
#[must_use]
pub fn normalize<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .flat_map(|line| line.as_ref().chars())
        .filter(|&c| !is_code_whitespace(c))
        .collect()
}

/// True if the line holds nothing but spaces and control characters.
#[must_use]
pub fn is_blank(line: &str) -> bool {
    line.chars().all(|c| c <= ' ')
}

/// Number of lines that are not blank.
#[must_use]
pub fn non_blank_lines<S: AsRef<str>>(lines: &[S]) -> usize {
    lines.iter().filter(|line| !is_blank(line.as_ref())).count()
}

/// Uppercase hex MD5 of the normalized text.
#[must_use]
pub fn digest(normalized: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(normalized.as_bytes());
    format!("{:X}", hasher.finalize())
}

/// Computes the identity of a snippet given as its source lines.
#[must_use]
pub fn identify<S: AsRef<str>>(lines: &[S]) -> SnippetIdentity {
    SnippetIdentity::new(digest(&normalize(lines)), non_blank_lines(lines))
}

/// Computes the identity of a snippet given as one block of text.
#[must_use]
pub fn identify_text(text: &str) -> SnippetIdentity {
    let lines: Vec<&str> = text.split('\n').collect();
    identify(&lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clones::types::EMPTY_DIGEST;

    #[test]
    fn test_empty_cell_has_well_known_digest() {
        let empty: [&str; 0] = [];
        let id = identify(&empty);
        assert_eq!(id.digest(), EMPTY_DIGEST);
        assert_eq!(id.line_count(), 0);
    }

    #[test]
    fn test_whitespace_only_cell_is_empty() {
        let id = identify(&["   \n", "\t\n", "\n"]);
        assert_eq!(id.digest(), EMPTY_DIGEST);
        assert_eq!(id.line_count(), 0);
    }

    #[test]
    fn test_indentation_does_not_change_digest() {
        let a = identify(&["def f(x):\n", "    return x\n"]);
        let b = identify(&["def f(x):\n", "\treturn  x\n", "\n"]);
        assert_eq!(a, b);
        assert_eq!(a.line_count(), 2);
    }

    #[test]
    fn test_digest_is_fixed_width_uppercase() {
        let d = digest("importnumpy");
        assert_eq!(d.len(), 32);
        assert!(d.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_non_breaking_space_is_content() {
        let plain = identify(&["a = 1\n"]);
        let nbsp = identify(&["a\u{a0}= 1\n"]);
        assert_ne!(plain.digest(), nbsp.digest());
        assert_eq!(identify(&["\u{a0}\n"]).line_count(), 1);
        assert_eq!(identify(&["\u{0B}\u{0C}\r\n"]), identify(&[""; 0]));
    }

    #[test]
    fn test_line_count_distinguishes_identities() {
        let joined = identify(&["a=1;b=2\n"]);
        let split = identify(&["a=1;\n", "b=2\n"]);
        assert_eq!(joined.digest(), split.digest());
        assert_ne!(joined, split);
    }
}
