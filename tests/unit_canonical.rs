// tests/unit_canonical.rs
use nbclone_core::clones::canonical::{identify, identify_text};
use nbclone_core::clones::index::CorpusBuilder;
use nbclone_core::clones::types::{NotebookHandle, Occurrence, EMPTY_DIGEST};
use proptest::prelude::*;

#[test]
fn test_empty_cell_digest() {
    let id = identify_text("");
    assert_eq!(id.digest(), EMPTY_DIGEST);
    assert_eq!(id.line_count(), 0);
    assert!(id.is_empty());
}

#[test]
fn test_known_digest_is_uppercase_md5() {
    // md5("importnumpy")
    let id = identify_text("import numpy");
    assert_eq!(id.digest(), "33BE8D72467938FBB23EF42CF8C9E85F");
    assert_eq!(id.line_count(), 1);
    assert_eq!(identify_text("  import\tnumpy\n\n"), id);
}

#[test]
fn test_lookup_after_register_contains_occurrence() {
    let id = identify(&["x = 1\n", "y = 2\n"]);
    let mut b = CorpusBuilder::new();
    b.add_notebook(NotebookHandle::new("n.ipynb"), vec![id.clone()]);
    let corpus = b.finish();
    let occ = corpus.index().get(&id).unwrap();
    assert!(occ.contains(&Occurrence::new("n.ipynb", 0, None)));
}

proptest! {
    #[test]
    fn prop_identity_is_deterministic(text in "[a-z =()\n\t]{0,60}") {
        prop_assert_eq!(identify_text(&text), identify_text(&text));
    }

    #[test]
    fn prop_extra_whitespace_keeps_digest(
        words in prop::collection::vec("[a-z0-9=+]{1,6}", 1..8),
        pad in "[ \t]{0,4}",
    ) {
        let tight: Vec<String> = words.iter().map(|w| format!("{w}\n")).collect();
        let loose: Vec<String> = words.iter().map(|w| format!("{pad}{w}{pad}\n")).collect();
        let a = identify(&tight);
        let b = identify(&loose);
        prop_assert_eq!(a.digest(), b.digest());
        prop_assert_eq!(a.line_count(), words.len());
        prop_assert_eq!(a, b);
    }
}
