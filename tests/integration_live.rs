// tests/integration_live.rs
use nbclone_core::clones::canonical::identify_text;
use nbclone_core::clones::connectivity::connections;
use nbclone_core::config::Config;
use nbclone_core::corpus::{Corpus, LocSummary};
use nbclone_core::repos::RepositoryMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn code_cell(source: &str) -> String {
    format!(r#"{{"cell_type": "code", "source": {}}}"#, serde_json_string(source))
}

fn serde_json_string(s: &str) -> String {
    format!("{:?}", s)
}

fn write_notebook(dir: &Path, name: &str, cells: &[String]) {
    let body = format!(r#"{{"cells": [{}], "nbformat": 4}}"#, cells.join(", "));
    fs::write(dir.join(name), body).unwrap();
}

fn corpus_dir() -> TempDir {
    let d = tempfile::tempdir().unwrap();
    fs::create_dir(d.path().join("deep")).unwrap();
    write_notebook(
        d.path(),
        "nb_1.ipynb",
        &[
            code_cell("import numpy"),
            r##"{"cell_type": "markdown", "source": ["# notes"]}"##.to_string(),
            code_cell("import numpy"),
        ],
    );
    write_notebook(
        &d.path().join("deep"),
        "nb_2.ipynb",
        &[code_cell("import   numpy\n\n"), code_cell("")],
    );
    fs::write(d.path().join("nb_3.ipynb"), "{ this is not json").unwrap();
    fs::write(d.path().join("readme.md"), "not a notebook").unwrap();
    d
}

fn repos() -> RepositoryMap {
    RepositoryMap::read("1,alpha\n2,beta\n3,alpha\n".as_bytes()).unwrap()
}

fn config() -> Config {
    let mut c = Config::new();
    c.pool.threads_per_core = 1;
    c.cache.documents = 2;
    c
}

#[test]
fn test_live_corpus_builds_clone_index() {
    let d = corpus_dir();
    let repos = repos();
    let corpus = Corpus::open(d.path(), Some(&repos), &config()).unwrap();
    assert_eq!(corpus.len(), 3);

    let clones = corpus.clones();
    assert_eq!(clones.notebook_count(), 3);
    let numpy = identify_text("import numpy");
    assert_eq!(clones.index().count(&numpy), 3);
    assert_eq!(clones.index().count(&identify_text("")), 1);

    let broken = clones
        .notebooks()
        .find(|(nb, _)| &*nb.name == "nb_3.ipynb")
        .map(|(_, s)| s.len());
    assert_eq!(broken, Some(0));
}

#[test]
fn test_live_connections_use_repositories() {
    let d = corpus_dir();
    let repos = repos();
    let corpus = Corpus::open(d.path(), Some(&repos), &config()).unwrap();
    let rows = connections(&corpus.clones());
    let nb1 = rows.iter().find(|r| r.notebook == "nb_1.ipynb").unwrap();
    assert_eq!(nb1.connections, 4);
    assert_eq!(nb1.intra_repo_connections, 2);
    assert_eq!(nb1.inter_repo_connections, 2);
    assert_eq!(nb1.mean_inter_repo_connections().to_string(), "2.0000");

    let nb2 = rows.iter().find(|r| r.notebook == "nb_2.ipynb").unwrap();
    assert_eq!(nb2.snippets, 2);
    assert_eq!(nb2.non_empty_snippets, 1);
    assert_eq!(nb2.connections, 2);
    assert_eq!(nb2.intra_repo_connections, 0);
}

#[test]
fn test_without_repository_map_all_notebooks_are_intra() {
    let d = corpus_dir();
    let corpus = Corpus::open(d.path(), None, &config()).unwrap();
    let rows = connections(&corpus.clones());
    for r in rows {
        assert_eq!(r.inter_repo_connections, 0);
        assert_eq!(r.intra_repo_connections, r.connections);
    }
}

#[test]
fn test_single_pass_analysis() {
    let d = corpus_dir();
    let corpus = Corpus::open(d.path(), None, &config()).unwrap();
    let analysis = corpus.analyze();
    assert_eq!(analysis.clones.index().count(&identify_text("import numpy")), 3);

    let loc = |name: &str| {
        analysis
            .loc
            .iter()
            .find(|r| r.notebook == name)
            .map(|r| r.loc)
            .unwrap()
    };
    assert_eq!(
        loc("nb_1.ipynb"),
        LocSummary {
            total: 2,
            non_blank: 2,
            blank: 0
        }
    );
    assert_eq!(
        loc("nb_2.ipynb"),
        LocSummary {
            total: 1,
            non_blank: 1,
            blank: 0
        }
    );
    assert_eq!(loc("nb_3.ipynb"), LocSummary::default());

    let cells: Vec<_> = analysis
        .code_cells
        .iter()
        .map(|r| (r.notebook.as_str(), r.code_cells))
        .collect();
    assert!(cells.contains(&("nb_1.ipynb", 2)));
    assert!(cells.contains(&("nb_2.ipynb", 2)));
    assert!(cells.contains(&("nb_3.ipynb", 0)));
}

#[test]
fn test_separate_passes_match_single_pass() {
    let d = corpus_dir();
    let corpus = Corpus::open(d.path(), None, &config()).unwrap();
    let analysis = corpus.analyze();
    assert_eq!(corpus.loc(), analysis.loc);
    assert_eq!(corpus.code_cells(), analysis.code_cells);
}

#[test]
fn test_missing_root_is_error() {
    let d = tempfile::tempdir().unwrap();
    assert!(Corpus::open(&d.path().join("nope"), None, &config()).is_err());
}
