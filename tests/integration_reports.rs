// tests/integration_reports.rs
use nbclone_core::clones::canonical::identify_text;
use nbclone_core::clones::index::{CloneCorpus, CorpusBuilder};
use nbclone_core::clones::types::NotebookHandle;
use nbclone_core::corpus::{CodeCellRow, LocRow, LocSummary};
use nbclone_core::report::csv::{CLONE_FREQUENCY_HEADER, CONNECTIONS_HEADER};
use nbclone_core::report::{CloneReportSet, ReportWriter};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

fn corpus() -> CloneCorpus {
    let mut b = CorpusBuilder::new();
    b.add_notebook(
        NotebookHandle::new("nb_1.ipynb").with_repository(Some("r1".into())),
        vec![identify_text("import numpy"), identify_text("import numpy")],
    );
    b.add_notebook(
        NotebookHandle::new("nb_2.ipynb").with_repository(Some("r2".into())),
        vec![identify_text("import numpy"), identify_text("")],
    );
    b.add_notebook(NotebookHandle::new("nb_3.ipynb"), Vec::new());
    b.finish()
}

fn names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_full_clone_report_set() {
    let d = tempfile::tempdir().unwrap();
    let writer = ReportWriter::new(d.path(), "_t").unwrap();
    let written = writer
        .write_clone_reports(&corpus(), CloneReportSet::Full)
        .unwrap();
    assert_eq!(
        names(&written),
        vec![
            "file2hashesA_t.csv",
            "file2hashesNE_t.csv",
            "hash2filesA_t.csv",
            "cloneFrequency_t.csv",
            "connections_t.csv",
            "cloneLoc_t.csv",
        ]
    );
    for path in &written {
        assert!(path.starts_with(d.path()));
        assert!(path.is_file());
    }
}

#[test]
fn test_statistics_only_set() {
    let d = tempfile::tempdir().unwrap();
    let writer = ReportWriter::new(d.path().join("out"), "").unwrap();
    let written = writer
        .write_clone_reports(&corpus(), CloneReportSet::Statistics)
        .unwrap();
    assert_eq!(
        names(&written),
        vec!["cloneFrequency.csv", "connections.csv", "cloneLoc.csv"]
    );
}

#[test]
fn test_clone_frequency_rows() {
    let d = tempfile::tempdir().unwrap();
    let writer = ReportWriter::new(d.path(), "").unwrap();
    writer
        .write_clone_reports(&corpus(), CloneReportSet::Statistics)
        .unwrap();
    let text = fs::read_to_string(writer.path_for("cloneFrequency")).unwrap();
    let expected = format!(
        "{CLONE_FREQUENCY_HEADER}\n\
         nb_1.ipynb, 0, 2, 0, 1.0000, 1.0000, 2, 2\n\
         nb_2.ipynb, 1, 1, 1, 0.5000, 1.0000, 0, 0\n\
         nb_3.ipynb, 0, 0, 0, 0, 0, 0, 0\n"
    );
    assert_eq!(text, expected);
}

#[test]
fn test_connections_rows() {
    let d = tempfile::tempdir().unwrap();
    let writer = ReportWriter::new(d.path(), "").unwrap();
    writer
        .write_clone_reports(&corpus(), CloneReportSet::Statistics)
        .unwrap();
    let text = fs::read_to_string(writer.path_for("connections")).unwrap();
    let expected = format!(
        "{CONNECTIONS_HEADER}\n\
         nb_1.ipynb, 4, 2.0000, 4, 2.0000, 2, 2, 2.0000, 2.0000\n\
         nb_2.ipynb, 2, 1.0000, 2, 2.0000, 0, 0, 2.0000, 2.0000\n\
         nb_3.ipynb, 0, 0, 0, 0, 0, 0, 0, 0\n"
    );
    assert_eq!(text, expected);
    let clone_loc = fs::read_to_string(writer.path_for("cloneLoc")).unwrap();
    assert_eq!(clone_loc, "1\n1\n1\n");
}

#[test]
fn test_loc_and_code_cell_reports() {
    let d = tempfile::tempdir().unwrap();
    let writer = ReportWriter::new(d.path(), "-x").unwrap();
    let loc = writer
        .write_loc(&[LocRow {
            notebook: "a.ipynb".into(),
            loc: LocSummary {
                total: 5,
                non_blank: 3,
                blank: 2,
            },
        }])
        .unwrap();
    let cells = writer
        .write_code_cells(&[CodeCellRow {
            notebook: "a.ipynb".into(),
            code_cells: 4,
        }])
        .unwrap();
    assert_eq!(
        fs::read_to_string(loc).unwrap(),
        "file, total LOC, non-blank LOC, blank LOC\na.ipynb, 5, 3, 2\n"
    );
    assert_eq!(
        fs::read_to_string(cells).unwrap(),
        "file, code cells\na.ipynb, 4\n"
    );
}

#[test]
fn test_unwritable_directory_is_error() {
    let d = tempfile::tempdir().unwrap();
    let blocker = d.path().join("file");
    fs::write(&blocker, "").unwrap();
    assert!(ReportWriter::new(blocker.join("sub"), "").is_err());
}
