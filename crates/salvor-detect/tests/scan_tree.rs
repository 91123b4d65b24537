//! End-to-end walk over a scratch directory tree.

use std::fs;

use salvor_detect::{FileVerdict, MACOS_METADATA_FILE, scan_dir};

const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
const PDF_HEADER: &[u8] = b"%PDF-1.7\n%junk";

#[test]
fn walks_recursively_and_partitions_verdicts() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.png"), PNG_HEADER).unwrap();
    fs::create_dir_all(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("docs/b.pdf"), PDF_HEADER).unwrap();
    fs::write(dir.path().join("docs/junk.bin"), vec![0u8; 64]).unwrap();

    let report = scan_dir(dir.path()).unwrap();

    assert_eq!(report.files.len(), 3);
    assert_eq!(report.valid_count(), 2);
    assert_eq!(report.invalid_count(), 1);
    let invalid: Vec<_> = report.invalid_paths().collect();
    assert_eq!(invalid.len(), 1);
    assert!(invalid[0].ends_with("docs/junk.bin"));
}

#[test]
fn macos_metadata_is_excluded_from_all_counts() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(MACOS_METADATA_FILE), b"\x00\x01junk").unwrap();
    fs::write(dir.path().join("a.png"), PNG_HEADER).unwrap();

    let report = scan_dir(dir.path()).unwrap();

    assert_eq!(report.files.len(), 1);
    assert_eq!(report.valid_count(), 1);
    assert_eq!(report.invalid_count(), 0);
}

#[test]
fn walk_order_is_sorted_by_name() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("c.bin"), [0u8; 4]).unwrap();
    fs::write(dir.path().join("a.bin"), [0u8; 4]).unwrap();
    fs::write(dir.path().join("b.bin"), [0u8; 4]).unwrap();

    let report = scan_dir(dir.path()).unwrap();
    let names: Vec<_> = report
        .files
        .iter()
        .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["a.bin", "b.bin", "c.bin"]);
}

#[test]
fn empty_file_is_invalid_with_empty_header() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("empty"), b"").unwrap();

    let report = scan_dir(dir.path()).unwrap();
    assert_eq!(report.files.len(), 1);
    match &report.files[0].verdict {
        FileVerdict::Invalid { size, header } => {
            assert_eq!(*size, 0);
            assert!(header.is_empty());
        }
        other => panic!("expected invalid, got {other:?}"),
    }
}

#[test]
fn missing_root_is_a_walk_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let err = scan_dir(&missing).unwrap_err();
    assert!(err.to_string().contains("cannot read directory"));
}
