//! Directory walker producing per-file signature verdicts.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::ScanError;
use crate::signature::{self, Classification, HEADER_LEN};

/// macOS Finder metadata; never scanned, never counted.
pub const MACOS_METADATA_FILE: &str = ".DS_Store";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileVerdict {
    Valid(Classification),
    /// Unrecognized header, with the debug snapshot the report prints.
    Invalid { size: u64, header: Vec<u8> },
    /// The file (or a subdirectory) could not be read; the error stays
    /// inline and the walk continues.
    Unreadable(String),
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub verdict: FileVerdict,
}

impl FileReport {
    pub fn is_valid(&self) -> bool {
        matches!(self.verdict, FileVerdict::Valid(_))
    }
}

/// All per-file verdicts for one walk, in sorted walk order.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub files: Vec<FileReport>,
}

impl ScanReport {
    pub fn valid_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_valid()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.files.len() - self.valid_count()
    }

    pub fn invalid_paths(&self) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .filter(|f| !f.is_valid())
            .map(|f| f.path.as_path())
    }
}

/// Walk `root` recursively and classify every regular file.
///
/// Only an unreadable root aborts; every error below it is recorded inline
/// and the walk continues.
pub fn scan_dir(root: &Path) -> Result<ScanReport, ScanError> {
    let entries = read_entries(root).map_err(|source| ScanError::Walk {
        path: root.to_path_buf(),
        source,
    })?;
    let mut report = ScanReport::default();
    visit(entries, &mut report);
    Ok(report)
}

fn visit(entries: Vec<fs::DirEntry>, report: &mut ScanReport) {
    for entry in entries {
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) => {
                report.files.push(FileReport {
                    path,
                    verdict: FileVerdict::Unreadable(e.to_string()),
                });
                continue;
            }
        };
        if file_type.is_dir() {
            match read_entries(&path) {
                Ok(sub) => visit(sub, report),
                Err(e) => report.files.push(FileReport {
                    path,
                    verdict: FileVerdict::Unreadable(e.to_string()),
                }),
            }
            continue;
        }
        if path
            .file_name()
            .is_some_and(|name| name == std::ffi::OsStr::new(MACOS_METADATA_FILE))
        {
            continue;
        }
        report.files.push(scan_file(&path));
    }
}

/// Sorted by name so output is stable across platforms.
fn read_entries(dir: &Path) -> std::io::Result<Vec<fs::DirEntry>> {
    let mut entries = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}

/// Classify one file from its header bytes.
pub fn scan_file(path: &Path) -> FileReport {
    let verdict = match read_header(path) {
        Ok((size, header)) => match signature::classify(&header) {
            Classification::Unrecognized => FileVerdict::Invalid { size, header },
            valid => FileVerdict::Valid(valid),
        },
        Err(e) => FileVerdict::Unreadable(e.to_string()),
    };
    FileReport {
        path: path.to_path_buf(),
        verdict,
    }
}

fn read_header(path: &Path) -> std::io::Result<(u64, Vec<u8>)> {
    let mut file = File::open(path)?;
    let size = file.metadata()?.len();
    let mut header = vec![0u8; HEADER_LEN];
    let mut filled = 0;
    while filled < HEADER_LEN {
        let n = file.read(&mut header[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    header.truncate(filled);
    Ok((size, header))
}
