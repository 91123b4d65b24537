//! Console report for scan results.
//!
//! One line per file, a debug block for every warning, and a consolidated
//! invalid list at the end. This output is the verifier's primary
//! user-facing surface.

use console::style;

use crate::scan::{FileReport, FileVerdict, ScanReport};
use crate::signature::{Classification, has_ftyp_marker};

pub fn emit(report: &ScanReport) {
    for file in &report.files {
        emit_file(file);
    }
    emit_summary(report);
}

fn emit_file(file: &FileReport) {
    match &file.verdict {
        FileVerdict::Valid(classification) => {
            println!(
                "{} OK      {} ({})",
                style("✔").green(),
                file.path.display(),
                describe(*classification)
            );
        }
        FileVerdict::Invalid { size, header } => {
            println!("{} WARNING {}", style("⚠").yellow(), file.path.display());
            println!("    size:   {size} bytes");
            println!("    header: {}", hex_dump(header));
            if has_ftyp_marker(header) {
                println!("    note:   ftyp marker present but no signature matched");
            }
        }
        FileVerdict::Unreadable(err) => {
            println!(
                "{} WARNING {} (unreadable: {err})",
                style("⚠").yellow(),
                file.path.display()
            );
        }
    }
}

fn emit_summary(report: &ScanReport) {
    println!();
    println!(
        "{} valid, {} invalid",
        report.valid_count(),
        report.invalid_count()
    );
    if report.invalid_count() > 0 {
        println!("invalid files:");
        for path in report.invalid_paths() {
            println!("  {}", path.display());
        }
    }
}

fn describe(classification: Classification) -> &'static str {
    match classification {
        Classification::Known(kind) => kind.label(),
        Classification::Mp4DeepCheck => "MP4, ftyp deep check",
        Classification::Unrecognized => "unrecognized",
    }
}

/// Hex dump of the header bytes, space-separated pairs.
fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| hex::encode([*b]))
        .collect::<Vec<_>>()
        .join(" ")
}
