//! Input discovery: find `*.pdf` files and name their outputs.
//!
//! Matching follows shell-glob rules for `*.pdf`: the extension comparison is
//! case-sensitive, the scan is not recursive, and names starting with `.`
//! are skipped. Results are sorted so a batch is reproducible regardless of
//! the platform's directory enumeration order.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension (without the dot) of files picked up from the input directory.
pub const PDF_EXTENSION: &str = "pdf";

/// Extension (without the dot) of files written to the output directory.
pub const TIFF_EXTENSION: &str = "tiff";

/// List the PDF files directly inside `dir`, sorted by file name.
pub fn list_pdf_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if !is_pdf_name(&entry.file_name()) {
            continue;
        }
        // `is_file` follows symlinks, as a glob would.
        if !path.is_file() {
            debug!("Skipping non-file entry: {}", path.display());
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

/// Whether a bare file name matches `*.pdf`.
pub fn is_pdf_name(name: &OsStr) -> bool {
    let hidden = name.as_encoded_bytes().first() == Some(&b'.');
    !hidden
        && Path::new(name)
            .extension()
            .is_some_and(|ext| ext == PDF_EXTENSION)
}

/// `{output_dir}/{input_stem}.tiff`.
///
/// Only the final extension is stripped: `v1.2.report.pdf` becomes
/// `v1.2.report.tiff`.
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let mut name: OsString = input.file_stem().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(TIFF_EXTENSION);
    output_dir.join(name)
}
