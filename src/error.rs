//! Error types for the pdf2tiff library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Pdf2TiffError`] — **Fatal**: the batch cannot start at all (input
//!   directory unreadable, output directory unusable, pdfium missing, bad
//!   configuration). Returned as `Err(Pdf2TiffError)` from
//!   [`crate::Converter::run`] before any file is touched.
//!
//! * [`ConvertError`] — **Non-fatal**: a single PDF failed somewhere between
//!   opening and saving. The batch driver logs it, records it in the
//!   [`crate::output::BatchReport`], and moves on to the next file.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2tiff library.
///
/// Per-file failures use [`ConvertError`] and never surface here.
#[derive(Debug, Error)]
pub enum Pdf2TiffError {
    // ── Directory errors ──────────────────────────────────────────────────
    /// The input directory does not exist or cannot be listed.
    #[error("Cannot read input directory '{path}': {source}")]
    InputDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output directory is missing and could not be created.
    #[error("Output directory '{path}' is unavailable: {source}")]
    OutputDirUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Place libpdfium next to the executable, install it system-wide,\n\
or point --pdfium-lib / PDFIUM_LIB_PATH at an existing copy.\n\
Pre-built libraries: https://github.com/bblanchon/pdfium-binaries/releases\n"
    )]
    PdfiumBindingFailed(String),
}

/// A non-fatal error for a single input file.
///
/// Each variant corresponds to one step of the single-file conversion:
/// open → page → render → bitmap → crop → write.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The file is not a readable or valid PDF.
    #[error("cannot open document '{path}': {detail}")]
    DocumentOpen { path: PathBuf, detail: String },

    /// The requested page does not exist (zero-page document).
    #[error("document '{path}' has no page {page} ({total} pages)")]
    PageAccess {
        path: PathBuf,
        page: u16,
        total: usize,
    },

    /// pdfium failed to rasterise the page.
    #[error("rasterisation failed for '{path}': {detail}")]
    Render { path: PathBuf, detail: String },

    /// The renderer's pixel buffer does not match its reported dimensions.
    #[error("bitmap buffer of {len} bytes does not match {width}x{height} RGB")]
    InvalidBitmap { width: u32, height: u32, len: usize },

    /// Header band is at least as tall as the rendered page.
    #[error("header of {header_pixels}px leaves nothing of a {height}px tall page")]
    CropBounds { header_pixels: u32, height: u32 },

    /// A crop rectangle reaches past the image or has no area.
    #[error("crop rectangle {rect:?} does not fit inside a {width}x{height} image")]
    CropOutsideImage {
        rect: (u32, u32, u32, u32),
        width: u32,
        height: u32,
    },

    /// The output TIFF could not be encoded or written.
    #[error("failed to write '{path}': {detail}")]
    Write { path: PathBuf, detail: String },
}

impl ConvertError {
    /// Short machine-readable name of the failing step.
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::DocumentOpen { .. } => "document_open",
            ConvertError::PageAccess { .. } => "page_access",
            ConvertError::Render { .. } => "render",
            ConvertError::InvalidBitmap { .. } => "invalid_bitmap",
            ConvertError::CropBounds { .. } | ConvertError::CropOutsideImage { .. } => {
                "crop_bounds"
            }
            ConvertError::Write { .. } => "write",
        }
    }
}
