//! # pdf2tiff
//!
//! Batch-convert single-page PDFs into LZW-compressed TIFF rasters with a
//! fixed-height header band cropped off the top.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input_dir/*.pdf
//!  │
//!  ├─ 1. List    non-recursive, case-sensitive *.pdf, sorted by name
//!  ├─ 2. Render  page 1 via pdfium at dpi/72 scale → RGB buffer
//!  ├─ 3. Crop    drop rows [0, floor(header_points × dpi / 72))
//!  └─ 4. Save    {output_dir}/{stem}.tiff, LZW, atomic rename
//! ```
//!
//! A failure on one file is logged and recorded; the batch always continues.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2tiff::{Converter, ConverterConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConverterConfig::builder("scans/raw", "scans/tiff")
//!         .dpi(300)
//!         .header_points(79.0)
//!         .build()?;
//!     let report = Converter::new(config)?.run()?;
//!     for (path, error) in report.failures() {
//!         println!("Error converting {}: {}", path.display(), error);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2tiff` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2tiff = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConverterConfig, ConverterConfigBuilder};
pub use convert::Converter;
pub use error::{ConvertError, Pdf2TiffError};
pub use output::{BatchReport, FileOutcome};
pub use pipeline::{
    CropRect, DocumentRenderer, ImageCodec, PdfiumRenderer, RenderedBitmap, TiffCodec,
};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
