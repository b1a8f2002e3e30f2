//! Pipeline stages for PDF-to-TIFF conversion.
//!
//! Each submodule implements exactly one step, and the two steps that touch
//! native libraries sit behind a trait so tests can swap in fakes.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ encode
//! (*.pdf)   (pdfium)   (crop + LZW TIFF)
//! ```
//!
//! 1. [`input`]  — list `*.pdf` entries and derive `{stem}.tiff` output paths
//! 2. [`render`] — [`DocumentRenderer`]: open, pick a page, rasterise to RGB
//! 3. [`encode`] — [`ImageCodec`]: build an image, crop the header, save TIFF

pub mod encode;
pub mod input;
pub mod render;

use crate::error::ConvertError;
use std::path::Path;

pub use encode::{CropRect, TiffCodec};
pub use render::{PdfiumRenderer, RenderedBitmap};

/// Opens a document, selects a page and rasterises it.
///
/// The document handle must not outlive the call, so every exit path
/// (including errors) releases it.
pub trait DocumentRenderer {
    /// Render page `page_index` of `path`, scaling both axes by `scale`.
    fn render_page(
        &self,
        path: &Path,
        page_index: u16,
        scale: f32,
    ) -> Result<RenderedBitmap, ConvertError>;
}

/// Builds, crops and encodes raster images.
pub trait ImageCodec {
    /// In-memory image representation.
    type Image;

    /// Wrap a raw RGB buffer as an image.
    fn from_bitmap(&self, bitmap: RenderedBitmap) -> Result<Self::Image, ConvertError>;

    /// `(width, height)` in pixels.
    fn dimensions(&self, image: &Self::Image) -> (u32, u32);

    /// Cut `rect` out of `image`.
    fn crop(&self, image: Self::Image, rect: CropRect) -> Result<Self::Image, ConvertError>;

    /// Encode `image` as an LZW-compressed TIFF at `path`, replacing any
    /// existing file.
    fn save_tiff(&self, image: &Self::Image, path: &Path) -> Result<(), ConvertError>;
}
