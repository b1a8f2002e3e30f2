//! PDF rasterisation: render one page to an RGB buffer via pdfium.
//!
//! The page is scaled uniformly by `dpi / 72`, which maps the PDF's
//! 72-points-per-inch user space onto the requested resolution. No pixel cap
//! is applied: the output is an archival raster, so the DPI is honoured
//! exactly.

use crate::error::{ConvertError, Pdf2TiffError};
use crate::pipeline::DocumentRenderer;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A rasterised page: `width × height` pixels, 3 bytes (R, G, B) per pixel,
/// rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBitmap {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl RenderedBitmap {
    /// Byte length a well-formed buffer of these dimensions must have.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

/// [`DocumentRenderer`] backed by the pdfium library.
pub struct PdfiumRenderer {
    pdfium: Pdfium,
}

impl PdfiumRenderer {
    /// Bind to pdfium.
    ///
    /// `lib_path` may name the library file itself or a directory holding
    /// it. Without one, the executable's directory and the working directory
    /// are searched before falling back to the system library.
    pub fn bind(lib_path: Option<&Path>) -> Result<Self, Pdf2TiffError> {
        let bindings = match lib_path {
            Some(path) => {
                let path = if path.is_dir() {
                    Pdfium::pdfium_platform_library_name_at_path(path)
                } else {
                    path.to_path_buf()
                };
                Pdfium::bind_to_library(&path).map_err(|e| {
                    Pdf2TiffError::PdfiumBindingFailed(format!("{}: {:?}", path.display(), e))
                })?
            }
            None => bind_from_search_paths()?,
        };
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

fn library_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }
    dirs.push(PathBuf::from("./"));
    dirs
}

fn bind_from_search_paths() -> Result<Box<dyn PdfiumLibraryBindings>, Pdf2TiffError> {
    for dir in library_search_dirs() {
        let lib_path = Pdfium::pdfium_platform_library_name_at_path(&dir);
        debug!("Trying pdfium at {}", lib_path.display());
        if let Ok(bindings) = Pdfium::bind_to_library(&lib_path) {
            info!("Bound pdfium from {}", lib_path.display());
            return Ok(bindings);
        }
    }

    debug!("Trying system pdfium library");
    Pdfium::bind_to_system_library()
        .map_err(|e| Pdf2TiffError::PdfiumBindingFailed(format!("{:?}", e)))
}

impl DocumentRenderer for PdfiumRenderer {
    fn render_page(
        &self,
        path: &Path,
        page_index: u16,
        scale: f32,
    ) -> Result<RenderedBitmap, ConvertError> {
        // Dropped at the end of this call on every path, closing the file.
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| ConvertError::DocumentOpen {
                path: path.to_path_buf(),
                detail: format!("{:?}", e),
            })?;

        let pages = document.pages();
        let total_pages = pages.len() as usize;
        if usize::from(page_index) >= total_pages {
            return Err(ConvertError::PageAccess {
                path: path.to_path_buf(),
                page: page_index,
                total: total_pages,
            });
        }

        let page = pages.get(page_index).map_err(|_| ConvertError::PageAccess {
            path: path.to_path_buf(),
            page: page_index,
            total: total_pages,
        })?;

        let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| ConvertError::Render {
                path: path.to_path_buf(),
                detail: format!("{:?}", e),
            })?;

        let image = bitmap.as_image().to_rgb8();
        let (width, height) = image.dimensions();
        debug!(
            "Rendered page {} of {} → {}x{} px",
            usize::from(page_index) + 1,
            path.display(),
            width,
            height
        );

        Ok(RenderedBitmap {
            width,
            height,
            rgb: image.into_raw(),
        })
    }
}
