//! Batch conversion entry point.
//!
//! [`Converter::run`] lists the input directory once, then converts each PDF
//! in turn. A file that fails at any step is logged and recorded in the
//! returned [`BatchReport`]; the loop always moves on to the next file.
//! Only problems with the directories themselves abort a run.

use crate::config::ConverterConfig;
use crate::error::{ConvertError, Pdf2TiffError};
use crate::output::{BatchReport, FileOutcome};
use crate::pipeline::{input, CropRect, DocumentRenderer, ImageCodec, PdfiumRenderer, TiffCodec};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};

/// Only the first page of each document is converted.
const FIRST_PAGE: u16 = 0;

/// Converts every `*.pdf` in a directory to a header-cropped TIFF.
///
/// The rendering and imaging backends are type parameters so tests can
/// substitute deterministic fakes; [`Converter::new`] wires up pdfium and
/// the LZW TIFF codec.
pub struct Converter<R = PdfiumRenderer, C = TiffCodec> {
    config: ConverterConfig,
    header_pixels: u32,
    renderer: R,
    codec: C,
}

impl Converter {
    /// Build a converter backed by pdfium and [`TiffCodec`].
    ///
    /// # Errors
    /// [`Pdf2TiffError::PdfiumBindingFailed`] if no pdfium library can be
    /// loaded.
    pub fn new(config: ConverterConfig) -> Result<Self, Pdf2TiffError> {
        let renderer = PdfiumRenderer::bind(config.pdfium_lib_path.as_deref())?;
        Ok(Self::with_backends(config, renderer, TiffCodec))
    }
}

impl<R, C> Converter<R, C>
where
    R: DocumentRenderer,
    C: ImageCodec,
{
    /// Build a converter from explicit backends.
    pub fn with_backends(config: ConverterConfig, renderer: R, codec: C) -> Self {
        let header_pixels = config.header_pixels();
        Self {
            config,
            header_pixels,
            renderer,
            codec,
        }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Header band height in pixels, fixed at construction.
    pub fn header_pixels(&self) -> u32 {
        self.header_pixels
    }

    /// Convert every PDF in the input directory.
    ///
    /// Files are processed one at a time in file-name order. The output
    /// directory is created if it does not exist yet.
    ///
    /// # Errors
    /// Only fatal, directory-level problems are returned. Per-file failures
    /// are logged and reported through [`BatchReport::failures`].
    pub fn run(&self) -> Result<BatchReport, Pdf2TiffError> {
        let start = Instant::now();
        let input_dir = &self.config.input_dir;
        let output_dir = &self.config.output_dir;

        let files =
            input::list_pdf_files(input_dir).map_err(|e| Pdf2TiffError::InputDirUnreadable {
                path: input_dir.clone(),
                source: e,
            })?;

        std::fs::create_dir_all(output_dir).map_err(|e| Pdf2TiffError::OutputDirUnavailable {
            path: output_dir.clone(),
            source: e,
        })?;

        let total = files.len();
        info!(
            "Converting {} PDF(s) from {} at {} DPI (header {}px)",
            total,
            input_dir.display(),
            self.config.dpi,
            self.header_pixels
        );

        let cb = self.config.progress_callback.as_ref();
        if let Some(cb) = cb {
            cb.on_batch_start(total);
        }

        let mut outcomes = Vec::with_capacity(total);
        for (i, pdf_path) in files.into_iter().enumerate() {
            let index = i + 1;
            if let Some(cb) = cb {
                cb.on_file_start(index, total, &pdf_path);
            }

            let outcome = match self.convert_one(&pdf_path) {
                Ok(output) => {
                    info!("Converted {} → {}", pdf_path.display(), output.display());
                    if let Some(cb) = cb {
                        cb.on_file_complete(index, total, &output);
                    }
                    FileOutcome {
                        input: pdf_path,
                        output: Some(output),
                        error: None,
                        error_kind: None,
                    }
                }
                Err(e) => {
                    error!(
                        path = %pdf_path.display(),
                        kind = e.kind(),
                        "Error converting {}: {}",
                        pdf_path.display(),
                        e
                    );
                    let message = e.to_string();
                    if let Some(cb) = cb {
                        cb.on_file_error(index, total, &pdf_path, &message);
                    }
                    FileOutcome {
                        input: pdf_path,
                        output: None,
                        error: Some(message),
                        error_kind: Some(e.kind()),
                    }
                }
            };
            outcomes.push(outcome);
        }

        let report = BatchReport {
            outcomes,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Batch complete: {}/{} converted, {}ms",
            report.succeeded(),
            report.total(),
            report.duration_ms
        );
        if let Some(cb) = cb {
            cb.on_batch_complete(total, report.succeeded());
        }

        Ok(report)
    }

    /// Render → crop → save for a single PDF.
    ///
    /// The rendered bitmap and the document handle live only inside this
    /// call, so both are released whichever step fails.
    fn convert_one(&self, pdf_path: &Path) -> Result<PathBuf, ConvertError> {
        let bitmap = self
            .renderer
            .render_page(pdf_path, FIRST_PAGE, self.config.render_scale())?;

        let image = self.codec.from_bitmap(bitmap)?;
        let (width, height) = self.codec.dimensions(&image);

        let rect = CropRect::below_header(width, height, self.header_pixels)?;
        debug!("Crop {:?} for {}", rect.as_tuple(), pdf_path.display());
        let cropped = self.codec.crop(image, rect)?;

        let output_path = input::output_path_for(pdf_path, &self.config.output_dir);
        self.codec.save_tiff(&cropped, &output_path)?;

        Ok(output_path)
    }
}
