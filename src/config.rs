//! Configuration types for batch PDF-to-TIFF conversion.
//!
//! All conversion behaviour is controlled through [`ConverterConfig`], built
//! via its [`ConverterConfigBuilder`]. The two directories are mandatory and
//! passed to [`ConverterConfig::builder`]; everything else has a default.

use crate::error::Pdf2TiffError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::{Path, PathBuf};

/// PDF user-space units per inch. A PDF page measured in points renders to
/// `points × dpi / 72` pixels.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Default rendering resolution.
pub const DEFAULT_DPI: u32 = 300;

/// Default header band height, in typographic points.
pub const DEFAULT_HEADER_POINTS: f64 = 79.0;

/// Configuration for a batch conversion.
///
/// # Example
/// ```rust
/// use pdf2tiff::ConverterConfig;
///
/// let config = ConverterConfig::builder("scans/raw", "scans/tiff")
///     .dpi(300)
///     .header_points(79.0)
///     .build()
///     .unwrap();
/// assert_eq!(config.header_pixels(), 329);
/// ```
#[derive(Clone)]
pub struct ConverterConfig {
    /// Directory scanned (non-recursively) for `*.pdf` files.
    pub input_dir: PathBuf,

    /// Directory receiving one `{stem}.tiff` per converted PDF.
    /// Created on demand at the start of a run.
    pub output_dir: PathBuf,

    /// Rendering resolution in dots per inch. Default: 300.
    ///
    /// The page is rasterised with a uniform scale of `dpi / 72`, so an A4
    /// page (595 × 842 pt) at 300 DPI comes out at 2480 × 3508 px.
    pub dpi: u32,

    /// Height of the header band removed from the top of each page, in
    /// points. Default: 79.
    pub header_points: f64,

    /// Explicit pdfium library file or directory. If None, the library is
    /// searched for next to the executable, in the working directory, and
    /// finally among the system libraries.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Optional per-file progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for ConverterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterConfig")
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("dpi", &self.dpi)
            .field("header_points", &self.header_points)
            .field("pdfium_lib_path", &self.pdfium_lib_path)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl ConverterConfig {
    /// Create a new builder with default DPI and header height.
    pub fn builder(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> ConverterConfigBuilder {
        ConverterConfigBuilder {
            config: Self {
                input_dir: input_dir.into(),
                output_dir: output_dir.into(),
                dpi: DEFAULT_DPI,
                header_points: DEFAULT_HEADER_POINTS,
                pdfium_lib_path: None,
                progress_callback: None,
            },
        }
    }

    /// Header band height in pixels: `floor(header_points × dpi / 72)`.
    pub fn header_pixels(&self) -> u32 {
        header_pixels(self.header_points, self.dpi)
    }

    /// Uniform render scale applied to both page axes.
    pub fn render_scale(&self) -> f32 {
        (f64::from(self.dpi) / POINTS_PER_INCH) as f32
    }
}

/// Convert a height in points to whole pixels at `dpi`, rounding down.
pub fn header_pixels(header_points: f64, dpi: u32) -> u32 {
    (header_points * f64::from(dpi) / POINTS_PER_INCH).floor() as u32
}

/// Builder for [`ConverterConfig`].
#[derive(Debug)]
pub struct ConverterConfigBuilder {
    config: ConverterConfig,
}

impl ConverterConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn header_points(mut self, points: f64) -> Self {
        self.config.header_points = points;
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.pdfium_lib_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConverterConfig, Pdf2TiffError> {
        let c = &self.config;
        if c.dpi == 0 {
            return Err(Pdf2TiffError::InvalidConfig("DPI must be ≥ 1".into()));
        }
        if !c.header_points.is_finite() || c.header_points < 0.0 {
            return Err(Pdf2TiffError::InvalidConfig(format!(
                "Header height must be a non-negative number of points, got {}",
                c.header_points
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ConverterConfig::builder("in", "out").build().unwrap();
        assert_eq!(c.dpi, 300);
        assert_eq!(c.header_points, 79.0);
        assert!(c.pdfium_lib_path.is_none());
        assert!(c.progress_callback.is_none());
    }

    #[test]
    fn header_pixels_default_is_329() {
        let c = ConverterConfig::builder("in", "out").build().unwrap();
        assert_eq!(c.header_pixels(), 329);
    }

    #[test]
    fn header_pixels_rounds_down() {
        // 79 × 150 / 72 = 164.58…
        assert_eq!(header_pixels(79.0, 150), 164);
        // 72 pt is exactly one inch.
        assert_eq!(header_pixels(72.0, 200), 200);
        assert_eq!(header_pixels(0.0, 300), 0);
        assert_eq!(header_pixels(10.5, 72), 10);
    }

    #[test]
    fn render_scale_follows_dpi() {
        let c = ConverterConfig::builder("in", "out").dpi(144).build().unwrap();
        assert!((c.render_scale() - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn zero_dpi_rejected() {
        let err = ConverterConfig::builder("in", "out").dpi(0).build().unwrap_err();
        assert!(matches!(err, Pdf2TiffError::InvalidConfig(_)));
    }

    #[test]
    fn negative_or_nan_header_rejected() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let err = ConverterConfig::builder("in", "out")
                .header_points(bad)
                .build()
                .unwrap_err();
            assert!(matches!(err, Pdf2TiffError::InvalidConfig(_)), "{bad}");
        }
    }

    #[test]
    fn debug_hides_callback() {
        use crate::progress::NoopProgressCallback;
        use std::sync::Arc;

        let c = ConverterConfig::builder("in", "out")
            .progress_callback(Arc::new(NoopProgressCallback))
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("<dyn BatchProgressCallback>"), "{dbg}");
    }
}
