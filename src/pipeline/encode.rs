//! Image handling: raw RGB buffer → cropped `RgbImage` → LZW TIFF on disk.
//!
//! Encoding goes through the `tiff` crate directly because `image`'s own
//! TIFF encoder always writes uncompressed strips. The file is written to a
//! temporary sibling and renamed into place, so a failed save never leaves a
//! truncated TIFF behind and an existing file is replaced atomically.

use crate::error::ConvertError;
use crate::pipeline::render::RenderedBitmap;
use crate::pipeline::ImageCodec;
use image::RgbImage;
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tiff::encoder::{colortype, compression::Lzw, TiffEncoder};
use tracing::debug;

/// Crop rectangle in pixel coordinates: `[left, right) × [top, bottom)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropRect {
    /// The rectangle that removes `header_pixels` rows from the top of a
    /// `width × height` image.
    ///
    /// Fails when the header would consume the whole page.
    pub fn below_header(
        width: u32,
        height: u32,
        header_pixels: u32,
    ) -> Result<Self, ConvertError> {
        if header_pixels >= height {
            return Err(ConvertError::CropBounds {
                header_pixels,
                height,
            });
        }
        Ok(Self {
            left: 0,
            top: header_pixels,
            right: width,
            bottom: height,
        })
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// `(left, top, right, bottom)`.
    pub fn as_tuple(&self) -> (u32, u32, u32, u32) {
        (self.left, self.top, self.right, self.bottom)
    }
}

/// [`ImageCodec`] backed by `image` for pixels and `tiff` for encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct TiffCodec;

impl ImageCodec for TiffCodec {
    type Image = RgbImage;

    fn from_bitmap(&self, bitmap: RenderedBitmap) -> Result<RgbImage, ConvertError> {
        let invalid = ConvertError::InvalidBitmap {
            width: bitmap.width,
            height: bitmap.height,
            len: bitmap.rgb.len(),
        };
        // `from_raw` only rejects short buffers; trailing bytes are an error too.
        if bitmap.rgb.len() != bitmap.expected_len() {
            return Err(invalid);
        }
        let RenderedBitmap { width, height, rgb } = bitmap;
        RgbImage::from_raw(width, height, rgb).ok_or(invalid)
    }

    fn dimensions(&self, image: &RgbImage) -> (u32, u32) {
        image.dimensions()
    }

    fn crop(&self, image: RgbImage, rect: CropRect) -> Result<RgbImage, ConvertError> {
        let (width, height) = image.dimensions();
        if rect.right > width || rect.bottom > height || rect.width() == 0 || rect.height() == 0 {
            return Err(ConvertError::CropOutsideImage {
                rect: rect.as_tuple(),
                width,
                height,
            });
        }
        let cropped =
            image::imageops::crop_imm(&image, rect.left, rect.top, rect.width(), rect.height())
                .to_image();
        debug!(
            "Cropped {}x{} → {}x{}",
            width,
            height,
            cropped.width(),
            cropped.height()
        );
        Ok(cropped)
    }

    fn save_tiff(&self, image: &RgbImage, path: &Path) -> Result<(), ConvertError> {
        let write_err = |detail: String| ConvertError::Write {
            path: path.to_path_buf(),
            detail,
        };

        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = temp_sibling(dir).map_err(|e| write_err(e.to_string()))?;

        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            let mut encoder =
                TiffEncoder::new(&mut writer).map_err(|e| write_err(e.to_string()))?;
            encoder
                .write_image_with_compression::<colortype::RGB8, _>(
                    image.width(),
                    image.height(),
                    Lzw::default(),
                    image.as_raw(),
                )
                .map_err(|e| write_err(e.to_string()))?;
            drop(encoder);
            writer.flush().map_err(|e| write_err(e.to_string()))?;
        }

        tmp.persist(path).map_err(|e| write_err(e.error.to_string()))?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

/// Temporary file in `dir` created with the same mode an ordinary
/// `File::create` would get (0666 minus the umask), so the renamed TIFF is
/// not left owner-only.
fn temp_sibling(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".pdf2tiff-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder.tempfile_in(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use tempfile::TempDir;

    /// Top `band` rows red, the rest blue.
    fn banded(width: u32, height: u32, band: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |_, y| {
            if y < band {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        })
    }

    #[test]
    fn crop_rect_for_a4_at_300_dpi() {
        let rect = CropRect::below_header(2480, 3508, 329).unwrap();
        assert_eq!(rect.as_tuple(), (0, 329, 2480, 3508));
        assert_eq!(rect.width(), 2480);
        assert_eq!(rect.height(), 3508 - 329);
    }

    #[test]
    fn crop_rect_rejects_header_taller_than_page() {
        for header in [100, 101, 5000] {
            let err = CropRect::below_header(50, 100, header).unwrap_err();
            assert!(matches!(err, ConvertError::CropBounds { .. }));
        }
    }

    #[test]
    fn zero_header_keeps_whole_page() {
        let rect = CropRect::below_header(10, 20, 0).unwrap();
        assert_eq!(rect.as_tuple(), (0, 0, 10, 20));
    }

    #[test]
    fn from_bitmap_checks_buffer_length() {
        let short = RenderedBitmap {
            width: 4,
            height: 4,
            rgb: vec![0; 10],
        };
        let err = TiffCodec.from_bitmap(short).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidBitmap { len: 10, .. }));

        let ok = RenderedBitmap {
            width: 4,
            height: 4,
            rgb: vec![7; 48],
        };
        let img = TiffCodec.from_bitmap(ok).unwrap();
        assert_eq!(img.dimensions(), (4, 4));

        let oversized = RenderedBitmap {
            width: 2,
            height: 2,
            rgb: vec![0; 100],
        };
        let err = TiffCodec.from_bitmap(oversized).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::InvalidBitmap {
                width: 2,
                height: 2,
                len: 100
            }
        ));
    }

    #[test]
    fn crop_removes_header_rows() {
        let img = banded(8, 10, 3);
        let rect = CropRect::below_header(8, 10, 3).unwrap();
        let cropped = TiffCodec.crop(img, rect).unwrap();
        assert_eq!(cropped.dimensions(), (8, 7));
        assert!(cropped.pixels().all(|p| *p == Rgb([0, 0, 255])));
    }

    #[test]
    fn crop_outside_image_is_rejected() {
        let img = banded(8, 10, 3);
        let rect = CropRect {
            left: 0,
            top: 3,
            right: 8,
            bottom: 20,
        };
        let err = TiffCodec.crop(img, rect).unwrap_err();
        assert!(
            matches!(
                err,
                ConvertError::CropOutsideImage {
                    rect: (0, 3, 8, 20),
                    width: 8,
                    height: 10
                }
            ),
            "got: {err:?}"
        );
        assert!(err.to_string().contains("8x10"), "got: {err}");
    }

    #[test]
    fn saved_tiff_is_lzw_and_decodes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.tiff");
        let img = banded(16, 12, 4);

        TiffCodec.save_tiff(&img, &path).unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let mut decoder = tiff::decoder::Decoder::new(file).unwrap();
        let compression = decoder.get_tag_u32(tiff::tags::Tag::Compression).unwrap();
        assert_eq!(
            compression,
            u32::from(tiff::tags::CompressionMethod::LZW.to_u16())
        );

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded, img);

        // Only the final file remains; the temporary sibling was renamed.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn save_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.tiff");
        std::fs::write(&path, b"stale").unwrap();

        let img = banded(4, 4, 1);
        TiffCodec.save_tiff(&img, &path).unwrap();
        assert_eq!(image::open(&path).unwrap().to_rgb8(), img);
    }

    #[cfg(unix)]
    #[test]
    fn saved_tiff_gets_default_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let reference = dir.path().join("reference.bin");
        std::fs::write(&reference, b"x").unwrap();
        let path = dir.path().join("page.tiff");
        TiffCodec.save_tiff(&banded(4, 4, 1), &path).unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(
            mode(&path),
            mode(&reference),
            "tiff mode {:o}, fs::write mode {:o}",
            mode(&path),
            mode(&reference)
        );
    }

    #[test]
    fn save_into_missing_dir_fails_without_leftovers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent").join("page.tiff");
        let err = TiffCodec.save_tiff(&banded(4, 4, 1), &path).unwrap_err();
        assert!(matches!(err, ConvertError::Write { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
