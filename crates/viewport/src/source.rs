use std::path::Path;

use image::ImageReader;

use crate::error::DecodeError;
use crate::glyph;
use crate::types::DecodedImage;

/// File extensions the viewer attempts to decode (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: [&str; 8] =
    ["tga", "png", "jpg", "jpeg", "tif", "tiff", "bmp", "dds"];

/// A successfully decoded file and its one-line description.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub image: DecodedImage,
    /// `"<FORMAT> - <W>x<H> - <COLOR TYPE>"`.
    pub summary: String,
}

/// Turns paths into pixels. Stateless; holds no reference to the viewport.
pub trait ImageSource {
    fn decode(&self, path: &Path) -> Result<Decoded, DecodeError>;

    /// Image shown in place of `path` when it cannot be decoded.
    fn fallback_glyph(&self, _path: &Path) -> DecodedImage {
        glyph::placeholder()
    }
}

/// Decodes files from disk with the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImageSource;

impl FileImageSource {
    pub fn new() -> Self {
        Self
    }
}

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
        .unwrap_or(false)
}

impl ImageSource for FileImageSource {
    fn decode(&self, path: &Path) -> Result<Decoded, DecodeError> {
        if !path.is_file() || !is_supported(path) {
            return Err(DecodeError::Unsupported {
                path: path.to_path_buf(),
            });
        }

        let reader = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|source| DecodeError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let format = reader.format();
        let decoded = reader.decode().map_err(|source| DecodeError::Image {
            path: path.to_path_buf(),
            source,
        })?;

        let color = decoded.color();
        let rgba = decoded.into_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(DecodeError::Malformed {
                path: path.to_path_buf(),
                width,
                height,
            });
        }

        let format_name = format
            .map(|format| format!("{format:?}").to_uppercase())
            .unwrap_or_else(|| "UNKNOWN".to_string());
        let summary = format!("{format_name} - {width}x{height} - {color:?}");

        tracing::debug!(path = %path.display(), width, height, ?color, "decoded image");
        Ok(Decoded {
            image: DecodedImage::from_rgba(rgba),
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_gate_is_case_insensitive() {
        assert!(is_supported(Path::new("albedo.PNG")));
        assert!(is_supported(Path::new("normal.Tga")));
        assert!(is_supported(Path::new("dir/height.tiff")));
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("no_extension")));
    }

    #[test]
    fn decodes_png_and_describes_it() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("swatch.png");
        let swatch = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        swatch.save(&path).expect("write png");

        let decoded = FileImageSource::new().decode(&path).expect("decode");
        assert_eq!(decoded.image.dimensions(), (3, 2));
        assert_eq!(&decoded.image.pixels()[..4], &[10, 20, 30, 255]);
        assert_eq!(decoded.summary, "PNG - 3x2 - Rgba8");
    }

    #[test]
    fn rgb_sources_are_expanded_to_rgba() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rgb.bmp");
        image::RgbImage::from_pixel(2, 2, image::Rgb([1, 2, 3]))
            .save(&path)
            .expect("write bmp");

        let decoded = FileImageSource::new().decode(&path).expect("decode");
        assert_eq!(decoded.image.pixels().len(), 2 * 2 * 4);
        assert_eq!(&decoded.image.pixels()[..4], &[1, 2, 3, 255]);
        assert!(decoded.summary.starts_with("BMP - 2x2"));
    }

    #[test]
    fn unsupported_extension_is_rejected_without_reading() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("readme.txt");
        std::fs::write(&path, b"hello").expect("write");
        let err = FileImageSource::new().decode(&path).unwrap_err();
        assert!(matches!(err, DecodeError::Unsupported { .. }));
    }

    #[test]
    fn directories_are_not_images() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = FileImageSource::new().decode(dir.path()).unwrap_err();
        assert!(matches!(err, DecodeError::Unsupported { .. }));
    }

    #[test]
    fn corrupt_file_reports_decode_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").expect("write");
        let err = FileImageSource::new().decode(&path).unwrap_err();
        assert!(matches!(err, DecodeError::Image { .. }));
    }

    #[test]
    fn fallback_glyph_is_the_placeholder() {
        let glyph = FileImageSource::new().fallback_glyph(Path::new("whatever.exe"));
        assert_eq!(glyph.dimensions(), (glyph::GLYPH_SIZE, glyph::GLYPH_SIZE));
    }
}
