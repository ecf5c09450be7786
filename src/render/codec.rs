//! Image decoding and encoding.
//!
//! Thin wrappers over the `image` crate that attach the offending path to
//! every failure.

use std::fmt;
use std::path::Path;

use clap::ValueEnum;
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{SpriteError, Result};

/// Formats the spritemap can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Tga,
}

impl OutputFormat {
    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Tga => "tga",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Read an image file into an 8-bit RGBA buffer.
pub fn decode(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path).map_err(|e| SpriteError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(img.to_rgba8())
}

/// Write an RGBA buffer, choosing the format from the path's extension.
pub fn encode(img: &RgbaImage, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path).map_err(|e| SpriteError::Encode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    img.save_with_format(path, format)
        .map_err(|e| SpriteError::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    #[test]
    fn test_encode_decode_png_with_transparency() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 0, Rgba([255, 0, 0, 128]));

        let dir = tempdir().unwrap();
        let path = dir.path().join("alpha.png");
        encode(&img, &path).unwrap();

        let back = decode(&path).unwrap();
        assert_eq!(back.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(back.get_pixel(1, 0).0, [255, 0, 0, 128]);
    }

    #[test]
    fn test_encode_decode_tga() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 200]));

        let dir = tempdir().unwrap();
        let path = dir.path().join("sprite.tga");
        encode(&img, &path).unwrap();

        let back = decode(&path).unwrap();
        assert_eq!(back.dimensions(), (3, 2));
        assert_eq!(back.get_pixel(2, 1).0, [10, 20, 30, 200]);
    }

    #[test]
    fn test_decode_missing_file() {
        let dir = tempdir().unwrap();
        let err = decode(&dir.path().join("missing.png")).unwrap_err();
        assert!(matches!(err, SpriteError::Decode { .. }));
    }

    #[test]
    fn test_decode_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = decode(&path).unwrap_err();
        assert!(matches!(err, SpriteError::Decode { .. }));
    }

    #[test]
    fn test_encode_unknown_extension() {
        let img = RgbaImage::new(1, 1);
        let dir = tempdir().unwrap();
        let err = encode(&img, &dir.path().join("out.nope")).unwrap_err();
        assert!(matches!(err, SpriteError::Encode { .. }));
    }

    #[test]
    fn test_output_format_extension() {
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::Tga.to_string(), "tga");
        assert_eq!(OutputFormat::default(), OutputFormat::Png);
    }
}
