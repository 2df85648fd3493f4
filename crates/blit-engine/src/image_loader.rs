//! Image loading.
//!
//! Decodes image files (PNG) into top-left-origin RGBA8 buffers ready for
//! texture upload.

use std::path::Path;

use anyhow::{Context, Result};
use image::RgbaImage;

/// Loads an image file and converts it to RGBA8.
pub fn load_rgba(path: impl AsRef<Path>) -> Result<RgbaImage> {
    let path = path.as_ref();
    let img = image::open(path)
        .with_context(|| format!("failed to load image '{}'", path.display()))?;

    Ok(img.to_rgba8())
}

/// Decodes an image from raw bytes (e.g. an embedded asset).
pub fn decode_rgba(data: &[u8]) -> Result<RgbaImage> {
    let img = image::load_from_memory(data).context("failed to decode image from memory")?;

    Ok(img.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::io::Cursor;

    #[test]
    fn load_missing_file_fails() {
        let err = load_rgba("/nonexistent/image.png").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/image.png"));
    }

    #[test]
    fn decode_round_trips_png_bytes() {
        let mut img = RgbaImage::new(4, 3);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));

        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .expect("png encode");

        let decoded = decode_rgba(&png).expect("png decode");
        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn decode_garbage_fails() {
        assert!(decode_rgba(&[0x00, 0x01, 0x02]).is_err());
    }
}
