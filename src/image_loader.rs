//! # Image Loading and Decoding
//!
//! Loads raster images from file paths, data URIs, or raw base64 strings and
//! decodes them to RGBA for the host renderer. Also computes how an image is
//! fitted into an element's box (`contain`, `cover`, `fill`).

use std::io::Cursor;

use serde::Serialize;

use crate::model::{ImageFit, Point, Rect, Size};

/// Container format detected from the leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
}

/// A decoded raster image.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub format: ImageFormat,
    /// width * height * 4 bytes (RGBA).
    pub rgba: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

impl LoadedImage {
    pub fn size(&self) -> Size {
        Size::new(self.width_px as f64, self.height_px as f64)
    }

    /// True when any pixel is not fully opaque.
    pub fn has_transparency(&self) -> bool {
        self.rgba.chunks_exact(4).any(|px| px[3] != 255)
    }
}

/// Load an image from a source string.
///
/// Supported `src` formats:
/// - `data:image/...;base64,...` data URI
/// - File path (absolute or relative), read from disk
/// - Raw base64-encoded image data
pub fn load_image(src: &str) -> Result<LoadedImage, String> {
    let raw_bytes = read_source_bytes(src)?;
    decode_image_bytes(&raw_bytes)
}

/// Whether `src` names a file on disk rather than inline data.
pub fn is_file_path(src: &str) -> bool {
    // Only explicit prefixes: base64 payloads contain '/' too.
    src.starts_with('/') || src.starts_with("./") || src.starts_with("../")
}

/// Resolve the source string to raw bytes.
pub fn read_source_bytes(src: &str) -> Result<Vec<u8>, String> {
    if src.starts_with("data:") {
        let comma_pos = src
            .find(',')
            .ok_or_else(|| "Invalid data URI: missing comma".to_string())?;
        let header = &src[..comma_pos];
        let payload = &src[comma_pos + 1..];
        if header.ends_with(";base64") {
            return base64_decode(payload);
        }
        return Ok(payload.as_bytes().to_vec());
    }

    if is_file_path(src) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            return std::fs::read(src).map_err(|e| format!("Failed to read '{}': {}", src, e));
        }
        #[cfg(target_arch = "wasm32")]
        {
            return Err(format!(
                "File paths not supported in WASM: '{}'. Use data URIs or base64.",
                src
            ));
        }
    }

    base64_decode(src)
}

fn base64_decode(input: &str) -> Result<Vec<u8>, String> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(input.trim())
        .map_err(|e| format!("Base64 decode error: {}", e))
}

fn detect_format(data: &[u8]) -> Option<ImageFormat> {
    if data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8 {
        Some(ImageFormat::Jpeg)
    } else if data.len() >= 4 && data[..4] == [0x89, 0x50, 0x4E, 0x47] {
        Some(ImageFormat::Png)
    } else if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        Some(ImageFormat::Webp)
    } else {
        None
    }
}

/// Detect the format from magic bytes and decode to RGBA.
pub fn decode_image_bytes(data: &[u8]) -> Result<LoadedImage, String> {
    if data.len() < 4 {
        return Err("Image data too short".to_string());
    }
    let format = detect_format(data)
        .ok_or_else(|| "Unsupported image format (expected JPEG, PNG or WebP)".to_string())?;

    let img = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("Image format detection error: {}", e))?
        .decode()
        .map_err(|e| format!("Failed to decode image: {}", e))?;

    let rgba = img.to_rgba8();
    Ok(LoadedImage {
        format,
        width_px: rgba.width(),
        height_px: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

/// Where a fitted image is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImagePlacement {
    /// Region of the source image, in image pixels.
    pub source: Rect,
    /// Region of the element box it is drawn into.
    pub dest: Rect,
}

/// Fit an image of `image` size into a box.
///
/// `contain` letterboxes, `cover` crops, `fill` stretches. `align` picks
/// where the leftover space (contain) or the crop (cover) goes, 0..=1 per
/// axis.
pub fn fit_image(image: Size, bounds: Size, fit: ImageFit, align: Point) -> ImagePlacement {
    let full_source = Rect::from_size(image);
    let full_dest = Rect::from_size(bounds);
    if image.width <= 0.0 || image.height <= 0.0 || bounds.width <= 0.0 || bounds.height <= 0.0 {
        return ImagePlacement {
            source: full_source,
            dest: full_dest,
        };
    }

    let align_x = align.x.clamp(0.0, 1.0);
    let align_y = align.y.clamp(0.0, 1.0);
    let sx = bounds.width / image.width;
    let sy = bounds.height / image.height;

    match fit {
        ImageFit::Fill => ImagePlacement {
            source: full_source,
            dest: full_dest,
        },
        ImageFit::Contain => {
            let scale = sx.min(sy);
            let width = image.width * scale;
            let height = image.height * scale;
            ImagePlacement {
                source: full_source,
                dest: Rect::new(
                    (bounds.width - width) * align_x,
                    (bounds.height - height) * align_y,
                    width,
                    height,
                ),
            }
        }
        ImageFit::Cover => {
            let scale = sx.max(sy);
            let crop_w = bounds.width / scale;
            let crop_h = bounds.height / scale;
            ImagePlacement {
                source: Rect::new(
                    (image.width - crop_w) * align_x,
                    (image.height - crop_h) * align_y,
                    crop_w,
                    crop_h,
                ),
                dest: full_dest,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(pixel: [u8; 4]) -> Vec<u8> {
        let mut img = image::RgbaImage::new(1, 1);
        img.put_pixel(0, 0, image::Rgba(pixel));
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), 1, 1, image::ColorType::Rgba8)
            .unwrap();
        buf
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(detect_format(&[0x89, 0x50, 0x4E, 0x47]), Some(ImageFormat::Png));
        assert_eq!(detect_format(b"RIFF\0\0\0\0WEBPVP8 "), Some(ImageFormat::Webp));
        assert_eq!(detect_format(&[0x00, 0x01, 0x02, 0x03]), None);
    }

    #[test]
    fn test_invalid_data_uri() {
        assert!(load_image("data:image/png;base64").is_err());
    }

    #[test]
    fn test_too_short_data() {
        assert!(decode_image_bytes(&[0x00, 0x01]).is_err());
    }

    #[test]
    fn test_unsupported_format() {
        assert!(decode_image_bytes(&[0x00, 0x01, 0x02, 0x03, 0x04]).is_err());
    }

    #[test]
    fn test_decode_png_with_alpha() {
        let loaded = decode_image_bytes(&png_bytes([255, 0, 0, 128])).unwrap();
        assert_eq!(loaded.format, ImageFormat::Png);
        assert_eq!((loaded.width_px, loaded.height_px), (1, 1));
        assert_eq!(loaded.rgba, vec![255, 0, 0, 128]);
        assert!(loaded.has_transparency());
    }

    #[test]
    fn test_decode_minimal_jpeg() {
        let img = image::RgbImage::from_fn(2, 2, |_, _| image::Rgb([0, 128, 255]));
        let mut buf = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), 2, 2, image::ColorType::Rgb8)
            .unwrap();

        let loaded = decode_image_bytes(&buf).unwrap();
        assert_eq!(loaded.format, ImageFormat::Jpeg);
        assert_eq!(loaded.size(), Size::new(2.0, 2.0));
        assert!(!loaded.has_transparency());
    }

    #[test]
    fn test_base64_data_uri() {
        use base64::Engine;
        let b64 = base64::engine::general_purpose::STANDARD.encode(png_bytes([0, 255, 0, 255]));
        let loaded = load_image(&format!("data:image/png;base64,{}", b64)).unwrap();
        assert_eq!(loaded.width_px, 1);
        let raw = load_image(&b64).unwrap();
        assert_eq!(raw.rgba, vec![0, 255, 0, 255]);
    }

    #[test]
    fn test_plain_data_uri() {
        let bytes = read_source_bytes("data:image/svg+xml,<svg/>").unwrap();
        assert_eq!(bytes, b"<svg/>");
    }

    #[test]
    fn contain_letterboxes() {
        let p = fit_image(
            Size::new(200.0, 100.0),
            Size::new(100.0, 100.0),
            ImageFit::Contain,
            Point::new(0.5, 0.5),
        );
        assert_eq!(p.dest, Rect::new(0.0, 25.0, 100.0, 50.0));
        assert_eq!(p.source, Rect::new(0.0, 0.0, 200.0, 100.0));
    }

    #[test]
    fn cover_crops() {
        let p = fit_image(
            Size::new(200.0, 100.0),
            Size::new(100.0, 100.0),
            ImageFit::Cover,
            Point::new(1.0, 0.5),
        );
        assert_eq!(p.dest, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(p.source, Rect::new(100.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn fill_stretches() {
        let p = fit_image(
            Size::new(10.0, 30.0),
            Size::new(50.0, 50.0),
            ImageFit::Fill,
            Point::default(),
        );
        assert_eq!(p.dest, Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(p.source, Rect::new(0.0, 0.0, 10.0, 30.0));
    }
}
