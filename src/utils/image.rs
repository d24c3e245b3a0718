//! Image utility functions

use std::io::Cursor;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;

/// Decode image from bytes (JPEG, PNG, etc.) with EXIF orientation handling
pub fn decode_image(data: &[u8]) -> Result<DynamicImage> {
    let image = image::load_from_memory(data).context("Failed to decode image")?;
    Ok(orient(image, exif_orientation(data)))
}

/// Orientation tag of an encoded image, 1 (upright) when it has none
fn exif_orientation(data: &[u8]) -> u32 {
    exif::Reader::new()
        .read_from_container(&mut Cursor::new(data))
        .ok()
        .and_then(|exif| {
            exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .unwrap_or(1)
}

/// Turn a camera-oriented image upright
///
/// Phones store the sensor image as-is and record how it must be displayed.
/// Values 5 and 7 are the transpose and transverse mirrors.
fn orient(image: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        _ => image,
    }
}

/// Decode a `data:<mime>;base64,<payload>` URI, or a bare base64 payload
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let payload = match uri.strip_prefix("data:") {
        Some(rest) => {
            let (header, payload) = rest
                .split_once(',')
                .context("Data URI is missing the ',' separator")?;
            if !header.ends_with(";base64") {
                anyhow::bail!("Only base64 data URIs are supported");
            }
            payload
        }
        None => uri,
    };

    STANDARD
        .decode(payload.trim())
        .context("Invalid base64 image payload")
}

/// Encode image to PNG bytes
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, image::ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    /// Encode as JPEG with an APP1 segment carrying only an Orientation tag
    fn jpeg_with_orientation(image: &RgbImage, orientation: u16) -> Vec<u8> {
        let mut jpeg = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(image.clone())
            .write_to(&mut jpeg, ImageFormat::Jpeg)
            .unwrap();
        let jpeg = jpeg.into_inner();

        // Big-endian TIFF header, then IFD0 with one SHORT entry (0x0112)
        let mut app1 = b"Exif\0\0MM\0\x2a\0\0\0\x08".to_vec();
        app1.extend_from_slice(&[0x00, 0x01, 0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
        app1.extend_from_slice(&orientation.to_be_bytes());
        app1.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);

        let mut out = jpeg[..2].to_vec();
        out.extend_from_slice(&[0xFF, 0xE1]);
        out.extend_from_slice(&(app1.len() as u16 + 2).to_be_bytes());
        out.extend_from_slice(&app1);
        out.extend_from_slice(&jpeg[2..]);
        out
    }

    /// 16x8 image, white on the left half and black on the right
    fn half_white() -> RgbImage {
        RgbImage::from_fn(16, 8, |x, _| if x < 8 { Rgb([255, 255, 255]) } else { Rgb([0, 0, 0]) })
    }

    fn luma_at(image: &DynamicImage, x: u32, y: u32) -> u8 {
        image.to_luma8().get_pixel(x, y)[0]
    }

    #[test]
    fn test_exif_orientation_tag_is_read() {
        assert_eq!(exif_orientation(&jpeg_with_orientation(&half_white(), 6)), 6);
        assert_eq!(exif_orientation(&jpeg_with_orientation(&half_white(), 3)), 3);
    }

    #[test]
    fn test_missing_exif_means_upright() {
        let png = encode_png(&DynamicImage::new_rgb8(4, 2)).unwrap();
        assert_eq!(exif_orientation(&png), 1);
        assert_eq!(exif_orientation(b"garbage"), 1);
    }

    #[test]
    fn test_decode_applies_rotate_90() {
        let decoded = decode_image(&jpeg_with_orientation(&half_white(), 6)).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 16));
        // The white half ends up on top
        assert!(luma_at(&decoded, 4, 2) > 200);
        assert!(luma_at(&decoded, 4, 13) < 50);
    }

    #[test]
    fn test_decode_applies_rotate_180() {
        let decoded = decode_image(&jpeg_with_orientation(&half_white(), 3)).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
        assert!(luma_at(&decoded, 2, 4) < 50);
        assert!(luma_at(&decoded, 13, 4) > 200);
    }

    #[test]
    fn test_orient_moves_corner_pixel() {
        // 3x2 image with a single marked pixel in the top-left corner
        let mut marked = RgbImage::new(3, 2);
        marked.put_pixel(0, 0, Rgb([255, 0, 0]));

        let cases = [
            (1, (3, 2), (0, 0)),
            (2, (3, 2), (2, 0)),
            (3, (3, 2), (2, 1)),
            (4, (3, 2), (0, 1)),
            (5, (2, 3), (0, 0)),
            (6, (2, 3), (1, 0)),
            (7, (2, 3), (1, 2)),
            (8, (2, 3), (0, 2)),
            (42, (3, 2), (0, 0)),
        ];
        for (orientation, size, (x, y)) in cases {
            let oriented = orient(DynamicImage::ImageRgb8(marked.clone()), orientation).to_rgb8();
            assert_eq!(oriented.dimensions(), size, "orientation {}", orientation);
            assert_eq!(oriented.get_pixel(x, y), &Rgb([255, 0, 0]), "orientation {}", orientation);
        }
    }

    #[test]
    fn test_decode_png_roundtrip() {
        let image = DynamicImage::new_rgb8(5, 3);
        let bytes = encode_png(&image).unwrap();
        let decoded = decode_image(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (5, 3));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(err.to_string().contains("Failed to decode image"));
    }

    #[test]
    fn test_data_uri() {
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(b"abc"));
        assert_eq!(decode_data_uri(&uri).unwrap(), b"abc");
    }

    #[test]
    fn test_bare_base64() {
        assert_eq!(decode_data_uri("aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn test_data_uri_rejects_non_base64() {
        assert!(decode_data_uri("data:text/plain,hello").is_err());
        assert!(decode_data_uri("data:image/png;base64").is_err());
        assert!(decode_data_uri("data:image/png;base64,***").is_err());
    }
}
