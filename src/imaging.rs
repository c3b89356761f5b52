use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat};

use crate::error::{Result, TattooError};
use crate::models::InlineImage;

pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Decodes an uploaded photo and re-encodes it as PNG for the model.
pub fn decode_upload(bytes: &[u8]) -> Result<InlineImage> {
    if bytes.is_empty() {
        return Err(TattooError::image("uploaded file is empty"));
    }
    let image = image::load_from_memory(bytes)?;
    log::debug!(
        "Decoded upload: {}x{} ({} bytes)",
        image.width(),
        image.height(),
        bytes.len()
    );
    Ok(InlineImage::png(encode_png(&image)?))
}

/// Normalizes a model-produced image to PNG. Bytes that fail to decode are
/// passed through untouched.
pub fn normalize_output(image: InlineImage) -> InlineImage {
    let already_png = image::guess_format(&image.data).ok() == Some(ImageFormat::Png);
    if image.mime_type == "image/png" && already_png {
        return image;
    }
    let converted = image::load_from_memory(&image.data)
        .map_err(TattooError::from)
        .and_then(|decoded| encode_png(&decoded));
    match converted {
        Ok(png) => InlineImage::png(png),
        Err(e) => {
            log::warn!(
                "Could not decode generated {} image, keeping raw bytes: {}",
                image.mime_type,
                e
            );
            image
        }
    }
}

/// Decodes a base64 image sent back by a client. Accepts a bare payload or a
/// `data:<mime>;base64,` URI.
pub fn decode_base64_image(encoded: &str) -> Result<InlineImage> {
    let payload = match encoded.trim().split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => encoded.trim(),
    };
    let bytes = STANDARD.decode(payload)?;
    decode_upload(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn sample_png() -> Vec<u8> {
        let image = RgbImage::from_pixel(4, 3, Rgb([200, 30, 30]));
        encode_png(&DynamicImage::ImageRgb8(image)).unwrap()
    }

    fn sample_jpeg() -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb([10, 10, 10])));
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Jpeg).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_decode_upload_reencodes_png() {
        let inline = decode_upload(&sample_jpeg()).unwrap();
        assert_eq!(inline.mime_type, "image/png");
        assert_eq!(image::guess_format(&inline.data).unwrap(), ImageFormat::Png);
        let decoded = image::load_from_memory(&inline.data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 3));
    }

    #[test]
    fn test_decode_upload_rejects_garbage() {
        assert!(matches!(
            decode_upload(b"definitely not an image"),
            Err(TattooError::ImageError(_))
        ));
        assert!(matches!(decode_upload(&[]), Err(TattooError::ImageError(_))));
    }

    #[test]
    fn test_normalize_output_passes_raw_bytes_through() {
        let raw = InlineImage::new("image/webp", vec![1, 2, 3, 4]);
        assert_eq!(normalize_output(raw.clone()), raw);
    }

    #[test]
    fn test_normalize_output_converts_jpeg() {
        let out = normalize_output(InlineImage::new("image/jpeg", sample_jpeg()));
        assert_eq!(out.mime_type, "image/png");
        assert_eq!(image::guess_format(&out.data).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_decode_base64_image_accepts_data_uri() {
        let encoded = STANDARD.encode(sample_png());
        assert!(decode_base64_image(&encoded).is_ok());
        assert!(decode_base64_image(&format!("data:image/png;base64,{}", encoded)).is_ok());
        assert!(matches!(
            decode_base64_image("%%%"),
            Err(TattooError::ImageError(_))
        ));
    }
}
