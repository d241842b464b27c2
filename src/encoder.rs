use crate::error::Result;
use crate::planner::EncodeOptions;
use image::codecs::jpeg::JpegEncoder;
use image::error::{EncodingError, ImageFormatHint};
use image::{DynamicImage, ExtendedColorType, ImageError, ImageFormat};
use mozjpeg::{ColorSpace, Compress, ScanMode};
use std::path::Path;

/// Reads and decodes a source image.
///
/// # Arguments
/// * `path` - Path to the PNG or JPEG source
///
/// # Returns
/// * `Ok(image)` - The decoded image
/// * `Err(ShrinkError::Io)` - If the file cannot be read
/// * `Err(ShrinkError::Encoding)` - If the bytes are not a decodable image
pub async fn load_source(path: &Path) -> Result<DynamicImage> {
    let bytes = tokio::fs::read(path).await?;
    decode_source(&bytes)
}

pub fn decode_source(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Re-encodes an image in memory with the codec parameters of one derivative.
pub fn encode(img: &DynamicImage, options: &EncodeOptions) -> Result<Vec<u8>> {
    match *options {
        EncodeOptions::Jpeg {
            quality,
            advanced: true,
        } => encode_jpeg_mozjpeg(img, quality),
        EncodeOptions::Jpeg {
            quality,
            advanced: false,
        } => encode_jpeg_baseline(img, quality),
        EncodeOptions::WebP { quality } => encode_webp(img, quality),
    }
}

/// `advanced: false`: plain baseline JPEG from the `image` encoder.
fn encode_jpeg_baseline(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(buf)
}

/// Progressive, Huffman-optimized JPEG through mozjpeg.
fn encode_jpeg_mozjpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgb = img.to_rgb8();

    let mut comp = Compress::new(ColorSpace::JCS_RGB);
    comp.set_size(rgb.width() as usize, rgb.height() as usize);
    comp.set_quality(quality as f32);
    comp.set_progressive_mode();
    comp.set_scan_optimization_mode(ScanMode::AllComponentsTogether);
    comp.set_optimize_coding(true);

    let mut started = comp
        .start_compress(Vec::new())
        .map_err(|e| encoding_error(ImageFormat::Jpeg, e.to_string()))?;
    started
        .write_scanlines(rgb.as_raw())
        .map_err(|e| encoding_error(ImageFormat::Jpeg, e.to_string()))?;
    let buf = started
        .finish()
        .map_err(|e| encoding_error(ImageFormat::Jpeg, e.to_string()))?;

    Ok(buf)
}

/// Lossy WebP via libwebp; the image crate only writes lossless WebP.
fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let rgba = img.to_rgba8();
    let encoder = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height());
    let memory = encoder
        .encode_simple(false, quality as f32)
        .map_err(|e| encoding_error(ImageFormat::WebP, format!("{:?}", e)))?;
    Ok(memory.to_vec())
}

fn encoding_error(format: ImageFormat, message: String) -> ImageError {
    ImageError::Encoding(EncodingError::new(ImageFormatHint::Exact(format), message))
}
