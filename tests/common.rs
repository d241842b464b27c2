#![allow(dead_code)]

use async_trait::async_trait;
use image::{GenericImageView, Rgb, RgbImage};
use img_shrink::{BatchConfig, Compressor, Result, ShrinkError};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

fn test_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 9) as u8, (y * 11) as u8, ((x ^ y) * 13) as u8])
    })
}

/// Writes a real, decodable PNG.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    test_image(width, height)
        .save_with_format(&path, image::ImageFormat::Png)
        .unwrap();
    path
}

/// Writes a real, decodable JPEG.
pub fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    test_image(width, height)
        .save_with_format(&path, image::ImageFormat::Jpeg)
        .unwrap();
    path
}

pub fn write_text(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

pub fn batch_config(root: &Path) -> BatchConfig {
    BatchConfig {
        input_dir: root.join("input"),
        output_dir: root.join("output"),
        clean: false,
        quiet: true,
    }
}

pub fn decoded_dimensions(path: &Path) -> (u32, u32) {
    image::open(path).unwrap().dimensions()
}

pub fn output_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Returns the buffer unchanged and counts calls.
#[derive(Default)]
pub struct EchoCompressor {
    pub calls: AtomicUsize,
}

impl EchoCompressor {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Compressor for EchoCompressor {
    async fn compress(&self, buffer: Vec<u8>) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(buffer)
    }
}

/// Replaces every buffer with a fixed payload.
pub struct TaggingCompressor(pub &'static [u8]);

#[async_trait]
impl Compressor for TaggingCompressor {
    async fn compress(&self, _buffer: Vec<u8>) -> Result<Vec<u8>> {
        Ok(self.0.to_vec())
    }
}

/// Rejects derivatives of images with the given width, echoes everything else.
pub struct RejectWidthCompressor {
    pub width: u32,
}

#[async_trait]
impl Compressor for RejectWidthCompressor {
    async fn compress(&self, buffer: Vec<u8>) -> Result<Vec<u8>> {
        let width = image::load_from_memory(&buffer).unwrap().width();
        if width == self.width {
            return Err(ShrinkError::Upload(
                "upload rejected with status 500 Internal Server Error".to_string(),
            ));
        }
        Ok(buffer)
    }
}

/// Rejects only WebP derivatives.
pub struct RejectWebpCompressor;

#[async_trait]
impl Compressor for RejectWebpCompressor {
    async fn compress(&self, buffer: Vec<u8>) -> Result<Vec<u8>> {
        if buffer.len() >= 12 && &buffer[8..12] == b"WEBP" {
            return Err(ShrinkError::Download(
                "download failed with status 404 Not Found".to_string(),
            ));
        }
        Ok(buffer)
    }
}

/// Blocks every call until `parties` calls are waiting at once.
pub struct RendezvousCompressor {
    barrier: tokio::sync::Barrier,
}

impl RendezvousCompressor {
    pub fn new(parties: usize) -> Self {
        Self {
            barrier: tokio::sync::Barrier::new(parties),
        }
    }
}

#[async_trait]
impl Compressor for RendezvousCompressor {
    async fn compress(&self, buffer: Vec<u8>) -> Result<Vec<u8>> {
        self.barrier.wait().await;
        Ok(buffer)
    }
}
