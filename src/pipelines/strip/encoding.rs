// SPDX-License-Identifier: GPL-3.0-only

//! Async strip encoding
//!
//! This module handles encoding composed strips and writing them to disk:
//! - JPEG (with quality control, default)
//! - PNG (lossless)
//!
//! Encoding and file writes run on blocking worker threads.

use crate::errors::AssemblyError;
use crate::storage;
use image::{ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Supported encoding formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingFormat {
    /// JPEG format (lossy compression)
    #[default]
    Jpeg,
    /// PNG format (lossless compression)
    Png,
}

impl EncodingFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            EncodingFormat::Jpeg => "jpg",
            EncodingFormat::Png => "png",
        }
    }
}

/// Encoding quality settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingQuality {
    /// Low quality (high compression)
    Low,
    /// Medium quality (balanced)
    Medium,
    /// High quality (low compression)
    #[default]
    High,
    /// Maximum quality (minimal compression)
    Maximum,
}

impl EncodingQuality {
    /// Get JPEG quality value (0-100)
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            EncodingQuality::Low => 60,
            EncodingQuality::Medium => 80,
            EncodingQuality::High => 92,
            EncodingQuality::Maximum => 98,
        }
    }
}

/// Strip encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct StripEncoder {
    format: EncodingFormat,
    quality: EncodingQuality,
}

impl StripEncoder {
    /// Create a new encoder with JPEG format and high quality
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(format: EncodingFormat, quality: EncodingQuality) -> Self {
        Self { format, quality }
    }

    /// Encode `image` into memory
    pub fn encode(&self, image: &RgbImage) -> Result<Vec<u8>, AssemblyError> {
        let data = match self.format {
            EncodingFormat::Jpeg => Self::encode_jpeg(image, self.quality)?,
            EncodingFormat::Png => Self::encode_png(image)?,
        };
        debug!(size = data.len(), format = ?self.format, "Encoding complete");
        Ok(data)
    }

    /// Encode and write the strip under `output_dir` asynchronously
    ///
    /// The directory is created if missing. The filename is
    /// `<prefix><timestamp>.<ext>` and never overwrites an existing file.
    pub async fn save(
        &self,
        image: Arc<RgbImage>,
        output_dir: PathBuf,
        prefix: String,
    ) -> Result<PathBuf, AssemblyError> {
        info!(
            width = image.width(),
            height = image.height(),
            format = ?self.format,
            dir = %output_dir.display(),
            "Persisting strip"
        );

        let encoder = *self;
        let path = tokio::task::spawn_blocking(move || encoder.save_blocking(&image, &output_dir, &prefix))
            .await
            .map_err(|e| AssemblyError::PersistFailed(format!("Save task error: {}", e)))??;

        info!(path = %path.display(), "Strip saved successfully");
        Ok(path)
    }

    fn save_blocking(&self, image: &RgbImage, output_dir: &Path, prefix: &str) -> Result<PathBuf, AssemblyError> {
        storage::ensure_dir(output_dir).map_err(|e| {
            AssemblyError::PersistFailed(format!(
                "Failed to create {}: {}",
                output_dir.display(),
                e
            ))
        })?;

        let data = self.encode(image)?;
        let path = storage::write_new_file(output_dir, prefix, self.format.extension(), &data)
            .map_err(|e| AssemblyError::PersistFailed(format!("Failed to save strip: {}", e)))?;
        Ok(path)
    }

    /// Encode image as JPEG
    fn encode_jpeg(image: &RgbImage, quality: EncodingQuality) -> Result<Vec<u8>, AssemblyError> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);

        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality.jpeg_quality());

        image
            .write_with_encoder(encoder)
            .map_err(|e| AssemblyError::PersistFailed(format!("JPEG encoding failed: {}", e)))?;

        Ok(buffer)
    }

    /// Encode image as PNG
    fn encode_png(image: &RgbImage) -> Result<Vec<u8>, AssemblyError> {
        let mut buffer = Vec::new();

        image
            .write_to(&mut std::io::Cursor::new(&mut buffer), ImageFormat::Png)
            .map_err(|e| AssemblyError::PersistFailed(format!("PNG encoding failed: {}", e)))?;

        Ok(buffer)
    }
}
