//! Core types for cutout pipeline results

use crate::error::Result;
use chrono::Utc;
use image::DynamicImage;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Encode an image as PNG bytes
///
/// PNG is the transport format for every produced image: lossless and
/// alpha-faithful, so downstream consumers need no further processing.
pub(crate) fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image.write_to(&mut cursor, image::ImageFormat::Png)?;
    Ok(buffer)
}

/// Detailed timing breakdown for a pipeline run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingTimings {
    /// Model loading time (first run only)
    pub model_load_ms: u64,

    /// Per-image segmentation time
    pub segmentation_ms: u64,

    /// Mask synthesis time
    pub mask_synthesis_ms: u64,

    /// Compositing time
    pub compositing_ms: u64,

    /// PNG encoding time for the three transport images
    pub encode_ms: u64,

    /// Total end-to-end run time
    pub total_ms: u64,
}

impl ProcessingTimings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of the run spent inside the segmentation collaborator
    #[must_use]
    pub fn segmentation_ratio(&self) -> f64 {
        if self.total_ms == 0 {
            0.0
        } else {
            self.segmentation_ms as f64 / self.total_ms as f64
        }
    }
}

/// Metadata about a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutoutMetadata {
    /// Detailed timing breakdown
    pub timings: ProcessingTimings,

    /// Whether edge smoothing was applied
    pub smooth_edges: bool,

    /// Whether the mask polarity was inverted
    pub inverted: bool,
}

impl CutoutMetadata {
    /// Create metadata for a run with the given configuration flags
    #[must_use]
    pub fn new(smooth_edges: bool, inverted: bool) -> Self {
        Self {
            timings: ProcessingTimings::new(),
            smooth_edges,
            inverted,
        }
    }
}

/// PNG-encoded transport forms of the three produced images
#[derive(Debug, Clone)]
pub struct CutoutArtifacts {
    /// The source image as delivered to the pipeline
    pub original: Vec<u8>,

    /// The subject-only composite
    pub processed: Vec<u8>,

    /// The standalone mask image
    pub mask: Vec<u8>,
}

impl CutoutArtifacts {
    /// Encode all three images as PNG
    ///
    /// # Errors
    ///
    /// Returns an error when any image fails to encode.
    pub fn from_images(
        original: &DynamicImage,
        processed: &DynamicImage,
        mask: &DynamicImage,
    ) -> Result<Self> {
        Ok(Self {
            original: encode_png(original)?,
            processed: encode_png(processed)?,
            mask: encode_png(mask)?,
        })
    }
}

/// Result of a cutout pipeline run
#[derive(Debug, Clone)]
pub struct CutoutResult {
    /// The source image
    pub original: DynamicImage,

    /// The subject-only composite with background removed
    pub image: DynamicImage,

    /// The standalone mask image
    pub mask: DynamicImage,

    /// Source image dimensions (width, height)
    pub original_dimensions: (u32, u32),

    /// PNG-encoded transport forms of all three images
    pub artifacts: CutoutArtifacts,

    /// Processing metadata
    pub metadata: CutoutMetadata,
}

impl CutoutResult {
    /// Create a new cutout result
    #[must_use]
    pub fn new(
        original: DynamicImage,
        image: DynamicImage,
        mask: DynamicImage,
        original_dimensions: (u32, u32),
        artifacts: CutoutArtifacts,
        metadata: CutoutMetadata,
    ) -> Self {
        Self {
            original,
            image,
            mask,
            original_dimensions,
            artifacts,
            metadata,
        }
    }

    /// Get result image dimensions
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.original_dimensions
    }

    /// Get the detailed timing breakdown
    #[must_use]
    pub fn timings(&self) -> &ProcessingTimings {
        &self.metadata.timings
    }

    /// Save the subject-only composite as PNG with alpha channel
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written or encoded.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    /// Save the standalone mask image as PNG
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written or encoded.
    pub fn save_mask_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.mask.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    /// Save the composite as PNG and log the completed run
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written or encoded.
    pub fn save_png_timed<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path_str = path.as_ref().display().to_string();
        self.save_png(&path)?;

        let total_time_s = self.metadata.timings.total_ms as f64 / 1000.0;
        info!(
            "[{}Z INFO person_cutout] Saved cutout -> {} (run took {:.2}s)",
            Utc::now().format("%Y-%m-%dT%H:%M:%S"),
            path_str,
            total_time_s
        );

        Ok(())
    }
}
