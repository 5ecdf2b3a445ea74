//! Segmentation result data model and the collaborator seam
//!
//! The segmentation model itself (weights, inference backend, tensor
//! runtime) lives outside this crate. The pipeline consumes only its
//! output: a per-pixel foreground confidence aligned 1:1 to the source
//! image, held here as a [`SegmentationMap`]. Model implementations plug
//! in through the [`Segmenter`] trait.

use crate::error::{CutoutError, Result};
use async_trait::async_trait;
use image::DynamicImage;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Confidence value at or above which a pixel counts as foreground
pub const FOREGROUND_THRESHOLD: u8 = 128;

/// Per-pixel foreground classification produced by a segmentation model
///
/// Values are confidence levels: 0 is certain background, 255 is certain
/// foreground. A model that only emits hard labels maps them to exactly 0
/// and 255; graded models use the full range, which the synthesizer can
/// exploit for edge feathering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationMap {
    data: Vec<u8>,
    dimensions: (u32, u32),
}

impl SegmentationMap {
    /// Create a map from raw confidence values
    ///
    /// # Errors
    ///
    /// Returns `CutoutError::Internal` when `data.len()` does not equal
    /// `width * height`.
    pub fn new(data: Vec<u8>, dimensions: (u32, u32)) -> Result<Self> {
        let expected = dimensions.0 as usize * dimensions.1 as usize;
        if data.len() != expected {
            return Err(CutoutError::internal(format!(
                "Segmentation data length {} does not match dimensions {}x{}",
                data.len(),
                dimensions.0,
                dimensions.1
            )));
        }
        Ok(Self { data, dimensions })
    }

    /// Create a map from hard foreground/background labels
    ///
    /// # Errors
    ///
    /// Returns `CutoutError::Internal` when the label count does not match
    /// the dimensions.
    pub fn from_labels(labels: &[bool], dimensions: (u32, u32)) -> Result<Self> {
        let data = labels.iter().map(|&fg| if fg { 255 } else { 0 }).collect();
        Self::new(data, dimensions)
    }

    /// Create a map from a model's confidence plane
    ///
    /// Accepts the `(height, width)` tensor plane a backend would emit,
    /// with values in 0.0-1.0; out-of-range and non-finite values are
    /// clamped.
    #[must_use]
    pub fn from_confidences(plane: &Array2<f32>) -> Self {
        let (height, width) = plane.dim();
        let data = plane
            .iter()
            .map(|&v| {
                let clamped = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
                (clamped * 255.0).round() as u8
            })
            .collect();
        Self {
            data,
            dimensions: (width as u32, height as u32),
        }
    }

    /// Map dimensions as (width, height)
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    /// Map width in pixels
    #[must_use]
    pub fn width(&self) -> u32 {
        self.dimensions.0
    }

    /// Map height in pixels
    #[must_use]
    pub fn height(&self) -> u32 {
        self.dimensions.1
    }

    /// Raw confidence values in row-major order
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Confidence at a pixel; out-of-bounds coordinates read as background
    #[must_use]
    pub fn confidence(&self, x: u32, y: u32) -> u8 {
        if x >= self.dimensions.0 || y >= self.dimensions.1 {
            return 0;
        }
        let idx = y as usize * self.dimensions.0 as usize + x as usize;
        self.data.get(idx).copied().unwrap_or(0)
    }

    /// Whether the pixel is classified as foreground
    #[must_use]
    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.confidence(x, y) >= FOREGROUND_THRESHOLD
    }

    /// Whether every value is a hard label (exactly 0 or 255)
    ///
    /// Hard-labelled maps carry no gradient for the synthesizer to blend
    /// with, so feathering falls back to a neighborhood average.
    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.data.iter().all(|&v| v == 0 || v == 255)
    }

    /// Foreground/background pixel counts and ratios
    #[must_use]
    pub fn statistics(&self) -> MapStatistics {
        let total_pixels = self.data.len();
        let foreground_pixels = self
            .data
            .iter()
            .filter(|&&v| v >= FOREGROUND_THRESHOLD)
            .count();
        let background_pixels = total_pixels - foreground_pixels;

        MapStatistics {
            total_pixels,
            foreground_pixels,
            background_pixels,
            foreground_ratio: foreground_pixels as f32 / total_pixels.max(1) as f32,
        }
    }

    /// Render the confidence values as a grayscale image for diagnostics
    ///
    /// # Errors
    ///
    /// Returns `CutoutError::Internal` when the buffer cannot be
    /// reassembled (dimensions and data disagree).
    pub fn to_image(&self) -> Result<image::GrayImage> {
        let (width, height) = self.dimensions;
        image::GrayImage::from_raw(width, height, self.data.clone()).ok_or_else(|| {
            CutoutError::internal("Failed to create image from segmentation data")
        })
    }
}

/// Statistics about a segmentation map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapStatistics {
    pub total_pixels: usize,
    pub foreground_pixels: usize,
    pub background_pixels: usize,
    pub foreground_ratio: f32,
}

/// Trait for segmentation model collaborators
///
/// Implementations wrap whatever runtime actually evaluates the model.
/// `load` performs the one-time, possibly long-running initialization;
/// `segment` classifies a single decoded image. Both are suspend-capable
/// so a UI-owning caller is never blocked.
#[async_trait]
pub trait Segmenter: Send + Sync {
    /// Acquire the model; called once, must be cheap when already loaded
    async fn load(&mut self) -> Result<()>;

    /// Whether `load` has completed successfully
    fn is_loaded(&self) -> bool;

    /// Classify every pixel of the image as foreground or background
    ///
    /// The returned map must match the image dimensions exactly; the
    /// coordinator treats any disagreement as a contract violation.
    async fn segment(&mut self, image: &DynamicImage) -> Result<SegmentationMap>;
}
