#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

//! # Person Cutout Library
//!
//! A Rust library for turning the output of a human-segmentation model
//! into background-removed images. Given a photograph and a per-pixel
//! foreground classification, it synthesizes a binary or feathered alpha
//! mask, renders the mask as a standalone image, and alpha-composites the
//! subject out of the source photo.
//!
//! The segmentation model itself is an external collaborator injected
//! through the [`Segmenter`] trait; this crate consumes only its output.
//!
//! ## Features
//!
//! - **Mask Synthesis**: hard or feathered masks from graded confidence or
//!   hard labels, with a configurable foreground/background color pair and
//!   polarity inversion
//! - **Compositing**: stencil semantics that never alter source RGB values
//! - **Pipeline Coordination**: one-time model load, single-flight runs,
//!   atomic session updates, and stage/completion/error callbacks
//! - **PNG Transport**: lossless, alpha-faithful encoded forms of the
//!   original, processed, and mask images
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use person_cutout::{backends::MockSegmenter, CutoutConfig, CutoutProcessor};
//!
//! # async fn example() -> person_cutout::Result<()> {
//! let config = CutoutConfig::builder()
//!     .smooth_edges(true)
//!     .build()?;
//!
//! // A real host injects its model-backed segmenter here.
//! let mut processor = CutoutProcessor::new(Box::new(MockSegmenter::new()), config)?;
//! processor.load_model().await?;
//!
//! let photo = image::open("photo.jpg")?;
//! let result = processor.process(photo).await?;
//! result.save_png("subject.png")?;
//! result.save_mask_png("mask.png")?;
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod compositor;
pub mod config;
pub mod error;
pub mod mask;
pub mod processor;
pub mod progress;
pub mod segmentation;
pub mod session;
pub mod types;

// Internal imports for lib functions
use tokio::io::AsyncRead;

// Public API exports
pub use compositor::composite;
pub use config::{CutoutConfig, CutoutConfigBuilder, MaskColor, DEFAULT_FEATHER_RADIUS};
pub use error::{CutoutError, Result};
pub use mask::{EdgeSmoothing, MaskSynthesizer};
pub use processor::CutoutProcessor;
pub use progress::{NoOpProgressReporter, ProcessingStage, ProgressReporter, ProgressUpdate};
pub use segmentation::{
    MapStatistics, SegmentationMap, Segmenter, FOREGROUND_THRESHOLD,
};
pub use session::Session;
pub use types::{CutoutArtifacts, CutoutMetadata, CutoutResult, ProcessingTimings};

/// Run the cutout pipeline on a pre-decoded image
///
/// This is the most flexible entry point for in-memory processing: it
/// builds a processor around the injected segmenter, loads the model, and
/// runs one pipeline pass.
///
/// # Examples
///
/// ```rust,no_run
/// use person_cutout::{backends::MockSegmenter, cutout_from_image, CutoutConfig};
///
/// # async fn example(img: image::DynamicImage) -> person_cutout::Result<()> {
/// let config = CutoutConfig::default();
/// let result = cutout_from_image(img, Box::new(MockSegmenter::new()), &config).await?;
/// result.save_png("subject.png")?;
/// # Ok(())
/// # }
/// ```
pub async fn cutout_from_image(
    image: image::DynamicImage,
    segmenter: Box<dyn Segmenter>,
    config: &CutoutConfig,
) -> Result<CutoutResult> {
    let mut processor = CutoutProcessor::new(segmenter, config.clone())?;
    processor.load_model().await?;
    processor.process(image).await
}

/// Run the cutout pipeline on encoded image bytes
///
/// Suitable for web servers and memory-based processing. Decoding happens
/// before segmentation; undecodable input surfaces as
/// [`CutoutError::Decode`].
///
/// # Examples
///
/// ```rust,no_run
/// use person_cutout::{backends::MockSegmenter, cutout_from_bytes, CutoutConfig};
///
/// # async fn example(upload_bytes: Vec<u8>) -> person_cutout::Result<()> {
/// let config = CutoutConfig::default();
/// let result = cutout_from_bytes(&upload_bytes, Box::new(MockSegmenter::new()), &config).await?;
/// let png = result.artifacts.processed.clone();
/// # let _ = png;
/// # Ok(())
/// # }
/// ```
pub async fn cutout_from_bytes(
    image_bytes: &[u8],
    segmenter: Box<dyn Segmenter>,
    config: &CutoutConfig,
) -> Result<CutoutResult> {
    let image = image::load_from_memory(image_bytes).map_err(CutoutError::decode)?;
    cutout_from_image(image, segmenter, config).await
}

/// Run the cutout pipeline on an async reader stream
///
/// Accepts any async readable stream, making it suitable for network
/// streams or large files.
///
/// # Examples
///
/// ```rust,no_run
/// use person_cutout::{backends::MockSegmenter, cutout_from_reader, CutoutConfig};
/// use tokio::fs::File;
///
/// # async fn example() -> person_cutout::Result<()> {
/// let file = File::open("photo.jpg").await?;
/// let config = CutoutConfig::default();
/// let result = cutout_from_reader(file, Box::new(MockSegmenter::new()), &config).await?;
/// result.save_png("subject.png")?;
/// # Ok(())
/// # }
/// ```
pub async fn cutout_from_reader<R: AsyncRead + Unpin>(
    mut reader: R,
    segmenter: Box<dyn Segmenter>,
    config: &CutoutConfig,
) -> Result<CutoutResult> {
    let mut buffer = Vec::new();
    tokio::io::AsyncReadExt::read_to_end(&mut reader, &mut buffer).await?;
    cutout_from_bytes(&buffer, segmenter, config).await
}
