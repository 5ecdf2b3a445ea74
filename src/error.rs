//! Error types for cutout pipeline operations

use thiserror::Error;

/// Result type alias for cutout pipeline operations
pub type Result<T> = std::result::Result<T, CutoutError>;

/// Error types for mask synthesis, compositing, and pipeline coordination
#[derive(Error, Debug)]
pub enum CutoutError {
    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding or processing errors
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// Source image bytes could not be decoded before segmentation
    #[error("Failed to decode source image: {0}")]
    Decode(#[source] image::ImageError),

    /// Segmentation collaborator failed to initialize; retryable on the next call
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// Segmentation collaborator failed on a specific image
    #[error("Segmentation error: {0}")]
    Segmentation(String),

    /// Segmentation output size disagrees with the source image size
    #[error("Dimension mismatch: segmentation output is {actual:?}, source is {expected:?}")]
    DimensionMismatch {
        /// Source image dimensions (width, height)
        expected: (u32, u32),
        /// Dimensions the collaborator actually produced (width, height)
        actual: (u32, u32),
    },

    /// A pipeline run is already in flight for this session
    #[error("Session busy: a processing run is already in flight")]
    SessionBusy,

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic error for unexpected conditions
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CutoutError {
    /// Create a new model load error
    pub fn model_load<S: Into<String>>(msg: S) -> Self {
        Self::ModelLoad(msg.into())
    }

    /// Create a new segmentation error
    pub fn segmentation<S: Into<String>>(msg: S) -> Self {
        Self::Segmentation(msg.into())
    }

    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Create a decode error preserving the underlying image error
    #[must_use]
    pub fn decode(error: image::ImageError) -> Self {
        Self::Decode(error)
    }

    /// Create a dimension mismatch error from source and collaborator dimensions
    #[must_use]
    pub fn dimension_mismatch(expected: (u32, u32), actual: (u32, u32)) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Whether the caller may retry the operation that produced this error
    ///
    /// Model load failures are non-fatal; a dimension mismatch indicates a
    /// collaborator contract violation and is fatal to that run.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ModelLoad(_) | Self::SessionBusy)
    }
}
