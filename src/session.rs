//! Per-session pipeline state
//!
//! A [`Session`] holds the current original/processed/mask images and the
//! busy flag. Only the coordinator mutates it; hosts get read access.
//! Invariants: `processed` and `mask` are either both absent or both
//! present (they are produced atomically by one pipeline run), and at most
//! one run is active at a time (the busy flag gates re-entry).

use crate::error::{CutoutError, Result};
use image::DynamicImage;

/// Session state holding pipeline inputs, outputs, and the busy flag
#[derive(Debug, Default)]
pub struct Session {
    original: Option<DynamicImage>,
    processed: Option<DynamicImage>,
    mask: Option<DynamicImage>,
    busy: bool,
}

impl Session {
    /// Create a new empty, idle session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The source image of the most recent run, if any
    #[must_use]
    pub fn original(&self) -> Option<&DynamicImage> {
        self.original.as_ref()
    }

    /// The subject-only composite of the last successful run, if any
    #[must_use]
    pub fn processed(&self) -> Option<&DynamicImage> {
        self.processed.as_ref()
    }

    /// The mask image of the last successful run, if any
    #[must_use]
    pub fn mask(&self) -> Option<&DynamicImage> {
        self.mask.as_ref()
    }

    /// Whether a pipeline run is currently in flight
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether a successful run's outputs are present
    #[must_use]
    pub fn has_result(&self) -> bool {
        self.processed.is_some() && self.mask.is_some()
    }

    /// Start a run: record the original and take the busy flag
    ///
    /// Previous outputs are left in place; they are only replaced when the
    /// run completes, so a failed run never leaves partial state behind.
    pub(crate) fn begin(&mut self, original: DynamicImage) -> Result<()> {
        if self.busy {
            return Err(CutoutError::SessionBusy);
        }
        self.busy = true;
        self.original = Some(original);
        Ok(())
    }

    /// Finish a run successfully, publishing both outputs atomically
    pub(crate) fn complete(&mut self, processed: DynamicImage, mask: DynamicImage) {
        self.processed = Some(processed);
        self.mask = Some(mask);
        self.busy = false;
    }

    /// Finish a failed run, releasing the busy flag and nothing else
    pub(crate) fn fail(&mut self) {
        self.busy = false;
    }

    /// Reset outputs to absent; keeps the original untouched
    pub(crate) fn clear_outputs(&mut self) {
        self.processed = None;
        self.mask = None;
    }
}
