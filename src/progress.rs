//! Progress reporting for pipeline runs
//!
//! Separates completion/error/stage callbacks from business logic so
//! hosts can surface their own indicators. The coordinator reports every
//! stage transition here; hosts that don't care install the no-op
//! reporter.

use crate::types::ProcessingTimings;
use instant::Instant;

/// Stages a pipeline run moves through
///
/// A run advances in order on the success path and jumps straight to the
/// error callback on failure; either way the coordinator returns to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Acquiring the segmentation model (first run only)
    ModelLoading,
    /// Running per-pixel classification on the source image
    Segmentation,
    /// Synthesizing the RGBA mask from the segmentation map
    MaskSynthesis,
    /// Applying the mask to the source image
    Compositing,
    /// Encoding result images for transport
    Encoding,
    /// Run finished and session updated
    Completed,
}

impl ProcessingStage {
    /// Get a human-readable description of the processing stage
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            ProcessingStage::ModelLoading => "Loading segmentation model",
            ProcessingStage::Segmentation => "Segmenting subject",
            ProcessingStage::MaskSynthesis => "Synthesizing mask",
            ProcessingStage::Compositing => "Compositing subject",
            ProcessingStage::Encoding => "Encoding result images",
            ProcessingStage::Completed => "Processing completed",
        }
    }

    /// Get the typical progress percentage for this stage
    #[must_use]
    pub fn progress_percentage(&self) -> u8 {
        match self {
            ProcessingStage::ModelLoading => 10,
            ProcessingStage::Segmentation => 60,
            ProcessingStage::MaskSynthesis => 75,
            ProcessingStage::Compositing => 90,
            ProcessingStage::Encoding => 98,
            ProcessingStage::Completed => 100,
        }
    }
}

/// Progress update containing stage and timing information
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// Current processing stage
    pub stage: ProcessingStage,
    /// Progress percentage (0-100)
    pub progress: u8,
    /// Human-readable stage description
    pub description: String,
    /// Elapsed time since the run started (milliseconds)
    pub elapsed_ms: u64,
}

impl ProgressUpdate {
    /// Create a new progress update
    #[must_use]
    pub fn new(stage: ProcessingStage, start_time: Instant) -> Self {
        Self {
            progress: stage.progress_percentage(),
            description: stage.description().to_string(),
            elapsed_ms: start_time.elapsed().as_millis() as u64,
            stage,
        }
    }
}

/// Trait for receiving pipeline run callbacks
pub trait ProgressReporter: Send + Sync {
    /// Report a stage transition
    fn report_progress(&self, update: ProgressUpdate);

    /// Report successful completion with final timings
    fn report_completion(&self, timings: ProcessingTimings);

    /// Report a failure; fired once per failed run
    ///
    /// # Arguments
    /// * `stage` - Stage where the failure occurred
    /// * `error` - Error description
    fn report_error(&self, stage: ProcessingStage, error: &str);
}

/// No-op progress reporter that discards all callbacks
pub struct NoOpProgressReporter;

impl ProgressReporter for NoOpProgressReporter {
    fn report_progress(&self, _update: ProgressUpdate) {}

    fn report_completion(&self, _timings: ProcessingTimings) {}

    fn report_error(&self, _stage: ProcessingStage, _error: &str) {}
}
