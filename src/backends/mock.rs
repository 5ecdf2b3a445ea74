//! Mock segmenter implementation for testing and debugging
//!
//! Provides a deterministic luma-threshold "model" so the pipeline can be
//! exercised without model files or an inference runtime, plus failure
//! injection and call instrumentation for verifying coordinator behavior.

use crate::error::{CutoutError, Result};
use crate::segmentation::{SegmentationMap, Segmenter};
use async_trait::async_trait;
use image::DynamicImage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Deterministic mock segmenter for testing and debugging
///
/// Classifies pixels by luminance: pixels at or above the threshold are
/// foreground. Binary by default; `graded()` emits the raw luminance as a
/// confidence value instead, which exercises confidence-proportional edge
/// feathering. An overlap guard errors if `segment` is ever invoked
/// re-entrantly, so tests can prove the single-flight invariant.
pub struct MockSegmenter {
    loaded: bool,
    threshold: u8,
    graded: bool,
    /// Call history for verification in tests
    call_history: Arc<Mutex<Vec<String>>>,
    /// Whether to simulate a model load failure
    should_fail_load: bool,
    /// Whether to simulate a per-image segmentation failure
    should_fail_segment: bool,
    /// Fail every segmentation after this many calls have been served
    fail_after: Option<usize>,
    /// Extra width/height added to the output map to violate the contract
    dimension_skew: (u32, u32),
    in_flight: Arc<AtomicBool>,
}

impl MockSegmenter {
    /// Create a new binary mock segmenter with the default threshold
    #[must_use]
    pub fn new() -> Self {
        Self {
            loaded: false,
            threshold: 128,
            graded: false,
            call_history: Arc::new(Mutex::new(Vec::new())),
            should_fail_load: false,
            should_fail_segment: false,
            fail_after: None,
            dimension_skew: (0, 0),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a mock segmenter that emits graded confidence values
    #[must_use]
    pub fn graded() -> Self {
        let mut segmenter = Self::new();
        segmenter.graded = true;
        segmenter
    }

    /// Create a mock segmenter with a custom foreground threshold
    #[must_use]
    pub fn with_threshold(threshold: u8) -> Self {
        let mut segmenter = Self::new();
        segmenter.threshold = threshold;
        segmenter
    }

    /// Create a mock segmenter that fails during model load
    #[must_use]
    pub fn new_failing_load() -> Self {
        let mut segmenter = Self::new();
        segmenter.should_fail_load = true;
        segmenter
    }

    /// Create a mock segmenter that fails on every image
    #[must_use]
    pub fn new_failing_segment() -> Self {
        let mut segmenter = Self::new();
        segmenter.should_fail_segment = true;
        segmenter
    }

    /// Create a mock segmenter that fails once `calls` images have been served
    #[must_use]
    pub fn new_failing_after(calls: usize) -> Self {
        let mut segmenter = Self::new();
        segmenter.fail_after = Some(calls);
        segmenter
    }

    /// Create a mock segmenter whose output violates the dimension contract
    #[must_use]
    pub fn new_with_dimension_skew(extra_width: u32, extra_height: u32) -> Self {
        let mut segmenter = Self::new();
        segmenter.dimension_skew = (extra_width, extra_height);
        segmenter
    }

    /// Shared handle to the call history for verification in tests
    ///
    /// The handle stays valid after the segmenter is boxed and moved into
    /// a processor.
    #[must_use]
    pub fn call_history_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.call_history)
    }

    /// Number of recorded `load` invocations
    #[must_use]
    pub fn load_call_count(&self) -> usize {
        self.count_calls("load")
    }

    /// Number of recorded `segment` invocations
    #[must_use]
    pub fn segment_call_count(&self) -> usize {
        self.count_calls("segment")
    }

    fn count_calls(&self, method: &str) -> usize {
        self.call_history
            .lock()
            .map(|history| history.iter().filter(|call| *call == method).count())
            .unwrap_or(0)
    }

    fn record_call(&self, method: &str) {
        if let Ok(mut history) = self.call_history.lock() {
            history.push(method.to_string());
        }
    }

    fn classify(&self, image: &DynamicImage) -> Result<SegmentationMap> {
        let luma = image.to_luma8();
        let (width, height) = luma.dimensions();

        let data = if self.graded {
            luma.as_raw().clone()
        } else {
            luma.as_raw()
                .iter()
                .map(|&l| if l >= self.threshold { 255 } else { 0 })
                .collect()
        };

        if self.dimension_skew == (0, 0) {
            return SegmentationMap::new(data, (width, height));
        }

        // Deliberately wrong-sized output for contract violation tests.
        let skewed = (width + self.dimension_skew.0, height + self.dimension_skew.1);
        let len = skewed.0 as usize * skewed.1 as usize;
        SegmentationMap::new(vec![0; len], skewed)
    }
}

impl Default for MockSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Segmenter for MockSegmenter {
    async fn load(&mut self) -> Result<()> {
        self.record_call("load");
        // Yield once so callers exercise the suspend point a real model
        // load would have.
        tokio::task::yield_now().await;

        if self.should_fail_load {
            return Err(CutoutError::model_load("Simulated model load failure"));
        }

        self.loaded = true;
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    async fn segment(&mut self, image: &DynamicImage) -> Result<SegmentationMap> {
        self.record_call("segment");

        if !self.loaded {
            return Err(CutoutError::segmentation("Segmenter not loaded"));
        }

        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(CutoutError::internal(
                "Overlapping segment invocations detected",
            ));
        }

        tokio::task::yield_now().await;

        let exhausted = self
            .fail_after
            .is_some_and(|calls| self.count_calls("segment") > calls);
        let outcome = if self.should_fail_segment || exhausted {
            Err(CutoutError::segmentation("Simulated segmentation failure"))
        } else {
            self.classify(image)
        };

        self.in_flight.store(false, Ordering::SeqCst);
        outcome
    }
}
