//! Pipeline coordinator for cutout runs
//!
//! The [`CutoutProcessor`] orchestrates model load, per-image
//! segmentation, mask synthesis, compositing, and result delivery. It
//! owns the injected segmentation collaborator and the per-session state,
//! and guarantees the single-flight invariant: at most one run per
//! session, with the busy flag cleared only once a run fully resolves.

use crate::{
    compositor::composite,
    config::CutoutConfig,
    error::{CutoutError, Result},
    mask::MaskSynthesizer,
    progress::{NoOpProgressReporter, ProcessingStage, ProgressReporter, ProgressUpdate},
    segmentation::Segmenter,
    session::Session,
    types::{CutoutArtifacts, CutoutMetadata, CutoutResult, ProcessingTimings},
};
use image::{DynamicImage, GenericImageView};
use instant::Instant;
use log::{debug, info, warn};
use tracing::instrument;

/// Coordinates cutout pipeline runs against a single session
///
/// The segmentation collaborator is injected explicitly; it is loaded
/// lazily on the first run (or eagerly via [`CutoutProcessor::load_model`])
/// and reused for every subsequent run. `&mut self` receivers make
/// overlapping runs on one processor unrepresentable; the session's busy
/// flag keeps the invariant observable for hosts.
pub struct CutoutProcessor {
    config: CutoutConfig,
    segmenter: Box<dyn Segmenter>,
    session: Session,
    progress: Box<dyn ProgressReporter>,
}

impl CutoutProcessor {
    /// Create a new processor with the given collaborator and configuration
    ///
    /// # Errors
    ///
    /// Returns `CutoutError::InvalidConfig` when the configuration fails
    /// validation.
    pub fn new(segmenter: Box<dyn Segmenter>, config: CutoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            segmenter,
            session: Session::new(),
            progress: Box::new(NoOpProgressReporter),
        })
    }

    /// Attach a progress reporter receiving stage/completion/error callbacks
    #[must_use]
    pub fn with_progress_reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.progress = reporter;
        self
    }

    /// Read access to the current session state
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &CutoutConfig {
        &self.config
    }

    /// Acquire the segmentation model
    ///
    /// Idempotent: returns immediately when the collaborator is already
    /// loaded. A failed load leaves the processor usable for a retry.
    ///
    /// # Errors
    ///
    /// Returns `CutoutError::ModelLoad` when the collaborator fails to
    /// initialize.
    pub async fn load_model(&mut self) -> Result<()> {
        if self.segmenter.is_loaded() {
            debug!("Segmentation model already loaded, skipping");
            return Ok(());
        }

        info!("Loading segmentation model");
        let load_start = Instant::now();
        self.segmenter.load().await?;
        info!(
            "Segmentation model loaded in {}ms",
            load_start.elapsed().as_millis()
        );
        Ok(())
    }

    /// Run the full pipeline on a decoded source image
    ///
    /// Loads the model if needed, segments, synthesizes the mask,
    /// composites the subject, encodes PNG artifacts, and updates the
    /// session atomically. Any failure aborts the remaining steps, leaves
    /// the session's previous outputs untouched, clears the busy flag,
    /// and fires the error callback once.
    ///
    /// # Errors
    ///
    /// - `CutoutError::SessionBusy` when a run is already in flight
    /// - `CutoutError::ModelLoad` when the collaborator fails to initialize
    /// - `CutoutError::Segmentation` when classification fails
    /// - `CutoutError::DimensionMismatch` when the collaborator violates
    ///   the size contract
    /// - encoding errors from artifact generation
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub async fn process(&mut self, image: DynamicImage) -> Result<CutoutResult> {
        let total_start = Instant::now();
        self.session.begin(image.clone())?;

        let (width, height) = image.dimensions();
        info!("Starting cutout run: {}x{}", width, height);

        match self.run_pipeline(&image, total_start).await {
            Ok(result) => {
                self.session
                    .complete(result.image.clone(), result.mask.clone());
                self.progress
                    .report_progress(ProgressUpdate::new(ProcessingStage::Completed, total_start));
                self.progress
                    .report_completion(result.metadata.timings.clone());
                info!(
                    "Cutout run completed in {}ms",
                    result.metadata.timings.total_ms
                );
                Ok(result)
            },
            Err((stage, error)) => {
                self.session.fail();
                self.progress.report_error(stage, &error.to_string());
                warn!("Cutout run failed during {:?}: {}", stage, error);
                Err(error)
            },
        }
    }

    /// Reset processed/mask outputs; keeps the original and the loaded model
    pub fn clear(&mut self) {
        self.session.clear_outputs();
        debug!("Session outputs cleared");
    }

    async fn run_pipeline(
        &mut self,
        image: &DynamicImage,
        total_start: Instant,
    ) -> std::result::Result<CutoutResult, (ProcessingStage, CutoutError)> {
        let dimensions = image.dimensions();
        let mut timings = ProcessingTimings::new();

        if !self.segmenter.is_loaded() {
            self.progress.report_progress(ProgressUpdate::new(
                ProcessingStage::ModelLoading,
                total_start,
            ));
            let load_start = Instant::now();
            self.segmenter
                .load()
                .await
                .map_err(|e| (ProcessingStage::ModelLoading, e))?;
            timings.model_load_ms = load_start.elapsed().as_millis() as u64;
            debug!("Model loaded in {}ms", timings.model_load_ms);
        }

        self.progress.report_progress(ProgressUpdate::new(
            ProcessingStage::Segmentation,
            total_start,
        ));
        let segmentation_start = Instant::now();
        let map = self
            .segmenter
            .segment(image)
            .await
            .map_err(|e| (ProcessingStage::Segmentation, e))?;
        timings.segmentation_ms = segmentation_start.elapsed().as_millis() as u64;

        if map.dimensions() != dimensions {
            return Err((
                ProcessingStage::Segmentation,
                CutoutError::dimension_mismatch(dimensions, map.dimensions()),
            ));
        }

        let stats = map.statistics();
        tracing::debug!(
            foreground_ratio = f64::from(stats.foreground_ratio),
            "Segmentation completed in {}ms",
            timings.segmentation_ms
        );

        self.progress.report_progress(ProgressUpdate::new(
            ProcessingStage::MaskSynthesis,
            total_start,
        ));
        let synthesis_start = Instant::now();
        let synthesizer = MaskSynthesizer::from_config(&self.config);
        let mask = synthesizer
            .synthesize(&map, dimensions.0, dimensions.1)
            .map_err(|e| (ProcessingStage::MaskSynthesis, e))?;
        timings.mask_synthesis_ms = synthesis_start.elapsed().as_millis() as u64;
        debug!("Mask synthesized in {}ms", timings.mask_synthesis_ms);

        self.progress.report_progress(ProgressUpdate::new(
            ProcessingStage::Compositing,
            total_start,
        ));
        let compositing_start = Instant::now();
        let processed =
            composite(image, &mask).map_err(|e| (ProcessingStage::Compositing, e))?;
        timings.compositing_ms = compositing_start.elapsed().as_millis() as u64;
        debug!("Composited in {}ms", timings.compositing_ms);

        self.progress
            .report_progress(ProgressUpdate::new(ProcessingStage::Encoding, total_start));
        let encode_start = Instant::now();
        let processed_image = DynamicImage::ImageRgba8(processed);
        let mask_image = DynamicImage::ImageRgba8(mask);
        let artifacts = CutoutArtifacts::from_images(image, &processed_image, &mask_image)
            .map_err(|e| (ProcessingStage::Encoding, e))?;
        timings.encode_ms = encode_start.elapsed().as_millis() as u64;

        timings.total_ms = total_start.elapsed().as_millis() as u64;

        let mut metadata = CutoutMetadata::new(self.config.smooth_edges, self.config.inverted);
        metadata.timings = timings;

        Ok(CutoutResult::new(
            image.clone(),
            processed_image,
            mask_image,
            dimensions,
            artifacts,
            metadata,
        ))
    }
}
