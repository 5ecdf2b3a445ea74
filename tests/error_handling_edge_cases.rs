//! Error handling and edge case testing
//!
//! Tests error conditions and boundary behavior across the pipeline:
//! configuration validation, decode failures, collaborator contract
//! violations, and the session guarantees around failed runs.

use anyhow::Result;
use image::{DynamicImage, RgbaImage};
use person_cutout::{
    backends::MockSegmenter, cutout_from_bytes, cutout_from_image, CutoutConfig, CutoutError,
    CutoutProcessor, MaskColor, SegmentationMap,
};

fn two_tone_image() -> DynamicImage {
    let mut img = RgbaImage::new(4, 2);
    for y in 0..2 {
        for x in 0..4 {
            let value = if x < 2 { 255 } else { 0 };
            img.put_pixel(x, y, image::Rgba([value, value, value, 255]));
        }
    }
    DynamicImage::ImageRgba8(img)
}

#[test]
fn test_config_validation_edge_cases() -> Result<()> {
    // Boundary values for the feather radius.
    let config = CutoutConfig::builder().feather_radius(1).build();
    assert!(config.is_ok());

    let config = CutoutConfig::builder().feather_radius(16).build();
    assert!(config.is_ok());

    let result = CutoutConfig::builder().feather_radius(0).build();
    let error = result.unwrap_err();
    assert!(matches!(error, CutoutError::InvalidConfig(_)));
    assert!(error.to_string().contains("at least 1"));

    let result = CutoutConfig::builder().feather_radius(17).build();
    let error = result.unwrap_err();
    assert!(error.to_string().contains("at most 16"));
    assert!(error.to_string().contains("17"));

    // Manual validation failure after construction.
    let mut config = CutoutConfig::default();
    config.feather_radius = 0;
    assert!(config.validate().is_err());

    Ok(())
}

#[test]
fn test_config_serde_round_trip() -> Result<()> {
    let config = CutoutConfig::builder()
        .smooth_edges(false)
        .inverted(true)
        .foreground(MaskColor::new(1, 2, 3, 4))
        .feather_radius(5)
        .build()?;

    let json = serde_json::to_string(&config)?;
    let restored: CutoutConfig = serde_json::from_str(&json)?;
    assert_eq!(config, restored);

    Ok(())
}

#[tokio::test]
async fn test_decode_failure_before_segmentation() {
    let config = CutoutConfig::default();
    let segmenter = MockSegmenter::new();
    let history = segmenter.call_history_handle();

    let result = cutout_from_bytes(b"not an image", Box::new(segmenter), &config).await;
    assert!(matches!(result, Err(CutoutError::Decode(_))));

    // The collaborator is never consulted for undecodable input.
    assert!(history.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_dimension_mismatch_never_resizes() {
    let config = CutoutConfig::default();
    let result = cutout_from_image(
        two_tone_image(),
        Box::new(MockSegmenter::new_with_dimension_skew(2, 1)),
        &config,
    )
    .await;

    match result {
        Err(CutoutError::DimensionMismatch { expected, actual }) => {
            assert_eq!(expected, (4, 2));
            assert_eq!(actual, (6, 3));
        },
        other => panic!("expected DimensionMismatch, got {other:?}"),
    }
}

#[test]
fn test_synthesizer_dimension_check_is_independent() {
    // The synthesizer enforces the contract even outside the coordinator.
    let map = SegmentationMap::from_labels(&[true, false], (2, 1)).unwrap();
    let synthesizer = person_cutout::MaskSynthesizer::default();

    let result = synthesizer.synthesize(&map, 4, 4);
    assert!(matches!(
        result,
        Err(CutoutError::DimensionMismatch { .. })
    ));
}

#[tokio::test]
async fn test_model_load_failure_leaves_processor_usable() -> Result<()> {
    let mut processor = CutoutProcessor::new(
        Box::new(MockSegmenter::new_failing_load()),
        CutoutConfig::default(),
    )?;

    let error = processor.load_model().await.unwrap_err();
    assert!(matches!(error, CutoutError::ModelLoad(_)));
    assert!(error.is_retryable());

    // The processor stays idle and a later call reaches the collaborator
    // again; retry is a caller decision, nothing retries internally.
    assert!(!processor.session().is_busy());
    let error = processor.load_model().await.unwrap_err();
    assert!(matches!(error, CutoutError::ModelLoad(_)));

    Ok(())
}

#[tokio::test]
async fn test_failed_run_is_invisible_to_session() -> Result<()> {
    let mut processor = CutoutProcessor::new(
        Box::new(MockSegmenter::new_failing_after(1)),
        CutoutConfig::default(),
    )?;

    let first = processor.process(two_tone_image()).await?;
    let first_mask = first.mask.to_rgba8();

    let error = processor.process(two_tone_image()).await.unwrap_err();
    assert!(matches!(error, CutoutError::Segmentation(_)));

    // Previous outputs remain valid; no partial mutation is visible.
    let session = processor.session();
    assert!(!session.is_busy());
    let session_mask = session.mask().unwrap().to_rgba8();
    assert_eq!(session_mask, first_mask);

    Ok(())
}

#[tokio::test]
async fn test_single_pixel_image() -> Result<()> {
    let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        1,
        1,
        image::Rgba([255, 255, 255, 255]),
    ));
    let config = CutoutConfig::builder().smooth_edges(true).build()?;

    let result = cutout_from_image(source, Box::new(MockSegmenter::new()), &config).await?;
    assert_eq!(result.dimensions(), (1, 1));
    assert_eq!(result.image.to_rgba8().get_pixel(0, 0).0[3], 255);

    Ok(())
}

#[test]
fn test_segmentation_map_rejects_inconsistent_data() {
    let result = SegmentationMap::new(vec![0; 5], (2, 2));
    assert!(result.is_err());

    let result = SegmentationMap::from_labels(&[true; 3], (2, 2));
    assert!(result.is_err());
}
