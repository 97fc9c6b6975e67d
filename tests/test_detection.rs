mod common;

use common::*;
use image::{DynamicImage, Luma};
use imageproc::drawing::draw_filled_ellipse_mut;
use phasescan::DetectionPipeline;
use phasescan::detection::preprocessing;

#[test]
fn test_ellipse_at_target_footprint() {
    // Target footprint: 0.25 * 512 * 512 = 65,536 px with a 1.5 aspect. The radii are
    // rounded up slightly because the traced polygon runs through boundary pixel centers.
    let center = ((0.6 * 512.0) as i32, 256);
    let frame = ellipse_frame(512, center, 180, 120);
    let bytes = encode_png(&DynamicImage::ImageLuma8(frame));

    let result = ImagingService::default().analyze_image(&bytes);

    assert!(result.detected);
    assert_eq!(result.confidence, 1.0);

    let bbox = result.bounding_box.unwrap();
    let expected = BoundingBox { x: 127, y: 136, width: 361, height: 241 };
    assert!(bbox.x.abs_diff(expected.x) <= 2, "{:?}", bbox);
    assert!(bbox.y.abs_diff(expected.y) <= 2, "{:?}", bbox);
    assert!(bbox.width.abs_diff(expected.width) <= 3, "{:?}", bbox);
    assert!(bbox.height.abs_diff(expected.height) <= 3, "{:?}", bbox);
}

#[test]
fn test_smaller_organ_scores_partial_confidence() {
    // About 30,000 px against a 65,536 px target
    let frame = ellipse_frame(512, (256, 256), 120, 80);
    let bytes = encode_png(&DynamicImage::ImageLuma8(frame));

    let result = ImagingService::default().analyze_image(&bytes);

    assert!(result.detected);
    assert!(result.confidence > 0.4 && result.confidence < 0.5, "{}", result.confidence);
    // Rounded to two decimals
    assert_eq!((result.confidence * 100.0).round() / 100.0, result.confidence);
}

#[test]
fn test_flat_gray_frame_detects_nothing() {
    let bytes = encode_png(&DynamicImage::ImageLuma8(flat_gray(256, 256, 128)));
    let result = ImagingService::default().analyze_image(&bytes);
    assert_eq!(result, DetectionResult::not_detected());
}

#[test]
fn test_garbage_bytes_detect_nothing() {
    let result = ImagingService::default().analyze_image(&garbage_bytes());
    assert_eq!(result, DetectionResult::not_detected());
}

#[test]
fn test_noise_blobs_are_filtered_out() {
    // Two small blobs, each well under 2% of the frame
    let mut frame = flat_gray(300, 300, 0);
    draw_filled_ellipse_mut(&mut frame, (100, 150), 15, 15, Luma([255u8]));
    draw_filled_ellipse_mut(&mut frame, (200, 150), 12, 18, Luma([255u8]));
    let bytes = encode_png(&DynamicImage::ImageLuma8(frame));

    let result = ImagingService::default().analyze_image(&bytes);
    assert_eq!(result, DetectionResult::not_detected());
}

#[test]
fn test_thin_band_fails_aspect_check() {
    // 280 x 60 bar, aspect well above 2.5
    let mut frame = flat_gray(300, 300, 0);
    for y in 120..180 {
        for x in 10..290 {
            frame.put_pixel(x, y, Luma([255]));
        }
    }
    let candidates = DetectionPipeline::default().get_candidates(&frame).unwrap();
    assert!(candidates.is_empty());
}

#[test]
fn test_largest_candidate_wins() {
    // Far enough apart that closing cannot bridge them
    let mut frame = flat_gray(500, 400, 0);
    draw_filled_ellipse_mut(&mut frame, (120, 200), 50, 45, Luma([255u8]));
    draw_filled_ellipse_mut(&mut frame, (330, 200), 70, 60, Luma([255u8]));

    let candidates = DetectionPipeline::default().get_candidates(&frame).unwrap();
    assert_eq!(candidates.len(), 2);

    let bytes = encode_png(&DynamicImage::ImageLuma8(frame));
    let result = ImagingService::default().analyze_image(&bytes);
    let bbox = result.bounding_box.unwrap();
    assert!(bbox.x.abs_diff(260) <= 2, "{:?}", bbox);
    assert!(bbox.width.abs_diff(141) <= 3, "{:?}", bbox);
}

/// Analyze a 200 x 200 frame holding a single 90 x 120 (or 120 x 90) block
fn analyze_block(xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) -> DetectionResult {
    let frame = block_frame(200, 200, xs, ys);
    ImagingService::default().analyze_image(&encode_png(&DynamicImage::ImageLuma8(frame)))
}

fn assert_box_near(bbox: BoundingBox, expected: BoundingBox) {
    assert!(bbox.x.abs_diff(expected.x) <= 1, "{:?}", bbox);
    assert!(bbox.y.abs_diff(expected.y) <= 1, "{:?}", bbox);
    assert!(bbox.width.abs_diff(expected.width) <= 2, "{:?}", bbox);
    assert!(bbox.height.abs_diff(expected.height) <= 2, "{:?}", bbox);
}

#[test]
fn test_region_touching_left_edge_is_detected() {
    let result = analyze_block(0..90, 40..160);
    assert!(result.detected, "{:?}", result);
    assert_eq!(result.confidence, 1.0);

    let bbox = result.bounding_box.unwrap();
    assert_eq!(bbox.x, 0);
    assert_box_near(bbox, BoundingBox { x: 0, y: 40, width: 90, height: 120 });
}

#[test]
fn test_region_touching_right_edge_is_detected() {
    let result = analyze_block(110..200, 40..160);
    assert!(result.detected, "{:?}", result);
    assert_eq!(result.confidence, 1.0);
    assert_box_near(
        result.bounding_box.unwrap(),
        BoundingBox { x: 110, y: 40, width: 90, height: 120 },
    );
}

#[test]
fn test_region_touching_top_edge_is_detected() {
    let result = analyze_block(40..160, 0..90);
    assert!(result.detected, "{:?}", result);
    assert_eq!(result.confidence, 1.0);
    assert_box_near(
        result.bounding_box.unwrap(),
        BoundingBox { x: 40, y: 0, width: 120, height: 90 },
    );
}

#[test]
fn test_region_touching_bottom_edge_is_detected() {
    let result = analyze_block(40..160, 110..200);
    assert!(result.detected, "{:?}", result);
    assert_eq!(result.confidence, 1.0);
    assert_box_near(
        result.bounding_box.unwrap(),
        BoundingBox { x: 40, y: 110, width: 120, height: 90 },
    );
}

#[test]
fn test_left_half_white_frame_is_detected() {
    let result = analyze_block(0..100, 0..200);
    assert!(result.detected, "{:?}", result);
    assert_eq!(result.confidence, 1.0);
    assert_box_near(
        result.bounding_box.unwrap(),
        BoundingBox { x: 0, y: 0, width: 100, height: 200 },
    );
}

#[test]
fn test_mask_is_two_valued_for_any_input() {
    let inputs = vec![
        flat_gray(40, 30, 0),
        flat_gray(40, 30, 255),
        DynamicImage::ImageRgb8(gradient_rgb(40, 30)).to_luma8(),
        ellipse_frame(64, (32, 32), 20, 10),
    ];

    for gray in inputs {
        let (mask, _) = preprocessing::threshold(&gray);
        let closed = preprocessing::close(&mask, 15, 2);
        assert_eq!(closed.dimensions(), gray.dimensions());
        assert!(closed.as_image().pixels().all(|p| p[0] == 0 || p[0] == 255));
    }
}

#[test]
fn test_detection_thresholds_are_configurable() {
    let frame = ellipse_frame(512, (256, 256), 120, 80);
    let bytes = encode_png(&DynamicImage::ImageLuma8(frame));

    let strict = ImagingService::new(Settings {
        detection: DetectionConfig {
            min_area_ratio: 0.2,
            ..DetectionConfig::default()
        },
        ..Settings::default()
    });
    assert!(!strict.analyze_image(&bytes).detected);
}

#[test]
fn test_debug_output_writes_every_stage() {
    let dir = tempfile::TempDir::new().unwrap();
    let debug_dir = dir.path().join("debug");
    let context = PipelineContext::new().with_debug(debug_dir.clone()).unwrap();

    let bytes = encode_png(&DynamicImage::ImageLuma8(ellipse_frame(200, (100, 100), 40, 30)));
    let result = ImagingService::default()
        .analyze_image_with(&bytes, &context)
        .unwrap();
    assert!(result.detected);

    for name in [
        "00_input.png",
        "01_grayscale.png",
        "02_threshold.png",
        "03_closing.png",
        "04_candidates.png",
    ] {
        assert!(debug_dir.join(name).exists(), "missing {}", name);
    }

    // A second run must not mix its output into a populated directory
    assert!(PipelineContext::new().with_debug(debug_dir).is_err());
}

#[test]
fn test_result_serializes_with_expected_keys() {
    let detected = DetectionResult::detected(0.87, BoundingBox { x: 1, y: 2, width: 3, height: 4 });
    assert_eq!(
        serde_json::to_string(&detected).unwrap(),
        r#"{"detected":true,"confidence":0.87,"bounding_box":{"x":1,"y":2,"width":3,"height":4}}"#
    );
    assert_eq!(
        serde_json::to_string(&DetectionResult::not_detected()).unwrap(),
        r#"{"detected":false,"confidence":0.0,"bounding_box":null}"#
    );
}
