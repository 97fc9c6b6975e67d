pub mod candidates;
pub mod contours;
pub mod preprocessing;
pub mod scoring;
pub mod steps;

use image::{DynamicImage, GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use tracing::info;

use crate::codec::DecodedImage;
use crate::config::DetectionConfig;
use crate::error::Result;
use crate::models::{Contour, DetectionResult, Frame};
use crate::pipeline::{PipelineContext, PipelineStep, run_step};
use steps::{CandidateFilter, ConfidenceScorer, ContourExtractor, MorphologicalCloser, Segmenter};

/// Liver-region detection: threshold, close, trace, filter, score
pub struct DetectionPipeline {
    segmenter: Segmenter,
    closer: MorphologicalCloser,
    extractor: ContourExtractor,
    filter: CandidateFilter,
    scorer: ConfidenceScorer,
}

impl DetectionPipeline {
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            segmenter: Segmenter,
            closer: MorphologicalCloser {
                kernel_size: config.closing_kernel_size,
                iterations: config.closing_iterations,
            },
            extractor: ContourExtractor,
            scorer: ConfidenceScorer {
                target_area_ratio: config.target_area_ratio,
            },
            filter: CandidateFilter { config },
        }
    }

    /// Run the full detection pipeline on a decoded image
    pub fn detect(
        &self,
        image: &DecodedImage,
        context: &PipelineContext,
    ) -> Result<DetectionResult> {
        let (width, height) = image.dimensions();
        let frame = Frame::new(width, height);
        let debug = context.debug_enabled();

        if debug {
            context.save_debug(0, "input", &DynamicImage::ImageRgb8(image.color.clone()))?;
            context.save_debug(1, "grayscale", &DynamicImage::ImageLuma8(image.gray.clone()))?;
        }

        let mask = run_step(&self.segmenter, image.gray.clone(), context)?;
        if debug {
            let mask_image = DynamicImage::ImageLuma8(mask.as_image().clone());
            context.save_debug(2, self.segmenter.name(), &mask_image)?;
        }

        let closed = run_step(&self.closer, mask, context)?;
        if debug {
            let closed_image = DynamicImage::ImageLuma8(closed.as_image().clone());
            context.save_debug(3, self.closer.name(), &closed_image)?;
        }

        let found = run_step(&self.extractor, closed, context)?;
        let traced = if debug { found.clone() } else { Vec::new() };

        let survivors = run_step(&self.filter, (found, frame), context)?;
        if debug {
            let overlay = draw_candidates(&image.color, &traced, &survivors);
            context.save_debug(4, self.filter.name(), &DynamicImage::ImageRgb8(overlay))?;
        }

        let result = run_step(&self.scorer, (survivors, frame), context)?;
        info!(
            detected = result.detected,
            confidence = result.confidence,
            "Detection finished ({}x{})",
            width,
            height
        );
        Ok(result)
    }

    /// Get the surviving candidates of a grayscale frame (for debugging)
    pub fn get_candidates(&self, gray: &GrayImage) -> Result<Vec<Contour>> {
        let context = PipelineContext::new();
        let (width, height) = gray.dimensions();
        let mask = run_step(&self.segmenter, gray.clone(), &context)?;
        let closed = run_step(&self.closer, mask, &context)?;
        let found = run_step(&self.extractor, closed, &context)?;
        run_step(&self.filter, (found, Frame::new(width, height)), &context)
    }
}

impl Default for DetectionPipeline {
    fn default() -> Self {
        Self::new(DetectionConfig::default())
    }
}

/// Rejected contours in red, survivors in green
fn draw_candidates(color: &RgbImage, traced: &[Contour], survivors: &[Contour]) -> RgbImage {
    let mut canvas = color.clone();
    let boxes = traced
        .iter()
        .map(|c| (c, Rgb([255u8, 0, 0])))
        .chain(survivors.iter().map(|c| (c, Rgb([0u8, 255, 0]))));

    for (contour, pen) in boxes {
        let bbox = contour.bounding_box();
        if bbox.width == 0 || bbox.height == 0 {
            continue;
        }
        let rect = Rect::at(bbox.x as i32, bbox.y as i32).of_size(bbox.width, bbox.height);
        draw_hollow_rect_mut(&mut canvas, rect, pen);
    }
    canvas
}
