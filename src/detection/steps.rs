use image::GrayImage;
use tracing::debug;

use crate::config::DetectionConfig;
use crate::detection::{candidates, contours, preprocessing, scoring};
use crate::detection::preprocessing::BinaryMask;
use crate::error::Result;
use crate::models::{Contour, DetectionResult, Frame};
use crate::pipeline::{PipelineContext, PipelineStep};

/// Otsu global thresholding
pub struct Segmenter;

impl PipelineStep for Segmenter {
    type Input = GrayImage;
    type Output = BinaryMask;

    fn process(&self, gray: GrayImage, _context: &PipelineContext) -> Result<BinaryMask> {
        let (mask, cutoff) = preprocessing::threshold(&gray);
        match cutoff {
            Some(cutoff) => debug!(
                cutoff,
                foreground = mask.foreground_count(),
                "Otsu threshold computed"
            ),
            None => debug!("Single-intensity image, mask left empty"),
        }
        Ok(mask)
    }

    fn name(&self) -> &str {
        "Threshold"
    }
}

/// Fill holes and smooth borders with an elliptical closing
pub struct MorphologicalCloser {
    pub kernel_size: u32,
    pub iterations: u32,
}

impl PipelineStep for MorphologicalCloser {
    type Input = BinaryMask;
    type Output = BinaryMask;

    fn process(&self, mask: BinaryMask, _context: &PipelineContext) -> Result<BinaryMask> {
        Ok(preprocessing::close(&mask, self.kernel_size, self.iterations))
    }

    fn name(&self) -> &str {
        "Closing"
    }
}

/// Outer borders of top-level regions
pub struct ContourExtractor;

impl PipelineStep for ContourExtractor {
    type Input = BinaryMask;
    type Output = Vec<Contour>;

    fn process(&self, mask: BinaryMask, _context: &PipelineContext) -> Result<Vec<Contour>> {
        let found = contours::find_outer_contours(&mask);
        debug!("Found {} outer contours", found.len());
        Ok(found)
    }

    fn name(&self) -> &str {
        "Contour Extraction"
    }
}

/// Area, aspect, moment and centroid checks tuned to liver geometry
pub struct CandidateFilter {
    pub config: DetectionConfig,
}

impl PipelineStep for CandidateFilter {
    type Input = (Vec<Contour>, Frame);
    type Output = Vec<Contour>;

    fn process(
        &self,
        (found, frame): (Vec<Contour>, Frame),
        _context: &PipelineContext,
    ) -> Result<Vec<Contour>> {
        let total = found.len();
        let survivors = candidates::filter_candidates(&self.config, found, frame);
        debug!("{} candidates survived (from {} contours)", survivors.len(), total);
        Ok(survivors)
    }

    fn name(&self) -> &str {
        "Candidates"
    }
}

/// Largest survivor scored against the expected footprint
pub struct ConfidenceScorer {
    pub target_area_ratio: f64,
}

impl PipelineStep for ConfidenceScorer {
    type Input = (Vec<Contour>, Frame);
    type Output = DetectionResult;

    fn process(
        &self,
        (survivors, frame): (Vec<Contour>, Frame),
        _context: &PipelineContext,
    ) -> Result<DetectionResult> {
        Ok(scoring::score_candidates(&survivors, self.target_area_ratio, frame))
    }

    fn name(&self) -> &str {
        "Scoring"
    }
}
