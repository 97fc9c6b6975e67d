use std::fmt;

use crate::config::DetectionConfig;
use crate::models::{Contour, Frame};

/// The first test a rejected contour failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Area,
    Aspect,
    DegenerateMoments,
    Centroid,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::Area => "area below noise floor",
            Rejection::Aspect => "aspect ratio out of range",
            Rejection::DegenerateMoments => "zero-area moments",
            Rejection::Centroid => "centroid outside expected position",
        };
        f.write_str(reason)
    }
}

type Check = fn(&DetectionConfig, &Contour, Frame) -> bool;

/// Applied in order; the first failing check rejects the contour
const CHECKS: [(Rejection, Check); 4] = [
    (Rejection::Area, passes_area),
    (Rejection::Aspect, passes_aspect),
    (Rejection::DegenerateMoments, has_nonzero_moment),
    (Rejection::Centroid, centroid_in_bounds),
];

fn passes_area(config: &DetectionConfig, contour: &Contour, frame: Frame) -> bool {
    contour.area() >= config.min_area_ratio * frame.area()
}

fn passes_aspect(config: &DetectionConfig, contour: &Contour, _frame: Frame) -> bool {
    let aspect = contour.aspect_ratio();
    aspect >= config.aspect_min && aspect <= config.aspect_max
}

fn has_nonzero_moment(_config: &DetectionConfig, contour: &Contour, _frame: Frame) -> bool {
    contour.moments().m00 != 0.0
}

fn centroid_in_bounds(config: &DetectionConfig, contour: &Contour, frame: Frame) -> bool {
    let Some((cx, cy)) = contour.moments().centroid() else {
        return false;
    };
    let (w, h) = (frame.width as f64, frame.height as f64);
    cx >= config.centroid_x_min_ratio * w
        && cx <= config.centroid_x_max_ratio * w
        && cy >= config.centroid_y_min_ratio * h
        && cy <= config.centroid_y_max_ratio * h
}

/// Run the check chain, returning the first failed test
pub fn check_candidate(
    config: &DetectionConfig,
    contour: &Contour,
    frame: Frame,
) -> Option<Rejection> {
    CHECKS
        .iter()
        .find(|(_, check)| !check(config, contour, frame))
        .map(|(rejection, _)| *rejection)
}

/// Keep the contours that pass every check, preserving input order
pub fn filter_candidates(
    config: &DetectionConfig,
    contours: Vec<Contour>,
    frame: Frame,
) -> Vec<Contour> {
    contours
        .into_iter()
        .filter(|c| match check_candidate(config, c, frame) {
            Some(rejection) => {
                tracing::trace!(area = c.area(), %rejection, "Rejected candidate");
                false
            }
            None => true,
        })
        .collect()
}
