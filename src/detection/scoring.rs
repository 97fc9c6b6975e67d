use crate::models::{Contour, DetectionResult, Frame};

/// Pick the largest survivor; on equal areas the first one encountered wins
pub fn largest_candidate(survivors: &[Contour]) -> Option<(&Contour, f64)> {
    survivors.iter().fold(None, |best, contour| {
        let area = contour.area();
        match best {
            Some((_, best_area)) if best_area >= area => best,
            _ => Some((contour, area)),
        }
    })
}

pub fn round_confidence(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Score the winning candidate against the expected organ footprint
pub fn score_candidates(
    survivors: &[Contour],
    target_area_ratio: f64,
    frame: Frame,
) -> DetectionResult {
    let target_area = target_area_ratio * frame.area();
    let Some((winner, area)) = largest_candidate(survivors) else {
        return DetectionResult::not_detected();
    };
    if target_area <= 0.0 {
        return DetectionResult::not_detected();
    }

    let confidence = round_confidence((area / target_area).min(1.0));
    DetectionResult::detected(confidence, winner.bounding_box())
}
