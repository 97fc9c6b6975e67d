use image::{GrayImage, imageops};
use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;

use crate::detection::preprocessing::BinaryMask;
use crate::models::Contour;

/// Trace the outer borders of top-level foreground regions.
///
/// Hole borders and regions nested inside holes are dropped. Regions touching
/// the frame edge are traced like any other region.
pub fn find_outer_contours(mask: &BinaryMask) -> Vec<Contour> {
    find_contours::<i32>(&pad_with_background(mask))
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| {
            let points = c.points.iter().map(|p| Point::new(p.x - 1, p.y - 1)).collect();
            Contour::new(points)
        })
        .collect()
}

/// Surround the mask with a 1 px background border.
///
/// The tracer only starts an outer border at a pixel whose left neighbor is
/// background, so a region in column 0 would otherwise come back as a hole.
fn pad_with_background(mask: &BinaryMask) -> GrayImage {
    let (width, height) = mask.dimensions();
    let mut padded = GrayImage::new(width + 2, height + 2);
    imageops::replace(&mut padded, mask.as_image(), 1, 1);
    padded
}
