use std::fmt;
use std::str::FromStr;

use imageproc::point::Point;
use serde::Serialize;

use crate::error::ImagingError;

/// Bounding box in the original image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Dimensions of the frame a contour was traced in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }
}

/// Outcome of liver-region detection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    pub detected: bool,
    pub confidence: f64,
    pub bounding_box: Option<BoundingBox>,
}

impl DetectionResult {
    pub fn not_detected() -> Self {
        Self {
            detected: false,
            confidence: 0.0,
            bounding_box: None,
        }
    }

    pub fn detected(confidence: f64, bounding_box: BoundingBox) -> Self {
        Self {
            detected: true,
            confidence,
            bounding_box: Some(bounding_box),
        }
    }
}

/// Simulated contrast phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Contrast enhancement
    Arterial,
    /// Gaussian smoothing
    Venous,
}

impl FromStr for Phase {
    type Err = ImagingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "arterial" => Ok(Phase::Arterial),
            "venous" => Ok(Phase::Venous),
            _ => Err(ImagingError::UnsupportedPhase(normalized)),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Arterial => write!(f, "arterial"),
            Phase::Venous => write!(f, "venous"),
        }
    }
}

/// Geometric moments of a closed polygon (Green's theorem over its edges)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.m00 == 0.0 {
            return None;
        }
        Some((self.m10 / self.m00, self.m01 / self.m00))
    }
}

/// Closed outer boundary of one connected foreground region
#[derive(Debug, Clone)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    /// Polygon area enclosed by the boundary points (not the pixel count)
    pub fn area(&self) -> f64 {
        self.moments().m00
    }

    pub fn moments(&self) -> Moments {
        let n = self.points.len();
        if n < 3 {
            return Moments { m00: 0.0, m10: 0.0, m01: 0.0 };
        }

        let (mut a00, mut a10, mut a01) = (0.0f64, 0.0f64, 0.0f64);
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            let (xi, yi) = (p.x as f64, p.y as f64);
            let (xj, yj) = (q.x as f64, q.y as f64);
            let cross = xi * yj - xj * yi;
            a00 += cross;
            a10 += cross * (xi + xj);
            a01 += cross * (yi + yj);
        }

        // Orientation-independent: a clockwise trace yields negative sums
        let sign = if a00 < 0.0 { -1.0 } else { 1.0 };
        Moments {
            m00: sign * a00 / 2.0,
            m10: sign * a10 / 6.0,
            m01: sign * a01 / 6.0,
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let Some(first) = self.points.first() else {
            return BoundingBox { x: 0, y: 0, width: 0, height: 0 };
        };

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        BoundingBox {
            x: min_x.max(0) as u32,
            y: min_y.max(0) as u32,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        }
    }

    /// Bounding box width over height, 0 for an empty box
    pub fn aspect_ratio(&self) -> f64 {
        let bbox = self.bounding_box();
        if bbox.height == 0 {
            return 0.0;
        }
        bbox.width as f64 / bbox.height as f64
    }
}
