use image::{GrayImage, Luma};
use imageproc::contrast::otsu_level;
use imageproc::map::map_colors;
use imageproc::morphology::{Mask, grayscale_dilate, grayscale_erode};

const FOREGROUND: u8 = 255;
const BACKGROUND: u8 = 0;

/// Two-valued raster: every pixel is either 0 (background) or 255 (foreground)
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMask {
    image: GrayImage,
}

impl BinaryMask {
    /// Mark pixels matching `is_foreground` as 255, everything else as 0
    pub fn from_predicate(gray: &GrayImage, is_foreground: impl Fn(u8) -> bool) -> Self {
        let image = map_colors(gray, |p: Luma<u8>| {
            Luma([if is_foreground(p[0]) { FOREGROUND } else { BACKGROUND }])
        });
        Self { image }
    }

    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::new(width, height),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    pub fn foreground_count(&self) -> usize {
        self.image.pixels().filter(|p| p[0] == FOREGROUND).count()
    }

    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.image.get_pixel(x, y)[0] == FOREGROUND
    }
}

/// First intensity of the upper Otsu class, or `None` for a single-intensity image
pub fn otsu_cutoff(gray: &GrayImage) -> Option<u8> {
    let mut pixels = gray.pixels();
    let first = pixels.next()?;
    if pixels.all(|p| p == first) {
        return None;
    }
    // otsu_level returns the last intensity of the lower class
    Some(otsu_level(gray).saturating_add(1))
}

/// Global Otsu binarization; pixels at or above the cutoff become foreground
pub fn threshold(gray: &GrayImage) -> (BinaryMask, Option<u8>) {
    match otsu_cutoff(gray) {
        Some(cutoff) => (BinaryMask::from_predicate(gray, |v| v >= cutoff), Some(cutoff)),
        None => {
            let (width, height) = gray.dimensions();
            (BinaryMask::empty(width, height), None)
        }
    }
}

/// Elliptical structuring element inscribed in a `size` x `size` box.
///
/// Row `dy` spans `round(sqrt(r^2 - dy^2))` pixels either side of the center,
/// the same rasterization OpenCV uses for `MORPH_ELLIPSE`.
pub fn elliptical_mask(size: u32) -> Mask {
    let size = size.clamp(1, 511);
    let r = (size / 2) as i32;

    let mut element = GrayImage::new(size, size);
    for row in 0..size {
        let dy = row as i32 - r;
        let dx = (((r * r - dy * dy).max(0)) as f64).sqrt().round() as i32;
        let start = (r - dx).max(0) as u32;
        let end = ((r + dx + 1) as u32).min(size);
        for col in start..end {
            element.put_pixel(col, row, Luma([FOREGROUND]));
        }
    }

    Mask::from_image(&element, r as u8, r as u8)
}

/// Morphological closing: `iterations` dilations followed by as many erosions
pub fn close(mask: &BinaryMask, kernel_size: u32, iterations: u32) -> BinaryMask {
    let element = elliptical_mask(kernel_size);

    let mut image = mask.image.clone();
    for _ in 0..iterations {
        image = grayscale_dilate(&image, &element);
    }
    for _ in 0..iterations {
        image = grayscale_erode(&image, &element);
    }

    BinaryMask { image }
}
