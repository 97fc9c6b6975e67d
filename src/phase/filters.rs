use image::{Rgb, Rgb32FImage, RgbImage};
use imageproc::map::map_colors;

/// Stretch each channel around its whole-image mean: `mean + (v - mean) * factor`
pub fn enhance_contrast(img: &RgbImage, factor: f64) -> RgbImage {
    let means = channel_means(img);

    map_colors(img, |p: Rgb<u8>| {
        let mut out = [0u8; 3];
        for c in 0..3 {
            let v = means[c] + (p[c] as f64 - means[c]) * factor;
            out[c] = v.round().clamp(0.0, 255.0) as u8;
        }
        Rgb(out)
    })
}

fn channel_means(img: &RgbImage) -> [f64; 3] {
    let count = img.pixels().len().max(1) as f64;
    let mut sums = [0u64; 3];
    for p in img.pixels() {
        for c in 0..3 {
            sums[c] += p[c] as u64;
        }
    }
    sums.map(|s| s as f64 / count)
}

/// Standard deviation matched to a kernel of the given radius (OpenCV's ksize rule)
pub fn sigma_for_radius(radius: u32) -> f32 {
    0.3 * (radius as f32 - 1.0) + 0.8
}

/// Normalized 1-D Gaussian kernel with `2 * radius + 1` taps
pub fn gaussian_kernel(radius: u32) -> Vec<f32> {
    let sigma = sigma_for_radius(radius);
    let r = radius as i32;
    let weights: Vec<f32> = (-r..=r)
        .map(|i| (-((i * i) as f32) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Separable Gaussian blur per channel, edge pixels replicated.
///
/// Accumulates in f32 and rounds once at the end, so a flat image comes back unchanged.
pub fn gaussian_blur(img: &RgbImage, radius: u32) -> RgbImage {
    let (width, height) = img.dimensions();
    if radius == 0 || width == 0 || height == 0 {
        return img.clone();
    }

    let kernel = gaussian_kernel(radius);
    let r = radius as i64;

    let horizontal = Rgb32FImage::from_fn(width, height, |x, y| {
        let mut acc = [0f32; 3];
        for (k, weight) in kernel.iter().enumerate() {
            let sx = (x as i64 + k as i64 - r).clamp(0, width as i64 - 1) as u32;
            let p = img.get_pixel(sx, y);
            for c in 0..3 {
                acc[c] += weight * p[c] as f32;
            }
        }
        Rgb(acc)
    });

    RgbImage::from_fn(width, height, |x, y| {
        let mut acc = [0f32; 3];
        for (k, weight) in kernel.iter().enumerate() {
            let sy = (y as i64 + k as i64 - r).clamp(0, height as i64 - 1) as u32;
            let p = horizontal.get_pixel(x, sy);
            for c in 0..3 {
                acc[c] += weight * p[c];
            }
        }
        Rgb(acc.map(|v| v.round().clamp(0.0, 255.0) as u8))
    })
}
