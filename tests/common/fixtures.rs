use std::io::Cursor;
use std::ops::Range;

use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_filled_ellipse_mut;

/// Encodes an image in memory in the given format
pub fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format)
        .expect("Failed to encode test image");
    buffer.into_inner()
}

pub fn encode_png(img: &DynamicImage) -> Vec<u8> {
    encode(img, ImageFormat::Png)
}

/// A uniform grayscale frame
pub fn flat_gray(width: u32, height: u32, value: u8) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([value]))
}

/// Black frame with one solid white ellipse
pub fn ellipse_frame(size: u32, center: (i32, i32), radius_x: i32, radius_y: i32) -> GrayImage {
    let mut img = flat_gray(size, size, 0);
    draw_filled_ellipse_mut(&mut img, center, radius_x, radius_y, Luma([255u8]));
    img
}

/// Black frame with one solid white rectangle covering `xs` by `ys`
pub fn block_frame(width: u32, height: u32, xs: Range<u32>, ys: Range<u32>) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        Luma([if xs.contains(&x) && ys.contains(&y) { 255 } else { 0 }])
    })
}

/// RGB gradient: red rises along x, green along y
pub fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width) as u8;
        let g = (y * 255 / height) as u8;
        Rgb([r, g, 128])
    })
}

/// Bytes that no decoder accepts
pub fn garbage_bytes() -> Vec<u8> {
    b"definitely not an image, just some text pretending to be one".to_vec()
}
