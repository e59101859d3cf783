// Image preprocessing before OCR.
//
// Scanned and photographed resumes OCR far better as pure black-and-white.
// The first pass uses a global Otsu threshold, which works for evenly lit
// scans. The retry pass uses a Gaussian-weighted local threshold, which copes
// with shadows and uneven lighting in phone photos.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use image::{GrayImage, ImageFormat, Luma};
use imageproc::contrast::otsu_level;
use imageproc::filter::gaussian_blur_f32;

/// Decode an image file and convert it to 8-bit grayscale.
pub fn load_grayscale(path: &Path) -> Result<GrayImage> {
    let image = image::open(path)
        .with_context(|| format!("Failed to decode image {}", path.display()))?;
    Ok(image.to_luma8())
}

/// Binarize with a single global threshold chosen by Otsu's method.
///
/// Pixels brighter than the threshold become white, everything else black.
pub fn otsu_binarize(gray: &GrayImage) -> GrayImage {
    let level = otsu_level(gray);
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        to_binary(gray.get_pixel(x, y)[0] > level)
    })
}

/// Binarize against a Gaussian-weighted local mean.
///
/// `block_size` is the neighbourhood diameter in pixels (forced odd, at
/// least 3). A pixel becomes white when it is brighter than its local mean
/// minus `offset`.
pub fn adaptive_binarize(gray: &GrayImage, block_size: u32, offset: i16) -> GrayImage {
    let local_mean = gaussian_blur_f32(gray, block_sigma(block_size));
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let value = gray.get_pixel(x, y)[0] as i16;
        let mean = local_mean.get_pixel(x, y)[0] as i16;
        to_binary(value > mean - offset)
    })
}

/// Gaussian sigma for a block size, using the same rule OpenCV applies when
/// it derives sigma from a kernel size.
pub fn block_sigma(block_size: u32) -> f32 {
    let block = block_size.max(3) | 1;
    0.3 * ((block as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Encode a grayscale image as PNG bytes for engines that take encoded input.
pub fn encode_png(image: &GrayImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .context("Failed to encode preprocessed image as PNG")?;
    Ok(buf.into_inner())
}

fn to_binary(white: bool) -> Luma<u8> {
    if white {
        Luma([255])
    } else {
        Luma([0])
    }
}
