//! Contrast-normalized grayscale PNG rendering for report artifacts.
//!
//! Every visualization (delta image, spectrogram) is independently
//! normalized over its own min/max before quantization, so artifacts are
//! comparable by eye regardless of the source value range.

use crate::image::GrayscaleImage;
use crate::spectrogram::Spectrogram;
use crate::Result;
use image::{GrayImage, ImageFormat};
use std::io::Cursor;

/// Quantize `values` to 8-bit with per-artifact contrast normalization:
/// `round(255 * (v - min) / max(max - min, 1))`.
fn normalize_to_bytes(values: &[f32]) -> Vec<u8> {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if values.is_empty() {
        return Vec::new();
    }
    let range = (max - min).max(1.0);
    values
        .iter()
        .map(|&v| (255.0 * (v - min) / range).round() as u8)
        .collect()
}

/// Encode a row-major `f32` matrix as an 8-bit single-channel PNG.
pub fn render_gray_png(values: &[f32], width: u32, height: u32) -> Result<Vec<u8>> {
    let bytes = normalize_to_bytes(values);
    let img = GrayImage::from_raw(width, height, bytes).ok_or(crate::Error::InvalidSize {
        name: "png",
        value: values.len(),
        reason: "values do not fill width x height",
    })?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Render the absolute per-pixel difference of two equally sized images.
pub fn delta_png(a: &GrayscaleImage, b: &GrayscaleImage) -> Result<Vec<u8>> {
    let delta: Vec<f32> = a
        .samples()
        .iter()
        .zip(b.samples())
        .map(|(&x, &y)| (x - y).abs())
        .collect();
    render_gray_png(&delta, a.width(), a.height())
}

/// Render a spectrogram as a PNG, frequency rows top to bottom.
pub fn spectrogram_png(spec: &Spectrogram) -> Result<Vec<u8>> {
    let (rows, cols) = (spec.rows(), spec.cols());
    let mut values = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            values.push(spec.data()[(r, c)]);
        }
    }
    render_gray_png(&values, cols as u32, rows as u32)
}

/// Render the absolute cell-wise difference of two spectrograms over
/// their common region.
pub fn spectrogram_delta_png(a: &Spectrogram, b: &Spectrogram) -> Result<Vec<u8>> {
    let rows = a.rows().min(b.rows());
    let cols = a.cols().min(b.cols());
    let mut values = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            values.push((a.data()[(r, c)] - b.data()[(r, c)]).abs());
        }
    }
    render_gray_png(&values, cols as u32, rows as u32)
}
