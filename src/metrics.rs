//! Pixel-level difference metrics: mean absolute difference, gradient
//! saliency, and saliency-weighted SSIM.
//!
//! All metrics defend numeric edge cases by flooring denominators at
//! [`EPSILON`] and returning neutral values for empty input, so a report
//! can always be produced.

use crate::image::{aligned_overlap, GrayscaleImage};

/// Floor applied to denominators and log arguments throughout the crate.
pub const EPSILON: f64 = 1e-6;

/// Working resolution for offset-compensated pixel metrics.
const WORK_SIZE: u32 = 256;

/// Mean absolute pixel difference between two images, compensating for a
/// known translation.
///
/// Both images are downsampled to a fixed working resolution, the candidate
/// is shifted by the offset rescaled from candidate-native pixels, and
/// `|a - b|` is averaged over the overlapping region. Returns `1.0`
/// (maximally different) when no comparison is possible.
pub fn mean_absolute_difference(
    baseline: &GrayscaleImage,
    candidate: &GrayscaleImage,
    dx: i32,
    dy: i32,
) -> f64 {
    let (Ok(base), Ok(cand)) = (
        baseline.resize(WORK_SIZE, WORK_SIZE),
        candidate.resize(WORK_SIZE, WORK_SIZE),
    ) else {
        return 1.0;
    };
    let sx = WORK_SIZE as f32 / candidate.width().max(1) as f32;
    let sy = WORK_SIZE as f32 / candidate.height().max(1) as f32;
    let wdx = (dx as f32 * sx).round() as i32;
    let wdy = (dy as f32 * sy).round() as i32;

    let Some((a, b)) = aligned_overlap(&base, &cand, wdx, wdy) else {
        return 1.0;
    };
    let n = a.samples().len();
    if n == 0 {
        return 1.0;
    }
    let acc: f64 = a
        .samples()
        .iter()
        .zip(b.samples())
        .map(|(&x, &y)| f64::from((x - y).abs()))
        .sum();
    acc / n as f64
}

/// Per-pixel saliency from 3x3 Sobel gradient magnitude.
///
/// Border pixels are zero; interior magnitudes are normalized by the
/// maximum magnitude (floored at [`EPSILON`]), so the map lies in `0..=1`.
pub fn saliency_map(gray: &[f32], width: usize, height: usize) -> Vec<f32> {
    let mut map = vec![0.0f32; width * height];
    if width < 3 || height < 3 || gray.len() < width * height {
        return map;
    }

    let mut max_mag = 0.0f32;
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let p = |dx: isize, dy: isize| -> f32 {
                gray[(y as isize + dy) as usize * width + (x as isize + dx) as usize]
            };
            let gx = -p(-1, -1) - 2.0 * p(-1, 0) - p(-1, 1) + p(1, -1) + 2.0 * p(1, 0) + p(1, 1);
            let gy = -p(-1, -1) - 2.0 * p(0, -1) - p(1, -1) + p(-1, 1) + 2.0 * p(0, 1) + p(1, 1);
            let mag = (gx * gx + gy * gy).sqrt();
            map[y * width + x] = mag;
            if mag > max_mag {
                max_mag = mag;
            }
        }
    }

    let norm = max_mag.max(EPSILON as f32);
    for v in &mut map {
        *v /= norm;
    }
    map
}

/// Weighted structural similarity over two whole flattened arrays.
///
/// This is a global (non sliding-window) SSIM: weighted means, variances
/// and covariance are accumulated over all samples and combined with the
/// standard SSIM formula, `C1 = (0.01 L)^2`, `C2 = (0.03 L)^2`, `L = 1`
/// (inputs assumed normalized to `0..=1`). A non-positive total weight
/// means there is nothing meaningful to compare and yields `1.0`. The
/// result is clamped to `[0, 1]`.
pub fn weighted_ssim(a: &[f32], b: &[f32], weight: &[f32]) -> f64 {
    let n = a.len().min(b.len()).min(weight.len());
    let mut wsum = 0.0f64;
    for &w in &weight[..n] {
        wsum += f64::from(w);
    }
    if wsum <= 0.0 {
        return 1.0;
    }

    let mut mean_a = 0.0f64;
    let mut mean_b = 0.0f64;
    for i in 0..n {
        let w = f64::from(weight[i]);
        mean_a += w * f64::from(a[i]);
        mean_b += w * f64::from(b[i]);
    }
    mean_a /= wsum;
    mean_b /= wsum;

    let mut var_a = 0.0f64;
    let mut var_b = 0.0f64;
    let mut cov = 0.0f64;
    for i in 0..n {
        let w = f64::from(weight[i]);
        let da = f64::from(a[i]) - mean_a;
        let db = f64::from(b[i]) - mean_b;
        var_a += w * da * da;
        var_b += w * db * db;
        cov += w * da * db;
    }
    var_a /= wsum;
    var_b /= wsum;
    cov /= wsum;

    const C1: f64 = 0.01 * 0.01;
    const C2: f64 = 0.03 * 0.03;
    let ssim = ((2.0 * mean_a * mean_b + C1) * (2.0 * cov + C2))
        / ((mean_a * mean_a + mean_b * mean_b + C1) * (var_a + var_b + C2));
    ssim.clamp(0.0, 1.0)
}

/// Pairwise average of the saliency maps of two equally sized images,
/// for use as the [`weighted_ssim`] weight. Biases the similarity score
/// toward high-gradient regions in either image.
pub fn saliency_weights(a: &GrayscaleImage, b: &GrayscaleImage) -> Vec<f32> {
    let wa = saliency_map(a.samples(), a.width() as usize, a.height() as usize);
    let wb = saliency_map(b.samples(), b.width() as usize, b.height() as usize);
    wa.iter()
        .zip(&wb)
        .map(|(&x, &y)| 0.5 * (x + y))
        .collect()
}

/// Saliency-weighted SSIM between two images after translation
/// compensation, at the working resolution. `1.0` when no overlap or no
/// salient structure exists.
pub fn saliency_weighted_ssim(
    baseline: &GrayscaleImage,
    candidate: &GrayscaleImage,
    dx: i32,
    dy: i32,
) -> f64 {
    let (Ok(base), Ok(cand)) = (
        baseline.resize(WORK_SIZE, WORK_SIZE),
        candidate.resize(WORK_SIZE, WORK_SIZE),
    ) else {
        return 1.0;
    };
    let sx = WORK_SIZE as f32 / candidate.width().max(1) as f32;
    let sy = WORK_SIZE as f32 / candidate.height().max(1) as f32;
    let wdx = (dx as f32 * sx).round() as i32;
    let wdy = (dy as f32 * sy).round() as i32;

    let Some((a, b)) = aligned_overlap(&base, &cand, wdx, wdy) else {
        return 1.0;
    };
    let weights = saliency_weights(&a, &b);
    weighted_ssim(a.samples(), b.samples(), &weights)
}
