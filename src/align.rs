//! Coarse-to-fine translation alignment between two grayscale images.
//!
//! The aligner estimates the integer pixel offset `(dx, dy)` that best maps
//! candidate content onto the baseline, by brute-force search of a bounded
//! window at a small working resolution, refined in a narrower window at a
//! larger one. Search cost is fixed by the configured window sizes, so the
//! estimator is bounded on any input.

use crate::image::GrayscaleImage;
use serde::{Deserialize, Serialize};

/// Configuration for translation search.
///
/// # Example
/// ```
/// use driftprobe::align::AlignConfig;
///
/// let config = AlignConfig::new().with_coarse_search(8);
/// ```
#[derive(Debug, Clone)]
pub struct AlignConfig {
    /// Working resolution of the coarse search stage (square).
    pub coarse_size: u32,
    /// Working resolution of the refinement stage (square).
    pub refine_size: u32,
    /// Half-width of the coarse search window in pixels.
    pub coarse_search: i32,
    /// Half-width of the refinement window around the scaled coarse offset.
    pub refine_search: i32,
}

impl AlignConfig {
    /// Create a configuration with the default search policy.
    pub fn new() -> Self {
        Self {
            coarse_size: 128,
            refine_size: 256,
            coarse_search: 16,
            refine_search: 6,
        }
    }

    /// Set the coarse working resolution.
    pub fn with_coarse_size(mut self, size: u32) -> Self {
        self.coarse_size = size;
        self
    }

    /// Set the refinement working resolution.
    pub fn with_refine_size(mut self, size: u32) -> Self {
        self.refine_size = size;
        self
    }

    /// Set the coarse search half-width.
    pub fn with_coarse_search(mut self, radius: i32) -> Self {
        self.coarse_search = radius;
        self
    }

    /// Set the refinement search half-width.
    pub fn with_refine_search(mut self, radius: i32) -> Self {
        self.refine_search = radius;
        self
    }
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Estimated translation between a baseline and a candidate image.
///
/// `score` is the mean absolute difference over the overlapping region at
/// the optimal offset; lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    /// Horizontal offset in candidate-native pixels.
    pub dx: i32,
    /// Vertical offset in candidate-native pixels.
    pub dy: i32,
    /// Mean absolute difference at the optimal offset.
    pub score: f32,
}

impl Alignment {
    /// The zero offset with a zero score, used for degenerate inputs.
    pub fn identity() -> Self {
        Self {
            dx: 0,
            dy: 0,
            score: 0.0,
        }
    }
}

/// Mean absolute difference between `baseline` and `candidate` shifted by
/// `(dx, dy)`, averaged over the overlapping region only. `None` if the
/// offset leaves no overlap.
fn sad(baseline: &GrayscaleImage, candidate: &GrayscaleImage, dx: i32, dy: i32) -> Option<f32> {
    let bw = baseline.width() as i64;
    let bh = baseline.height() as i64;
    let cw = candidate.width() as i64;
    let ch = candidate.height() as i64;

    let x0 = i64::from(-dx).max(0);
    let y0 = i64::from(-dy).max(0);
    let x1 = bw.min(cw - i64::from(dx));
    let y1 = bh.min(ch - i64::from(dy));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    let bs = baseline.samples();
    let cs = candidate.samples();
    let mut acc = 0.0f64;
    for y in y0..y1 {
        let brow = y * bw;
        let crow = (y + i64::from(dy)) * cw + i64::from(dx);
        for x in x0..x1 {
            let d = bs[(brow + x) as usize] - cs[(crow + x) as usize];
            acc += f64::from(d.abs());
        }
    }
    let count = ((x1 - x0) * (y1 - y0)) as f64;
    Some((acc / count) as f32)
}

/// Search all offsets in the window `center ± radius`, keeping the minimum
/// SAD. The search is seeded at `center`, so ties never displace the seed;
/// remaining ties resolve to the first offset in row-major scan order.
fn search_window(
    baseline: &GrayscaleImage,
    candidate: &GrayscaleImage,
    center: (i32, i32),
    radius: i32,
) -> Alignment {
    let mut best = Alignment {
        dx: center.0,
        dy: center.1,
        score: sad(baseline, candidate, center.0, center.1).unwrap_or(f32::MAX),
    };
    for dy in (center.1 - radius)..=(center.1 + radius) {
        for dx in (center.0 - radius)..=(center.0 + radius) {
            if let Some(score) = sad(baseline, candidate, dx, dy) {
                if score < best.score {
                    best = Alignment { dx, dy, score };
                }
            }
        }
    }
    best
}

/// Estimate the integer translation mapping candidate content onto the
/// baseline, using the default search policy.
///
/// Two stages bound the cost: a coarse brute-force search over
/// `±coarse_search` at `coarse_size`, then refinement over `±refine_search`
/// around the scaled coarse offset at `refine_size`. The refined offset is
/// scaled back to the candidate's native resolution before reporting.
///
/// Degenerate images (zero dimension) yield [`Alignment::identity`].
pub fn align(baseline: &GrayscaleImage, candidate: &GrayscaleImage) -> Alignment {
    align_with(baseline, candidate, &AlignConfig::default())
}

/// [`align`] with an explicit configuration.
pub fn align_with(
    baseline: &GrayscaleImage,
    candidate: &GrayscaleImage,
    config: &AlignConfig,
) -> Alignment {
    let coarse = config.coarse_size;
    let refine = config.refine_size;
    let (Ok(base_c), Ok(cand_c)) = (
        baseline.resize(coarse, coarse),
        candidate.resize(coarse, coarse),
    ) else {
        return Alignment::identity();
    };

    let coarse_best = search_window(&base_c, &cand_c, (0, 0), config.coarse_search);

    let (Ok(base_r), Ok(cand_r)) = (
        baseline.resize(refine, refine),
        candidate.resize(refine, refine),
    ) else {
        return Alignment::identity();
    };

    let scale = refine as f32 / coarse as f32;
    let seed = (
        (coarse_best.dx as f32 * scale).round() as i32,
        (coarse_best.dy as f32 * scale).round() as i32,
    );
    let refined = search_window(&base_r, &cand_r, seed, config.refine_search);

    // Report in candidate-native pixels.
    let sx = candidate.width() as f32 / refine as f32;
    let sy = candidate.height() as f32 / refine as f32;
    Alignment {
        dx: (refined.dx as f32 * sx).round() as i32,
        dy: (refined.dy as f32 * sy).round() as i32,
        score: refined.score,
    }
}
