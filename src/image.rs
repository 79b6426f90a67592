//! Grayscale intensity images and resampling.
//!
//! [`GrayscaleImage`] is the only pixel container the engine works with:
//! a row-major `f32` intensity field normalized to `0..=1`. Color decode
//! happens upstream; every image metric in this crate operates on
//! grayscale intensity only.

use crate::{Error, Result};

/// A 2-D grayscale intensity field, row-major, samples in `0..=1`.
///
/// Immutable once constructed. Produced by decode or [`resize`](Self::resize),
/// consumed by alignment and difference metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayscaleImage {
    width: u32,
    height: u32,
    samples: Vec<f32>,
}

impl GrayscaleImage {
    /// Create an image from row-major samples.
    ///
    /// # Errors
    /// Returns [`Error::Decode`] if `samples.len() != width * height`.
    pub fn new(width: u32, height: u32, samples: Vec<f32>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(Error::Decode {
                reason: format!(
                    "expected {expected} samples for {width}x{height}, got {}",
                    samples.len()
                ),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Create an image from 8-bit luma bytes, normalizing to `0..=1`.
    pub fn from_luma8(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        let samples = bytes.iter().map(|&b| f32::from(b) / 255.0).collect();
        Self::new(width, height, samples)
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major intensity samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Intensity at `(x, y)`. Panics if out of bounds (internal use keeps
    /// indices in range; public callers should prefer iteration over
    /// [`samples`](Self::samples)).
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.samples[y as usize * self.width as usize + x as usize]
    }

    /// Resize to `new_width x new_height` with bilinear interpolation.
    ///
    /// # Errors
    /// Returns [`Error::InvalidSize`] if either the source or target has a
    /// zero dimension.
    pub fn resize(&self, new_width: u32, new_height: u32) -> Result<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidSize {
                name: "source",
                value: (self.width as usize).min(self.height as usize),
                reason: "source image has a zero dimension",
            });
        }
        if new_width == 0 || new_height == 0 {
            return Err(Error::InvalidSize {
                name: "target",
                value: (new_width as usize).min(new_height as usize),
                reason: "target size must be > 0",
            });
        }

        let (w, h) = (self.width as usize, self.height as usize);
        let (nw, nh) = (new_width as usize, new_height as usize);
        let x_ratio = if nw > 1 {
            (w - 1) as f32 / (nw - 1) as f32
        } else {
            0.0
        };
        let y_ratio = if nh > 1 {
            (h - 1) as f32 / (nh - 1) as f32
        } else {
            0.0
        };

        let mut out = vec![0.0f32; nw * nh];
        for ty in 0..nh {
            let sy = ty as f32 * y_ratio;
            let y0 = sy.floor() as usize;
            let y1 = (y0 + 1).min(h - 1);
            let fy = sy - y0 as f32;
            for tx in 0..nw {
                let sx = tx as f32 * x_ratio;
                let x0 = sx.floor() as usize;
                let x1 = (x0 + 1).min(w - 1);
                let fx = sx - x0 as f32;

                let top = self.samples[y0 * w + x0] * (1.0 - fx) + self.samples[y0 * w + x1] * fx;
                let bot = self.samples[y1 * w + x0] * (1.0 - fx) + self.samples[y1 * w + x1] * fx;
                out[ty * nw + tx] = top * (1.0 - fy) + bot * fy;
            }
        }

        Ok(Self {
            width: new_width,
            height: new_height,
            samples: out,
        })
    }

    /// Extract a sub-image. The rectangle must lie fully inside the image.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Self> {
        if x + width > self.width || y + height > self.height {
            return Err(Error::InvalidSize {
                name: "crop",
                value: (x + width).max(y + height) as usize,
                reason: "rectangle exceeds image bounds",
            });
        }
        let w = self.width as usize;
        let mut out = Vec::with_capacity(width as usize * height as usize);
        for row in y..y + height {
            let start = row as usize * w + x as usize;
            out.extend_from_slice(&self.samples[start..start + width as usize]);
        }
        Self::new(width, height, out)
    }
}

/// Aligned overlap of `baseline` and `candidate` under an integer offset.
///
/// The offset convention matches [`crate::align`]: `(dx, dy)` means content
/// in the candidate sits at `baseline position + (dx, dy)`, so baseline
/// pixel `(x, y)` corresponds to candidate pixel `(x + dx, y + dy)`.
/// Returns equally sized crops of the overlapping region, or `None` if the
/// offset leaves no overlap.
pub fn aligned_overlap(
    baseline: &GrayscaleImage,
    candidate: &GrayscaleImage,
    dx: i32,
    dy: i32,
) -> Option<(GrayscaleImage, GrayscaleImage)> {
    let bx0 = (-dx).max(0) as i64;
    let by0 = (-dy).max(0) as i64;
    let bx1 = (i64::from(baseline.width)).min(i64::from(candidate.width) - i64::from(dx));
    let by1 = (i64::from(baseline.height)).min(i64::from(candidate.height) - i64::from(dy));
    if bx1 <= bx0 || by1 <= by0 {
        return None;
    }
    let (w, h) = ((bx1 - bx0) as u32, (by1 - by0) as u32);
    let base = baseline.crop(bx0 as u32, by0 as u32, w, h).ok()?;
    let cand = candidate
        .crop((bx0 + i64::from(dx)) as u32, (by0 + i64::from(dy)) as u32, w, h)
        .ok()?;
    Some((base, cand))
}
