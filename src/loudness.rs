//! RMS loudness envelope with dB summary.

use crate::audio::{frame_rms, AudioClip};
use crate::metrics::EPSILON;
use serde::{Deserialize, Serialize};

/// Floor applied to RMS values before dB conversion; `20 * log10(1e-6)`.
pub const DB_FLOOR: f64 = -120.0;

/// Configuration for loudness analysis.
#[derive(Debug, Clone)]
pub struct LoudnessConfig {
    /// Analysis window length in samples.
    pub window: usize,
    /// Hop between consecutive frames in samples.
    pub hop: usize,
}

impl LoudnessConfig {
    /// Create a configuration with the default frame policy.
    pub fn new() -> Self {
        Self {
            window: 1024,
            hop: 512,
        }
    }

    /// Set the analysis window length.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Set the hop length.
    pub fn with_hop(mut self, hop: usize) -> Self {
        self.hop = hop;
        self
    }
}

impl Default for LoudnessConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-frame RMS loudness with mean/max dB summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoudnessEnvelope {
    /// Linear RMS per analysis frame.
    pub rms_per_frame: Vec<f64>,
    /// Arithmetic mean of the per-frame dB values.
    pub mean_db: f64,
    /// Maximum per-frame dB value.
    pub max_db: f64,
}

/// Analyze loudness with the default configuration.
pub fn loudness_envelope(clip: &AudioClip) -> LoudnessEnvelope {
    loudness_envelope_with(clip, &LoudnessConfig::default())
}

/// Per-frame RMS converted to dB via `20 * log10(max(rms, epsilon))`.
///
/// A clip shorter than one window yields an empty envelope with both
/// summaries at [`DB_FLOOR`].
pub fn loudness_envelope_with(clip: &AudioClip, config: &LoudnessConfig) -> LoudnessEnvelope {
    let rms_per_frame = frame_rms(clip.samples(), config.window, config.hop);
    if rms_per_frame.is_empty() {
        return LoudnessEnvelope {
            rms_per_frame,
            mean_db: DB_FLOOR,
            max_db: DB_FLOOR,
        };
    }

    let mut sum_db = 0.0f64;
    let mut max_db = f64::NEG_INFINITY;
    for &rms in &rms_per_frame {
        let db = 20.0 * rms.max(EPSILON).log10();
        sum_db += db;
        if db > max_db {
            max_db = db;
        }
    }
    LoudnessEnvelope {
        mean_db: sum_db / rms_per_frame.len() as f64,
        max_db,
        rms_per_frame,
    }
}
