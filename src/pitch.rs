//! Windowed autocorrelation pitch tracking.

use crate::audio::{hann, AudioClip};
use serde::{Deserialize, Serialize};

/// Configuration for the autocorrelation pitch tracker.
///
/// # Example
/// ```
/// use driftprobe::pitch::PitchConfig;
///
/// let config = PitchConfig::new().with_range(60.0, 1200.0);
/// ```
#[derive(Debug, Clone)]
pub struct PitchConfig {
    /// Analysis window length in samples.
    pub window: usize,
    /// Hop between consecutive frames in samples.
    pub hop: usize,
    /// Lowest fundamental considered, in Hz.
    pub fmin: f64,
    /// Highest fundamental considered, in Hz.
    pub fmax: f64,
}

impl PitchConfig {
    /// Create a configuration with the default search range.
    pub fn new() -> Self {
        Self {
            window: 1024,
            hop: 512,
            fmin: 80.0,
            fmax: 800.0,
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

    /// Set the fundamental frequency search range.
    pub fn with_range(mut self, fmin: f64, fmax: f64) -> Self {
        self.fmin = fmin;
        self.fmax = fmax;
        self
    }
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// One fundamental-frequency estimate per analysis frame.
///
/// A value of `0.0` marks an unvoiced or indeterminate frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchTrack {
    /// Estimated f0 in Hz per frame.
    pub f0_hz: Vec<f64>,
}

/// Track pitch with the default configuration.
pub fn pitch_track(clip: &AudioClip) -> PitchTrack {
    pitch_track_with(clip, &PitchConfig::default())
}

/// Per-frame fundamental frequency by unnormalized autocorrelation.
///
/// Each frame is Hann-windowed, then the lag in
/// `[sample_rate / fmax, sample_rate / fmin]` (clamped to the window
/// length) maximizing the autocorrelation is reported as
/// `sample_rate / lag`. Resolution is one lag sample; no sub-sample
/// interpolation is performed. Frames whose best correlation is not
/// positive are reported as unvoiced (`0.0`).
pub fn pitch_track_with(clip: &AudioClip, config: &PitchConfig) -> PitchTrack {
    let samples = clip.samples();
    let sr = clip.sample_rate();
    let window = config.window;
    let hop = config.hop;
    if window == 0 || hop == 0 || samples.len() < window || config.fmin <= 0.0 {
        return PitchTrack { f0_hz: Vec::new() };
    }

    let min_lag = ((sr / config.fmax).floor() as usize).max(1);
    let max_lag = ((sr / config.fmin).ceil() as usize).min(window - 1);
    if min_lag > max_lag {
        let n_frames = (samples.len() - window) / hop + 1;
        return PitchTrack {
            f0_hz: vec![0.0; n_frames],
        };
    }

    let win = hann(window);
    let n_frames = (samples.len() - window) / hop + 1;
    let mut f0_hz = Vec::with_capacity(n_frames);
    let mut frame = vec![0.0f64; window];

    for i in 0..n_frames {
        let src = &samples[i * hop..i * hop + window];
        for (j, value) in frame.iter_mut().enumerate() {
            *value = f64::from(src[j]) * f64::from(win[j]);
        }

        let mut best_lag = 0usize;
        let mut best_corr = 0.0f64;
        for lag in min_lag..=max_lag {
            let mut corr = 0.0f64;
            for j in 0..window - lag {
                corr += frame[j] * frame[j + lag];
            }
            if corr > best_corr {
                best_corr = corr;
                best_lag = lag;
            }
        }

        if best_lag == 0 {
            f0_hz.push(0.0);
        } else {
            f0_hz.push(sr / best_lag as f64);
        }
    }

    PitchTrack { f0_hz }
}
