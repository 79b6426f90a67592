//! Audio clip container and shared frame utilities.
//!
//! Input is decoded PCM float samples; codec handling happens upstream.
//! The per-frame RMS computed here feeds the onset detector, the loudness
//! analyzer and the spectrogram builder. The module also provides the
//! synthetic generators used by the test suite.

use crate::{Error, Result};

/// A mono PCM audio clip at a known sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    samples: Vec<f32>,
    sample_rate: f64,
}

impl AudioClip {
    /// Create a clip from mono samples.
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameter`] unless `sample_rate` is a
    /// positive finite value.
    pub fn new(samples: Vec<f32>, sample_rate: f64) -> Result<Self> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(Error::InvalidParameter {
                name: "sample_rate",
                value: sample_rate.to_string(),
                reason: "must be positive and finite",
            });
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Create a clip by downmixing interleaved multi-channel samples to
    /// mono with an unweighted average across channels.
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameter`] for zero channels or a
    /// non-positive sample rate.
    pub fn from_interleaved(
        interleaved: &[f32],
        channels: usize,
        sample_rate: f64,
    ) -> Result<Self> {
        if channels == 0 {
            return Err(Error::InvalidParameter {
                name: "channels",
                value: "0".to_string(),
                reason: "must be > 0",
            });
        }
        Self::new(downmix_mono(interleaved, channels), sample_rate)
    }

    /// Mono samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Clip duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate
    }
}

/// Downmix interleaved multi-channel samples to mono by averaging all
/// channels with equal weight. A trailing partial frame is averaged over
/// the channels present.
pub fn downmix_mono(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Root-mean-square energy per frame.
///
/// Frames are non-centered: frame `i` covers `[i*hop, i*hop + window)` and
/// only full frames are emitted. Returns an empty vector when the signal
/// is shorter than one window or when `window`/`hop` is zero.
pub fn frame_rms(samples: &[f32], window: usize, hop: usize) -> Vec<f64> {
    if window == 0 || hop == 0 || samples.len() < window {
        return Vec::new();
    }
    let n_frames = (samples.len() - window) / hop + 1;
    let mut rms = Vec::with_capacity(n_frames);
    for i in 0..n_frames {
        let frame = &samples[i * hop..i * hop + window];
        let energy: f64 = frame.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
        rms.push((energy / window as f64).sqrt());
    }
    rms
}

/// Periodic Hann window of length `n`.
pub fn hann(n: usize) -> Vec<f32> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![1.0];
    }
    let m = n as f32;
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f32::consts::PI * i as f32 / m).cos())
        .collect()
}

/// Generate a pure sine tone.
pub fn tone(frequency: f64, sample_rate: f64, duration_secs: f64) -> Vec<f32> {
    let n = (duration_secs * sample_rate) as usize;
    let angular = 2.0 * std::f64::consts::PI * frequency / sample_rate;
    (0..n).map(|i| (angular * i as f64).sin() as f32).collect()
}

/// Generate a train of decaying sine bursts at a fixed period, for rhythm
/// tests. Each burst lasts `burst_secs` and decays exponentially.
pub fn click_train(
    n_clicks: usize,
    period_secs: f64,
    sample_rate: f64,
    burst_secs: f64,
) -> Vec<f32> {
    let len = ((n_clicks as f64 * period_secs + burst_secs) * sample_rate) as usize;
    let mut y = vec![0.0f32; len];
    let burst_samples = (burst_secs * sample_rate) as usize;
    let angular = 2.0 * std::f64::consts::PI * 1000.0 / sample_rate;
    for k in 0..n_clicks {
        let start = (k as f64 * period_secs * sample_rate) as usize;
        for i in 0..burst_samples {
            let idx = start + i;
            if idx >= len {
                break;
            }
            let t = i as f64;
            let envelope = (-t / (burst_samples as f64 * 0.2)).exp();
            y[idx] += (envelope * (angular * t).sin()) as f32;
        }
    }
    y
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn new_rejects_bad_sample_rate() {
        assert!(AudioClip::new(vec![0.0; 4], 0.0).is_err());
        assert!(AudioClip::new(vec![0.0; 4], -44100.0).is_err());
        assert!(AudioClip::new(vec![0.0; 4], f64::NAN).is_err());
    }

    #[test]
    fn downmix_averages_channels() {
        let stereo = [1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        let mono = downmix_mono(&stereo, 2);
        assert_eq!(mono, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn downmix_mono_passthrough() {
        let samples = [0.1, 0.2, 0.3];
        assert_eq!(downmix_mono(&samples, 1), samples.to_vec());
    }

    #[test]
    fn frame_rms_of_constant_signal() {
        let samples = vec![0.5f32; 2048];
        let rms = frame_rms(&samples, 1024, 512);
        assert_eq!(rms.len(), 3);
        for &v in &rms {
            assert_relative_eq!(v, 0.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn frame_rms_short_signal_is_empty() {
        assert!(frame_rms(&[0.1f32; 100], 1024, 512).is_empty());
        assert!(frame_rms(&[], 1024, 512).is_empty());
    }

    #[test]
    fn hann_endpoints_and_peak() {
        let w = hann(8);
        assert_relative_eq!(w[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(w[4], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn tone_has_expected_length() {
        let y = tone(440.0, 22050.0, 0.5);
        assert_eq!(y.len(), 11025);
    }
}
