//! Energy-novelty onset detection and inter-onset-interval tempo.

use crate::audio::{frame_rms, AudioClip};
use serde::{Deserialize, Serialize};

/// Configuration for onset detection.
///
/// # Example
/// ```
/// use driftprobe::onset::OnsetConfig;
///
/// let config = OnsetConfig::new().with_margin(0.1);
/// ```
#[derive(Debug, Clone)]
pub struct OnsetConfig {
    /// Analysis window length in samples.
    pub window: usize,
    /// Hop between consecutive frames in samples.
    pub hop: usize,
    /// Additive margin over the novelty median for the picking threshold.
    pub margin: f64,
}

impl OnsetConfig {
    /// Create a configuration with the default picking policy.
    pub fn new() -> Self {
        Self {
            window: 1024,
            hop: 512,
            margin: 0.05,
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

    /// Set the threshold margin over the novelty median.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }
}

impl Default for OnsetConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Detected onset times plus the tempo estimated from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnsetSet {
    /// Onset times in seconds from the start of the clip.
    pub onset_times_sec: Vec<f64>,
    /// Tempo in BPM from the median inter-onset interval, if estimable.
    pub tempo_bpm: Option<f64>,
}

/// Half-wave rectified first difference of a per-frame RMS envelope.
///
/// The first element is zero; each following element is the positive part
/// of the energy surge since the previous frame.
pub fn novelty_curve(rms: &[f64]) -> Vec<f64> {
    if rms.is_empty() {
        return Vec::new();
    }
    let mut novelty = Vec::with_capacity(rms.len());
    novelty.push(0.0);
    for i in 1..rms.len() {
        novelty.push((rms[i] - rms[i - 1]).max(0.0));
    }
    novelty
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        0.5 * (sorted[mid - 1] + sorted[mid])
    } else {
        sorted[mid]
    }
}

/// Detect onsets with the default configuration.
pub fn detect_onsets(clip: &AudioClip) -> OnsetSet {
    detect_onsets_with(clip, &OnsetConfig::default())
}

/// Detect onsets as energy-novelty peaks.
///
/// Novelty peaks strictly greater than both neighbors and above
/// `median(novelty) + margin` are reported at `peak_index * hop /
/// sample_rate` seconds. An empty or too-short clip yields an empty set.
pub fn detect_onsets_with(clip: &AudioClip, config: &OnsetConfig) -> OnsetSet {
    let rms = frame_rms(clip.samples(), config.window, config.hop);
    let novelty = novelty_curve(&rms);
    let threshold = median(&novelty) + config.margin;

    let mut onset_times_sec = Vec::new();
    for i in 1..novelty.len().saturating_sub(1) {
        let v = novelty[i];
        if v > threshold && v > novelty[i - 1] && v > novelty[i + 1] {
            onset_times_sec.push(i as f64 * config.hop as f64 / clip.sample_rate());
        }
    }

    let tempo_bpm = estimate_tempo(&onset_times_sec);
    OnsetSet {
        onset_times_sec,
        tempo_bpm,
    }
}

/// Tempo in BPM from the median inter-onset interval.
///
/// Requires at least two onsets; returns `None` otherwise, or when the
/// median interval is non-positive.
pub fn estimate_tempo(onset_times_sec: &[f64]) -> Option<f64> {
    if onset_times_sec.len() < 2 {
        return None;
    }
    let intervals: Vec<f64> = onset_times_sec
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .collect();
    let m = median(&intervals);
    if m <= 0.0 {
        return None;
    }
    Some(60.0 / m)
}
