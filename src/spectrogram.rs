//! Coarse time-frequency spectrograms and spectral distances.
//!
//! The builder is a magnitude proxy, not an FFT: each frequency row holds
//! `log1p` of the RMS of a contiguous sub-chunk of the frame. This trades
//! spectral resolution for simplicity; a true STFT can be substituted
//! behind the same matrix contract, so exact magnitudes are
//! implementation-defined and the distances below should be read as
//! relative measures.

use crate::audio::AudioClip;
use crate::metrics::EPSILON;
use ndarray::Array2;

/// Configuration for spectrogram construction.
///
/// # Example
/// ```
/// use driftprobe::spectrogram::SpectrogramConfig;
///
/// let config = SpectrogramConfig::new().with_hop(256);
/// ```
#[derive(Debug, Clone)]
pub struct SpectrogramConfig {
    /// Analysis frame length in samples; also fixes the number of
    /// frequency rows at `fft_size / 2 + 1`.
    pub fft_size: usize,
    /// Hop between consecutive frames in samples.
    pub hop: usize,
}

impl SpectrogramConfig {
    /// Create a configuration with the default frame policy.
    pub fn new() -> Self {
        Self {
            fft_size: 1024,
            hop: 512,
        }
    }

    /// Set the analysis frame length.
    pub fn with_fft_size(mut self, fft_size: usize) -> Self {
        self.fft_size = fft_size;
        self
    }

    /// Set the hop length.
    pub fn with_hop(mut self, hop: usize) -> Self {
        self.hop = hop;
        self
    }
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A time-frequency magnitude matrix: frequency rows by time columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    mag: Array2<f32>,
}

impl Spectrogram {
    /// Number of frequency rows.
    pub fn rows(&self) -> usize {
        self.mag.nrows()
    }

    /// Number of time columns.
    pub fn cols(&self) -> usize {
        self.mag.ncols()
    }

    /// The underlying magnitude matrix.
    pub fn data(&self) -> &Array2<f32> {
        &self.mag
    }
}

/// Build a coarse magnitude spectrogram with the default frame policy.
pub fn spectrogram(clip: &AudioClip) -> Spectrogram {
    spectrogram_with(clip, &SpectrogramConfig::default())
}

/// Build a coarse magnitude spectrogram.
///
/// For each full frame of `fft_size` samples (advancing by `hop`) and each
/// of `fft_size / 2 + 1` frequency rows, the cell holds `log1p(rms)` of a
/// contiguous sub-chunk of `fft_size / rows` samples of the frame. Signals
/// shorter than one frame produce an empty matrix.
pub fn spectrogram_with(clip: &AudioClip, config: &SpectrogramConfig) -> Spectrogram {
    let samples = clip.samples();
    let fft = config.fft_size;
    let hop = config.hop;
    if fft == 0 || hop == 0 || samples.len() < fft {
        return Spectrogram {
            mag: Array2::zeros((0, 0)),
        };
    }

    let rows = fft / 2 + 1;
    let chunk = (fft / rows).max(1);
    let cols = (samples.len() - fft) / hop + 1;
    let mut mag = Array2::<f32>::zeros((rows, cols));

    for col in 0..cols {
        let frame = &samples[col * hop..col * hop + fft];
        for row in 0..rows {
            let start = (row * chunk).min(fft - 1);
            let end = (start + chunk).min(fft);
            let sub = &frame[start..end];
            let energy: f64 = sub.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
            let rms = (energy / sub.len() as f64).sqrt();
            mag[(row, col)] = rms.ln_1p() as f32;
        }
    }

    Spectrogram { mag }
}

/// Mean squared difference between two spectrograms over their common
/// region `min(rows) x min(cols)`. Zero when the common region is empty.
pub fn l2_distance(a: &Spectrogram, b: &Spectrogram) -> f64 {
    let rows = a.rows().min(b.rows());
    let cols = a.cols().min(b.cols());
    if rows == 0 || cols == 0 {
        return 0.0;
    }
    let mut acc = 0.0f64;
    for r in 0..rows {
        for c in 0..cols {
            let d = f64::from(a.mag[(r, c)]) - f64::from(b.mag[(r, c)]);
            acc += d * d;
        }
    }
    acc / (rows * cols) as f64
}

/// Mean absolute difference of the dB-scale magnitudes,
/// `20 * log10(max(v, epsilon))`, over the common region. Zero when the
/// common region is empty.
pub fn log_spectral_distance_db(a: &Spectrogram, b: &Spectrogram) -> f64 {
    let rows = a.rows().min(b.rows());
    let cols = a.cols().min(b.cols());
    if rows == 0 || cols == 0 {
        return 0.0;
    }
    let mut acc = 0.0f64;
    for r in 0..rows {
        for c in 0..cols {
            let da = 20.0 * f64::from(a.mag[(r, c)]).max(EPSILON).log10();
            let db = 20.0 * f64::from(b.mag[(r, c)]).max(EPSILON).log10();
            acc += (da - db).abs();
        }
    }
    acc / (rows * cols) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{tone, AudioClip};

    #[test]
    fn shape_matches_frame_policy() {
        let clip = AudioClip::new(vec![0.1f32; 4096], 16000.0).unwrap();
        let spec = spectrogram(&clip);
        assert_eq!(spec.rows(), 513);
        assert_eq!(spec.cols(), (4096 - 1024) / 512 + 1);
    }

    #[test]
    fn short_signal_yields_empty_matrix() {
        let clip = AudioClip::new(vec![0.1f32; 100], 16000.0).unwrap();
        let spec = spectrogram(&clip);
        assert_eq!((spec.rows(), spec.cols()), (0, 0));
    }

    #[test]
    fn identity_distances_are_zero() {
        let clip = AudioClip::new(tone(440.0, 16000.0, 0.25), 16000.0).unwrap();
        let spec = spectrogram(&clip);
        assert_eq!(l2_distance(&spec, &spec), 0.0);
        assert_eq!(log_spectral_distance_db(&spec, &spec), 0.0);
    }

    #[test]
    fn different_signals_have_positive_distance() {
        let sr = 16000.0;
        let a = AudioClip::new(tone(440.0, sr, 0.25), sr).unwrap();
        let b = AudioClip::new(vec![0.0f32; 4000], sr).unwrap();
        let sa = spectrogram(&a);
        let sb = spectrogram(&b);
        assert!(l2_distance(&sa, &sb) > 0.0);
        assert!(log_spectral_distance_db(&sa, &sb) > 0.0);
    }
}
