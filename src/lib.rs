//! Perceptual drift metrics for visual and audio regression testing.
//!
//! Driftprobe quantifies how far a freshly rendered artifact — a grayscale
//! image or a decoded PCM audio clip — has drifted from a stored baseline.
//! Everything is a pure, stateless batch computation over two complete
//! in-memory artifacts: no I/O, no caching, no global state. Capture,
//! decode, storage and scheduling live outside this crate.
//!
//! # Quick Start
//!
//! ```rust
//! use driftprobe::{audio, AudioClip, GrayscaleImage};
//!
//! // Identical solid-gray frames drift by nothing.
//! let baseline = GrayscaleImage::new(64, 64, vec![0.5; 4096]).unwrap();
//! let candidate = baseline.clone();
//! let report = driftprobe::compare_images(&baseline, &candidate, None);
//! assert!(report.pass);
//! assert_eq!(report.metrics["pixel_l1"], 0.0);
//!
//! // A 440 Hz tone matches itself spectrally.
//! let clip = AudioClip::new(audio::tone(440.0, 16000.0, 0.5), 16000.0).unwrap();
//! let report = driftprobe::compare_audio(&clip, &clip);
//! assert!(report.pass);
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`image`] | Grayscale intensity images, bilinear resize, overlap crops |
//! | [`align`] | Coarse-to-fine integer translation search |
//! | [`metrics`] | Pixel L1, Sobel saliency, saliency-weighted SSIM |
//! | [`audio`] | PCM clip container, mono downmix, frame RMS, generators |
//! | [`spectrogram`] | Coarse magnitude spectrograms, L2 and log-spectral distance |
//! | [`onset`] | Energy-novelty onset detection and IOI tempo |
//! | [`pitch`] | Autocorrelation pitch tracking |
//! | [`loudness`] | RMS envelope with dB summary |
//! | [`xcorr`] | Cross-correlation time alignment |
//! | [`viz`] | Contrast-normalized PNG artifact rendering |
//! | [`report`] | Drift report assembly, pass rules, embedding/sink seams |
//!
//! # Error Handling
//!
//! Constructors validate their invariants and return [`Result<T>`], an
//! alias for `std::result::Result<T, Error>`. Analysis functions never
//! fail: empty or degenerate inputs yield neutral values so a report can
//! always be produced, and numeric edge cases are floored at a small
//! epsilon instead of propagating NaN or infinity.
//!
//! # Concurrency
//!
//! All algorithms are pure functions over immutable inputs. Comparisons
//! are independent and may run on any thread; the crate imposes no limit
//! of its own.
//!
//! # Safety
//!
//! This crate uses `#![forbid(unsafe_code)]` — no unsafe Rust anywhere.

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, Result};

pub mod align;
pub mod audio;
pub mod image;
pub mod loudness;
pub mod metrics;
pub mod onset;
pub mod pitch;
pub mod report;
pub mod spectrogram;
pub mod viz;
pub mod xcorr;

pub use align::Alignment;
pub use audio::AudioClip;
pub use image::GrayscaleImage;
pub use loudness::LoudnessEnvelope;
pub use onset::OnsetSet;
pub use pitch::PitchTrack;
pub use report::{
    ArtifactRef, ArtifactSink, DriftReport, EmbeddingProvider, MomentEmbedding, PassRule,
};

/// Estimate the translation mapping candidate content onto the baseline.
/// See [`align::align`].
pub fn align_images(baseline: &GrayscaleImage, candidate: &GrayscaleImage) -> Alignment {
    align::align(baseline, candidate)
}

/// Compare two images into a [`DriftReport`] with the default policy.
/// See [`report::compare_images_with`] for configuration and artifacts.
pub fn compare_images(
    baseline: &GrayscaleImage,
    candidate: &GrayscaleImage,
    embedding_distance: Option<f64>,
) -> DriftReport {
    report::compare_images(baseline, candidate, embedding_distance)
}

/// Compare two audio clips into a [`DriftReport`] with the default policy.
/// See [`report::compare_audio_with`] for configuration and artifacts.
pub fn compare_audio(baseline: &AudioClip, candidate: &AudioClip) -> DriftReport {
    report::compare_audio(baseline, candidate)
}

/// Detect onsets and estimate tempo with the default policy.
pub fn analyze_onsets(clip: &AudioClip) -> OnsetSet {
    onset::detect_onsets(clip)
}

/// Track per-frame fundamental frequency with the default policy.
pub fn analyze_pitch(clip: &AudioClip) -> PitchTrack {
    pitch::pitch_track(clip)
}

/// Compute the RMS loudness envelope with the default policy.
pub fn analyze_loudness(clip: &AudioClip) -> LoudnessEnvelope {
    loudness::loudness_envelope(clip)
}

/// Estimate by how many milliseconds the candidate is delayed relative to
/// the baseline. Negative values mean the candidate leads.
pub fn analyze_alignment(baseline: &AudioClip, candidate: &AudioClip) -> f64 {
    xcorr::offset_ms(baseline, candidate)
}
