use approx::assert_relative_eq;
use driftprobe::analyze_alignment;
use driftprobe::audio::{downmix_mono, tone, AudioClip};
use driftprobe::loudness::loudness_envelope;
use driftprobe::xcorr::{cross_correlation_offset, cross_correlation_offset_with, XcorrConfig};

/// Delay a signal by prepending zeros.
fn delay(samples: &[f32], k: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; k];
    out.extend_from_slice(samples);
    out
}

#[test]
fn cross_correlation_recovers_known_delay() {
    let sr = 8000.0;
    let a = tone(440.0, sr, 0.5);
    let b = delay(&a, 37);
    let estimate = cross_correlation_offset(&a, &b, sr);
    assert_eq!(estimate.lag_samples, 37);
}

#[test]
fn cross_correlation_recovers_negative_delay() {
    // The baseline is the delayed one, so the candidate leads.
    let sr = 8000.0;
    let b = tone(440.0, sr, 0.5);
    let a = delay(&b, 25);
    let estimate = cross_correlation_offset(&a, &b, sr);
    assert_eq!(estimate.lag_samples, -25);
}

#[test]
fn lag_window_bounds_the_search() {
    let sr = 8000.0;
    let a = tone(440.0, sr, 0.5);
    let b = delay(&a, 500);
    // 0.25 s at 8 kHz allows lags up to 2000; 0.01 s only up to 80.
    let narrow = XcorrConfig::new().with_max_lag_secs(0.01);
    let estimate = cross_correlation_offset_with(&a, &b, sr, &narrow);
    assert!(estimate.lag_samples.abs() <= 80);
}

#[test]
fn alignment_offset_in_milliseconds() {
    let sr = 8000.0;
    let base = AudioClip::new(tone(440.0, sr, 0.5), sr).unwrap();
    let cand = AudioClip::new(delay(base.samples(), 80), sr).unwrap();
    let ms = analyze_alignment(&base, &cand);
    assert_relative_eq!(ms, 10.0, epsilon = 1e-9);
}

#[test]
fn louder_clip_has_higher_loudness() {
    let sr = 8000.0;
    let quiet: Vec<f32> = tone(440.0, sr, 0.5).iter().map(|&s| s * 0.05).collect();
    let loud = tone(440.0, sr, 0.5);
    let env_quiet = loudness_envelope(&AudioClip::new(quiet, sr).unwrap());
    let env_loud = loudness_envelope(&AudioClip::new(loud, sr).unwrap());
    assert!(env_loud.mean_db > env_quiet.mean_db);
    assert!(env_loud.max_db > env_quiet.max_db);
    assert!(env_loud.max_db >= env_loud.mean_db);
}

#[test]
fn sine_rms_matches_theory() {
    // RMS of a full-scale sine is 1/sqrt(2), about -3.01 dB.
    let sr = 8000.0;
    let clip = AudioClip::new(tone(440.0, sr, 1.0), sr).unwrap();
    let envelope = loudness_envelope(&clip);
    assert_relative_eq!(envelope.mean_db, -3.01, epsilon = 0.1);
}

#[test]
fn stereo_downmix_preserves_length_in_frames() {
    let sr = 8000.0;
    let left = tone(440.0, sr, 0.25);
    let right = tone(220.0, sr, 0.25);
    let interleaved: Vec<f32> = left
        .iter()
        .zip(&right)
        .flat_map(|(&l, &r)| [l, r])
        .collect();
    let mono = downmix_mono(&interleaved, 2);
    assert_eq!(mono.len(), left.len());
    for ((&m, &l), &r) in mono.iter().zip(&left).zip(&right) {
        assert_relative_eq!(m, 0.5 * (l + r), epsilon = 1e-6);
    }
}

#[test]
fn interleaved_constructor_downmixes() {
    let clip = AudioClip::from_interleaved(&[1.0, 0.0, 0.0, 1.0], 2, 8000.0).unwrap();
    assert_eq!(clip.samples(), &[0.5, 0.5]);
}
