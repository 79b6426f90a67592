use driftprobe::audio::{tone, AudioClip};
use driftprobe::spectrogram::{
    l2_distance, log_spectral_distance_db, spectrogram, spectrogram_with, SpectrogramConfig,
};

#[test]
fn identity_distances_are_zero() {
    let clip = AudioClip::new(tone(440.0, 16000.0, 0.5), 16000.0).unwrap();
    let spec = spectrogram(&clip);
    assert_eq!(l2_distance(&spec, &spec), 0.0);
    assert_eq!(log_spectral_distance_db(&spec, &spec), 0.0);
}

#[test]
fn louder_rendition_registers_as_drift() {
    let sr = 16000.0;
    let quiet: Vec<f32> = tone(440.0, sr, 0.5).iter().map(|&s| s * 0.1).collect();
    let loud = tone(440.0, sr, 0.5);
    let a = spectrogram(&AudioClip::new(quiet, sr).unwrap());
    let b = spectrogram(&AudioClip::new(loud, sr).unwrap());
    assert!(l2_distance(&a, &b) > 0.0);
    assert!(log_spectral_distance_db(&a, &b) > 0.0);
}

#[test]
fn distance_grows_with_dissimilarity() {
    // A slightly detuned tone should sit closer to the baseline than
    // silence does.
    let sr = 16000.0;
    let baseline = spectrogram(&AudioClip::new(tone(440.0, sr, 0.5), sr).unwrap());
    let detuned = spectrogram(&AudioClip::new(tone(450.0, sr, 0.5), sr).unwrap());
    let silence = spectrogram(&AudioClip::new(vec![0.0f32; 8000], sr).unwrap());

    let near = l2_distance(&baseline, &detuned);
    let far = l2_distance(&baseline, &silence);
    assert!(near < far, "near = {near}, far = {far}");
}

#[test]
fn compares_over_common_region_only() {
    let sr = 16000.0;
    let short = AudioClip::new(tone(440.0, sr, 0.25), sr).unwrap();
    let long = AudioClip::new(tone(440.0, sr, 1.0), sr).unwrap();
    let a = spectrogram(&short);
    let b = spectrogram(&long);
    assert!(a.cols() < b.cols());
    // Same tone, so the overlapping columns should be near-identical.
    let l2 = l2_distance(&a, &b);
    assert!(l2 < 1e-6, "l2 = {l2}");
}

#[test]
fn custom_frame_policy_changes_shape() {
    let clip = AudioClip::new(vec![0.1f32; 8192], 16000.0).unwrap();
    let config = SpectrogramConfig::new().with_fft_size(512).with_hop(256);
    let spec = spectrogram_with(&clip, &config);
    assert_eq!(spec.rows(), 257);
    assert_eq!(spec.cols(), (8192 - 512) / 256 + 1);
}

#[test]
fn empty_spectrograms_compare_as_zero() {
    let empty = spectrogram(&AudioClip::new(Vec::new(), 16000.0).unwrap());
    assert_eq!(l2_distance(&empty, &empty), 0.0);
    assert_eq!(log_spectral_distance_db(&empty, &empty), 0.0);
}
