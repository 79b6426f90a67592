use driftprobe::audio::AudioClip;
use driftprobe::loudness::DB_FLOOR;
use driftprobe::{
    analyze_alignment, analyze_loudness, analyze_onsets, analyze_pitch, compare_images, Error,
    GrayscaleImage,
};

#[test]
fn image_constructor_rejects_wrong_length() {
    let result = GrayscaleImage::new(10, 10, vec![0.0; 99]);
    assert!(matches!(result, Err(Error::Decode { .. })));
}

#[test]
fn clip_constructor_rejects_bad_rates() {
    assert!(AudioClip::new(vec![0.0], 0.0).is_err());
    assert!(AudioClip::new(vec![0.0], -1.0).is_err());
    assert!(AudioClip::new(vec![0.0], f64::INFINITY).is_err());
    assert!(AudioClip::from_interleaved(&[0.0, 0.0], 0, 44100.0).is_err());
}

#[test]
fn empty_clip_analyses_are_neutral() {
    let clip = AudioClip::new(Vec::new(), 44100.0).unwrap();

    let onsets = analyze_onsets(&clip);
    assert!(onsets.onset_times_sec.is_empty());
    assert_eq!(onsets.tempo_bpm, None);

    assert!(analyze_pitch(&clip).f0_hz.is_empty());

    let envelope = analyze_loudness(&clip);
    assert!(envelope.rms_per_frame.is_empty());
    assert_eq!(envelope.mean_db, DB_FLOOR);
    assert_eq!(envelope.max_db, DB_FLOOR);

    let other = AudioClip::new(Vec::new(), 44100.0).unwrap();
    assert_eq!(analyze_alignment(&clip, &other), 0.0);
}

#[test]
fn single_sample_clip_does_not_panic() {
    let clip = AudioClip::new(vec![0.5], 44100.0).unwrap();
    assert!(analyze_onsets(&clip).onset_times_sec.is_empty());
    assert!(analyze_pitch(&clip).f0_hz.is_empty());
    assert!(analyze_loudness(&clip).rms_per_frame.is_empty());
}

#[test]
fn degenerate_images_still_yield_a_report() {
    // A report must always be producible for audit trails; degenerate
    // inputs read as maximally different and fail the default rule.
    let empty = GrayscaleImage::new(0, 0, Vec::new()).unwrap();
    let report = compare_images(&empty, &empty, None);
    assert!(!report.pass);
    assert_eq!(report.metrics["pixel_l1"], 1.0);
}

#[test]
fn mismatched_sizes_are_resized_not_rejected() {
    let small = GrayscaleImage::new(32, 32, vec![0.5; 1024]).unwrap();
    let large = GrayscaleImage::new(200, 100, vec![0.5; 20000]).unwrap();
    let report = compare_images(&small, &large, None);
    // Same flat content at different sizes: no drift after resizing to
    // the common working resolution.
    assert!(report.pass);
    assert_eq!(report.metrics["pixel_l1"], 0.0);
}

#[test]
fn extreme_sample_values_stay_finite() {
    let clip = AudioClip::new(vec![1e30f32; 4096], 44100.0).unwrap();
    let envelope = analyze_loudness(&clip);
    assert!(envelope.mean_db.is_finite());
    assert!(envelope.max_db.is_finite());
}
