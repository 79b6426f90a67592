use driftprobe::align::{align, align_with, AlignConfig, Alignment};
use driftprobe::GrayscaleImage;

/// Shift image content by `(dx, dy)`, filling exposed pixels with zero.
fn translate(img: &GrayscaleImage, dx: i32, dy: i32) -> GrayscaleImage {
    let (w, h) = (img.width() as i32, img.height() as i32);
    let mut out = vec![0.0f32; (w * h) as usize];
    for y in 0..h {
        for x in 0..w {
            let sx = x - dx;
            let sy = y - dy;
            if sx >= 0 && sx < w && sy >= 0 && sy < h {
                out[(y * w + x) as usize] = img.get(sx as u32, sy as u32);
            }
        }
    }
    GrayscaleImage::new(img.width(), img.height(), out).unwrap()
}

/// Black frame with a bright square, the classic alignment target.
fn bright_square(size: u32) -> GrayscaleImage {
    let mut samples = vec![0.0f32; (size * size) as usize];
    for y in 16..32 {
        for x in 16..32 {
            samples[(y * size + x) as usize] = 1.0;
        }
    }
    GrayscaleImage::new(size, size, samples).unwrap()
}

#[test]
fn self_alignment_is_identity() {
    let img = bright_square(64);
    let result = align(&img, &img);
    assert_eq!(result, Alignment::identity());
}

#[test]
fn self_alignment_of_textured_image() {
    let samples: Vec<f32> = (0..64 * 64)
        .map(|i| ((i as f32 * 0.37).sin() * 0.5 + 0.5).clamp(0.0, 1.0))
        .collect();
    let img = GrayscaleImage::new(64, 64, samples).unwrap();
    let result = align(&img, &img);
    assert_eq!((result.dx, result.dy), (0, 0));
    assert_eq!(result.score, 0.0);
}

#[test]
fn recovers_known_translation() {
    let baseline = bright_square(64);
    let candidate = translate(&baseline, 5, -3);
    let result = align(&baseline, &candidate);
    assert!((result.dx - 5).abs() <= 1, "dx = {}", result.dx);
    assert!((result.dy + 3).abs() <= 1, "dy = {}", result.dy);
}

#[test]
fn recovers_translation_in_both_directions() {
    let baseline = bright_square(64);
    let candidate = translate(&baseline, -4, 6);
    let result = align(&baseline, &candidate);
    assert!((result.dx + 4).abs() <= 1, "dx = {}", result.dx);
    assert!((result.dy - 6).abs() <= 1, "dy = {}", result.dy);
}

#[test]
fn degenerate_image_yields_identity() {
    let empty = GrayscaleImage::new(0, 0, Vec::new()).unwrap();
    let img = bright_square(64);
    assert_eq!(align(&empty, &img), Alignment::identity());
    assert_eq!(align(&img, &empty), Alignment::identity());
}

#[test]
fn custom_search_window_still_recovers() {
    let baseline = bright_square(64);
    let candidate = translate(&baseline, 2, 2);
    let config = AlignConfig::new()
        .with_coarse_size(64)
        .with_refine_size(128)
        .with_coarse_search(8)
        .with_refine_search(4);
    let result = align_with(&baseline, &candidate, &config);
    assert!((result.dx - 2).abs() <= 1, "dx = {}", result.dx);
    assert!((result.dy - 2).abs() <= 1, "dy = {}", result.dy);
}
