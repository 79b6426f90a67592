//! Drift report assembly: metric composition, pass/fail policy, and the
//! embedding/artifact collaborator seams.
//!
//! A report never aborts because one metric could not be computed; absent
//! metrics are simply omitted from the map so an audit trail can always
//! be written.

use crate::align::{align_with, AlignConfig};
use crate::audio::AudioClip;
use crate::image::GrayscaleImage;
use crate::loudness::{loudness_envelope_with, LoudnessConfig};
use crate::metrics::{mean_absolute_difference, saliency_weighted_ssim, EPSILON};
use crate::onset::{detect_onsets_with, OnsetConfig};
use crate::spectrogram::{l2_distance, log_spectral_distance_db, spectrogram_with, SpectrogramConfig};
use crate::viz;
use crate::xcorr::{offset_ms_with, XcorrConfig};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scalar distance between two artifacts from an opaque backend.
///
/// The engine never inspects the backend; deployments may plug in any
/// model-based embedding. Implementations may block on I/O or inference,
/// so callers schedule these calls off latency-sensitive paths.
pub trait EmbeddingProvider {
    /// Distance between two artifacts given as raw sample arrays.
    /// Zero means identical; larger means more different.
    fn distance(&self, a: &[f32], b: &[f32]) -> f64;
}

/// Default classical-feature embedding: low-order moments plus mean
/// absolute first difference, compared by cosine distance.
///
/// A stand-in for model-based backends; useful as a smoke-test distance
/// when no ML runtime is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct MomentEmbedding;

impl MomentEmbedding {
    fn features(samples: &[f32]) -> [f64; 3] {
        let n = samples.len();
        if n == 0 {
            return [0.0; 3];
        }
        let mean = samples.iter().map(|&v| f64::from(v)).sum::<f64>() / n as f64;
        let var = samples
            .iter()
            .map(|&v| {
                let d = f64::from(v) - mean;
                d * d
            })
            .sum::<f64>()
            / n as f64;
        let roughness = if n > 1 {
            samples
                .windows(2)
                .map(|w| f64::from((w[1] - w[0]).abs()))
                .sum::<f64>()
                / (n - 1) as f64
        } else {
            0.0
        };
        [mean, var.sqrt(), roughness]
    }
}

impl EmbeddingProvider for MomentEmbedding {
    fn distance(&self, a: &[f32], b: &[f32]) -> f64 {
        if a.is_empty() || b.is_empty() {
            // No features to compare: maximally different.
            return 1.0;
        }
        let fa = Self::features(a);
        let fb = Self::features(b);
        let dot: f64 = fa.iter().zip(&fb).map(|(x, y)| x * y).sum();
        let na: f64 = fa.iter().map(|x| x * x).sum::<f64>().sqrt();
        let nb: f64 = fb.iter().map(|x| x * x).sum::<f64>().sqrt();
        (1.0 - dot / (na * nb).max(EPSILON)).clamp(0.0, 2.0)
    }
}

/// Opaque handle to a stored visualization artifact.
///
/// Created by the caller-supplied [`ArtifactSink`]; the engine only
/// forwards it into the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef(pub String);

/// Caller-supplied storage for rendered visualization artifacts.
pub trait ArtifactSink {
    /// Persist PNG bytes under `name`, returning an opaque handle.
    fn put(&mut self, name: &str, bytes: &[u8]) -> ArtifactRef;
}

/// Bound a metric must satisfy for the comparison to pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Bound {
    /// Pass when the metric is `<=` the threshold (distance-like metrics).
    AtMost(f64),
    /// Pass when the metric is `>=` the threshold (similarity-like metrics).
    AtLeast(f64),
}

/// Pass/fail rule over one primary metric; all other metrics in a report
/// are informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassRule {
    /// Key of the primary metric in the report's metric map.
    pub metric: String,
    /// Bound the primary metric must satisfy.
    pub bound: Bound,
}

impl PassRule {
    /// Pass when `metric <= threshold`.
    pub fn at_most(metric: impl Into<String>, threshold: f64) -> Self {
        Self {
            metric: metric.into(),
            bound: Bound::AtMost(threshold),
        }
    }

    /// Pass when `metric >= threshold`.
    pub fn at_least(metric: impl Into<String>, threshold: f64) -> Self {
        Self {
            metric: metric.into(),
            bound: Bound::AtLeast(threshold),
        }
    }

    /// Evaluate the rule against a metric map. A missing primary metric
    /// fails the comparison.
    pub fn check(&self, metrics: &BTreeMap<String, f64>) -> bool {
        match metrics.get(&self.metric) {
            Some(&value) => match self.bound {
                Bound::AtMost(threshold) => value <= threshold,
                Bound::AtLeast(threshold) => value >= threshold,
            },
            None => {
                warn!(
                    "primary metric `{}` missing from report; failing comparison",
                    self.metric
                );
                false
            }
        }
    }
}

/// Composed drift metrics with a verdict and artifact handles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    /// Metric key to value; absent keys could not be computed.
    pub metrics: BTreeMap<String, f64>,
    /// Verdict of the configured [`PassRule`].
    pub pass: bool,
    /// Handles to visualization artifacts stored by the caller's sink.
    pub artifacts: BTreeMap<String, ArtifactRef>,
}

/// Configuration for image comparison reports.
#[derive(Debug, Clone)]
pub struct ImageCompareConfig {
    /// Translation search policy.
    pub align: AlignConfig,
    /// Pass rule; defaults to `pixel_l1 <= 0.012`.
    pub rule: PassRule,
}

impl Default for ImageCompareConfig {
    fn default() -> Self {
        Self {
            align: AlignConfig::default(),
            rule: PassRule::at_most("pixel_l1", 0.012),
        }
    }
}

/// Configuration for audio comparison reports.
#[derive(Debug, Clone)]
pub struct AudioCompareConfig {
    /// Spectrogram construction policy.
    pub spectrogram: SpectrogramConfig,
    /// Onset detection policy for the informational tempo metric.
    pub onset: OnsetConfig,
    /// Loudness framing policy.
    pub loudness: LoudnessConfig,
    /// Cross-correlation lag window.
    pub xcorr: XcorrConfig,
    /// Pass rule; defaults to `lsd_db <= 0.5`.
    pub rule: PassRule,
}

impl Default for AudioCompareConfig {
    fn default() -> Self {
        Self {
            spectrogram: SpectrogramConfig::default(),
            onset: OnsetConfig::default(),
            loudness: LoudnessConfig::default(),
            xcorr: XcorrConfig::default(),
            rule: PassRule::at_most("lsd_db", 0.5),
        }
    }
}

/// Compare two images with the default configuration and no artifact sink.
pub fn compare_images(
    baseline: &GrayscaleImage,
    candidate: &GrayscaleImage,
    embedding_distance: Option<f64>,
) -> DriftReport {
    compare_images_with(
        baseline,
        candidate,
        embedding_distance,
        &ImageCompareConfig::default(),
        None,
    )
}

/// Compare two images: alignment, translation-compensated pixel L1 and
/// saliency-weighted SSIM, plus an optional embedding distance.
///
/// When a sink is supplied, a contrast-normalized delta image of the
/// aligned working-resolution overlap is stored under `delta.png`.
pub fn compare_images_with(
    baseline: &GrayscaleImage,
    candidate: &GrayscaleImage,
    embedding_distance: Option<f64>,
    config: &ImageCompareConfig,
    sink: Option<&mut dyn ArtifactSink>,
) -> DriftReport {
    let mut metrics = BTreeMap::new();
    let mut artifacts = BTreeMap::new();

    let alignment = align_with(baseline, candidate, &config.align);
    metrics.insert("align_dx_px".to_string(), f64::from(alignment.dx));
    metrics.insert("align_dy_px".to_string(), f64::from(alignment.dy));
    metrics.insert("align_score".to_string(), f64::from(alignment.score));

    metrics.insert(
        "pixel_l1".to_string(),
        mean_absolute_difference(baseline, candidate, alignment.dx, alignment.dy),
    );
    metrics.insert(
        "ssim".to_string(),
        saliency_weighted_ssim(baseline, candidate, alignment.dx, alignment.dy),
    );

    if let Some(distance) = embedding_distance {
        metrics.insert("embedding_distance".to_string(), distance);
    }

    if let Some(sink) = sink {
        match crate::image::aligned_overlap(baseline, candidate, alignment.dx, alignment.dy)
            .map(|(a, b)| viz::delta_png(&a, &b))
        {
            Some(Ok(png)) => {
                artifacts.insert("delta".to_string(), sink.put("delta.png", &png));
            }
            Some(Err(err)) => debug!("skipping delta artifact: {err}"),
            None => debug!("skipping delta artifact: no aligned overlap"),
        }
    }

    let pass = config.rule.check(&metrics);
    DriftReport {
        metrics,
        pass,
        artifacts,
    }
}

/// Compare two audio clips with the default configuration and no sink.
pub fn compare_audio(baseline: &AudioClip, candidate: &AudioClip) -> DriftReport {
    compare_audio_with(baseline, candidate, None, &AudioCompareConfig::default(), None)
}

/// Compare two audio clips: spectral L2 and log-spectral distance, plus
/// informational time-alignment, tempo and loudness metrics and an
/// optional embedding distance.
///
/// Metrics that cannot be computed (for example on clips shorter than one
/// analysis frame) are omitted rather than aborting the report. When a
/// sink is supplied, spectrogram PNGs for both clips and their delta are
/// stored under `baseline_spec.png`, `candidate_spec.png` and
/// `delta_spec.png`.
pub fn compare_audio_with(
    baseline: &AudioClip,
    candidate: &AudioClip,
    embedding_distance: Option<f64>,
    config: &AudioCompareConfig,
    sink: Option<&mut dyn ArtifactSink>,
) -> DriftReport {
    let mut metrics = BTreeMap::new();
    let mut artifacts = BTreeMap::new();

    let spec_base = spectrogram_with(baseline, &config.spectrogram);
    let spec_cand = spectrogram_with(candidate, &config.spectrogram);
    if spec_base.cols() > 0 && spec_cand.cols() > 0 {
        metrics.insert(
            "spec_l2".to_string(),
            l2_distance(&spec_base, &spec_cand),
        );
        metrics.insert(
            "lsd_db".to_string(),
            log_spectral_distance_db(&spec_base, &spec_cand),
        );
    } else {
        debug!("omitting spectral metrics: a clip is shorter than one frame");
    }

    if !baseline.samples().is_empty() && !candidate.samples().is_empty() {
        metrics.insert(
            "offset_ms".to_string(),
            offset_ms_with(baseline, candidate, &config.xcorr),
        );
    }

    if let Some(bpm) = detect_onsets_with(candidate, &config.onset).tempo_bpm {
        metrics.insert("tempo_bpm".to_string(), bpm);
    }

    let envelope = loudness_envelope_with(candidate, &config.loudness);
    if !envelope.rms_per_frame.is_empty() {
        metrics.insert("mean_db".to_string(), envelope.mean_db);
        metrics.insert("max_db".to_string(), envelope.max_db);
    }

    if let Some(distance) = embedding_distance {
        metrics.insert("embedding_distance".to_string(), distance);
    }

    if let Some(sink) = sink {
        let renders = [
            ("baseline_spec", viz::spectrogram_png(&spec_base)),
            ("candidate_spec", viz::spectrogram_png(&spec_cand)),
            ("delta_spec", viz::spectrogram_delta_png(&spec_base, &spec_cand)),
        ];
        for (name, render) in renders {
            match render {
                Ok(png) => {
                    let file = format!("{name}.png");
                    artifacts.insert(name.to_string(), sink.put(&file, &png));
                }
                Err(err) => debug!("skipping {name} artifact: {err}"),
            }
        }
    }

    let pass = config.rule.check(&metrics);
    DriftReport {
        metrics,
        pass,
        artifacts,
    }
}
