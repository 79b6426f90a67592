//! Time-domain cross-correlation lag estimation between two clips.

use crate::audio::AudioClip;
use serde::{Deserialize, Serialize};

/// Configuration for the cross-correlation search.
#[derive(Debug, Clone)]
pub struct XcorrConfig {
    /// Maximum lag considered in either direction, in seconds.
    pub max_lag_secs: f64,
}

impl XcorrConfig {
    /// Create a configuration with the default lag window.
    pub fn new() -> Self {
        Self { max_lag_secs: 0.25 }
    }

    /// Set the maximum lag in seconds.
    pub fn with_max_lag_secs(mut self, max_lag_secs: f64) -> Self {
        self.max_lag_secs = max_lag_secs;
        self
    }
}

impl Default for XcorrConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Best lag found by the cross-correlation search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LagEstimate {
    /// Lag in samples; positive means `b` is delayed relative to `a`.
    pub lag_samples: i64,
    /// Dot product of the overlapping region at the best lag.
    pub value: f64,
}

/// Find the integer lag maximizing the correlation of `a` against `b`,
/// with the default lag window.
pub fn cross_correlation_offset(a: &[f32], b: &[f32], sample_rate: f64) -> LagEstimate {
    cross_correlation_offset_with(a, b, sample_rate, &XcorrConfig::default())
}

/// Find the integer lag maximizing `sum(a[i] * b[i + lag])` over the
/// overlapping region, for every lag in `[-max_lag, max_lag]`.
///
/// Overlap shrinks as `|lag|` grows; lags with zero overlap are skipped.
/// Two empty inputs yield the zero lag with a zero value.
pub fn cross_correlation_offset_with(
    a: &[f32],
    b: &[f32],
    sample_rate: f64,
    config: &XcorrConfig,
) -> LagEstimate {
    let max_lag = (config.max_lag_secs * sample_rate).max(0.0) as i64;
    let mut best = LagEstimate {
        lag_samples: 0,
        value: f64::NEG_INFINITY,
    };

    for lag in -max_lag..=max_lag {
        let i_start = (-lag).max(0);
        let i_end = (a.len() as i64).min(b.len() as i64 - lag);
        if i_end <= i_start {
            continue;
        }
        let mut dot = 0.0f64;
        for i in i_start..i_end {
            dot += f64::from(a[i as usize]) * f64::from(b[(i + lag) as usize]);
        }
        if dot > best.value {
            best = LagEstimate {
                lag_samples: lag,
                value: dot,
            };
        }
    }

    if best.value == f64::NEG_INFINITY {
        best = LagEstimate {
            lag_samples: 0,
            value: 0.0,
        };
    }
    best
}

/// Estimate by how many milliseconds `candidate` is delayed relative to
/// `baseline`. Negative values mean the candidate leads.
pub fn offset_ms(baseline: &AudioClip, candidate: &AudioClip) -> f64 {
    offset_ms_with(baseline, candidate, &XcorrConfig::default())
}

/// [`offset_ms`] with an explicit configuration. The baseline's sample
/// rate converts the lag to milliseconds.
pub fn offset_ms_with(baseline: &AudioClip, candidate: &AudioClip, config: &XcorrConfig) -> f64 {
    let estimate = cross_correlation_offset_with(
        baseline.samples(),
        candidate.samples(),
        baseline.sample_rate(),
        config,
    );
    estimate.lag_samples as f64 * 1000.0 / baseline.sample_rate()
}
