use crate::core::document::LogDocument;
use crate::core::patterns::{Metric, PatternCatalog, PatternError};
use crate::engine::config::OscillationConfig;

/// The four convergence series of one document, one value per optimization step.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConvergenceData {
    series: [Vec<f64>; 4],
}

impl ConvergenceData {
    pub fn extract(document: &LogDocument, catalog: &PatternCatalog) -> Result<Self, PatternError> {
        let mut data = Self::default();
        for metric in Metric::ALL {
            data.series[metric as usize] = catalog.convergence_values(metric, document)?;
        }
        Ok(data)
    }

    pub fn from_series(
        max_force: Vec<f64>,
        rms_force: Vec<f64>,
        max_displacement: Vec<f64>,
        rms_displacement: Vec<f64>,
    ) -> Self {
        Self {
            series: [max_force, rms_force, max_displacement, rms_displacement],
        }
    }

    pub fn series(&self, metric: Metric) -> &[f64] {
        &self.series[metric as usize]
    }

    /// Whether every series has at least one value.
    pub fn is_complete(&self) -> bool {
        self.series.iter().all(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OscillationVerdict {
    pub is_oscillating: bool,
    /// Distinct values of the trailing window, ascending. Present only when oscillating.
    pub evidence: Option<Vec<f64>>,
}

/// Decides whether the trailing `window` values of a series alternate.
///
/// The step-to-step change magnitudes of the window are computed; the series
/// oscillates when every consecutive pair of magnitudes differs by less than
/// `tolerance`. Shorter series are never oscillating.
pub fn detect_alternation(series: &[f64], window: usize, tolerance: f64) -> OscillationVerdict {
    if window == 0 || series.len() < window {
        return OscillationVerdict::default();
    }
    let tail = &series[series.len() - window..];
    let diffs: Vec<f64> = tail.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    let stable = diffs
        .windows(2)
        .all(|pair| (pair[1] - pair[0]).abs() < tolerance);
    if !stable {
        return OscillationVerdict::default();
    }

    let mut evidence = tail.to_vec();
    evidence.sort_by(|a, b| a.total_cmp(b));
    evidence.dedup();
    OscillationVerdict {
        is_oscillating: true,
        evidence: Some(evidence),
    }
}

/// Tests the series in metric order and reports the first one that oscillates.
///
/// Data missing any of the four criteria is never oscillating.
pub fn find_oscillation(
    data: &ConvergenceData,
    config: &OscillationConfig,
) -> Option<(Metric, Vec<f64>)> {
    if !data.is_complete() {
        return None;
    }
    Metric::ALL.into_iter().find_map(|metric| {
        let verdict = detect_alternation(data.series(metric), config.window, config.tolerance);
        verdict.evidence.map(|evidence| (metric, evidence))
    })
}
