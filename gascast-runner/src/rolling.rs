//! Rolling hit rate of the scoring function over its own history.
//!
//! For every window end `i` in `window..len` (every `stride`-th one), the
//! hit rate is the share of the `window` preceding bars `j` where
//! `probability_up(series[..=j]) >= 50` agreed with `return[j] > 0`.
//!
//! The prediction for bar `j` is scored on a prefix that already contains
//! bar `j`, so this measures same-bar consistency rather than a forward
//! forecast. Reports produced by earlier runs depend on that definition.
//!
//! Each needed prediction is computed once, in parallel, then windows are
//! assembled by index. The output is identical to the sequential loop.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use gascast_core::indicators::{Indicator, Returns};
use gascast_core::{score_with_oil, PriceSeries, ScoreParameters, NEUTRAL_PROBABILITY};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum RollingError {
    #[error("rolling window must be >= 1")]
    ZeroWindow,

    #[error("rolling stride must be >= 1")]
    ZeroStride,

    #[error("failed to write accuracy file {path}: {source}")]
    Write { path: PathBuf, source: csv::Error },
}

/// Hit rate (percent) of the window ending just before `date`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyPoint {
    pub date: NaiveDate,
    pub hit_rate: f64,
}

/// Rolling accuracy without the oil term.
pub fn rolling_accuracy(
    series: &PriceSeries,
    params: &ScoreParameters,
    window: usize,
    stride: usize,
) -> Result<Vec<AccuracyPoint>, RollingError> {
    rolling_accuracy_with_oil(series, params, None, window, stride)
}

/// Rolling accuracy; `oil_changes` is aligned to `series` and truncated
/// with it for each prediction.
pub fn rolling_accuracy_with_oil(
    series: &PriceSeries,
    params: &ScoreParameters,
    oil_changes: Option<&[f64]>,
    window: usize,
    stride: usize,
) -> Result<Vec<AccuracyPoint>, RollingError> {
    if window == 0 {
        return Err(RollingError::ZeroWindow);
    }
    if stride == 0 {
        return Err(RollingError::ZeroStride);
    }

    let len = series.len();
    if len <= window {
        debug!(bars = len, window, "series shorter than window, no accuracy points");
        return Ok(Vec::new());
    }

    let ends: Vec<usize> = (window..len).step_by(stride).collect();

    let mut needed = vec![false; len];
    for &i in &ends {
        needed[i - window..i].iter_mut().for_each(|n| *n = true);
    }
    let indices: Vec<usize> = (0..len).filter(|&j| needed[j]).collect();

    let predicted: Vec<(usize, bool)> = indices
        .par_iter()
        .map(|&j| {
            let prefix = series.prefix(j + 1);
            let oil = oil_changes.map(|changes| &changes[..(j + 1).min(changes.len())]);
            let result = score_with_oil(&prefix, params, oil);
            (j, result.probability_up >= NEUTRAL_PROBABILITY)
        })
        .collect();

    let mut predicted_up = vec![false; len];
    for (j, up) in predicted {
        predicted_up[j] = up;
    }

    let returns = Returns.compute(series.bars());
    let hits: Vec<bool> = (0..len)
        .map(|j| predicted_up[j] == (returns[j] > 0.0))
        .collect();

    let bars = series.bars();
    let points: Vec<AccuracyPoint> = ends
        .iter()
        .map(|&i| {
            let correct = hits[i - window..i].iter().filter(|&&hit| hit).count();
            AccuracyPoint {
                date: bars[i].date,
                hit_rate: correct as f64 / window as f64 * 100.0,
            }
        })
        .collect();

    info!(
        points = points.len(),
        predictions = indices.len(),
        window,
        stride,
        "rolling accuracy computed"
    );
    Ok(points)
}

/// Write `date,hit_rate` rows.
pub fn write_accuracy_csv(path: &Path, points: &[AccuracyPoint]) -> Result<(), RollingError> {
    let write_err = |source| RollingError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(write_err)?;
    for point in points {
        writer.serialize(point).map_err(write_err)?;
    }
    writer
        .flush()
        .map_err(|e| write_err(csv::Error::from(e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn rising(n: usize) -> PriceSeries {
        let closes: Vec<f64> = (0..n).map(|i| 3.0 * 1.01f64.powi(i as i32)).collect();
        PriceSeries::from_closes(start(), &closes).unwrap()
    }

    fn wavy(n: usize) -> PriceSeries {
        let closes: Vec<f64> = (0..n)
            .map(|i| 3.0 + (i as f64 * 0.37).sin() * 0.4 + (i as f64 * 0.11).cos() * 0.2)
            .collect();
        PriceSeries::from_closes(start(), &closes).unwrap()
    }

    /// Direct transcription of the definition, one score per (i, j).
    fn sequential(series: &PriceSeries, params: &ScoreParameters, window: usize) -> Vec<f64> {
        let returns = Returns.compute(series.bars());
        (window..series.len())
            .map(|i| {
                let correct = (i - window..i)
                    .filter(|&j| {
                        let p = gascast_core::score(&series.prefix(j + 1), params).probability_up;
                        (p >= 50.0) == (returns[j] > 0.0)
                    })
                    .count();
                correct as f64 / window as f64 * 100.0
            })
            .collect()
    }

    #[test]
    fn steadily_rising_series_is_almost_always_right() {
        let series = rising(100);
        let points = rolling_accuracy(&series, &ScoreParameters::default(), 30, 1).unwrap();
        assert_eq!(points.len(), 70);

        // Bar 0 has a zero return but a neutral (up) prediction.
        assert!((points[0].hit_rate - 29.0 / 30.0 * 100.0).abs() < 1e-9);
        assert!(points[1..].iter().all(|p| p.hit_rate == 100.0));
        assert_eq!(points[0].date, series.bars()[30].date);
    }

    #[test]
    fn matches_sequential_definition() {
        let series = wavy(90);
        let params = ScoreParameters::default();
        let parallel: Vec<f64> = rolling_accuracy(&series, &params, 20, 1)
            .unwrap()
            .iter()
            .map(|p| p.hit_rate)
            .collect();
        assert_eq!(parallel, sequential(&series, &params, 20));
    }

    #[test]
    fn stride_subsamples_window_ends() {
        let series = wavy(90);
        let params = ScoreParameters::default();
        let full = rolling_accuracy(&series, &params, 20, 1).unwrap();
        let strided = rolling_accuracy(&series, &params, 20, 7).unwrap();

        assert_eq!(strided.len(), (20..90).step_by(7).count());
        for (k, point) in strided.iter().enumerate() {
            assert_eq!(*point, full[k * 7]);
        }
    }

    #[test]
    fn short_series_yields_nothing() {
        let series = rising(30);
        let points = rolling_accuracy(&series, &ScoreParameters::default(), 30, 1).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn zero_window_or_stride_is_rejected() {
        let series = rising(10);
        let params = ScoreParameters::default();
        assert!(matches!(
            rolling_accuracy(&series, &params, 0, 1),
            Err(RollingError::ZeroWindow)
        ));
        assert!(matches!(
            rolling_accuracy(&series, &params, 5, 0),
            Err(RollingError::ZeroStride)
        ));
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accuracy.csv");
        let points = vec![
            AccuracyPoint {
                date: start(),
                hit_rate: 50.0,
            },
            AccuracyPoint {
                date: start().succ_opt().unwrap(),
                hit_rate: 62.5,
            },
        ];
        write_accuracy_csv(&path, &points).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "date,hit_rate\n2024-01-01,50.0\n2024-01-02,62.5\n");
    }
}
