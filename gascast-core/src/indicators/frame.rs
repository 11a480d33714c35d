//! Per-bar indicator rows for a price series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{backfill, Atr, Indicator, Returns, Rsi, Sma};
use crate::domain::PriceSeries;
use crate::params::ScoreParameters;

/// Indicator values for one bar.
///
/// `atr` and `rsi` are back-filled across their warmup and are `None` only
/// when the series is too short to define them at all. `sma_short` and
/// `sma_long` are `None` until their window is full.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub daily_return: f64,
    pub true_range: f64,
    pub atr: Option<f64>,
    pub rsi: Option<f64>,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
}

/// One `IndicatorRow` per bar, computed from an immutable series snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    rows: Vec<IndicatorRow>,
}

fn defined(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

impl IndicatorFrame {
    /// `params` must pass `ScoreParameters::validate`; a zero period panics.
    pub fn compute(series: &PriceSeries, params: &ScoreParameters) -> Self {
        debug_assert!(
            params.validate().is_ok(),
            "invalid score parameters: {:?}",
            params.validate()
        );
        let bars = series.bars();

        let returns = Returns.compute(bars);
        let true_range = super::true_range(bars);
        let mut atr = Atr::new(params.atr_period).compute(bars);
        backfill(&mut atr);
        let mut rsi = Rsi::new(params.rsi_period).compute(bars);
        backfill(&mut rsi);
        let sma_short = Sma::new(params.sma_short_window).compute(bars);
        let sma_long = Sma::new(params.sma_long_window).compute(bars);

        let rows = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| IndicatorRow {
                date: bar.date,
                close: bar.close,
                daily_return: returns[i],
                true_range: true_range[i],
                atr: defined(atr[i]),
                rsi: defined(rsi[i]),
                sma_short: defined(sma_short[i]),
                sma_long: defined(sma_long[i]),
            })
            .collect();

        Self { rows }
    }

    pub fn rows(&self) -> &[IndicatorRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> &IndicatorRow {
        // A PriceSeries is never empty, so neither is its frame.
        &self.rows[self.rows.len() - 1]
    }

    pub fn returns(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.daily_return).collect()
    }
}
