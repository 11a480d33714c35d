//! Simple Moving Average (SMA) of close.
//!
//! Lookback: period - 1 (first valid value at index period-1). Warmup stays
//! `NaN`; callers must treat it as "not available".

use super::Indicator;
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        // Each window is summed from scratch so equal windows give bit-equal means.
        for i in (self.period - 1)..n {
            let sum: f64 = bars[(i + 1 - self.period)..=i].iter().map(|b| b.close).sum();
            result[i] = sum / self.period as f64;
        }

        result
    }
}
