//! Relative Strength Index (RSI), simple-average variant.
//!
//! Gains and losses are absolute close-to-close differences. Average gain and
//! average loss are plain means over the trailing `period` differences.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period (the first difference exists at bar 1).
//! Edge cases: avg_loss == 0 → RSI = 100; avg_gain == 0 → RSI = 0; both zero → 50.

use super::Indicator;
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period + 1 {
            return result;
        }

        // changes[i] = close[i] - close[i-1]; changes[0] is unused
        let mut changes = vec![0.0; n];
        for i in 1..n {
            changes[i] = bars[i].close - bars[i - 1].close;
        }

        for i in self.period..n {
            let mut gain = 0.0;
            let mut loss = 0.0;
            for &ch in &changes[(i + 1 - self.period)..=i] {
                if ch > 0.0 {
                    gain += ch;
                } else {
                    loss -= ch;
                }
            }
            result[i] = compute_rsi(gain / self.period as f64, loss / self.period as f64);
        }

        result
    }
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
