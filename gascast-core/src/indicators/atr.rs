//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|), with
//! high/low falling back to close per bar when absent.
//! ATR is the simple moving average of TR over `period` bars.
//! Lookback: period - 1 (TR[0] = high[0] - low[0] counts toward the first window).

use super::Indicator;
use crate::domain::PriceBar;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }
}

/// Compute the True Range series from bars.
/// TR[0] = high[0] - low[0] (no previous close).
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(bars: &[PriceBar]) -> Vec<f64> {
    let mut tr = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let h = bar.effective_high();
        let l = bar.effective_low();
        if i == 0 {
            tr.push(h - l);
        } else {
            let pc = bars[i - 1].close;
            tr.push((h - l).max((h - pc).abs()).max((l - pc).abs()));
        }
    }
    tr
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let tr = true_range(bars);
        let mut result = vec![f64::NAN; tr.len()];
        for i in (self.period - 1)..tr.len() {
            let window = &tr[(i + 1 - self.period)..=i];
            result[i] = window.iter().sum::<f64>() / self.period as f64;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};
    use chrono::NaiveDate;

    fn make_ohlc_bars(data: &[(f64, f64, f64)]) -> Vec<PriceBar> {
        let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        data.iter()
            .enumerate()
            .map(|(i, &(high, low, close))| {
                PriceBar::with_range(base_date + chrono::Duration::days(i as i64), close, high, low)
            })
            .collect()
    }

    #[test]
    fn true_range_basic() {
        let bars = make_ohlc_bars(&[
            (105.0, 95.0, 102.0),  // TR = 105-95 = 10
            (108.0, 100.0, 106.0), // TR = max(8, |108-102|, |100-102|) = 8
            (107.0, 98.0, 99.0),   // TR = max(9, |107-106|, |98-106|) = 9
        ]);
        let tr = true_range(&bars);
        assert_approx(tr[0], 10.0, DEFAULT_EPSILON);
        assert_approx(tr[1], 8.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        let bars = make_ohlc_bars(&[
            (102.0, 97.0, 100.0),
            (115.0, 108.0, 112.0), // TR = max(7, |115-100|, |108-100|) = 15
        ]);
        let tr = true_range(&bars);
        assert_approx(tr[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_without_high_low_is_close_to_close() {
        let tr = true_range(&make_bars(&[3.0, 3.5, 3.2]));
        assert_eq!(tr[0], 0.0);
        assert_approx(tr[1], 0.5, DEFAULT_EPSILON);
        assert_approx(tr[2], 0.3, DEFAULT_EPSILON);
    }

    #[test]
    fn partially_populated_series_falls_back_per_bar() {
        let mut bars = make_ohlc_bars(&[(105.0, 95.0, 102.0), (108.0, 100.0, 106.0)]);
        bars[1].high = None;
        bars[1].low = None;
        let tr = true_range(&bars);
        assert_approx(tr[0], 10.0, DEFAULT_EPSILON);
        // high = low = close = 106 → |106-102| = 4
        assert_approx(tr[1], 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_period_3() {
        let bars = make_ohlc_bars(&[
            (105.0, 95.0, 102.0),  // TR = 10
            (108.0, 100.0, 106.0), // TR = 8
            (107.0, 98.0, 99.0),   // TR = 9
            (103.0, 97.0, 101.0),  // TR = 6
            (106.0, 100.0, 105.0), // TR = 6
        ]);
        let result = Atr::new(3).compute(&bars);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 9.0, DEFAULT_EPSILON); // (10+8+9)/3
        assert_approx(result[3], 23.0 / 3.0, DEFAULT_EPSILON); // (8+9+6)/3
        assert_approx(result[4], 7.0, DEFAULT_EPSILON); // (9+6+6)/3
    }

    #[test]
    fn atr_too_few_bars() {
        let result = Atr::new(5).compute(&make_bars(&[1.0, 2.0]));
        assert!(result.iter().all(|v| v.is_nan()));
    }
}
