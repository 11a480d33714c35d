//! Indicator engine.
//!
//! Indicators are pure functions: bar history in, numeric series out. Each
//! one produces a `Vec<f64>` of the same length as its input, with
//! `f64::NAN` marking warmup positions. `IndicatorFrame` assembles them into
//! one row per bar and applies the per-indicator warmup policy (back-fill
//! for ATR and RSI, none for the SMAs).
//!
//! No value at bar t depends on bars after t, except the back-filled warmup
//! of ATR/RSI, which reuses the first fully-defined value.

pub mod atr;
pub mod frame;
pub mod returns;
pub mod rsi;
pub mod sma;

pub use atr::{true_range, Atr};
pub use frame::{IndicatorFrame, IndicatorRow};
pub use returns::Returns;
pub use rsi::Rsi;
pub use sma::Sma;

use crate::domain::PriceBar;

/// Single-series indicator over daily bars.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_15", "atr_14").
    fn name(&self) -> &str;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[PriceBar]) -> Vec<f64>;
}

/// Replace leading `NaN`s with the first finite value.
///
/// A series with no finite value is returned unchanged.
pub fn backfill(values: &mut [f64]) {
    if let Some(first) = values.iter().position(|v| v.is_finite()) {
        let seed = values[first];
        for v in &mut values[..first] {
            *v = seed;
        }
    }
}

/// Create close-only bars on consecutive days for testing.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar::from_close(base_date + chrono::Duration::days(i as i64), close))
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
