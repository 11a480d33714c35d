//! Run-over-run change detection between two forecasts.

use serde::{Deserialize, Serialize};

use crate::streak::Direction;

/// Relative change (percent) above which a new forecast is flagged.
pub const SIGNIFICANT_CHANGE_PCT: f64 = 10.0;

/// The parts of a previous forecast needed for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    pub probability_up: f64,
    pub trend: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeReport {
    /// `(current - previous) / |previous| * 100`; `None` when previous is 0.
    pub relative_change_pct: Option<f64>,
    pub trend_flipped: bool,
    pub significant: bool,
}

impl ChangeReport {
    pub fn compare(previous: &ForecastSnapshot, current: &ForecastSnapshot) -> Self {
        let relative_change_pct = (previous.probability_up != 0.0).then(|| {
            (current.probability_up - previous.probability_up) / previous.probability_up.abs()
                * 100.0
        });
        let trend_flipped = previous.trend != current.trend;
        let significant = trend_flipped
            || relative_change_pct.is_some_and(|pct| pct.abs() > SIGNIFICANT_CHANGE_PCT);

        Self {
            relative_change_pct,
            trend_flipped,
            significant,
        }
    }
}
