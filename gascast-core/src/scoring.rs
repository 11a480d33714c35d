//! Scoring function. Combines indicators, streak and oil move into a
//! bounded probability of a price increase.
//!
//! Starting from 50:
//! 1. trend:      +w_sma if sma_short > sma_long, else -w_sma (ties go to the else branch)
//! 2. momentum:   (rsi - 50) * w_rsi / 10
//! 3. move/ATR:   tanh(return / atr * atr_scale) * w_atr, only when atr > 0
//! 4. streak:     sign * streak_length * w_streak
//! 5. oil:        oil_change * 100 * w_oil, only when an oil series is supplied
//!
//! The sum is clamped to [0, 100]. Insufficient history yields exactly 50
//! with `ForecastStatus::InsufficientHistory`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::PriceSeries;
use crate::indicators::IndicatorFrame;
use crate::params::ScoreParameters;
use crate::streak::{self, Direction, Streak};

/// "No opinion" probability.
pub const NEUTRAL_PROBABILITY: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastStatus {
    /// All indicators were defined at the last bar.
    Scored,
    /// Too few bars or an undefined indicator; probability is neutral.
    InsufficientHistory,
}

/// Per-term contributions to the probability, before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TermContributions {
    pub trend: f64,
    pub momentum: f64,
    pub volatility_move: f64,
    pub streak: f64,
    pub oil: f64,
}

impl TermContributions {
    pub fn total(&self) -> f64 {
        self.trend + self.momentum + self.volatility_move + self.streak + self.oil
    }
}

/// Last-bar values the formula reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub sma_short: f64,
    pub sma_long: f64,
    pub rsi: f64,
    pub atr: f64,
    pub last_return: f64,
    pub streak: Streak,
    pub oil_change: Option<f64>,
}

/// Apply the linear/tanh formula. Returns the clamped probability and the
/// unclamped per-term breakdown.
pub fn combine(inputs: &ScoreInputs, params: &ScoreParameters) -> (f64, TermContributions) {
    let trend = if inputs.sma_short > inputs.sma_long {
        params.w_sma
    } else {
        -params.w_sma
    };

    let momentum = (inputs.rsi - 50.0) * params.w_rsi / 10.0;

    let volatility_move = if inputs.atr > 0.0 {
        (inputs.last_return / inputs.atr * params.atr_scale).tanh() * params.w_atr
    } else {
        0.0
    };

    let streak = inputs.streak.signed_length() * params.w_streak;

    let oil = match inputs.oil_change {
        Some(change) if change.is_finite() => change * 100.0 * params.w_oil,
        _ => 0.0,
    };

    let terms = TermContributions {
        trend,
        momentum,
        volatility_move,
        streak,
        oil,
    };
    let probability = (NEUTRAL_PROBABILITY + terms.total()).clamp(0.0, 100.0);
    (probability, terms)
}

/// Result of scoring one series snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub date: NaiveDate,
    pub probability_up: f64,
    pub trend: Direction,
    pub last_close: f64,
    pub streak_length: usize,
    pub streak_direction: Direction,
    pub status: ForecastStatus,
    /// Breakdown of the formula; `None` for a neutral fallback.
    pub terms: Option<TermContributions>,
}

impl ForecastResult {
    pub fn probability_down(&self) -> f64 {
        100.0 - self.probability_up
    }

    pub fn is_neutral_fallback(&self) -> bool {
        self.status == ForecastStatus::InsufficientHistory
    }
}

fn trend_for(probability_up: f64) -> Direction {
    if probability_up >= NEUTRAL_PROBABILITY {
        Direction::Up
    } else {
        Direction::Down
    }
}

/// Score a series without an oil series.
///
/// Parameters are expected to be validated (`ScoreParameters::validate`);
/// configuration loading does this once per run.
pub fn score(series: &PriceSeries, params: &ScoreParameters) -> ForecastResult {
    score_with_oil(series, params, None)
}

/// Score a series, optionally with per-bar oil changes aligned to its dates
/// (see `oil::align_oil_changes`).
pub fn score_with_oil(
    series: &PriceSeries,
    params: &ScoreParameters,
    oil_changes: Option<&[f64]>,
) -> ForecastResult {
    let frame = IndicatorFrame::compute(series, params);
    score_frame(&frame, params, oil_changes)
}

/// Score a precomputed frame.
pub fn score_frame(
    frame: &IndicatorFrame,
    params: &ScoreParameters,
    oil_changes: Option<&[f64]>,
) -> ForecastResult {
    let last = frame.last();
    let streak = streak::analyze(&frame.returns(), params.chain_max);

    let neutral = || ForecastResult {
        date: last.date,
        probability_up: NEUTRAL_PROBABILITY,
        trend: trend_for(NEUTRAL_PROBABILITY),
        last_close: last.close,
        streak_length: streak.length,
        streak_direction: streak.direction,
        status: ForecastStatus::InsufficientHistory,
        terms: None,
    };

    if frame.len() < params.min_history() {
        debug!(
            bars = frame.len(),
            required = params.min_history(),
            "too few bars, using neutral probability"
        );
        return neutral();
    }

    let (Some(sma_short), Some(sma_long), Some(rsi), Some(atr)) =
        (last.sma_short, last.sma_long, last.rsi, last.atr)
    else {
        debug!(date = %last.date, "indicator undefined at last bar, using neutral probability");
        return neutral();
    };

    let oil_change = oil_changes.map(|changes| changes.get(frame.len() - 1).copied().unwrap_or(0.0));

    let inputs = ScoreInputs {
        sma_short,
        sma_long,
        rsi,
        atr,
        last_return: last.daily_return,
        streak,
        oil_change,
    };
    let (probability_up, terms) = combine(&inputs, params);

    ForecastResult {
        date: last.date,
        probability_up,
        trend: trend_for(probability_up),
        last_close: last.close,
        streak_length: streak.length,
        streak_direction: streak.direction,
        status: ForecastStatus::Scored,
        terms: Some(terms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    fn inputs() -> ScoreInputs {
        ScoreInputs {
            sma_short: 3.1,
            sma_long: 3.0,
            rsi: 60.0,
            atr: 0.2,
            last_return: 0.01,
            streak: streak::analyze(&[0.01, 0.02], 14),
            oil_change: None,
        }
    }

    #[test]
    fn combine_adds_every_term() {
        let params = ScoreParameters::default();
        let (p, terms) = combine(&inputs(), &params);
        assert_approx(terms.trend, 8.0, DEFAULT_EPSILON);
        assert_approx(terms.momentum, 1.0, DEFAULT_EPSILON);
        assert_approx(terms.volatility_move, (0.01_f64 / 0.2 * 2.0).tanh() * 5.0, DEFAULT_EPSILON);
        assert_approx(terms.streak, 3.0, DEFAULT_EPSILON);
        assert_eq!(terms.oil, 0.0);
        assert_approx(p, 50.0 + terms.total(), DEFAULT_EPSILON);
    }

    #[test]
    fn sma_tie_counts_as_down_trend() {
        let mut i = inputs();
        i.sma_short = 3.0;
        let (_, terms) = combine(&i, &ScoreParameters::default());
        assert_eq!(terms.trend, -8.0);
    }

    #[test]
    fn zero_atr_disables_move_term() {
        let mut i = inputs();
        i.atr = 0.0;
        let (_, terms) = combine(&i, &ScoreParameters::default());
        assert_eq!(terms.volatility_move, 0.0);
    }

    #[test]
    fn oil_term() {
        let mut i = inputs();
        i.oil_change = Some(0.02);
        let (_, terms) = combine(&i, &ScoreParameters::default());
        assert_approx(terms.oil, 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn result_is_clamped() {
        let mut i = inputs();
        i.rsi = 100.0;
        i.oil_change = Some(0.5);
        let (p, terms) = combine(&i, &ScoreParameters::default());
        assert_eq!(p, 100.0);
        assert!(terms.total() > 50.0);

        i.sma_short = 2.0;
        i.rsi = 0.0;
        i.oil_change = Some(-0.5);
        let (p, _) = combine(&i, &ScoreParameters::default());
        assert_eq!(p, 0.0);
    }

    #[test]
    fn trend_label_boundary() {
        assert_eq!(trend_for(50.0), Direction::Up);
        assert_eq!(trend_for(49.999), Direction::Down);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "invalid score parameters")]
    fn unvalidated_zero_period_is_reported() {
        let series = PriceSeries::from_closes(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            &[3.0; 50],
        )
        .unwrap();
        let params = ScoreParameters {
            atr_period: 0,
            ..Default::default()
        };
        score(&series, &params);
    }
}
