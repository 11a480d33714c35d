//! One trading day's observation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Daily price observation.
///
/// `high` and `low` are optional: spot quotes (EIA, TradingEconomics) carry
/// only a close. When absent, both default to `close`, which collapses the
/// bar's true range to pure close-to-close movement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: f64,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("bar {date}: close must be finite and positive, got {close}")]
    InvalidClose { date: NaiveDate, close: f64 },
}

impl PriceBar {
    /// Bar with a close only (spot quote).
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            close,
            high: None,
            low: None,
        }
    }

    pub fn with_range(date: NaiveDate, close: f64, high: f64, low: f64) -> Self {
        Self {
            date,
            close,
            high: Some(high),
            low: Some(low),
        }
    }

    /// High, or close when the bar carries no usable high.
    pub fn effective_high(&self) -> f64 {
        match self.high {
            Some(h) if h.is_finite() => h,
            _ => self.close,
        }
    }

    /// Low, or close when the bar carries no usable low.
    pub fn effective_low(&self) -> f64 {
        match self.low {
            Some(l) if l.is_finite() => l,
            _ => self.close,
        }
    }

    /// A bar is usable when its close is finite and strictly positive.
    pub fn validate(&self) -> Result<(), BarError> {
        if self.close.is_finite() && self.close > 0.0 {
            Ok(())
        } else {
            Err(BarError::InvalidClose {
                date: self.date,
                close: self.close,
            })
        }
    }
}
