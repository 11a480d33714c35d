//! Scoring parameters: one immutable value per run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamsError {
    #[error("{name} must be >= 1")]
    ZeroPeriod { name: &'static str },

    #[error("sma_short_window ({short}) must be smaller than sma_long_window ({long})")]
    WindowOrder { short: usize, long: usize },

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("min_price ({min}) must be below max_price ({max})")]
    PriceBand { min: f64, max: f64 },
}

/// Exclusive bounds for a plausible quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    pub min: f64,
    pub max: f64,
}

impl PriceBand {
    pub fn contains(&self, price: f64) -> bool {
        price.is_finite() && price > self.min && price < self.max
    }
}

/// Weights, windows and bounds for the forecast heuristic.
///
/// `min_price`/`max_price` are only used by the fetcher chain to reject
/// implausible quotes; the scoring engine ignores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreParameters {
    pub sma_short_window: usize,
    pub sma_long_window: usize,
    pub w_sma: f64,
    pub w_rsi: f64,
    pub w_atr: f64,
    pub w_streak: f64,
    pub w_oil: f64,
    pub rsi_period: usize,
    pub atr_period: usize,
    pub chain_max: usize,
    pub min_price: f64,
    pub max_price: f64,
    /// Multiplier applied to return/ATR before `tanh`.
    pub atr_scale: f64,
}

impl Default for ScoreParameters {
    fn default() -> Self {
        Self {
            sma_short_window: 15,
            sma_long_window: 40,
            w_sma: 8.0,
            w_rsi: 1.0,
            w_atr: 5.0,
            w_streak: 1.5,
            w_oil: 5.0,
            rsi_period: 14,
            atr_period: 14,
            chain_max: 14,
            min_price: 1.0,
            max_price: 50.0,
            atr_scale: 2.0,
        }
    }
}

impl ScoreParameters {
    pub fn validate(&self) -> Result<(), ParamsError> {
        for (name, value) in [
            ("sma_short_window", self.sma_short_window),
            ("sma_long_window", self.sma_long_window),
            ("rsi_period", self.rsi_period),
            ("atr_period", self.atr_period),
            ("chain_max", self.chain_max),
        ] {
            if value == 0 {
                return Err(ParamsError::ZeroPeriod { name });
            }
        }
        if self.sma_short_window >= self.sma_long_window {
            return Err(ParamsError::WindowOrder {
                short: self.sma_short_window,
                long: self.sma_long_window,
            });
        }
        for (name, value) in [
            ("w_sma", self.w_sma),
            ("w_rsi", self.w_rsi),
            ("w_atr", self.w_atr),
            ("w_streak", self.w_streak),
            ("w_oil", self.w_oil),
            ("atr_scale", self.atr_scale),
            ("min_price", self.min_price),
            ("max_price", self.max_price),
        ] {
            if !value.is_finite() {
                return Err(ParamsError::NonFinite { name, value });
            }
        }
        if self.min_price >= self.max_price {
            return Err(ParamsError::PriceBand {
                min: self.min_price,
                max: self.max_price,
            });
        }
        Ok(())
    }

    /// Bars needed before every indicator the scorer reads can be defined.
    pub fn min_history(&self) -> usize {
        self.sma_long_window
            .max(self.atr_period)
            .max(self.rsi_period)
    }

    pub fn price_band(&self) -> PriceBand {
        PriceBand {
            min: self.min_price,
            max: self.max_price,
        }
    }

    /// Whether a quote lies inside the plausibility band (exclusive bounds).
    pub fn is_plausible_price(&self, price: f64) -> bool {
        self.price_band().contains(price)
    }

    /// Deterministic BLAKE3 hash of the canonical JSON form.
    ///
    /// Two runs with identical parameters share a fingerprint, so persisted
    /// reports can be traced back to the parameter set that produced them.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
