//! GasCast Core: the forecast heuristic and its price inputs.
//!
//! This crate contains the forecast heuristic and everything it reads:
//! - Domain types (price bars and validated price series)
//! - Indicator engine (return, true range/ATR, RSI, short/long SMA)
//! - Streak analyzer over trailing returns
//! - Scoring function producing a clamped 0–100 probability of a rise
//! - Oil-change alignment and run-over-run change detection
//! - Price fetcher trait with HTTP sources and an ordered fallback chain
//!
//! Indicator and scoring code is pure and performs no I/O.

pub mod change;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod oil;
pub mod params;
pub mod scoring;
pub mod streak;

pub use change::{ChangeReport, ForecastSnapshot};
pub use domain::{PriceBar, PriceSeries, SeriesError};
pub use indicators::{IndicatorFrame, IndicatorRow};
pub use oil::align_oil_changes;
pub use params::{ParamsError, PriceBand, ScoreParameters};
pub use scoring::{
    score, score_frame, score_with_oil, ForecastResult, ForecastStatus, TermContributions,
    NEUTRAL_PROBABILITY,
};
pub use streak::{Direction, Streak};
