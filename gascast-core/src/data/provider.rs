//! Price fetcher trait and structured error types.
//!
//! The PriceFetcher trait abstracts over data sources (Yahoo Finance, EIA,
//! TradingEconomics, synthetic) so the workflow can try them in order and
//! tests can substitute fakes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PriceSeries, SeriesError};

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("{source_name} returned HTTP {status}")]
    HttpStatus { source_name: String, status: u16 },

    #[error("rate limited by {source_name}")]
    RateLimited { source_name: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("{source_name} quoted {price}, outside plausible band ({min}, {max})")]
    ImplausiblePrice {
        source_name: String,
        price: f64,
        min: f64,
        max: f64,
    },

    #[error("{source_name} returned {bars} bars, {required} required")]
    TooFewBars {
        source_name: String,
        bars: usize,
        required: usize,
    },

    #[error("invalid series: {0}")]
    InvalidSeries(#[from] SeriesError),

    #[error("no price source configured")]
    NoSources,

    #[error("all price sources failed: {}", summarize(.0))]
    AllSourcesFailed(Vec<(String, DataError)>),

    #[error("data error: {0}")]
    Other(String),
}

fn summarize(errors: &[(String, DataError)]) -> String {
    errors
        .iter()
        .map(|(name, err)| format!("{name}: {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    YahooFinance,
    Eia,
    TradingEconomics,
    Synthetic,
    History,
}

/// Result of a successful fetch.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub series: PriceSeries,
    pub source: DataSource,
}

/// A source of daily prices.
///
/// Implementations handle the specifics of one source and make a single
/// request per call; ordering and plausibility checks live in
/// `FallbackChain`. Quote-only sources return a one-bar series dated `end`.
pub trait PriceFetcher: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch daily bars for a symbol over a date range (inclusive).
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<FetchResult, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_sources_failed_lists_each_source() {
        let err = DataError::AllSourcesFailed(vec![
            ("eia".into(), DataError::NetworkUnreachable("timeout".into())),
            (
                "yahoo_finance".into(),
                DataError::SymbolNotFound {
                    symbol: "NG=F".into(),
                },
            ),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("eia: network unreachable: timeout"));
        assert!(msg.contains("yahoo_finance: symbol not found: NG=F"));
    }
}
