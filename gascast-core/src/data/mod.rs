//! Price fetchers: the capability trait, concrete sources, and the fallback chain.

pub mod eia;
pub mod fallback;
pub mod provider;
pub mod synthetic;
pub mod trading_economics;
pub mod yahoo;

pub use eia::EiaFetcher;
pub use fallback::FallbackChain;
pub use provider::{DataError, DataSource, FetchResult, PriceFetcher};
pub use synthetic::SyntheticFetcher;
pub use trading_economics::TradingEconomicsFetcher;
pub use yahoo::YahooFetcher;

use std::time::Duration;

/// Per-request timeout for all HTTP sources.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn http_client() -> Result<reqwest::blocking::Client, DataError> {
    reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
        .build()
        .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))
}

/// Map a transport error from `reqwest` into a `DataError`.
pub(crate) fn transport_error(e: reqwest::Error) -> DataError {
    DataError::NetworkUnreachable(e.to_string())
}

/// Map a non-success status into a `DataError`.
pub(crate) fn status_error(source: &str, status: reqwest::StatusCode) -> DataError {
    match status {
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            DataError::AuthenticationRequired(format!("{source} returned HTTP {status}"))
        }
        reqwest::StatusCode::TOO_MANY_REQUESTS => DataError::RateLimited {
            source_name: source.to_string(),
        },
        _ => DataError::HttpStatus {
            source_name: source.to_string(),
            status: status.as_u16(),
        },
    }
}
