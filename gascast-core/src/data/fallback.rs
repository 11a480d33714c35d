//! Ordered fallback across price sources.
//!
//! Sources are tried in order. A result is accepted only when its latest
//! close lies inside the plausibility band and it has at least `min_bars`
//! bars; otherwise the next source is tried. If every source fails, the
//! individual errors are returned together.

use chrono::NaiveDate;
use tracing::{info, warn};

use super::provider::{DataError, FetchResult, PriceFetcher};
use crate::params::{PriceBand, ScoreParameters};

pub struct FallbackChain {
    fetchers: Vec<Box<dyn PriceFetcher>>,
    band: PriceBand,
    min_bars: usize,
}

impl FallbackChain {
    pub fn new(min_price: f64, max_price: f64) -> Self {
        Self {
            fetchers: Vec::new(),
            band: PriceBand {
                min: min_price,
                max: max_price,
            },
            min_bars: 1,
        }
    }

    /// Chain using the plausibility band from the scoring parameters.
    pub fn from_params(params: &ScoreParameters) -> Self {
        let band = params.price_band();
        Self::new(band.min, band.max)
    }

    /// Reject results with fewer than `min_bars` bars (quote-only sources
    /// when a history is needed).
    pub fn with_min_bars(mut self, min_bars: usize) -> Self {
        self.min_bars = min_bars.max(1);
        self
    }

    pub fn with(mut self, fetcher: Box<dyn PriceFetcher>) -> Self {
        self.fetchers.push(fetcher);
        self
    }

    pub fn push(&mut self, fetcher: Box<dyn PriceFetcher>) {
        self.fetchers.push(fetcher);
    }

    pub fn len(&self) -> usize {
        self.fetchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fetchers.is_empty()
    }

    fn accept(&self, source: &str, result: FetchResult) -> Result<FetchResult, DataError> {
        let price = result.series.last().close;
        if !self.band.contains(price) {
            return Err(DataError::ImplausiblePrice {
                source_name: source.to_string(),
                price,
                min: self.band.min,
                max: self.band.max,
            });
        }
        if result.series.len() < self.min_bars {
            return Err(DataError::TooFewBars {
                source_name: source.to_string(),
                bars: result.series.len(),
                required: self.min_bars,
            });
        }
        Ok(result)
    }
}

impl PriceFetcher for FallbackChain {
    fn name(&self) -> &str {
        "fallback_chain"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        if self.fetchers.is_empty() {
            return Err(DataError::NoSources);
        }

        let mut errors = Vec::new();
        for fetcher in &self.fetchers {
            let outcome = fetcher
                .fetch(symbol, start, end)
                .and_then(|result| self.accept(fetcher.name(), result));

            match outcome {
                Ok(result) => {
                    info!(
                        source = fetcher.name(),
                        %symbol,
                        bars = result.series.len(),
                        price = result.series.last().close,
                        "price fetched"
                    );
                    return Ok(result);
                }
                Err(e) => {
                    warn!(source = fetcher.name(), %symbol, error = %e, "price source failed");
                    errors.push((fetcher.name().to_string(), e));
                }
            }
        }

        Err(DataError::AllSourcesFailed(errors))
    }
}
