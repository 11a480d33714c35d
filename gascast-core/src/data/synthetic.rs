//! Deterministic synthetic prices for offline runs and tests.
//!
//! A seeded random walk; the same symbol and date range always produce the
//! same series. Results built on synthetic data are tagged
//! `DataSource::Synthetic`.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{DataError, DataSource, FetchResult, PriceFetcher};
use crate::domain::{PriceBar, PriceSeries};

#[derive(Debug, Clone)]
pub struct SyntheticFetcher {
    start_price: f64,
    max_daily_move: f64,
}

impl Default for SyntheticFetcher {
    fn default() -> Self {
        Self {
            start_price: 3.0,
            max_daily_move: 0.03,
        }
    }
}

impl SyntheticFetcher {
    pub fn new(start_price: f64, max_daily_move: f64) -> Self {
        Self {
            start_price,
            max_daily_move,
        }
    }
}

impl PriceFetcher for SyntheticFetcher {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        // Deterministic seed from symbol name
        let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        let mut bars = Vec::new();
        let mut price = self.start_price;
        let mut current = start;

        while current <= end {
            if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                let daily_return: f64 = rng.gen_range(-self.max_daily_move..=self.max_daily_move);
                let open = price;
                let close = price * (1.0 + daily_return);
                let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
                let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
                bars.push(PriceBar::with_range(current, close, high, low));
                price = close;
            }
            current += chrono::Duration::days(1);
        }

        if bars.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        Ok(FetchResult {
            symbol: symbol.to_string(),
            series: PriceSeries::new(bars)?,
            source: DataSource::Synthetic,
        })
    }
}
