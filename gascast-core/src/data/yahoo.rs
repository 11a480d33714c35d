//! Yahoo Finance price fetcher.
//!
//! Fetches daily bars from Yahoo's v8 chart API. Futures quotes (e.g. `NG=F`,
//! `CL=F`) carry high/low; bars with no close are skipped.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use super::provider::{DataError, DataSource, FetchResult, PriceFetcher};
use super::{http_client, status_error, transport_error};
use crate::domain::{PriceBar, PriceSeries};

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

pub struct YahooFetcher {
    client: reqwest::blocking::Client,
}

impl YahooFetcher {
    pub fn new() -> Result<Self, DataError> {
        Ok(Self {
            client: http_client()?,
        })
    }

    /// Build the chart API URL for a symbol and date range.
    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let end_ts = end.and_time(chrono::NaiveTime::MIN).and_utc().timestamp() + 86_399;
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d"
        )
    }

    /// Parse the chart API response into a price series.
    ///
    /// Repeated dates (Yahoo sometimes emits an intraday bar for today next to
    /// the daily one) keep the last occurrence.
    fn parse_response(symbol: &str, resp: ChartResponse) -> Result<PriceSeries, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        let timestamps = data
            .timestamp
            .ok_or_else(|| DataError::ResponseFormatChanged("no timestamps".into()))?;

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let mut by_date: BTreeMap<NaiveDate, PriceBar> = BTreeMap::new();
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.date_naive())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            // Holidays and half-filled rows come back with a null close.
            let Some(close) = quote.close.get(i).copied().flatten() else {
                continue;
            };

            by_date.insert(
                date,
                PriceBar {
                    date,
                    close,
                    high: quote.high.get(i).copied().flatten(),
                    low: quote.low.get(i).copied().flatten(),
                },
            );
        }

        if by_date.is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        Ok(PriceSeries::new(by_date.into_values().collect())?)
    }
}

impl PriceFetcher for YahooFetcher {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let url = Self::chart_url(symbol, start, end);
        debug!(%symbol, %start, %end, "requesting Yahoo chart");

        let resp = self.client.get(&url).send().map_err(transport_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(status_error(self.name(), status));
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        Ok(FetchResult {
            symbol: symbol.to_string(),
            series: Self::parse_response(symbol, chart)?,
            source: DataSource::YahooFinance,
        })
    }
}
