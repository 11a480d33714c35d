//! EIA (U.S. Energy Information Administration) v2 API fetcher.
//!
//! Reads the Henry Hub daily spot series. The EIA series id is fixed per
//! fetcher; the `symbol` argument is only echoed back in the result.
//! Spot prices carry no high/low.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use super::provider::{DataError, DataSource, FetchResult, PriceFetcher};
use super::{http_client, status_error, transport_error};
use crate::domain::{PriceBar, PriceSeries};

/// Henry Hub natural gas spot price, daily.
pub const HENRY_HUB_SERIES: &str = "NG.RNGWHHD.D";

#[derive(Debug, Deserialize)]
struct EiaResponse {
    response: EiaBody,
}

#[derive(Debug, Deserialize)]
struct EiaBody {
    data: Vec<EiaRow>,
}

#[derive(Debug, Deserialize)]
struct EiaRow {
    period: String,
    /// EIA returns numbers for some routes and strings for others.
    value: Option<serde_json::Value>,
}

pub struct EiaFetcher {
    client: reqwest::blocking::Client,
    api_key: String,
    series_id: String,
}

impl EiaFetcher {
    pub fn new(api_key: impl Into<String>) -> Result<Self, DataError> {
        Ok(Self {
            client: http_client()?,
            api_key: api_key.into(),
            series_id: HENRY_HUB_SERIES.to_string(),
        })
    }

    pub fn with_series(mut self, series_id: impl Into<String>) -> Self {
        self.series_id = series_id.into();
        self
    }

    fn data_url(&self, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "https://api.eia.gov/v2/natural-gas/pri/whd/data/\
             ?api_key={key}&frequency=daily&data[0]=value\
             &facets[series][]={series}\
             &start={start}&end={end}\
             &sort[0][column]=period&sort[0][direction]=desc&offset=0&length=5000",
            key = self.api_key,
            series = self.series_id,
        )
    }

    fn parse_value(value: &serde_json::Value) -> Option<f64> {
        match value {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Parse rows (any order) into an ascending series, skipping rows without a value.
    fn parse_response(resp: EiaResponse) -> Result<PriceSeries, DataError> {
        let mut bars = Vec::with_capacity(resp.response.data.len());
        for row in resp.response.data {
            let date = NaiveDate::parse_from_str(&row.period, "%Y-%m-%d").map_err(|e| {
                DataError::ResponseFormatChanged(format!("bad EIA period '{}': {e}", row.period))
            })?;
            if let Some(close) = row.value.as_ref().and_then(Self::parse_value) {
                bars.push(PriceBar::from_close(date, close));
            }
        }
        if bars.is_empty() {
            return Err(DataError::ResponseFormatChanged("EIA returned no values".into()));
        }
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Ok(PriceSeries::new(bars)?)
    }
}

impl PriceFetcher for EiaFetcher {
    fn name(&self) -> &str {
        "eia"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        if self.api_key.is_empty() {
            return Err(DataError::AuthenticationRequired("EIA_API_KEY is not set".into()));
        }
        debug!(series = %self.series_id, %start, %end, "requesting EIA data");

        let resp = self.client.get(self.data_url(start, end)).send().map_err(transport_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(status_error(self.name(), status));
        }
        let body: EiaResponse = resp
            .json()
            .map_err(|e| DataError::ResponseFormatChanged(format!("EIA response: {e}")))?;

        Ok(FetchResult {
            symbol: symbol.to_string(),
            series: Self::parse_response(body)?,
            source: DataSource::Eia,
        })
    }
}
