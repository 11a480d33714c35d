//! TradingEconomics commodities quote fetcher.
//!
//! The commodities endpoint returns the latest quote for every commodity;
//! the matching entry becomes a one-bar series dated `end`.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use super::provider::{DataError, DataSource, FetchResult, PriceFetcher};
use super::{http_client, status_error, transport_error};
use crate::domain::{PriceBar, PriceSeries};

#[derive(Debug, Deserialize)]
struct CommodityQuote {
    #[serde(alias = "Name", default)]
    name: String,
    #[serde(alias = "Symbol", default)]
    symbol: String,
    #[serde(alias = "Last", default)]
    last: Option<f64>,
}

pub struct TradingEconomicsFetcher {
    client: reqwest::blocking::Client,
    api_key: String,
    /// Substring matched against the commodity name.
    commodity: String,
}

impl TradingEconomicsFetcher {
    pub fn new(api_key: impl Into<String>) -> Result<Self, DataError> {
        Ok(Self {
            client: http_client()?,
            api_key: api_key.into(),
            commodity: "Natural Gas".to_string(),
        })
    }

    pub fn with_commodity(mut self, commodity: impl Into<String>) -> Self {
        self.commodity = commodity.into();
        self
    }

    /// Positive last price of the quote named exactly like the commodity or
    /// carrying `symbol`; failing that, the first name containing it.
    fn pick_quote(&self, symbol: &str, quotes: &[CommodityQuote]) -> Option<f64> {
        let positive = |q: &CommodityQuote| q.last.filter(|&p| p > 0.0);
        quotes
            .iter()
            .filter(|q| q.name == self.commodity || q.symbol == symbol)
            .find_map(positive)
            .or_else(|| {
                quotes
                    .iter()
                    .filter(|q| q.name.contains(&self.commodity))
                    .find_map(positive)
            })
    }
}

impl PriceFetcher for TradingEconomicsFetcher {
    fn name(&self) -> &str {
        "trading_economics"
    }

    fn fetch(
        &self,
        symbol: &str,
        _start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        if self.api_key.is_empty() {
            return Err(DataError::AuthenticationRequired(
                "TRADINGECONOMICS_KEY is not set".into(),
            ));
        }
        debug!(commodity = %self.commodity, "requesting TradingEconomics quotes");

        let url = format!(
            "https://api.tradingeconomics.com/markets/commodities?c={}",
            self.api_key
        );
        let resp = self.client.get(url).send().map_err(transport_error)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(status_error(self.name(), status));
        }
        let quotes: Vec<CommodityQuote> = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("TradingEconomics response: {e}"))
        })?;

        let price = self
            .pick_quote(symbol, &quotes)
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: self.commodity.clone(),
            })?;

        Ok(FetchResult {
            symbol: symbol.to_string(),
            series: PriceSeries::new(vec![PriceBar::from_close(end, price)])?,
            source: DataSource::TradingEconomics,
        })
    }
}
