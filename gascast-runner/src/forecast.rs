//! Daily forecast workflow.
//!
//! 1. Load the price history, or seed it from the history sources.
//! 2. Fetch the latest quote and append it if its date is new.
//! 3. Optionally fetch oil prices and align their changes to the gas dates.
//! 4. Score, compare with the previous run, write the report and snapshot.

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use gascast_core::data::{
    EiaFetcher, FallbackChain, PriceFetcher, SyntheticFetcher, TradingEconomicsFetcher,
    YahooFetcher,
};
use gascast_core::{align_oil_changes, score_with_oil, ChangeReport, PriceSeries};
use tracing::{debug, info, warn};

use crate::config::{ForecastConfig, SourceKind};
use crate::history::{append_quote, load_history, save_history};
use crate::report::{load_previous, render_report, save_snapshot, write_report, SavedForecast};

pub const TRADING_ECONOMICS_KEY_VAR: &str = "TRADINGECONOMICS_KEY";
pub const EIA_KEY_VAR: &str = "EIA_API_KEY";

/// Days looked back when asking a source for its latest quote.
const QUOTE_LOOKBACK_DAYS: i64 = 7;

/// API keys for the keyed sources.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    pub trading_economics: Option<String>,
    pub eia: Option<String>,
}

impl ApiKeys {
    /// Read keys from the environment; empty values count as unset.
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            trading_economics: var(TRADING_ECONOMICS_KEY_VAR),
            eia: var(EIA_KEY_VAR),
        }
    }
}

/// Fetchers used by one forecast run.
///
/// `history` seeds a missing history file and only accepts results with
/// enough bars to score; `quote` supplies the latest price.
pub struct PriceSources {
    pub history: FallbackChain,
    pub quote: FallbackChain,
    pub oil: Option<Box<dyn PriceFetcher>>,
}

impl PriceSources {
    /// Offline sources: synthetic gas (and oil, when configured).
    pub fn synthetic(config: &ForecastConfig) -> Self {
        let chain = || {
            FallbackChain::from_params(&config.params).with(Box::new(SyntheticFetcher::default()))
        };
        Self {
            history: chain().with_min_bars(config.params.min_history()),
            quote: chain(),
            oil: config
                .sources
                .oil_symbol
                .as_ref()
                .map(|_| Box::new(synthetic_oil()) as Box<dyn PriceFetcher>),
        }
    }
}

fn synthetic_oil() -> SyntheticFetcher {
    SyntheticFetcher::new(75.0, 0.02)
}

/// Sources that return a multi-day history rather than a single quote.
fn serves_history(kind: SourceKind) -> bool {
    !matches!(kind, SourceKind::TradingEconomics)
}

/// Build one fetcher; keyed sources without a key yield `None`.
fn fetcher_for(
    kind: SourceKind,
    config: &ForecastConfig,
    keys: &ApiKeys,
) -> Result<Option<Box<dyn PriceFetcher>>> {
    let fetcher: Box<dyn PriceFetcher> = match kind {
        SourceKind::TradingEconomics => match &keys.trading_economics {
            Some(key) => Box::new(
                TradingEconomicsFetcher::new(key.clone())?
                    .with_commodity(config.sources.trading_economics_commodity.clone()),
            ),
            None => {
                warn!(
                    var = TRADING_ECONOMICS_KEY_VAR,
                    "key not set, skipping TradingEconomics"
                );
                return Ok(None);
            }
        },
        SourceKind::Eia => match &keys.eia {
            Some(key) => Box::new(
                EiaFetcher::new(key.clone())?.with_series(config.sources.eia_series.clone()),
            ),
            None => {
                warn!(var = EIA_KEY_VAR, "key not set, skipping EIA");
                return Ok(None);
            }
        },
        SourceKind::Yahoo => Box::new(YahooFetcher::new()?),
        SourceKind::Synthetic => Box::new(SyntheticFetcher::default()),
    };
    Ok(Some(fetcher))
}

/// Build the sources named in `[sources]`.
///
/// The quote chain follows `order`. The history chain keeps the
/// history-capable sources in the same order and falls back to Yahoo when
/// none is configured.
pub fn build_sources(config: &ForecastConfig, keys: &ApiKeys) -> Result<PriceSources> {
    let mut quote = FallbackChain::from_params(&config.params);
    let mut history =
        FallbackChain::from_params(&config.params).with_min_bars(config.params.min_history());

    for &kind in &config.sources.order {
        if let Some(fetcher) = fetcher_for(kind, config, keys)? {
            quote.push(fetcher);
        }
        if serves_history(kind) {
            if let Some(fetcher) = fetcher_for(kind, config, keys)? {
                history.push(fetcher);
            }
        }
    }
    if quote.is_empty() {
        anyhow::bail!("no usable price source (check {TRADING_ECONOMICS_KEY_VAR} / {EIA_KEY_VAR})");
    }
    if history.is_empty() {
        debug!("no history-capable source configured, seeding from Yahoo");
        history.push(Box::new(YahooFetcher::new()?));
    }

    Ok(PriceSources {
        history,
        quote,
        oil: build_oil_source(config)?,
    })
}

/// Oil source for `sources.oil_symbol`: synthetic when every configured
/// source is synthetic, Yahoo otherwise.
pub fn build_oil_source(config: &ForecastConfig) -> Result<Option<Box<dyn PriceFetcher>>> {
    let oil: Option<Box<dyn PriceFetcher>> = match &config.sources.oil_symbol {
        None => None,
        Some(_) if config.sources.order.iter().all(|k| *k == SourceKind::Synthetic) => {
            Some(Box::new(synthetic_oil()))
        }
        Some(_) => Some(Box::new(YahooFetcher::new()?)),
    };
    Ok(oil)
}

/// Everything one forecast run produced.
#[derive(Debug, Clone)]
pub struct ForecastOutcome {
    pub saved: SavedForecast,
    pub change: Option<ChangeReport>,
    pub report: String,
    /// Whether the latest quote added a new bar to the history.
    pub appended: bool,
    pub history_len: usize,
}

/// Run the daily workflow as of `now`.
pub fn run_daily(
    config: &ForecastConfig,
    sources: &PriceSources,
    now: NaiveDateTime,
) -> Result<ForecastOutcome> {
    let today = now.date();
    let symbol = config.sources.symbol.as_str();
    let paths = &config.paths;

    let mut series = if paths.history.exists() {
        load_history(&paths.history)?
    } else {
        let start = today - Duration::days(config.sources.history_days);
        let seeded = sources.history.fetch(symbol, start, today).with_context(|| {
            format!(
                "failed to seed {} days of {symbol} history",
                config.sources.history_days
            )
        })?;
        info!(bars = seeded.series.len(), source = ?seeded.source, "history seeded");
        seeded.series
    };

    let quote = sources
        .quote
        .fetch(symbol, today - Duration::days(QUOTE_LOOKBACK_DAYS), today)
        .with_context(|| format!("failed to fetch current {symbol} price"))?;
    let latest = *quote.series.last();
    let appended = if latest.date > series.last().date {
        append_quote(&mut series, latest.date, latest.close)
            .with_context(|| format!("failed to append quote for {}", latest.date))?
    } else {
        debug!(date = %latest.date, last = %series.last().date, "quote already covered by history");
        false
    };
    if appended {
        info!(date = %latest.date, price = latest.close, source = ?quote.source, "price appended");
    }
    save_history(&paths.history, &series)?;

    let oil_changes = oil_changes_for(config, sources.oil.as_deref(), &series);

    let result = score_with_oil(&series, &config.params, oil_changes.as_deref());
    if result.is_neutral_fallback() {
        warn!(
            bars = series.len(),
            required = config.params.min_history(),
            "insufficient history, neutral probability"
        );
    }

    let previous = load_previous(&paths.previous)?;
    let saved = SavedForecast::new(
        result,
        now,
        Some(quote.source),
        config.params.fingerprint(),
    );
    let change = previous
        .as_ref()
        .map(|prev| ChangeReport::compare(&prev.snapshot(), &saved.snapshot()));
    if change.is_some_and(|c| c.significant) {
        warn!(
            probability_up = saved.result.probability_up,
            trend = %saved.result.trend,
            "significant change or trend reversal"
        );
    }

    let report = render_report(&saved, change.as_ref());
    write_report(&paths.result, &report)?;
    save_snapshot(&paths.previous, &saved)?;
    info!(
        probability_up = saved.result.probability_up,
        trend = %saved.result.trend,
        path = %paths.result.display(),
        "forecast written"
    );

    Ok(ForecastOutcome {
        saved,
        change,
        report,
        appended,
        history_len: series.len(),
    })
}

/// Oil changes aligned to `gas` when an oil symbol and source are
/// available. A failed fetch drops the oil term for this run.
pub fn oil_changes_for(
    config: &ForecastConfig,
    fetcher: Option<&dyn PriceFetcher>,
    gas: &PriceSeries,
) -> Option<Vec<f64>> {
    let oil_symbol = config.sources.oil_symbol.as_deref()?;
    let fetcher = fetcher?;
    let start = gas.bars()[0].date - Duration::days(QUOTE_LOOKBACK_DAYS);
    match fetcher.fetch(oil_symbol, start, gas.last().date) {
        Ok(oil) => {
            debug!(symbol = oil_symbol, bars = oil.series.len(), "oil prices fetched");
            Some(align_oil_changes(gas, &oil.series))
        }
        Err(e) => {
            warn!(symbol = oil_symbol, error = %e, "oil prices unavailable, scoring without oil");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_skip_keyed_sources() {
        let mut config = ForecastConfig::default();
        config.sources.order = vec![SourceKind::TradingEconomics, SourceKind::Synthetic];
        let sources = build_sources(&config, &ApiKeys::default()).unwrap();
        assert_eq!(sources.quote.len(), 1);
        assert_eq!(sources.history.len(), 1);
        assert!(sources.oil.is_none());
    }

    #[test]
    fn quote_only_source_is_left_out_of_history_chain() {
        let mut config = ForecastConfig::default();
        config.sources.order = vec![SourceKind::TradingEconomics, SourceKind::Synthetic];
        let keys = ApiKeys {
            trading_economics: Some("key".into()),
            eia: None,
        };
        let sources = build_sources(&config, &keys).unwrap();
        assert_eq!(sources.quote.len(), 2);
        assert_eq!(sources.history.len(), 1);
    }

    #[test]
    fn only_keyed_sources_without_keys_is_an_error() {
        let mut config = ForecastConfig::default();
        config.sources.order = vec![SourceKind::Eia];
        assert!(build_sources(&config, &ApiKeys::default()).is_err());
    }

    #[test]
    fn synthetic_only_config_uses_synthetic_oil() {
        let mut config = ForecastConfig::default();
        config.sources.order = vec![SourceKind::Synthetic];
        config.sources.oil_symbol = Some("CL=F".into());
        let sources = build_sources(&config, &ApiKeys::default()).unwrap();
        assert_eq!(sources.oil.map(|f| f.name().to_string()).as_deref(), Some("synthetic"));
    }

    #[test]
    fn oil_changes_follow_the_gas_dates() {
        let mut config = ForecastConfig::default();
        config.sources.order = vec![SourceKind::Synthetic];
        config.sources.oil_symbol = Some("CL=F".into());
        let gas = PriceSeries::from_closes(
            chrono::NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            &[2.5, 2.6, 2.7, 2.6, 2.8],
        )
        .unwrap();
        let oil = build_oil_source(&config).unwrap();

        let changes = oil_changes_for(&config, oil.as_deref(), &gas).unwrap();
        assert_eq!(changes.len(), gas.len());
        assert_eq!(changes[0], 0.0);
        assert!(changes[1..].iter().any(|&c| c != 0.0));

        config.sources.oil_symbol = None;
        assert!(oil_changes_for(&config, oil.as_deref(), &gas).is_none());
    }
}
