//! Forecast configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) yields the
//! daily natural-gas setup. API keys are never stored here; they come from
//! the environment.

use std::path::{Path, PathBuf};

use gascast_core::data::eia::HENRY_HUB_SERIES;
use gascast_core::{ParamsError, ScoreParameters};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid score parameters: {0}")]
    Params(#[from] ParamsError),

    #[error("{0} must be >= 1")]
    ZeroSetting(&'static str),

    #[error("{0} must not be empty")]
    EmptySetting(&'static str),

    #[error("at least one price source must be configured")]
    NoSources,
}

/// Price sources, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    TradingEconomics,
    Eia,
    Yahoo,
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSettings {
    /// Number of predictions per hit-rate window.
    pub window: usize,
    /// Evaluate every `stride`-th window end.
    pub stride: usize,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            window: 30,
            stride: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub history: PathBuf,
    pub result: PathBuf,
    pub previous: PathBuf,
    pub accuracy: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            history: PathBuf::from("gas_history.csv"),
            result: PathBuf::from("result.txt"),
            previous: PathBuf::from("previous_result.json"),
            accuracy: PathBuf::from("rolling_accuracy.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub order: Vec<SourceKind>,
    /// Ticker used by Yahoo (and echoed by quote-only sources).
    pub symbol: String,
    /// Oil ticker for the oil-correlation term; `None` disables it.
    pub oil_symbol: Option<String>,
    /// Days of history to seed when no history file exists.
    pub history_days: i64,
    /// EIA series id read by the `eia` source.
    pub eia_series: String,
    /// Commodity name looked up by the `trading_economics` source.
    pub trading_economics_commodity: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            order: vec![
                SourceKind::TradingEconomics,
                SourceKind::Eia,
                SourceKind::Yahoo,
            ],
            symbol: "NG=F".to_string(),
            oil_symbol: None,
            history_days: 60,
            eia_series: HENRY_HUB_SERIES.to_string(),
            trading_economics_commodity: "Natural Gas".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub params: ScoreParameters,
    pub backtest: BacktestSettings,
    pub paths: PathsConfig,
    pub sources: SourcesConfig,
}

impl ForecastConfig {
    /// Load from a TOML file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params.validate()?;
        if self.backtest.window == 0 {
            return Err(ConfigError::ZeroSetting("backtest.window"));
        }
        if self.backtest.stride == 0 {
            return Err(ConfigError::ZeroSetting("backtest.stride"));
        }
        if self.sources.history_days < 1 {
            return Err(ConfigError::ZeroSetting("sources.history_days"));
        }
        if self.sources.order.is_empty() {
            return Err(ConfigError::NoSources);
        }
        if self.sources.eia_series.trim().is_empty() {
            return Err(ConfigError::EmptySetting("sources.eia_series"));
        }
        if self.sources.trading_economics_commodity.trim().is_empty() {
            return Err(ConfigError::EmptySetting("sources.trading_economics_commodity"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = ForecastConfig::from_toml("").unwrap();
        assert_eq!(config, ForecastConfig::default());
        assert_eq!(config.backtest.window, 30);
        assert_eq!(config.sources.order.len(), 3);
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config = ForecastConfig::from_toml(
            r#"
            [params]
            w_sma = 5.0
            w_streak = 1.0
            atr_scale = 1.0

            [backtest]
            stride = 5

            [sources]
            order = ["yahoo", "synthetic"]
            oil_symbol = "CL=F"
            "#,
        )
        .unwrap();
        assert_eq!(config.params.w_sma, 5.0);
        assert_eq!(config.params.atr_scale, 1.0);
        assert_eq!(config.params.sma_long_window, 40);
        assert_eq!(config.backtest.window, 30);
        assert_eq!(config.backtest.stride, 5);
        assert_eq!(config.sources.order, vec![SourceKind::Yahoo, SourceKind::Synthetic]);
        assert_eq!(config.sources.oil_symbol.as_deref(), Some("CL=F"));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let err = ForecastConfig::from_toml("[params]\nsma_short_window = 50\n").unwrap_err();
        assert!(matches!(err, ConfigError::Params(_)));
    }

    #[test]
    fn zero_stride_is_rejected() {
        let err = ForecastConfig::from_toml("[backtest]\nstride = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroSetting("backtest.stride")));
    }

    #[test]
    fn empty_source_list_is_rejected() {
        let err = ForecastConfig::from_toml("[sources]\norder = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::NoSources));
    }

    #[test]
    fn source_identifiers_are_configurable() {
        let config = ForecastConfig::from_toml(
            "[sources]\neia_series = \"NG.RNGC1.D\"\ntrading_economics_commodity = \"Natural Gas US\"\n",
        )
        .unwrap();
        assert_eq!(config.sources.eia_series, "NG.RNGC1.D");
        assert_eq!(config.sources.trading_economics_commodity, "Natural Gas US");
        assert_eq!(ForecastConfig::default().sources.eia_series, HENRY_HUB_SERIES);

        let err = ForecastConfig::from_toml("[sources]\neia_series = \" \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::EmptySetting("sources.eia_series")));
    }

    #[test]
    fn unknown_source_is_parse_error() {
        let err = ForecastConfig::from_toml("[sources]\norder = [\"finanzen\"]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = ForecastConfig::load(Path::new("/nonexistent/gascast.toml")).unwrap();
        assert_eq!(config, ForecastConfig::default());
    }
}
