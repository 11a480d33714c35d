//! GasCast Runner: configuration, persistence, rolling accuracy and the
//! daily forecast workflow.
//!
//! This crate builds on `gascast-core` to provide:
//! - TOML configuration with defaults for every field
//! - CSV price history (load, save, append the latest quote)
//! - Rolling hit rate of the scorer, parallel over window ends
//! - Text reports and JSON snapshots for run-over-run change detection
//! - The daily workflow tying fetch, score and persistence together

pub mod config;
pub mod forecast;
pub mod history;
pub mod report;
pub mod rolling;

pub use config::{BacktestSettings, ConfigError, ForecastConfig, PathsConfig, SourceKind, SourcesConfig};
pub use forecast::{
    build_oil_source, build_sources, oil_changes_for, run_daily, ApiKeys, ForecastOutcome,
    PriceSources,
};
pub use history::{append_quote, load_history, save_history, HistoryError};
pub use report::{
    load_previous, render_report, save_snapshot, write_report, ReportError, SavedForecast,
};
pub use rolling::{
    rolling_accuracy, rolling_accuracy_with_oil, write_accuracy_csv, AccuracyPoint, RollingError,
};
