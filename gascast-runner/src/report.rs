//! Forecast reports: the plain-text result and the JSON snapshot kept for
//! the next run's change detection.
//!
//! Snapshots carry a `schema_version`; newer versions are rejected on load.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use gascast_core::data::DataSource;
use gascast_core::{ChangeReport, ForecastResult, ForecastSnapshot};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid snapshot {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("snapshot {path} has schema version {found} (max supported: {max})", max = SNAPSHOT_SCHEMA_VERSION)]
    UnsupportedSchema { path: PathBuf, found: u32 },
}

/// Persisted outcome of one forecast run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedForecast {
    pub schema_version: u32,
    pub generated_at: NaiveDateTime,
    pub source: Option<DataSource>,
    /// `ScoreParameters::fingerprint()` of the run.
    pub params_fingerprint: String,
    pub result: ForecastResult,
}

impl SavedForecast {
    pub fn new(
        result: ForecastResult,
        generated_at: NaiveDateTime,
        source: Option<DataSource>,
        params_fingerprint: String,
    ) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            generated_at,
            source,
            params_fingerprint,
            result,
        }
    }

    pub fn snapshot(&self) -> ForecastSnapshot {
        ForecastSnapshot {
            probability_up: self.result.probability_up,
            trend: self.result.trend,
        }
    }
}

/// Load the previous run's snapshot; `Ok(None)` when there is none yet.
pub fn load_previous(path: &Path) -> Result<Option<SavedForecast>, ReportError> {
    if !path.exists() {
        debug!(path = %path.display(), "no previous forecast");
        return Ok(None);
    }
    let json = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let saved: SavedForecast = serde_json::from_str(&json).map_err(|source| ReportError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    if saved.schema_version > SNAPSHOT_SCHEMA_VERSION {
        return Err(ReportError::UnsupportedSchema {
            path: path.to_path_buf(),
            found: saved.schema_version,
        });
    }
    Ok(Some(saved))
}

pub fn save_snapshot(path: &Path, saved: &SavedForecast) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(saved).map_err(|source| ReportError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    write_file(path, &json)
}

pub fn write_report(path: &Path, report: &str) -> Result<(), ReportError> {
    write_file(path, report)
}

fn write_file(path: &Path, content: &str) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, content).map_err(io_err)
}

/// Render the human-readable result.
pub fn render_report(saved: &SavedForecast, change: Option<&ChangeReport>) -> String {
    ReportView { saved, change }.to_string()
}

struct ReportView<'a> {
    saved: &'a SavedForecast,
    change: Option<&'a ChangeReport>,
}

impl fmt::Display for ReportView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = &self.saved.result;

        writeln!(f, "Date: {}", self.saved.generated_at.format("%Y-%m-%d %H:%M"))?;
        writeln!(f, "Natural gas price: {:.3} USD/MMBtu", result.last_close)?;
        writeln!(f, "Trend: {}", result.trend)?;
        writeln!(f, "Probability up: {:.2} %", result.probability_up)?;
        writeln!(f, "Probability down: {:.2} %", result.probability_down())?;
        writeln!(f, "Streak: {} ({})", result.streak_length, result.streak_direction)?;
        if result.is_neutral_fallback() {
            writeln!(f, "Note: insufficient history, neutral probability used")?;
        }

        match self.change {
            Some(change) => {
                if let Some(pct) = change.relative_change_pct {
                    writeln!(f, "Change vs previous run: {pct:+.2} %")?;
                }
                if change.significant {
                    writeln!(f, "Significant change or trend reversal detected")?;
                }
            }
            None => writeln!(f, "No previous run to compare")?,
        }

        if let Some(source) = self.saved.source {
            writeln!(f, "Source: {}", source_label(source))?;
        }
        Ok(())
    }
}

fn source_label(source: DataSource) -> &'static str {
    match source {
        DataSource::YahooFinance => "Yahoo Finance",
        DataSource::Eia => "EIA",
        DataSource::TradingEconomics => "TradingEconomics",
        DataSource::Synthetic => "synthetic (offline)",
        DataSource::History => "stored history",
    }
}
