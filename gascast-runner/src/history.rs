//! Price history persisted as CSV (`date,close,high,low`).
//!
//! High and low may be empty; the core treats missing values as the close.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use gascast_core::{PriceBar, PriceSeries, SeriesError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history file {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("history file {path} is not a valid series: {source}")]
    Series { path: PathBuf, source: SeriesError },

    #[error("history file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct HistoryRow {
    date: NaiveDate,
    close: f64,
    high: Option<f64>,
    low: Option<f64>,
}

impl From<&PriceBar> for HistoryRow {
    fn from(bar: &PriceBar) -> Self {
        Self {
            date: bar.date,
            close: bar.close,
            high: bar.high,
            low: bar.low,
        }
    }
}

impl From<HistoryRow> for PriceBar {
    fn from(row: HistoryRow) -> Self {
        PriceBar {
            date: row.date,
            close: row.close,
            high: row.high,
            low: row.low,
        }
    }
}

/// Load a history file. Rows must be in ascending date order.
pub fn load_history(path: &Path) -> Result<PriceSeries, HistoryError> {
    let csv_err = |source| HistoryError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let bars = reader
        .deserialize::<HistoryRow>()
        .map(|row| row.map(PriceBar::from))
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_err)?;

    let series = PriceSeries::new(bars).map_err(|source| HistoryError::Series {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), bars = series.len(), "history loaded");
    Ok(series)
}

/// Write the full series, replacing the file.
pub fn save_history(path: &Path, series: &PriceSeries) -> Result<(), HistoryError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| HistoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }
    let csv_err = |source| HistoryError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    for bar in series.bars() {
        writer.serialize(HistoryRow::from(bar)).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| HistoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bars = series.len(), "history saved");
    Ok(())
}

/// Append a spot quote for `date` unless that date is already recorded.
///
/// The appended bar has high = low = close. Returns whether a bar was added.
pub fn append_quote(
    series: &mut PriceSeries,
    date: NaiveDate,
    price: f64,
) -> Result<bool, SeriesError> {
    if series.contains_date(date) {
        return Ok(false);
    }
    series.push(PriceBar::with_range(date, price, price, price))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn save_and_load_keeps_optional_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let series = PriceSeries::new(vec![
            PriceBar::with_range(d(2), 2.6, 2.7, 2.5),
            PriceBar::from_close(d(3), 2.8),
        ])
        .unwrap();

        save_history(&path, &series).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("date,close,high,low\n"));
        assert!(text.contains("2024-01-03,2.8,,\n"));

        let loaded = load_history(&path).unwrap();
        assert_eq!(loaded, series);
    }

    #[test]
    fn load_rejects_out_of_order_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        std::fs::write(&path, "date,close,high,low\n2024-01-03,2.8,,\n2024-01-02,2.6,,\n").unwrap();
        assert!(matches!(load_history(&path), Err(HistoryError::Series { .. })));
    }

    #[test]
    fn load_rejects_missing_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        std::fs::write(&path, "date,close,high,low\n2024-01-02,,,\n").unwrap();
        assert!(matches!(load_history(&path), Err(HistoryError::Csv { .. })));
    }

    #[test]
    fn append_quote_skips_existing_date() {
        let mut series = PriceSeries::from_closes(d(2), &[2.6, 2.7]).unwrap();
        assert!(!append_quote(&mut series, d(3), 9.9).unwrap());
        assert_eq!(series.last().close, 2.7);

        assert!(append_quote(&mut series, d(4), 2.9).unwrap());
        assert_eq!(series.len(), 3);
        assert_eq!(series.last().high, Some(2.9));
    }

    #[test]
    fn append_quote_rejects_past_date() {
        let mut series = PriceSeries::from_closes(d(5), &[2.6]).unwrap();
        assert!(append_quote(&mut series, d(2), 2.9).is_err());
    }
}
