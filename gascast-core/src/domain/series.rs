//! Ordered, append-only daily observations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bar::{BarError, PriceBar};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("price series is empty")]
    Empty,

    #[error("malformed bar: {0}")]
    MalformedBar(#[from] BarError),

    #[error("dates must be strictly increasing: {prev} is followed by {next}")]
    OutOfOrder { prev: NaiveDate, next: NaiveDate },
}

/// Validated daily price series.
///
/// Invariants: at least one bar, every close finite and positive, dates
/// strictly increasing (hence unique). The only mutation is `push`, which
/// preserves all three.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PriceBar>", into = "Vec<PriceBar>")]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        if bars.is_empty() {
            return Err(SeriesError::Empty);
        }
        for bar in &bars {
            bar.validate()?;
        }
        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::OutOfOrder {
                    prev: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        Ok(Self { bars })
    }

    /// Build a series from closes on consecutive calendar days starting at `start`.
    pub fn from_closes(start: NaiveDate, closes: &[f64]) -> Result<Self, SeriesError> {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar::from_close(start + chrono::Duration::days(i as i64), close))
            .collect();
        Self::new(bars)
    }

    /// Append a bar dated after the current last bar.
    pub fn push(&mut self, bar: PriceBar) -> Result<(), SeriesError> {
        bar.validate()?;
        let last = self.last();
        if bar.date <= last.date {
            return Err(SeriesError::OutOfOrder {
                prev: last.date,
                next: bar.date,
            });
        }
        self.bars.push(bar);
        Ok(())
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> &PriceBar {
        // Non-empty by construction.
        &self.bars[self.bars.len() - 1]
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.bars.binary_search_by_key(&date, |b| b.date).is_ok()
    }

    /// The first `len` bars as a new series (`len` is clamped to `1..=self.len()`).
    pub fn prefix(&self, len: usize) -> PriceSeries {
        let len = len.clamp(1, self.bars.len());
        Self {
            bars: self.bars[..len].to_vec(),
        }
    }
}

impl TryFrom<Vec<PriceBar>> for PriceSeries {
    type Error = SeriesError;

    fn try_from(bars: Vec<PriceBar>) -> Result<Self, Self::Error> {
        Self::new(bars)
    }
}

impl From<PriceSeries> for Vec<PriceBar> {
    fn from(series: PriceSeries) -> Self {
        series.bars
    }
}
