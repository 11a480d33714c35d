//! Domain types for GasCast

pub mod bar;
pub mod series;

pub use bar::{BarError, PriceBar};
pub use series::{PriceSeries, SeriesError};
