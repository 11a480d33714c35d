//! Daily relative return.
//!
//! return[0] = 0 (no prior close), return[t] = close[t] / close[t-1] - 1.

use super::Indicator;
use crate::domain::PriceBar;

#[derive(Debug, Clone, Default)]
pub struct Returns;

impl Indicator for Returns {
    fn name(&self) -> &str {
        "return"
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let mut result = vec![0.0; bars.len()];
        for i in 1..bars.len() {
            result[i] = bars[i].close / bars[i - 1].close - 1.0;
        }
        result
    }
}
