//! Oil-price change aligned to the gas series.
//!
//! Each oil bar k > 0 contributes its previous close `oil[k-1]` under date
//! `oil.date[k]`. Those values are left-joined onto the gas dates, forward
//! filled, and turned into a relative change between consecutive gas rows.
//! Rows without two defined values get a change of 0.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::PriceSeries;

pub fn align_oil_changes(gas: &PriceSeries, oil: &PriceSeries) -> Vec<f64> {
    let prev_close_by_date: HashMap<NaiveDate, f64> = oil
        .bars()
        .windows(2)
        .map(|pair| (pair[1].date, pair[0].close))
        .collect();

    let mut filled: Vec<Option<f64>> = Vec::with_capacity(gas.len());
    let mut carry = None;
    for bar in gas.bars() {
        if let Some(&v) = prev_close_by_date.get(&bar.date) {
            carry = Some(v);
        }
        filled.push(carry);
    }

    let mut changes = vec![0.0; filled.len()];
    for i in 1..filled.len() {
        if let (Some(prev), Some(curr)) = (filled[i - 1], filled[i]) {
            changes[i] = curr / prev - 1.0;
        }
    }
    changes
}
