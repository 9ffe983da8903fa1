// In crates/screener/src/technical.rs

//! Screens that read only the day's stored indicator values.

use crate::rank::{Order, rank_by};
use crate::types::IndicatorHit;
use core_types::IndicatorRecord;
use database::DailyRow;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const OVERSOLD_RSI: Decimal = dec!(30);
pub const KDJ_BOTTOM: Decimal = dec!(20);
pub const MACD_CROSS_CEILING: Decimal = dec!(0.1);

pub const CAP: usize = 50;

fn hits(rows: &[DailyRow], keep: impl Fn(&IndicatorRecord) -> bool) -> Vec<IndicatorHit> {
    rows.iter()
        .filter_map(|row| {
            let indicator = row.indicator.as_ref()?;
            keep(indicator).then(|| IndicatorHit::new(row, indicator))
        })
        .collect()
}

/// RSI(6) below 30, most oversold first.
pub fn oversold(rows: &[DailyRow]) -> Vec<IndicatorHit> {
    let found = hits(rows, |ind| ind.rsi_6 < OVERSOLD_RSI);
    rank_by(found, Order::Ascending, CAP, |hit| hit.rsi_6)
}

/// K and D both below 20, lowest K first.
pub fn kdj_bottom(rows: &[DailyRow]) -> Vec<IndicatorHit> {
    let found = hits(rows, |ind| ind.k < KDJ_BOTTOM && ind.d < KDJ_BOTTOM);
    rank_by(found, Order::Ascending, CAP, |hit| hit.k)
}

/// A histogram just turned positive: `0 < hist < 0.1`, smallest first.
pub fn macd_golden_cross(rows: &[DailyRow]) -> Vec<IndicatorHit> {
    let found = hits(rows, |ind| ind.macd_hist > Decimal::ZERO && ind.macd_hist < MACD_CROSS_CEILING);
    rank_by(found, Order::Ascending, CAP, |hit| hit.macd_hist)
}
