// In crates/screener/src/counter_trend.rs

use crate::rank::{Order, rank_by};
use crate::types::CounterTrendHit;
use crate::window::{prior_average_volume, ratio, round2};
use core_types::{InstrumentId, PriceBar};
use database::DailyRow;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{HashMap, HashSet};

pub const MIN_PCT_CHANGE: Decimal = dec!(2);
pub const VOLUME_WINDOW: usize = 10;
pub const LOOKBACK: usize = VOLUME_WINDOW + 1;

pub const CAP: usize = 50;

/// Instruments up more than 2% on the day, index tickers excluded.
///
/// `index_codes` doubles as the market reference: the first listed index that
/// traded on the day supplies `market_pct_change`.
pub fn counter_trend(
    rows: &[DailyRow],
    windows: &HashMap<InstrumentId, Vec<PriceBar>>,
    index_codes: &[String],
) -> Vec<CounterTrendHit> {
    let excluded: HashSet<&str> = index_codes.iter().map(String::as_str).collect();

    let market_pct_change = index_codes.iter().find_map(|code| {
        rows.iter()
            .find(|row| row.instrument.code.as_str() == code)
            .map(|row| row.bar.pct_change)
    });

    let found: Vec<CounterTrendHit> = rows
        .iter()
        .filter(|row| row.bar.pct_change > MIN_PCT_CHANGE)
        .filter(|row| !excluded.contains(row.instrument.code.as_str()))
        .map(|row| {
            let volume_ratio_10 = windows
                .get(&row.instrument.code)
                .and_then(|bars| prior_average_volume(bars, VOLUME_WINDOW))
                .and_then(|(avg, _)| ratio(row.bar.volume, avg))
                .map(round2);

            CounterTrendHit {
                code: row.instrument.code.clone(),
                name: row.instrument.name.clone(),
                industry: row.instrument.industry.clone(),
                close: row.bar.close,
                pct_change: row.bar.pct_change,
                volume: row.bar.volume,
                volume_ratio_10,
                market_pct_change,
            }
        })
        .collect();

    rank_by(found, Order::Descending, CAP, |hit: &CounterTrendHit| hit.pct_change)
}
