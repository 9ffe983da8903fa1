// In crates/screener/src/breakout.rs

use crate::rank::{Order, rank_by};
use crate::types::BreakoutHit;
use crate::window::{price_range, prior_average_volume, range_position, ratio, round2};
use core_types::{InstrumentId, PriceBar};
use database::DailyRow;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

pub const VOLUME_WINDOW: usize = 20;
pub const RANGE_WINDOW: usize = 60;
/// Bars to load per instrument: the range window already includes today and
/// covers the 20 bars before it.
pub const LOOKBACK: usize = RANGE_WINDOW + 1;

pub const MIN_VOLUME_MULTIPLE: Decimal = dec!(3);
pub const MAX_RANGE_POSITION: Decimal = dec!(30);
pub const MIN_PCT_CHANGE: Decimal = dec!(3);
pub const MAX_RSI_6: Decimal = dec!(50);

pub const CAP: usize = 50;

/// Heavy volume on a strong up day while price still sits near the bottom of
/// its 60-day range.
///
/// An instrument needs a full 20 bars of prior volume to qualify, and a
/// zero-width 60-day range rules it out.
pub fn bottom_volume_breakout(
    rows: &[DailyRow],
    windows: &HashMap<InstrumentId, Vec<PriceBar>>,
) -> Vec<BreakoutHit> {
    // Ranked on the exact ratio; the hit only carries it rounded.
    let found: Vec<(BreakoutHit, Decimal)> = rows
        .iter()
        .filter_map(|row| evaluate(row, windows.get(&row.instrument.code)?))
        .collect();
    rank_by(found, Order::Descending, CAP, |(_, volume_ratio)| *volume_ratio)
        .into_iter()
        .map(|(hit, _)| hit)
        .collect()
}

fn evaluate(row: &DailyRow, bars: &[PriceBar]) -> Option<(BreakoutHit, Decimal)> {
    let indicator = row.indicator.as_ref()?;
    let bar = &row.bar;

    if bar.pct_change <= MIN_PCT_CHANGE || indicator.rsi_6 >= MAX_RSI_6 {
        return None;
    }

    let (avg_volume, samples) = prior_average_volume(bars, VOLUME_WINDOW)?;
    if samples < VOLUME_WINDOW {
        return None;
    }
    let volume_ratio = ratio(bar.volume, avg_volume)?;
    if volume_ratio <= MIN_VOLUME_MULTIPLE {
        return None;
    }

    let (high, low) = price_range(bars, RANGE_WINDOW)?;
    let position = range_position(bar.close, high, low)?;
    if position >= MAX_RANGE_POSITION {
        return None;
    }

    let hit = BreakoutHit {
        code: row.instrument.code.clone(),
        name: row.instrument.name.clone(),
        industry: row.instrument.industry.clone(),
        close: bar.close,
        pct_change: bar.pct_change,
        volume: bar.volume,
        avg_volume_20: round2(avg_volume),
        volume_ratio: round2(volume_ratio),
        high_60: high,
        low_60: low,
        range_position: round2(position),
        rsi_6: indicator.rsi_6,
    };
    Some((hit, volume_ratio))
}
