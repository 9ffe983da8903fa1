// In crates/indicators/src/lib.rs

//! Daily technical indicators: RSI, EMA, a MACD-style oscillator, KDJ and
//! Bollinger Bands, computed from an instrument's ascending close/high/low
//! series and packed into an `IndicatorRecord`.

use core_types::{IndicatorRecord, InstrumentId, PriceBar, Result, MIN_HISTORY_BARS};
use rayon::prelude::*;
use rust_decimal::Decimal;

pub mod bollinger;
pub mod ema;
pub mod kdj;
pub mod macd;
pub mod precision;
pub mod rsi;
pub mod series;

use crate::precision::{to_fixed, MACD_DP, PRICE_DP};
use crate::series::{prepare, SeriesView};

pub const RSI_SHORT_PERIOD: usize = 6;
pub const RSI_LONG_PERIOD: usize = 12;

/// Computes the indicator record for the latest bar of `history`.
///
/// `history` may be in any consistent date order. Returns `Ok(None)` when it
/// holds fewer than `MIN_HISTORY_BARS` bars.
pub fn calculate(instrument: &InstrumentId, history: &[PriceBar]) -> Result<Option<IndicatorRecord>> {
    let Some(series) = prepare(instrument, history)? else {
        return Ok(None);
    };
    Ok(Some(record_for(series.view())))
}

/// Computes one record per trading day of `history`, for every day that has at
/// least `MIN_HISTORY_BARS` bars up to and including it.
///
/// Each day sees at most `lookback` trailing bars, the same window the daily
/// path fetches, so a backfilled record matches the one computed on the day.
/// Days are computed in parallel; the output is in ascending date order.
pub fn calculate_history(
    instrument: &InstrumentId,
    history: &[PriceBar],
    lookback: usize,
) -> Result<Vec<IndicatorRecord>> {
    let Some(series) = prepare(instrument, history)? else {
        return Ok(Vec::new());
    };
    let lookback = lookback.max(MIN_HISTORY_BARS);

    Ok((MIN_HISTORY_BARS - 1..series.len())
        .into_par_iter()
        .map(|end| {
            let start = (end + 1).saturating_sub(lookback);
            record_for(series.window(start, end))
        })
        .collect())
}

fn record_for(view: SeriesView<'_>) -> IndicatorRecord {
    let rsi_6 = rsi::rsi(view.closes, RSI_SHORT_PERIOD);
    let rsi_12 = rsi::rsi(view.closes, RSI_LONG_PERIOD);
    let macd = macd::macd(view.closes);
    let kdj = kdj::kdj(view.highs, view.lows, view.closes);
    let bands = bollinger::bollinger(view.closes, bollinger::BOLL_PERIOD);

    // J is rebuilt from the rounded K and D so the identity holds exactly.
    let k = to_fixed(kdj.k, PRICE_DP);
    let d = to_fixed(kdj.d, PRICE_DP);
    let j = k * Decimal::from(3) - d * Decimal::from(2);

    IndicatorRecord {
        instrument_id: view.instrument_id.clone(),
        trade_date: view.trade_date,
        rsi_6: to_fixed(rsi_6, PRICE_DP),
        rsi_12: to_fixed(rsi_12, PRICE_DP),
        macd: to_fixed(macd.dif, MACD_DP),
        macd_signal: to_fixed(macd.signal, MACD_DP),
        macd_hist: to_fixed(macd.hist, MACD_DP),
        k,
        d,
        j,
        boll_upper: to_fixed(bands.upper, PRICE_DP),
        boll_mid: to_fixed(bands.mid, PRICE_DP),
        boll_lower: to_fixed(bands.lower, PRICE_DP),
    }
}
