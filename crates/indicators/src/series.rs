// In crates/indicators/src/series.rs

use chrono::NaiveDate;
use core_types::{Error, InstrumentId, PriceBar, Result, MIN_HISTORY_BARS};
use num_traits::cast::ToPrimitive;

/// A price history in ascending trade-date order, split into parallel arrays.
#[derive(Debug, Clone)]
pub struct PreparedSeries {
    pub instrument_id: InstrumentId,
    pub dates: Vec<NaiveDate>,
    pub closes: Vec<f64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
}

/// A borrowed, contiguous slice of a `PreparedSeries` ending on `trade_date`.
#[derive(Debug, Clone, Copy)]
pub struct SeriesView<'a> {
    pub instrument_id: &'a InstrumentId,
    pub trade_date: NaiveDate,
    pub closes: &'a [f64],
    pub highs: &'a [f64],
    pub lows: &'a [f64],
}

impl PreparedSeries {
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// The whole series, ending on its latest bar.
    pub fn view(&self) -> SeriesView<'_> {
        self.window(0, self.len() - 1)
    }

    /// The bars `start..=end`. Both bounds must lie inside the series.
    pub fn window(&self, start: usize, end: usize) -> SeriesView<'_> {
        SeriesView {
            instrument_id: &self.instrument_id,
            trade_date: self.dates[end],
            closes: &self.closes[start..=end],
            highs: &self.highs[start..=end],
            lows: &self.lows[start..=end],
        }
    }
}

/// Normalizes a history for one instrument into ascending order.
///
/// Storage hands histories back newest-first; any consistent ordering is
/// accepted. Returns `Ok(None)` when fewer than `MIN_HISTORY_BARS` bars are
/// present, and an error if a bar belongs to a different instrument.
pub fn prepare(instrument: &InstrumentId, history: &[PriceBar]) -> Result<Option<PreparedSeries>> {
    if let Some(stray) = history.iter().find(|bar| &bar.instrument_id != instrument) {
        return Err(Error::MixedHistory {
            expected: instrument.to_string(),
            found: stray.instrument_id.to_string(),
        });
    }

    if history.len() < MIN_HISTORY_BARS {
        return Ok(None);
    }

    let mut ordered: Vec<&PriceBar> = history.iter().collect();
    ordered.sort_by_key(|bar| bar.trade_date);

    let as_f64 = |value: &rust_decimal::Decimal| value.to_f64().unwrap_or(0.0);

    Ok(Some(PreparedSeries {
        instrument_id: instrument.clone(),
        dates: ordered.iter().map(|bar| bar.trade_date).collect(),
        closes: ordered.iter().map(|bar| as_f64(&bar.close)).collect(),
        highs: ordered.iter().map(|bar| as_f64(&bar.high)).collect(),
        lows: ordered.iter().map(|bar| as_f64(&bar.low)).collect(),
    }))
}
