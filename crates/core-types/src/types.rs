// In crates/core-types/src/types.rs

use crate::error::{Error, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The fewest ascending daily bars an indicator record can be computed from.
///
/// 26 is the slow EMA period of the MACD oscillator, the longest window any
/// indicator needs.
pub const MIN_HISTORY_BARS: usize = 26;

/// An opaque instrument code, e.g. `600519.SH`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstrumentId(pub String);

impl InstrumentId {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One ingested daily bar. Immutable once written by the ingestion side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub instrument_id: InstrumentId,
    pub trade_date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
    pub amount: Decimal,
    /// Daily change in percent, e.g. `3.5` for +3.5%.
    pub pct_change: Decimal,
}

/// The full set of indicator values for one instrument on one trading day.
///
/// A record is always written whole. RSI, KDJ and Bollinger values carry two
/// decimal places, the MACD fields four.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    pub instrument_id: InstrumentId,
    pub trade_date: NaiveDate,
    pub rsi_6: Decimal,
    pub rsi_12: Decimal,
    pub macd: Decimal,
    pub macd_signal: Decimal,
    pub macd_hist: Decimal,
    pub k: Decimal,
    pub d: Decimal,
    pub j: Decimal,
    pub boll_upper: Decimal,
    pub boll_mid: Decimal,
    pub boll_lower: Decimal,
}

/// Reference data for a listed instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub code: InstrumentId,
    pub name: String,
    pub industry: Option<String>,
    pub market: Option<String>,
    pub list_date: Option<NaiveDate>,
}

/// Parses a trade date given as `YYYY-MM-DD` or the compact `YYYYMMDD`.
pub fn parse_trade_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y%m%d"))
        .map_err(|_| Error::InvalidDate(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        assert_eq!(parse_trade_date("2024-03-08").unwrap(), expected);
        assert_eq!(parse_trade_date("20240308").unwrap(), expected);
        assert_eq!(parse_trade_date(" 2024-03-08 ").unwrap(), expected);
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(matches!(parse_trade_date("2024/03/08"), Err(Error::InvalidDate(_))));
        assert!(parse_trade_date("").is_err());
    }

    #[test]
    fn instrument_id_displays_raw_code() {
        assert_eq!(InstrumentId::new("000001.SZ").to_string(), "000001.SZ");
    }
}
