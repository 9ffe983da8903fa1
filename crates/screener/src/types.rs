// In crates/screener/src/types.rs

use core_types::{IndicatorRecord, InstrumentId};
use database::DailyRow;
use rust_decimal::Decimal;
use serde::Serialize;

/// A candidate from one of the indicator-threshold screens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorHit {
    pub code: InstrumentId,
    pub name: String,
    pub industry: Option<String>,
    pub close: Decimal,
    pub pct_change: Decimal,
    pub rsi_6: Decimal,
    pub rsi_12: Decimal,
    pub k: Decimal,
    pub d: Decimal,
    pub j: Decimal,
    pub macd: Decimal,
    pub macd_hist: Decimal,
}

impl IndicatorHit {
    pub(crate) fn new(row: &DailyRow, indicator: &IndicatorRecord) -> Self {
        Self {
            code: row.instrument.code.clone(),
            name: row.instrument.name.clone(),
            industry: row.instrument.industry.clone(),
            close: row.bar.close,
            pct_change: row.bar.pct_change,
            rsi_6: indicator.rsi_6,
            rsi_12: indicator.rsi_12,
            k: indicator.k,
            d: indicator.d,
            j: indicator.j,
            macd: indicator.macd,
            macd_hist: indicator.macd_hist,
        }
    }
}

/// A volume breakout near the bottom of the 60-day range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakoutHit {
    pub code: InstrumentId,
    pub name: String,
    pub industry: Option<String>,
    pub close: Decimal,
    pub pct_change: Decimal,
    pub volume: Decimal,
    pub avg_volume_20: Decimal,
    /// Today's volume over the 20-day average, 2 dp.
    pub volume_ratio: Decimal,
    pub high_60: Decimal,
    pub low_60: Decimal,
    /// Where the close sits in the 60-day range, in percent, 2 dp.
    pub range_position: Decimal,
    pub rsi_6: Decimal,
}

/// A sector where many members rallied together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorHit {
    pub industry: String,
    /// Members with a positive change on the day.
    pub advancing: usize,
    /// Mean change of the advancing members, 2 dp.
    pub avg_pct_change: Decimal,
    pub leader_code: InstrumentId,
    pub leader_name: String,
    pub leader_pct_change: Decimal,
}

/// A strong gainer, with volume and market context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterTrendHit {
    pub code: InstrumentId,
    pub name: String,
    pub industry: Option<String>,
    pub close: Decimal,
    pub pct_change: Decimal,
    pub volume: Decimal,
    /// Today's volume over the prior 10-day average, 2 dp; absent without
    /// prior volume.
    pub volume_ratio_10: Option<Decimal>,
    /// The reference index's change on the same day, when it traded.
    pub market_pct_change: Option<Decimal>,
}
