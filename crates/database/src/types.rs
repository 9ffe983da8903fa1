// In crates/database/src/types.rs

use core_types::{IndicatorRecord, Instrument, PriceBar};

/// One instrument's market data for a single trading day, joined with its
/// reference data and, when it has been computed, its indicator record.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRow {
    pub instrument: Instrument,
    pub bar: PriceBar,
    pub indicator: Option<IndicatorRecord>,
}
