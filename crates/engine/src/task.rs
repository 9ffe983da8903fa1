// In crates/engine/src/task.rs

use anyhow::Context;
use chrono::NaiveDate;
use core_types::{IndicatorRecord, InstrumentId};
use database::Storage;

/// What a single instrument's calculation ended in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A record was computed and written.
    Stored(IndicatorRecord),
    /// Too few bars on or before the date; nothing was written.
    InsufficientData { bars: usize },
}

impl Outcome {
    pub fn record(&self) -> Option<&IndicatorRecord> {
        match self {
            Outcome::Stored(record) => Some(record),
            Outcome::InsufficientData { .. } => None,
        }
    }
}

/// The unit of work a batch worker runs for one instrument: read its trailing
/// bars, compute the indicator set, upsert it.
///
/// The record is keyed by the newest bar on or before `date`, so a suspended
/// instrument recomputes its last trading day rather than inventing one.
pub(crate) async fn calculate_instrument<S: Storage + ?Sized>(
    store: &S,
    instrument: &InstrumentId,
    date: NaiveDate,
    history_bars: usize,
) -> anyhow::Result<Outcome> {
    let history = store
        .fetch_history(instrument, date, history_bars)
        .await
        .with_context(|| format!("loading history for {instrument}"))?;
    let bars = history.len();

    match indicators::calculate(instrument, &history)? {
        Some(record) => {
            store
                .upsert_indicator(&record)
                .await
                .with_context(|| format!("storing indicators for {instrument}"))?;
            tracing::debug!(instrument = %instrument, trade_date = %record.trade_date, "Indicators stored.");
            Ok(Outcome::Stored(record))
        }
        None => {
            tracing::warn!(instrument = %instrument, %date, bars, "Not enough history for indicators. Skipping.");
            Ok(Outcome::InsufficientData { bars })
        }
    }
}
