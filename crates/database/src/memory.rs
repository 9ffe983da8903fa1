// In crates/database/src/memory.rs

use crate::{DailyRow, Error, Result, Storage};
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{IndicatorRecord, Instrument, InstrumentId, PriceBar};
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

type Key = (InstrumentId, NaiveDate);

#[derive(Debug, Default)]
struct Tables {
    instruments: BTreeMap<InstrumentId, Instrument>,
    bars: BTreeMap<Key, PriceBar>,
    indicators: BTreeMap<Key, IndicatorRecord>,
}

/// An in-process `Storage` for tests and dry runs.
///
/// Every table sits behind one lock; an upsert swaps the whole record in under
/// the write guard.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| Error::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| Error::LockPoisoned)
    }

    /// Adds or replaces an instrument's reference data.
    pub fn insert_instrument(&self, instrument: Instrument) -> Result<()> {
        self.write()?
            .instruments
            .insert(instrument.code.clone(), instrument);
        Ok(())
    }

    /// Adds price bars. A bar whose key is already present is ignored, the
    /// same way ingestion never rewrites a bar.
    pub fn insert_bars(&self, bars: impl IntoIterator<Item = PriceBar>) -> Result<usize> {
        let mut tables = self.write()?;
        let mut inserted = 0;
        for bar in bars {
            let key = (bar.instrument_id.clone(), bar.trade_date);
            if let std::collections::btree_map::Entry::Vacant(slot) = tables.bars.entry(key) {
                slot.insert(bar);
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    pub fn indicator_count(&self) -> Result<usize> {
        Ok(self.read()?.indicators.len())
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn fetch_history(
        &self,
        instrument: &InstrumentId,
        as_of: NaiveDate,
        limit: usize,
    ) -> Result<Vec<PriceBar>> {
        let tables = self.read()?;
        let from = (instrument.clone(), NaiveDate::MIN);
        let to = (instrument.clone(), as_of);
        Ok(tables
            .bars
            .range(from..=to)
            .rev()
            .take(limit)
            .map(|(_, bar)| bar.clone())
            .collect())
    }

    async fn upsert_indicator(&self, record: &IndicatorRecord) -> Result<()> {
        let key = (record.instrument_id.clone(), record.trade_date);
        self.write()?.indicators.insert(key, record.clone());
        Ok(())
    }

    async fn get_indicator(
        &self,
        instrument: &InstrumentId,
        trade_date: NaiveDate,
    ) -> Result<Option<IndicatorRecord>> {
        let key = (instrument.clone(), trade_date);
        Ok(self.read()?.indicators.get(&key).cloned())
    }

    async fn list_instruments(&self) -> Result<Vec<Instrument>> {
        Ok(self.read()?.instruments.values().cloned().collect())
    }

    async fn daily_rows(&self, date: NaiveDate) -> Result<Vec<DailyRow>> {
        let tables = self.read()?;
        Ok(tables
            .bars
            .iter()
            .filter(|((_, day), _)| *day == date)
            .filter_map(|(key, bar)| {
                let instrument = tables.instruments.get(&key.0)?;
                Some(DailyRow {
                    instrument: instrument.clone(),
                    bar: bar.clone(),
                    indicator: tables.indicators.get(key).cloned(),
                })
            })
            .collect())
    }

    async fn trailing_bars(
        &self,
        date: NaiveDate,
        lookback: usize,
    ) -> Result<HashMap<InstrumentId, Vec<PriceBar>>> {
        let tables = self.read()?;
        let trading: Vec<&InstrumentId> = tables
            .bars
            .keys()
            .filter(|(_, day)| *day == date)
            .map(|(id, _)| id)
            .collect();

        Ok(trading
            .into_iter()
            .map(|id| {
                let from = (id.clone(), NaiveDate::MIN);
                let to = (id.clone(), date);
                let mut window: Vec<PriceBar> = tables
                    .bars
                    .range(from..=to)
                    .rev()
                    .take(lookback)
                    .map(|(_, bar)| bar.clone())
                    .collect();
                window.reverse();
                (id.clone(), window)
            })
            .collect())
    }
}
