// In crates/database/src/lib.rs

use app_config::types::DatabaseSettings;
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{IndicatorRecord, Instrument, InstrumentId, PriceBar};
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::collections::HashMap;
use std::sync::Arc;

pub mod error;
pub mod memory;
mod postgres;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use types::DailyRow;

/// The storage capability the indicator and screening code runs against.
///
/// Implementations must make `upsert_indicator` atomic per
/// (instrument, trade date): two concurrent upserts for the same key leave one
/// of the two records in place, never a mix of both.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Up to `limit` bars for `instrument` dated on or before `as_of`,
    /// newest first.
    async fn fetch_history(
        &self,
        instrument: &InstrumentId,
        as_of: NaiveDate,
        limit: usize,
    ) -> Result<Vec<PriceBar>>;

    /// Inserts the record, or overwrites every computed field of the existing
    /// record with the same key.
    async fn upsert_indicator(&self, record: &IndicatorRecord) -> Result<()>;

    async fn get_indicator(
        &self,
        instrument: &InstrumentId,
        trade_date: NaiveDate,
    ) -> Result<Option<IndicatorRecord>>;

    /// All instruments, ordered by code.
    async fn list_instruments(&self) -> Result<Vec<Instrument>>;

    /// Every instrument with a bar on `date`, ordered by code, joined with its
    /// reference data and that day's indicator record if one exists.
    async fn daily_rows(&self, date: NaiveDate) -> Result<Vec<DailyRow>>;

    /// For every instrument with a bar on `date`, its last `lookback` bars up
    /// to and including `date`, oldest first.
    async fn trailing_bars(
        &self,
        date: NaiveDate,
        lookback: usize,
    ) -> Result<HashMap<InstrumentId, Vec<PriceBar>>>;
}

#[async_trait]
impl<S: Storage + ?Sized> Storage for Arc<S> {
    async fn fetch_history(
        &self,
        instrument: &InstrumentId,
        as_of: NaiveDate,
        limit: usize,
    ) -> Result<Vec<PriceBar>> {
        (**self).fetch_history(instrument, as_of, limit).await
    }

    async fn upsert_indicator(&self, record: &IndicatorRecord) -> Result<()> {
        (**self).upsert_indicator(record).await
    }

    async fn get_indicator(
        &self,
        instrument: &InstrumentId,
        trade_date: NaiveDate,
    ) -> Result<Option<IndicatorRecord>> {
        (**self).get_indicator(instrument, trade_date).await
    }

    async fn list_instruments(&self) -> Result<Vec<Instrument>> {
        (**self).list_instruments().await
    }

    async fn daily_rows(&self, date: NaiveDate) -> Result<Vec<DailyRow>> {
        (**self).daily_rows(date).await
    }

    async fn trailing_bars(
        &self,
        date: NaiveDate,
        lookback: usize,
    ) -> Result<HashMap<InstrumentId, Vec<PriceBar>>> {
        (**self).trailing_bars(date, lookback).await
    }
}

/// A wrapper around the `sqlx` connection pool.
#[derive(Debug, Clone)]
pub struct Db(PgPool);

/// Establishes a connection pool to the PostgreSQL database and runs migrations.
pub async fn connect(settings: &DatabaseSettings) -> Result<Db> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.url)
        .await?;

    // Bring the schema up to date before anything reads or writes.
    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!(max_connections = settings.max_connections, "Database connected and migrated.");

    Ok(Db(pool))
}
