// In crates/engine/src/lib.rs

//! The calculation engine. It runs the indicator calculation for many
//! instruments on a bounded pool of tokio workers and rebuilds an
//! instrument's stored history on demand.

pub mod report;
pub mod task;

pub use report::BatchReport;
pub use task::Outcome;

use anyhow::{Context, Result};
use app_config::AppSettings;
use chrono::NaiveDate;
use core_types::InstrumentId;
use database::Storage;
use futures::{StreamExt, stream};
use std::sync::Arc;

/// The most bars a backfill will read for one instrument.
pub const BACKFILL_MAX_BARS: usize = 10_000;

/// Orchestrates indicator calculation over an injected store.
pub struct Engine<S> {
    store: Arc<S>,
    workers: usize,
    history_bars: usize,
}

impl<S: Storage + 'static> Engine<S> {
    pub fn new(store: Arc<S>, settings: &AppSettings) -> Self {
        Self {
            store,
            workers: settings.workers.max(1),
            history_bars: settings.history_bars,
        }
    }

    /// Computes and stores the indicator record of one instrument for `date`.
    pub async fn calculate(&self, instrument: &InstrumentId, date: NaiveDate) -> Result<Outcome> {
        task::calculate_instrument(self.store.as_ref(), instrument, date, self.history_bars).await
    }

    /// Runs the calculation for every instrument in `instruments`, at most
    /// `workers` at a time.
    ///
    /// A failing instrument is logged and recorded in the report; it never
    /// stops the rest of the batch.
    pub async fn run_batch(&self, instruments: Vec<InstrumentId>, date: NaiveDate) -> BatchReport {
        tracing::info!(%date, instruments = instruments.len(), workers = self.workers, "Starting indicator batch.");

        let history_bars = self.history_bars;
        let results: Vec<(InstrumentId, Result<Outcome>)> = stream::iter(instruments)
            .map(|instrument| {
                let store = Arc::clone(&self.store);
                let worker_id = instrument.clone();
                let handle = tokio::spawn(async move {
                    task::calculate_instrument(store.as_ref(), &worker_id, date, history_bars).await
                });
                async move {
                    let outcome = match handle.await {
                        Ok(outcome) => outcome,
                        Err(join_error) => Err(anyhow::Error::new(join_error).context("worker task aborted")),
                    };
                    (instrument, outcome)
                }
            })
            .buffer_unordered(self.workers)
            .collect()
            .await;

        let mut report = BatchReport::new(date);
        for (instrument, outcome) in results {
            if let Err(e) = &outcome {
                tracing::error!(instrument = %instrument, error = %format!("{e:#}"), "Indicator calculation failed.");
            }
            report.results.insert(instrument, outcome);
        }

        tracing::info!(
            %date,
            stored = report.stored(),
            insufficient = report.insufficient(),
            failed = report.failed(),
            "Indicator batch finished."
        );
        report
    }

    /// Runs the batch over every instrument the store knows about.
    pub async fn run_all(&self, date: NaiveDate) -> Result<BatchReport> {
        let instruments = self
            .store
            .list_instruments()
            .await
            .context("listing instruments")?
            .into_iter()
            .map(|instrument| instrument.code)
            .collect();
        Ok(self.run_batch(instruments, date).await)
    }

    /// Recomputes and stores the record of every day up to `to` that has
    /// enough history, returning how many records were written.
    pub async fn backfill(&self, instrument: &InstrumentId, to: NaiveDate) -> Result<usize> {
        let history = self
            .store
            .fetch_history(instrument, to, BACKFILL_MAX_BARS)
            .await
            .with_context(|| format!("loading history for {instrument}"))?;
        tracing::info!(instrument = %instrument, %to, bars = history.len(), "Starting indicator backfill.");

        let id = instrument.clone();
        let lookback = self.history_bars;
        let records = tokio::task::spawn_blocking(move || indicators::calculate_history(&id, &history, lookback))
            .await
            .context("backfill worker aborted")??;

        for record in &records {
            self.store
                .upsert_indicator(record)
                .await
                .with_context(|| format!("storing indicators for {instrument} on {}", record.trade_date))?;
        }

        tracing::info!(instrument = %instrument, records = records.len(), "Indicator backfill finished.");
        Ok(records.len())
    }
}
