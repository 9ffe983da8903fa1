// In crates/engine/src/report.rs

use crate::task::Outcome;
use chrono::NaiveDate;
use core_types::InstrumentId;
use std::collections::BTreeMap;

/// Per-instrument results of one batch run, ordered by code.
#[derive(Debug)]
pub struct BatchReport {
    pub date: NaiveDate,
    pub results: BTreeMap<InstrumentId, anyhow::Result<Outcome>>,
}

impl BatchReport {
    pub fn new(date: NaiveDate) -> Self {
        Self { date, results: BTreeMap::new() }
    }

    pub fn stored(&self) -> usize {
        self.results
            .values()
            .filter(|result| matches!(result, Ok(Outcome::Stored(_))))
            .count()
    }

    pub fn insufficient(&self) -> usize {
        self.results
            .values()
            .filter(|result| matches!(result, Ok(Outcome::InsufficientData { .. })))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.results.values().filter(|result| result.is_err()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&InstrumentId, &anyhow::Error)> {
        self.results
            .iter()
            .filter_map(|(id, result)| result.as_ref().err().map(|err| (id, err)))
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }
}
