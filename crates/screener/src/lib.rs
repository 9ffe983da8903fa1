// In crates/screener/src/lib.rs

//! The screening catalogue: fixed, named filters that read one trading day of
//! stored indicators joined with market data and return ranked, capped
//! candidate lists.

use app_config::ScreenerSettings;
use chrono::NaiveDate;
use database::Storage;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub mod breakout;
pub mod counter_trend;
pub mod error;
pub mod rank;
pub mod sector;
pub mod technical;
pub mod types;
pub mod window;

pub use error::{Error, Result};
pub use types::{BreakoutHit, CounterTrendHit, IndicatorHit, SectorHit};

/// The named filters in the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    Oversold,
    KdjBottom,
    MacdGoldenCross,
    BottomVolumeBreakout,
    IndustryMomentum,
    CounterTrend,
}

impl Filter {
    pub const ALL: [Filter; 6] = [
        Filter::Oversold,
        Filter::KdjBottom,
        Filter::MacdGoldenCross,
        Filter::BottomVolumeBreakout,
        Filter::IndustryMomentum,
        Filter::CounterTrend,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Filter::Oversold => "oversold",
            Filter::KdjBottom => "kdj-bottom",
            Filter::MacdGoldenCross => "macd-golden-cross",
            Filter::BottomVolumeBreakout => "bottom-volume-breakout",
            Filter::IndustryMomentum => "industry-momentum",
            Filter::CounterTrend => "counter-trend",
        }
    }

    /// The most candidates this filter ever returns.
    pub fn cap(&self) -> usize {
        match self {
            Filter::Oversold | Filter::KdjBottom | Filter::MacdGoldenCross => technical::CAP,
            Filter::BottomVolumeBreakout => breakout::CAP,
            Filter::IndustryMomentum => sector::CAP,
            Filter::CounterTrend => counter_trend::CAP,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Filter::Oversold => "RSI(6) below 30, most oversold first",
            Filter::KdjBottom => "K and D below 20, lowest K first",
            Filter::MacdGoldenCross => "MACD histogram between 0 and 0.1, smallest first",
            Filter::BottomVolumeBreakout => {
                "volume over 3x its 20-day average near the bottom of the 60-day range"
            }
            Filter::IndustryMomentum => "sectors with 5+ risers averaging over 3%",
            Filter::CounterTrend => "non-index instruments up more than 2%",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Filter::ALL
            .into_iter()
            .find(|filter| filter.name() == wanted)
            .ok_or_else(|| Error::UnknownFilter(s.to_string()))
    }
}

/// The outcome of one screen, tagged with the filter that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "filter", content = "hits", rename_all = "kebab-case")]
pub enum ScreenResult {
    Oversold(Vec<IndicatorHit>),
    KdjBottom(Vec<IndicatorHit>),
    MacdGoldenCross(Vec<IndicatorHit>),
    BottomVolumeBreakout(Vec<BreakoutHit>),
    IndustryMomentum(Vec<SectorHit>),
    CounterTrend(Vec<CounterTrendHit>),
}

impl ScreenResult {
    pub fn filter(&self) -> Filter {
        match self {
            ScreenResult::Oversold(_) => Filter::Oversold,
            ScreenResult::KdjBottom(_) => Filter::KdjBottom,
            ScreenResult::MacdGoldenCross(_) => Filter::MacdGoldenCross,
            ScreenResult::BottomVolumeBreakout(_) => Filter::BottomVolumeBreakout,
            ScreenResult::IndustryMomentum(_) => Filter::IndustryMomentum,
            ScreenResult::CounterTrend(_) => Filter::CounterTrend,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ScreenResult::Oversold(hits)
            | ScreenResult::KdjBottom(hits)
            | ScreenResult::MacdGoldenCross(hits) => hits.len(),
            ScreenResult::BottomVolumeBreakout(hits) => hits.len(),
            ScreenResult::IndustryMomentum(hits) => hits.len(),
            ScreenResult::CounterTrend(hits) => hits.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runs catalogue filters against an injected store.
///
/// Every screen is a read of one trading day and takes no locks, so screens
/// can run alongside indicator writes.
pub struct Screener<S> {
    store: S,
    settings: ScreenerSettings,
}

impl<S: Storage> Screener<S> {
    pub fn new(store: S, settings: ScreenerSettings) -> Self {
        Self { store, settings }
    }

    /// Runs the named filter for `date`.
    pub async fn run(&self, filter: Filter, date: NaiveDate) -> Result<ScreenResult> {
        let result = match filter {
            Filter::Oversold => ScreenResult::Oversold(self.oversold(date).await?),
            Filter::KdjBottom => ScreenResult::KdjBottom(self.kdj_bottom(date).await?),
            Filter::MacdGoldenCross => ScreenResult::MacdGoldenCross(self.macd_golden_cross(date).await?),
            Filter::BottomVolumeBreakout => {
                ScreenResult::BottomVolumeBreakout(self.bottom_volume_breakout(date).await?)
            }
            Filter::IndustryMomentum => ScreenResult::IndustryMomentum(self.industry_momentum(date).await?),
            Filter::CounterTrend => ScreenResult::CounterTrend(self.counter_trend(date).await?),
        };
        tracing::debug!(%filter, %date, hits = result.len(), "Screen finished.");
        Ok(result)
    }

    pub async fn oversold(&self, date: NaiveDate) -> Result<Vec<IndicatorHit>> {
        let rows = self.store.daily_rows(date).await?;
        Ok(technical::oversold(&rows))
    }

    pub async fn kdj_bottom(&self, date: NaiveDate) -> Result<Vec<IndicatorHit>> {
        let rows = self.store.daily_rows(date).await?;
        Ok(technical::kdj_bottom(&rows))
    }

    pub async fn macd_golden_cross(&self, date: NaiveDate) -> Result<Vec<IndicatorHit>> {
        let rows = self.store.daily_rows(date).await?;
        Ok(technical::macd_golden_cross(&rows))
    }

    pub async fn bottom_volume_breakout(&self, date: NaiveDate) -> Result<Vec<BreakoutHit>> {
        let rows = self.store.daily_rows(date).await?;
        let windows = self.store.trailing_bars(date, breakout::LOOKBACK).await?;
        Ok(breakout::bottom_volume_breakout(&rows, &windows))
    }

    pub async fn industry_momentum(&self, date: NaiveDate) -> Result<Vec<SectorHit>> {
        let rows = self.store.daily_rows(date).await?;
        Ok(sector::industry_momentum(&rows))
    }

    pub async fn counter_trend(&self, date: NaiveDate) -> Result<Vec<CounterTrendHit>> {
        let rows = self.store.daily_rows(date).await?;
        let windows = self.store.trailing_bars(date, counter_trend::LOOKBACK).await?;
        Ok(counter_trend::counter_trend(&rows, &windows, &self.settings.index_codes))
    }
}
