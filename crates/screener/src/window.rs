// In crates/screener/src/window.rs

use core_types::PriceBar;
use rust_decimal::{Decimal, RoundingStrategy};

/// Mean volume of up to `window` bars before the last bar of `bars`, with the
/// number of bars it was taken over. `None` when there is no earlier bar.
pub fn prior_average_volume(bars: &[PriceBar], window: usize) -> Option<(Decimal, usize)> {
    let (_, earlier) = bars.split_last()?;
    let prior = &earlier[earlier.len().saturating_sub(window)..];
    if prior.is_empty() {
        return None;
    }
    let total: Decimal = prior.iter().map(|bar| bar.volume).sum();
    Some((total / Decimal::from(prior.len()), prior.len()))
}

/// Highest high and lowest low of the last `window` bars.
pub fn price_range(bars: &[PriceBar], window: usize) -> Option<(Decimal, Decimal)> {
    let recent = &bars[bars.len().saturating_sub(window)..];
    let high = recent.iter().map(|bar| bar.high).max()?;
    let low = recent.iter().map(|bar| bar.low).min()?;
    Some((high, low))
}

/// Position of `close` inside `[low, high]` in percent. `None` for an empty
/// or inverted range.
pub fn range_position(close: Decimal, high: Decimal, low: Decimal) -> Option<Decimal> {
    if high <= low {
        return None;
    }
    ((close - low) * Decimal::ONE_HUNDRED).checked_div(high - low)
}

/// `value / base`, or `None` when `base` is not positive.
pub fn ratio(value: Decimal, base: Decimal) -> Option<Decimal> {
    if base <= Decimal::ZERO {
        return None;
    }
    value.checked_div(base)
}

pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
