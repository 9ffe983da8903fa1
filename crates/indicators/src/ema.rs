// In crates/indicators/src/ema.rs

use ta::Next;
use ta::indicators::ExponentialMovingAverage as Ema;

/// Exponential moving average of the full series.
///
/// The first element seeds the average and every later element is folded in
/// with `k = 2 / (period + 1)`, so early values lean towards the seed. The
/// result has one value per input element. A zero period yields an empty vec.
pub fn ema(series: &[f64], period: usize) -> Vec<f64> {
    let Ok(mut ema) = Ema::new(period) else {
        return Vec::new();
    };
    series.iter().map(|value| ema.next(*value)).collect()
}

/// The last value of `ema`, or `None` for an empty series.
pub fn last_ema(series: &[f64], period: usize) -> Option<f64> {
    ema(series, period).last().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_with_first_value() {
        // period 3 => k = 0.5
        let values = ema(&[10.0, 11.0, 12.0, 13.0], 3);
        assert_eq!(values.len(), 4);
        assert!((values[0] - 10.0).abs() < 1e-12);
        assert!((values[1] - 10.5).abs() < 1e-12);
        assert!((values[2] - 11.25).abs() < 1e-12);
        assert!((values[3] - 12.125).abs() < 1e-12);
    }

    #[test]
    fn constant_series_stays_constant() {
        for value in ema(&[42.0; 40], 12) {
            assert!((value - 42.0).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_period_is_empty() {
        assert!(ema(&[1.0, 2.0], 0).is_empty());
        assert_eq!(last_ema(&[], 12), None);
    }
}
