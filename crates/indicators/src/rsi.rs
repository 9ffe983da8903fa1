// In crates/indicators/src/rsi.rs

/// Relative Strength Index over the most recent `period` price changes.
///
/// Gains and losses are averaged with a plain mean rather than Wilder's
/// smoothing. When the average loss is zero the result is 100, including a
/// series with no movement at all. The value is not rounded here.
pub fn rsi(closes: &[f64], period: usize) -> f64 {
    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let recent = &deltas[deltas.len().saturating_sub(period)..];

    if recent.is_empty() {
        return 100.0;
    }

    let (gains, losses) = recent.iter().fold((0.0_f64, 0.0_f64), |(g, l), &delta| {
        if delta > 0.0 {
            (g + delta, l)
        } else {
            (g, l - delta)
        }
    });

    let count = recent.len() as f64;
    let avg_gain = gains / count;
    let avg_loss = losses / count;

    if avg_loss == 0.0 {
        return 100.0;
    }

    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}
