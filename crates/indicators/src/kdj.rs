// In crates/indicators/src/kdj.rs

pub const KDJ_PERIOD: usize = 9;

/// RSV used when the window's high equals its low.
pub const FLAT_RANGE_RSV: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kdj {
    pub rsv: f64,
    pub k: f64,
    pub d: f64,
    pub j: f64,
}

/// Raw stochastic value of the latest close inside the trailing `period` bars.
pub fn rsv(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> f64 {
    let hn = trailing(highs, period).iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let ln = trailing(lows, period).iter().copied().fold(f64::INFINITY, f64::min);
    let Some(&cn) = closes.last() else {
        return FLAT_RANGE_RSV;
    };

    if hn <= ln {
        return FLAT_RANGE_RSV;
    }

    100.0 * (cn - ln) / (hn - ln)
}

fn trailing(values: &[f64], period: usize) -> &[f64] {
    &values[values.len().saturating_sub(period)..]
}

/// KDJ on the latest bar.
///
/// K and D are not smoothed across days: both equal today's RSV, which makes
/// `J = 3K - 2D` equal to K as well.
pub fn kdj(highs: &[f64], lows: &[f64], closes: &[f64]) -> Kdj {
    let rsv = rsv(highs, lows, closes, KDJ_PERIOD);
    let k = rsv;
    let d = rsv;
    Kdj {
        rsv,
        k,
        d,
        j: 3.0 * k - 2.0 * d,
    }
}
