// In crates/indicators/src/bollinger.rs

use ta::Next;
use ta::indicators::BollingerBands;

pub const BOLL_PERIOD: usize = 20;
pub const BOLL_WIDTH: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub upper: f64,
    pub mid: f64,
    pub lower: f64,
    /// Population standard deviation of the window.
    pub std_dev: f64,
}

/// Bollinger Bands over the trailing `period` closes.
///
/// The window is fed through `ta`'s bands, which use the population standard
/// deviation. An empty window or a zero period yields all-zero bands.
pub fn bollinger(closes: &[f64], period: usize) -> Bands {
    let empty = Bands { upper: 0.0, mid: 0.0, lower: 0.0, std_dev: 0.0 };
    let window = &closes[closes.len().saturating_sub(period)..];
    let Ok(mut bands) = BollingerBands::new(period, BOLL_WIDTH) else {
        return empty;
    };

    let Some(last) = window.iter().map(|close| bands.next(*close)).last() else {
        return empty;
    };

    Bands {
        upper: last.upper,
        mid: last.average,
        lower: last.lower,
        std_dev: (last.upper - last.average) / BOLL_WIDTH,
    }
}
