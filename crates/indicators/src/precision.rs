// In crates/indicators/src/precision.rs

use rust_decimal::prelude::*;

/// Decimal places stored for RSI, KDJ and Bollinger values.
pub const PRICE_DP: u32 = 2;
/// Decimal places stored for the MACD fields.
pub const MACD_DP: u32 = 4;

/// Converts an indicator value to a fixed-precision decimal, rounding half away
/// from zero. Non-finite inputs map to zero.
pub fn to_fixed(value: f64, dp: u32) -> Decimal {
    Decimal::from_f64(value)
        .unwrap_or_default()
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_to_requested_places() {
        assert_eq!(to_fixed(66.666_666, PRICE_DP), dec!(66.67));
        assert_eq!(to_fixed(0.123_456, MACD_DP), dec!(0.1235));
        assert!(to_fixed(-0.000_04, MACD_DP).is_zero());
    }

    #[test]
    fn non_finite_is_zero() {
        assert_eq!(to_fixed(f64::NAN, PRICE_DP), Decimal::ZERO);
        assert_eq!(to_fixed(f64::INFINITY, PRICE_DP), Decimal::ZERO);
    }
}
