use indicators::bollinger::{bollinger, BOLL_PERIOD};
use indicators::ema::ema;
use indicators::kdj::kdj;
use indicators::rsi::rsi;
use proptest::prelude::*;

fn closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..500.0, 26..120)
}

proptest! {
    #[test]
    fn rsi_stays_in_range(closes in closes(), period in 1usize..20) {
        let value = rsi(&closes, period);
        prop_assert!((0.0..=100.0).contains(&value), "rsi {value}");
    }

    #[test]
    fn rsi_is_one_hundred_without_losses(start in 1.0f64..100.0, steps in prop::collection::vec(0.0f64..2.0, 26..60)) {
        let closes: Vec<f64> = steps.iter().scan(start, |acc, step| { *acc += step; Some(*acc) }).collect();
        prop_assert_eq!(rsi(&closes, 6), 100.0);
    }

    #[test]
    fn ema_of_constant_is_constant(value in 0.01f64..1000.0, len in 1usize..80, period in 1usize..30) {
        for v in ema(&vec![value; len], period) {
            prop_assert!((v - value).abs() <= value * 1e-12);
        }
    }

    #[test]
    fn bollinger_bands_are_ordered(closes in closes()) {
        let bands = bollinger(&closes, BOLL_PERIOD);
        prop_assert!(bands.upper >= bands.mid);
        prop_assert!(bands.mid >= bands.lower);
        let above = bands.upper - bands.mid;
        let below = bands.mid - bands.lower;
        prop_assert!((above - below).abs() <= 1e-9 * bands.mid.abs().max(1.0), "above {above} below {below}");
    }

    #[test]
    fn kdj_lines_coincide(bars in prop::collection::vec((1.0f64..100.0, 0.0f64..5.0, 0.0f64..1.0), 9..40)) {
        let lows: Vec<f64> = bars.iter().map(|(low, _, _)| *low).collect();
        let highs: Vec<f64> = bars.iter().map(|(low, width, _)| low + width).collect();
        let closes: Vec<f64> = bars.iter().map(|(low, width, at)| low + width * at).collect();

        let value = kdj(&highs, &lows, &closes);
        prop_assert!((0.0..=100.0).contains(&value.k), "k {}", value.k);
        prop_assert_eq!(value.k, value.d);
        prop_assert_eq!(value.j, 3.0 * value.k - 2.0 * value.d);
    }
}
