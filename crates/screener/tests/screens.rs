use app_config::ScreenerSettings;
use chrono::{Days, NaiveDate};
use core_types::{IndicatorRecord, Instrument, InstrumentId, PriceBar};
use database::{MemoryStore, Storage};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use screener::{Filter, ScreenResult, Screener};
use std::sync::Arc;

fn day(n: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(n)
}

const TODAY: u64 = 70;

struct Market {
    store: Arc<MemoryStore>,
}

impl Market {
    fn new() -> Self {
        Self { store: Arc::new(MemoryStore::new()) }
    }

    fn instrument(&self, code: &str, industry: Option<&str>) {
        self.store
            .insert_instrument(Instrument {
                code: InstrumentId::new(code),
                name: format!("{code} Co"),
                industry: industry.map(str::to_string),
                market: Some("main".into()),
                list_date: None,
            })
            .unwrap();
    }

    fn bar(&self, code: &str, n: u64, close: Decimal, high: Decimal, low: Decimal, volume: Decimal, pct: Decimal) {
        self.store
            .insert_bars([PriceBar {
                instrument_id: InstrumentId::new(code),
                trade_date: day(n),
                open: close,
                high,
                low,
                close,
                volume,
                amount: close * volume,
                pct_change: pct,
            }])
            .unwrap();
    }

    /// A quiet day for `code`.
    fn today(&self, code: &str, pct: Decimal) {
        self.bar(code, TODAY, dec!(10), dec!(10.5), dec!(9.5), dec!(1000), pct);
    }

    async fn indicator(&self, code: &str, rsi_6: Decimal, k: Decimal, d: Decimal, hist: Decimal) {
        self.store
            .upsert_indicator(&IndicatorRecord {
                instrument_id: InstrumentId::new(code),
                trade_date: day(TODAY),
                rsi_6,
                rsi_12: rsi_6,
                macd: dec!(0.5),
                macd_signal: dec!(0.5),
                macd_hist: hist,
                k,
                d,
                j: k * dec!(3) - d * dec!(2),
                boll_upper: dec!(11),
                boll_mid: dec!(10),
                boll_lower: dec!(9),
            })
            .await
            .unwrap();
    }

    fn screener(&self) -> Screener<Arc<MemoryStore>> {
        Screener::new(self.store.clone(), ScreenerSettings::default())
    }
}

fn codes<'a>(hits: impl IntoIterator<Item = &'a InstrumentId>) -> Vec<String> {
    hits.into_iter().map(|id| id.to_string()).collect()
}

#[tokio::test]
async fn oversold_is_capped_and_sorted_with_stable_ties() {
    let market = Market::new();
    for i in 0..70u32 {
        let code = format!("{:06}.SZ", i);
        market.instrument(&code, Some("Retail"));
        market.today(&code, dec!(-1));
        market.indicator(&code, Decimal::from(i % 35), dec!(50), dec!(50), dec!(0)).await;
    }

    let hits = market.screener().oversold(day(TODAY)).await.unwrap();
    assert_eq!(hits.len(), Filter::Oversold.cap());
    assert!(hits.iter().all(|hit| hit.rsi_6 < dec!(30)));
    assert!(hits.windows(2).all(|w| w[0].rsi_6 <= w[1].rsi_6));
    // rsi 0 appears for 000000 and 000035; code order is the input order.
    assert_eq!(codes(hits.iter().take(2).map(|h| &h.code)), vec!["000000.SZ", "000035.SZ"]);
}

#[tokio::test]
async fn kdj_bottom_needs_both_lines_low() {
    let market = Market::new();
    for (code, k, d) in [("A", dec!(15), dec!(15)), ("B", dec!(10), dec!(25)), ("C", dec!(5), dec!(5)), ("D", dec!(20), dec!(10))] {
        market.instrument(code, None);
        market.today(code, dec!(0));
        market.indicator(code, dec!(50), k, d, dec!(0)).await;
    }

    let hits = market.screener().kdj_bottom(day(TODAY)).await.unwrap();
    assert_eq!(codes(hits.iter().map(|h| &h.code)), vec!["C", "A"]);
}

#[tokio::test]
async fn macd_cross_window_is_open_on_both_ends() {
    let market = Market::new();
    for (code, hist) in [("A", dec!(0)), ("B", dec!(0.05)), ("C", dec!(0.1)), ("D", dec!(-0.01)), ("E", dec!(0.0001))] {
        market.instrument(code, None);
        market.today(code, dec!(0));
        market.indicator(code, dec!(50), dec!(50), dec!(50), hist).await;
    }

    let hits = market.screener().macd_golden_cross(day(TODAY)).await.unwrap();
    assert_eq!(codes(hits.iter().map(|h| &h.code)), vec!["E", "B"]);
}

#[tokio::test]
async fn rows_without_indicators_are_skipped() {
    let market = Market::new();
    market.instrument("A", None);
    market.today("A", dec!(0));

    let result = market.screener().run(Filter::Oversold, day(TODAY)).await.unwrap();
    assert!(result.is_empty());
    assert_eq!(result.filter(), Filter::Oversold);
}

/// Sixty quiet days swinging between 10 and 20, then `today`.
fn breakout_history(market: &Market, code: &str, days: u64, flat: bool) {
    for n in TODAY - days..TODAY {
        let (high, low) = if flat { (dec!(15), dec!(15)) } else if n % 2 == 0 { (dec!(20), dec!(19)) } else { (dec!(11), dec!(10)) };
        market.bar(code, n, low, high, low, dec!(1000), dec!(0.5));
    }
}

#[allow(clippy::too_many_arguments)]
async fn add_breakout(
    market: &Market,
    code: &str,
    days: u64,
    flat: bool,
    close: Decimal,
    volume: Decimal,
    pct: Decimal,
    rsi: Decimal,
) {
    market.instrument(code, Some("Chips"));
    breakout_history(market, code, days, flat);
    let (high, low) = if flat { (close, close) } else { (close + dec!(0.2), close - dec!(0.4)) };
    market.bar(code, TODAY, close, high, low, volume, pct);
    market.indicator(code, rsi, dec!(50), dec!(50), dec!(0)).await;
}

#[tokio::test]
async fn bottom_volume_breakout_applies_every_condition() {
    let market = Market::new();
    let setups = [
        // code, history days, flat range, today's close, volume, pct, rsi
        ("STRONG", 60, false, dec!(11), dec!(5000), dec!(4), dec!(40)),
        ("MILD", 60, false, dec!(11), dec!(3500), dec!(3.5), dec!(45)),
        ("THIN", 60, false, dec!(11), dec!(2500), dec!(4), dec!(40)),
        ("EVEN", 60, false, dec!(11), dec!(3000), dec!(4), dec!(40)),
        ("FLAT", 60, true, dec!(15), dec!(9000), dec!(4), dec!(40)),
        ("HOT", 60, false, dec!(11), dec!(9000), dec!(4), dec!(55)),
        ("SLOW", 60, false, dec!(11), dec!(9000), dec!(3), dec!(40)),
        ("NEW", 15, false, dec!(11), dec!(9000), dec!(4), dec!(40)),
        // 30% up the 10..20 range.
        ("HIGH", 60, false, dec!(13), dec!(9000), dec!(4), dec!(40)),
    ];
    for (code, days, flat, close, volume, pct, rsi) in setups {
        add_breakout(&market, code, days, flat, close, volume, pct, rsi).await;
    }

    let hits = market.screener().bottom_volume_breakout(day(TODAY)).await.unwrap();
    assert_eq!(codes(hits.iter().map(|h| &h.code)), vec!["STRONG", "MILD"]);

    let strong = &hits[0];
    assert_eq!(strong.avg_volume_20, dec!(1000));
    assert_eq!(strong.volume_ratio, dec!(5));
    assert_eq!(strong.high_60, dec!(20));
    assert_eq!(strong.low_60, dec!(10));
    assert_eq!(strong.range_position, dec!(10));
}

#[tokio::test]
async fn breakouts_rank_on_the_unrounded_volume_ratio() {
    let market = Market::new();
    add_breakout(&market, "AAA", 60, false, dec!(11), dec!(3001), dec!(4), dec!(40)).await;
    add_breakout(&market, "ZZZ", 60, false, dec!(11), dec!(3004), dec!(4), dec!(40)).await;

    let hits = market.screener().bottom_volume_breakout(day(TODAY)).await.unwrap();
    assert_eq!(codes(hits.iter().map(|h| &h.code)), vec!["ZZZ", "AAA"]);
    assert!(hits.iter().all(|h| h.volume_ratio == dec!(3.00)));
}

#[tokio::test]
async fn industry_momentum_groups_risers_and_names_a_leader() {
    let market = Market::new();
    let add = |code: &str, industry: &str, pct: Decimal| {
        market.instrument(code, Some(industry));
        market.today(code, pct);
    };

    // Chips: six risers averaging 5%, one decliner that does not count.
    for (i, pct) in [dec!(3), dec!(4), dec!(8), dec!(5), dec!(8), dec!(2)].into_iter().enumerate() {
        add(&format!("CH{i}"), "Chips", pct);
    }
    add("CH9", "Chips", dec!(-6));
    // Power: five risers averaging 4%.
    for i in 0..5 {
        add(&format!("PW{i}"), "Power", dec!(4));
    }
    // Banks: only four risers.
    for i in 0..4 {
        add(&format!("BK{i}"), "Banks", dec!(9));
    }
    // Steel: five risers but a 2% average.
    for i in 0..5 {
        add(&format!("ST{i}"), "Steel", dec!(2));
    }

    let hits = market.screener().industry_momentum(day(TODAY)).await.unwrap();
    let names: Vec<&str> = hits.iter().map(|h| h.industry.as_str()).collect();
    assert_eq!(names, vec!["Chips", "Power"]);

    let chips = &hits[0];
    assert_eq!(chips.advancing, 6);
    assert_eq!(chips.avg_pct_change, dec!(5));
    // CH2 and CH4 tie at 8%; the first one leads.
    assert_eq!(chips.leader_code, InstrumentId::new("CH2"));
    assert_eq!(chips.leader_pct_change, dec!(8));
    assert_eq!(hits[1].leader_code, InstrumentId::new("PW0"));
}

#[tokio::test]
async fn industry_momentum_caps_at_twenty_sectors() {
    let market = Market::new();
    for s in 0..25 {
        for i in 0..5 {
            let code = format!("S{s:02}-{i}");
            market.instrument(&code, Some(&format!("Sector{s:02}")));
            market.today(&code, Decimal::from(4 + s));
        }
    }

    let hits = market.screener().industry_momentum(day(TODAY)).await.unwrap();
    assert_eq!(hits.len(), Filter::IndustryMomentum.cap());
    assert_eq!(hits[0].industry, "Sector24");
    assert!(hits.windows(2).all(|w| w[0].avg_pct_change >= w[1].avg_pct_change));
}

#[tokio::test]
async fn counter_trend_drops_indices_and_reports_context() {
    let market = Market::new();
    for code in ["000300.SH", "600001.SH", "600002.SH", "600003.SH"] {
        market.instrument(code, Some("Mixed"));
    }
    for n in TODAY - 10..TODAY {
        market.bar("600001.SH", n, dec!(10), dec!(10), dec!(10), dec!(1000), dec!(0));
    }
    market.bar("000300.SH", TODAY, dec!(3500), dec!(3510), dec!(3400), dec!(1000), dec!(-1.5));
    market.bar("600001.SH", TODAY, dec!(11), dec!(11), dec!(10), dec!(2500), dec!(6));
    market.bar("600002.SH", TODAY, dec!(11), dec!(11), dec!(10), dec!(2500), dec!(9.9));
    market.bar("600003.SH", TODAY, dec!(11), dec!(11), dec!(10), dec!(2500), dec!(2));

    let result = market.screener().run(Filter::CounterTrend, day(TODAY)).await.unwrap();
    let ScreenResult::CounterTrend(hits) = result else {
        panic!("wrong result variant");
    };

    assert_eq!(codes(hits.iter().map(|h| &h.code)), vec!["600002.SH", "600001.SH"]);
    assert_eq!(hits[1].volume_ratio_10, Some(dec!(2.5)));
    // 600002 has no earlier bars.
    assert_eq!(hits[0].volume_ratio_10, None);
    assert!(hits.iter().all(|h| h.market_pct_change == Some(dec!(-1.5))));
}
