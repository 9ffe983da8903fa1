// In crates/screener/src/sector.rs

use crate::rank::{Order, rank_by};
use crate::types::SectorHit;
use crate::window::round2;
use database::DailyRow;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

pub const MIN_ADVANCING: usize = 5;
pub const MIN_AVG_PCT_CHANGE: Decimal = dec!(3);

pub const CAP: usize = 20;

/// Sectors where at least five members rose and the risers averaged more than
/// 3%. Each sector also names its best performer of the day.
pub fn industry_momentum(rows: &[DailyRow]) -> Vec<SectorHit> {
    let mut sectors: BTreeMap<&str, Vec<&DailyRow>> = BTreeMap::new();
    for row in rows.iter().filter(|row| row.bar.pct_change > Decimal::ZERO) {
        if let Some(industry) = row.instrument.industry.as_deref() {
            sectors.entry(industry).or_default().push(row);
        }
    }

    let found: Vec<SectorHit> = sectors
        .into_iter()
        .filter_map(|(industry, members)| summarize(industry, &members))
        .collect();
    rank_by(found, Order::Descending, CAP, |hit: &SectorHit| hit.avg_pct_change)
}

fn summarize(industry: &str, members: &[&DailyRow]) -> Option<SectorHit> {
    if members.len() < MIN_ADVANCING {
        return None;
    }

    let total: Decimal = members.iter().map(|row| row.bar.pct_change).sum();
    let avg = total / Decimal::from(members.len());
    if avg <= MIN_AVG_PCT_CHANGE {
        return None;
    }

    // First member wins a tie for the lead.
    let leader = members
        .iter()
        .copied()
        .reduce(|best, row| if row.bar.pct_change > best.bar.pct_change { row } else { best })?;

    Some(SectorHit {
        industry: industry.to_string(),
        advancing: members.len(),
        avg_pct_change: round2(avg),
        leader_code: leader.instrument.code.clone(),
        leader_name: leader.instrument.name.clone(),
        leader_pct_change: leader.bar.pct_change,
    })
}
