// In crates/database/src/postgres.rs

use crate::{DailyRow, Db, Error, Result, Storage};
use async_trait::async_trait;
use chrono::NaiveDate;
use core_types::{IndicatorRecord, Instrument, InstrumentId, PriceBar};
use rust_decimal::Decimal;
use std::collections::HashMap;

#[derive(sqlx::FromRow)]
struct PriceBarRow {
    instrument_id: String,
    trade_date: NaiveDate,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    volume: Decimal,
    amount: Decimal,
    pct_change: Decimal,
}

impl From<PriceBarRow> for PriceBar {
    fn from(row: PriceBarRow) -> Self {
        PriceBar {
            instrument_id: InstrumentId(row.instrument_id),
            trade_date: row.trade_date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
            amount: row.amount,
            pct_change: row.pct_change,
        }
    }
}

#[derive(sqlx::FromRow)]
struct IndicatorRow {
    instrument_id: String,
    trade_date: NaiveDate,
    rsi_6: Decimal,
    rsi_12: Decimal,
    macd: Decimal,
    macd_signal: Decimal,
    macd_hist: Decimal,
    k: Decimal,
    d: Decimal,
    j: Decimal,
    boll_upper: Decimal,
    boll_mid: Decimal,
    boll_lower: Decimal,
}

impl From<IndicatorRow> for IndicatorRecord {
    fn from(row: IndicatorRow) -> Self {
        IndicatorRecord {
            instrument_id: InstrumentId(row.instrument_id),
            trade_date: row.trade_date,
            rsi_6: row.rsi_6,
            rsi_12: row.rsi_12,
            macd: row.macd,
            macd_signal: row.macd_signal,
            macd_hist: row.macd_hist,
            k: row.k,
            d: row.d,
            j: row.j,
            boll_upper: row.boll_upper,
            boll_mid: row.boll_mid,
            boll_lower: row.boll_lower,
        }
    }
}

#[derive(sqlx::FromRow)]
struct InstrumentRow {
    code: String,
    name: String,
    industry: Option<String>,
    market: Option<String>,
    list_date: Option<NaiveDate>,
}

impl From<InstrumentRow> for Instrument {
    fn from(row: InstrumentRow) -> Self {
        Instrument {
            code: InstrumentId(row.code),
            name: row.name,
            industry: row.industry,
            market: row.market,
            list_date: row.list_date,
        }
    }
}

/// A bar joined with its instrument and the (possibly missing) indicator row.
#[derive(sqlx::FromRow)]
struct DailyJoinRow {
    code: String,
    name: String,
    industry: Option<String>,
    market: Option<String>,
    list_date: Option<NaiveDate>,
    trade_date: NaiveDate,
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    volume: Decimal,
    amount: Decimal,
    pct_change: Decimal,
    rsi_6: Option<Decimal>,
    rsi_12: Option<Decimal>,
    macd: Option<Decimal>,
    macd_signal: Option<Decimal>,
    macd_hist: Option<Decimal>,
    k: Option<Decimal>,
    d: Option<Decimal>,
    j: Option<Decimal>,
    boll_upper: Option<Decimal>,
    boll_mid: Option<Decimal>,
    boll_lower: Option<Decimal>,
}

impl DailyJoinRow {
    fn indicator(&self) -> Option<IndicatorRecord> {
        Some(IndicatorRecord {
            instrument_id: InstrumentId(self.code.clone()),
            trade_date: self.trade_date,
            rsi_6: self.rsi_6?,
            rsi_12: self.rsi_12?,
            macd: self.macd?,
            macd_signal: self.macd_signal?,
            macd_hist: self.macd_hist?,
            k: self.k?,
            d: self.d?,
            j: self.j?,
            boll_upper: self.boll_upper?,
            boll_mid: self.boll_mid?,
            boll_lower: self.boll_lower?,
        })
    }
}

impl From<DailyJoinRow> for DailyRow {
    fn from(row: DailyJoinRow) -> Self {
        let indicator = row.indicator();
        let instrument_id = InstrumentId(row.code.clone());
        DailyRow {
            bar: PriceBar {
                instrument_id: instrument_id.clone(),
                trade_date: row.trade_date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
                amount: row.amount,
                pct_change: row.pct_change,
            },
            instrument: Instrument {
                code: instrument_id,
                name: row.name,
                industry: row.industry,
                market: row.market,
                list_date: row.list_date,
            },
            indicator,
        }
    }
}

#[async_trait]
impl Storage for Db {
    async fn fetch_history(
        &self,
        instrument: &InstrumentId,
        as_of: NaiveDate,
        limit: usize,
    ) -> Result<Vec<PriceBar>> {
        let rows = sqlx::query_as::<_, PriceBarRow>(
            r#"
            SELECT instrument_id, trade_date, open, high, low, close, volume, amount, pct_change
            FROM daily_bars
            WHERE instrument_id = $1 AND trade_date <= $2
            ORDER BY trade_date DESC
            LIMIT $3
            "#,
        )
        .bind(instrument.as_str())
        .bind(as_of)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.0)
        .await
        .map_err(Error::OperationFailed)?;

        Ok(rows.into_iter().map(PriceBar::from).collect())
    }

    async fn upsert_indicator(&self, record: &IndicatorRecord) -> Result<()> {
        // A single statement keyed on the primary key, so Postgres serializes
        // concurrent writers and never mixes two passes in one row.
        sqlx::query(
            r#"
            INSERT INTO indicators (
                instrument_id, trade_date, rsi_6, rsi_12, macd, macd_signal, macd_hist,
                k, d, j, boll_upper, boll_mid, boll_lower, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, now())
            ON CONFLICT (instrument_id, trade_date) DO UPDATE SET
                rsi_6 = EXCLUDED.rsi_6,
                rsi_12 = EXCLUDED.rsi_12,
                macd = EXCLUDED.macd,
                macd_signal = EXCLUDED.macd_signal,
                macd_hist = EXCLUDED.macd_hist,
                k = EXCLUDED.k,
                d = EXCLUDED.d,
                j = EXCLUDED.j,
                boll_upper = EXCLUDED.boll_upper,
                boll_mid = EXCLUDED.boll_mid,
                boll_lower = EXCLUDED.boll_lower,
                updated_at = now()
            "#,
        )
        .bind(record.instrument_id.as_str())
        .bind(record.trade_date)
        .bind(record.rsi_6)
        .bind(record.rsi_12)
        .bind(record.macd)
        .bind(record.macd_signal)
        .bind(record.macd_hist)
        .bind(record.k)
        .bind(record.d)
        .bind(record.j)
        .bind(record.boll_upper)
        .bind(record.boll_mid)
        .bind(record.boll_lower)
        .execute(&self.0)
        .await
        .map_err(Error::OperationFailed)?;

        Ok(())
    }

    async fn get_indicator(
        &self,
        instrument: &InstrumentId,
        trade_date: NaiveDate,
    ) -> Result<Option<IndicatorRecord>> {
        let row = sqlx::query_as::<_, IndicatorRow>(
            r#"
            SELECT instrument_id, trade_date, rsi_6, rsi_12, macd, macd_signal, macd_hist,
                   k, d, j, boll_upper, boll_mid, boll_lower
            FROM indicators
            WHERE instrument_id = $1 AND trade_date = $2
            "#,
        )
        .bind(instrument.as_str())
        .bind(trade_date)
        .fetch_optional(&self.0)
        .await
        .map_err(Error::OperationFailed)?;

        Ok(row.map(IndicatorRecord::from))
    }

    async fn list_instruments(&self) -> Result<Vec<Instrument>> {
        let rows = sqlx::query_as::<_, InstrumentRow>(
            "SELECT code, name, industry, market, list_date FROM instruments ORDER BY code",
        )
        .fetch_all(&self.0)
        .await
        .map_err(Error::OperationFailed)?;

        Ok(rows.into_iter().map(Instrument::from).collect())
    }

    async fn daily_rows(&self, date: NaiveDate) -> Result<Vec<DailyRow>> {
        let rows = sqlx::query_as::<_, DailyJoinRow>(
            r#"
            SELECT i.code, i.name, i.industry, i.market, i.list_date,
                   b.trade_date, b.open, b.high, b.low, b.close, b.volume, b.amount, b.pct_change,
                   t.rsi_6, t.rsi_12, t.macd, t.macd_signal, t.macd_hist,
                   t.k, t.d, t.j, t.boll_upper, t.boll_mid, t.boll_lower
            FROM daily_bars b
            JOIN instruments i ON i.code = b.instrument_id
            LEFT JOIN indicators t
                ON t.instrument_id = b.instrument_id AND t.trade_date = b.trade_date
            WHERE b.trade_date = $1
            ORDER BY b.instrument_id
            "#,
        )
        .bind(date)
        .fetch_all(&self.0)
        .await
        .map_err(Error::OperationFailed)?;

        Ok(rows.into_iter().map(DailyRow::from).collect())
    }

    async fn trailing_bars(
        &self,
        date: NaiveDate,
        lookback: usize,
    ) -> Result<HashMap<InstrumentId, Vec<PriceBar>>> {
        let rows = sqlx::query_as::<_, PriceBarRow>(
            r#"
            SELECT instrument_id, trade_date, open, high, low, close, volume, amount, pct_change
            FROM (
                SELECT b.*,
                       ROW_NUMBER() OVER (
                           PARTITION BY b.instrument_id ORDER BY b.trade_date DESC
                       ) AS rn
                FROM daily_bars b
                WHERE b.trade_date <= $1
                  AND b.instrument_id IN (SELECT instrument_id FROM daily_bars WHERE trade_date = $1)
            ) w
            WHERE w.rn <= $2
            ORDER BY instrument_id, trade_date
            "#,
        )
        .bind(date)
        .bind(i64::try_from(lookback).unwrap_or(i64::MAX))
        .fetch_all(&self.0)
        .await
        .map_err(Error::OperationFailed)?;

        let mut windows: HashMap<InstrumentId, Vec<PriceBar>> = HashMap::new();
        for bar in rows.into_iter().map(PriceBar::from) {
            windows.entry(bar.instrument_id.clone()).or_default().push(bar);
        }
        Ok(windows)
    }
}
