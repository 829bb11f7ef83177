use crate::error::{Result, SalesError};
use crate::models::{NewSalesRecord, RegionRevenue, SalesFilter, SalesRecord};
use chrono::{DateTime, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::sync::{Mutex, MutexGuard};
use tracing::info;

const RECORD_COLUMNS: &str =
    "id, customer_name, region, product, revenue, interaction_date, lead_score";

pub struct DbClient {
    db_path: String,
    conn: Mutex<Connection>,
}

impl DbClient {
    pub fn new(db_path: String) -> Result<Self> {
        let conn = Connection::open(&db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Ok(Self {
            db_path,
            conn: Mutex::new(conn),
        })
    }

    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            db_path: ":memory:".to_string(),
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| SalesError::StoreUnavailable("database connection poisoned".to_string()))
    }

    pub fn initialize(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS sales_data (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                customer_name TEXT,
                region TEXT,
                product TEXT,
                revenue REAL,
                interaction_date INTEGER NOT NULL,
                lead_score REAL
            )",
            [],
        )?;

        // Indices
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_sales_region ON sales_data(region)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_sales_interaction_date ON sales_data(interaction_date)",
            [],
        )?;

        info!("SQLite database initialized at {}", self.db_path);
        Ok(())
    }

    pub fn count(&self) -> Result<u64> {
        let conn = self.lock()?;
        let count: i64 = conn
            .prepare_cached("SELECT COUNT(*) FROM sales_data")?
            .query_row([], |r| r.get(0))?;
        Ok(count as u64)
    }

    pub fn insert_record(&self, record: &NewSalesRecord) -> Result<i64> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(
            "INSERT INTO sales_data (
                customer_name, region, product, revenue, interaction_date, lead_score
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;

        stmt.execute(params![
            record.customer_name,
            record.region,
            record.product,
            record.revenue,
            to_micros(&record.interaction_date),
            record.lead_score
        ])?;

        Ok(conn.last_insert_rowid())
    }

    pub fn fetch_all(&self) -> Result<Vec<SalesRecord>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare_cached(&format!("SELECT {RECORD_COLUMNS} FROM sales_data ORDER BY id"))?;

        let rows = stmt.query_map([], map_record)?;
        let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    pub fn fetch_filtered(&self, filter: &SalesFilter) -> Result<Vec<SalesRecord>> {
        let conn = self.lock()?;
        // A NULL lead_score compares as NULL, so thresholded queries drop it.
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {RECORD_COLUMNS} FROM sales_data WHERE
                (?1 IS NULL OR region = ?1)
                AND (?2 IS NULL OR lead_score >= ?2)
                AND interaction_date >= ?3
                AND interaction_date <= ?4
             ORDER BY id"
        ))?;

        let rows = stmt.query_map(
            params![
                filter.region,
                filter.min_lead_score,
                to_micros(&filter.start),
                to_micros(&filter.end)
            ],
            map_record,
        )?;
        let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    pub fn revenue_per_region(&self) -> Result<Vec<RegionRevenue>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(
            "SELECT region, COALESCE(SUM(revenue), 0.0) FROM sales_data
             GROUP BY region ORDER BY region",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(RegionRevenue {
                region: row.get(0)?,
                total_revenue: row.get(1)?,
            })
        })?;
        let totals = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(totals)
    }
}

/// `interaction_date` is stored as microseconds since the Unix epoch.
fn to_micros(ts: &NaiveDateTime) -> i64 {
    ts.and_utc().timestamp_micros()
}

fn map_record(row: &Row<'_>) -> rusqlite::Result<SalesRecord> {
    let micros: i64 = row.get(5)?;
    let interaction_date = DateTime::from_timestamp_micros(micros)
        .map(|ts| ts.naive_utc())
        .ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                Type::Integer,
                format!("interaction_date out of range: {}", micros).into(),
            )
        })?;

    Ok(SalesRecord {
        id: row.get(0)?,
        customer_name: row.get(1)?,
        region: row.get(2)?,
        product: row.get(3)?,
        revenue: row.get(4)?,
        interaction_date,
        lead_score: row.get(6)?,
    })
}
