//! Database-backed implementation of the record store.
//!
//! Delegates every read to the SQLite `DbClient`, so data survives restarts.

use super::source::RecordStore;
use crate::db::DbClient;
use crate::error::Result;
use crate::models::{RegionRevenue, SalesFilter, SalesRecord};
use async_trait::async_trait;
use std::sync::Arc;

/// A record store that reads from a persistent SQLite database.
pub struct SqliteRecordStore {
    /// Client for database operations.
    db: Arc<DbClient>,
}

impl SqliteRecordStore {
    /// Creates a new `SqliteRecordStore`.
    pub fn new(db: Arc<DbClient>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn fetch_all(&self) -> Result<Vec<SalesRecord>> {
        self.db.fetch_all()
    }

    async fn fetch_filtered(&self, filter: &SalesFilter) -> Result<Vec<SalesRecord>> {
        self.db.fetch_filtered(filter)
    }

    async fn revenue_per_region(&self) -> Result<Vec<RegionRevenue>> {
        self.db.revenue_per_region()
    }
}
