//! In-memory implementation of the record store.
//!
//! Used when no persistent storage is configured and by tests. Records live
//! in a shared vector; ids are assigned sequentially starting at 1.

use super::source::RecordStore;
use crate::error::{Result, SalesError};
use crate::models::{NewSalesRecord, RegionRevenue, SalesFilter, SalesRecord};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard};

/// A record store that keeps every record in process memory.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<Vec<SalesRecord>>,
}

impl InMemoryRecordStore {
    /// Creates an empty `InMemoryRecordStore`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record and returns the id assigned to it.
    pub fn insert(&self, record: NewSalesRecord) -> Result<i64> {
        let mut records = self
            .records
            .write()
            .map_err(|_| SalesError::StoreUnavailable("record buffer poisoned".to_string()))?;
        let id = records.last().map_or(1, |r| r.id + 1);
        records.push(record.with_id(id));
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.read().map_or(0, |records| records.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<SalesRecord>>> {
        self.records
            .read()
            .map_err(|_| SalesError::StoreUnavailable("record buffer poisoned".to_string()))
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn fetch_all(&self) -> Result<Vec<SalesRecord>> {
        Ok(self.read()?.clone())
    }

    async fn fetch_filtered(&self, filter: &SalesFilter) -> Result<Vec<SalesRecord>> {
        let records = self.read()?;
        Ok(records.iter().filter(|r| filter.matches(r)).cloned().collect())
    }

    async fn revenue_per_region(&self) -> Result<Vec<RegionRevenue>> {
        let records = self.read()?;
        // Option orders None first, the same place SQLite puts a NULL group.
        let mut totals: BTreeMap<Option<String>, f64> = BTreeMap::new();
        for record in records.iter() {
            *totals.entry(record.region.clone()).or_insert(0.0) += record.revenue.unwrap_or(0.0);
        }

        Ok(totals
            .into_iter()
            .map(|(region, total_revenue)| RegionRevenue {
                region,
                total_revenue,
            })
            .collect())
    }
}
