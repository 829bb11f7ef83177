use crate::error::Result;
use crate::models::{RegionRevenue, SalesFilter, SalesRecord};
use async_trait::async_trait;

/// Read capability the query layer needs from a backing store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record, in the store's natural order.
    async fn fetch_all(&self) -> Result<Vec<SalesRecord>>;

    /// Records satisfying every clause of `filter`.
    async fn fetch_filtered(&self, filter: &SalesFilter) -> Result<Vec<SalesRecord>>;

    /// Sum of revenue grouped by region, one row per distinct region present.
    async fn revenue_per_region(&self) -> Result<Vec<RegionRevenue>>;
}
