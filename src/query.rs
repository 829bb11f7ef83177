use crate::error::Result;
use crate::models::{RegionRevenue, SalesFilter, SalesRecord};
use crate::store::RecordStore;
use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::debug;

/// Filtered lookups and per-region aggregation over a [`RecordStore`].
///
/// Holds no state of its own beyond the store handle, so cloning is cheap
/// and every call is an independent read.
#[derive(Clone)]
pub struct SalesQueryService {
    store: Arc<dyn RecordStore>,
}

impl SalesQueryService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn fetch_all(&self) -> Result<Vec<SalesRecord>> {
        let records = self.store.fetch_all().await?;
        debug!(count = records.len(), "Fetched all sales records");
        Ok(records)
    }

    /// Records matching every supplied clause.
    ///
    /// `region` and `min_lead_score` are skipped when `None`; the date range
    /// is always applied. An inverted range yields an empty result.
    pub async fn fetch_filtered(
        &self,
        region: Option<String>,
        min_lead_score: Option<f64>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<SalesRecord>> {
        let filter = SalesFilter::new(region, min_lead_score, start, end);
        let records = self.store.fetch_filtered(&filter).await?;
        debug!(
            region = ?filter.region,
            min_lead_score = ?filter.min_lead_score,
            start = %filter.start,
            end = %filter.end,
            count = records.len(),
            "Fetched filtered sales records"
        );
        Ok(records)
    }

    pub async fn revenue_per_region(&self) -> Result<Vec<RegionRevenue>> {
        let totals = self.store.revenue_per_region().await?;
        debug!(regions = totals.len(), "Aggregated revenue per region");
        Ok(totals)
    }
}
