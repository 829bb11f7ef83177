use chrono::{NaiveDate, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One customer interaction event as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRecord {
    pub id: i64,
    pub customer_name: Option<String>,
    pub region: Option<String>,
    pub product: Option<String>,
    pub revenue: Option<f64>,
    pub interaction_date: NaiveDateTime,
    pub lead_score: Option<f64>,
}

/// A record that has not been persisted yet. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSalesRecord {
    pub customer_name: Option<String>,
    pub region: Option<String>,
    pub product: Option<String>,
    pub revenue: Option<f64>,
    pub interaction_date: NaiveDateTime,
    pub lead_score: Option<f64>,
}

impl NewSalesRecord {
    pub fn with_id(self, id: i64) -> SalesRecord {
        SalesRecord {
            id,
            customer_name: self.customer_name,
            region: self.region,
            product: self.product,
            revenue: self.revenue,
            interaction_date: truncate_to_micros(self.interaction_date),
            lead_score: self.lead_score,
        }
    }
}

/// Timestamps are kept at microsecond precision in every store.
pub fn truncate_to_micros(ts: NaiveDateTime) -> NaiveDateTime {
    ts.trunc_subsecs(6)
}

/// Conjunctive predicate over region, lead score and interaction date.
///
/// The date bounds are always present; callers substitute defaults before
/// building a filter, so there is no "unbounded" form. Bounds are truncated
/// to microseconds like stored dates.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesFilter {
    pub region: Option<String>,
    pub min_lead_score: Option<f64>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl SalesFilter {
    pub fn new(
        region: Option<String>,
        min_lead_score: Option<f64>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            region,
            min_lead_score,
            start: truncate_to_micros(start),
            end: truncate_to_micros(end),
        }
    }

    pub fn matches(&self, record: &SalesRecord) -> bool {
        if let Some(region) = &self.region {
            if record.region.as_deref() != Some(region.as_str()) {
                return false;
            }
        }

        if let Some(min) = self.min_lead_score {
            // A missing lead score never satisfies a threshold.
            match record.lead_score {
                Some(score) if score >= min => {}
                _ => return false,
            }
        }

        record.interaction_date >= self.start && record.interaction_date <= self.end
    }
}

/// Lower bound used when a caller supplies no start date.
pub fn default_start_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1900, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Total revenue for one distinct region value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRevenue {
    pub region: Option<String>,
    pub total_revenue: f64,
}

/// Renders the summary line served by `/sales/summary`.
impl fmt::Display for RegionRevenue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `{:?}` keeps the trailing ".0" on whole amounts (150.0, not 150).
        // Matches Java's Double.toString for magnitudes in [1e-3, 1e7).
        write!(
            f,
            "Region: {}, Total Revenue: {:?}",
            self.region.as_deref().unwrap_or("null"),
            self.total_revenue
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn record(region: Option<&str>, lead_score: Option<f64>, date: NaiveDateTime) -> SalesRecord {
        SalesRecord {
            id: 1,
            customer_name: Some("Acme".to_string()),
            region: region.map(str::to_string),
            product: Some("Widget".to_string()),
            revenue: Some(10.0),
            interaction_date: date,
            lead_score,
        }
    }

    #[test]
    fn test_filter_region_is_case_sensitive() {
        let filter = SalesFilter::new(Some("West".into()), None, at(2023, 1, 1), at(2023, 12, 31));
        assert!(filter.matches(&record(Some("West"), None, at(2023, 5, 1))));
        assert!(!filter.matches(&record(Some("west"), None, at(2023, 5, 1))));
        assert!(!filter.matches(&record(None, None, at(2023, 5, 1))));
    }

    #[test]
    fn test_filter_excludes_missing_lead_score() {
        let filter = SalesFilter::new(None, Some(0.0), at(2023, 1, 1), at(2023, 12, 31));
        assert!(!filter.matches(&record(Some("West"), None, at(2023, 5, 1))));
        assert!(filter.matches(&record(Some("West"), Some(0.0), at(2023, 5, 1))));
        assert!(!filter.matches(&record(Some("West"), Some(-0.5), at(2023, 5, 1))));
    }

    #[test]
    fn test_filter_date_bounds_are_inclusive() {
        let filter = SalesFilter::new(None, None, at(2023, 1, 1), at(2023, 6, 1));
        assert!(filter.matches(&record(None, None, at(2023, 1, 1))));
        assert!(filter.matches(&record(None, None, at(2023, 6, 1))));
        assert!(!filter.matches(&record(None, None, at(2022, 12, 31))));
        assert!(!filter.matches(&record(None, None, at(2023, 6, 2))));
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let filter = SalesFilter::new(None, None, at(2023, 6, 1), at(2023, 1, 1));
        assert!(!filter.matches(&record(None, None, at(2023, 3, 1))));
    }

    #[test]
    fn test_filter_bounds_truncate_to_micros() {
        let start = at(2023, 1, 1) + chrono::Duration::nanoseconds(1_999);
        let filter = SalesFilter::new(None, None, start, start);
        assert_eq!(filter.start, at(2023, 1, 1) + chrono::Duration::microseconds(1));
        assert_eq!(filter.end, filter.start);

        let record = NewSalesRecord {
            customer_name: None,
            region: None,
            product: None,
            revenue: None,
            interaction_date: start,
            lead_score: None,
        }
        .with_id(1);
        assert!(filter.matches(&record));
    }

    #[test]
    fn test_summary_line_format() {
        let row = RegionRevenue {
            region: Some("West".to_string()),
            total_revenue: 150.0,
        };
        assert_eq!(row.to_string(), "Region: West, Total Revenue: 150.0");

        let row = RegionRevenue {
            region: None,
            total_revenue: 12.5,
        };
        assert_eq!(row.to_string(), "Region: null, Total Revenue: 12.5");
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let json = serde_json::to_value(record(Some("East"), Some(9.0), at(2023, 3, 1))).unwrap();
        assert_eq!(json["region"], "East");
        assert_eq!(json["leadScore"], 9.0);
        assert_eq!(json["interactionDate"], "2023-03-01T00:00:00");
        assert_eq!(json["customerName"], "Acme");
    }
}
