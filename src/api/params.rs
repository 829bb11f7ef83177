//! Query-string parsing for `/sales/filter`.

use crate::error::{Result, SalesError};
use crate::models::{default_start_date, SalesFilter};
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

/// Raw filter parameters as they arrive on the query string.
///
/// Everything is kept as text so a bad value surfaces as a
/// [`SalesError::Validation`] instead of a framework rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    pub region: Option<String>,
    pub min_lead_score: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl FilterParams {
    /// Validates the parameters and substitutes defaults for missing dates:
    /// the start falls back to 1900-01-01 and the end to `now`. A date key
    /// that is present must parse, even when blank.
    pub fn resolve(self, now: NaiveDateTime) -> Result<SalesFilter> {
        let min_lead_score = supplied(self.min_lead_score)
            .map(|raw| parse_lead_score(&raw))
            .transpose()?;

        let start = match self.start_date {
            Some(raw) => parse_timestamp("startDate", &raw)?,
            None => default_start_date(),
        };
        let end = match self.end_date {
            Some(raw) => parse_timestamp("endDate", &raw)?,
            None => now,
        };

        Ok(SalesFilter::new(supplied(self.region), min_lead_score, start, end))
    }
}

/// Empty `region`/`minLeadScore` parameters (`?region=`) count as not supplied.
fn supplied(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_lead_score(raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(score) if score.is_finite() => Ok(score),
        _ => Err(SalesError::Validation(format!(
            "minLeadScore must be a number, got '{}'",
            raw
        ))),
    }
}

/// Parses an ISO-8601 local date-time; seconds and fractions are optional.
/// Values carrying a UTC offset are converted to UTC wall-clock time.
pub fn parse_timestamp(name: &str, raw: &str) -> Result<NaiveDateTime> {
    const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

    let raw = raw.trim();
    for format in LOCAL_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.naive_utc());
    }

    Err(SalesError::Validation(format!(
        "{} must be an ISO-8601 date-time (e.g. 2023-01-01T00:00:00), got '{}'",
        name, raw
    )))
}
