//! Error types for the sales service.
//!
//! - `Validation`: a request parameter could not be parsed. Maps to 400.
//! - `StoreUnavailable`: the record store could not be reached or a query
//!   failed. Maps to 500.
//!
//! Empty results are never errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SalesError>;

#[derive(Debug, Error)]
pub enum SalesError {
    #[error("Invalid request parameter: {0}")]
    Validation(String),

    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),
}

impl SalesError {
    pub fn status(&self) -> StatusCode {
        match self {
            SalesError::Validation(_) => StatusCode::BAD_REQUEST,
            SalesError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for SalesError {
    fn from(err: rusqlite::Error) -> Self {
        SalesError::StoreUnavailable(err.to_string())
    }
}

impl IntoResponse for SalesError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}
