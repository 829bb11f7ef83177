mod params;

pub use params::{parse_timestamp, FilterParams};

use crate::config::CorsConfig;
use crate::error::Result;
use crate::models::{RegionRevenue, SalesRecord};
use crate::query::SalesQueryService;
use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::{HeaderValue, Method},
    routing::get,
    Json, Router,
};
use chrono::Local;
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

struct ApiState {
    query: SalesQueryService,
}

/// Builds the `/sales` router with CORS opened to the configured origin only.
pub fn create_router(query: SalesQueryService, cors: &CorsConfig) -> anyhow::Result<Router> {
    let origin = HeaderValue::from_str(&cors.allowed_origin)
        .with_context(|| format!("Invalid CORS origin '{}'", cors.allowed_origin))?;

    let cors_layer = CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([Method::GET])
        .allow_headers(Any);

    let state = Arc::new(ApiState { query });

    Ok(Router::new()
        .route("/sales", get(get_all_sales))
        .route("/sales/filter", get(get_filtered_sales))
        .route("/sales/summary", get(get_revenue_summary))
        .route("/sales/summary/regions", get(get_revenue_per_region))
        .with_state(state)
        .layer(cors_layer))
}

/// Serves `router` on `addr` until `shutdown` resolves.
pub async fn start_api_server(
    router: Router,
    addr: std::net::SocketAddr,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind API server to {}", addr))?;
    info!("API Server listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("API server terminated unexpectedly")?;
    Ok(())
}

async fn get_all_sales(State(state): State<Arc<ApiState>>) -> Result<Json<Vec<SalesRecord>>> {
    Ok(Json(state.query.fetch_all().await?))
}

async fn get_filtered_sales(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<SalesRecord>>> {
    let filter = params.resolve(Local::now().naive_local())?;

    info!(
        region = ?filter.region,
        min_lead_score = ?filter.min_lead_score,
        start = %filter.start,
        end = %filter.end,
        "Filtering sales"
    );

    let records = state
        .query
        .fetch_filtered(filter.region, filter.min_lead_score, filter.start, filter.end)
        .await?;
    Ok(Json(records))
}

/// Summary rows as "Region: X, Total Revenue: Y" lines.
async fn get_revenue_summary(State(state): State<Arc<ApiState>>) -> Result<Json<Vec<String>>> {
    let totals = state.query.revenue_per_region().await?;
    Ok(Json(totals.iter().map(ToString::to_string).collect()))
}

async fn get_revenue_per_region(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<RegionRevenue>>> {
    Ok(Json(state.query.revenue_per_region().await?))
}
