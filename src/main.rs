use anyhow::Result;
use tokio::signal;
use tracing::info;

use sales_insights::api::{create_router, start_api_server};
use sales_insights::config::Config;
use sales_insights::init::{init_store, setup_logging};
use sales_insights::query::SalesQueryService;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load Config
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let config_exists = std::path::Path::new(&config_path).exists();
    let config = if config_exists {
        Config::load(&config_path).await?
    } else {
        Config::default()
    };

    // 2. Setup Logging
    setup_logging(&config);
    info!("Starting sales-insights...");

    if !config_exists {
        info!("Config file not found, using defaults.");
    }

    // 3. Init Record Store
    let store = init_store(&config).await?;

    // 4. Build Query Layer & Router
    let query = SalesQueryService::new(store);
    let router = create_router(query, &config.cors)?;
    info!("CORS enabled for origin {}", config.cors.allowed_origin);

    // 5. Serve until Ctrl-C
    let addr = config.socket_addr()?;
    start_api_server(router, addr, async {
        if signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received.");
        }
    })
    .await?;

    Ok(())
}
