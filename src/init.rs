//! Initialization helpers for the application startup.

use crate::config::{Config, StoreBackend};
use crate::db::DbClient;
use crate::models::NewSalesRecord;
use crate::store::{InMemoryRecordStore, RecordStore, SqliteRecordStore};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Sets up the tracing subscriber with the configured filters.
pub fn setup_logging(config: &Config) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut filter = config.logging.level.clone();

        // Keep transport chatter down unless explicitly requested
        for target in ["hyper", "tower_http"] {
            if !filter.contains(target) {
                filter.push_str(&format!(",{}=warn", target));
            }
        }

        tracing_subscriber::EnvFilter::new(filter)
    });

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Opens the configured record store and applies the optional seed file.
pub async fn init_store(config: &Config) -> Result<Arc<dyn RecordStore>> {
    let seed = match &config.store.seed_file {
        Some(path) => Some(load_seed(path).await?),
        None => None,
    };

    match config.store.backend {
        StoreBackend::Sqlite => {
            info!("Using SqliteRecordStore at {}.", config.store.sqlite_path);
            let client = Arc::new(
                DbClient::new(config.store.sqlite_path.clone())
                    .context("Failed to open SQLite database")?,
            );
            client
                .initialize()
                .context("Failed to initialize SQLite database")?;

            if let Some(records) = seed {
                // Only seed a fresh table so restarts don't duplicate rows.
                if client.count()? == 0 {
                    for record in &records {
                        client.insert_record(record)?;
                    }
                    info!("Seeded {} sales records.", records.len());
                } else {
                    info!("Sales table already populated, skipping seed.");
                }
            }

            Ok(Arc::new(SqliteRecordStore::new(client)))
        }
        StoreBackend::Memory => {
            info!("Using InMemoryRecordStore.");
            let store = InMemoryRecordStore::new();
            if let Some(records) = seed {
                let count = records.len();
                for record in records {
                    store.insert(record)?;
                }
                info!("Seeded {} sales records.", count);
            }
            Ok(Arc::new(store))
        }
    }
}

/// Reads a JSON array of records without ids.
pub async fn load_seed(path: impl AsRef<Path>) -> Result<Vec<NewSalesRecord>> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    let records: Vec<NewSalesRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse seed file {}", path.display()))?;
    Ok(records)
}
