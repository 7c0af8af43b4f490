pub mod disabled;
pub mod postgres;
pub mod sqlite;
pub mod supabase;
pub mod trait_def;

pub use disabled::DisabledStore;
pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;
pub use supabase::SupabaseStore;
pub use trait_def::{StorageError, StorageResult, VisitStore};

use crate::config::{StoreBackend, StoreConfig};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Open the record store selected by configuration. Called once at startup.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn VisitStore>> {
    let store: Arc<dyn VisitStore> = match config.backend {
        StoreBackend::Sqlite => {
            info!("Using SQLite record store: {}", config.url);
            Arc::new(
                SqliteStore::new(&config.url, config.max_connections)
                    .await
                    .context("failed to open SQLite record store")?,
            )
        }
        StoreBackend::Postgres => {
            info!("Using PostgreSQL record store");
            Arc::new(
                PostgresStore::new(&config.url, config.max_connections)
                    .await
                    .context("failed to connect to PostgreSQL record store")?,
            )
        }
        StoreBackend::Supabase => {
            let supabase = config
                .supabase
                .as_ref()
                .context("Supabase backend selected without SUPABASE_URL / SUPABASE_KEY")?;
            info!("Using hosted record store: {}", supabase.url);
            Arc::new(SupabaseStore::new(supabase).context("failed to build Supabase client")?)
        }
        StoreBackend::Disabled => {
            info!("Record store disabled - visits will not be recorded");
            Arc::new(DisabledStore)
        }
    };

    Ok(store)
}
