use std::path::Path;

use anyhow::Context;
use tracing::info;

pub mod backend;
pub mod calc;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
mod id;
pub mod logging;
pub mod mapper;
pub mod migrate;
pub mod model;
pub mod networth;
pub mod repo;
pub mod services;
pub mod session;
mod time;

pub use backend::{Backend, RestBackend, SqliteBackend};
pub use error::{AppError, AppResult, ErrorKind};
pub use services::Services;

use crate::config::RemoteConfig;

/// Open (creating if needed) the SQLite store at `db_path`, bring its schema
/// up to date and wire every repository against it.
pub async fn open_local(db_path: &Path) -> anyhow::Result<Services<SqliteBackend>> {
    let pool = db::open_sqlite_pool(db_path).await?;
    let applied = migrate::apply_migrations(&pool)
        .await
        .with_context(|| format!("migrating {}", db_path.display()))?;
    info!(
        target: "finplan",
        event = "store_opened",
        backend = "sqlite",
        path = %db_path.display(),
        migrations_applied = applied
    );
    Ok(Services::new(SqliteBackend::new(pool)))
}

/// In-memory store with the full schema; used by tests and dry runs.
pub async fn open_memory() -> anyhow::Result<Services<SqliteBackend>> {
    let pool = db::open_memory_pool().await?;
    migrate::apply_migrations(&pool).await?;
    Ok(Services::new(SqliteBackend::new(pool)))
}

pub fn open_remote(config: &RemoteConfig) -> AppResult<Services<RestBackend>> {
    let backend = RestBackend::new(config)?;
    info!(
        target: "finplan",
        event = "store_opened",
        backend = "rest",
        base_url = %config.base_url
    );
    Ok(Services::new(backend))
}
