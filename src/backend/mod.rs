//! Persistence adapters. Repositories are written once against [`Backend`]
//! and instantiated with either the embedded SQLite store or the hosted
//! PostgREST-style service.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult, VALIDATION_UNKNOWN_COLUMN};
use crate::model::Entity;

mod rest;
mod sqlite;

pub use rest::RestBackend;
pub use sqlite::SqliteBackend;

/// A snake_case keyed write payload.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter<'a> {
    Id(&'a str),
    ClientId(&'a str),
    All,
}

impl Filter<'_> {
    pub(crate) fn column(&self) -> Option<(&'static str, &str)> {
        match self {
            Filter::Id(id) => Some(("id", id)),
            Filter::ClientId(id) => Some(("client_id", id)),
            Filter::All => None,
        }
    }
}

#[async_trait]
pub trait Backend: Send + Sync {
    /// Short name used in log events.
    fn name(&self) -> &'static str;

    /// Rows matching `filter`, in `E::ORDER_BY` order.
    async fn select<E: Entity>(&self, filter: Filter<'_>) -> AppResult<Vec<E>>;

    /// First matching row, or `None` when storage reports no rows.
    async fn select_one<E: Entity>(&self, filter: Filter<'_>) -> AppResult<Option<E>>;

    /// Insert a row; storage assigns `id`, `created_at` and `updated_at`.
    async fn insert<E: Entity>(&self, record: Record) -> AppResult<E>;

    /// Apply `record` to the row with `id`, refreshing `updated_at`.
    async fn update<E: Entity>(&self, id: &str, record: Record) -> AppResult<()>;

    /// Remove the row with `id`. Missing rows are not an error.
    async fn delete<E: Entity>(&self, id: &str) -> AppResult<()>;

    /// Remove a client together with every row it owns.
    async fn delete_client(&self, client_id: &str) -> AppResult<()>;
}

/// Reject keys that are not storage columns of `E`, and the columns storage
/// manages itself.
pub(crate) fn check_columns<E: Entity>(record: &Record) -> AppResult<()> {
    for key in record.keys() {
        let managed = matches!(key.as_str(), "id" | "created_at" | "updated_at");
        if managed || !E::has_column(key) {
            return Err(AppError::new(
                VALIDATION_UNKNOWN_COLUMN,
                format!("{} has no writable column {key}", E::TABLE),
            )
            .with_context("table", E::TABLE)
            .with_context("column", key.clone()));
        }
    }
    Ok(())
}
