use async_trait::async_trait;
use futures::FutureExt;
use serde_json::Value;
use sqlx::sqlite::SqliteArguments;
use sqlx::{Arguments, SqlitePool};
use tracing::debug;

use super::{check_columns, Backend, Filter, Record};
use crate::db::run_in_tx;
use crate::error::{AppError, AppResult, VALIDATION_PAYLOAD};
use crate::id::new_uuid_v7;
use crate::model::{Client, Entity, OWNED_TABLES};
use crate::time::iso_now;

/// Embedded store. Tables and columns come from the entity constants, never
/// from caller input.
#[derive(Clone)]
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn push_value(args: &mut SqliteArguments<'_>, v: &Value) -> AppResult<()> {
    let res = match v {
        Value::Null => args.add(Option::<i64>::None),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                args.add(i)
            } else if let Some(f) = n.as_f64() {
                args.add(f)
            } else {
                args.add(Option::<i64>::None)
            }
        }
        Value::Bool(b) => args.add(*b as i64),
        Value::String(s) => args.add(s.clone()),
        _ => args.add(v.to_string()),
    };
    res.map_err(|err| AppError::new(VALIDATION_PAYLOAD, err.to_string()))
}

fn select_sql<E: Entity>(filter: Filter<'_>) -> String {
    let mut sql = format!("SELECT * FROM {}", E::TABLE);
    if let Some((col, _)) = filter.column() {
        sql.push_str(&format!(" WHERE {col} = ?"));
    }
    sql.push_str(" ORDER BY ");
    sql.push_str(&E::ORDER_BY.join(", "));
    sql.push_str(", rowid");
    sql
}

fn storage_err<E: Entity>(err: impl Into<AppError>, operation: &str) -> AppError {
    err.into()
        .with_context("operation", operation)
        .with_context("table", E::TABLE)
}

#[async_trait]
impl Backend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn select<E: Entity>(&self, filter: Filter<'_>) -> AppResult<Vec<E>> {
        let sql = select_sql::<E>(filter);
        let mut q = sqlx::query_as::<_, E>(&sql);
        if let Some((_, value)) = filter.column() {
            q = q.bind(value);
        }
        q.fetch_all(&self.pool)
            .await
            .map_err(|e| storage_err::<E>(e, "select"))
    }

    async fn select_one<E: Entity>(&self, filter: Filter<'_>) -> AppResult<Option<E>> {
        let sql = format!("{} LIMIT 1", select_sql::<E>(filter));
        let mut q = sqlx::query_as::<_, E>(&sql);
        if let Some((_, value)) = filter.column() {
            q = q.bind(value);
        }
        q.fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_err::<E>(e, "select_one"))
    }

    async fn insert<E: Entity>(&self, record: Record) -> AppResult<E> {
        check_columns::<E>(&record)?;
        let now = iso_now();
        let mut cols: Vec<&str> = vec!["id", "created_at", "updated_at"];
        let mut args = SqliteArguments::default();
        push_value(&mut args, &Value::String(new_uuid_v7()))?;
        push_value(&mut args, &Value::String(now.clone()))?;
        push_value(&mut args, &Value::String(now))?;
        for (key, value) in &record {
            cols.push(key.as_str());
            push_value(&mut args, value)?;
        }
        let placeholders = vec!["?"; cols.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
            E::TABLE,
            cols.join(", "),
            placeholders
        );
        sqlx::query_as_with::<_, E, _>(&sql, args)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage_err::<E>(e, "insert"))
    }

    async fn update<E: Entity>(&self, id: &str, record: Record) -> AppResult<()> {
        check_columns::<E>(&record)?;
        let mut sets: Vec<String> = Vec::with_capacity(record.len() + 1);
        let mut args = SqliteArguments::default();
        for (key, value) in &record {
            sets.push(format!("{key} = ?"));
            push_value(&mut args, value)?;
        }
        sets.push("updated_at = ?".to_string());
        push_value(&mut args, &Value::String(iso_now()))?;
        push_value(&mut args, &Value::String(id.to_string()))?;
        let sql = format!("UPDATE {} SET {} WHERE id = ?", E::TABLE, sets.join(", "));
        let res = sqlx::query_with(&sql, args)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_err::<E>(e, "update").with_context("id", id))?;
        if res.rows_affected() == 0 {
            return Err(AppError::not_found(E::TABLE, id).with_context("table", E::TABLE));
        }
        Ok(())
    }

    async fn delete<E: Entity>(&self, id: &str) -> AppResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?", E::TABLE);
        let res = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| storage_err::<E>(e, "delete").with_context("id", id))?;
        if res.rows_affected() == 0 {
            debug!(target: "finplan", event = "delete_missing_row", table = E::TABLE, id = %id);
        }
        Ok(())
    }

    async fn delete_client(&self, client_id: &str) -> AppResult<()> {
        let client_id = client_id.to_string();
        run_in_tx(&self.pool, move |tx| {
            async move {
                for table in OWNED_TABLES {
                    let sql = format!("DELETE FROM {table} WHERE client_id = ?");
                    sqlx::query(&sql)
                        .bind(&client_id)
                        .execute(&mut **tx)
                        .await
                        .map_err(|e| {
                            AppError::from(e)
                                .with_context("operation", "delete_client")
                                .with_context("table", *table)
                        })?;
                }
                let sql = format!("DELETE FROM {} WHERE id = ?", Client::TABLE);
                sqlx::query(&sql)
                    .bind(&client_id)
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| storage_err::<Client>(e, "delete_client"))?;
                Ok::<_, AppError>(())
            }
            .boxed()
        })
        .await
    }
}
