#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use finplan_lib::model::NewClient;
use finplan_lib::{Services, SqliteBackend};

pub async fn memory_services() -> Services<SqliteBackend> {
    finplan_lib::open_memory()
        .await
        .expect("open migrated sqlite::memory:")
}

pub async fn seed_client(services: &Services<SqliteBackend>, first: &str, last: &str) -> String {
    services
        .clients
        .create(&NewClient::named(first, last), None)
        .await
        .expect("create client")
}

pub async fn count_rows(services: &Services<SqliteBackend>, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(services.backend().pool())
        .await
        .expect("count rows")
}
