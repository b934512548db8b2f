use regex::Regex;
use sha2::{Digest, Sha256};
use sqlx::{Executor, Row, SqlitePool};
use std::collections::HashMap;

use crate::time::now_ms;
use tracing::{error, info};

fn preview(sql: &str) -> String {
    let one_line = sql.replace(['\n', '\t'], " ");
    let trimmed = one_line.trim();
    match trimmed.char_indices().nth(160) {
        Some((idx, _)) => format!("{}…", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

static MIGRATIONS: &[(&str, &str)] = &[
    (
        "202610010900_clients.sql",
        include_str!("../migrations/202610010900_clients.sql"),
    ),
    (
        "202610010910_planning.sql",
        include_str!("../migrations/202610010910_planning.sql"),
    ),
    (
        "202610010920_assets_pension.sql",
        include_str!("../migrations/202610010920_assets_pension.sql"),
    ),
];

/// Comment-stripped body; the checksum is taken over this text.
fn clean(raw_sql: &str) -> String {
    raw_sql
        .lines()
        .filter(|line| {
            let t = line.trim_start();
            !(t.is_empty() || t.starts_with("--"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn checksum(cleaned: &str) -> String {
    format!("{:x}", Sha256::digest(cleaned.as_bytes()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    pub version: String,
    pub applied_at: i64,
    pub checksum: String,
}

async fn ensure_table(pool: &SqlitePool) -> anyhow::Result<()> {
    pool.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (\
           version   TEXT PRIMARY KEY,\
           applied_at INTEGER NOT NULL,\
           checksum TEXT NOT NULL\
         )",
    )
    .await?;
    Ok(())
}

/// Apply every embedded migration not yet recorded. Returns how many files ran.
pub async fn apply_migrations(pool: &SqlitePool) -> anyhow::Result<usize> {
    ensure_table(pool).await?;

    let mut applied: HashMap<String, String> = HashMap::new();
    for m in applied_migrations(pool).await? {
        applied.insert(m.version, m.checksum);
    }
    let add_col_re = Regex::new(r"(?i)^ALTER\s+TABLE\s+(\w+)\s+ADD\s+COLUMN\s+(\w+)")?;

    let mut ran = 0usize;
    for (filename, raw_sql) in MIGRATIONS {
        let cleaned = clean(raw_sql);
        let checksum = checksum(&cleaned);

        if let Some(stored) = applied.get(*filename) {
            if stored != &checksum {
                anyhow::bail!("migration {} edited after application", filename);
            }
            info!(target: "finplan", event = "migration_skip_file", file = %filename);
            continue;
        }

        let mut tx = pool.begin().await?;
        for stmt in cleaned.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            let upper = s.to_ascii_uppercase();
            if upper == "BEGIN" || upper == "COMMIT" {
                continue;
            }
            if let Some((table, col)) = add_col_re
                .captures(s)
                .and_then(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
            {
                let exists: Option<i64> = sqlx::query_scalar(&format!(
                    "SELECT 1 FROM pragma_table_info('{}') WHERE name='{}'",
                    table, col
                ))
                .fetch_optional(&mut *tx)
                .await?;
                if exists.is_some() {
                    info!(target: "finplan", event = "migration_stmt_skip", file = %filename, sql = %preview(s));
                    continue;
                }
            }
            info!(target: "finplan", event = "migration_stmt", file = %filename, sql = %preview(s));
            if let Err(e) = sqlx::query(s).execute(&mut *tx).await {
                error!(target: "finplan", event = "migration_stmt_error", file = %filename, sql = %preview(s), error = %e);
                return Err(e.into());
            }
        }

        sqlx::query(
            "INSERT INTO schema_migrations (version, applied_at, checksum) VALUES (?, ?, ?)",
        )
        .bind(*filename)
        .bind(now_ms())
        .bind(&checksum)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        ran += 1;
        info!(target: "finplan", event = "migration_file_applied", file = %filename);
    }

    Ok(ran)
}

/// Recorded migrations in application order.
pub async fn applied_migrations(pool: &SqlitePool) -> anyhow::Result<Vec<AppliedMigration>> {
    ensure_table(pool).await?;
    let rows = sqlx::query(
        "SELECT version, applied_at, checksum FROM schema_migrations ORDER BY version",
    )
    .fetch_all(pool)
    .await?;
    let mut out = Vec::with_capacity(rows.len());
    for r in rows {
        out.push(AppliedMigration {
            version: r.try_get("version")?,
            applied_at: r.try_get("applied_at")?,
            checksum: r.try_get("checksum")?,
        });
    }
    Ok(out)
}

/// Embedded migration file names, oldest first.
pub fn known_versions() -> impl Iterator<Item = &'static str> {
    MIGRATIONS.iter().map(|(name, _)| *name)
}
