pub mod permits;
pub mod pool;
pub mod tables;
pub mod users;

use sqlx::sqlite::{SqlitePool, SqliteQueryResult};
use std::path::Path;
use std::sync::Arc;

use crate::config::DbConfig;
use crate::error::Result;

pub use pool::create_pool;
pub use tables::Table;

/// Result of an insert that may hit a uniqueness constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

/// Handle over the SQLite file holding `validacion`, `ingresado` and `usuario`
///
/// Cheap to clone; every operation borrows a pooled connection for the
/// duration of its statement.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    schema: Arc<str>,
}

/// Open the configured database and make sure every table exists
pub async fn open_database(config: &DbConfig) -> Result<Store> {
    tracing::info!("Opening database at: {:?}", config.database);

    // Create parent directory if it doesn't exist
    if let Some(parent) = config.database.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                tracing::error!("Failed to create database directory: {}", e);
                e
            })?;
        }
    }

    let schema = load_schema(config.schema.as_deref()).await?;
    let pool = create_pool(config).await?;

    let store = Store::new(pool, schema);
    store.ensure_schema().await?;

    tracing::info!("Database initialized successfully");

    Ok(store)
}

/// Read the DDL script, falling back to the bundled one
pub async fn load_schema(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            tracing::info!("Loading schema from: {:?}", path);
            Ok(tokio::fs::read_to_string(path).await?)
        }
        None => Ok(tables::SCHEMA.to_string()),
    }
}

/// Split a DDL script into executable statements, skipping comment-only chunks
fn statements(script: &str) -> impl Iterator<Item = &str> {
    script.split(';').map(str::trim).filter(|chunk| {
        chunk
            .lines()
            .any(|line| !line.trim().is_empty() && !line.trim_start().starts_with("--"))
    })
}

/// Row id of a successful insert, `None` on a uniqueness violation
fn inserted_id(
    result: std::result::Result<SqliteQueryResult, sqlx::Error>,
) -> Result<Option<i64>> {
    match result {
        Ok(done) => Ok(Some(done.last_insert_rowid())),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Map a uniqueness violation to `AlreadyExists`, keep every other failure
fn insert_outcome(
    result: std::result::Result<SqliteQueryResult, sqlx::Error>,
) -> Result<InsertOutcome> {
    Ok(match inserted_id(result)? {
        Some(_) => InsertOutcome::Inserted,
        None => InsertOutcome::AlreadyExists,
    })
}

impl Store {
    pub fn new(pool: SqlitePool, schema: impl Into<Arc<str>>) -> Self {
        Self {
            pool,
            schema: schema.into(),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create any missing table; leaves existing data untouched
    pub async fn ensure_schema(&self) -> Result<()> {
        for stmt in statements(&self.schema) {
            sqlx::query(stmt).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Drop all tables and recreate them empty
    pub async fn reset_schema(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for table in tables::ALL {
            sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
                .execute(&mut *tx)
                .await?;
        }

        for stmt in statements(&self.schema) {
            sqlx::query(stmt).execute(&mut *tx).await?;
        }

        tx.commit().await?;

        tracing::warn!("Schema reset: all tables dropped and recreated");
        Ok(())
    }

    /// Row count of one of the known tables
    pub async fn count(&self, table: Table) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Cheap connectivity probe
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_skip_comments_and_blanks() {
        let script = "-- header\n\nCREATE TABLE a (x INTEGER);\n-- trailing only\n;\n  ;CREATE TABLE b (y TEXT)";
        let stmts: Vec<&str> = statements(script).collect();

        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].ends_with("CREATE TABLE a (x INTEGER)"));
        assert_eq!(stmts[1], "CREATE TABLE b (y TEXT)");
    }

    #[test]
    fn test_bundled_schema_declares_every_table() {
        let stmts: Vec<&str> = statements(tables::SCHEMA).collect();

        for table in tables::ALL {
            assert!(
                stmts
                    .iter()
                    .any(|s| s.contains(&format!("CREATE TABLE IF NOT EXISTS {}", table))),
                "schema is missing {}",
                table
            );
        }
    }
}
