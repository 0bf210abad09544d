//! Database migrations
//!
//! This module manages SQLite schema migrations for the contractor
//! directory. Migrations are versioned and applied automatically on database
//! connection.

use sqlx::SqlitePool;

/// Current schema version
pub const CURRENT_VERSION: i32 = 2;

/// SQL for creating the migrations tracking table
const CREATE_MIGRATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        version INTEGER PRIMARY KEY NOT NULL,
        applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
"#;

/// Migration 1: Initial schema
const MIGRATION_V1: &str = r#"
    -- Contractors table, loaded from the licensing-board extract
    CREATE TABLE IF NOT EXISTS contractors (
        license_no TEXT PRIMARY KEY NOT NULL,
        business_name TEXT NOT NULL,
        city TEXT,
        state TEXT,
        zip TEXT,
        phone TEXT,
        status TEXT NOT NULL DEFAULT 'CLEAR' CHECK (status IN (
            'CLEAR', 'ACTIVE', 'INACTIVE', 'EXPIRED', 'SUSPENDED', 'REVOKED'
        )),
        classification TEXT,
        raw_classifications TEXT,
        issue_date DATE,
        expire_date DATE,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE INDEX IF NOT EXISTS idx_contractors_business_name ON contractors(business_name);
    CREATE INDEX IF NOT EXISTS idx_contractors_city ON contractors(city);
    CREATE INDEX IF NOT EXISTS idx_contractors_status ON contractors(status);
    CREATE INDEX IF NOT EXISTS idx_contractors_classification ON contractors(classification);
"#;

/// Migration 2: Denormalized classification search columns
///
/// The smart-search trade predicate matches against normalized code lists
/// and trade labels; both are precomputed at import time so the search never
/// has to parse the raw classification string.
const MIGRATION_V2: &str = r#"
    ALTER TABLE contractors ADD COLUMN classification_codes TEXT;
    ALTER TABLE contractors ADD COLUMN trade TEXT;

    CREATE INDEX IF NOT EXISTS idx_contractors_trade ON contractors(trade);
"#;

/// Migration status report
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    /// Schema version currently recorded in the database
    pub current_version: i32,
    /// Latest version known to this build
    pub target_version: i32,
    /// Whether any migration still needs to run
    pub needs_migration: bool,
}

/// Get the current schema version from the database
async fn get_current_version(pool: &SqlitePool) -> anyhow::Result<i32> {
    // Ensure migrations table exists
    sqlx::raw_sql(CREATE_MIGRATIONS_TABLE).execute(pool).await?;

    // Get the latest version
    let row: Option<(i32,)> = sqlx::query_as("SELECT MAX(version) FROM _migrations")
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(v,)| v).unwrap_or(0))
}

/// Record that a migration has been applied
async fn record_migration(pool: &SqlitePool, version: i32) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO _migrations (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;
    Ok(())
}

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    let current_version = get_current_version(pool).await?;

    tracing::info!(
        current_version = current_version,
        target_version = CURRENT_VERSION,
        "Checking database migrations"
    );

    if current_version >= CURRENT_VERSION {
        tracing::debug!("Database is up to date");
        return Ok(());
    }

    if current_version < 1 {
        tracing::info!("Applying migration v1: Initial schema");
        sqlx::raw_sql(MIGRATION_V1).execute(pool).await?;
        record_migration(pool, 1).await?;
    }

    if current_version < 2 {
        tracing::info!("Applying migration v2: Classification search columns");
        sqlx::raw_sql(MIGRATION_V2).execute(pool).await?;
        record_migration(pool, 2).await?;
    }

    Ok(())
}

/// Check migration status without applying anything
pub async fn migration_status(pool: &SqlitePool) -> anyhow::Result<MigrationStatus> {
    let current_version = get_current_version(pool).await?;
    Ok(MigrationStatus {
        current_version,
        target_version: CURRENT_VERSION,
        needs_migration: current_version < CURRENT_VERSION,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test pool")
    }

    #[tokio::test]
    async fn test_migrations_apply_from_scratch() {
        let pool = test_pool().await;
        run_migrations(&pool).await.expect("Migrations failed");

        let status = migration_status(&pool).await.expect("Status check failed");
        assert_eq!(status.current_version, CURRENT_VERSION);
        assert!(!status.needs_migration);
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = test_pool().await;
        run_migrations(&pool).await.expect("First run failed");
        run_migrations(&pool).await.expect("Second run failed");

        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM _migrations")
            .fetch_one(&pool)
            .await
            .expect("Failed to count migrations");
        assert_eq!(row.0, CURRENT_VERSION as i64);
    }

    #[tokio::test]
    async fn test_v2_columns_exist() {
        let pool = test_pool().await;
        run_migrations(&pool).await.expect("Migrations failed");

        sqlx::query("SELECT classification_codes, trade FROM contractors")
            .fetch_all(&pool)
            .await
            .expect("v2 columns should exist");
    }
}
