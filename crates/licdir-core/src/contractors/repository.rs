//! Contractor repository for database operations

use crate::contractors::{Contractor, LicenseStatus};
use crate::search::query::{AssembledQuery, CONTRACTOR_COLUMNS};
use crate::storage::Database;
use crate::Result;
use chrono::Utc;
use sqlx::Row;
use std::time::Duration;

/// Attempts per query before giving up
const RETRY_ATTEMPTS: u32 = 3;

/// Base delay for exponential backoff between attempts
const RETRY_BASE_DELAY_MS: u64 = 100;

/// Repository for contractor rows
pub struct ContractorRepository<'a> {
    db: &'a Database,
}

impl<'a> ContractorRepository<'a> {
    /// Create a new contractor repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert or refresh a contractor record
    pub async fn upsert(&self, contractor: &Contractor) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO contractors (
                license_no, business_name, city, state, zip, phone, status,
                classification, raw_classifications, classification_codes, trade,
                issue_date, expire_date, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(license_no) DO UPDATE SET
                business_name = excluded.business_name,
                city = excluded.city,
                state = excluded.state,
                zip = excluded.zip,
                phone = excluded.phone,
                status = excluded.status,
                classification = excluded.classification,
                raw_classifications = excluded.raw_classifications,
                classification_codes = excluded.classification_codes,
                trade = excluded.trade,
                issue_date = excluded.issue_date,
                expire_date = excluded.expire_date,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&contractor.license_no)
        .bind(&contractor.business_name)
        .bind(&contractor.city)
        .bind(&contractor.state)
        .bind(&contractor.zip)
        .bind(&contractor.phone)
        .bind(contractor.status.as_str())
        .bind(&contractor.classification)
        .bind(&contractor.raw_classifications)
        .bind(&contractor.classification_codes)
        .bind(&contractor.trade)
        .bind(contractor.issue_date)
        .bind(contractor.expire_date)
        .bind(contractor.created_at)
        .bind(Utc::now())
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Get a contractor by license number
    pub async fn get_by_license(&self, license_no: &str) -> Result<Option<Contractor>> {
        let sql = format!("SELECT {CONTRACTOR_COLUMNS} FROM contractors WHERE license_no = ?");
        let row = sqlx::query(&sql)
            .bind(license_no)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(row_to_contractor))
    }

    /// Total number of contractor rows
    pub async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM contractors")
            .fetch_one(self.db.pool())
            .await?;
        Ok(row.0)
    }

    /// Execute an assembled search, returning the page of matching rows and
    /// the unpaginated total count.
    ///
    /// Transient failures (pool timeouts, locked database) are retried with
    /// exponential backoff up to [`RETRY_ATTEMPTS`] times.
    pub async fn search(&self, query: &AssembledQuery) -> Result<(Vec<Contractor>, i64)> {
        let mut attempt = 0;
        loop {
            match self.run_search(query).await {
                Ok(result) => return Ok(result),
                Err(e) if attempt + 1 < RETRY_ATTEMPTS && is_transient(&e) => {
                    let delay = Duration::from_millis(RETRY_BASE_DELAY_MS << attempt);
                    tracing::warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Search query failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn run_search(&self, query: &AssembledQuery) -> std::result::Result<(Vec<Contractor>, i64), sqlx::Error> {
        let mut rows_query = sqlx::query(&query.sql);
        for param in &query.params {
            rows_query = rows_query.bind(param);
        }
        rows_query = rows_query.bind(query.limit).bind(query.offset);
        let rows = rows_query.fetch_all(self.db.pool()).await?;

        let mut count_query = sqlx::query_as::<_, (i64,)>(&query.count_sql);
        for param in &query.params {
            count_query = count_query.bind(param);
        }
        let (total,) = count_query.fetch_one(self.db.pool()).await?;

        Ok((rows.into_iter().map(row_to_contractor).collect(), total))
    }
}

/// Whether a query failure is worth retrying
fn is_transient(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut => true,
        sqlx::Error::Database(db) => {
            let message = db.message();
            message.contains("locked") || message.contains("busy")
        }
        _ => false,
    }
}

/// Convert a database row to a Contractor
fn row_to_contractor(row: sqlx::sqlite::SqliteRow) -> Contractor {
    Contractor {
        license_no: row.get("license_no"),
        business_name: row.get("business_name"),
        city: row.get("city"),
        state: row.get("state"),
        zip: row.get("zip"),
        phone: row.get("phone"),
        status: LicenseStatus::parse(row.get("status")).unwrap_or_default(),
        classification: row.get("classification"),
        raw_classifications: row.get("raw_classifications"),
        classification_codes: row.get("classification_codes"),
        trade: row.get("trade"),
        issue_date: row.get("issue_date"),
        expire_date: row.get("expire_date"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
