//! Repository for the append-only `job_runs` history table.
//!
//! Inserts only; the engine never mutates or deletes history rows
//! (retention is external tooling's concern).

use sqlx::PgPool;

use crate::models::job_run::{CreateJobRun, JobRun};

/// Column list for `job_runs` queries.
const COLUMNS: &str = "id, family, success, work_done, errors, duration_ms, created_at";

/// Default page size for history listing.
const DEFAULT_LIMIT: i64 = 20;

/// Maximum page size for history listing.
const MAX_LIMIT: i64 = 100;

/// Append and read run history entries.
pub struct JobRunRepo;

impl JobRunRepo {
    /// Append one run history entry.
    pub async fn insert(pool: &PgPool, input: &CreateJobRun) -> Result<JobRun, sqlx::Error> {
        let query = format!(
            "INSERT INTO job_runs (family, success, work_done, errors, duration_ms) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobRun>(&query)
            .bind(&input.family)
            .bind(input.success)
            .bind(input.work_done)
            .bind(&input.errors)
            .bind(input.duration_ms)
            .fetch_one(pool)
            .await
    }

    /// Most recent entries, optionally filtered by a family prefix so
    /// "maintenance" matches both scheduled and manual runs.
    pub async fn list_recent(
        pool: &PgPool,
        family_prefix: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Vec<JobRun>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);

        match family_prefix {
            Some(prefix) => {
                let pattern = format!("{prefix}%");
                let query = format!(
                    "SELECT {COLUMNS} FROM job_runs \
                     WHERE family LIKE $1 \
                     ORDER BY created_at DESC, id DESC \
                     LIMIT $2"
                );
                sqlx::query_as::<_, JobRun>(&query)
                    .bind(&pattern)
                    .bind(limit)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM job_runs \
                     ORDER BY created_at DESC, id DESC \
                     LIMIT $1"
                );
                sqlx::query_as::<_, JobRun>(&query)
                    .bind(limit)
                    .fetch_all(pool)
                    .await
            }
        }
    }
}
