//! Repository for the `builds` table.

use kyarafit_core::search::like_pattern;
use kyarafit_core::types::RecordId;
use sqlx::PgPool;

use crate::models::build::{Build, BuildFilter, BuildStatus};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, description, \"character\", series, status, priority, \
     budget, spent, start_date, target_date, completed_date, tags, notes, created_at, updated_at";

/// Unfinished builds with a target date inside the `$2`-day window.
const UPCOMING_CLAUSE: &str = "target_date IS NOT NULL \
     AND target_date <= CURRENT_DATE + $2::INT \
     AND status NOT IN ('complete', 'cancelled')";

/// Storage operations for builds. Holds no state beyond the pool handle.
pub struct BuildRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> BuildRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a reconciled build, returning the row as stored.
    pub async fn create(&self, build: &Build) -> Result<Build, sqlx::Error> {
        let query = format!(
            "INSERT INTO builds
                (id, user_id, name, description, \"character\", series, status, priority,
                 budget, spent, start_date, target_date, completed_date, tags, notes,
                 created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Build>(&query)
            .bind(build.id)
            .bind(&build.user_id)
            .bind(&build.name)
            .bind(&build.description)
            .bind(&build.character)
            .bind(&build.series)
            .bind(build.status)
            .bind(build.priority)
            .bind(build.budget)
            .bind(build.spent)
            .bind(build.start_date)
            .bind(build.target_date)
            .bind(build.completed_date)
            .bind(&build.tags)
            .bind(&build.notes)
            .bind(build.created_at)
            .bind(build.updated_at)
            .fetch_one(self.pool)
            .await
    }

    /// Find a build by id regardless of owner. Ownership is checked by the caller.
    pub async fn find_by_id(&self, id: RecordId) -> Result<Option<Build>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM builds WHERE id = $1");
        sqlx::query_as::<_, Build>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await
    }

    /// List one page of the owner's builds, narrowed by `filter`.
    ///
    /// Newest first, except [`BuildFilter::Upcoming`] which orders by target
    /// date ascending.
    pub async fn list_by_owner(
        &self,
        user_id: &str,
        filter: &BuildFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Build>, sqlx::Error> {
        match filter {
            BuildFilter::All => {
                let query = format!(
                    "SELECT {COLUMNS} FROM builds
                     WHERE user_id = $1
                     ORDER BY created_at DESC
                     LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Build>(&query)
                    .bind(user_id)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(self.pool)
                    .await
            }
            BuildFilter::Search(term) => self.search(user_id, term, limit, offset).await,
            BuildFilter::Status(status) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM builds
                     WHERE user_id = $1 AND status = $2
                     ORDER BY created_at DESC
                     LIMIT $3 OFFSET $4"
                );
                sqlx::query_as::<_, Build>(&query)
                    .bind(user_id)
                    .bind(*status)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(self.pool)
                    .await
            }
            BuildFilter::Priority(priority) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM builds
                     WHERE user_id = $1 AND priority = $2
                     ORDER BY created_at DESC
                     LIMIT $3 OFFSET $4"
                );
                sqlx::query_as::<_, Build>(&query)
                    .bind(user_id)
                    .bind(*priority)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(self.pool)
                    .await
            }
            BuildFilter::Upcoming(days) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM builds
                     WHERE user_id = $1 AND {UPCOMING_CLAUSE}
                     ORDER BY target_date ASC, created_at DESC
                     LIMIT $3 OFFSET $4"
                );
                sqlx::query_as::<_, Build>(&query)
                    .bind(user_id)
                    .bind(*days)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(self.pool)
                    .await
            }
        }
    }

    /// Case-insensitive substring search over name, description, character,
    /// and series. Tags match only when one equals `term` exactly.
    pub async fn search(
        &self,
        user_id: &str,
        term: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Build>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM builds
             WHERE user_id = $1 AND (
                name ILIKE $2
                OR description ILIKE $2
                OR \"character\" ILIKE $2
                OR series ILIKE $2
                OR $3 = ANY(tags)
             )
             ORDER BY created_at DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Build>(&query)
            .bind(user_id)
            .bind(like_pattern(term))
            .bind(term)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await
    }

    /// Overwrite every mutable column of a build.
    ///
    /// The row must match both `id` and `user_id`. Returns `None` when it
    /// does not, without distinguishing a missing row from a foreign one.
    pub async fn update(&self, build: &Build) -> Result<Option<Build>, sqlx::Error> {
        let query = format!(
            "UPDATE builds SET
                name = $3,
                description = $4,
                \"character\" = $5,
                series = $6,
                status = $7,
                priority = $8,
                budget = $9,
                spent = $10,
                start_date = $11,
                target_date = $12,
                completed_date = $13,
                tags = $14,
                notes = $15,
                updated_at = $16
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Build>(&query)
            .bind(build.id)
            .bind(&build.user_id)
            .bind(&build.name)
            .bind(&build.description)
            .bind(&build.character)
            .bind(&build.series)
            .bind(build.status)
            .bind(build.priority)
            .bind(build.budget)
            .bind(build.spent)
            .bind(build.start_date)
            .bind(build.target_date)
            .bind(build.completed_date)
            .bind(&build.tags)
            .bind(&build.notes)
            .bind(build.updated_at)
            .fetch_optional(self.pool)
            .await
    }

    /// Hard-delete a build owned by `user_id`. Returns `true` if a row was removed.
    pub async fn delete(&self, id: RecordId, user_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM builds WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total builds owned by `user_id`.
    pub async fn count(&self, user_id: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM builds WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.pool)
            .await
    }

    /// Per-status counts for `user_id`. Statuses with no builds are omitted.
    pub async fn count_by_status(
        &self,
        user_id: &str,
    ) -> Result<Vec<(BuildStatus, i64)>, sqlx::Error> {
        sqlx::query_as::<_, (BuildStatus, i64)>(
            "SELECT status, COUNT(*) FROM builds WHERE user_id = $1 GROUP BY status",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await
    }

    /// Number of unfinished builds due within `days` days.
    pub async fn count_upcoming(&self, user_id: &str, days: i32) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM builds WHERE user_id = $1 AND {UPCOMING_CLAUSE}");
        sqlx::query_scalar::<_, i64>(&query)
            .bind(user_id)
            .bind(days)
            .fetch_one(self.pool)
            .await
    }
}
