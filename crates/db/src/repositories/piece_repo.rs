//! Repository for the `pieces` table.

use kyarafit_core::search::like_pattern;
use kyarafit_core::types::RecordId;
use sqlx::PgPool;

use crate::models::piece::{Piece, PieceFilter};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, name, description, image_url, thumbnail_url, category, \
     tags, source_link, purchase_date, price, created_at, updated_at";

/// Storage operations for pieces. Holds no state beyond the pool handle.
pub struct PieceRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PieceRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a reconciled piece, returning the row as stored.
    pub async fn create(&self, piece: &Piece) -> Result<Piece, sqlx::Error> {
        let query = format!(
            "INSERT INTO pieces
                (id, user_id, name, description, image_url, thumbnail_url, category, tags,
                 source_link, purchase_date, price, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Piece>(&query)
            .bind(piece.id)
            .bind(&piece.user_id)
            .bind(&piece.name)
            .bind(&piece.description)
            .bind(&piece.image_url)
            .bind(&piece.thumbnail_url)
            .bind(&piece.category)
            .bind(&piece.tags)
            .bind(&piece.source_link)
            .bind(piece.purchase_date)
            .bind(piece.price)
            .bind(piece.created_at)
            .bind(piece.updated_at)
            .fetch_one(self.pool)
            .await
    }

    /// Find a piece by id regardless of owner. Ownership is checked by the caller.
    pub async fn find_by_id(&self, id: RecordId) -> Result<Option<Piece>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pieces WHERE id = $1");
        sqlx::query_as::<_, Piece>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await
    }

    /// List one page of the owner's pieces, newest first, narrowed by `filter`.
    pub async fn list_by_owner(
        &self,
        user_id: &str,
        filter: &PieceFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Piece>, sqlx::Error> {
        match filter {
            PieceFilter::All => {
                let query = format!(
                    "SELECT {COLUMNS} FROM pieces
                     WHERE user_id = $1
                     ORDER BY created_at DESC
                     LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Piece>(&query)
                    .bind(user_id)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(self.pool)
                    .await
            }
            PieceFilter::Search(term) => self.search(user_id, term, limit, offset).await,
            PieceFilter::Category(category) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM pieces
                     WHERE user_id = $1 AND category = $2
                     ORDER BY created_at DESC
                     LIMIT $3 OFFSET $4"
                );
                sqlx::query_as::<_, Piece>(&query)
                    .bind(user_id)
                    .bind(category)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(self.pool)
                    .await
            }
        }
    }

    /// Case-insensitive substring search over name, description, and
    /// category. Tags match only when one equals `term` exactly.
    pub async fn search(
        &self,
        user_id: &str,
        term: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Piece>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM pieces
             WHERE user_id = $1 AND (
                name ILIKE $2
                OR description ILIKE $2
                OR category ILIKE $2
                OR $3 = ANY(tags)
             )
             ORDER BY created_at DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Piece>(&query)
            .bind(user_id)
            .bind(like_pattern(term))
            .bind(term)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await
    }

    /// Overwrite every mutable column of a piece owned by `piece.user_id`.
    ///
    /// Returns `None` when no row matches both id and owner.
    pub async fn update(&self, piece: &Piece) -> Result<Option<Piece>, sqlx::Error> {
        let query = format!(
            "UPDATE pieces SET
                name = $3,
                description = $4,
                image_url = $5,
                thumbnail_url = $6,
                category = $7,
                tags = $8,
                source_link = $9,
                purchase_date = $10,
                price = $11,
                updated_at = $12
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Piece>(&query)
            .bind(piece.id)
            .bind(&piece.user_id)
            .bind(&piece.name)
            .bind(&piece.description)
            .bind(&piece.image_url)
            .bind(&piece.thumbnail_url)
            .bind(&piece.category)
            .bind(&piece.tags)
            .bind(&piece.source_link)
            .bind(piece.purchase_date)
            .bind(piece.price)
            .bind(piece.updated_at)
            .fetch_optional(self.pool)
            .await
    }

    /// Hard-delete a piece owned by `user_id`. Returns `true` if a row was removed.
    pub async fn delete(&self, id: RecordId, user_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pieces WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total pieces owned by `user_id`.
    pub async fn count(&self, user_id: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pieces WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.pool)
            .await
    }

    /// Distinct non-empty categories the owner has used, alphabetically.
    pub async fn distinct_categories(&self, user_id: &str) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM pieces
             WHERE user_id = $1 AND category IS NOT NULL AND category <> ''
             ORDER BY category",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await
    }
}
