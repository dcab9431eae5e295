//! Purchase repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use learnhub_core::error::{AppError, ErrorKind};
use learnhub_core::result::AppResult;
use learnhub_entity::purchase::model::{Purchase, RecordPurchase};

/// Repository for purchase records.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: PgPool,
}

impl PurchaseRepository {
    /// Create a new purchase repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a purchase idempotently.
    ///
    /// Inserts with `ON CONFLICT (user_id, course_id) DO NOTHING`, then
    /// fetches the surviving row when the insert lost. Two writers racing
    /// on the same `(user, course)` pair both get the single row back;
    /// the boolean reports whether this call created it.
    pub async fn record(&self, data: &RecordPurchase) -> AppResult<(Purchase, bool)> {
        let inserted = sqlx::query_as::<_, Purchase>(
            "INSERT INTO purchases (user_id, course_id, amount_cents, source, provider_ref) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id, course_id) DO NOTHING \
             RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.course_id)
        .bind(data.amount_cents)
        .bind(data.source)
        .bind(&data.provider_ref)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record purchase", e))?;

        if let Some(purchase) = inserted {
            return Ok((purchase, true));
        }

        // The insert lost the race. Purchase rows are never deleted, so the
        // winner's row must be there.
        let existing = self
            .find_by_user_and_course(data.user_id, data.course_id)
            .await?
            .ok_or_else(|| {
                AppError::database("Purchase row missing after conflicting insert")
            })?;
        Ok((existing, false))
    }

    /// Find a purchase by its unique `(user_id, course_id)` key.
    pub async fn find_by_user_and_course(
        &self,
        user_id: Uuid,
        course_id: Uuid,
    ) -> AppResult<Option<Purchase>> {
        sqlx::query_as::<_, Purchase>(
            "SELECT * FROM purchases WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find purchase", e))
    }
}
