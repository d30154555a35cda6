use sqlx::PgPool;

use crate::error::AppResult;

/// Answers whether a user already reviewed a series
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ReviewLookup: Send + Sync {
    async fn review_exists(&self, user_id: i64, series_id: i64) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct PgReviewLookup {
    pool: PgPool,
}

impl PgReviewLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ReviewLookup for PgReviewLookup {
    async fn review_exists(&self, user_id: i64, series_id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM reviews WHERE user_id = $1 AND series_id = $2)",
        )
        .bind(user_id)
        .bind(series_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
