use sqlx::PgPool;

use crate::{error::AppResult, models::EpisodeCounts};

/// Read access to the catalog and to users' episode progress
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait EpisodeProgressSource: Send + Sync {
    /// Total episodes of the series and how many of them the user watched
    async fn episode_counts(&self, user_id: i64, series_id: i64) -> AppResult<EpisodeCounts>;

    async fn series_exists(&self, series_id: i64) -> AppResult<bool>;

    async fn user_exists(&self, user_id: i64) -> AppResult<bool>;
}

/// Episode progress read from the catalog tables
#[derive(Clone)]
pub struct PgEpisodeProgress {
    pool: PgPool,
}

impl PgEpisodeProgress {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl EpisodeProgressSource for PgEpisodeProgress {
    async fn episode_counts(&self, user_id: i64, series_id: i64) -> AppResult<EpisodeCounts> {
        let (total, watched): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM episodes e WHERE e.series_id = $2) AS total_episodes,
                (SELECT COUNT(*)
                   FROM episode_progress p
                   JOIN episodes e ON e.id = p.episode_id
                  WHERE p.user_id = $1 AND e.series_id = $2 AND p.is_watched) AS watched_episodes
            "#,
        )
        .bind(user_id)
        .bind(series_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(EpisodeCounts::new(total, watched))
    }

    async fn series_exists(&self, series_id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM series WHERE id = $1)")
            .bind(series_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn user_exists(&self, user_id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}
