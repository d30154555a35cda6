use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    error::{AppError, AppResult},
    models::{NewWatchingState, WatchingState},
};

/// Durable store of watching states, keyed by (user, series)
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WatchingStateRepository: Send + Sync {
    /// Loads the record for a pair, if one was ever created
    async fn load_state(&self, user_id: i64, series_id: i64) -> AppResult<Option<WatchingState>>;

    /// Creates the record for a pair
    ///
    /// When another caller created it first, the existing record is returned.
    async fn create_state(&self, state: NewWatchingState) -> AppResult<WatchingState>;

    /// Writes status and counts, refreshing `last_updated`
    ///
    /// Fails with `AppError::Conflict` when the stored version no longer
    /// matches `state.version`.
    async fn update_state(&self, state: &WatchingState) -> AppResult<WatchingState>;
}

#[derive(Debug, sqlx::FromRow)]
struct WatchingStateRow {
    id: i64,
    user_id: i64,
    series_id: i64,
    status: String,
    watched_episodes_count: i64,
    total_episodes_count: i64,
    created_at: DateTime<Utc>,
    last_updated: DateTime<Utc>,
    version: i64,
}

impl TryFrom<WatchingStateRow> for WatchingState {
    type Error = AppError;

    fn try_from(row: WatchingStateRow) -> Result<Self, Self::Error> {
        Ok(WatchingState {
            id: row.id,
            user_id: row.user_id,
            series_id: row.series_id,
            status: row.status.parse()?,
            watched_episodes_count: row.watched_episodes_count,
            total_episodes_count: row.total_episodes_count,
            created_at: row.created_at,
            last_updated: row.last_updated,
            version: row.version,
        })
    }
}

const SELECT_COLUMNS: &str = "id, user_id, series_id, status, watched_episodes_count, \
     total_episodes_count, created_at, last_updated, version";

/// Postgres-backed watching state store
#[derive(Clone)]
pub struct PgWatchingStateRepository {
    pool: PgPool,
}

impl PgWatchingStateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl WatchingStateRepository for PgWatchingStateRepository {
    async fn load_state(&self, user_id: i64, series_id: i64) -> AppResult<Option<WatchingState>> {
        let row: Option<WatchingStateRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM watching_states WHERE user_id = $1 AND series_id = $2"
        ))
        .bind(user_id)
        .bind(series_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(WatchingState::try_from).transpose()
    }

    async fn create_state(&self, state: NewWatchingState) -> AppResult<WatchingState> {
        let now = Utc::now();
        let inserted: Option<WatchingStateRow> = sqlx::query_as(&format!(
            r#"
            INSERT INTO watching_states
                (user_id, series_id, status, watched_episodes_count, total_episodes_count,
                 created_at, last_updated, version)
            VALUES ($1, $2, $3, $4, $5, $6, $6, 0)
            ON CONFLICT (user_id, series_id) DO NOTHING
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(state.user_id)
        .bind(state.series_id)
        .bind(state.status.as_label())
        .bind(state.counts.watched)
        .bind(state.counts.total)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = inserted {
            tracing::debug!(
                user_id = state.user_id,
                series_id = state.series_id,
                status = %state.status,
                "Created watching state"
            );
            return row.try_into();
        }

        // Lost the race against a concurrent creator
        self.load_state(state.user_id, state.series_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Watching state for user {} and series {} vanished after insert conflict",
                    state.user_id, state.series_id
                ))
            })
    }

    async fn update_state(&self, state: &WatchingState) -> AppResult<WatchingState> {
        let updated: Option<WatchingStateRow> = sqlx::query_as(&format!(
            r#"
            UPDATE watching_states
            SET status = $1,
                watched_episodes_count = $2,
                total_episodes_count = $3,
                last_updated = $4,
                version = version + 1
            WHERE user_id = $5 AND series_id = $6 AND version = $7
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(state.status.as_label())
        .bind(state.watched_episodes_count)
        .bind(state.total_episodes_count)
        .bind(Utc::now())
        .bind(state.user_id)
        .bind(state.series_id)
        .bind(state.version)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(row) => row.try_into(),
            None => Err(AppError::Conflict(format!(
                "watching state for user {} and series {} changed since version {}",
                state.user_id, state.series_id, state.version
            ))),
        }
    }
}
