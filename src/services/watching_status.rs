use std::sync::Arc;

use tracing::instrument;

use crate::{
    db::{EpisodeProgressSource, ReviewLookup, WatchingStateRepository},
    error::{AppError, AppResult},
    models::{EpisodeCounts, NewWatchingState, WatchingState, WatchingStatus},
    services::states::{classify, StatusResolver, TransitionInput},
};

/// Entry point for everything that reads or changes a user's watching status
///
/// The episode-marking workflow calls `update_status` after every progress
/// change, the review workflow calls `validate_review_creation` before writing
/// a review, and list views call `get_status`.
pub struct WatchingStatusService {
    states: Arc<dyn WatchingStateRepository>,
    progress: Arc<dyn EpisodeProgressSource>,
    reviews: Arc<dyn ReviewLookup>,
    resolver: StatusResolver,
}

impl WatchingStatusService {
    pub fn new(
        states: Arc<dyn WatchingStateRepository>,
        progress: Arc<dyn EpisodeProgressSource>,
        reviews: Arc<dyn ReviewLookup>,
        resolver: StatusResolver,
    ) -> Self {
        Self {
            states,
            progress,
            reviews,
            resolver,
        }
    }

    /// Status implied by the live episode counts
    ///
    /// Read-only: the persisted record is neither consulted nor created.
    #[instrument(skip(self))]
    pub async fn get_status(&self, user_id: i64, series_id: i64) -> AppResult<WatchingStatus> {
        self.ensure_exists(user_id, series_id).await?;

        let counts = self.progress.episode_counts(user_id, series_id).await?;
        Ok(classify(counts.total, counts.watched))
    }

    /// Recomputes and persists the status after an episode-progress change
    #[instrument(skip(self))]
    pub async fn update_status(&self, user_id: i64, series_id: i64) -> AppResult<WatchingStatus> {
        self.ensure_exists(user_id, series_id).await?;

        let counts = self.progress.episode_counts(user_id, series_id).await?;
        let state = self.get_or_create_state(user_id, series_id, counts).await?;

        let handler = self.resolver.resolve(state.status);
        let has_review = if handler.requires_review_lookup() {
            self.reviews.review_exists(user_id, series_id).await?
        } else {
            false
        };

        let transition = handler.compute_transition(&TransitionInput {
            user_id,
            series_id,
            counts,
            has_review,
        });

        if transition.status != state.status {
            tracing::info!(
                user_id,
                series_id,
                from = %state.status,
                to = %transition.status,
                "Watching status changed"
            );
        }

        let next = WatchingState {
            status: transition.status,
            watched_episodes_count: transition.watched_episodes_count,
            total_episodes_count: transition.total_episodes_count,
            ..state
        };

        match self.states.update_state(&next).await {
            Ok(saved) => Ok(saved.status),
            Err(e) => {
                tracing::error!(
                    user_id,
                    series_id,
                    target = %transition.status,
                    error = %e,
                    "Failed to persist watching state"
                );
                Err(e)
            }
        }
    }

    /// Checks that the user may write a review for the series
    ///
    /// Fails with `ReviewNotAllowed` until the series is finished and with
    /// `ReviewAlreadyExists` when the user already reviewed it.
    #[instrument(skip(self))]
    pub async fn validate_review_creation(&self, user_id: i64, series_id: i64) -> AppResult<()> {
        self.ensure_exists(user_id, series_id).await?;

        let status = match self.states.load_state(user_id, series_id).await? {
            Some(state) => state.status,
            None => {
                let counts = self.progress.episode_counts(user_id, series_id).await?;
                classify(counts.total, counts.watched)
            }
        };

        self.resolver
            .resolve(status)
            .validate_review_eligibility()?;

        if self.reviews.review_exists(user_id, series_id).await? {
            return Err(AppError::ReviewAlreadyExists);
        }

        Ok(())
    }

    async fn get_or_create_state(
        &self,
        user_id: i64,
        series_id: i64,
        counts: EpisodeCounts,
    ) -> AppResult<WatchingState> {
        if let Some(state) = self.states.load_state(user_id, series_id).await? {
            return Ok(state);
        }

        // A review may have been written before any record existed; such a
        // series starts out pinned as Finished
        let new_state = if self.reviews.review_exists(user_id, series_id).await? {
            NewWatchingState {
                user_id,
                series_id,
                status: WatchingStatus::Finished,
                counts: EpisodeCounts::new(counts.total, counts.total),
            }
        } else {
            NewWatchingState {
                user_id,
                series_id,
                status: classify(counts.total, counts.watched),
                counts,
            }
        };

        self.states.create_state(new_state).await
    }

    async fn ensure_exists(&self, user_id: i64, series_id: i64) -> AppResult<()> {
        if !self.progress.user_exists(user_id).await? {
            return Err(AppError::InvalidArgument(format!(
                "user {} does not exist",
                user_id
            )));
        }
        if !self.progress.series_exists(series_id).await? {
            return Err(AppError::InvalidArgument(format!(
                "series {} does not exist",
                series_id
            )));
        }
        Ok(())
    }
}
