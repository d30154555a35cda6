//! Per-status transition rules
//!
//! Each status has a handler that decides, from freshly counted episodes, which
//! status a series moves to next. Handlers are pure: loading and persisting the
//! watching state is left to the status service.

use crate::{
    error::AppResult,
    models::{EpisodeCounts, WatchingStatus},
};

pub mod finished;
pub mod in_progress;
pub mod resolver;
pub mod to_watch;

pub use finished::{FinishedPolicy, FinishedState};
pub use in_progress::InProgressState;
pub use resolver::StatusResolver;
pub use to_watch::ToWatchState;

/// Maps episode counts to the status they naturally imply
///
/// Overcounts (`watched > total`) are tolerated and classify as Finished.
pub fn classify(total: i64, watched: i64) -> WatchingStatus {
    if watched <= 0 {
        WatchingStatus::ToWatch
    } else if watched >= total {
        WatchingStatus::Finished
    } else {
        WatchingStatus::InProgress
    }
}

/// Everything a handler needs to decide the next status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionInput {
    pub user_id: i64,
    pub series_id: i64,
    pub counts: EpisodeCounts,
    /// Whether the user already reviewed the series. Only looked up for
    /// handlers that ask for it.
    pub has_review: bool,
}

/// Outcome of a transition: the status and counts to persist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub status: WatchingStatus,
    pub watched_episodes_count: i64,
    pub total_episodes_count: i64,
}

impl Transition {
    /// Moves to `status`, persisting the counts as observed
    pub fn observed(status: WatchingStatus, counts: EpisodeCounts) -> Self {
        Self {
            status,
            watched_episodes_count: counts.watched,
            total_episodes_count: counts.total,
        }
    }

    /// Pins the series as Finished with every episode counted as watched
    pub fn fully_watched(counts: EpisodeCounts) -> Self {
        Self {
            status: WatchingStatus::Finished,
            watched_episodes_count: counts.total,
            total_episodes_count: counts.total,
        }
    }
}

/// Transition rules valid from a single status
pub trait StatusHandler: Send + Sync {
    /// The status this handler is responsible for
    fn status(&self) -> WatchingStatus;

    /// Whether `compute_transition` depends on `TransitionInput::has_review`
    fn requires_review_lookup(&self) -> bool {
        false
    }

    /// Decides the next status and the counts to persist
    fn compute_transition(&self, input: &TransitionInput) -> Transition;

    /// Fails unless a review may be written from this status
    fn validate_review_eligibility(&self) -> AppResult<()>;
}

#[cfg(test)]
pub(crate) fn input(total: i64, watched: i64, has_review: bool) -> TransitionInput {
    TransitionInput {
        user_id: 1,
        series_id: 42,
        counts: EpisodeCounts::new(total, watched),
        has_review,
    }
}
