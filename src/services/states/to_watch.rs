use super::{classify, StatusHandler, Transition, TransitionInput};
use crate::{
    error::{AppError, AppResult},
    models::WatchingStatus,
};

/// Rules for a series the user has not started
#[derive(Debug, Clone, Copy, Default)]
pub struct ToWatchState;

impl StatusHandler for ToWatchState {
    fn status(&self) -> WatchingStatus {
        WatchingStatus::ToWatch
    }

    fn compute_transition(&self, input: &TransitionInput) -> Transition {
        let counts = input.counts;
        if counts.watched <= 0 {
            return Transition::observed(WatchingStatus::ToWatch, counts);
        }

        // A whole season marked at once may skip InProgress entirely
        Transition::observed(classify(counts.total, counts.watched), counts)
    }

    fn validate_review_eligibility(&self) -> AppResult<()> {
        Err(AppError::ReviewNotAllowed(WatchingStatus::ToWatch))
    }
}
