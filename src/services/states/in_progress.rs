use super::{classify, StatusHandler, Transition, TransitionInput};
use crate::{
    error::{AppError, AppResult},
    models::WatchingStatus,
};

/// Rules for a partially watched series; movement is allowed both ways
#[derive(Debug, Clone, Copy, Default)]
pub struct InProgressState;

impl StatusHandler for InProgressState {
    fn status(&self) -> WatchingStatus {
        WatchingStatus::InProgress
    }

    fn compute_transition(&self, input: &TransitionInput) -> Transition {
        let counts = input.counts;
        Transition::observed(classify(counts.total, counts.watched), counts)
    }

    fn validate_review_eligibility(&self) -> AppResult<()> {
        Err(AppError::ReviewNotAllowed(WatchingStatus::InProgress))
    }
}
