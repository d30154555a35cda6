use super::{FinishedPolicy, FinishedState, InProgressState, StatusHandler, ToWatchState};
use crate::{error::AppResult, models::WatchingStatus};

/// Maps each watching status to the handler responsible for it
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusResolver {
    to_watch: ToWatchState,
    in_progress: InProgressState,
    finished: FinishedState,
}

impl StatusResolver {
    pub fn new(
        to_watch: ToWatchState,
        in_progress: InProgressState,
        finished: FinishedState,
    ) -> Self {
        Self {
            to_watch,
            in_progress,
            finished,
        }
    }

    /// Resolver with the stock handlers and the given Finished policy
    pub fn with_policy(policy: FinishedPolicy) -> Self {
        Self::new(ToWatchState, InProgressState, FinishedState::new(policy))
    }

    pub fn resolve(&self, status: WatchingStatus) -> &dyn StatusHandler {
        match status {
            WatchingStatus::ToWatch => &self.to_watch,
            WatchingStatus::InProgress => &self.in_progress,
            WatchingStatus::Finished => &self.finished,
        }
    }

    /// Resolves a raw status label, failing with `UnknownStatus` for anything
    /// that is not one of the three known statuses
    pub fn resolve_label(&self, label: &str) -> AppResult<&dyn StatusHandler> {
        let status = label.parse::<WatchingStatus>()?;
        Ok(self.resolve(status))
    }

    pub fn finished_policy(&self) -> FinishedPolicy {
        self.finished.policy()
    }
}
