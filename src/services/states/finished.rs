use super::{classify, StatusHandler, Transition, TransitionInput};
use crate::{error::AppResult, models::WatchingStatus};

/// What a finished, unreviewed series does when fewer episodes than its total
/// appear watched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinishedPolicy {
    /// Stay Finished; stale progress rows read after a restart must not
    /// un-finish a series
    #[default]
    Sticky,
    /// Fall back to InProgress like any other partially watched series
    Permissive,
}

impl FinishedPolicy {
    /// Maps the `finished_is_sticky` configuration flag to a policy
    pub fn from_sticky_flag(sticky: bool) -> Self {
        if sticky {
            FinishedPolicy::Sticky
        } else {
            FinishedPolicy::Permissive
        }
    }
}

/// Rules for a fully watched series
///
/// A reviewed series stays Finished no matter what counts are observed, and
/// its record never shows fewer watched episodes than the series has.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinishedState {
    policy: FinishedPolicy,
}

impl FinishedState {
    pub fn new(policy: FinishedPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> FinishedPolicy {
        self.policy
    }
}

impl StatusHandler for FinishedState {
    fn status(&self) -> WatchingStatus {
        WatchingStatus::Finished
    }

    fn requires_review_lookup(&self) -> bool {
        true
    }

    fn compute_transition(&self, input: &TransitionInput) -> Transition {
        let counts = input.counts;

        if input.has_review {
            if counts.watched < counts.total {
                tracing::warn!(
                    user_id = input.user_id,
                    series_id = input.series_id,
                    watched = counts.watched,
                    total = counts.total,
                    "Reviewed series reports unwatched episodes, keeping it finished"
                );
            } else if counts.watched > counts.total {
                tracing::warn!(
                    user_id = input.user_id,
                    series_id = input.series_id,
                    watched = counts.watched,
                    total = counts.total,
                    "Reviewed series reports more watched episodes than it has, clamping to total"
                );
            }
            return Transition::fully_watched(counts);
        }

        match classify(counts.total, counts.watched) {
            WatchingStatus::ToWatch if counts.watched == 0 => {
                Transition::observed(WatchingStatus::ToWatch, counts)
            }
            WatchingStatus::InProgress => match self.policy {
                FinishedPolicy::Sticky => {
                    tracing::debug!(
                        user_id = input.user_id,
                        series_id = input.series_id,
                        watched = counts.watched,
                        total = counts.total,
                        "Ignoring regression of finished series"
                    );
                    Transition::fully_watched(counts)
                }
                FinishedPolicy::Permissive => {
                    Transition::observed(WatchingStatus::InProgress, counts)
                }
            },
            _ => Transition::observed(WatchingStatus::Finished, counts),
        }
    }

    fn validate_review_eligibility(&self) -> AppResult<()> {
        Ok(())
    }
}
