use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::WatchingStatus;

/// Episode totals for a (user, series) pair as reported by episode progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeCounts {
    /// Number of episodes the series has
    pub total: i64,
    /// Number of those episodes the user has marked watched
    pub watched: i64,
}

impl EpisodeCounts {
    /// Creates a new pair of counts, clamping negatives to zero
    pub fn new(total: i64, watched: i64) -> Self {
        Self {
            total: total.max(0),
            watched: watched.max(0),
        }
    }
}

/// Persisted watching status of one user for one series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchingState {
    pub id: i64,
    pub user_id: i64,
    pub series_id: i64,
    pub status: WatchingStatus,
    pub watched_episodes_count: i64,
    pub total_episodes_count: i64,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    /// Incremented on every update, checked to detect lost updates
    pub version: i64,
}

/// Values for a record that does not exist yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewWatchingState {
    pub user_id: i64,
    pub series_id: i64,
    pub status: WatchingStatus,
    pub counts: EpisodeCounts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_clamp_negative_values() {
        let counts = EpisodeCounts::new(-3, -1);
        assert_eq!(counts, EpisodeCounts { total: 0, watched: 0 });
    }

    #[test]
    fn test_counts_keep_overcount() {
        let counts = EpisodeCounts::new(10, 12);
        assert_eq!(counts.watched, 12);
        assert_eq!(counts.total, 10);
    }
}
