pub mod episode_progress;
pub mod postgres;
pub mod reviews;
pub mod watching_states;

pub use episode_progress::{EpisodeProgressSource, PgEpisodeProgress};
pub use postgres::{create_pool, run_migrations};
pub use reviews::{PgReviewLookup, ReviewLookup};
pub use watching_states::{PgWatchingStateRepository, WatchingStateRepository};

#[cfg(test)]
pub use episode_progress::MockEpisodeProgressSource;
#[cfg(test)]
pub use reviews::MockReviewLookup;
#[cfg(test)]
pub use watching_states::MockWatchingStateRepository;
