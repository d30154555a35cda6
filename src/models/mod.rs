mod watching_state;
mod watching_status;

pub use watching_state::{EpisodeCounts, NewWatchingState, WatchingState};
pub use watching_status::WatchingStatus;
