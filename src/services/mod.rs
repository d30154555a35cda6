pub mod states;
pub mod watching_status;

pub use states::{FinishedPolicy, StatusResolver};
pub use watching_status::WatchingStatusService;
