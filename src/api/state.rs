use std::sync::Arc;

use crate::services::WatchingStatusService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub status_service: Arc<WatchingStatusService>,
}

impl AppState {
    pub fn new(status_service: WatchingStatusService) -> Self {
        Self {
            status_service: Arc::new(status_service),
        }
    }
}
