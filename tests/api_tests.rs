use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Utc;

use serieswatch_api::{
    api::{create_router, AppState},
    db::{EpisodeProgressSource, ReviewLookup, WatchingStateRepository},
    error::{AppError, AppResult},
    models::{EpisodeCounts, NewWatchingState, WatchingState},
    services::{FinishedPolicy, StatusResolver, WatchingStatusService},
};

const USER_ID: i64 = 7;
const SERIES_ID: i64 = 100;

/// In-memory stand-in for the catalog, progress, review and state tables
#[derive(Default)]
struct Store {
    counts: Mutex<HashMap<(i64, i64), EpisodeCounts>>,
    reviews: Mutex<HashSet<(i64, i64)>>,
    states: Mutex<HashMap<(i64, i64), WatchingState>>,
}

impl Store {
    fn set_progress(&self, total: i64, watched: i64) {
        self.counts
            .lock()
            .unwrap()
            .insert((USER_ID, SERIES_ID), EpisodeCounts::new(total, watched));
    }

    fn add_review(&self) {
        self.reviews.lock().unwrap().insert((USER_ID, SERIES_ID));
    }

    fn state(&self) -> Option<WatchingState> {
        self.states.lock().unwrap().get(&(USER_ID, SERIES_ID)).cloned()
    }
}

#[async_trait::async_trait]
impl EpisodeProgressSource for Store {
    async fn episode_counts(&self, user_id: i64, series_id: i64) -> AppResult<EpisodeCounts> {
        Ok(self
            .counts
            .lock()
            .unwrap()
            .get(&(user_id, series_id))
            .copied()
            .unwrap_or(EpisodeCounts::new(0, 0)))
    }

    async fn series_exists(&self, series_id: i64) -> AppResult<bool> {
        Ok(series_id == SERIES_ID)
    }

    async fn user_exists(&self, user_id: i64) -> AppResult<bool> {
        Ok(user_id == USER_ID)
    }
}

#[async_trait::async_trait]
impl ReviewLookup for Store {
    async fn review_exists(&self, user_id: i64, series_id: i64) -> AppResult<bool> {
        Ok(self.reviews.lock().unwrap().contains(&(user_id, series_id)))
    }
}

#[async_trait::async_trait]
impl WatchingStateRepository for Store {
    async fn load_state(&self, user_id: i64, series_id: i64) -> AppResult<Option<WatchingState>> {
        Ok(self.states.lock().unwrap().get(&(user_id, series_id)).cloned())
    }

    async fn create_state(&self, state: NewWatchingState) -> AppResult<WatchingState> {
        let now = Utc::now();
        let mut states = self.states.lock().unwrap();
        let id = states.len() as i64 + 1;
        let row = states
            .entry((state.user_id, state.series_id))
            .or_insert_with(|| WatchingState {
                id,
                user_id: state.user_id,
                series_id: state.series_id,
                status: state.status,
                watched_episodes_count: state.counts.watched,
                total_episodes_count: state.counts.total,
                created_at: now,
                last_updated: now,
                version: 0,
            });
        Ok(row.clone())
    }

    async fn update_state(&self, state: &WatchingState) -> AppResult<WatchingState> {
        let mut states = self.states.lock().unwrap();
        let row = states
            .get_mut(&(state.user_id, state.series_id))
            .ok_or_else(|| AppError::Internal("missing watching state".to_string()))?;
        if row.version != state.version {
            return Err(AppError::Conflict("stale version".to_string()));
        }
        *row = WatchingState {
            last_updated: Utc::now(),
            version: state.version + 1,
            ..state.clone()
        };
        Ok(row.clone())
    }
}

fn create_test_server(policy: FinishedPolicy) -> (TestServer, Arc<Store>) {
    let store = Arc::new(Store::default());
    let service = WatchingStatusService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        StatusResolver::with_policy(policy),
    );
    let app = create_router(AppState::new(service));
    (TestServer::new(app).unwrap(), store)
}

fn status_path() -> String {
    format!("/users/{}/series/{}/status", USER_ID, SERIES_ID)
}

fn eligibility_path() -> String {
    format!("/users/{}/series/{}/review-eligibility", USER_ID, SERIES_ID)
}

#[tokio::test]
async fn test_health_check() {
    let (server, _) = create_test_server(FinishedPolicy::Sticky);
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (server, _) = create_test_server(FinishedPolicy::Sticky);
    let response = server.get("/health").await;
    let request_id = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(request_id.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_get_status_for_new_pair() {
    let (server, store) = create_test_server(FinishedPolicy::Sticky);
    store.set_progress(10, 0);

    let response = server.get(&status_path()).await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "to_watch");
    assert_eq!(body["user_id"], USER_ID);
    assert_eq!(body["series_id"], SERIES_ID);
    assert!(store.state().is_none());
}

#[tokio::test]
async fn test_update_status_through_a_series() {
    let (server, store) = create_test_server(FinishedPolicy::Sticky);

    store.set_progress(2, 1);
    let response = server.post(&status_path()).await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "in_progress");

    store.set_progress(2, 2);
    let body: serde_json::Value = server.post(&status_path()).await.json();
    assert_eq!(body["status"], "finished");

    let state = store.state().unwrap();
    assert_eq!(state.watched_episodes_count, 2);
    assert_eq!(state.total_episodes_count, 2);
}

#[tokio::test]
async fn test_review_flow() {
    let (server, store) = create_test_server(FinishedPolicy::Sticky);

    store.set_progress(10, 5);
    server.post(&status_path()).await.assert_status_ok();

    let response = server.get(&eligibility_path()).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("InProgress"));

    store.set_progress(10, 10);
    server.post(&status_path()).await.assert_status_ok();
    server
        .get(&eligibility_path())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    store.add_review();
    server
        .get(&eligibility_path())
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_reviewed_series_ignores_stale_progress() {
    let (server, store) = create_test_server(FinishedPolicy::Permissive);

    store.set_progress(10, 10);
    server.post(&status_path()).await.assert_status_ok();
    store.add_review();

    store.set_progress(10, 7);
    let body: serde_json::Value = server.post(&status_path()).await.json();
    assert_eq!(body["status"], "finished");

    let state = store.state().unwrap();
    assert_eq!(state.watched_episodes_count, 10);
    assert_eq!(state.total_episodes_count, 10);
}

#[tokio::test]
async fn test_unknown_series_is_bad_request() {
    let (server, _) = create_test_server(FinishedPolicy::Sticky);

    let response = server
        .get(&format!("/users/{}/series/{}/status", USER_ID, 404))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("series 404"));
}
