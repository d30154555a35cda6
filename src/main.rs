use std::sync::Arc;

use serieswatch_api::{
    api::{create_router, AppState},
    config::Config,
    db::{self, PgEpisodeProgress, PgReviewLookup, PgWatchingStateRepository},
    services::{StatusResolver, WatchingStatusService},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("serieswatch_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
    db::run_migrations(&pool).await?;

    let policy = config.finished_policy();
    tracing::info!(?policy, "Finished-status policy selected");

    let status_service = WatchingStatusService::new(
        Arc::new(PgWatchingStateRepository::new(pool.clone())),
        Arc::new(PgEpisodeProgress::new(pool.clone())),
        Arc::new(PgReviewLookup::new(pool)),
        StatusResolver::with_policy(policy),
    );

    let app = create_router(AppState::new(status_service));

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
