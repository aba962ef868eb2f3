use anyhow::Result;
use photo_search::client::UnsplashClient;
use photo_search::config::AppConfig;
use photo_search::search::{HistoryStore, JsonFileHistory};
use photo_search::server::{router, AppState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("photo_search=debug,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    info!(
        "Using search endpoint {} with page size {}",
        config.search_url, config.page_size
    );

    let client = UnsplashClient::new(&config.search_url, &config.access_key, config.timeout)?;
    let history = HistoryStore::load(Box::new(JsonFileHistory::new(&config.history_path)));
    info!("Search history stored at {:?}", config.history_path);

    let state = AppState::new(Arc::new(client), history, config.page_size);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("Photo search server running on http://{}", config.bind);

    axum::serve(listener, app).await?;
    Ok(())
}
