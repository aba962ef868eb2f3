use crate::client::PhotoSearchClient;
use crate::error::SearchError;
use crate::models::{
    ErrorResponse, HistoryResponse, SearchRequest, SessionResponse, StatusResponse,
};
use crate::search::{
    HistoryStore, SearchListener, SearchOrchestrator, SearchOutcome, SessionSnapshot,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument};
use uuid::Uuid;

/// Mirrors the latest lifecycle notifications for `GET /status`.
#[derive(Default)]
pub struct StatusListener {
    status: Mutex<StatusResponse>,
}

impl StatusListener {
    pub fn current(&self) -> StatusResponse {
        self.status
            .lock()
            .map(|status| status.clone())
            .unwrap_or_default()
    }

    fn update<F: FnOnce(&mut StatusResponse)>(&self, change: F) {
        if let Ok(mut status) = self.status.lock() {
            change(&mut status);
        }
    }
}

impl SearchListener for StatusListener {
    fn on_loading_changed(&self, loading: bool) {
        self.update(|s| {
            s.loading = loading;
            if loading {
                s.last_error = None;
            }
        });
    }

    fn on_loading_more_changed(&self, loading: bool) {
        self.update(|s| s.loading_more = loading);
    }

    fn on_error(&self, error: SearchError) {
        self.update(|s| s.last_error = Some(error_body(error)));
    }
}

#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<SearchOrchestrator>,
    status: Arc<StatusListener>,
}

impl AppState {
    pub fn new(client: Arc<dyn PhotoSearchClient>, history: HistoryStore, page_size: u32) -> Self {
        let status = Arc::new(StatusListener::default());
        let orchestrator =
            SearchOrchestrator::new(client, history, page_size).with_listener(status.clone());
        Self {
            orchestrator: Arc::new(orchestrator),
            status,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search", post(search))
        .route("/search/more", post(load_more))
        .route("/results", get(results))
        .route("/history", get(history).delete(clear_history))
        .route("/status", get(status))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `SearchError` rendered as an HTTP response.
pub struct ApiError(SearchError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            SearchError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            SearchError::InvalidRequest => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_GATEWAY,
        };
        (status, Json(error_body(self.0))).into_response()
    }
}

fn error_body(error: SearchError) -> ErrorResponse {
    ErrorResponse {
        kind: error.kind().to_string(),
        message: error.message(),
    }
}

fn session_response(
    request_id: String,
    snapshot: SessionSnapshot,
    ignored: bool,
    start: Instant,
) -> SessionResponse {
    SessionResponse {
        request_id,
        query: snapshot.query,
        results: snapshot.results,
        current_page: snapshot.current_page,
        total_pages: snapshot.total_pages,
        can_load_more: snapshot.can_load_more,
        ignored,
        elapsed_ms: start.elapsed().as_millis() as u64,
    }
}

async fn health() -> &'static str {
    "OK"
}

#[instrument(skip(state))]
async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    info!("Search request {} for {:?}", request_id, req.query);

    let outcome = state.orchestrator.search(&req.query).await.map_err(ApiError)?;
    let snapshot = state.orchestrator.snapshot().await;
    Ok(Json(session_response(
        request_id,
        snapshot,
        !matches!(outcome, SearchOutcome::Applied { .. }),
        start,
    )))
}

#[instrument(skip(state))]
async fn load_more(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();
    info!("Load-more request {} for {:?}", request_id, req.query);

    let outcome = state
        .orchestrator
        .load_more(&req.query)
        .await
        .map_err(ApiError)?;
    let snapshot = state.orchestrator.snapshot().await;
    Ok(Json(session_response(
        request_id,
        snapshot,
        !matches!(outcome, SearchOutcome::Applied { .. }),
        start,
    )))
}

async fn results(State(state): State<AppState>) -> Json<SessionResponse> {
    let start = Instant::now();
    let snapshot = state.orchestrator.snapshot().await;
    Json(session_response(
        Uuid::new_v4().to_string(),
        snapshot,
        false,
        start,
    ))
}

async fn history(State(state): State<AppState>) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        entries: state.orchestrator.history().await,
    })
}

async fn clear_history(State(state): State<AppState>) -> StatusCode {
    state.orchestrator.clear_history().await;
    info!("Search history cleared");
    StatusCode::NO_CONTENT
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(state.status.current())
}
