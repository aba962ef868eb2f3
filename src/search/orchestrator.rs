use super::aggregator::ResultAggregator;
use super::history::HistoryStore;
use crate::client::PhotoSearchClient;
use crate::error::SearchError;
use crate::models::SearchResult;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Receives lifecycle notifications from a `SearchOrchestrator`.
pub trait SearchListener: Send + Sync {
    fn on_loading_changed(&self, _loading: bool) {}

    /// Secondary progress for pagination; never touches the primary flag.
    fn on_loading_more_changed(&self, _loading: bool) {}

    fn on_results_changed(&self) {}

    fn on_error(&self, _error: SearchError) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Empty query, closed pagination gate, or a query that is not the active one.
    Ignored,
    Applied { added: usize, total: usize },
    /// The fetch finished after a newer search replaced its session.
    Stale,
}

#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub current_page: u32,
    pub total_pages: u32,
    pub can_load_more: bool,
}

struct SessionState {
    aggregator: ResultAggregator,
    generation: u64,
}

/// Drives searches and pagination against a `PhotoSearchClient`.
///
/// Every `search` bumps a generation counter; a fetch that completes under an
/// older generation is dropped without touching the session. A dropped
/// load-more still turns its progress indicator off.
pub struct SearchOrchestrator {
    client: Arc<dyn PhotoSearchClient>,
    page_size: u32,
    state: Mutex<SessionState>,
    history: Mutex<HistoryStore>,
    listeners: Vec<Arc<dyn SearchListener>>,
}

impl SearchOrchestrator {
    pub fn new(client: Arc<dyn PhotoSearchClient>, history: HistoryStore, page_size: u32) -> Self {
        Self {
            client,
            page_size,
            state: Mutex::new(SessionState {
                aggregator: ResultAggregator::new(),
                generation: 0,
            }),
            history: Mutex::new(history),
            listeners: Vec::new(),
        }
    }

    pub fn with_listener(mut self, listener: Arc<dyn SearchListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring empty search");
            return Ok(SearchOutcome::Ignored);
        }

        let generation = {
            let mut state = self.state.lock().await;
            state.generation += 1;
            state.aggregator.start_new_search(query);
            state.generation
        };
        self.notify(|l| l.on_loading_changed(true));

        let result = self.client.fetch(query, 1, self.page_size).await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            debug!("Discarding stale first page for {:?}", query);
            return Ok(SearchOutcome::Stale);
        }

        match result {
            Ok(page) => {
                let added = state.aggregator.apply_page(page, 1);
                let total = state.aggregator.session().results().len();
                drop(state);

                self.history.lock().await.record(query);
                info!("Search for {:?} returned {} visible results", query, total);
                self.notify(|l| l.on_loading_changed(false));
                self.notify(|l| l.on_results_changed());
                Ok(SearchOutcome::Applied { added, total })
            }
            Err(error) => {
                drop(state);
                warn!("Search for {:?} failed: {}", query, error);
                self.notify(|l| l.on_loading_changed(false));
                self.notify(|l| l.on_error(error));
                Err(error)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn load_more(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        let query = query.trim();

        let (generation, next_page) = {
            let mut state = self.state.lock().await;
            if query.is_empty() || state.aggregator.session().query() != query {
                debug!("Ignoring load-more for inactive query {:?}", query);
                return Ok(SearchOutcome::Ignored);
            }
            if !state.aggregator.can_load_more() || !state.aggregator.begin_load_more() {
                debug!("Load-more gate closed for {:?}", query);
                return Ok(SearchOutcome::Ignored);
            }
            (
                state.generation,
                state.aggregator.session().current_page() + 1,
            )
        };
        self.notify(|l| l.on_loading_more_changed(true));

        let result = self.client.fetch(query, next_page, self.page_size).await;

        let mut state = self.state.lock().await;
        if state.generation != generation {
            drop(state);
            debug!("Discarding stale page {} for {:?}", next_page, query);
            self.notify(|l| l.on_loading_more_changed(false));
            return Ok(SearchOutcome::Stale);
        }
        state.aggregator.end_load_more();

        match result {
            Ok(page) => {
                let added = state.aggregator.apply_page(page, next_page);
                let total = state.aggregator.session().results().len();
                drop(state);

                debug!("Page {} for {:?} added {} results", next_page, query, added);
                self.notify(|l| l.on_loading_more_changed(false));
                self.notify(|l| l.on_results_changed());
                Ok(SearchOutcome::Applied { added, total })
            }
            Err(error) => {
                drop(state);
                warn!("Loading page {} for {:?} failed: {}", next_page, query, error);
                self.notify(|l| l.on_loading_more_changed(false));
                self.notify(|l| l.on_error(error));
                Err(error)
            }
        }
    }

    pub async fn results(&self) -> Vec<SearchResult> {
        self.state.lock().await.aggregator.session().results().to_vec()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        let session = state.aggregator.session();
        SessionSnapshot {
            query: session.query().to_string(),
            results: session.results().to_vec(),
            current_page: session.current_page(),
            total_pages: session.total_pages(),
            can_load_more: state.aggregator.can_load_more(),
        }
    }

    pub async fn history(&self) -> Vec<String> {
        self.history.lock().await.list()
    }

    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
    }

    fn notify<F>(&self, event: F)
    where
        F: Fn(&dyn SearchListener),
    {
        for listener in &self.listeners {
            event(listener.as_ref());
        }
    }
}
