use crate::models::{Page, SearchResult};
use std::collections::HashSet;
use tracing::debug;

/// Accumulated state of one active query.
#[derive(Debug, Clone)]
pub struct SearchSession {
    query: String,
    results: Vec<SearchResult>,
    seen_ids: HashSet<String>,
    current_page: u32,
    total_pages: u32,
    is_fetching_more: bool,
}

impl SearchSession {
    fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            results: Vec::new(),
            seen_ids: HashSet::new(),
            current_page: 0,
            total_pages: 1,
            is_fetching_more: false,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn is_fetching_more(&self) -> bool {
        self.is_fetching_more
    }
}

/// Owns the current `SearchSession` and merges pages into it.
#[derive(Debug)]
pub struct ResultAggregator {
    session: SearchSession,
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self {
            session: SearchSession::new(""),
        }
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    /// Replace the current session with an empty one for `query`.
    pub fn start_new_search(&mut self, query: &str) {
        debug!("Starting new session for {:?}", query);
        self.session = SearchSession::new(query);
    }

    /// Merge `page` as page number `page_number`. Returns how many results were added.
    ///
    /// Photos without a caption and ids already in the session are dropped.
    /// The cursor advances even when nothing new survives filtering.
    pub fn apply_page(&mut self, page: Page, page_number: u32) -> usize {
        let session = &mut self.session;
        let before = session.results.len();

        for result in page.results {
            if !result.has_caption() {
                continue;
            }
            if session.seen_ids.insert(result.id.clone()) {
                session.results.push(result);
            }
        }

        session.total_pages = page.total_pages.max(1);
        session.current_page = page_number.min(session.total_pages);

        let added = session.results.len() - before;
        debug!(
            "Applied page {}/{} for {:?}: {} new, {} total",
            session.current_page,
            session.total_pages,
            session.query,
            added,
            session.results.len()
        );
        added
    }

    pub fn can_load_more(&self) -> bool {
        !self.session.is_fetching_more && self.session.current_page < self.session.total_pages
    }

    /// Mark a load-more fetch as in flight. Returns false, changing nothing,
    /// if one is already running.
    pub fn begin_load_more(&mut self) -> bool {
        if self.session.is_fetching_more {
            return false;
        }
        self.session.is_fetching_more = true;
        true
    }

    pub fn end_load_more(&mut self) {
        self.session.is_fetching_more = false;
    }
}
