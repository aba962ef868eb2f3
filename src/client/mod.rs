mod unsplash;

pub use unsplash::UnsplashClient;

use crate::error::SearchError;
use crate::models::Page;
use async_trait::async_trait;

/// Fetches one page of photo search results.
///
/// Implementations hold no per-query state, so concurrent calls for
/// different pages are fine; ordering between them is up to the caller.
#[async_trait]
pub trait PhotoSearchClient: Send + Sync {
    async fn fetch(&self, query: &str, page: u32, page_size: u32) -> Result<Page, SearchError>;
}
