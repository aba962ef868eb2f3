use serde::{Deserialize, Serialize};

/// One photo record returned by the search API.
///
/// Identity is `id`; the value is never mutated after decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "user")]
    pub author: Author,
    #[serde(rename = "urls")]
    pub image_urls: ImageUrls,
}

impl SearchResult {
    /// True when the photo carries a non-empty caption.
    pub fn has_caption(&self) -> bool {
        self.description
            .as_deref()
            .is_some_and(|d| !d.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub username: String,
    pub name: String,
    pub profile_image: ProfileImageUrls,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileImageUrls {
    pub small: String,
    pub medium: String,
    pub large: String,
}

/// Stable, cacheable image locations handed to whatever renders the photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrls {
    pub full: String,
    pub regular: String,
    pub small: String,
    pub thumb: String,
}

/// Raw body of `GET /search/photos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsplashSearchResponse {
    pub total: u64,
    pub total_pages: u32,
    pub results: Vec<SearchResult>,
}

/// Outcome of one successful page fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub results: Vec<SearchResult>,
    pub total_results: u64,
    pub total_pages: u32,
}

impl From<UnsplashSearchResponse> for Page {
    fn from(response: UnsplashSearchResponse) -> Self {
        Self {
            results: response.results,
            total_results: response.total,
            total_pages: response.total_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// Snapshot of the active session as served over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub request_id: String,
    pub query: String,
    pub results: Vec<SearchResult>,
    pub current_page: u32,
    pub total_pages: u32,
    pub can_load_more: bool,
    pub ignored: bool,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub entries: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    pub loading: bool,
    pub loading_more: bool,
    pub last_error: Option<ErrorResponse>,
}
