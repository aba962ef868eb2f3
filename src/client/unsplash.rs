use super::PhotoSearchClient;
use crate::error::SearchError;
use crate::models::{Page, UnsplashSearchResponse};
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// `PhotoSearchClient` backed by the Unsplash search endpoint.
#[derive(Debug, Clone)]
pub struct UnsplashClient {
    http: reqwest::Client,
    search_url: String,
    access_key: String,
}

impl UnsplashClient {
    pub fn new(
        search_url: impl Into<String>,
        access_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> reqwest::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            search_url: search_url.into(),
            access_key: access_key.into(),
        })
    }

    fn build_url(&self, query: &str, page: u32, page_size: u32) -> Result<Url, SearchError> {
        Url::parse_with_params(
            &self.search_url,
            &[
                ("query", query),
                ("client_id", self.access_key.as_str()),
                ("page", &page.to_string()),
                ("per_page", &page_size.to_string()),
            ],
        )
        .map_err(|e| {
            warn!("Failed to build search URL from {}: {}", self.search_url, e);
            SearchError::InvalidRequest
        })
    }
}

#[async_trait]
impl PhotoSearchClient for UnsplashClient {
    #[instrument(skip(self))]
    async fn fetch(&self, query: &str, page: u32, page_size: u32) -> Result<Page, SearchError> {
        let url = self.build_url(query, page, page_size)?;
        debug!("Requesting {}", redact(&url));

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!("Photo search returned status {}", status);
            return Err(SearchError::from_status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| {
            warn!("Failed to read response body: {}", e);
            SearchError::TransportFailure
        })?;

        let page = decode_page(&body)?;
        debug!(
            "Received {} results ({} total, {} pages)",
            page.results.len(),
            page.total_results,
            page.total_pages
        );
        Ok(page)
    }
}

fn classify_send_error(error: reqwest::Error) -> SearchError {
    if error.is_builder() {
        warn!("Search request could not be built: {}", error);
        return SearchError::InvalidRequest;
    }
    if let Some(status) = error.status() {
        return SearchError::from_status(status.as_u16());
    }
    warn!("Search request failed in transport: {}", error);
    SearchError::TransportFailure
}

fn decode_page(body: &[u8]) -> Result<Page, SearchError> {
    if body.is_empty() {
        return Err(SearchError::EmptyBody);
    }
    serde_json::from_slice::<UnsplashSearchResponse>(body)
        .map(Page::from)
        .map_err(|e| {
            warn!("Failed to parse search response: {}", e);
            SearchError::MalformedResponse
        })
}

fn redact(url: &Url) -> Url {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "client_id" { "***".into() } else { v };
            (k.into_owned(), v.into_owned())
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::SAMPLE_RESPONSE;
    use axum::{extract::Query, http::StatusCode, routing::get, Router};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/search/photos", addr)
    }

    async fn upstream(status: StatusCode, body: &'static str) -> String {
        serve(Router::new().route("/search/photos", get(move || async move { (status, body) })))
            .await
    }

    fn client(url: &str) -> UnsplashClient {
        UnsplashClient::new(url, "secret-key", Some(Duration::from_secs(5))).unwrap()
    }

    #[tokio::test]
    async fn success_decodes_page_and_sends_parameters() {
        let seen: Arc<Mutex<Option<HashMap<String, String>>>> = Arc::default();
        let recorder = seen.clone();
        let app = Router::new().route(
            "/search/photos",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let recorder = recorder.clone();
                async move {
                    *recorder.lock().unwrap() = Some(params);
                    (StatusCode::OK, SAMPLE_RESPONSE)
                }
            }),
        );
        let url = serve(app).await;

        let page = client(&url).fetch("red cats", 2, 15).await.unwrap();
        assert_eq!(page.total_results, 133);
        assert_eq!(page.total_pages, 7);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].id, "eOLpJytrbsQ");
        assert_eq!(page.results[0].author.profile_image.large, "https://images.example/p/l.jpg");
        assert_eq!(page.results[1].description, None);

        let params = seen.lock().unwrap().clone().unwrap();
        assert_eq!(params["query"], "red cats");
        assert_eq!(params["client_id"], "secret-key");
        assert_eq!(params["page"], "2");
        assert_eq!(params["per_page"], "15");
    }

    #[tokio::test]
    async fn status_429_is_rate_limited() {
        let url = upstream(StatusCode::TOO_MANY_REQUESTS, "Rate Limit Exceeded").await;
        assert_eq!(client(&url).fetch("cats", 1, 10).await, Err(SearchError::RateLimited));
    }

    #[tokio::test]
    async fn error_statuses_carry_the_code() {
        for status in [StatusCode::FORBIDDEN, StatusCode::NOT_FOUND, StatusCode::SERVICE_UNAVAILABLE] {
            let url = upstream(status, "{\"errors\":[\"nope\"]}").await;
            assert_eq!(
                client(&url).fetch("cats", 1, 10).await,
                Err(SearchError::ClientOrServerError(status.as_u16()))
            );
        }
    }

    #[tokio::test]
    async fn status_outside_error_range_keeps_its_code() {
        let url = upstream(StatusCode::NOT_MODIFIED, "").await;
        assert_eq!(
            client(&url).fetch("cats", 1, 10).await,
            Err(SearchError::ClientOrServerError(304))
        );
    }

    #[tokio::test]
    async fn empty_success_body_is_reported() {
        let url = upstream(StatusCode::OK, "").await;
        assert_eq!(client(&url).fetch("cats", 1, 10).await, Err(SearchError::EmptyBody));
    }

    #[tokio::test]
    async fn unexpected_shape_is_malformed() {
        let url = upstream(StatusCode::OK, "{\"total\": 3, \"results\": \"nope\"}").await;
        assert_eq!(client(&url).fetch("cats", 1, 10).await, Err(SearchError::MalformedResponse));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_failure() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = format!("http://{}/search/photos", addr);
        assert_eq!(client(&url).fetch("cats", 1, 10).await, Err(SearchError::TransportFailure));
    }

    #[tokio::test]
    async fn unparsable_endpoint_is_invalid_request() {
        let result = client("not a url").fetch("cats", 1, 10).await;
        assert_eq!(result, Err(SearchError::InvalidRequest));
    }

    #[test]
    fn redact_hides_access_key() {
        let url = client("https://api.unsplash.com/search/photos")
            .build_url("cats", 1, 10)
            .unwrap();
        let shown = redact(&url).to_string();
        assert!(!shown.contains("secret-key"));
        assert!(shown.contains("query=cats"));
    }
}
