use anyhow::{anyhow, Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SEARCH_URL: &str = "https://api.unsplash.com/search/photos";
pub const DEFAULT_PAGE_SIZE: u32 = 30;
pub const MAX_PAGE_SIZE: u32 = 30;
pub const DEFAULT_HISTORY_PATH: &str = "search_history.json";
pub const DEFAULT_BIND: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub access_key: String,
    pub search_url: String,
    pub page_size: u32,
    pub history_path: PathBuf,
    pub bind: SocketAddr,
    pub timeout: Option<Duration>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_key = lookup("UNSPLASH_ACCESS_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow!("Unsplash access key not configured (UNSPLASH_ACCESS_KEY)"))?;

        let search_url =
            lookup("UNSPLASH_SEARCH_URL").unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string());

        let page_size = match lookup("PHOTO_SEARCH_PAGE_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .with_context(|| format!("invalid PHOTO_SEARCH_PAGE_SIZE: {}", raw))?,
            None => DEFAULT_PAGE_SIZE,
        };
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(anyhow!(
                "PHOTO_SEARCH_PAGE_SIZE must be between 1 and {}, got {}",
                MAX_PAGE_SIZE,
                page_size
            ));
        }

        let history_path = lookup("PHOTO_SEARCH_HISTORY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_PATH));

        let bind_raw = lookup("PHOTO_SEARCH_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid PHOTO_SEARCH_BIND: {}", bind_raw))?;

        let timeout = lookup("PHOTO_SEARCH_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .with_context(|| format!("invalid PHOTO_SEARCH_TIMEOUT_SECS: {}", raw))
            })
            .transpose()?;

        Ok(Self {
            access_key,
            search_url,
            page_size,
            history_path,
            bind,
            timeout,
        })
    }
}
