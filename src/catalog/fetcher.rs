//! Remote API access.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

// == Public Constants ==
/// Public PokeAPI endpoint
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

// == Fetch Error ==
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Upstream returned status {0}")]
    Status(u16),

    /// Upstream answered with JSON of the wrong shape
    #[error("Invalid upstream payload: {0}")]
    InvalidPayload(String),

    /// Caller passed an unusable argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

// == Fetcher Trait ==
/// Fetches JSON documents from the remote API.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GETs `path` (relative to the API root) with the given query pairs.
    async fn fetch_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, FetchError>;
}

// == HTTP Fetcher ==
/// reqwest-backed fetcher with pooled connections.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    /// Builds a client with a 30s request timeout and a 10s connect timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let base_url = base_url.into();
        url::Url::parse(&base_url)
            .map_err(|e| FetchError::InvalidInput(format!("base url {}: {}", base_url, e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("pokedex_cache/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        let url = self.url_for(path);
        debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.json::<Value>().await?)
    }
}
