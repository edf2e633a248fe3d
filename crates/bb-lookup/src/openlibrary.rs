use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::BookSource;

pub const OPEN_LIBRARY_URL: &str = "https://openlibrary.org";

/// Number of documents requested per search; only the first few are kept.
const SEARCH_LIMIT: &str = "10";

/// HTTP source backed by the Open Library search API.
///
/// Reads `OPENLIBRARY_URL` from environment at construction time
/// (default: `https://openlibrary.org`).
pub struct OpenLibrarySource {
    endpoint: String,
    http: reqwest::Client,
}

impl Default for OpenLibrarySource {
    fn default() -> Self {
        Self::new(None)
    }
}

impl OpenLibrarySource {
    pub fn new(endpoint: Option<String>) -> Self {
        let endpoint = endpoint
            .or_else(|| std::env::var("OPENLIBRARY_URL").ok())
            .unwrap_or_else(|| OPEN_LIBRARY_URL.to_string());
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Option<Vec<serde_json::Value>>,
}

#[async_trait]
impl BookSource for OpenLibrarySource {
    async fn fetch_docs(&self, title: &str) -> Result<Vec<serde_json::Value>> {
        let url = format!("{}/search.json", self.endpoint);

        let response = self
            .http
            .get(&url)
            .query(&[("title", title), ("limit", SEARCH_LIMIT)])
            .send()
            .await
            .context("openlibrary search transport")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("openlibrary search HTTP {status}");
        }

        let body: SearchResponse = response
            .json()
            .await
            .context("openlibrary search parse")?;

        Ok(body.docs.unwrap_or_default())
    }
}
