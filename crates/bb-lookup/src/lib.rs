//! Bibliographic lookup used to pre-fill the book form.
//!
//! A [`BookSource`] fetches raw result documents; [`LookupClient`] guards the
//! query, tracks the in-flight flag and normalizes documents into at most
//! [`MAX_CANDIDATES`] candidates.

mod normalize;
mod openlibrary;

pub use normalize::{MAX_CANDIDATES, cover_uri, normalize_doc, normalize_docs};
pub use openlibrary::{OPEN_LIBRARY_URL, OpenLibrarySource};

use async_trait::async_trait;
use bb_api_types::{Candidate, Outcome, OutcomeKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("type a title first")]
    EmptyQuery,

    #[error("lookup failed: {0}")]
    LookupFailed(String),

    #[error("a lookup is already in progress")]
    Busy,
}

impl LookupError {
    pub fn outcome(&self) -> Outcome {
        match self {
            LookupError::EmptyQuery => Outcome::new(OutcomeKind::EmptyQuery, "Type a title first"),
            LookupError::LookupFailed(_) => Outcome::new(OutcomeKind::LookupFailed, "Lookup error."),
            LookupError::Busy => Outcome::new(OutcomeKind::Busy, "A lookup is already in progress"),
        }
    }
}

#[async_trait]
pub trait BookSource: Send + Sync {
    /// Returns the raw result documents for a title query, in relevance order.
    async fn fetch_docs(&self, title: &str) -> anyhow::Result<Vec<serde_json::Value>>;
}

pub struct LookupClient {
    source: Arc<dyn BookSource>,
    loading: AtomicBool,
}

/// Owns the loading flag for one request and clears it however the request ends.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl LookupClient {
    pub fn new(source: Arc<dyn BookSource>) -> Self {
        Self {
            source,
            loading: AtomicBool::new(false),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Searches by title. An empty result is a valid outcome, not an error.
    /// Only one search runs at a time; an overlapping call fails with
    /// [`LookupError::Busy`] without reaching the source.
    pub async fn search(&self, query: &str) -> Result<Vec<Candidate>, LookupError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        let Some(_loading) = LoadingGuard::acquire(&self.loading) else {
            return Err(LookupError::Busy);
        };

        let docs = self.source.fetch_docs(query).await.map_err(|err| {
            warn!("book lookup for {:?} failed: {:#}", query, err);
            LookupError::LookupFailed(format!("{err:#}"))
        })?;

        let candidates = normalize_docs(&docs);
        debug!(
            "book lookup for {:?} returned {} docs, kept {}",
            query,
            docs.len(),
            candidates.len()
        );
        Ok(candidates)
    }
}
