//! Search providers.
//!
//! Every way of answering a query implements [`SearchProvider`]. The server
//! and CLI never talk to a concrete provider; they get one from
//! [`build_provider`].
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │            FallbackProvider              │
//! │  ┌───────────────────┐ ┌──────────────┐  │
//! │  │ DelegatedProvider │ │ LocalKeyword │  │
//! │  │  (subprocess)     │→│  Provider    │  │
//! │  └───────────────────┘ └──────────────┘  │
//! └──────────────────────────────────────────┘
//! ```
//!
//! The fallback catches every primary failure; callers only ever see the
//! primary's success or the local answer.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::Config;
use crate::content;
use crate::delegate::DelegatedProvider;
use crate::models::SearchOutcome;
use crate::respond::compose_response;
use crate::search::search_content;

/// A capability that answers a free-text query.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use portfolio_api::models::SearchOutcome;
/// use portfolio_api::provider::SearchProvider;
///
/// struct Canned;
///
/// #[async_trait]
/// impl SearchProvider for Canned {
///     fn name(&self) -> &str { "canned" }
///
///     async fn search(&self, _query: &str) -> anyhow::Result<SearchOutcome> {
///         Ok(SearchOutcome { results: vec![], response: "Ask me anything.".into() })
///     }
/// }
/// ```
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Whether the provider can be tried right now. Checked per request.
    fn is_available(&self) -> bool {
        true
    }

    async fn search(&self, query: &str) -> Result<SearchOutcome>;
}

/// Keyword search over content loaded fresh from disk on every query.
pub struct LocalKeywordProvider {
    config: Config,
}

impl LocalKeywordProvider {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SearchProvider for LocalKeywordProvider {
    fn name(&self) -> &str {
        "local"
    }

    async fn search(&self, query: &str) -> Result<SearchOutcome> {
        let records = content::load_all(&self.config);
        let results = search_content(&records, query, self.config.search.max_results);
        let response = compose_response(&results);
        tracing::debug!(
            corpus = records.len(),
            results = results.len(),
            "local search complete"
        );
        Ok(SearchOutcome { results, response })
    }
}

/// Tries `primary` when it is available, answering from `fallback` when it
/// is not or when it fails.
pub struct FallbackProvider {
    primary: Arc<dyn SearchProvider>,
    fallback: Arc<dyn SearchProvider>,
}

impl FallbackProvider {
    pub fn new(primary: Arc<dyn SearchProvider>, fallback: Arc<dyn SearchProvider>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl SearchProvider for FallbackProvider {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn search(&self, query: &str) -> Result<SearchOutcome> {
        if self.primary.is_available() {
            match self.primary.search(query).await {
                Ok(outcome) => return Ok(outcome),
                Err(e) => {
                    tracing::warn!(
                        provider = self.primary.name(),
                        error = %e,
                        "search provider failed, falling back to {}",
                        self.fallback.name()
                    );
                }
            }
        }
        self.fallback.search(query).await
    }
}

/// Builds the provider chain for `config`: the delegate (when a `[delegate]`
/// section exists) backed by local keyword search, or local search alone.
pub fn build_provider(config: &Config) -> Arc<dyn SearchProvider> {
    let local: Arc<dyn SearchProvider> = Arc::new(LocalKeywordProvider::new(config.clone()));
    match &config.delegate {
        Some(delegate) => {
            let primary = Arc::new(DelegatedProvider::new(
                delegate.clone(),
                config.content.root.clone(),
            ));
            Arc::new(FallbackProvider::new(primary, local))
        }
        None => local,
    }
}
