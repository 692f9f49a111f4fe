//! The crawl-provider seam.

use std::future::Future;

use leadscope_shared::Result;

/// External service that can list a site's pages and return page content.
///
/// Implementations perform no retries: a failed call is final for that URL
/// within a batch.
pub trait CrawlProvider: Send + Sync {
    /// List up to `limit` URLs under `base_url`.
    ///
    /// Fails with [`LeadScopeError::Discovery`](leadscope_shared::LeadScopeError::Discovery)
    /// when no credential is configured or the provider call fails.
    fn discover(
        &self,
        base_url: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Fetch one page as Markdown.
    ///
    /// Fails with [`LeadScopeError::Fetch`](leadscope_shared::LeadScopeError::Fetch)
    /// when the provider returns no content or the call fails.
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}
