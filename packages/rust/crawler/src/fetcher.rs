//! Sequential, rate-limited multi-page fetch with per-URL isolation.
//!
//! Pages are fetched one at a time in selection order with a fixed pause
//! between requests. A failed page becomes a [`PageOutcome::Failed`] record
//! and the batch moves on; nothing a single page does can fail the batch.

use std::time::Duration;

use tracing::{info, instrument, warn};

use leadscope_shared::{AnalysisSettings, FetchOutcome, PageOutcome, TRUNCATION_MARKER};

use crate::provider::CrawlProvider;

/// Per-page progress hook for interactive callers.
pub trait FetchProgress: Send + Sync {
    /// Called after each page, successful or not.
    fn page_done(&self, url: &str, current: usize, total: usize, fetched: bool);
}

/// Progress hook that ignores everything.
pub struct NoProgress;

impl FetchProgress for NoProgress {
    fn page_done(&self, _url: &str, _current: usize, _total: usize, _fetched: bool) {}
}

/// Fetches a batch of pages through a [`CrawlProvider`].
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    request_delay: Duration,
    max_content_length: usize,
}

impl ContentFetcher {
    pub fn new(request_delay: Duration, max_content_length: usize) -> Self {
        Self {
            request_delay,
            max_content_length,
        }
    }

    pub fn from_settings(settings: &AnalysisSettings) -> Self {
        Self::new(settings.request_delay, settings.max_content_length)
    }

    /// Fetch every URL in order; exactly one outcome per URL.
    pub async fn fetch_all<P, S>(&self, provider: &P, urls: &[S]) -> FetchOutcome
    where
        P: CrawlProvider,
        S: AsRef<str> + Sync,
    {
        self.fetch_all_with_progress(provider, urls, &NoProgress).await
    }

    /// [`fetch_all`](Self::fetch_all), reporting each finished page.
    #[instrument(skip_all, fields(pages = urls.len()))]
    pub async fn fetch_all_with_progress<P, S>(
        &self,
        provider: &P,
        urls: &[S],
        progress: &dyn FetchProgress,
    ) -> FetchOutcome
    where
        P: CrawlProvider,
        S: AsRef<str> + Sync,
    {
        let total = urls.len();
        let mut outcome = FetchOutcome::new();

        for (i, url) in urls.iter().enumerate() {
            let url = url.as_ref();

            if i > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            let page = match provider.fetch_page(url).await {
                Ok(content) => {
                    let (content, truncated) = truncate_content(content, self.max_content_length);
                    info!(url, current = i + 1, total, truncated, "page fetched");
                    PageOutcome::Fetched { content, truncated }
                }
                Err(e) => {
                    warn!(url, current = i + 1, total, error = %e, "page fetch failed");
                    PageOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };

            progress.page_done(url, i + 1, total, page.is_fetched());
            outcome.push(url, page);
        }

        info!(
            fetched = outcome.fetched_count(),
            failed = outcome.failed_count(),
            "fetch batch complete"
        );

        outcome
    }
}

/// Cut `content` to `max_chars` characters, appending the truncation marker
/// when anything was removed.
pub fn truncate_content(mut content: String, max_chars: usize) -> (String, bool) {
    match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            content.truncate(byte_idx);
            content.push_str(TRUNCATION_MARKER);
            (content, true)
        }
        None => (content, false),
    }
}
