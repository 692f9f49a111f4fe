//! Website analysis: discover → select → fetch → assemble.
//!
//! [`WebsiteAnalyzer::analyze`] never fails outward. A discovery failure is
//! recorded in [`WebsiteAnalysis::errors`] and the run ends early with empty
//! URL lists; per-page failures are recorded in the fetch outcome.

use tracing::{error, info, instrument};

use leadscope_crawler::{ContentFetcher, CrawlProvider, FetchProgress};
use leadscope_relevance::{RelevanceScorer, select_urls};
use leadscope_shared::{AnalysisConfig, AnalysisSettings, WebsiteAnalysis};

/// Progress callback for reporting analysis status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each page fetch attempt.
    fn page_fetched(&self, url: &str, current: usize, total: usize);
    /// Called once the analysis is assembled.
    fn done(&self, analysis: &WebsiteAnalysis);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_fetched(&self, _url: &str, _current: usize, _total: usize) {}
    fn done(&self, _analysis: &WebsiteAnalysis) {}
}

/// Runs website analyses against one crawl provider.
pub struct WebsiteAnalyzer<P> {
    provider: P,
    scorer: RelevanceScorer,
    fetcher: ContentFetcher,
    settings: AnalysisSettings,
}

impl<P: CrawlProvider> WebsiteAnalyzer<P> {
    pub fn new(provider: P, scorer: RelevanceScorer, settings: AnalysisSettings) -> Self {
        Self {
            provider,
            scorer,
            fetcher: ContentFetcher::from_settings(&settings),
            settings,
        }
    }

    /// Analyzer using budgets and pattern overrides from the `[analysis]` section.
    pub fn from_config(provider: P, config: &AnalysisConfig) -> Self {
        let scorer = RelevanceScorer::with_extra_patterns(
            &config.extra_exclude_patterns,
            &config.extra_valuable_patterns,
        );
        Self::new(provider, scorer, AnalysisSettings::from(config))
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Analyze one website.
    pub async fn analyze(&self, website_url: &str) -> WebsiteAnalysis {
        self.analyze_with_progress(website_url, &SilentProgress).await
    }

    /// [`analyze`](Self::analyze), reporting phases and pages to `progress`.
    #[instrument(skip_all, fields(url = %website_url))]
    pub async fn analyze_with_progress(
        &self,
        website_url: &str,
        progress: &dyn ProgressReporter,
    ) -> WebsiteAnalysis {
        let mut analysis = WebsiteAnalysis::default();

        info!("starting website analysis");

        // --- Discovery ---
        progress.phase("Discovering pages");
        let discovered = match self
            .provider
            .discover(website_url, self.settings.discovery_limit)
            .await
        {
            Ok(urls) => urls,
            Err(e) => {
                let message = format!("Error analyzing website {website_url}: {e}");
                error!(error = %e, "discovery failed");
                analysis.errors.push(message);
                progress.done(&analysis);
                return analysis;
            }
        };

        // --- Selection ---
        progress.phase("Selecting valuable pages");
        let selection = select_urls(
            &self.scorer,
            discovered.as_slice(),
            self.settings.max_urls_to_scrape,
        );
        info!(
            discovered = selection.considered,
            selected = selection.len(),
            "{}",
            selection.summary()
        );
        analysis.filtering_logic = Some(selection.summary());
        analysis.discovered_urls = discovered;

        // --- Fetch ---
        if !selection.is_empty() {
            progress.phase("Fetching pages");
            let pages = PageProgress { inner: progress };
            analysis.scraped_content = self
                .fetcher
                .fetch_all_with_progress(&self.provider, selection.urls.as_slice(), &pages)
                .await;
        }
        analysis.filtered_urls = selection.urls;

        info!(
            fetched = analysis.scraped_content.fetched_count(),
            failed = analysis.scraped_content.failed_count(),
            "website analysis complete"
        );
        progress.done(&analysis);

        analysis
    }
}

// ---------------------------------------------------------------------------
// Fetch progress adapter
// ---------------------------------------------------------------------------

/// Adapts a `ProgressReporter` to the fetcher's `FetchProgress` interface.
struct PageProgress<'a> {
    inner: &'a dyn ProgressReporter,
}

impl FetchProgress for PageProgress<'_> {
    fn page_done(&self, url: &str, current: usize, total: usize, _fetched: bool) {
        self.inner.page_fetched(url, current, total);
    }
}
