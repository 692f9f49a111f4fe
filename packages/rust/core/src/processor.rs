//! Background processing of one registration event.
//!
//! Processing attaches the profile-analysis placeholder, runs a website
//! analysis when the registration carries a company website, and persists
//! the assembled [`AnalysisOutput`] through the [`OutputWriter`].

use std::path::PathBuf;

use tracing::{info, instrument};

use leadscope_crawler::CrawlProvider;
use leadscope_shared::{
    AnalysisOutput, LeadScopeError, REGISTRATION_EVENT, RegistrationEvent, Result,
    WebsiteAnalysis,
};

use crate::analysis::{ProgressReporter, SilentProgress, WebsiteAnalyzer};
use crate::linkedin::linkedin_analysis;
use crate::output::OutputWriter;

/// Result of a processed registration.
#[derive(Debug, Clone)]
pub struct ProcessedRegistration {
    pub output: AnalysisOutput,
    /// Where the JSON document was written.
    pub path: PathBuf,
}

/// Turns registration events into persisted analyses.
pub struct RegistrationProcessor<P> {
    analyzer: WebsiteAnalyzer<P>,
    writer: OutputWriter,
}

impl<P: CrawlProvider> RegistrationProcessor<P> {
    pub fn new(analyzer: WebsiteAnalyzer<P>, writer: OutputWriter) -> Self {
        Self { analyzer, writer }
    }

    pub fn analyzer(&self) -> &WebsiteAnalyzer<P> {
        &self.analyzer
    }

    /// Process one event end to end.
    pub async fn process(&self, event: RegistrationEvent) -> Result<ProcessedRegistration> {
        self.process_with_progress(event, &SilentProgress).await
    }

    /// [`process`](Self::process), reporting website-analysis progress.
    #[instrument(skip_all, fields(request_id = %event.request_id))]
    pub async fn process_with_progress(
        &self,
        event: RegistrationEvent,
        progress: &dyn ProgressReporter,
    ) -> Result<ProcessedRegistration> {
        if event.name != REGISTRATION_EVENT {
            return Err(LeadScopeError::validation(format!(
                "unsupported event '{}'",
                event.name
            )));
        }

        info!(contact = %event.input_data.display_name(), "processing registration");

        let website_analysis = match event.input_data.company_website.as_deref() {
            Some(website) => {
                self.analyzer
                    .analyze_with_progress(website, progress)
                    .await
            }
            None => {
                info!("no company website, skipping website analysis");
                WebsiteAnalysis::default()
            }
        };

        let output = AnalysisOutput {
            request_id: event.request_id,
            timestamp: event.timestamp,
            input_data: event.input_data,
            linkedin_analysis: linkedin_analysis(),
            website_analysis,
        };

        let path = self.writer.save(&output)?;
        info!(
            path = %path.display(),
            pages = output.website_analysis.scraped_content.len(),
            errors = output.website_analysis.errors.len(),
            "registration processed"
        );

        Ok(ProcessedRegistration { output, path })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use uuid::Uuid;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use leadscope_crawler::FirecrawlClient;
    use leadscope_relevance::RelevanceScorer;
    use leadscope_shared::{AnalysisSettings, RegisterRequest};

    use super::*;

    fn fixture(name: &str) -> String {
        let path = format!("../../../fixtures/firecrawl/{name}");
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("leadscope-processor-test-{}", Uuid::now_v7()))
    }

    fn settings() -> AnalysisSettings {
        AnalysisSettings {
            max_urls_to_scrape: 3,
            max_content_length: 50_000,
            request_delay: Duration::ZERO,
            discovery_limit: 100,
        }
    }

    fn processor(server_uri: &str, dir: &std::path::Path) -> RegistrationProcessor<FirecrawlClient> {
        let client = FirecrawlClient::new(
            server_uri,
            Some("fc-test".into()),
            Duration::from_secs(5),
        )
        .unwrap();
        let analyzer = WebsiteAnalyzer::new(client, RelevanceScorer::default(), settings());
        RegistrationProcessor::new(analyzer, OutputWriter::new(dir))
    }

    fn event(website: Option<&str>, linkedin: Option<&str>) -> RegistrationEvent {
        RegistrationEvent::new(RegisterRequest {
            first_name: "Sarah".into(),
            last_name: "Chen".into(),
            company_website: website.map(String::from),
            linkedin: linkedin.map(String::from),
        })
    }

    #[tokio::test]
    async fn website_registration_is_analyzed_and_saved() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/map"))
            .respond_with(ResponseTemplate::new(200).set_body_string(fixture("map.json")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/scrape"))
            .respond_with(ResponseTemplate::new(200).set_body_string(fixture("scrape.json")))
            .mount(&server)
            .await;

        let dir = temp_dir();
        let processed = processor(&server.uri(), &dir)
            .process(event(Some("https://www.acme.test"), None))
            .await
            .unwrap();

        let website = &processed.output.website_analysis;
        assert_eq!(website.discovered_urls.len(), 7);
        assert_eq!(website.filtered_urls.len(), 3);
        assert_eq!(website.filtered_urls[0], "https://www.acme.test/about");
        assert_eq!(website.scraped_content.len(), 3);
        assert_eq!(website.scraped_content.fetched_count(), 3);
        assert!(website.errors.is_empty());
        assert_eq!(processed.output.linkedin_analysis.status, "not_implemented");

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&processed.path).unwrap()).unwrap();
        assert_eq!(saved["request_id"], processed.output.request_id.to_string());
        assert_eq!(
            saved["website_analysis"]["scraped_content"][0]["status"],
            "fetched"
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn profile_only_registration_skips_website_analysis() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let dir = temp_dir();
        let processed = processor(&server.uri(), &dir)
            .process(event(None, Some("https://linkedin.com/in/sarahchen")))
            .await
            .unwrap();

        assert_eq!(processed.output.website_analysis, WebsiteAnalysis::default());
        assert!(processed.path.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn provider_outage_still_persists_output() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/map"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let dir = temp_dir();
        let processed = processor(&server.uri(), &dir)
            .process(event(Some("https://www.acme.test"), None))
            .await
            .unwrap();

        let website = &processed.output.website_analysis;
        assert_eq!(website.errors.len(), 1);
        assert!(website.discovered_urls.is_empty());
        assert!(processed.path.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn unknown_event_is_rejected() {
        let dir = temp_dir();
        let mut event = event(Some("https://www.acme.test"), None);
        event.name = "registration.deleted".into();

        let err = processor("http://127.0.0.1:9", &dir)
            .process(event)
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(!dir.exists());
    }
}
