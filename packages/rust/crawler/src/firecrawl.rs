//! Firecrawl HTTP API client.
//!
//! Discovery uses `POST /v1/map`, page content uses `POST /v1/scrape` with
//! the Markdown format. Authentication is a bearer token read from the env
//! var named in `[firecrawl] api_key_env`.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use url::Url;

use leadscope_shared::{FirecrawlConfig, LeadScopeError, Result, read_api_key};

use crate::provider::CrawlProvider;

/// User-Agent string for provider requests.
const USER_AGENT: &str = concat!("LeadScope/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct MapRequest<'a> {
    url: &'a str,
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct MapResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    links: Vec<MapLink>,
    #[serde(default)]
    error: Option<String>,
}

/// v1 returns bare strings, v2 returns objects; accept both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MapLink {
    Url(String),
    Entry { url: Option<String> },
}

impl MapLink {
    fn into_url(self) -> Option<String> {
        let url = match self {
            Self::Url(url) => url,
            Self::Entry { url } => url?,
        };
        let trimmed = url.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'static str; 1],
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<ScrapeData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScrapeData {
    #[serde(default)]
    markdown: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

// ---------------------------------------------------------------------------
// FirecrawlClient
// ---------------------------------------------------------------------------

/// [`CrawlProvider`] backed by the Firecrawl API.
#[derive(Debug, Clone)]
pub struct FirecrawlClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl FirecrawlClient {
    /// Build a client from config, reading the API key from the environment.
    ///
    /// A missing key is not an error here; every call will fail with a
    /// provider error instead, which the analysis records.
    pub fn from_config(config: &FirecrawlConfig) -> Result<Self> {
        let api_key = match read_api_key(config) {
            Ok(key) => Some(key),
            Err(e) => {
                warn!(error = %e, "Firecrawl API key missing; discovery and fetches will fail");
                None
            }
        };
        Self::new(&config.base_url, api_key, Duration::from_secs(config.timeout_secs))
    }

    /// Build a client against an explicit API root.
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| LeadScopeError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Whether an API key is available.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    #[instrument(skip_all, fields(base_url = %base_url, limit))]
    async fn map(&self, base_url: &str, limit: usize) -> Result<Vec<String>> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            LeadScopeError::Discovery("Firecrawl API key is required for URL discovery".into())
        })?;

        Url::parse(base_url)
            .map_err(|e| LeadScopeError::Discovery(format!("invalid URL '{base_url}': {e}")))?;

        let endpoint = format!("{}/v1/map", self.base_url);
        debug!(%endpoint, "requesting site map");

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(api_key)
            .json(&MapRequest {
                url: base_url,
                limit,
            })
            .send()
            .await
            .map_err(|e| LeadScopeError::Discovery(format!("{base_url}: {e}")))?;

        let response = check_status(response)
            .await
            .map_err(|reason| LeadScopeError::Discovery(format!("{base_url}: {reason}")))?;

        let body: MapResponse = response.json().await.map_err(|e| {
            LeadScopeError::Discovery(format!("{base_url}: unreadable map response: {e}"))
        })?;

        if !body.success {
            let reason = body.error.unwrap_or_else(|| "provider reported failure".into());
            return Err(LeadScopeError::Discovery(format!("{base_url}: {reason}")));
        }

        let urls: Vec<String> = body.links.into_iter().filter_map(MapLink::into_url).collect();

        if urls.is_empty() {
            warn!("no links discovered");
        } else {
            info!(count = urls.len(), "discovered urls");
        }

        Ok(urls)
    }

    #[instrument(skip_all, fields(url = %url))]
    async fn scrape(&self, url: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            LeadScopeError::fetch(url, "Firecrawl API key is required for content scraping")
        })?;

        let endpoint = format!("{}/v1/scrape", self.base_url);

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(api_key)
            .json(&ScrapeRequest {
                url,
                formats: ["markdown"],
            })
            .send()
            .await
            .map_err(|e| LeadScopeError::fetch(url, e.to_string()))?;

        let response = check_status(response)
            .await
            .map_err(|reason| LeadScopeError::fetch(url, reason))?;

        let body: ScrapeResponse = response
            .json()
            .await
            .map_err(|e| LeadScopeError::fetch(url, format!("unreadable scrape response: {e}")))?;

        if !body.success {
            let reason = body.error.unwrap_or_else(|| "provider reported failure".into());
            return Err(LeadScopeError::fetch(url, reason));
        }

        match body.data.and_then(|d| d.markdown) {
            Some(markdown) if !markdown.is_empty() => {
                debug!(chars = markdown.chars().count(), "page scraped");
                Ok(markdown)
            }
            _ => Err(LeadScopeError::fetch(url, "no content returned")),
        }
    }
}

impl CrawlProvider for FirecrawlClient {
    async fn discover(&self, base_url: &str, limit: usize) -> Result<Vec<String>> {
        self.map(base_url, limit).await
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.scrape(url).await
    }
}

/// Pass successful responses through; turn others into a readable reason.
async fn check_status(response: Response) -> std::result::Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.error)
        .map(|e| format!(": {e}"))
        .unwrap_or_default();

    Err(format!("HTTP {status}{detail}"))
}
