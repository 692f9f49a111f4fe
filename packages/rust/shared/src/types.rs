//! Core domain types for LeadScope registrations and website analyses.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LeadScopeError, Result};

/// Event name under which registrations are handed to background processing.
pub const REGISTRATION_EVENT: &str = "registration.submitted";

/// Appended to page content that was cut at the configured length.
pub const TRUNCATION_MARKER: &str = "...[truncated]";

/// Prefix used when a failed page outcome is rendered as text.
const ERROR_PREFIX: &str = "Error: ";

const MAX_NAME_CHARS: usize = 100;
const MAX_URL_CHARS: usize = 500;

// ---------------------------------------------------------------------------
// RequestId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for registration identifiers (time-sortable).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub Uuid);

impl RequestId {
    /// Generate a new time-sortable request identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// RegisterRequest
// ---------------------------------------------------------------------------

/// A business-contact registration as submitted to `/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub company_website: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
}

impl RegisterRequest {
    /// Validate field lengths and presence, then normalise both URLs.
    ///
    /// Empty or whitespace-only URL fields are treated as absent; at least
    /// one of `company_website` / `linkedin` must remain.
    pub fn validated(self) -> Result<Self> {
        // Names are length-checked as submitted, whitespace included.
        check_length("first_name", &self.first_name, 1, MAX_NAME_CHARS)?;
        check_length("last_name", &self.last_name, 1, MAX_NAME_CHARS)?;

        let company_website = non_blank(self.company_website);
        let linkedin = non_blank(self.linkedin);

        if let Some(site) = &company_website {
            check_length("company_website", site, 1, MAX_URL_CHARS)?;
        }
        if let Some(profile) = &linkedin {
            check_length("linkedin", profile, 1, MAX_URL_CHARS)?;
        }

        if company_website.is_none() && linkedin.is_none() {
            return Err(LeadScopeError::validation(
                "At least one of company_website or linkedin must be provided",
            ));
        }

        Ok(Self {
            first_name: self.first_name,
            last_name: self.last_name,
            company_website: company_website.map(|s| normalize_website(&s)),
            linkedin: linkedin.map(|s| normalize_linkedin(&s)),
        })
    }

    /// "First Last", for log lines.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len < min {
        return Err(LeadScopeError::validation(format!("{field} must not be empty")));
    }
    if len > max {
        return Err(LeadScopeError::validation(format!(
            "{field} must be at most {max} characters (got {len})"
        )));
    }
    Ok(())
}

/// Prefix a bare domain with `https://`.
pub fn normalize_website(raw: &str) -> String {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    }
}

/// Turn a profile URL, bare profile domain, or handle into a full profile URL.
pub fn normalize_linkedin(raw: &str) -> String {
    if raw.starts_with("http") {
        raw.to_string()
    } else if raw.starts_with("linkedin.com") || raw.starts_with("www.linkedin.com") {
        format!("https://{raw}")
    } else {
        format!("https://linkedin.com/in/{raw}")
    }
}

// ---------------------------------------------------------------------------
// Fetch outcomes
// ---------------------------------------------------------------------------

/// Result of fetching one selected page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageOutcome {
    /// Page content (possibly cut to the configured limit).
    Fetched { content: String, truncated: bool },
    /// The provider could not produce content for this page.
    Failed { reason: String },
}

impl PageOutcome {
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Fetched content, if any.
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Fetched { content, .. } => Some(content),
            Self::Failed { .. } => None,
        }
    }
}

/// Renders fetched content as-is and failures as `Error: <reason>`.
impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetched { content, .. } => f.write_str(content),
            Self::Failed { reason } => write!(f, "{ERROR_PREFIX}{reason}"),
        }
    }
}

/// One URL and what happened when it was fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    #[serde(flatten)]
    pub outcome: PageOutcome,
}

/// Per-URL outcomes of a fetch batch, in fetch order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FetchOutcome {
    pages: Vec<PageRecord>,
}

impl FetchOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, url: impl Into<String>, outcome: PageOutcome) {
        self.pages.push(PageRecord {
            url: url.into(),
            outcome,
        });
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Outcome recorded for `url`, if it was part of the batch.
    pub fn get(&self, url: &str) -> Option<&PageOutcome> {
        self.pages.iter().find(|p| p.url == url).map(|p| &p.outcome)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageRecord> {
        self.pages.iter()
    }

    /// URLs covered by this outcome, in order.
    pub fn urls(&self) -> Vec<&str> {
        self.pages.iter().map(|p| p.url.as_str()).collect()
    }

    pub fn fetched_count(&self) -> usize {
        self.pages.iter().filter(|p| p.outcome.is_fetched()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.pages.iter().filter(|p| p.outcome.is_failed()).count()
    }
}

// ---------------------------------------------------------------------------
// Analyses
// ---------------------------------------------------------------------------

/// Everything learned from one company website.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebsiteAnalysis {
    /// URLs returned by discovery, as returned.
    #[serde(default)]
    pub discovered_urls: Vec<String>,
    /// URLs chosen for fetching, best first.
    #[serde(default)]
    pub filtered_urls: Vec<String>,
    /// Human-readable description of the selection decision; `null` when
    /// discovery failed.
    #[serde(default)]
    pub filtering_logic: Option<String>,
    /// Per-page fetch outcomes.
    #[serde(default)]
    pub scraped_content: FetchOutcome,
    /// Website-level failures (per-page failures live in `scraped_content`).
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Professional-profile analysis. Extraction is not built; only the plan ships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedInAnalysis {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_plan: Option<String>,
}

impl LinkedInAnalysis {
    /// Placeholder analysis carrying the integration plan.
    pub fn not_implemented(plan: impl Into<String>) -> Self {
        Self {
            status: "not_implemented".into(),
            implementation_plan: Some(plan.into()),
        }
    }
}

/// The JSON document written for every processed registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutput {
    pub request_id: RequestId,
    pub timestamp: DateTime<Utc>,
    pub input_data: RegisterRequest,
    pub linkedin_analysis: LinkedInAnalysis,
    pub website_analysis: WebsiteAnalysis,
}

// ---------------------------------------------------------------------------
// RegistrationEvent
// ---------------------------------------------------------------------------

/// Payload handed from intake to background processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationEvent {
    pub name: String,
    pub request_id: RequestId,
    pub timestamp: DateTime<Utc>,
    pub input_data: RegisterRequest,
}

impl RegistrationEvent {
    /// Stamp a validated request with a fresh id and the current time.
    pub fn new(input_data: RegisterRequest) -> Self {
        Self {
            name: REGISTRATION_EVENT.into(),
            request_id: RequestId::new(),
            timestamp: Utc::now(),
            input_data,
        }
    }
}
