//! Professional-profile analysis.
//!
//! Extraction is deliberately not built. Every processed registration
//! carries a `not_implemented` analysis with the integration plan below.

use leadscope_shared::LinkedInAnalysis;

const IMPLEMENTATION_PLAN: &str = r#"# Profile Extraction Plan

## Decision
Buy, don't build. Profile pages sit behind authentication walls and
aggressive bot detection, so an in-house scraper would be brittle and
expensive to keep alive. A dedicated profile-data API returns the same
fields as structured JSON.

## Candidate providers
| Provider | Shape | Notes |
|----------|-------|-------|
| Proxycurl | REST, profile URL in, JSON out | Per-profile credit pricing, structured experience/education/skills |
| ScrapFly + LLM structuring | Raw HTML behind anti-bot proxy, then an LLM pass | Flexible but more moving parts and lower reliability |
| PhantomBuster | Scheduled automation "phantoms" | Suited to bulk CRM sync, heavy for one profile at a time |

Recommended: Proxycurl.

## Integration
1. Add a `ProfileProvider` seam next to the crawl provider, with one
   call: profile URL → structured profile.
2. Implement it with an HTTP client authenticated by a bearer token read
   from an environment variable named in config.
3. Run it as a separate step of registration processing, in parallel
   with website analysis; its failure is recorded, never fatal.
4. Store the structured profile under `linkedin_analysis.profile` and
   set `status` to `completed` or `failed`.

## Data of interest
Name, headline, summary, current and past positions, education, skills,
location, follower/connection counts.

## Operational notes
- Cache responses by profile URL to avoid paying twice for the same person.
- Fall back to the website analysis alone when the provider is down.
- Keep per-request cost visible in logs so spend can be tracked.
"#;

/// The Markdown integration plan for profile extraction.
pub fn implementation_plan() -> &'static str {
    IMPLEMENTATION_PLAN
}

/// The analysis attached to every registration until extraction ships.
pub fn linkedin_analysis() -> LinkedInAnalysis {
    LinkedInAnalysis::not_implemented(IMPLEMENTATION_PLAN)
}
