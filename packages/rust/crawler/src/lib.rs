//! Crawl-provider integration and multi-page fetching.
//!
//! This crate provides:
//! - [`CrawlProvider`]: the discovery + single-page fetch seam
//! - [`FirecrawlClient`]: the Firecrawl-backed provider
//! - [`ContentFetcher`]: sequential, rate-limited batch fetch with
//!   per-URL failure isolation

pub mod fetcher;
pub mod firecrawl;
pub mod provider;

pub use fetcher::{ContentFetcher, FetchProgress, NoProgress, truncate_content};
pub use firecrawl::FirecrawlClient;
pub use provider::CrawlProvider;
