//! Shared types, error model, and configuration for LeadScope.
//!
//! This crate is the foundation depended on by all other LeadScope crates.
//! It provides:
//! - [`LeadScopeError`]: the unified error type
//! - Domain and wire types ([`RegisterRequest`], [`WebsiteAnalysis`],
//!   [`AnalysisOutput`], [`RequestId`])
//! - Configuration ([`AppConfig`], [`AnalysisConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AnalysisConfig, AnalysisSettings, AppConfig, DefaultsConfig, FirecrawlConfig, ServerConfig,
    config_dir, config_file_path, init_config, load_config, load_config_from, read_api_key,
};
pub use error::{LeadScopeError, Result};
pub use types::{
    AnalysisOutput, FetchOutcome, LinkedInAnalysis, PageOutcome, PageRecord, RegisterRequest,
    RegistrationEvent, RequestId, TRUNCATION_MARKER, WebsiteAnalysis, REGISTRATION_EVENT,
};
