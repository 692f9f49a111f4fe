//! Application configuration for LeadScope.
//!
//! User config lives at `~/.leadscope/leadscope.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LeadScopeError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "leadscope.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".leadscope";

// ---------------------------------------------------------------------------
// Config structs (matching leadscope.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Firecrawl crawl-provider settings.
    #[serde(default)]
    pub firecrawl: FirecrawlConfig,

    /// Website analysis budgets and pattern overrides.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// HTTP intake server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory where analysis JSON files are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    "outputs".into()
}

/// `[firecrawl]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirecrawlConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// API root, overridable for self-hosted deployments.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FirecrawlConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_key_env() -> String {
    "FIRECRAWL_API_KEY".into()
}
fn default_base_url() -> String {
    "https://api.firecrawl.dev".into()
}
fn default_timeout_secs() -> u64 {
    60
}

/// `[analysis]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum number of pages fetched per website.
    #[serde(default = "default_max_urls")]
    pub max_urls_to_scrape: usize,

    /// Per-page content limit in characters.
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,

    /// Pause between consecutive page fetches.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// How many links to ask the provider for during discovery.
    #[serde(default = "default_discovery_limit")]
    pub discovery_limit: usize,

    /// Substrings appended to the built-in exclusion set.
    #[serde(default)]
    pub extra_exclude_patterns: Vec<String>,

    /// Substrings appended to the built-in valuable-content set.
    #[serde(default)]
    pub extra_valuable_patterns: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_urls_to_scrape: default_max_urls(),
            max_content_length: default_max_content_length(),
            request_delay_ms: default_request_delay_ms(),
            discovery_limit: default_discovery_limit(),
            extra_exclude_patterns: Vec::new(),
            extra_valuable_patterns: Vec::new(),
        }
    }
}

fn default_max_urls() -> usize {
    10
}
fn default_max_content_length() -> usize {
    50_000
}
fn default_request_delay_ms() -> u64 {
    1_000
}
fn default_discovery_limit() -> usize {
    100
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on registrations processed at the same time.
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_concurrent_jobs: default_max_concurrent_jobs(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8000
}
fn default_max_concurrent_jobs() -> usize {
    4
}

// ---------------------------------------------------------------------------
// Analysis settings (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime analysis budgets, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    /// Selection budget.
    pub max_urls_to_scrape: usize,
    /// Per-page truncation limit in characters.
    pub max_content_length: usize,
    /// Delay inserted before every fetch except the first.
    pub request_delay: Duration,
    /// Link limit passed to discovery.
    pub discovery_limit: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for AnalysisSettings {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            max_urls_to_scrape: config.max_urls_to_scrape,
            max_content_length: config.max_content_length,
            request_delay: Duration::from_millis(config.request_delay_ms),
            discovery_limit: config.discovery_limit,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.leadscope/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| LeadScopeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.leadscope/leadscope.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| LeadScopeError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        LeadScopeError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| LeadScopeError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| LeadScopeError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| LeadScopeError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the Firecrawl API key from the env var named in the config.
pub fn read_api_key(config: &FirecrawlConfig) -> Result<String> {
    let var_name = &config.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(LeadScopeError::config(format!(
            "Firecrawl API key not found. Set the {var_name} environment variable.\n\
             Get a key at https://firecrawl.dev"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("output_dir"));
        assert!(toml_str.contains("FIRECRAWL_API_KEY"));
        assert!(toml_str.contains("max_urls_to_scrape"));
    }

    #[test]
    fn defaults_match_documented_budgets() {
        let config = AppConfig::default();
        assert_eq!(config.analysis.max_urls_to_scrape, 10);
        assert_eq!(config.analysis.max_content_length, 50_000);
        assert_eq!(config.analysis.request_delay_ms, 1_000);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let toml_str = r#"
[analysis]
max_urls_to_scrape = 5
extra_exclude_patterns = ["careers/apply"]

[server]
port = 9100
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.analysis.max_urls_to_scrape, 5);
        assert_eq!(config.analysis.max_content_length, 50_000);
        assert_eq!(config.analysis.extra_exclude_patterns, vec!["careers/apply"]);
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.firecrawl.base_url, "https://api.firecrawl.dev");
    }

    #[test]
    fn analysis_settings_from_config() {
        let mut config = AnalysisConfig::default();
        config.request_delay_ms = 250;
        let settings = AnalysisSettings::from(&config);
        assert_eq!(settings.request_delay, Duration::from_millis(250));
        assert_eq!(settings.max_urls_to_scrape, 10);
        assert_eq!(settings.discovery_limit, 100);
    }

    #[test]
    fn load_config_from_file() {
        let dir = std::env::temp_dir().join(format!("ls-config-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[defaults]\noutput_dir = \"/tmp/leadscope\"\n").expect("write");

        let config = load_config_from(&path).expect("load");
        assert_eq!(config.defaults.output_dir, "/tmp/leadscope");

        std::fs::write(&path, "[defaults\n").expect("write");
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_api_key_is_reported() {
        let config = FirecrawlConfig {
            // Unique name so the test never sees a real key
            api_key_env: "LS_TEST_NONEXISTENT_KEY_12345".into(),
            ..FirecrawlConfig::default()
        };
        let err = read_api_key(&config).unwrap_err();
        assert!(err.to_string().contains("API key not found"));
    }
}
