//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use leadscope_api::AppState;
use leadscope_core::{
    LocalDispatcher, OutputWriter, ProgressReporter, RegistrationProcessor, WebsiteAnalyzer,
    implementation_plan,
};
use leadscope_crawler::FirecrawlClient;
use leadscope_shared::types::normalize_website;
use leadscope_shared::{
    AppConfig, RegisterRequest, RegistrationEvent, WebsiteAnalysis, init_config, load_config,
    load_config_from,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// LeadScope: enrich business-contact registrations with website analysis.
#[derive(Parser)]
#[command(
    name = "leadscope",
    version,
    about = "Accept business-contact registrations and analyze their company websites.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ~/.leadscope/leadscope.toml).
    #[arg(long, global = true, env = "LEADSCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the registration HTTP API.
    Serve {
        /// Bind address (overrides `[server].host`).
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides `[server].port`).
        #[arg(long)]
        port: Option<u16>,
    },

    /// Analyze one company website in the foreground.
    Analyze {
        /// Website URL or bare domain.
        url: String,

        /// Maximum pages to fetch (overrides `[analysis].max_urls_to_scrape`).
        #[arg(long)]
        max_urls: Option<usize>,

        /// Print the full analysis as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Process one registration synchronously and save its analysis.
    Register {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        /// Company website URL or bare domain.
        #[arg(long)]
        website: Option<String>,

        /// Profile URL or handle.
        #[arg(long)]
        linkedin: Option<String>,
    },

    /// Print the profile-extraction integration plan.
    Plan,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "leadscope=info",
        1 => "leadscope=debug,tower_http=debug",
        _ => "leadscope=trace,tower_http=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    match cli.command {
        Command::Serve { host, port } => {
            cmd_serve(load(config_path.as_ref())?, host, port).await
        }
        Command::Analyze {
            url,
            max_urls,
            json,
        } => cmd_analyze(load(config_path.as_ref())?, &url, max_urls, json).await,
        Command::Register {
            first_name,
            last_name,
            website,
            linkedin,
        } => {
            let request = RegisterRequest {
                first_name,
                last_name,
                company_website: website,
                linkedin,
            };
            cmd_register(load(config_path.as_ref())?, request).await
        }
        Command::Plan => {
            println!("{}", implementation_plan());
            Ok(())
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(load(config_path.as_ref())?),
        },
    }
}

fn load(path: Option<&PathBuf>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

fn build_processor(config: &AppConfig) -> Result<RegistrationProcessor<FirecrawlClient>> {
    let client = FirecrawlClient::from_config(&config.firecrawl)?;
    let analyzer = WebsiteAnalyzer::from_config(client, &config.analysis);
    let writer = OutputWriter::new(&config.defaults.output_dir);
    Ok(RegistrationProcessor::new(analyzer, writer))
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_serve(config: AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    let processor = build_processor(&config)?;
    let firecrawl_configured = processor.analyzer().provider().is_configured();
    let dispatcher = LocalDispatcher::new(processor, config.server.max_concurrent_jobs)?;
    let state = AppState::new(Arc::new(dispatcher), firecrawl_configured);

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .map_err(|e| eyre!("cannot bind {host}:{port}: {e}"))?;

    info!(
        output_dir = %config.defaults.output_dir,
        max_concurrent_jobs = config.server.max_concurrent_jobs,
        firecrawl_configured,
        "starting LeadScope API"
    );

    leadscope_api::serve(listener, state, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await?;

    Ok(())
}

async fn cmd_analyze(
    mut config: AppConfig,
    url: &str,
    max_urls: Option<usize>,
    json: bool,
) -> Result<()> {
    if let Some(n) = max_urls {
        config.analysis.max_urls_to_scrape = n;
    }

    let client = FirecrawlClient::from_config(&config.firecrawl)?;
    if !client.is_configured() {
        return Err(eyre!(
            "no Firecrawl API key: set {} in the environment",
            config.firecrawl.api_key_env
        ));
    }
    let analyzer = WebsiteAnalyzer::from_config(client, &config.analysis);

    let url = normalize_website(url.trim());
    info!(url = %url, "analyzing website");

    let reporter = CliProgress::new();
    let analysis = analyzer.analyze_with_progress(&url, &reporter).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_summary(&url, &analysis);
    }

    Ok(())
}

async fn cmd_register(config: AppConfig, request: RegisterRequest) -> Result<()> {
    let request = request.validated()?;
    let event = RegistrationEvent::new(request);
    let processor = build_processor(&config)?;

    info!(request_id = %event.request_id, "processing registration");

    let reporter = CliProgress::new();
    let processed = processor.process_with_progress(event, &reporter).await?;

    println!();
    println!("  Registration processed.");
    println!("  Request: {}", processed.output.request_id);
    println!(
        "  Pages:   {} fetched, {} failed",
        processed.output.website_analysis.scraped_content.fetched_count(),
        processed.output.website_analysis.scraped_content.failed_count()
    );
    println!("  Output:  {}", processed.path.display());
    println!();

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

fn print_summary(url: &str, analysis: &WebsiteAnalysis) {
    println!();
    println!("  Website:    {url}");
    println!("  Discovered: {}", analysis.discovered_urls.len());
    if let Some(logic) = &analysis.filtering_logic {
        println!("  Selection:  {logic}");
    }
    for record in analysis.scraped_content.iter() {
        let mark = if record.outcome.is_fetched() { "ok " } else { "err" };
        println!("    [{mark}] {}", record.url);
    }
    for error in &analysis.errors {
        println!("  Error:      {error}");
    }
    println!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn page_fetched(&self, url: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Fetching [{current}/{total}] {url}"));
    }

    fn done(&self, _analysis: &WebsiteAnalysis) {
        self.spinner.finish_and_clear();
    }
}
