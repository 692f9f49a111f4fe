//! LeadScope CLI: business-contact registration and website analysis.
//!
//! Runs the registration API, or analyzes a single website in the
//! foreground.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
