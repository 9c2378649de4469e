//! METS workspace CLI application
//!
//! Command-line interface for materializing and inspecting
//! METS-described document workspaces.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use mets_workspace::cli::{
    handle_clone, handle_download, handle_init, handle_inspect, Cli, Commands,
};
use mets_workspace::config::AppConfig;
use mets_workspace::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    init_logging(&cli);

    let config = AppConfig::load(cli.global.config.as_deref())?;
    info!("mets_workspace v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Clone(args) => handle_clone(args, &config, cli.global.quiet).await,
        Commands::Init(args) => handle_init(args, &config).await,
        Commands::Download(args) => handle_download(args, &config, cli.global.quiet).await,
        Commands::Inspect(args) => handle_inspect(args).await,
    }
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) {
    let log_level = cli.log_level();

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("mets_workspace={}", log_level).parse().unwrap());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .init();
}
