//! finquery Gateway Server Entry Point

use anyhow::Context;
use clap::Parser;
use finquery::cli::{Cli, Commands};
use finquery::config::{GatewayConfig, ServerConfig, VerifierConfig};
use finquery::{logging, server, AppState};
use tracing::info;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Logs(args)) => finquery::cli::logs::execute(&args.command).await,
        Some(Commands::Serve(args)) => {
            init_logging();
            run_server(ServerConfig::from_env().with_overrides(args.host, args.port)).await
        }
        None => {
            // No subcommand - default to serve
            init_logging();
            run_server(ServerConfig::from_env()).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging() {
    if let Err(e) = logging::init() {
        eprintln!("failed to initialize logging: {}", e);
    }
}

async fn run_server(server_config: ServerConfig) -> anyhow::Result<()> {
    let verifier_config =
        VerifierConfig::from_env().context("credential verifier is not configured")?;
    let config = GatewayConfig::from_env();

    info!(
        log_file = %config.log_file.display(),
        cors_origin = config.cors.client_url.as_deref().unwrap_or("*"),
        stock_api = config.stock_provider.base_url.is_some(),
        "Starting finquery gateway"
    );

    let state = AppState::from_config(config, &verifier_config)
        .context("failed to initialize gateway state")?;

    server::run(state, &server_config.bind_addr())
        .await
        .with_context(|| format!("server error on {}", server_config.bind_addr()))
}
