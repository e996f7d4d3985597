//! CLI module for finquery
//!
//! Provides the command-line interface for the gateway server and the
//! question log.

pub mod logs;
pub mod serve;

use clap::{Parser, Subcommand};

/// finquery - credential-gated question and stock quote gateway
#[derive(Parser, Debug)]
#[command(name = "finquery")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    FINQUERY_HOST               Bind address (default: 0.0.0.0)
    FINQUERY_PORT               Listen port (default: 8001)
    FINQUERY_LOG_LEVEL          Log level (default: info)
    FINQUERY_LOG_DIR            Directory for rotating JSON log files
    FINQUERY_LOG_FILE           Question log file (default: logs/queries.log)
    FINQUERY_CLIENT_URL         Allowed CORS origin (default: any)
    FINQUERY_ENV                "development" exposes error details
    FINQUERY_OPENAI_API_KEY     Answer provider API key
    FINQUERY_OPENAI_MODEL       Answer model (default: gpt-4-0125-preview)
    FINQUERY_STOCK_BASE_URL     Stock history API base URL
    FINQUERY_VC_VERIFIER_URL    Remote credential verification service
    FINQUERY_VC_JWT_SECRET      HS256 secret for local VC-JWT verification
    FINQUERY_VC_PUBLIC_KEY_PEM  Public key PEM file for local VC-JWT verification
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the gateway server
    Serve(serve::ServeArgs),
    /// Inspect or clear the question log
    Logs(logs::LogsArgs),
}
