//! Binary entry point for paperless-mcp.
//!
//! This binary provides the CLI interface for the Paperless-ngx MCP server.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print output in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use paperless_mcp::config::PaperlessConfig;
use paperless_mcp::mcp::{HttpMode, McpServer, Transport};
use paperless_mcp::paperless::PaperlessClient;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Paperless MCP - expose a Paperless-ngx archive to AI assistants.
#[derive(Parser)]
#[command(name = "paperless-mcp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server.
    Serve {
        /// Transport type: stdio or http.
        #[arg(short, long, env = "MCP_TRANSPORT", default_value = "stdio")]
        transport: String,

        /// Protocol mode for HTTP: stateless, duplex, or both.
        #[arg(short, long, env = "MCP_HTTP_MODE", default_value = "both")]
        mode: String,

        /// Port for HTTP transport.
        #[arg(short, long, env = "MCP_PORT", default_value = "3000")]
        port: u16,
    },

    /// Check connectivity and print repository statistics.
    Status,
}

/// Main entry point.
#[tokio::main]
async fn main() -> ExitCode {
    // Pick up a local .env before clap resolves env-backed arguments.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Missing credentials are startup-fatal: never run half-configured.
    let config = match PaperlessConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    let result = match cli.command {
        Commands::Serve {
            transport,
            mode,
            port,
        } => cmd_serve(&config, &transport, &mode, port).await,
        Commands::Status => cmd_status(&config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Initializes tracing output.
///
/// Logs go to stderr: stdout belongs to the stdio transport.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Serve command.
async fn cmd_serve(
    config: &PaperlessConfig,
    transport: &str,
    mode: &str,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let server = McpServer::new(config)?
        .with_transport(Transport::parse(transport))
        .with_http_mode(HttpMode::parse(mode))
        .with_port(port);

    server.start().await?;

    Ok(())
}

/// Status command.
async fn cmd_status(config: &PaperlessConfig) -> Result<(), Box<dyn std::error::Error>> {
    println!("Paperless MCP Status");
    println!("====================");
    println!();
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("Repository: {}", config.base_url);
    println!();

    let client = PaperlessClient::new(config)?;
    match client.get_statistics().await {
        Ok(statistics) => {
            println!("Connection: OK");
            println!(
                "{}",
                serde_json::to_string_pretty(&statistics)
                    .unwrap_or_else(|_| "Statistics unavailable".to_string())
            );
        },
        Err(e) => {
            eprintln!("Connection failed: {e}");
            return Err(e.into());
        },
    }

    Ok(())
}
