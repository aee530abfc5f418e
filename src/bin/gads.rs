//! gads: developer CLI for the Google Ads MCP server
//!
//! ## Commands
//!
//! - **serve**: run the MCP server over stdio (what an MCP host launches)
//! - **call**: invoke one tool through the same dispatcher the server uses
//! - **tools**: list every published tool with its annotations
//! - **doctor**: check credentials, token exchange, API reachability and the log directory
//! - **host-config**: print or merge the `mcpServers` entry for an MCP host
//!
//! ## Example Usage
//!
//! ```bash
//! # List campaigns of one account as JSON
//! gads call google_ads_list_campaigns --input '{"customer_id": "1234567890", "response_format": "json"}'
//!
//! # Which tools only read?
//! gads tools --read-only
//!
//! # Register the server with a desktop MCP host
//! gads host-config --merge ~/.config/host/config.json
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod gads_cli;

use gads_cli::{
    call::CallCmd, doctor::DoctorCmd, host_config::HostConfigCmd, serve::ServeCmd,
    tools::ToolsCmd,
};

#[derive(Parser)]
#[command(
    name = "gads",
    author,
    version,
    about = "Google Ads tools for MCP hosts",
    long_about = "Runs and inspects the Google Ads MCP server.\n\n\
                  Credentials are read from GOOGLE_ADS_* environment variables or a .env file."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose diagnostics on stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the MCP server over stdin/stdout
    Serve(ServeCmd),

    /// Invoke a single tool and print its output
    Call(CallCmd),

    /// List the published tools
    Tools(ToolsCmd),

    /// Validate credentials and connectivity
    Doctor(DoctorCmd),

    /// Print or merge an MCP host configuration entry
    HostConfig(HostConfigCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let Cli {
        command,
        json,
        verbose,
    } = Cli::parse();

    gads_mcp::logging::init_stderr_tracing(if verbose { "debug" } else { "warn" });

    match command {
        Commands::Serve(cmd) => cmd.execute().await,
        Commands::Call(cmd) => cmd.execute(json).await,
        Commands::Tools(cmd) => cmd.execute(json),
        Commands::Doctor(cmd) => cmd.execute(json, verbose).await,
        Commands::HostConfig(cmd) => cmd.execute(),
    }
}
