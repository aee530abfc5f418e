use anyhow::Result;
use clap::Parser;

use gads_mcp::logging::LogConfig;
use gads_mcp::{serve_stdio, ToolDispatcher};

#[derive(Parser, Debug)]
pub struct ServeCmd {
    /// Do not write the JSONL tool-call log
    #[arg(long)]
    pub no_log: bool,
}

impl ServeCmd {
    pub async fn execute(&self) -> Result<()> {
        let config = if self.no_log {
            LogConfig::disabled()
        } else {
            LogConfig::from_env()
        };
        serve_stdio(ToolDispatcher::with_log_config(config)).await
    }
}
