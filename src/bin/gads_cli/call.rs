use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use std::path::PathBuf;

use gads_mcp::logging::LogConfig;
use gads_mcp::ToolDispatcher;

#[derive(Parser, Debug)]
pub struct CallCmd {
    /// Tool name (e.g., google_ads_list_campaigns)
    pub name: String,

    /// JSON input string
    #[arg(long)]
    pub input: Option<String>,

    /// JSON input file path ("-" for stdin)
    #[arg(long, conflicts_with = "input")]
    pub file: Option<PathBuf>,

    /// Pretty-print the full response (implies --json)
    #[arg(long)]
    pub pretty: bool,

    /// Skip the JSONL tool-call log
    #[arg(long)]
    pub no_log: bool,
}

impl CallCmd {
    pub async fn execute(&self, json_output: bool) -> Result<()> {
        let input = self.read_input()?;
        let config = if self.no_log {
            LogConfig::disabled()
        } else {
            LogConfig::from_env()
        };
        tracing::debug!(tool = %self.name, log_enabled = config.enabled, "dispatching");
        let dispatcher = ToolDispatcher::with_log_config(config);
        let response = dispatcher.dispatch(&self.name, input).await;

        if self.pretty {
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else if json_output {
            println!("{}", serde_json::to_string(&response)?);
        } else {
            println!("{}", response.output);
            for warning in &response.warnings {
                eprintln!("warning: {}", warning);
            }
        }

        if !response.success {
            tracing::debug!(error = ?response.error, details = ?response.error_details, "tool call failed");
            bail!(
                "{} failed ({})",
                self.name,
                response.error_kind.as_deref().unwrap_or("error")
            );
        }
        Ok(())
    }

    fn read_input(&self) -> Result<Value> {
        let json_str = if let Some(file) = &self.file {
            if file.as_os_str() == "-" {
                use std::io::Read;
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                std::fs::read_to_string(file)
                    .with_context(|| format!("Failed to read file: {}", file.display()))?
            }
        } else if let Some(input) = &self.input {
            input.clone()
        } else {
            "{}".to_string()
        };

        let value: Value = serde_json::from_str(&json_str).context("Tool input is not valid JSON")?;
        if !value.is_object() {
            bail!("Tool input must be a JSON object");
        }
        Ok(value)
    }
}
