use anyhow::Result;
use clap::Parser;
use serde_json::json;

use gads_mcp::logging::LogConfig;
use gads_mcp::{GoogleAdsMcpServer, ToolDispatcher};

#[derive(Parser, Debug)]
pub struct ToolsCmd {
    /// Only tools that never modify the account
    #[arg(long)]
    pub read_only: bool,

    /// Include each tool's input schema (JSON output only)
    #[arg(long)]
    pub schema: bool,
}

fn flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "-",
    }
}

impl ToolsCmd {
    pub fn execute(&self, json_output: bool) -> Result<()> {
        let server = GoogleAdsMcpServer::new(ToolDispatcher::with_log_config(LogConfig::disabled()));
        let mut tools = server.tools();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        if self.read_only {
            tools.retain(|t| t.annotations.as_ref().and_then(|a| a.read_only_hint) == Some(true));
        }

        if json_output {
            let listed: Vec<_> = tools
                .iter()
                .map(|t| {
                    let mut entry = json!({
                        "name": t.name,
                        "description": t.description,
                        "annotations": t.annotations,
                    });
                    if self.schema {
                        entry["input_schema"] = json!(t.input_schema.as_ref());
                    }
                    entry
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listed)?);
            return Ok(());
        }

        println!("{} tools", tools.len());
        println!();
        println!(
            "{:<42} {:<10} {:<12} {:<11} {}",
            "NAME", "READ-ONLY", "DESTRUCTIVE", "IDEMPOTENT", "TITLE"
        );
        for tool in &tools {
            let hints = tool.annotations.as_ref();
            println!(
                "{:<42} {:<10} {:<12} {:<11} {}",
                tool.name,
                flag(hints.and_then(|a| a.read_only_hint)),
                flag(hints.and_then(|a| a.destructive_hint)),
                flag(hints.and_then(|a| a.idempotent_hint)),
                hints.and_then(|a| a.title.as_deref()).unwrap_or("")
            );
        }
        Ok(())
    }
}
