use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};

use gads_transport::credentials::{ENV_LOGIN_CUSTOMER_ID, REQUIRED_VARS};

const SERVER_BINARY: &str = "gads-mcp";

#[derive(Parser, Debug)]
pub struct HostConfigCmd {
    /// Name of the entry under `mcpServers`
    #[arg(long, default_value = "google-ads")]
    pub name: String,

    /// Server executable (default: gads-mcp next to this binary)
    #[arg(long)]
    pub server_path: Option<PathBuf>,

    /// Add placeholder GOOGLE_ADS_* variables to the entry's `env`
    #[arg(long)]
    pub with_env: bool,

    /// Merge the entry into this host config file instead of printing it
    #[arg(long)]
    pub merge: Option<PathBuf>,
}

fn default_server_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(SERVER_BINARY)))
        .unwrap_or_else(|| PathBuf::from(SERVER_BINARY))
}

impl HostConfigCmd {
    fn entry(&self) -> Value {
        let command = self.server_path.clone().unwrap_or_else(default_server_path);
        tracing::debug!(command = %command.display(), "host config entry");
        let mut entry = json!({
            "command": command.display().to_string(),
            "args": [],
        });
        if self.with_env {
            let env: Map<String, Value> = REQUIRED_VARS
                .iter()
                .chain(std::iter::once(&ENV_LOGIN_CUSTOMER_ID))
                .map(|var| (var.to_string(), json!(format!("<{}>", var.to_lowercase()))))
                .collect();
            entry["env"] = Value::Object(env);
        }
        entry
    }

    pub fn execute(&self) -> Result<()> {
        let entry = self.entry();
        match &self.merge {
            Some(path) => {
                merge_into(path, &self.name, entry)?;
                println!("Added mcpServers.{} to {}", self.name, path.display());
            }
            None => {
                let mut servers = Map::new();
                servers.insert(self.name.clone(), entry);
                let config = json!({ "mcpServers": servers });
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
        Ok(())
    }
}

/// Insert or replace one server entry, keeping everything else in the file.
fn merge_into(path: &Path, name: &str, entry: Value) -> Result<()> {
    let mut config: Value = if path.exists() {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if text.trim().is_empty() {
            json!({})
        } else {
            serde_json::from_str(&text)
                .with_context(|| format!("{} is not valid JSON", path.display()))?
        }
    } else {
        json!({})
    };

    let Some(root) = config.as_object_mut() else {
        bail!("{} must contain a JSON object", path.display());
    };
    let servers = root
        .entry("mcpServers")
        .or_insert_with(|| Value::Object(Map::new()));
    let Some(servers) = servers.as_object_mut() else {
        bail!("mcpServers in {} is not an object", path.display());
    };
    servers.insert(name.to_string(), entry);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(&config)? + "\n")
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
