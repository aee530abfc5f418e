//! JSONL tool-call log.
//!
//! One line per call under `$GADS_HOME/logs/mcp/mcp-YYYYMMDD-HHMMSS.jsonl`.
//! A new file is started once the current one reaches `rotation_mb`.

use anyhow::{Context, Result};
use chrono::Utc;
use gads_types::env_utils::{env_bool, env_var_or};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::paths::default_paths;

pub const DISABLED_ENV: &str = "GADS_LOG_DISABLED";
pub const ROTATION_ENV: &str = "GADS_LOG_ROTATION_MB";

const REDACTED: &str = "***redacted***";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub enabled: bool,
    pub path: PathBuf,
    pub rotation_mb: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_paths().logs_dir(),
            rotation_mb: 50,
        }
    }
}

impl LogConfig {
    /// Defaults adjusted by `GADS_LOG_DISABLED` and `GADS_LOG_ROTATION_MB`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: !env_bool(DISABLED_ENV),
            rotation_mb: env_var_or(ROTATION_ENV, defaults.rotation_mb).max(1),
            ..defaults
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            enabled: true,
            path: path.into(),
            rotation_mb: 50,
        }
    }
}

#[derive(Debug)]
pub struct McpLogger {
    config: Mutex<LogConfig>,
    file: Mutex<Option<File>>,
    file_path: Mutex<Option<PathBuf>>,
}

impl McpLogger {
    pub fn new(config: LogConfig) -> Self {
        Self {
            config: Mutex::new(config),
            file: Mutex::new(None),
            file_path: Mutex::new(None),
        }
    }

    pub fn config(&self) -> LogConfig {
        self.config.lock().clone()
    }

    /// File currently being appended to, if any call has been logged yet.
    pub fn current_file(&self) -> Option<PathBuf> {
        self.file_path.lock().clone()
    }

    pub fn log_tool_call(&self, record: &LogRecord) -> Result<()> {
        let config = self.config.lock().clone();
        if !config.enabled {
            return Ok(());
        }

        ensure_dir(&config.path)?;
        self.rotate_if_needed(&config);

        let mut file_guard = self.file.lock();
        if file_guard.is_none() {
            let file_path = current_log_path(&config);
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&file_path)
                .with_context(|| format!("opening tool-call log {}", file_path.display()))?;
            *file_guard = Some(file);
            *self.file_path.lock() = Some(file_path);
        }

        if let Some(file) = file_guard.as_mut() {
            let line = serde_json::to_string(record)?;
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }

    fn rotate_if_needed(&self, config: &LogConfig) {
        let current = self.file_path.lock().clone();
        if let Some(path) = current {
            if let Ok(metadata) = fs::metadata(&path) {
                let size_mb = metadata.len() / (1024 * 1024);
                if size_mb >= config.rotation_mb {
                    *self.file.lock() = None;
                    *self.file_path.lock() = None;
                }
            }
        }
    }
}

fn current_log_path(config: &LogConfig) -> PathBuf {
    let ts = Utc::now().format("%Y%m%d-%H%M%S");
    config.path.join(format!("mcp-{}.jsonl", ts))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub ts: String,
    pub request_id: String,
    pub tool: String,
    pub input: Value,
    pub output: Value,
    pub duration_ms: u128,
    pub success: bool,
    pub error: Option<String>,
    pub error_kind: Option<String>,
    pub reason: Option<String>,
    pub tags: Option<Vec<String>>,
}

fn is_sensitive(key: &str) -> bool {
    let key = key.to_lowercase();
    ["key", "token", "secret", "password"]
        .iter()
        .any(|needle| key.contains(needle))
}

pub fn redact_sensitive(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let v = if is_sensitive(k) {
                        Value::String(REDACTED.to_string())
                    } else {
                        redact_sensitive(v)
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        Value::Array(arr) => Value::Array(arr.iter().map(redact_sensitive).collect()),
        _ => value.clone(),
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(())
}

/// Human-readable diagnostics on stderr; stdout carries the MCP stream.
///
/// `RUST_LOG` overrides `default_directive`. Safe to call more than once.
pub fn init_stderr_tracing(default_directive: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(tool: &str) -> LogRecord {
        LogRecord {
            ts: Utc::now().to_rfc3339(),
            request_id: "r-1".to_string(),
            tool: tool.to_string(),
            input: json!({"customer_id": "1234567890"}),
            output: json!({"success": true}),
            duration_ms: 3,
            success: true,
            error: None,
            error_kind: None,
            reason: Some("audit".to_string()),
            tags: None,
        }
    }

    #[test]
    fn test_redacts_nested_secrets() {
        let value = json!({
            "developer_token": "abc",
            "nested": {"client_secret": "s", "name": "ok"},
            "list": [{"api_key": "k"}]
        });
        let redacted = redact_sensitive(&value);
        assert_eq!(redacted["developer_token"], REDACTED);
        assert_eq!(redacted["nested"]["client_secret"], REDACTED);
        assert_eq!(redacted["nested"]["name"], "ok");
        assert_eq!(redacted["list"][0]["api_key"], REDACTED);
    }

    #[test]
    fn test_writes_one_line_per_call() {
        let dir = tempfile::tempdir().unwrap();
        let logger = McpLogger::new(LogConfig::at(dir.path()));
        logger.log_tool_call(&record("google_ads_list_accounts")).unwrap();
        logger.log_tool_call(&record("google_ads_list_campaigns")).unwrap();

        let path = logger.current_file().unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("mcp-") && name.ends_with(".jsonl"));

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed["tool"], "google_ads_list_campaigns");
        assert_eq!(parsed["reason"], "audit");
    }

    #[test]
    fn test_disabled_logger_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let logger = McpLogger::new(LogConfig {
            enabled: false,
            ..LogConfig::at(dir.path().join("logs"))
        });
        logger.log_tool_call(&record("google_ads_list_accounts")).unwrap();
        assert!(logger.current_file().is_none());
        assert!(!dir.path().join("logs").exists());
    }
}
