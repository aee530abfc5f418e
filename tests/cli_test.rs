use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

const CREDENTIAL_VARS: [&str; 5] = [
    "GOOGLE_ADS_DEVELOPER_TOKEN",
    "GOOGLE_ADS_CLIENT_ID",
    "GOOGLE_ADS_CLIENT_SECRET",
    "GOOGLE_ADS_REFRESH_TOKEN",
    "GOOGLE_ADS_LOGIN_CUSTOMER_ID",
];

/// `gads` with no credentials, run from an empty directory (no `.env`) and
/// with its home in `home`.
fn gads(home: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("gads").unwrap();
    cmd.current_dir(home.path())
        .env("GADS_HOME", home.path())
        .env_remove("GADS_LOG_DISABLED");
    for var in CREDENTIAL_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_tools_lists_full_catalog() {
    let home = TempDir::new().unwrap();
    let output = gads(&home).args(["tools", "--json"]).output().unwrap();
    assert!(output.status.success());

    let tools: Value = serde_json::from_slice(&output.stdout).unwrap();
    let tools = tools.as_array().unwrap();
    assert_eq!(tools.len(), 41);
    assert!(tools
        .iter()
        .any(|t| t["name"] == "google_ads_create_pmax_campaign"));
}

#[test]
fn test_tools_read_only_filter() {
    let home = TempDir::new().unwrap();
    gads(&home)
        .args(["tools", "--read-only"])
        .assert()
        .success()
        .stdout(predicate::str::contains("google_ads_list_campaigns"))
        .stdout(predicate::str::contains("google_ads_remove_keywords").not());
}

#[test]
fn test_call_rejects_invalid_input_without_credentials() {
    let home = TempDir::new().unwrap();
    let output = gads(&home)
        .args([
            "call",
            "google_ads_list_campaigns",
            "--json",
            "--no-log",
            "--input",
            r#"{"customer_id": "123456789"}"#,
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let response: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["success"], false);
    assert_eq!(response["error_kind"], "validation");
    assert_eq!(response["error_details"]["field"], "customer_id");
}

#[test]
fn test_call_reports_missing_credentials() {
    let home = TempDir::new().unwrap();
    gads(&home)
        .args([
            "call",
            "google_ads_list_campaigns",
            "--no-log",
            "--input",
            r#"{"customer_id": "123-456-7890"}"#,
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("GOOGLE_ADS_DEVELOPER_TOKEN"))
        .stdout(predicate::str::contains("GOOGLE_ADS_REFRESH_TOKEN"));
}

#[test]
fn test_call_rejects_non_object_input() {
    let home = TempDir::new().unwrap();
    gads(&home)
        .args(["call", "google_ads_list_accounts", "--input", "[1, 2]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be a JSON object"));
}

#[test]
fn test_call_writes_tool_call_log_under_home() {
    let home = TempDir::new().unwrap();
    gads(&home)
        .args([
            "call",
            "google_ads_list_campaigns",
            "--input",
            r#"{"customer_id": "42", "_meta": {"reason": "cli test"}}"#,
        ])
        .assert()
        .failure();

    let log_dir = home.path().join("logs").join("mcp");
    let entries: Vec<_> = std::fs::read_dir(&log_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert_eq!(entries.len(), 1);
    let contents = std::fs::read_to_string(entries[0].path()).unwrap();
    assert!(contents.contains("\"reason\":\"cli test\""));
}

#[test]
fn test_doctor_offline_flags_missing_credentials() {
    let home = TempDir::new().unwrap();
    let output = gads(&home)
        .args(["doctor", "--offline", "--json"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    let checks = report["checks"].as_array().unwrap();
    let credentials = checks.iter().find(|c| c["name"] == "credentials").unwrap();
    assert_eq!(credentials["passed"], false);
    let log = checks.iter().find(|c| c["name"] == "tool-call log").unwrap();
    assert_eq!(log["passed"], true);
}

#[test]
fn test_doctor_offline_masks_developer_token() {
    let home = TempDir::new().unwrap();
    gads(&home)
        .args(["doctor", "--offline"])
        .env("GOOGLE_ADS_DEVELOPER_TOKEN", "dev-token-abcd1234")
        .env("GOOGLE_ADS_CLIENT_ID", "client.apps.googleusercontent.com")
        .env("GOOGLE_ADS_CLIENT_SECRET", "secret")
        .env("GOOGLE_ADS_REFRESH_TOKEN", "refresh")
        .assert()
        .success()
        .stdout(predicate::str::contains("****1234"))
        .stdout(predicate::str::contains("dev-token-abcd1234").not());
}

#[test]
fn test_host_config_prints_entry() {
    let home = TempDir::new().unwrap();
    let output = gads(&home)
        .args(["host-config", "--server-path", "/opt/gads/gads-mcp", "--with-env"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let config: Value = serde_json::from_slice(&output.stdout).unwrap();
    let entry = &config["mcpServers"]["google-ads"];
    assert_eq!(entry["command"], "/opt/gads/gads-mcp");
    assert!(entry["env"]["GOOGLE_ADS_REFRESH_TOKEN"].is_string());
}

#[test]
fn test_host_config_merge_keeps_other_servers() {
    let home = TempDir::new().unwrap();
    let config_path = home.path().join("host.json");
    std::fs::write(
        &config_path,
        r#"{"theme": "dark", "mcpServers": {"files": {"command": "files-mcp"}}}"#,
    )
    .unwrap();

    gads(&home)
        .args(["host-config", "--server-path", "gads-mcp", "--merge"])
        .arg(&config_path)
        .assert()
        .success();

    let merged: Value =
        serde_json::from_str(&std::fs::read_to_string(&config_path).unwrap()).unwrap();
    assert_eq!(merged["theme"], "dark");
    assert_eq!(merged["mcpServers"]["files"]["command"], "files-mcp");
    assert_eq!(merged["mcpServers"]["google-ads"]["command"], "gads-mcp");
}
