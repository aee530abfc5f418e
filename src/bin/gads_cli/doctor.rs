use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::Path;

use gads_mcp::logging::{ensure_dir, LogConfig};
use gads_transport::credentials::mask_secret;
use gads_transport::{AdsApi, ApiConfig, Credentials, GoogleAdsClient};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Validate credentials, token exchange and API reachability"
)]
pub struct DoctorCmd {
    /// Only check local configuration; make no network calls
    #[arg(long)]
    pub offline: bool,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    passed: bool,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    remediation: Option<String>,
}

impl DoctorCheck {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed: true,
            detail: detail.into(),
            remediation: None,
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>, remediation: impl Into<String>) -> Self {
        Self {
            name,
            passed: false,
            detail: detail.into(),
            remediation: Some(remediation.into()),
        }
    }
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    endpoint: String,
    api_version: String,
    log_dir: String,
    checks: Vec<DoctorCheck>,
    passed: usize,
    failed: usize,
}

fn print_report(report: &DoctorReport) {
    println!("gads doctor");
    println!("  Endpoint:    {}", report.endpoint);
    println!("  API version: {}", report.api_version);
    println!("  Log dir:     {}", report.log_dir);
    println!();

    for check in &report.checks {
        let status = if check.passed { "PASS" } else { "FAIL" };
        println!("[{}] {}: {}", status, check.name, check.detail);
        if let Some(remediation) = &check.remediation {
            println!("      fix: {}", remediation);
        }
    }

    println!();
    println!("Summary: {} passed, {} failed", report.passed, report.failed);
}

fn check_log_dir(config: &LogConfig) -> DoctorCheck {
    if !config.enabled {
        return DoctorCheck::pass("tool-call log", "disabled (GADS_LOG_DISABLED)");
    }
    match probe_writable(&config.path) {
        Ok(()) => DoctorCheck::pass("tool-call log", format!("{} is writable", config.path.display())),
        Err(e) => DoctorCheck::fail(
            "tool-call log",
            format!("{:#}", e),
            "Set GADS_HOME to a writable directory or GADS_LOG_DISABLED=1",
        ),
    }
}

fn probe_writable(dir: &Path) -> Result<()> {
    ensure_dir(dir)?;
    let probe = dir.join(".doctor-probe");
    std::fs::write(&probe, b"ok").with_context(|| format!("writing {}", probe.display()))?;
    std::fs::remove_file(&probe).ok();
    Ok(())
}

/// Token exchange and `listAccessibleCustomers`, both blocking.
fn network_checks(client: &GoogleAdsClient) -> Vec<DoctorCheck> {
    let mut checks = Vec::new();
    if let Err(e) = client.check_token() {
        checks.push(DoctorCheck::fail(
            "token exchange",
            e.to_string(),
            "Regenerate GOOGLE_ADS_REFRESH_TOKEN with the OAuth flow for this client ID",
        ));
        return checks;
    }
    checks.push(DoctorCheck::pass("token exchange", "refresh token accepted"));

    match client.list_accessible_customers() {
        Ok(customers) => checks.push(DoctorCheck::pass(
            "api access",
            format!("{} accessible account(s)", customers.len()),
        )),
        Err(e) => checks.push(DoctorCheck::fail(
            "api access",
            e.to_string(),
            "Verify GOOGLE_ADS_DEVELOPER_TOKEN is approved for this API version",
        )),
    }
    checks
}

impl DoctorCmd {
    pub async fn execute(&self, json_output: bool, verbose: bool) -> Result<()> {
        let api_config = ApiConfig::from_env();
        let log_config = LogConfig::from_env();
        let mut checks = Vec::new();

        let credentials = match Credentials::from_env() {
            Ok(credentials) => {
                let login = credentials
                    .login_customer_id
                    .as_ref()
                    .map(|id| format!(", login customer {}", id.dashed()))
                    .unwrap_or_default();
                checks.push(DoctorCheck::pass(
                    "credentials",
                    format!(
                        "developer token {}{}",
                        mask_secret(&credentials.developer_token),
                        login
                    ),
                ));
                if verbose {
                    eprintln!("{:?}", credentials);
                }
                Some(credentials)
            }
            Err(e) => {
                checks.push(DoctorCheck::fail(
                    "credentials",
                    e.to_string(),
                    format!("Set {} (a .env file works)", e.variables().join(", ")),
                ));
                None
            }
        };

        match (&credentials, self.offline) {
            (Some(credentials), false) => {
                match GoogleAdsClient::new(credentials.clone(), api_config.clone()) {
                    Ok(client) => {
                        let network = tokio::task::spawn_blocking(move || network_checks(&client))
                            .await
                            .context("network checks panicked")?;
                        checks.extend(network);
                    }
                    Err(e) => checks.push(DoctorCheck::fail(
                        "token exchange",
                        e.to_string(),
                        "Check GOOGLE_ADS_CLIENT_ID, GOOGLE_ADS_CLIENT_SECRET and GOOGLE_ADS_TOKEN_URI",
                    )),
                }
            }
            (None, false) => {
                checks.push(DoctorCheck::fail(
                    "token exchange",
                    "skipped: credentials incomplete",
                    "Fix the credentials check first",
                ));
            }
            (_, true) => {}
        }

        checks.push(check_log_dir(&log_config));

        let passed = checks.iter().filter(|c| c.passed).count();
        let report = DoctorReport {
            endpoint: api_config.endpoint,
            api_version: api_config.api_version,
            log_dir: log_config.path.display().to_string(),
            failed: checks.len() - passed,
            passed,
            checks,
        };

        if json_output {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }

        if report.failed > 0 {
            bail!("doctor found {} failing check(s)", report.failed);
        }
        Ok(())
    }
}
