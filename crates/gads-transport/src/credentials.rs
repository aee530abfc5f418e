//! Credential and endpoint configuration read from the environment.
//!
//! Required:
//! - `GOOGLE_ADS_DEVELOPER_TOKEN`
//! - `GOOGLE_ADS_CLIENT_ID`
//! - `GOOGLE_ADS_CLIENT_SECRET`
//! - `GOOGLE_ADS_REFRESH_TOKEN`
//!
//! Optional:
//! - `GOOGLE_ADS_LOGIN_CUSTOMER_ID`: manager (MCC) account to act through
//! - `GOOGLE_ADS_ENDPOINT` (default `https://googleads.googleapis.com`)
//! - `GOOGLE_ADS_API_VERSION` (default `v19`)
//! - `GOOGLE_ADS_TOKEN_URI` (default `https://oauth2.googleapis.com/token`)
//! - `GADS_HTTP_TIMEOUT_SECS` (default 60), `GADS_HTTP_CONNECT_TIMEOUT_SECS` (default 10)
//!
//! Only presence and shape are checked here; whether the values are accepted
//! is decided by the API on first use.

use std::fmt;
use std::time::Duration;

use gads_types::env_utils::{env_nonempty, env_var_or};
use gads_types::CustomerId;

pub const ENV_DEVELOPER_TOKEN: &str = "GOOGLE_ADS_DEVELOPER_TOKEN";
pub const ENV_CLIENT_ID: &str = "GOOGLE_ADS_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "GOOGLE_ADS_CLIENT_SECRET";
pub const ENV_REFRESH_TOKEN: &str = "GOOGLE_ADS_REFRESH_TOKEN";
pub const ENV_LOGIN_CUSTOMER_ID: &str = "GOOGLE_ADS_LOGIN_CUSTOMER_ID";

pub const REQUIRED_VARS: [&str; 4] = [
    ENV_DEVELOPER_TOKEN,
    ENV_CLIENT_ID,
    ENV_CLIENT_SECRET,
    ENV_REFRESH_TOKEN,
];

pub const DEFAULT_ENDPOINT: &str = "https://googleads.googleapis.com";
pub const DEFAULT_API_VERSION: &str = "v19";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Missing or malformed credential variables. Lists every problem at once.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", describe(.missing, .invalid))]
pub struct ConfigError {
    pub missing: Vec<String>,
    pub invalid: Vec<(String, String)>,
}

impl ConfigError {
    /// Every variable named by this error.
    pub fn variables(&self) -> Vec<String> {
        self.missing
            .iter()
            .cloned()
            .chain(self.invalid.iter().map(|(name, _)| name.clone()))
            .collect()
    }
}

fn describe(missing: &[String], invalid: &[(String, String)]) -> String {
    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!(
            "Missing required environment variables: {}",
            missing.join(", ")
        ));
    }
    for (name, reason) in invalid {
        parts.push(format!("{} is invalid: {}", name, reason));
    }
    format!(
        "{}. Please configure credentials before using this tool.",
        parts.join("; ")
    )
}

/// Credentials for one Google Ads API identity.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub developer_token: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub login_customer_id: Option<CustomerId>,
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_nonempty)
    }

    /// Build credentials from any variable source (blank values count as missing).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut invalid = Vec::new();

        let mut required = |name: &str| -> String {
            match lookup(name).filter(|v| !v.trim().is_empty()) {
                Some(v) => v.trim().to_string(),
                None => {
                    missing.push(name.to_string());
                    String::new()
                }
            }
        };
        let developer_token = required(ENV_DEVELOPER_TOKEN);
        let client_id = required(ENV_CLIENT_ID);
        let client_secret = required(ENV_CLIENT_SECRET);
        let refresh_token = required(ENV_REFRESH_TOKEN);

        let login_customer_id = match lookup(ENV_LOGIN_CUSTOMER_ID).filter(|v| !v.trim().is_empty())
        {
            Some(raw) => match CustomerId::parse(&raw) {
                Ok(id) => Some(id),
                Err(e) => {
                    invalid.push((ENV_LOGIN_CUSTOMER_ID.to_string(), e.to_string()));
                    None
                }
            },
            None => None,
        };

        if !missing.is_empty() || !invalid.is_empty() {
            return Err(ConfigError { missing, invalid });
        }

        Ok(Self {
            developer_token,
            client_id,
            client_secret,
            refresh_token,
            login_customer_id,
        })
    }
}

/// Show only the last four characters of a secret.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("developer_token", &mask_secret(&self.developer_token))
            .field("client_id", &self.client_id)
            .field("client_secret", &mask_secret(&self.client_secret))
            .field("refresh_token", &mask_secret(&self.refresh_token))
            .field("login_customer_id", &self.login_customer_id)
            .finish()
    }
}

/// Endpoint, API version and HTTP timeouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub endpoint: String,
    pub api_version: String,
    pub token_uri: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl ApiConfig {
    const DEFAULT_TIMEOUT_SECS: u64 = 60;
    const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    pub fn from_env() -> Self {
        Self {
            endpoint: env_nonempty("GOOGLE_ADS_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            api_version: env_nonempty("GOOGLE_ADS_API_VERSION")
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            token_uri: env_nonempty("GOOGLE_ADS_TOKEN_URI")
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            timeout: Duration::from_secs(env_var_or(
                "GADS_HTTP_TIMEOUT_SECS",
                Self::DEFAULT_TIMEOUT_SECS,
            )),
            connect_timeout: Duration::from_secs(env_var_or(
                "GADS_HTTP_CONNECT_TIMEOUT_SECS",
                Self::DEFAULT_CONNECT_TIMEOUT_SECS,
            )),
        }
    }

    /// Point both the API and the token exchange at `base` (used against mock servers).
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            endpoint: base.to_string(),
            token_uri: format!("{}/token", base),
            ..Self::default()
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            token_uri: DEFAULT_TOKEN_URI.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(Self::DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_all_missing_are_named() {
        let err = Credentials::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err.missing.len(), 4);
        let msg = err.to_string();
        for var in REQUIRED_VARS {
            assert!(msg.contains(var), "{} not in {}", var, msg);
        }
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let err = Credentials::from_lookup(lookup_from(&[
            (ENV_DEVELOPER_TOKEN, "dev"),
            (ENV_CLIENT_ID, "  "),
            (ENV_CLIENT_SECRET, "secret"),
            (ENV_REFRESH_TOKEN, "refresh"),
        ]))
        .unwrap_err();
        assert_eq!(err.missing, vec![ENV_CLIENT_ID.to_string()]);
    }

    #[test]
    fn test_invalid_login_customer_id() {
        let err = Credentials::from_lookup(lookup_from(&[
            (ENV_DEVELOPER_TOKEN, "dev"),
            (ENV_CLIENT_ID, "id"),
            (ENV_CLIENT_SECRET, "secret"),
            (ENV_REFRESH_TOKEN, "refresh"),
            (ENV_LOGIN_CUSTOMER_ID, "12345"),
        ]))
        .unwrap_err();
        assert!(err.missing.is_empty());
        assert_eq!(err.variables(), vec![ENV_LOGIN_CUSTOMER_ID.to_string()]);
    }

    #[test]
    fn test_login_customer_id_dashes_accepted() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (ENV_DEVELOPER_TOKEN, "dev"),
            (ENV_CLIENT_ID, "id"),
            (ENV_CLIENT_SECRET, "secret"),
            (ENV_REFRESH_TOKEN, "refresh"),
            (ENV_LOGIN_CUSTOMER_ID, "999-888-7777"),
        ]))
        .unwrap();
        assert_eq!(
            creds.login_customer_id.map(|c| c.to_string()).as_deref(),
            Some("9998887777")
        );
    }

    #[test]
    fn test_debug_masks_secrets() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (ENV_DEVELOPER_TOKEN, "devtoken-abcd"),
            (ENV_CLIENT_ID, "client"),
            (ENV_CLIENT_SECRET, "supersecret-wxyz"),
            (ENV_REFRESH_TOKEN, "1//refresh-1234"),
        ]))
        .unwrap();
        let shown = format!("{:?}", creds);
        assert!(!shown.contains("supersecret"));
        assert!(shown.contains("****wxyz"));
        assert_eq!(mask_secret("abc"), "****");
    }

    #[test]
    fn test_with_base_url() {
        let cfg = ApiConfig::with_base_url("http://127.0.0.1:9999/");
        assert_eq!(cfg.endpoint, "http://127.0.0.1:9999");
        assert_eq!(cfg.token_uri, "http://127.0.0.1:9999/token");
        assert_eq!(cfg.api_version, DEFAULT_API_VERSION);
    }
}
