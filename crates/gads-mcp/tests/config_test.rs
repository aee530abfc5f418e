//! Credential handling when no API client has been injected.
//!
//! These tests must run serially since they modify the environment.

use std::env;
use std::sync::Mutex;

use gads_mcp::logging::LogConfig;
use gads_mcp::ToolDispatcher;
use gads_transport::credentials::REQUIRED_VARS;
use serde_json::json;

static TEST_LOCK: Mutex<()> = Mutex::new(());

fn clear_credentials() {
    for var in REQUIRED_VARS {
        env::remove_var(var);
    }
    env::remove_var("GOOGLE_ADS_LOGIN_CUSTOMER_ID");
}

#[tokio::test]
async fn test_missing_credentials_name_every_variable() {
    let _lock = TEST_LOCK.lock().unwrap();
    clear_credentials();

    let dispatcher = ToolDispatcher::with_log_config(LogConfig::disabled());
    let result = dispatcher
        .dispatch("google_ads_list_campaigns", json!({"customer_id": "1234567890"}))
        .await;

    assert!(!result.success);
    assert_eq!(result.error_kind.as_deref(), Some("config"));
    let variables = result.error_details.unwrap()["variables"].clone();
    for var in REQUIRED_VARS {
        assert!(
            variables.as_array().unwrap().iter().any(|v| v == var),
            "{} not reported",
            var
        );
    }
    assert!(result.error.unwrap().contains("GOOGLE_ADS_REFRESH_TOKEN"));
}

#[tokio::test]
async fn test_invalid_input_is_reported_before_credentials() {
    let _lock = TEST_LOCK.lock().unwrap();
    clear_credentials();

    let dispatcher = ToolDispatcher::with_log_config(LogConfig::disabled());
    let result = dispatcher
        .dispatch(
            "google_ads_add_keywords",
            json!({"customer_id": "1234567890", "ad_group_id": "55", "keywords": []}),
        )
        .await;

    assert_eq!(result.error_kind.as_deref(), Some("validation"));
}
