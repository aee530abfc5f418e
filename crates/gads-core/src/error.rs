//! Error taxonomy for tool calls.
//!
//! | Kind | Raised when |
//! |---|---|
//! | `config` | credential variables missing or malformed |
//! | `validation` | a parameter violates its constraint |
//! | `authentication` / `authorization` | the API rejects the credentials or the account |
//! | `rate_limited` | quota exhausted |
//! | `not_found` | unknown resource or customer |
//! | `partial_batch` | an atomic mutate batch was rejected |
//! | `api` / `transport` | any other API failure / network failure |
//!
//! None of these is retried and none ends the process: every variant becomes
//! an error [`ToolResponse`].

use gads_transport::{ApiError, ApiErrorKind, ConfigError};
use serde_json::{json, Value};

use crate::response::ToolResponse;
use crate::validate::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum AdsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("{}", render_api(.0))]
    Api(#[from] ApiError),
    /// A multi-operation mutate was rejected; nothing in it was applied.
    #[error("{}", render_partial(.total, .index, .operation, .source))]
    PartialBatch {
        total: usize,
        index: Option<usize>,
        operation: Option<String>,
        source: ApiError,
    },
    /// The API answered in a shape the handler could not use.
    #[error("Unexpected response from Google Ads API: {0}")]
    Unexpected(String),
}

impl AdsError {
    pub fn not_found(what: impl Into<String>) -> Self {
        AdsError::Api(ApiError::new(ApiErrorKind::NotFound, what))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AdsError::Config(_) => "config",
            AdsError::Validation(_) => "validation",
            AdsError::Api(e) => match e.kind {
                ApiErrorKind::Authentication => "authentication",
                ApiErrorKind::Authorization => "authorization",
                ApiErrorKind::RateLimited => "rate_limited",
                ApiErrorKind::NotFound => "not_found",
                ApiErrorKind::Api => "api",
                ApiErrorKind::Transport => "transport",
            },
            AdsError::PartialBatch { .. } => "partial_batch",
            AdsError::Unexpected(_) => "internal",
        }
    }

    pub fn details(&self) -> Value {
        match self {
            AdsError::Config(e) => json!({ "variables": e.variables() }),
            AdsError::Validation(e) => json!({ "field": e.field, "constraint": e.constraint }),
            AdsError::Api(e) => api_details(e),
            AdsError::PartialBatch {
                total,
                index,
                operation,
                source,
            } => {
                let mut details = api_details(source);
                details["operations_submitted"] = json!(total);
                details["operations_applied"] = json!(0);
                details["failed_operation_index"] = json!(index);
                details["failed_operation"] = json!(operation);
                details
            }
            AdsError::Unexpected(_) => Value::Null,
        }
    }

    pub fn to_response(&self) -> ToolResponse {
        let response = ToolResponse::error(self.to_string()).with_kind(self.kind());
        match self.details() {
            Value::Null => response,
            details => response.with_details(details),
        }
    }
}

fn api_details(e: &ApiError) -> Value {
    json!({
        "http_status": e.http_status,
        "status": e.status,
        "codes": e.codes(),
        "messages": e.messages(),
        "request_id": e.request_id,
        "retry_delay": e.retry_delay,
        "errors": e.details,
    })
}

fn bullet_list(messages: &[String]) -> String {
    messages
        .iter()
        .map(|m| format!("- {}", m))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_api(e: &ApiError) -> String {
    match e.kind {
        ApiErrorKind::Authentication => format!(
            "Authentication failed: {}\nPlease verify:\n\
             - GOOGLE_ADS_DEVELOPER_TOKEN is valid\n\
             - GOOGLE_ADS_CLIENT_ID and GOOGLE_ADS_CLIENT_SECRET are correct\n\
             - GOOGLE_ADS_REFRESH_TOKEN is current (run the OAuth flow again if it was revoked)",
            e.message
        ),
        ApiErrorKind::Authorization => format!(
            "Authorization failed: {}\nYou don't have access to this customer account. \
             Verify the customer ID and your account permissions. If the account is \
             managed through a manager (MCC) account, set GOOGLE_ADS_LOGIN_CUSTOMER_ID \
             to the manager's 10-digit customer ID.",
            e.message
        ),
        ApiErrorKind::RateLimited => {
            let wait = match &e.retry_delay {
                Some(delay) => format!("Retry after {}. ", delay),
                None => "Wait a few moments before making more requests. ".to_string(),
            };
            format!(
                "API rate limit exceeded: {}. {}Batch changes into fewer calls where possible.",
                e.message, wait
            )
        }
        ApiErrorKind::NotFound => format!(
            "Resource not found: {}\nVerify the ID is correct and the resource exists.",
            e.message
        ),
        ApiErrorKind::Transport => format!("Could not reach the Google Ads API: {}", e.message),
        ApiErrorKind::Api => {
            let mut text = format!("Error from Google Ads API:\n{}", bullet_list(&e.messages()));
            if e.has_category("campaignBudgetError") {
                text.push_str(
                    "\nBudget configuration issue: ensure the budget is at least \
                     1,000,000 micros (1.00 in account currency).",
                );
            }
            text
        }
    }
}

fn render_partial(
    total: &usize,
    index: &Option<usize>,
    operation: &Option<String>,
    source: &ApiError,
) -> String {
    let which = match (index, operation) {
        (Some(i), Some(op)) => format!("Operation {} of {} ({}) failed:\n", i + 1, total, op),
        _ => format!(
            "One of {} operations failed (the API did not identify which):\n",
            total
        ),
    };
    format!(
        "Batch rejected: no resources were created. {}{}",
        which,
        bullet_list(&source.messages())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_suggests_login_customer_id() {
        let err = AdsError::from(ApiError::new(ApiErrorKind::Authorization, "denied"));
        assert_eq!(err.kind(), "authorization");
        assert!(err.to_string().contains("GOOGLE_ADS_LOGIN_CUSTOMER_ID"));
    }

    #[test]
    fn test_rate_limit_mentions_delay() {
        let mut api = ApiError::new(ApiErrorKind::RateLimited, "Too many requests");
        api.retry_delay = Some("30s".into());
        let err = AdsError::from(api);
        assert!(err.to_string().contains("Retry after 30s"));
    }

    #[test]
    fn test_config_lists_variables() {
        let err = AdsError::from(ConfigError {
            missing: vec!["GOOGLE_ADS_CLIENT_ID".into(), "GOOGLE_ADS_REFRESH_TOKEN".into()],
            invalid: vec![],
        });
        let response = err.to_response();
        assert_eq!(response.error_kind.as_deref(), Some("config"));
        assert!(response.output.contains("GOOGLE_ADS_CLIENT_ID, GOOGLE_ADS_REFRESH_TOKEN"));
        assert_eq!(
            response.error_details.unwrap()["variables"][1],
            "GOOGLE_ADS_REFRESH_TOKEN"
        );
    }

    #[test]
    fn test_partial_batch_message() {
        let err = AdsError::PartialBatch {
            total: 3,
            index: Some(2),
            operation: Some("asset group 'Main'".into()),
            source: ApiError::new(ApiErrorKind::Api, "Asset group name is required"),
        };
        let text = err.to_string();
        assert!(text.contains("no resources were created"));
        assert!(text.contains("Operation 3 of 3 (asset group 'Main')"));
        assert_eq!(err.details()["operations_applied"], 0);
    }

    #[test]
    fn test_wrapped_errors_keep_their_source() {
        use std::error::Error as _;

        let rejected = AdsError::PartialBatch {
            total: 2,
            index: Some(1),
            operation: None,
            source: ApiError::new(ApiErrorKind::Api, "Duplicate name"),
        };
        let source = rejected.source().expect("source");
        assert!(source.to_string().contains("Duplicate name"));

        let config: AdsError = ConfigError {
            missing: vec!["GOOGLE_ADS_CLIENT_ID".into()],
            invalid: vec![],
        }
        .into();
        assert!(config.to_string().starts_with("Configuration error: Missing required"));
        assert!(config.source().is_some());
    }

    #[test]
    fn test_budget_hint() {
        let mut api = ApiError::new(ApiErrorKind::Api, "Budget too low");
        api.details.push(gads_transport::ApiErrorDetail {
            code: Some("campaignBudgetError.NON_MULTIPLE_OF_MINIMUM_CURRENCY_UNIT".into()),
            message: "Budget too low".into(),
            operation_index: None,
            field_path: vec![],
        });
        assert!(AdsError::from(api).to_string().contains("1,000,000 micros"));
    }

    #[test]
    fn test_validation_response_names_field() {
        let err = AdsError::from(ValidationError::new("limit", "must be between 1 and 100 (got 0)"));
        let response = err.to_response();
        assert!(!response.success);
        assert_eq!(response.error_kind.as_deref(), Some("validation"));
        assert_eq!(response.error_details.unwrap()["field"], "limit");
    }
}
