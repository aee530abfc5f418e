//! Google Ads API failures.
//!
//! The REST API reports failures as
//!
//! ```json
//! {"error": {"code": 403, "status": "PERMISSION_DENIED", "message": "...",
//!   "details": [{"@type": "type.googleapis.com/google.ads.googleads.v19.errors.GoogleAdsFailure",
//!     "errors": [{"errorCode": {"authorizationError": "USER_PERMISSION_DENIED"},
//!                 "message": "...",
//!                 "location": {"fieldPathElements": [{"fieldName": "mutate_operations", "index": 1}]}}],
//!     "requestId": "..."}]}}
//! ```
//!
//! [`ApiError::from_http`] parses that envelope and classifies it by error
//! code category first and HTTP status second.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

static NULL: Value = Value::Null;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// Credentials rejected (bad developer token, revoked refresh token).
    Authentication,
    /// Credentials valid but not allowed to act on the customer.
    Authorization,
    /// Quota or rate limit exceeded.
    RateLimited,
    /// Unknown resource or customer id.
    NotFound,
    /// Any other API-reported failure.
    Api,
    /// The request never produced an API response.
    Transport,
}

/// One entry of a `GoogleAdsFailure`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiErrorDetail {
    /// `category.VALUE`, e.g. `authorizationError.USER_PERMISSION_DENIED`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
    /// Index into the mutate batch, when the error points at an operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_index: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_path: Vec<String>,
}

impl ApiErrorDetail {
    pub fn category(&self) -> Option<&str> {
        self.code.as_deref().and_then(|c| c.split('.').next())
    }

    pub fn value(&self) -> Option<&str> {
        self.code.as_deref().and_then(|c| c.split('.').nth(1))
    }
}

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    /// gRPC-style status string (`PERMISSION_DENIED`, `RESOURCE_EXHAUSTED`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ApiErrorDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Server-suggested wait before retrying, e.g. `"30s"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_delay: Option<String>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            http_status: None,
            status: None,
            message: message.into(),
            details: Vec::new(),
            request_id: None,
            retry_delay: None,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Transport, message)
    }

    /// A response arrived but could not be decoded.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Api, message)
    }

    /// Parse a non-2xx API response body.
    pub fn from_http(http_status: u16, body: &str) -> Self {
        let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
        let envelope = parsed.get("error").unwrap_or(&NULL);

        let status = envelope
            .get("status")
            .and_then(|s| s.as_str())
            .map(String::from);
        let mut message = envelope
            .get("message")
            .and_then(|m| m.as_str())
            .map(String::from)
            .unwrap_or_default();

        let mut details = Vec::new();
        let mut request_id = None;
        let mut retry_delay = None;
        for failure in envelope
            .get("details")
            .and_then(|d| d.as_array())
            .into_iter()
            .flatten()
        {
            if let Some(id) = failure.get("requestId").and_then(|r| r.as_str()) {
                request_id = Some(id.to_string());
            }
            for err in failure
                .get("errors")
                .and_then(|e| e.as_array())
                .into_iter()
                .flatten()
            {
                details.push(parse_detail(err));
                if let Some(delay) = err
                    .pointer("/details/quotaErrorDetails/retryDelay")
                    .and_then(|d| d.as_str())
                {
                    retry_delay = Some(delay.to_string());
                }
            }
        }

        if message.is_empty() {
            message = details
                .first()
                .map(|d| d.message.clone())
                .unwrap_or_else(|| format!("HTTP {} from Google Ads API", http_status));
        }

        let kind = classify(http_status, status.as_deref(), &details);
        Self {
            kind,
            http_status: Some(http_status),
            status,
            message,
            details,
            request_id,
            retry_delay,
        }
    }

    /// Index of the first batch operation the API blamed.
    pub fn failing_operation(&self) -> Option<usize> {
        self.details.iter().find_map(|d| d.operation_index)
    }

    /// True when any detail carries `category` (e.g. `campaignBudgetError`).
    pub fn has_category(&self, category: &str) -> bool {
        self.details.iter().any(|d| d.category() == Some(category))
    }

    /// Every detail message, falling back to the top-level message.
    pub fn messages(&self) -> Vec<String> {
        if self.details.is_empty() {
            return vec![self.message.clone()];
        }
        self.details.iter().map(|d| d.message.clone()).collect()
    }

    pub fn codes(&self) -> Vec<String> {
        self.details.iter().filter_map(|d| d.code.clone()).collect()
    }
}

fn parse_detail(err: &Value) -> ApiErrorDetail {
    let code = err
        .get("errorCode")
        .and_then(|c| c.as_object())
        .and_then(|obj| obj.iter().next())
        .map(|(category, value)| match value.as_str() {
            Some(v) => format!("{}.{}", category, v),
            None => category.clone(),
        });

    let elements: Vec<&Value> = err
        .pointer("/location/fieldPathElements")
        .and_then(|e| e.as_array())
        .map(|arr| arr.iter().collect())
        .unwrap_or_default();
    let operation_index = elements.iter().find_map(|el| {
        let name = el.get("fieldName").and_then(|n| n.as_str())?;
        if name == "mutate_operations" || name == "operations" {
            el.get("index").and_then(|i| i.as_u64()).map(|i| i as usize)
        } else {
            None
        }
    });
    let field_path = elements
        .iter()
        .filter_map(|el| {
            let name = el.get("fieldName").and_then(|n| n.as_str())?;
            Some(match el.get("index").and_then(|i| i.as_u64()) {
                Some(i) => format!("{}[{}]", name, i),
                None => name.to_string(),
            })
        })
        .collect();

    ApiErrorDetail {
        code,
        message: err
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or_default()
            .to_string(),
        operation_index,
        field_path,
    }
}

const NOT_FOUND_VALUES: [&str; 4] = [
    "INVALID_CUSTOMER_ID",
    "CUSTOMER_NOT_FOUND",
    "RESOURCE_NOT_FOUND",
    "NOT_FOUND",
];

fn classify(http_status: u16, status: Option<&str>, details: &[ApiErrorDetail]) -> ApiErrorKind {
    let has_category = |cat: &str| details.iter().any(|d| d.category() == Some(cat));
    let not_found = details
        .iter()
        .filter_map(|d| d.value())
        .any(|v| NOT_FOUND_VALUES.contains(&v));

    if not_found {
        return ApiErrorKind::NotFound;
    }
    if has_category("authenticationError") {
        return ApiErrorKind::Authentication;
    }
    if has_category("authorizationError") {
        return ApiErrorKind::Authorization;
    }
    if has_category("quotaError") {
        return ApiErrorKind::RateLimited;
    }
    match (http_status, status) {
        (401, _) | (_, Some("UNAUTHENTICATED")) => ApiErrorKind::Authentication,
        (403, _) | (_, Some("PERMISSION_DENIED")) => ApiErrorKind::Authorization,
        (429, _) | (_, Some("RESOURCE_EXHAUSTED")) => ApiErrorKind::RateLimited,
        (404, _) | (_, Some("NOT_FOUND")) => ApiErrorKind::NotFound,
        _ => ApiErrorKind::Api,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn failure(code: Value, status: &str, http: u16, location: Value) -> ApiError {
        let body = json!({
            "error": {
                "code": http,
                "status": status,
                "message": "Request contains an invalid argument.",
                "details": [{
                    "@type": "type.googleapis.com/google.ads.googleads.v19.errors.GoogleAdsFailure",
                    "errors": [{
                        "errorCode": code,
                        "message": "detail message",
                        "location": location
                    }],
                    "requestId": "req-123"
                }]
            }
        });
        ApiError::from_http(http, &body.to_string())
    }

    #[test]
    fn test_authorization_error() {
        let err = failure(
            json!({"authorizationError": "USER_PERMISSION_DENIED"}),
            "PERMISSION_DENIED",
            403,
            Value::Null,
        );
        assert_eq!(err.kind, ApiErrorKind::Authorization);
        assert_eq!(err.request_id.as_deref(), Some("req-123"));
        assert_eq!(
            err.codes(),
            vec!["authorizationError.USER_PERMISSION_DENIED".to_string()]
        );
    }

    #[test]
    fn test_not_found_beats_auth_category() {
        let err = failure(
            json!({"authenticationError": "CUSTOMER_NOT_FOUND"}),
            "UNAUTHENTICATED",
            401,
            Value::Null,
        );
        assert_eq!(err.kind, ApiErrorKind::NotFound);
    }

    #[test]
    fn test_quota_error_with_retry_delay() {
        let body = json!({
            "error": {
                "code": 429,
                "status": "RESOURCE_EXHAUSTED",
                "message": "Too many requests",
                "details": [{
                    "errors": [{
                        "errorCode": {"quotaError": "RESOURCE_EXHAUSTED"},
                        "message": "Too many requests.",
                        "details": {"quotaErrorDetails": {"retryDelay": "30s"}}
                    }]
                }]
            }
        });
        let err = ApiError::from_http(429, &body.to_string());
        assert_eq!(err.kind, ApiErrorKind::RateLimited);
        assert_eq!(err.retry_delay.as_deref(), Some("30s"));
    }

    #[test]
    fn test_failing_operation_index() {
        let err = failure(
            json!({"campaignError": "DUPLICATE_CAMPAIGN_NAME"}),
            "INVALID_ARGUMENT",
            400,
            json!({"fieldPathElements": [
                {"fieldName": "mutate_operations", "index": 1},
                {"fieldName": "campaign_operation"},
                {"fieldName": "create"},
                {"fieldName": "name"}
            ]}),
        );
        assert_eq!(err.kind, ApiErrorKind::Api);
        assert_eq!(err.failing_operation(), Some(1));
        assert_eq!(
            err.details[0].field_path,
            vec!["mutate_operations[1]", "campaign_operation", "create", "name"]
        );
        assert!(err.has_category("campaignError"));
    }

    #[test]
    fn test_status_fallback_without_body() {
        let err = ApiError::from_http(404, "not json");
        assert_eq!(err.kind, ApiErrorKind::NotFound);
        assert_eq!(err.message, "HTTP 404 from Google Ads API");
        assert_eq!(err.messages(), vec![err.message.clone()]);
    }
}
