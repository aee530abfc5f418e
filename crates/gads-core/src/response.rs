//! Unified tool response types.
//!
//! Every tool call, whether it arrives over MCP or through `gads call`,
//! ends in a [`ToolResponse`]: the rendered output text, the structured
//! result behind it, and on failure a classified error.

use gads_types::ResponseFormat;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::format::{render_bounded, Report};

/// Unified response type for tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse {
    /// Whether the operation succeeded.
    pub success: bool,

    /// Rendered output (markdown or JSON text), already bounded in size.
    #[serde(default)]
    pub output: String,

    /// Structured result behind the output.
    pub result: Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<ResponseFormat>,

    /// Set when `output` was cut to the character limit.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,

    /// Output length in characters before truncation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_length: Option<usize>,

    /// Error message if the operation failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Error class (`validation`, `authorization`, `partial_batch`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,

    /// Additional error details (field, operation index, API codes, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<Value>,

    /// Non-fatal warnings generated during execution.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Execution duration in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl ToolResponse {
    /// Create a successful response with a result value.
    pub fn ok(result: Value) -> Self {
        Self {
            success: true,
            output: String::new(),
            result,
            format: None,
            truncated: false,
            original_length: None,
            error: None,
            error_kind: None,
            error_details: None,
            warnings: Vec::new(),
            duration_ms: None,
        }
    }

    /// Render a handler report in the requested format.
    pub fn from_report(report: Report, format: ResponseFormat) -> Self {
        let bounded = render_bounded(&report, format);
        let mut response = Self::ok(report.data);
        response.output = bounded.text;
        response.format = Some(format);
        if bounded.truncated {
            response.truncated = true;
            response.original_length = Some(bounded.original_len);
        }
        response.with_warnings(report.warnings)
    }

    /// Create an error response with a message.
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            output: message.clone(),
            result: Value::Null,
            format: None,
            truncated: false,
            original_length: None,
            error: Some(message),
            error_kind: None,
            error_details: None,
            warnings: Vec::new(),
            duration_ms: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.error_kind = Some(kind.into());
        self
    }

    /// Add error details to the response.
    pub fn with_details(mut self, details: Value) -> Self {
        self.error_details = Some(details);
        self
    }

    /// Add a warning to the response.
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Add multiple warnings to the response.
    pub fn with_warnings(mut self, warnings: impl IntoIterator<Item = String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    /// Set the execution duration.
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Convert the response to a JSON Value.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// The response without `output` and `result`: status, error, truncation
    /// and warnings. Small regardless of how much data the tool returned.
    pub fn envelope(&self) -> Value {
        let mut value = self.to_json();
        if let Value::Object(map) = &mut value {
            map.remove("output");
            map.remove("result");
        }
        value
    }
}

/// Metadata that can be attached to tool invocations under `_meta`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolMeta {
    /// Reason for the tool invocation (for logging/debugging).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Unique request ID for tracing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    /// Tags for categorization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl ToolMeta {
    /// Split `_meta` off a tool input, returning the metadata and the remaining input.
    pub fn extract(input: &Value) -> (ToolMeta, Value) {
        let Value::Object(map) = input else {
            return (ToolMeta::default(), input.clone());
        };

        let mut meta = ToolMeta::default();
        if let Some(Value::Object(meta_map)) = map.get("_meta") {
            if let Some(Value::String(reason)) = meta_map.get("reason") {
                meta.reason = Some(reason.clone());
            }
            if let Some(Value::String(req)) = meta_map.get("request_id") {
                meta.request_id = Some(req.clone());
            }
            if let Some(Value::Array(tags)) = meta_map.get("tags") {
                let parsed: Vec<String> = tags
                    .iter()
                    .filter_map(|v| v.as_str().map(|s| s.to_string()))
                    .collect();
                if !parsed.is_empty() {
                    meta.tags = Some(parsed);
                }
            }
        }

        let mut cleaned = map.clone();
        cleaned.remove("_meta");
        (meta, Value::Object(cleaned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::CHARACTER_LIMIT;
    use serde_json::json;

    #[test]
    fn test_from_report_markdown() {
        let report = Report::new("# Campaigns\n", json!({"total": 0}));
        let response = ToolResponse::from_report(report, ResponseFormat::Markdown);
        assert!(response.success);
        assert_eq!(response.output, "# Campaigns\n");
        assert_eq!(response.result["total"], 0);
        assert!(!response.truncated);
    }

    #[test]
    fn test_from_report_truncates() {
        let report = Report::new("x".repeat(CHARACTER_LIMIT + 1), json!({}));
        let response = ToolResponse::from_report(report, ResponseFormat::Markdown);
        assert!(response.truncated);
        assert_eq!(response.original_length, Some(CHARACTER_LIMIT + 1));
    }

    #[test]
    fn test_error_response() {
        let response = ToolResponse::error("Something went wrong").with_kind("api");
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Something went wrong"));
        assert_eq!(response.output, "Something went wrong");
        assert_eq!(response.to_json()["error_kind"], "api");
    }

    #[test]
    fn test_envelope_drops_output_and_result() {
        let report = Report::new("y".repeat(CHARACTER_LIMIT * 2), json!({"rows": vec!["a"; 500]}));
        let response = ToolResponse::from_report(report, ResponseFormat::Markdown)
            .with_warning("partial data");
        let envelope = response.envelope();
        assert!(envelope.get("output").is_none());
        assert!(envelope.get("result").is_none());
        assert_eq!(envelope["truncated"], true);
        assert_eq!(envelope["original_length"], CHARACTER_LIMIT * 2);
        assert_eq!(envelope["warnings"][0], "partial data");
        assert!(envelope.to_string().len() < 500);
    }

    #[test]
    fn test_extract_meta() {
        let input = json!({
            "customer_id": "1234567890",
            "_meta": {"reason": "audit", "request_id": "r-1", "tags": ["a", 3, "b"]}
        });
        let (meta, cleaned) = ToolMeta::extract(&input);
        assert_eq!(meta.reason.as_deref(), Some("audit"));
        assert_eq!(meta.request_id.as_deref(), Some("r-1"));
        assert_eq!(meta.tags, Some(vec!["a".to_string(), "b".to_string()]));
        assert!(cleaned.get("_meta").is_none());
        assert_eq!(cleaned["customer_id"], "1234567890");
    }
}
