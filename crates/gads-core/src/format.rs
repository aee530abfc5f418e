//! Rendering handler results as markdown or JSON, and bounding their size.
//!
//! Truncation counts characters, not bytes, and may cut through the middle
//! of a table row. The appended notice states the original length.

use gads_types::money::group_thousands;
use gads_types::ResponseFormat;
use serde_json::Value;

/// Maximum rendered output, in characters, before truncation.
pub const CHARACTER_LIMIT: usize = 25_000;

/// What a tool handler produces: one markdown rendering and the structured
/// data behind it. The JSON rendering carries every field the markdown shows.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub markdown: String,
    pub data: Value,
    pub warnings: Vec<String>,
}

impl Report {
    pub fn new(markdown: impl Into<String>, data: Value) -> Self {
        Self {
            markdown: markdown.into(),
            data,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn render(&self, format: ResponseFormat) -> String {
        match format {
            ResponseFormat::Markdown => self.markdown.clone(),
            ResponseFormat::Json => {
                serde_json::to_string_pretty(&self.data).unwrap_or_else(|_| self.data.to_string())
            }
        }
    }
}

/// Output after the size check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bounded {
    pub text: String,
    pub truncated: bool,
    /// Character count before truncation.
    pub original_len: usize,
}

pub fn truncation_notice(original_len: usize, limit: usize) -> String {
    format!(
        "\n\n⚠️ **Response truncated** from {} to {} characters. \
         Use filters, pagination, or reduce date range to see more data.",
        group_thousands(original_len as i64),
        group_thousands(limit as i64)
    )
}

/// Cut `text` to `limit` characters and append the notice when it is longer.
pub fn truncate(text: String, limit: usize) -> Bounded {
    let original_len = text.chars().count();
    if original_len <= limit {
        return Bounded {
            text,
            truncated: false,
            original_len,
        };
    }
    let mut cut: String = text.chars().take(limit).collect();
    cut.push_str(&truncation_notice(original_len, limit));
    Bounded {
        text: cut,
        truncated: true,
        original_len,
    }
}

/// Render and bound in one step.
pub fn render_bounded(report: &Report, format: ResponseFormat) -> Bounded {
    truncate(report.render(format), CHARACTER_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_short_output_untouched() {
        let out = truncate("hello".to_string(), CHARACTER_LIMIT);
        assert!(!out.truncated);
        assert_eq!(out.text, "hello");
        assert_eq!(out.original_len, 5);
    }

    #[test]
    fn test_exact_limit_is_not_truncated() {
        let text = "x".repeat(CHARACTER_LIMIT);
        let out = truncate(text.clone(), CHARACTER_LIMIT);
        assert!(!out.truncated);
        assert_eq!(out.text, text);
    }

    #[test]
    fn test_truncated_length_is_limit_plus_notice() {
        let text = "a".repeat(30_000);
        let out = truncate(text, CHARACTER_LIMIT);
        let notice = truncation_notice(30_000, CHARACTER_LIMIT);
        assert!(out.truncated);
        assert_eq!(out.text.chars().count(), CHARACTER_LIMIT + notice.chars().count());
        assert!(out.text.ends_with(&notice));
        assert!(notice.contains("from 30,000 to 25,000 characters"));
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let text = "é".repeat(CHARACTER_LIMIT + 10);
        let out = truncate(text, CHARACTER_LIMIT);
        let body: String = out.text.chars().take(CHARACTER_LIMIT).collect();
        assert!(body.chars().all(|c| c == 'é'));
        assert_eq!(out.original_len, CHARACTER_LIMIT + 10);
    }

    #[test]
    fn test_report_renders_both_formats() {
        let report = Report::new("# Title", json!({"total": 0, "items": []}));
        assert_eq!(report.render(ResponseFormat::Markdown), "# Title");
        let parsed: Value =
            serde_json::from_str(&report.render(ResponseFormat::Json)).unwrap();
        assert_eq!(parsed["total"], 0);
    }
}
