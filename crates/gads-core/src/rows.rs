//! Typed access to Google Ads result rows.
//!
//! REST rows use camelCase field names and encode int64 values as strings,
//! so `campaign.campaignBudget` and `metrics.costMicros: "1500000"` are read
//! through dotted paths here rather than deserialized into fixed structs.

use serde_json::Value;

pub fn get<'a>(row: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(row, |node, key| node.get(key))
}

pub fn str_at(row: &Value, path: &str) -> String {
    match get(row, path) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

pub fn opt_str_at(row: &Value, path: &str) -> Option<String> {
    Some(str_at(row, path)).filter(|s| !s.is_empty())
}

pub fn i64_at(row: &Value, path: &str) -> i64 {
    opt_i64_at(row, path).unwrap_or(0)
}

pub fn opt_i64_at(row: &Value, path: &str) -> Option<i64> {
    match get(row, path)? {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        _ => None,
    }
}

pub fn f64_at(row: &Value, path: &str) -> f64 {
    opt_f64_at(row, path).unwrap_or(0.0)
}

pub fn opt_f64_at(row: &Value, path: &str) -> Option<f64> {
    match get(row, path)? {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

pub fn bool_at(row: &Value, path: &str) -> bool {
    matches!(get(row, path), Some(Value::Bool(true)))
}

pub fn strings_at(row: &Value, path: &str) -> Vec<String> {
    get(row, path)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

/// `text` of every entry in an array of ad text assets (`[{"text": ...}]`).
pub fn texts_at(row: &Value, path: &str) -> Vec<String> {
    get(row, path)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.get("text").and_then(|t| t.as_str()).map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paths_and_int64_strings() {
        let row = json!({
            "campaign": {"id": "42", "name": "Summer Sale", "status": "PAUSED"},
            "metrics": {"costMicros": "1500000", "ctr": 0.05, "clicks": 12},
            "adGroupAd": {"ad": {"finalUrls": ["https://a.example"],
                "responsiveSearchAd": {"headlines": [{"text": "H1"}, {"text": "H2"}]}}}
        });
        assert_eq!(str_at(&row, "campaign.name"), "Summer Sale");
        assert_eq!(i64_at(&row, "campaign.id"), 42);
        assert_eq!(i64_at(&row, "metrics.costMicros"), 1_500_000);
        assert_eq!(i64_at(&row, "metrics.clicks"), 12);
        assert_eq!(f64_at(&row, "metrics.ctr"), 0.05);
        assert_eq!(i64_at(&row, "metrics.impressions"), 0);
        assert_eq!(opt_str_at(&row, "campaign.missing"), None);
        assert_eq!(strings_at(&row, "adGroupAd.ad.finalUrls"), vec!["https://a.example"]);
        assert_eq!(
            texts_at(&row, "adGroupAd.ad.responsiveSearchAd.headlines"),
            vec!["H1", "H2"]
        );
    }
}
