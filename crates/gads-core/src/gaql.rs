//! Google Ads Query Language builder.
//!
//! ```
//! use gads_core::gaql::Query;
//!
//! let q = Query::select(&["campaign.id", "campaign.name"])
//!     .from("campaign")
//!     .filter("campaign.status = 'ENABLED'")
//!     .order_by("campaign.id DESC")
//!     .limit(20)
//!     .build();
//! assert_eq!(
//!     q,
//!     "SELECT campaign.id, campaign.name FROM campaign \
//!      WHERE campaign.status = 'ENABLED' ORDER BY campaign.id DESC LIMIT 20"
//! );
//! ```

#[derive(Debug, Clone, Default)]
pub struct Query {
    fields: Vec<String>,
    resource: String,
    conditions: Vec<String>,
    order_by: Vec<String>,
    limit: Option<i64>,
}

impl Query {
    pub fn select(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn from(mut self, resource: &str) -> Self {
        self.resource = resource.to_string();
        self
    }

    /// Add a condition; conditions are joined with `AND`.
    pub fn filter(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    /// Add a condition only when `value` is present.
    pub fn filter_opt<T, F>(self, value: Option<T>, condition: F) -> Self
    where
        F: FnOnce(T) -> String,
    {
        match value {
            Some(v) => self.filter(condition(v)),
            None => self,
        }
    }

    pub fn order_by(mut self, clause: impl Into<String>) -> Self {
        self.order_by.push(clause.into());
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn build(&self) -> String {
        let mut q = format!("SELECT {} FROM {}", self.fields.join(", "), self.resource);
        if !self.conditions.is_empty() {
            q.push_str(" WHERE ");
            q.push_str(&self.conditions.join(" AND "));
        }
        if !self.order_by.is_empty() {
            q.push_str(" ORDER BY ");
            q.push_str(&self.order_by.join(", "));
        }
        if let Some(limit) = self.limit {
            q.push_str(&format!(" LIMIT {}", limit));
        }
        q
    }
}

/// Quote a string literal for GAQL, escaping backslashes and single quotes.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// `('A', 'B')` for `IN` conditions.
pub fn quote_list<S: AsRef<str>>(values: &[S]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| quote(v.as_ref())).collect();
    format!("({})", quoted.join(", "))
}

/// `(1, 2, 3)` for numeric `IN` conditions; ids are validated as digits upstream.
pub fn id_list<S: AsRef<str>>(ids: &[S]) -> String {
    let joined: Vec<&str> = ids.iter().map(|v| v.as_ref()).collect();
    format!("({})", joined.join(", "))
}

/// `YYYYMMDD` -> `YYYY-MM-DD` as GAQL and the mutate API expect.
pub fn api_date(yyyymmdd: &str) -> String {
    if yyyymmdd.len() == 8 {
        format!("{}-{}-{}", &yyyymmdd[..4], &yyyymmdd[4..6], &yyyymmdd[6..])
    } else {
        yyyymmdd.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_opt() {
        let campaign: Option<&str> = None;
        let q = Query::select(&["ad_group.id"])
            .from("ad_group")
            .filter_opt(campaign, |c| format!("campaign.id = {}", c))
            .filter_opt(Some("ENABLED"), |s| format!("ad_group.status = '{}'", s))
            .build();
        assert_eq!(
            q,
            "SELECT ad_group.id FROM ad_group WHERE ad_group.status = 'ENABLED'"
        );
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("kid's shoes"), "'kid\\'s shoes'");
        assert_eq!(quote_list(&["A", "B"]), "('A', 'B')");
        assert_eq!(id_list(&["1".to_string(), "2".to_string()]), "(1, 2)");
    }

    #[test]
    fn test_api_date() {
        assert_eq!(api_date("20260315"), "2026-03-15");
    }
}
