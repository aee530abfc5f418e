//! Customer ids, numeric resource ids and Google Ads resource names.
//!
//! Resource names follow the REST layout `customers/{customer_id}/{collection}/{id}`.
//! Composite ids (ad group ads, criteria, asset group assets) join their parts
//! with `~`, e.g. `customers/1234567890/adGroupCriteria/111~222`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of digits in a Google Ads customer id.
pub const CUSTOMER_ID_DIGITS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("must not be empty")]
    Empty,
    #[error("must contain only digits (got '{0}')")]
    NotDigits(String),
    #[error("must be exactly 10 digits after removing dashes (got {0} digits)")]
    WrongLength(usize),
}

/// A validated 10-digit customer id. Dashes in the input (`123-456-7890`) are stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CustomerId(String);

impl CustomerId {
    pub fn parse(raw: &str) -> Result<Self, IdError> {
        let digits: String = raw.trim().chars().filter(|c| *c != '-').collect();
        if digits.is_empty() {
            return Err(IdError::Empty);
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(IdError::NotDigits(raw.trim().to_string()));
        }
        if digits.len() != CUSTOMER_ID_DIGITS {
            return Err(IdError::WrongLength(digits.len()));
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display form used by the Google Ads UI: `123-456-7890`.
    pub fn dashed(&self) -> String {
        format!("{}-{}-{}", &self.0[..3], &self.0[3..6], &self.0[6..])
    }

    /// `customers/{id}`
    pub fn resource_name(&self) -> String {
        format!("customers/{}", self.0)
    }

    /// Resource name of an entity owned by this customer.
    pub fn child(&self, collection: &str, id: impl fmt::Display) -> String {
        format!("customers/{}/{}/{}", self.0, collection, id)
    }

    pub fn campaign(&self, campaign_id: impl fmt::Display) -> String {
        self.child("campaigns", campaign_id)
    }

    pub fn campaign_budget(&self, budget_id: impl fmt::Display) -> String {
        self.child("campaignBudgets", budget_id)
    }

    pub fn ad_group(&self, ad_group_id: impl fmt::Display) -> String {
        self.child("adGroups", ad_group_id)
    }

    pub fn ad_group_ad(&self, ad_group_id: &str, ad_id: &str) -> String {
        self.child("adGroupAds", format!("{}~{}", ad_group_id, ad_id))
    }

    pub fn ad_group_criterion(&self, ad_group_id: &str, criterion_id: &str) -> String {
        self.child("adGroupCriteria", format!("{}~{}", ad_group_id, criterion_id))
    }

    pub fn campaign_criterion(&self, campaign_id: &str, criterion_id: &str) -> String {
        self.child("campaignCriteria", format!("{}~{}", campaign_id, criterion_id))
    }

    pub fn asset(&self, asset_id: impl fmt::Display) -> String {
        self.child("assets", asset_id)
    }

    pub fn asset_group(&self, asset_group_id: impl fmt::Display) -> String {
        self.child("assetGroups", asset_group_id)
    }

    pub fn asset_group_asset(&self, composite: &str) -> String {
        self.child("assetGroupAssets", composite)
    }

    pub fn recommendation(&self, recommendation_id: &str) -> String {
        self.child("recommendations", recommendation_id)
    }
}

impl FromStr for CustomerId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CustomerId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CustomerId> for String {
    fn from(id: CustomerId) -> Self {
        id.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// True for a non-empty string made only of ASCII digits.
pub fn is_numeric_id(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// `geoTargetConstants/{id}`
pub fn geo_target_constant(location_id: &str) -> String {
    format!("geoTargetConstants/{}", location_id)
}

/// Final path segment of a resource name (`customers/1/campaigns/42` -> `42`).
pub fn last_segment(resource_name: &str) -> &str {
    resource_name.rsplit('/').next().unwrap_or(resource_name)
}

/// Last `~`-separated part of a composite resource name
/// (`customers/1/adGroupAds/7~99` -> `99`).
pub fn composite_tail(resource_name: &str) -> &str {
    let segment = last_segment(resource_name);
    segment.rsplit('~').next().unwrap_or(segment)
}

/// Hands out the negative ids that link resources created inside one mutate batch.
///
/// The first id is `-1`; every call moves one further from zero.
#[derive(Debug, Default)]
pub struct TempIdAllocator {
    issued: i64,
}

impl TempIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> i64 {
        self.issued += 1;
        -self.issued
    }

    pub fn issued(&self) -> usize {
        self.issued as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_id_strips_dashes() {
        let id = CustomerId::parse("123-456-7890").unwrap();
        assert_eq!(id.as_str(), "1234567890");
        assert_eq!(id.dashed(), "123-456-7890");
        assert_eq!(id.resource_name(), "customers/1234567890");
    }

    #[test]
    fn test_customer_id_rejects_nine_digits() {
        assert_eq!(
            CustomerId::parse("123456789").unwrap_err(),
            IdError::WrongLength(9)
        );
    }

    #[test]
    fn test_customer_id_rejects_letters() {
        assert!(matches!(
            CustomerId::parse("12345abcde"),
            Err(IdError::NotDigits(_))
        ));
        assert_eq!(CustomerId::parse(" - ").unwrap_err(), IdError::Empty);
    }

    #[test]
    fn test_customer_id_deserializes_through_parse() {
        let id: CustomerId = serde_json::from_str("\"111-222-3333\"").unwrap();
        assert_eq!(id.to_string(), "1112223333");
        assert!(serde_json::from_str::<CustomerId>("\"42\"").is_err());
    }

    #[test]
    fn test_resource_names() {
        let id = CustomerId::parse("1234567890").unwrap();
        assert_eq!(id.campaign(-2), "customers/1234567890/campaigns/-2");
        assert_eq!(
            id.ad_group_criterion("11", "22"),
            "customers/1234567890/adGroupCriteria/11~22"
        );
        assert_eq!(geo_target_constant("2840"), "geoTargetConstants/2840");
    }

    #[test]
    fn test_segments() {
        assert_eq!(last_segment("customers/1/campaigns/42"), "42");
        assert_eq!(composite_tail("customers/1/adGroupAds/7~99"), "99");
        assert_eq!(composite_tail("plain"), "plain");
    }

    #[test]
    fn test_temp_ids_count_down() {
        let mut ids = TempIdAllocator::new();
        assert_eq!(ids.next_id(), -1);
        assert_eq!(ids.next_id(), -2);
        assert_eq!(ids.next_id(), -3);
        assert_eq!(ids.issued(), 3);
    }

    #[test]
    fn test_is_numeric_id() {
        assert!(is_numeric_id("0123"));
        assert!(!is_numeric_id(""));
        assert!(!is_numeric_id("12a"));
    }
}
