//! Input structs for MCP tool handlers.
//!
//! Each struct is deserialized from the call's JSON arguments and checked
//! with its `#[validate]` rules before any request is built. Field doc
//! comments become the parameter descriptions in the published JSON schema.

use gads_core::validate::{
    check_customer_id, check_date, check_each_len, check_http_urls, check_numeric_id,
    check_numeric_ids, fail,
};
use gads_types::ids::is_numeric_id;
use gads_types::{
    AdvertisingChannelType, AssetFieldType, BiddingStrategyType, DatePreset, DayOfWeek,
    EntityStatus, GeoTargetType, KeywordMatchType, NegativeKeywordLevel, RecommendationType,
    ResponseFormat,
};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Common behavior of every tool input.
pub trait ToolInput: DeserializeOwned + Validate + Send + 'static {
    fn response_format(&self) -> ResponseFormat;
}

macro_rules! tool_inputs {
    ($($name:ident),+ $(,)?) => {
        $(
            impl ToolInput for $name {
                fn response_format(&self) -> ResponseFormat {
                    self.response_format
                }
            }
        )+
    };
}

// Character limits the API enforces on ad text.
pub const HEADLINE_MAX: usize = 30;
pub const LONG_HEADLINE_MAX: usize = 90;
pub const DESCRIPTION_MAX: usize = 90;
pub const SHORT_DESCRIPTION_MAX: usize = 60;
pub const KEYWORD_MAX: usize = 80;

fn default_limit_20() -> i64 {
    20
}

fn default_limit_25() -> i64 {
    25
}

fn default_limit_50() -> i64 {
    50
}

fn default_limit_100() -> i64 {
    100
}

fn default_one() -> i64 {
    1
}

fn default_true() -> bool {
    true
}

fn default_last_30_days() -> DatePreset {
    DatePreset::Last30Days
}

fn default_last_7_days() -> DatePreset {
    DatePreset::Last7Days
}

fn default_paused() -> EntityStatus {
    EntityStatus::Paused
}

fn default_manual_cpc() -> BiddingStrategyType {
    BiddingStrategyType::ManualCpc
}

fn default_maximize_conversions() -> BiddingStrategyType {
    BiddingStrategyType::MaximizeConversions
}

fn default_broad() -> KeywordMatchType {
    KeywordMatchType::Broad
}

fn default_phrase() -> KeywordMatchType {
    KeywordMatchType::Phrase
}

fn default_campaign_level() -> NegativeKeywordLevel {
    NegativeKeywordLevel::Campaign
}

fn default_inclusion() -> GeoTargetType {
    GeoTargetType::Inclusion
}

fn default_locale() -> String {
    "en".to_string()
}

fn check_headlines(values: &[String]) -> Result<(), validator::ValidationError> {
    check_each_len(values, HEADLINE_MAX, "headlines")
}

fn check_long_headlines(values: &[String]) -> Result<(), validator::ValidationError> {
    check_each_len(values, LONG_HEADLINE_MAX, "long_headlines")
}

fn check_descriptions(values: &[String]) -> Result<(), validator::ValidationError> {
    check_each_len(values, DESCRIPTION_MAX, "descriptions")
}

fn check_keywords(values: &[String]) -> Result<(), validator::ValidationError> {
    check_each_len(values, KEYWORD_MAX, "keywords")
}

fn check_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(fail("blank", "must not be blank"));
    }
    Ok(())
}

fn check_minute(value: i64) -> Result<(), validator::ValidationError> {
    if matches!(value, 0 | 15 | 30 | 45) {
        Ok(())
    } else {
        Err(fail(
            "minute",
            format!("must be 0, 15, 30 or 45 (got {})", value),
        ))
    }
}

fn check_country_code(value: &str) -> Result<(), validator::ValidationError> {
    if value.len() == 2 && value.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(fail(
            "country_code",
            format!("must be a two-letter country code (got '{}')", value),
        ))
    }
}

/// `customers/{cid}/recommendations/{id}` or a bare id.
fn check_recommendation_id(value: &str) -> Result<(), validator::ValidationError> {
    let value = value.trim();
    let ok = if value.contains('/') {
        value.starts_with("customers/") && value.contains("/recommendations/")
    } else {
        !value.is_empty()
    };
    if ok {
        Ok(())
    } else {
        Err(fail(
            "recommendation_id",
            format!("must be a recommendation ID or resource name (got '{}')", value),
        ))
    }
}

fn check_date_window(
    start: Option<&String>,
    end: Option<&String>,
) -> Result<(), validator::ValidationError> {
    if let (Some(start), Some(end)) = (start, end) {
        // YYYYMMDD compares correctly as text.
        if end < start {
            return Err(fail("end_date", "must not be before start_date"));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct ListAccountsInput {
    /// Maximum number of accounts to return (1-100)
    #[serde(default = "default_limit_25")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct GetAccountInfoInput {
    /// 10-digit customer ID (dashes allowed, e.g. '123-456-7890')
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

// ---------------------------------------------------------------------------
// Campaigns
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct ListCampaignsInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Filter by campaign status
    #[serde(default)]
    pub status_filter: Option<EntityStatus>,
    /// Maximum campaigns to return (1-100)
    #[serde(default = "default_limit_20")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,
    /// Pagination offset
    #[serde(default)]
    #[validate(range(min = 0))]
    pub offset: i64,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct GetCampaignInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Campaign ID
    #[validate(custom(function = "check_numeric_id"))]
    pub campaign_id: String,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct GetCampaignInsightsInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Campaign ID
    #[validate(custom(function = "check_numeric_id"))]
    pub campaign_id: String,
    /// Date range for metrics
    #[serde(default = "default_last_30_days")]
    pub date_range: DatePreset,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

fn check_create_campaign(input: &CreateCampaignInput) -> Result<(), validator::ValidationError> {
    check_date_window(input.start_date.as_ref(), input.end_date.as_ref())
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
#[validate(schema(function = "check_create_campaign"))]
pub struct CreateCampaignInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Campaign name
    #[validate(length(min = 1, max = 255), custom(function = "check_not_blank"))]
    pub campaign_name: String,
    /// Daily budget in micros (e.g. 10000000 = 10.00 in account currency; minimum 1000000)
    #[validate(range(min = 1_000_000))]
    pub budget_amount_micros: i64,
    /// Campaign type (SEARCH, DISPLAY, ...)
    pub advertising_channel_type: AdvertisingChannelType,
    /// Bidding strategy
    #[serde(default = "default_manual_cpc")]
    pub bidding_strategy: BiddingStrategyType,
    /// Target CPA in micros (TARGET_CPA / MAXIMIZE_CONVERSIONS)
    #[serde(default)]
    #[validate(range(min = 1))]
    pub target_cpa_micros: Option<i64>,
    /// Target ROAS as a ratio, e.g. 3.5 for 350% (TARGET_ROAS / MAXIMIZE_CONVERSION_VALUE)
    #[serde(default)]
    #[validate(range(min = 0.01, max = 1000.0))]
    pub target_roas: Option<f64>,
    /// Target Google Search
    #[serde(default = "default_true")]
    pub target_google_search: bool,
    /// Target Search Network partners
    #[serde(default)]
    pub target_search_network: bool,
    /// Target Display Network
    #[serde(default)]
    pub target_content_network: bool,
    /// Start date (YYYYMMDD)
    #[serde(default)]
    #[validate(custom(function = "check_date"))]
    pub start_date: Option<String>,
    /// End date (YYYYMMDD), not before start_date
    #[serde(default)]
    #[validate(custom(function = "check_date"))]
    pub end_date: Option<String>,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

fn check_pmax(input: &CreatePmaxCampaignInput) -> Result<(), validator::ValidationError> {
    if !matches!(
        input.bidding_strategy,
        BiddingStrategyType::MaximizeConversions | BiddingStrategyType::MaximizeConversionValue
    ) {
        return Err(fail(
            "bidding_strategy",
            format!(
                "must be MAXIMIZE_CONVERSIONS or MAXIMIZE_CONVERSION_VALUE for Performance Max (got {})",
                input.bidding_strategy
            ),
        ));
    }
    if !input
        .descriptions
        .iter()
        .any(|d| d.trim().chars().count() <= SHORT_DESCRIPTION_MAX)
    {
        return Err(fail(
            "descriptions",
            format!(
                "at least one description must be at most {} characters",
                SHORT_DESCRIPTION_MAX
            ),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
#[validate(schema(function = "check_pmax"))]
pub struct CreatePmaxCampaignInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Campaign name
    #[validate(length(min = 1, max = 255), custom(function = "check_not_blank"))]
    pub campaign_name: String,
    /// Daily budget in micros (minimum 1000000)
    #[validate(range(min = 1_000_000))]
    pub budget_amount_micros: i64,
    /// MAXIMIZE_CONVERSIONS or MAXIMIZE_CONVERSION_VALUE
    #[serde(default = "default_maximize_conversions")]
    pub bidding_strategy: BiddingStrategyType,
    /// Optional target CPA in micros (MAXIMIZE_CONVERSIONS)
    #[serde(default)]
    #[validate(range(min = 1))]
    pub target_cpa_micros: Option<i64>,
    /// Optional target ROAS ratio (MAXIMIZE_CONVERSION_VALUE)
    #[serde(default)]
    #[validate(range(min = 0.01, max = 1000.0))]
    pub target_roas: Option<f64>,
    /// Name of the asset group created with the campaign
    #[validate(length(min = 1, max = 255), custom(function = "check_not_blank"))]
    pub asset_group_name: String,
    /// Final URLs for the asset group (1-10)
    #[validate(length(min = 1, max = 10), custom(function = "check_http_urls"))]
    pub final_urls: Vec<String>,
    /// Headlines (3-15, max 30 characters each)
    #[validate(length(min = 3, max = 15), custom(function = "check_headlines"))]
    pub headlines: Vec<String>,
    /// Long headlines (1-5, max 90 characters each)
    #[validate(length(min = 1, max = 5), custom(function = "check_long_headlines"))]
    pub long_headlines: Vec<String>,
    /// Descriptions (2-5, max 90 characters each, at least one of 60 or fewer)
    #[validate(length(min = 2, max = 5), custom(function = "check_descriptions"))]
    pub descriptions: Vec<String>,
    /// Business name (max 25 characters)
    #[validate(length(min = 1, max = 25), custom(function = "check_not_blank"))]
    pub business_name: String,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct UpdateCampaignStatusInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Campaign ID
    #[validate(custom(function = "check_numeric_id"))]
    pub campaign_id: String,
    /// New campaign status
    pub status: EntityStatus,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

fn check_days(days: &[DayOfWeek]) -> Result<(), validator::ValidationError> {
    for (i, day) in days.iter().enumerate() {
        if days[..i].contains(day) {
            return Err(fail("days", format!("{} is listed more than once", day)));
        }
    }
    Ok(())
}

fn check_schedule(input: &SetCampaignScheduleInput) -> Result<(), validator::ValidationError> {
    if input.end_hour == 24 && input.end_minute != 0 {
        return Err(fail("end_minute", "must be 0 when end_hour is 24"));
    }
    let start = input.start_hour * 60 + input.start_minute;
    let end = input.end_hour * 60 + input.end_minute;
    if end <= start {
        return Err(fail(
            "end_hour",
            format!(
                "end time {:02}:{:02} must be after start time {:02}:{:02}",
                input.end_hour, input.end_minute, input.start_hour, input.start_minute
            ),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
#[validate(schema(function = "check_schedule"))]
pub struct SetCampaignScheduleInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Campaign ID
    #[validate(custom(function = "check_numeric_id"))]
    pub campaign_id: String,
    /// Days of week when ads should run (1-7, no repeats)
    #[validate(length(min = 1, max = 7), custom(function = "check_days"))]
    pub days: Vec<DayOfWeek>,
    /// Start hour (0-23)
    #[validate(range(min = 0, max = 23))]
    pub start_hour: i64,
    /// Start minute (0, 15, 30 or 45)
    #[serde(default)]
    #[validate(custom(function = "check_minute"))]
    pub start_minute: i64,
    /// End hour (0-24)
    #[validate(range(min = 0, max = 24))]
    pub end_hour: i64,
    /// End minute (0, 15, 30 or 45)
    #[serde(default)]
    #[validate(custom(function = "check_minute"))]
    pub end_minute: i64,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

// ---------------------------------------------------------------------------
// Performance reports
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct GetSearchTermsInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Filter by campaign ID (optional)
    #[serde(default)]
    #[validate(custom(function = "check_numeric_id"))]
    pub campaign_id: Option<String>,
    /// Filter by ad group ID (optional)
    #[serde(default)]
    #[validate(custom(function = "check_numeric_id"))]
    pub ad_group_id: Option<String>,
    /// Date range for data
    #[serde(default = "default_last_30_days")]
    pub date_range: DatePreset,
    /// Minimum impressions to include
    #[serde(default = "default_one")]
    #[validate(range(min = 1))]
    pub min_impressions: i64,
    /// Maximum search terms to return (1-500)
    #[serde(default = "default_limit_100")]
    #[validate(range(min = 1, max = 500))]
    pub limit: i64,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct GetAssetPerformanceInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Campaign ID (must be Performance Max)
    #[validate(custom(function = "check_numeric_id"))]
    pub campaign_id: String,
    /// Filter by asset group (optional)
    #[serde(default)]
    #[validate(custom(function = "check_numeric_id"))]
    pub asset_group_id: Option<String>,
    /// Date range for metrics
    #[serde(default = "default_last_30_days")]
    pub date_range: DatePreset,
    /// Filter by asset field type (HEADLINE, DESCRIPTION, MARKETING_IMAGE, ...)
    #[serde(default)]
    pub asset_type_filter: Option<AssetFieldType>,
    /// Minimum impressions to include
    #[serde(default)]
    #[validate(range(min = 0))]
    pub min_impressions: i64,
    /// Maximum assets to return (1-200)
    #[serde(default = "default_limit_50")]
    #[validate(range(min = 1, max = 200))]
    pub limit: i64,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

// ---------------------------------------------------------------------------
// Ad groups
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct ListAdGroupsInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Campaign ID
    #[validate(custom(function = "check_numeric_id"))]
    pub campaign_id: String,
    /// Filter by ad group status
    #[serde(default)]
    pub status_filter: Option<EntityStatus>,
    /// Maximum ad groups to return (1-100)
    #[serde(default = "default_limit_50")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct CreateAdGroupInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Campaign ID
    #[validate(custom(function = "check_numeric_id"))]
    pub campaign_id: String,
    /// Ad group name
    #[validate(length(min = 1, max = 255), custom(function = "check_not_blank"))]
    pub ad_group_name: String,
    /// CPC bid in micros (minimum 10000 = 0.01)
    #[serde(default)]
    #[validate(range(min = 10_000))]
    pub cpc_bid_micros: Option<i64>,
    /// Initial status (default: PAUSED)
    #[serde(default = "default_paused")]
    pub status: EntityStatus,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct UpdateAdGroupStatusInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Ad group ID
    #[validate(custom(function = "check_numeric_id"))]
    pub ad_group_id: String,
    /// New ad group status
    pub status: EntityStatus,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

// ---------------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct ListKeywordsInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Ad group ID
    #[validate(custom(function = "check_numeric_id"))]
    pub ad_group_id: String,
    /// Maximum keywords to return (1-500)
    #[serde(default = "default_limit_100")]
    #[validate(range(min = 1, max = 500))]
    pub limit: i64,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct AddKeywordsInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Ad group ID
    #[validate(custom(function = "check_numeric_id"))]
    pub ad_group_id: String,
    /// Keywords to add (1-50, max 80 characters each)
    #[validate(length(min = 1, max = 50), custom(function = "check_keywords"))]
    pub keywords: Vec<String>,
    /// Match type for all keywords
    #[serde(default = "default_broad")]
    pub match_type: KeywordMatchType,
    /// CPC bid override in micros (minimum 10000)
    #[serde(default)]
    #[validate(range(min = 10_000))]
    pub cpc_bid_micros: Option<i64>,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

fn check_remove_keywords(input: &RemoveKeywordsInput) -> Result<(), validator::ValidationError> {
    for id in &input.keyword_ids {
        let id = id.trim();
        match id.split_once('~') {
            Some((ad_group, criterion)) if is_numeric_id(ad_group) && is_numeric_id(criterion) => {}
            None if is_numeric_id(id) && input.ad_group_id.is_some() => {}
            None if is_numeric_id(id) => {
                return Err(fail(
                    "ad_group_id",
                    format!("is required when keyword ID '{}' has no ad group prefix", id),
                ))
            }
            _ => {
                return Err(fail(
                    "keyword_ids",
                    format!(
                        "every entry must be '<ad_group_id>~<criterion_id>' or a numeric criterion ID (got '{}')",
                        id
                    ),
                ))
            }
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
#[validate(schema(function = "check_remove_keywords"))]
pub struct RemoveKeywordsInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Keyword criteria to remove: '<ad_group_id>~<criterion_id>', or bare criterion IDs with ad_group_id
    #[validate(length(min = 1))]
    pub keyword_ids: Vec<String>,
    /// Ad group owning bare criterion IDs
    #[serde(default)]
    #[validate(custom(function = "check_numeric_id"))]
    pub ad_group_id: Option<String>,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

// ---------------------------------------------------------------------------
// Ads
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct ListAdsInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Ad group ID
    #[validate(custom(function = "check_numeric_id"))]
    pub ad_group_id: String,
    /// Filter by ad status
    #[serde(default)]
    pub status_filter: Option<EntityStatus>,
    /// Maximum ads to return (1-100)
    #[serde(default = "default_limit_50")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

fn check_rsa(input: &CreateResponsiveSearchAdInput) -> Result<(), validator::ValidationError> {
    if input.path2.is_some() && input.path1.is_none() {
        return Err(fail("path2", "requires path1"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
#[validate(schema(function = "check_rsa"))]
pub struct CreateResponsiveSearchAdInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Ad group ID
    #[validate(custom(function = "check_numeric_id"))]
    pub ad_group_id: String,
    /// Headlines (3-15, max 30 characters each)
    #[validate(length(min = 3, max = 15), custom(function = "check_headlines"))]
    pub headlines: Vec<String>,
    /// Descriptions (2-4, max 90 characters each)
    #[validate(length(min = 2, max = 4), custom(function = "check_descriptions"))]
    pub descriptions: Vec<String>,
    /// Final URLs where users land
    #[validate(length(min = 1), custom(function = "check_http_urls"))]
    pub final_urls: Vec<String>,
    /// Display path 1 (max 15 characters)
    #[serde(default)]
    #[validate(length(max = 15))]
    pub path1: Option<String>,
    /// Display path 2 (max 15 characters, requires path1)
    #[serde(default)]
    #[validate(length(max = 15))]
    pub path2: Option<String>,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct UpdateAdStatusInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Ad group ID
    #[validate(custom(function = "check_numeric_id"))]
    pub ad_group_id: String,
    /// Ad ID
    #[validate(custom(function = "check_numeric_id"))]
    pub ad_id: String,
    /// New ad status
    pub status: EntityStatus,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

// ---------------------------------------------------------------------------
// Performance Max assets
// ---------------------------------------------------------------------------

fn check_text_assets(input: &CreateTextAssetsInput) -> Result<(), validator::ValidationError> {
    let count = input.headlines.len()
        + input.descriptions.len()
        + input.long_headlines.len()
        + usize::from(input.business_name.is_some());
    if count == 0 {
        return Err(fail(
            "headlines",
            "provide at least one headline, description, long headline or business name",
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
#[validate(schema(function = "check_text_assets"))]
pub struct CreateTextAssetsInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Asset group ID
    #[validate(custom(function = "check_numeric_id"))]
    pub asset_group_id: String,
    /// Headlines to add (max 15, max 30 characters each)
    #[serde(default)]
    #[validate(length(max = 15), custom(function = "check_headlines"))]
    pub headlines: Vec<String>,
    /// Descriptions to add (max 5, max 90 characters each)
    #[serde(default)]
    #[validate(length(max = 5), custom(function = "check_descriptions"))]
    pub descriptions: Vec<String>,
    /// Long headlines to add (max 5, max 90 characters each)
    #[serde(default)]
    #[validate(length(max = 5), custom(function = "check_long_headlines"))]
    pub long_headlines: Vec<String>,
    /// Business name (max 25 characters)
    #[serde(default)]
    #[validate(length(min = 1, max = 25))]
    pub business_name: Option<String>,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

/// Full `assetGroupAssets` resource name or `<asset_group_id>~<asset_id>~<FIELD_TYPE>`.
pub fn check_asset_group_asset_ids(values: &[String]) -> Result<(), validator::ValidationError> {
    for value in values {
        let tail = value.trim().rsplit('/').next().unwrap_or_default();
        let parts: Vec<&str> = tail.split('~').collect();
        let well_formed = parts.len() == 3
            && is_numeric_id(parts[0])
            && is_numeric_id(parts[1])
            && AssetFieldType::ALL.iter().any(|f| f.as_str() == parts[2])
            && (!value.contains('/') || value.contains("/assetGroupAssets/"));
        if !well_formed {
            return Err(fail(
                "asset_group_asset_ids",
                format!(
                    "every entry must be 'customers/<cid>/assetGroupAssets/<asset_group_id>~<asset_id>~<FIELD_TYPE>' \
                     or '<asset_group_id>~<asset_id>~<FIELD_TYPE>' (got '{}')",
                    value
                ),
            ));
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct RemoveAssetFromGroupInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Asset group assets to unlink (resource names or '<asset_group_id>~<asset_id>~<FIELD_TYPE>')
    #[validate(length(min = 1), custom(function = "check_asset_group_asset_ids"))]
    pub asset_group_asset_ids: Vec<String>,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

fn check_asset_group_update(
    input: &UpdateAssetGroupAssetsInput,
) -> Result<(), validator::ValidationError> {
    if input.add_headlines.is_empty()
        && input.add_descriptions.is_empty()
        && input.remove_asset_group_asset_ids.is_empty()
    {
        return Err(fail(
            "add_headlines",
            "provide at least one of add_headlines, add_descriptions or remove_asset_group_asset_ids",
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
#[validate(schema(function = "check_asset_group_update"))]
pub struct UpdateAssetGroupAssetsInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Asset group ID
    #[validate(custom(function = "check_numeric_id"))]
    pub asset_group_id: String,
    /// Headlines to create and link (max 30 characters each)
    #[serde(default)]
    #[validate(length(max = 15), custom(function = "check_headlines"))]
    pub add_headlines: Vec<String>,
    /// Descriptions to create and link (max 90 characters each)
    #[serde(default)]
    #[validate(length(max = 5), custom(function = "check_descriptions"))]
    pub add_descriptions: Vec<String>,
    /// Asset group assets to unlink
    #[serde(default)]
    #[validate(custom(function = "check_asset_group_asset_ids"))]
    pub remove_asset_group_asset_ids: Vec<String>,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

// ---------------------------------------------------------------------------
// Negative keywords
// ---------------------------------------------------------------------------

fn check_level_scope(
    level: NegativeKeywordLevel,
    campaign_id: Option<&String>,
    ad_group_id: Option<&String>,
) -> Result<(), validator::ValidationError> {
    match level {
        NegativeKeywordLevel::Campaign if campaign_id.is_none() => Err(fail(
            "campaign_id",
            "is required when level is CAMPAIGN",
        )),
        NegativeKeywordLevel::AdGroup if ad_group_id.is_none() => Err(fail(
            "ad_group_id",
            "is required when level is AD_GROUP",
        )),
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct ListNegativeKeywordsInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Campaign ID to filter by (optional)
    #[serde(default)]
    #[validate(custom(function = "check_numeric_id"))]
    pub campaign_id: Option<String>,
    /// Ad group ID to filter by (optional)
    #[serde(default)]
    #[validate(custom(function = "check_numeric_id"))]
    pub ad_group_id: Option<String>,
    /// Maximum negative keywords to return (1-500)
    #[serde(default = "default_limit_100")]
    #[validate(range(min = 1, max = 500))]
    pub limit: i64,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

fn check_add_negatives(input: &AddNegativeKeywordsInput) -> Result<(), validator::ValidationError> {
    check_level_scope(input.level, input.campaign_id.as_ref(), input.ad_group_id.as_ref())
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
#[validate(schema(function = "check_add_negatives"))]
pub struct AddNegativeKeywordsInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Negative keywords to add (1-200)
    #[validate(length(min = 1, max = 200), custom(function = "check_keywords"))]
    pub keywords: Vec<String>,
    /// CAMPAIGN or AD_GROUP
    #[serde(default = "default_campaign_level")]
    pub level: NegativeKeywordLevel,
    /// Campaign ID (required for campaign level)
    #[serde(default)]
    #[validate(custom(function = "check_numeric_id"))]
    pub campaign_id: Option<String>,
    /// Ad group ID (required for ad group level)
    #[serde(default)]
    #[validate(custom(function = "check_numeric_id"))]
    pub ad_group_id: Option<String>,
    /// Match type for negative keywords
    #[serde(default = "default_phrase")]
    pub match_type: KeywordMatchType,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

fn check_remove_negatives(
    input: &RemoveNegativeKeywordsInput,
) -> Result<(), validator::ValidationError> {
    check_level_scope(input.level, input.campaign_id.as_ref(), input.ad_group_id.as_ref())
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
#[validate(schema(function = "check_remove_negatives"))]
pub struct RemoveNegativeKeywordsInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Negative keyword criterion IDs to remove
    #[validate(length(min = 1), custom(function = "check_numeric_ids"))]
    pub criterion_ids: Vec<String>,
    /// CAMPAIGN or AD_GROUP
    pub level: NegativeKeywordLevel,
    /// Campaign ID (required for campaign level)
    #[serde(default)]
    #[validate(custom(function = "check_numeric_id"))]
    pub campaign_id: Option<String>,
    /// Ad group ID (required for ad group level)
    #[serde(default)]
    #[validate(custom(function = "check_numeric_id"))]
    pub ad_group_id: Option<String>,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

// ---------------------------------------------------------------------------
// Budget
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct UpdateCampaignBudgetInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Campaign ID
    #[validate(custom(function = "check_numeric_id"))]
    pub campaign_id: String,
    /// New daily budget in micros (minimum 1000000)
    #[validate(range(min = 1_000_000))]
    pub new_budget_micros: i64,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct GetBudgetUtilizationInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Campaign IDs to check (optional, defaults to all)
    #[serde(default)]
    #[validate(custom(function = "check_numeric_ids"))]
    pub campaign_ids: Option<Vec<String>>,
    /// Date range for utilization calculation
    #[serde(default = "default_last_7_days")]
    pub date_range: DatePreset,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct GetKeywordQualityScoresInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Campaign ID to filter by (optional)
    #[serde(default)]
    #[validate(custom(function = "check_numeric_id"))]
    pub campaign_id: Option<String>,
    /// Ad group ID to filter by (optional)
    #[serde(default)]
    #[validate(custom(function = "check_numeric_id"))]
    pub ad_group_id: Option<String>,
    /// Minimum impressions to include
    #[serde(default)]
    #[validate(range(min = 0))]
    pub min_impressions: i64,
    /// Maximum keywords to return (1-500)
    #[serde(default = "default_limit_100")]
    #[validate(range(min = 1, max = 500))]
    pub limit: i64,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct GetAdStrengthInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Campaign ID to filter by (optional)
    #[serde(default)]
    #[validate(custom(function = "check_numeric_id"))]
    pub campaign_id: Option<String>,
    /// Ad group ID to filter by (optional)
    #[serde(default)]
    #[validate(custom(function = "check_numeric_id"))]
    pub ad_group_id: Option<String>,
    /// Maximum ads to return (1-200)
    #[serde(default = "default_limit_50")]
    #[validate(range(min = 1, max = 200))]
    pub limit: i64,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct GetPolicyIssuesInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Campaign ID to filter by (optional)
    #[serde(default)]
    #[validate(custom(function = "check_numeric_id"))]
    pub campaign_id: Option<String>,
    /// Include ad policy issues
    #[serde(default = "default_true")]
    pub include_ads: bool,
    /// Include asset policy issues
    #[serde(default = "default_true")]
    pub include_assets: bool,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct ListRecommendationsInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Filter by campaign ID (optional)
    #[serde(default)]
    #[validate(custom(function = "check_numeric_id"))]
    pub campaign_id: Option<String>,
    /// Filter by recommendation types (optional)
    #[serde(default)]
    pub recommendation_types: Option<Vec<RecommendationType>>,
    /// Maximum recommendations to return (1-200)
    #[serde(default = "default_limit_50")]
    #[validate(range(min = 1, max = 200))]
    pub limit: i64,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct ApplyRecommendationInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Recommendation resource name or ID
    #[validate(custom(function = "check_recommendation_id"))]
    pub recommendation_id: String,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct DismissRecommendationInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Recommendation resource name or ID
    #[validate(custom(function = "check_recommendation_id"))]
    pub recommendation_id: String,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct ListConversionActionsInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Include disabled conversion actions
    #[serde(default)]
    pub include_disabled: bool,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct GetConversionStatsInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Filter by campaign ID (optional)
    #[serde(default)]
    #[validate(custom(function = "check_numeric_id"))]
    pub campaign_id: Option<String>,
    /// Date range for conversion data
    #[serde(default = "default_last_30_days")]
    pub date_range: DatePreset,
    /// Break conversions down per conversion action (cost and CPA are not available per action)
    #[serde(default)]
    pub by_conversion_action: bool,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct GetCampaignConversionGoalsInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Filter by specific campaign ID (optional)
    #[serde(default)]
    #[validate(custom(function = "check_numeric_id"))]
    pub campaign_id: Option<String>,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

// ---------------------------------------------------------------------------
// Geographic targeting
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct GetGeoTargetsInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Campaign ID
    #[validate(custom(function = "check_numeric_id"))]
    pub campaign_id: String,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct SearchGeoTargetsInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Search query (city, region or country name)
    #[validate(length(min = 2, max = 100))]
    pub query: String,
    /// Filter by country code (e.g. 'IT', 'US')
    #[serde(default)]
    #[validate(custom(function = "check_country_code"))]
    pub country_code: Option<String>,
    /// Locale for location names
    #[serde(default = "default_locale")]
    #[validate(length(min = 2, max = 10))]
    pub locale: String,
    /// Maximum results to return (1-100)
    #[serde(default = "default_limit_20")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i64,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct SetGeoTargetsInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Campaign ID
    #[validate(custom(function = "check_numeric_id"))]
    pub campaign_id: String,
    /// Location IDs to target (geo target constant IDs, e.g. 2380 for Italy)
    #[validate(length(min = 1), custom(function = "check_numeric_ids"))]
    pub location_ids: Vec<String>,
    /// INCLUSION to target, EXCLUSION to exclude
    #[serde(default = "default_inclusion")]
    pub target_type: GeoTargetType,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

#[derive(Debug, Deserialize, Serialize, Validate, JsonSchema)]
pub struct RemoveGeoTargetsInput {
    /// 10-digit customer ID
    #[validate(custom(function = "check_customer_id"))]
    pub customer_id: String,
    /// Campaign ID
    #[validate(custom(function = "check_numeric_id"))]
    pub campaign_id: String,
    /// Criterion IDs to remove
    #[validate(length(min = 1), custom(function = "check_numeric_ids"))]
    pub criterion_ids: Vec<String>,
    /// Output format: 'markdown' or 'json'
    #[serde(default)]
    pub response_format: ResponseFormat,
}

tool_inputs!(
    ListAccountsInput,
    GetAccountInfoInput,
    ListCampaignsInput,
    GetCampaignInput,
    GetCampaignInsightsInput,
    CreateCampaignInput,
    CreatePmaxCampaignInput,
    UpdateCampaignStatusInput,
    SetCampaignScheduleInput,
    GetSearchTermsInput,
    GetAssetPerformanceInput,
    ListAdGroupsInput,
    CreateAdGroupInput,
    UpdateAdGroupStatusInput,
    ListKeywordsInput,
    AddKeywordsInput,
    RemoveKeywordsInput,
    ListAdsInput,
    CreateResponsiveSearchAdInput,
    UpdateAdStatusInput,
    CreateTextAssetsInput,
    RemoveAssetFromGroupInput,
    UpdateAssetGroupAssetsInput,
    ListNegativeKeywordsInput,
    AddNegativeKeywordsInput,
    RemoveNegativeKeywordsInput,
    UpdateCampaignBudgetInput,
    GetBudgetUtilizationInput,
    GetKeywordQualityScoresInput,
    GetAdStrengthInput,
    GetPolicyIssuesInput,
    ListRecommendationsInput,
    ApplyRecommendationInput,
    DismissRecommendationInput,
    ListConversionActionsInput,
    GetConversionStatsInput,
    GetCampaignConversionGoalsInput,
    GetGeoTargetsInput,
    SearchGeoTargetsInput,
    SetGeoTargetsInput,
    RemoveGeoTargetsInput,
);

#[cfg(test)]
mod tests {
    use super::*;
    use gads_core::parse_input;
    use serde_json::json;

    #[test]
    fn test_defaults_applied() {
        let input: ListCampaignsInput = parse_input(json!({"customer_id": "1234567890"})).unwrap();
        assert_eq!(input.limit, 20);
        assert_eq!(input.offset, 0);
        assert_eq!(input.response_format, ResponseFormat::Markdown);

        let input: CreateAdGroupInput = parse_input(json!({
            "customer_id": "1234567890", "campaign_id": "1", "ad_group_name": "Shoes"
        }))
        .unwrap();
        assert_eq!(input.status, EntityStatus::Paused);
    }

    #[test]
    fn test_schedule_rules() {
        let base = json!({
            "customer_id": "1234567890", "campaign_id": "5",
            "days": ["MONDAY"], "start_hour": 9, "end_hour": 17
        });
        assert!(parse_input::<SetCampaignScheduleInput>(base.clone()).is_ok());

        let mut bad = base.clone();
        bad["start_minute"] = json!(10);
        assert_eq!(
            parse_input::<SetCampaignScheduleInput>(bad).unwrap_err().field,
            "start_minute"
        );

        let mut bad = base.clone();
        bad["end_hour"] = json!(24);
        bad["end_minute"] = json!(15);
        assert_eq!(
            parse_input::<SetCampaignScheduleInput>(bad).unwrap_err().field,
            "end_minute"
        );

        let mut bad = base.clone();
        bad["end_hour"] = json!(8);
        assert_eq!(
            parse_input::<SetCampaignScheduleInput>(bad).unwrap_err().field,
            "end_hour"
        );

        let mut bad = base;
        bad["days"] = json!(["MONDAY", "MONDAY"]);
        assert_eq!(parse_input::<SetCampaignScheduleInput>(bad).unwrap_err().field, "days");
    }

    #[test]
    fn test_headline_too_long() {
        let err = parse_input::<CreateResponsiveSearchAdInput>(json!({
            "customer_id": "1234567890", "ad_group_id": "1",
            "headlines": ["a", "b", "x".repeat(31)],
            "descriptions": ["d1", "d2"],
            "final_urls": ["https://example.com"]
        }))
        .unwrap_err();
        assert_eq!(err.field, "headlines");
        assert!(err.constraint.contains("entry 3"));
    }

    #[test]
    fn test_too_few_headlines_reports_count() {
        let err = parse_input::<CreateResponsiveSearchAdInput>(json!({
            "customer_id": "1234567890", "ad_group_id": "1",
            "headlines": ["a", "b"],
            "descriptions": ["d1", "d2"],
            "final_urls": ["https://example.com"]
        }))
        .unwrap_err();
        assert_eq!(err.field, "headlines");
        assert!(err.constraint.contains("got 2 items"));
    }

    #[test]
    fn test_negative_level_requires_scope() {
        let err = parse_input::<AddNegativeKeywordsInput>(json!({
            "customer_id": "1234567890", "keywords": ["free"], "level": "AD_GROUP"
        }))
        .unwrap_err();
        assert_eq!(err.field, "ad_group_id");
    }

    #[test]
    fn test_remove_keywords_formats() {
        assert!(parse_input::<RemoveKeywordsInput>(json!({
            "customer_id": "1234567890", "keyword_ids": ["11~22"]
        }))
        .is_ok());
        let err = parse_input::<RemoveKeywordsInput>(json!({
            "customer_id": "1234567890", "keyword_ids": ["22"]
        }))
        .unwrap_err();
        assert_eq!(err.field, "ad_group_id");
        let err = parse_input::<RemoveKeywordsInput>(json!({
            "customer_id": "1234567890", "keyword_ids": ["abc"]
        }))
        .unwrap_err();
        assert_eq!(err.field, "keyword_ids");
    }

    #[test]
    fn test_pmax_bidding_restricted() {
        let err = parse_input::<CreatePmaxCampaignInput>(json!({
            "customer_id": "1234567890",
            "campaign_name": "PMax",
            "budget_amount_micros": 20_000_000,
            "bidding_strategy": "MANUAL_CPC",
            "asset_group_name": "Main",
            "final_urls": ["https://example.com"],
            "headlines": ["H1", "H2", "H3"],
            "long_headlines": ["Long headline"],
            "descriptions": ["Short one", "Another"],
            "business_name": "Acme"
        }))
        .unwrap_err();
        assert_eq!(err.field, "bidding_strategy");
    }

    #[test]
    fn test_end_date_before_start() {
        let err = parse_input::<CreateCampaignInput>(json!({
            "customer_id": "1234567890",
            "campaign_name": "Summer Sale",
            "budget_amount_micros": 50_000_000,
            "advertising_channel_type": "SEARCH",
            "start_date": "20260601",
            "end_date": "20260501"
        }))
        .unwrap_err();
        assert_eq!(err.field, "end_date");
    }

    #[test]
    fn test_asset_group_asset_id_formats() {
        assert!(check_asset_group_asset_ids(&["11~22~HEADLINE".to_string()]).is_ok());
        assert!(check_asset_group_asset_ids(&[
            "customers/1234567890/assetGroupAssets/11~22~DESCRIPTION".to_string()
        ])
        .is_ok());
        assert!(check_asset_group_asset_ids(&["11~22".to_string()]).is_err());
        assert!(check_asset_group_asset_ids(&["11~22~BOGUS".to_string()]).is_err());
    }
}
