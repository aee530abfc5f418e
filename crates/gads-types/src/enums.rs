//! Enumerations accepted by tool parameters.
//!
//! Every enum serializes to the Google Ads API's own spelling
//! (`SCREAMING_SNAKE_CASE`), so values pass straight through into GAQL and
//! mutate payloads via [`as_str`](EntityStatus::as_str).

use std::fmt;

use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

macro_rules! api_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Output format for tool responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Human-readable markdown (headers, sections, tables).
    #[default]
    Markdown,
    /// Every field, nesting and pagination metadata.
    Json,
}

impl ResponseFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseFormat::Markdown => "markdown",
            ResponseFormat::Json => "json",
        }
    }
}

api_enum! {
    /// Status of a campaign, ad group or ad.
    EntityStatus {
        Enabled => "ENABLED",
        Paused => "PAUSED",
        Removed => "REMOVED",
    }
}

impl EntityStatus {
    /// Word used in confirmations ("has been paused").
    pub fn past_tense(self) -> &'static str {
        match self {
            EntityStatus::Enabled => "enabled",
            EntityStatus::Paused => "paused",
            EntityStatus::Removed => "removed",
        }
    }
}

api_enum! {
    AdvertisingChannelType {
        Search => "SEARCH",
        Display => "DISPLAY",
        Shopping => "SHOPPING",
        Video => "VIDEO",
        MultiChannel => "MULTI_CHANNEL",
        Local => "LOCAL",
        Smart => "SMART",
        PerformanceMax => "PERFORMANCE_MAX",
        LocalServices => "LOCAL_SERVICES",
        Discovery => "DISCOVERY",
        DemandGen => "DEMAND_GEN",
    }
}

api_enum! {
    BiddingStrategyType {
        ManualCpc => "MANUAL_CPC",
        ManualCpm => "MANUAL_CPM",
        ManualCpv => "MANUAL_CPV",
        MaximizeConversions => "MAXIMIZE_CONVERSIONS",
        MaximizeConversionValue => "MAXIMIZE_CONVERSION_VALUE",
        TargetCpa => "TARGET_CPA",
        TargetRoas => "TARGET_ROAS",
        TargetSpend => "TARGET_SPEND",
        TargetImpressionShare => "TARGET_IMPRESSION_SHARE",
    }
}

api_enum! {
    /// Preset date ranges for report tools.
    DatePreset {
        Today => "TODAY",
        Yesterday => "YESTERDAY",
        Last7Days => "LAST_7_DAYS",
        Last14Days => "LAST_14_DAYS",
        Last30Days => "LAST_30_DAYS",
        LastWeek => "LAST_WEEK",
        LastMonth => "LAST_MONTH",
        ThisMonth => "THIS_MONTH",
        ThisYear => "THIS_YEAR",
    }
}

impl DatePreset {
    /// GAQL condition on `segments.date` for this preset, relative to `today`.
    ///
    /// GAQL has no `LAST_WEEK` or `THIS_YEAR` literal: the former maps to
    /// `LAST_WEEK_MON_SUN`, the latter to an explicit `BETWEEN` range.
    pub fn gaql_condition(self, today: NaiveDate) -> String {
        match self {
            DatePreset::LastWeek => "segments.date DURING LAST_WEEK_MON_SUN".to_string(),
            DatePreset::ThisYear => format!(
                "segments.date BETWEEN '{}-01-01' AND '{}'",
                today.year(),
                today.format("%Y-%m-%d")
            ),
            other => format!("segments.date DURING {}", other.as_str()),
        }
    }

    /// Number of days the preset spans, used to average daily spend.
    pub fn days(self, today: NaiveDate) -> u32 {
        match self {
            DatePreset::Today | DatePreset::Yesterday => 1,
            DatePreset::Last7Days | DatePreset::LastWeek => 7,
            DatePreset::Last14Days => 14,
            DatePreset::Last30Days | DatePreset::LastMonth => 30,
            DatePreset::ThisMonth => today.day(),
            DatePreset::ThisYear => today.ordinal(),
        }
    }
}

api_enum! {
    DayOfWeek {
        Monday => "MONDAY",
        Tuesday => "TUESDAY",
        Wednesday => "WEDNESDAY",
        Thursday => "THURSDAY",
        Friday => "FRIDAY",
        Saturday => "SATURDAY",
        Sunday => "SUNDAY",
    }
}

api_enum! {
    KeywordMatchType {
        Exact => "EXACT",
        Phrase => "PHRASE",
        Broad => "BROAD",
    }
}

api_enum! {
    /// Field an asset fills inside a Performance Max asset group.
    AssetFieldType {
        Headline => "HEADLINE",
        LongHeadline => "LONG_HEADLINE",
        Description => "DESCRIPTION",
        BusinessName => "BUSINESS_NAME",
        MarketingImage => "MARKETING_IMAGE",
        SquareMarketingImage => "SQUARE_MARKETING_IMAGE",
        PortraitMarketingImage => "PORTRAIT_MARKETING_IMAGE",
        Logo => "LOGO",
        LandscapeLogo => "LANDSCAPE_LOGO",
        YoutubeVideo => "YOUTUBE_VIDEO",
        CallToActionSelection => "CALL_TO_ACTION_SELECTION",
    }
}

api_enum! {
    NegativeKeywordLevel {
        Campaign => "CAMPAIGN",
        AdGroup => "AD_GROUP",
    }
}

api_enum! {
    GeoTargetType {
        Inclusion => "INCLUSION",
        Exclusion => "EXCLUSION",
    }
}

api_enum! {
    RecommendationType {
        CampaignBudget => "CAMPAIGN_BUDGET",
        Keyword => "KEYWORD",
        TextAd => "TEXT_AD",
        TargetCpaOptIn => "TARGET_CPA_OPT_IN",
        MaximizeConversionsOptIn => "MAXIMIZE_CONVERSIONS_OPT_IN",
        EnhancedCpcOptIn => "ENHANCED_CPC_OPT_IN",
        SearchPartnersOptIn => "SEARCH_PARTNERS_OPT_IN",
        MaximizeClicksOptIn => "MAXIMIZE_CLICKS_OPT_IN",
        OptimizeAdRotation => "OPTIMIZE_AD_ROTATION",
        KeywordMatchType => "KEYWORD_MATCH_TYPE",
        MoveUnusedBudget => "MOVE_UNUSED_BUDGET",
        ResponsiveSearchAd => "RESPONSIVE_SEARCH_AD",
        UseBroadMatchKeyword => "USE_BROAD_MATCH_KEYWORD",
        ResponsiveSearchAdAsset => "RESPONSIVE_SEARCH_AD_ASSET",
        ResponsiveSearchAdImproveAdStrength => "RESPONSIVE_SEARCH_AD_IMPROVE_AD_STRENGTH",
        DisplayExpansionOptIn => "DISPLAY_EXPANSION_OPT_IN",
        SitelinkAsset => "SITELINK_ASSET",
        CallAsset => "CALL_ASSET",
        CalloutAsset => "CALLOUT_ASSET",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_wire_names_round_trip() {
        let status: EntityStatus = serde_json::from_str("\"PAUSED\"").unwrap();
        assert_eq!(status, EntityStatus::Paused);
        assert_eq!(
            serde_json::to_string(&AdvertisingChannelType::PerformanceMax).unwrap(),
            "\"PERFORMANCE_MAX\""
        );
        assert!(serde_json::from_str::<EntityStatus>("\"paused\"").is_err());
    }

    #[test]
    fn test_response_format_is_lowercase() {
        let f: ResponseFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(f, ResponseFormat::Json);
        assert_eq!(ResponseFormat::default(), ResponseFormat::Markdown);
    }

    #[test]
    fn test_native_presets_use_during() {
        assert_eq!(
            DatePreset::Last30Days.gaql_condition(day(2026, 3, 9)),
            "segments.date DURING LAST_30_DAYS"
        );
    }

    #[test]
    fn test_last_week_and_this_year_mapping() {
        let today = day(2026, 3, 9);
        assert_eq!(
            DatePreset::LastWeek.gaql_condition(today),
            "segments.date DURING LAST_WEEK_MON_SUN"
        );
        assert_eq!(
            DatePreset::ThisYear.gaql_condition(today),
            "segments.date BETWEEN '2026-01-01' AND '2026-03-09'"
        );
        assert_eq!(DatePreset::ThisYear.days(today), 68);
    }

    #[test]
    fn test_recommendation_type_count() {
        assert_eq!(RecommendationType::ALL.len(), 19);
        assert_eq!(DayOfWeek::ALL.len(), 7);
    }
}
