//! End-to-end tool calls through the dispatcher against an in-memory API.

mod common;

use common::{batch_rejection, FakeAds, CUSTOMER};
use gads_core::CHARACTER_LIMIT;
use gads_mcp::logging::LogConfig;
use gads_mcp::ToolDispatcher;
use gads_transport::{ApiError, ApiErrorKind};
use serde_json::{json, Value};

fn summer_sale() -> Value {
    json!({
        "customer_id": CUSTOMER,
        "campaign_name": "Summer Sale",
        "budget_amount_micros": 50_000_000,
        "advertising_channel_type": "SEARCH",
        "response_format": "json",
    })
}

#[tokio::test]
async fn test_limit_out_of_range_is_rejected_before_any_call() {
    let api = FakeAds::new();
    let dispatcher = api.dispatcher();

    for limit in [0, 101] {
        let result = dispatcher
            .dispatch(
                "google_ads_list_campaigns",
                json!({"customer_id": CUSTOMER, "limit": limit}),
            )
            .await;
        assert!(!result.success, "limit {} should be rejected", limit);
        assert_eq!(result.error_kind.as_deref(), Some("validation"));
        let details = result.error_details.expect("details");
        assert_eq!(details["field"], "limit");
    }
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn test_nine_digit_customer_id_is_rejected() {
    let api = FakeAds::new();
    let result = api
        .dispatcher()
        .dispatch("google_ads_list_campaigns", json!({"customer_id": "123456789"}))
        .await;

    assert!(!result.success);
    assert_eq!(result.error_kind.as_deref(), Some("validation"));
    assert_eq!(result.error_details.unwrap()["field"], "customer_id");
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn test_dashed_customer_id_is_accepted() {
    let api = FakeAds::new();
    let result = api
        .dispatcher()
        .dispatch("google_ads_list_campaigns", json!({"customer_id": "123-456-7890"}))
        .await;
    assert!(result.success, "{:?}", result.error);
}

#[tokio::test]
async fn test_created_campaign_starts_paused() {
    let api = FakeAds::new();
    let result = api
        .dispatcher()
        .dispatch("google_ads_create_campaign", summer_sale())
        .await;

    assert!(result.success, "create failed: {:?}", result.error);
    assert_eq!(result.result["status"], "PAUSED");
    assert_eq!(result.result["name"], "Summer Sale");

    let mutates = api.mutates();
    assert_eq!(mutates.len(), 1, "budget and campaign go in one batch");
    let ops = &mutates[0];
    assert_eq!(ops.len(), 2);
    let budget = &ops[0]["campaignBudgetOperation"]["create"];
    let campaign = &ops[1]["campaignOperation"]["create"];
    assert_eq!(budget["amountMicros"], "50000000");
    assert_eq!(campaign["status"], "PAUSED");
    assert_eq!(campaign["campaignBudget"], budget["resourceName"]);
    assert!(budget["resourceName"].as_str().unwrap().ends_with("/-1"));
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let api = FakeAds::new();
    let dispatcher = api.dispatcher();

    let created = dispatcher
        .dispatch("google_ads_create_campaign", summer_sale())
        .await;
    assert!(created.success, "{:?}", created.error);
    let campaign_id = created.result["campaign_id"].as_str().unwrap().to_string();

    let fetched = dispatcher
        .dispatch(
            "google_ads_get_campaign",
            json!({"customer_id": CUSTOMER, "campaign_id": campaign_id, "response_format": "json"}),
        )
        .await;
    assert!(fetched.success, "{:?}", fetched.error);
    assert_eq!(fetched.result["name"], "Summer Sale");
    assert_eq!(fetched.result["status"], "PAUSED");
    assert_eq!(fetched.result["budget"]["amount_micros"], 50_000_000);
}

#[tokio::test]
async fn test_status_update_is_visible_in_listing() {
    let api = FakeAds::new();
    let dispatcher = api.dispatcher();

    let created = dispatcher
        .dispatch("google_ads_create_campaign", summer_sale())
        .await;
    let campaign_id = created.result["campaign_id"].as_str().unwrap().to_string();

    let updated = dispatcher
        .dispatch(
            "google_ads_update_campaign_status",
            json!({"customer_id": CUSTOMER, "campaign_id": campaign_id, "status": "ENABLED"}),
        )
        .await;
    assert!(updated.success, "{:?}", updated.error);

    let listed = dispatcher
        .dispatch(
            "google_ads_list_campaigns",
            json!({"customer_id": CUSTOMER, "status_filter": "ENABLED", "response_format": "json"}),
        )
        .await;
    assert_eq!(listed.result["total"], 1);
    assert_eq!(listed.result["campaigns"][0]["id"], campaign_id.as_str());
}

#[tokio::test]
async fn test_status_filter_without_matches_is_an_empty_success() {
    let api = FakeAds::new();
    let dispatcher = api.dispatcher();
    dispatcher
        .dispatch("google_ads_create_campaign", summer_sale())
        .await;

    let result = dispatcher
        .dispatch(
            "google_ads_list_campaigns",
            json!({"customer_id": CUSTOMER, "status_filter": "ENABLED"}),
        )
        .await;

    assert!(result.success);
    assert_eq!(result.result["total"], 0);
    assert_eq!(result.result["campaigns"], json!([]));
    assert!(result.output.contains("No campaigns found with status ENABLED"));
    assert!(api.searches()[0].contains("campaign.status = 'ENABLED'"));
}

#[tokio::test]
async fn test_json_output_carries_what_markdown_shows() {
    let api = FakeAds::new();
    let dispatcher = api.dispatcher();
    dispatcher
        .dispatch("google_ads_create_campaign", summer_sale())
        .await;

    let markdown = dispatcher
        .dispatch("google_ads_list_campaigns", json!({"customer_id": CUSTOMER}))
        .await;
    let as_json = dispatcher
        .dispatch(
            "google_ads_list_campaigns",
            json!({"customer_id": CUSTOMER, "response_format": "json"}),
        )
        .await;

    assert!(markdown.output.contains("## Summer Sale"));
    assert!(markdown.output.contains("PAUSED"));
    let parsed: Value = serde_json::from_str(&as_json.output).expect("json output");
    let campaign = &parsed["campaigns"][0];
    assert_eq!(campaign["name"], "Summer Sale");
    assert_eq!(campaign["status"], "PAUSED");
    assert_eq!(campaign["budget_micros"], 50_000_000);
    assert_eq!(parsed["has_more"], false);
}

#[tokio::test]
async fn test_pagination_reports_next_offset() {
    let api = FakeAds::new();
    let rows: Vec<Value> = (0..5)
        .map(|i| {
            json!({
                "campaign": {"id": format!("{}", 100 + i), "name": format!("C{}", i), "status": "ENABLED"},
                "campaignBudget": {"amountMicros": "1000000"},
            })
        })
        .collect();
    api.with_rows("campaign", rows);

    let result = api
        .dispatcher()
        .dispatch(
            "google_ads_list_campaigns",
            json!({"customer_id": CUSTOMER, "limit": 2, "offset": 2, "response_format": "json"}),
        )
        .await;

    assert_eq!(result.result["total"], 5);
    assert_eq!(result.result["count"], 2);
    assert_eq!(result.result["has_more"], true);
    assert_eq!(result.result["next_offset"], 4);
}

#[tokio::test]
async fn test_large_output_is_truncated_with_notice() {
    let api = FakeAds::new();
    let rows: Vec<Value> = (0..100)
        .map(|i| {
            json!({
                "campaign": {
                    "id": format!("{}", 1000 + i),
                    "name": format!("Campaign {} {}", i, "x".repeat(250)),
                    "status": "ENABLED",
                    "advertisingChannelType": "SEARCH",
                    "biddingStrategyType": "MANUAL_CPC",
                },
                "campaignBudget": {"amountMicros": "25000000"},
                "customer": {"currencyCode": "USD"},
            })
        })
        .collect();
    api.with_rows("campaign", rows);

    let result = api
        .dispatcher()
        .dispatch(
            "google_ads_list_campaigns",
            json!({"customer_id": CUSTOMER, "limit": 100}),
        )
        .await;

    assert!(result.success);
    assert!(result.truncated);
    let original = result.original_length.expect("original length");
    assert!(original > CHARACTER_LIMIT);
    assert!(result.output.contains("Response truncated"));
    // The structured result is never cut.
    assert_eq!(result.result["count"], 100);
}

#[tokio::test]
async fn test_rejected_batch_reports_failing_operation() {
    let api = FakeAds::new();
    api.fail_mutate(batch_rejection(1, "A campaign with this name already exists."));

    let result = api
        .dispatcher()
        .dispatch("google_ads_create_campaign", summer_sale())
        .await;

    assert!(!result.success);
    assert_eq!(result.error_kind.as_deref(), Some("partial_batch"));
    let details = result.error_details.expect("details");
    assert_eq!(details["failed_operation_index"], 1);
    assert_eq!(details["operations_submitted"], 2);
    assert_eq!(details["operations_applied"], 0);
    assert_eq!(details["request_id"], "req-abc");
    let message = result.error.unwrap();
    assert!(message.contains("Operation 2 of 2"));
    assert!(message.contains("already exists"));
    assert_eq!(api.campaign_count(), 0);
}

#[tokio::test]
async fn test_policy_asset_failure_degrades_to_warning() {
    let api = FakeAds::new();
    api.fail_search("asset", ApiError::new(ApiErrorKind::Api, "asset lookup failed"));

    let result = api
        .dispatcher()
        .dispatch("google_ads_get_policy_issues", json!({"customer_id": CUSTOMER}))
        .await;

    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.warnings[0].contains("Asset policy issues could not be retrieved"));
    assert!(result.output.contains("No Policy Issues Found"));
}

#[tokio::test]
async fn test_policy_issues_skips_assets_when_disabled() {
    let api = FakeAds::new();
    let result = api
        .dispatcher()
        .dispatch(
            "google_ads_get_policy_issues",
            json!({"customer_id": CUSTOMER, "include_assets": false}),
        )
        .await;

    assert!(result.success);
    let searches = api.searches();
    assert_eq!(searches.len(), 1);
    assert!(searches[0].contains("FROM ad_group_ad"));
}

#[tokio::test]
async fn test_search_geo_targets_renders_suggestions() {
    let api = FakeAds::new();
    api.with_geo_suggestions(vec![json!({
        "geoTargetConstant": {
            "resourceName": "geoTargetConstants/1023191",
            "id": "1023191",
            "name": "New York",
            "canonicalName": "New York,New York,United States",
            "countryCode": "US",
            "targetType": "City",
            "status": "ENABLED",
        },
        "reach": "9750000",
    })]);

    let result = api
        .dispatcher()
        .dispatch(
            "google_ads_search_geo_targets",
            json!({"customer_id": CUSTOMER, "query": "New York", "response_format": "json"}),
        )
        .await;

    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.result["locations"][0]["name"], "New York");
}

#[tokio::test]
async fn test_unknown_tool() {
    let api = FakeAds::new();
    let result = api.dispatcher().dispatch("google_ads_launch_rocket", json!({})).await;
    assert!(!result.success);
    assert_eq!(result.error_kind.as_deref(), Some("unknown_tool"));
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn test_tool_calls_are_logged_with_meta() {
    let temp_dir = tempfile::tempdir().unwrap();
    let api = FakeAds::new();
    let dispatcher = ToolDispatcher::with_api(api.clone(), LogConfig::at(temp_dir.path()));

    let result = dispatcher
        .dispatch(
            "google_ads_list_campaigns",
            json!({
                "customer_id": CUSTOMER,
                "_meta": {"reason": "weekly review", "request_id": "req-42"},
            }),
        )
        .await;
    assert!(result.success);

    let log_file = dispatcher.logger().current_file().expect("log file");
    let contents = std::fs::read_to_string(log_file).unwrap();
    let line: Value = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
    assert_eq!(line["tool"], "google_ads_list_campaigns");
    assert_eq!(line["request_id"], "req-42");
    assert_eq!(line["reason"], "weekly review");
    assert!(line["input"].get("_meta").is_none());
}

fn spring_pmax() -> Value {
    json!({
        "customer_id": CUSTOMER,
        "campaign_name": "Spring PMax",
        "budget_amount_micros": 20_000_000,
        "asset_group_name": "Main",
        "final_urls": ["https://example.com"],
        "headlines": ["Fresh Flowers", "Same Day Delivery", "Shop Spring"],
        "long_headlines": ["Fresh seasonal bouquets delivered to your door today"],
        "descriptions": ["Hand-tied bouquets.", "Order before noon for same day delivery anywhere in town."],
        "business_name": "Bloom Co",
        "response_format": "json",
    })
}

#[tokio::test]
async fn test_pmax_campaign_is_one_batch_with_temporary_ids() {
    let api = FakeAds::new();
    let result = api
        .dispatcher()
        .dispatch("google_ads_create_pmax_campaign", spring_pmax())
        .await;
    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.result["status"], "PAUSED");
    assert_eq!(result.result["text_assets_created"], 7);

    let mutates = api.mutates();
    assert_eq!(mutates.len(), 1);
    let ops = &mutates[0];
    // budget, campaign, asset group, then an asset and its link per text
    assert_eq!(ops.len(), 17);

    let budget = &ops[0]["campaignBudgetOperation"]["create"];
    let campaign = &ops[1]["campaignOperation"]["create"];
    let group = &ops[2]["assetGroupOperation"]["create"];
    assert!(budget["resourceName"].as_str().unwrap().ends_with("/-1"));
    assert!(campaign["resourceName"].as_str().unwrap().ends_with("/-2"));
    assert!(group["resourceName"].as_str().unwrap().ends_with("/-3"));
    assert_eq!(campaign["campaignBudget"], budget["resourceName"]);
    assert_eq!(campaign["advertisingChannelType"], "PERFORMANCE_MAX");
    assert_eq!(group["campaign"], campaign["resourceName"]);
    assert_eq!(group["status"], "PAUSED");

    let asset = &ops[3]["assetOperation"]["create"];
    let link = &ops[4]["assetGroupAssetOperation"]["create"];
    assert!(asset["resourceName"].as_str().unwrap().ends_with("/-4"));
    assert_eq!(link["asset"], asset["resourceName"]);
    assert_eq!(link["assetGroup"], group["resourceName"]);
    assert_eq!(link["fieldType"], "HEADLINE");
    assert_eq!(api.campaign_count(), 1);
}

#[tokio::test]
async fn test_rejected_pmax_batch_creates_nothing() {
    let api = FakeAds::new();
    api.fail_mutate(batch_rejection(7, "Text is too long."));

    let result = api
        .dispatcher()
        .dispatch("google_ads_create_pmax_campaign", spring_pmax())
        .await;

    assert!(!result.success);
    assert_eq!(result.error_kind.as_deref(), Some("partial_batch"));
    let details = result.error_details.expect("details");
    assert_eq!(details["failed_operation_index"], 7);
    assert_eq!(details["operations_submitted"], 17);
    assert_eq!(details["operations_applied"], 0);
    assert!(result.error.unwrap().contains("Operation 8 of 17"));
    assert_eq!(api.mutates().len(), 1);
    assert_eq!(api.campaign_count(), 0);
}

#[tokio::test]
async fn test_account_info_rejects_nine_digit_customer_id() {
    let api = FakeAds::new();
    let result = api
        .dispatcher()
        .dispatch("google_ads_get_account_info", json!({"customer_id": "123456789"}))
        .await;

    assert!(!result.success);
    assert_eq!(result.error_kind.as_deref(), Some("validation"));
    assert_eq!(result.error_details.unwrap()["field"], "customer_id");
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn test_padded_campaign_id_is_rejected_before_mutate() {
    let api = FakeAds::new();
    let result = api
        .dispatcher()
        .dispatch(
            "google_ads_update_campaign_status",
            json!({"customer_id": CUSTOMER, "campaign_id": " 42 ", "status": "PAUSED"}),
        )
        .await;

    assert!(!result.success);
    assert_eq!(result.error_kind.as_deref(), Some("validation"));
    assert_eq!(result.error_details.unwrap()["field"], "campaign_id");
    assert!(api.mutates().is_empty());
}
