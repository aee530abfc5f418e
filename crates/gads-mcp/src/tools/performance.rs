use std::collections::BTreeMap;
use std::fmt::Write;

use gads_core::markdown::{clip, field};
use gads_core::rows::{f64_at, i64_at, opt_str_at, str_at};
use gads_core::{AdsError, Query, Report};
use gads_transport::AdsApi;
use gads_types::money::{format_money, group_thousands, micros_to_units, MICROS_PER_UNIT};
use serde_json::{json, Value};

use super::inputs::{GetAssetPerformanceInput, GetCampaignInsightsInput, GetSearchTermsInput};
use super::{currency_of, customer, search, today};

/// Search terms rendered in markdown; JSON carries every row.
const SEARCH_TERMS_SHOWN: usize = 50;
/// Assets rendered per performance label in markdown.
const ASSETS_PER_LABEL: usize = 20;

const PERFORMANCE_LABELS: [&str; 6] = ["BEST", "GOOD", "LOW", "LEARNING", "PENDING", "UNKNOWN"];

/// Totals over one or more metric rows, plus the ratios derived from them.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct Totals {
    pub impressions: i64,
    pub clicks: i64,
    pub cost_micros: i64,
    pub conversions: f64,
    pub conversions_value: f64,
}

impl Totals {
    pub fn add_row(&mut self, row: &Value) {
        self.impressions += i64_at(row, "metrics.impressions");
        self.clicks += i64_at(row, "metrics.clicks");
        self.cost_micros += i64_at(row, "metrics.costMicros");
        self.conversions += f64_at(row, "metrics.conversions");
        self.conversions_value += f64_at(row, "metrics.conversionsValue");
    }

    /// Percentage of impressions that were clicked.
    pub fn ctr(&self) -> f64 {
        ratio(self.clicks as f64, self.impressions as f64) * 100.0
    }

    pub fn average_cpc_micros(&self) -> i64 {
        ratio(self.cost_micros as f64, self.clicks as f64) as i64
    }

    pub fn conversion_rate(&self) -> f64 {
        ratio(self.conversions, self.clicks as f64) * 100.0
    }

    pub fn cost_per_conversion_micros(&self) -> i64 {
        ratio(self.cost_micros as f64, self.conversions) as i64
    }

    /// Conversion value per unit of spend.
    pub fn roas(&self) -> f64 {
        ratio(self.conversions_value, micros_to_units(self.cost_micros))
    }
}

pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn get_campaign_insights(
    api: &dyn AdsApi,
    p: GetCampaignInsightsInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let query = Query::select(&[
        "campaign.id",
        "campaign.name",
        "metrics.impressions",
        "metrics.clicks",
        "metrics.cost_micros",
        "metrics.conversions",
        "metrics.conversions_value",
        "customer.currency_code",
    ])
    .from("campaign")
    .filter(format!("campaign.id = {}", p.campaign_id))
    .filter(p.date_range.gaql_condition(today()));
    let rows = search(api, &id, &query)?;

    let Some(first) = rows.first() else {
        return Ok(Report::new(
            format!(
                "No data found for campaign {} in the selected date range",
                p.campaign_id
            ),
            json!({"campaign_id": p.campaign_id, "date_range": p.date_range.as_str(), "metrics": null}),
        ));
    };
    let campaign_name = str_at(first, "campaign.name");
    let currency = currency_of(first);
    let mut totals = Totals::default();
    for row in &rows {
        totals.add_row(row);
    }

    let data = json!({
        "campaign_id": p.campaign_id,
        "campaign_name": campaign_name,
        "date_range": p.date_range.as_str(),
        "currency_code": currency,
        "metrics": {
            "impressions": totals.impressions,
            "clicks": totals.clicks,
            "cost_micros": totals.cost_micros,
            "conversions": totals.conversions,
            "conversions_value": totals.conversions_value,
            "ctr": round2(totals.ctr()),
            "average_cpc_micros": totals.average_cpc_micros(),
            "conversion_rate": round2(totals.conversion_rate()),
            "cost_per_conversion_micros": totals.cost_per_conversion_micros(),
            "roas": round2(totals.roas()),
        },
    });

    let mut md = format!("# Performance: {}\n\n", campaign_name);
    field(&mut md, "Date Range", p.date_range);
    md.push_str("\n## Key Metrics\n");
    field(&mut md, "Impressions", group_thousands(totals.impressions));
    field(&mut md, "Clicks", group_thousands(totals.clicks));
    field(&mut md, "CTR", format!("{:.2}%", totals.ctr()));
    field(&mut md, "Cost", format_money(totals.cost_micros, &currency));
    field(&mut md, "Avg. CPC", format_money(totals.average_cpc_micros(), &currency));
    md.push_str("\n## Conversions\n");
    field(&mut md, "Conversions", format!("{:.2}", totals.conversions));
    field(&mut md, "Conversion Rate", format!("{:.2}%", totals.conversion_rate()));
    field(
        &mut md,
        "Cost per Conversion",
        format_money(totals.cost_per_conversion_micros(), &currency),
    );
    field(
        &mut md,
        "Conversion Value",
        format_money((totals.conversions_value * MICROS_PER_UNIT) as i64, &currency),
    );
    field(&mut md, "ROAS", format!("{:.2}x", totals.roas()));

    Ok(Report::new(md, data))
}

pub(crate) fn get_search_terms(api: &dyn AdsApi, p: GetSearchTermsInput) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let query = Query::select(&[
        "search_term_view.search_term",
        "search_term_view.status",
        "campaign.id",
        "campaign.name",
        "ad_group.id",
        "ad_group.name",
        "segments.keyword.info.text",
        "segments.keyword.info.match_type",
        "metrics.impressions",
        "metrics.clicks",
        "metrics.ctr",
        "metrics.cost_micros",
        "metrics.conversions",
        "metrics.conversions_value",
        "metrics.average_cpc",
        "customer.currency_code",
    ])
    .from("search_term_view")
    .filter(p.date_range.gaql_condition(today()))
    .filter_opt(p.campaign_id.as_ref(), |c| format!("campaign.id = {}", c))
    .filter_opt(p.ad_group_id.as_ref(), |g| format!("ad_group.id = {}", g))
    .filter(format!("metrics.impressions >= {}", p.min_impressions))
    .order_by("metrics.impressions DESC")
    .limit(p.limit);
    let rows = search(api, &id, &query)?;

    if rows.is_empty() {
        let scope = p
            .campaign_id
            .as_ref()
            .map(|c| format!(" for campaign {}", c))
            .unwrap_or_default();
        return Ok(Report::new(
            format!("No search terms found{} in the selected date range", scope),
            json!({"date_range": p.date_range.as_str(), "total": 0, "search_terms": []}),
        ));
    }

    let currency = currency_of(&rows[0]);
    let terms: Vec<Value> = rows
        .iter()
        .map(|row| {
            json!({
                "search_term": str_at(row, "searchTermView.searchTerm"),
                "status": opt_str_at(row, "searchTermView.status").unwrap_or_else(|| "UNKNOWN".into()),
                "campaign_id": str_at(row, "campaign.id"),
                "campaign_name": str_at(row, "campaign.name"),
                "ad_group_id": str_at(row, "adGroup.id"),
                "ad_group_name": str_at(row, "adGroup.name"),
                "keyword_text": opt_str_at(row, "segments.keyword.info.text").unwrap_or_else(|| "N/A".into()),
                "match_type": opt_str_at(row, "segments.keyword.info.matchType").unwrap_or_else(|| "N/A".into()),
                "metrics": {
                    "impressions": i64_at(row, "metrics.impressions"),
                    "clicks": i64_at(row, "metrics.clicks"),
                    "ctr": round2(f64_at(row, "metrics.ctr") * 100.0),
                    "cost_micros": i64_at(row, "metrics.costMicros"),
                    "conversions": f64_at(row, "metrics.conversions"),
                    "conversions_value": f64_at(row, "metrics.conversionsValue"),
                    "average_cpc_micros": f64_at(row, "metrics.averageCpc") as i64,
                },
            })
        })
        .collect();

    let mut md = String::from("# Search Terms Report\n\n");
    field(&mut md, "Date Range", p.date_range);
    field(&mut md, "Found", format!("{} search term(s)", terms.len()));
    md.push('\n');
    for term in terms.iter().take(SEARCH_TERMS_SHOWN) {
        let m = &term["metrics"];
        let conversions = m["conversions"].as_f64().unwrap_or(0.0);
        let clicks = m["clicks"].as_i64().unwrap_or(0);
        let icon = if conversions > 0.0 {
            "🎯"
        } else if clicks > 0 {
            "👆"
        } else {
            "👁️"
        };
        let s = |key: &str| term[key].as_str().unwrap_or_default().to_string();
        let _ = writeln!(md, "## {} \"{}\"", icon, s("search_term"));
        field(&mut md, "Campaign", s("campaign_name"));
        field(&mut md, "Ad Group", s("ad_group_name"));
        field(&mut md, "Keyword", format!("{} ({})", s("keyword_text"), s("match_type")));
        field(&mut md, "Status", s("status"));
        md.push_str("\n**Performance:**\n");
        let _ = writeln!(md, "- Impressions: {}", group_thousands(m["impressions"].as_i64().unwrap_or(0)));
        let _ = writeln!(md, "- Clicks: {}", group_thousands(clicks));
        let _ = writeln!(md, "- CTR: {:.2}%", m["ctr"].as_f64().unwrap_or(0.0));
        let _ = writeln!(md, "- Cost: {}", format_money(m["cost_micros"].as_i64().unwrap_or(0), &currency));
        let _ = writeln!(
            md,
            "- Avg CPC: {}",
            format_money(m["average_cpc_micros"].as_i64().unwrap_or(0), &currency)
        );
        if conversions > 0.0 {
            let value = m["conversions_value"].as_f64().unwrap_or(0.0);
            let _ = writeln!(md, "- Conversions: {:.2}", conversions);
            let _ = writeln!(
                md,
                "- Conv. Value: {}",
                format_money((value * MICROS_PER_UNIT) as i64, &currency)
            );
        }
        md.push('\n');
    }
    if terms.len() > SEARCH_TERMS_SHOWN {
        let _ = writeln!(
            md,
            "*Showing top {} of {} search terms*\n*Use JSON format or filters to see all results*",
            SEARCH_TERMS_SHOWN,
            terms.len()
        );
    }

    Ok(Report::new(
        md,
        json!({
            "date_range": p.date_range.as_str(),
            "currency_code": currency,
            "total": terms.len(),
            "search_terms": terms,
        }),
    ))
}

/// Content and a short preview of an asset row, by asset type.
fn asset_content(row: &Value) -> (String, String) {
    match str_at(row, "asset.type").as_str() {
        "TEXT" => {
            let text = opt_str_at(row, "asset.textAsset.text").unwrap_or_else(|| "N/A".into());
            let preview = clip(&text, 100);
            (text, preview)
        }
        "IMAGE" => (
            opt_str_at(row, "asset.imageAsset.fullSize.url")
                .unwrap_or_else(|| "Image (URL not available)".into()),
            "🖼️ Image".to_string(),
        ),
        "YOUTUBE_VIDEO" => match opt_str_at(row, "asset.youtubeVideoAsset.youtubeVideoId") {
            Some(video) => (
                format!("https://youtube.com/watch?v={}", video),
                format!("📹 Video: {}", clip(&video, 20)),
            ),
            None => ("YouTube Video".to_string(), "📹 Video".to_string()),
        },
        other => (format!("{} asset", other), other.to_string()),
    }
}

fn label_icon(label: &str) -> &'static str {
    match label {
        "BEST" => "🏆",
        "GOOD" => "✅",
        "LOW" => "⚠️",
        "LEARNING" => "🔄",
        "PENDING" => "⏳",
        _ => "❓",
    }
}

pub(crate) fn approval_icon(status: &str) -> &'static str {
    match status {
        "APPROVED" => "✅",
        "DISAPPROVED" => "❌",
        "APPROVED_LIMITED" | "LIMITED" | "AREA_OF_INTEREST_ONLY" => "⚠️",
        "UNDER_REVIEW" | "REVIEW_IN_PROGRESS" => "🔍",
        _ => "❓",
    }
}

pub(crate) fn get_asset_performance(
    api: &dyn AdsApi,
    p: GetAssetPerformanceInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let mut query = Query::select(&[
        "asset_group_asset.resource_name",
        "asset_group_asset.asset",
        "asset_group_asset.field_type",
        "asset_group_asset.performance_label",
        "asset_group_asset.policy_summary.approval_status",
        "asset_group_asset.policy_summary.review_status",
        "asset.type",
        "asset.name",
        "asset.text_asset.text",
        "asset.image_asset.full_size.url",
        "asset.youtube_video_asset.youtube_video_id",
        "asset_group.id",
        "asset_group.name",
        "campaign.id",
        "campaign.name",
        "metrics.impressions",
        "metrics.clicks",
        "metrics.conversions",
    ])
    .from("asset_group_asset")
    .filter(format!("campaign.id = {}", p.campaign_id))
    .filter(p.date_range.gaql_condition(today()))
    .filter_opt(p.asset_group_id.as_ref(), |g| format!("asset_group.id = {}", g))
    .filter_opt(p.asset_type_filter, |f| format!("asset_group_asset.field_type = '{}'", f))
    .filter("asset_group_asset.status != 'REMOVED'");
    if p.min_impressions > 0 {
        query = query.filter(format!("metrics.impressions >= {}", p.min_impressions));
    }
    let rows = search(api, &id, &query.limit(p.limit))?;

    if rows.is_empty() {
        return Ok(Report::new(
            format!(
                "No assets found for campaign {}. Make sure this is a Performance Max campaign.",
                p.campaign_id
            ),
            json!({"campaign_id": p.campaign_id, "total": 0, "assets": [], "summary_by_label": {}}),
        ));
    }

    let campaign_name = str_at(&rows[0], "campaign.name");
    let assets: Vec<Value> = rows
        .iter()
        .map(|row| {
            let (content, preview) = asset_content(row);
            let or_unknown = |path: &str| opt_str_at(row, path).unwrap_or_else(|| "UNKNOWN".into());
            json!({
                "asset_group_asset": str_at(row, "assetGroupAsset.resourceName"),
                "asset_id": str_at(row, "assetGroupAsset.asset"),
                "asset_type": str_at(row, "asset.type"),
                "field_type": or_unknown("assetGroupAsset.fieldType"),
                "performance_label": or_unknown("assetGroupAsset.performanceLabel"),
                "approval_status": or_unknown("assetGroupAsset.policySummary.approvalStatus"),
                "review_status": or_unknown("assetGroupAsset.policySummary.reviewStatus"),
                "content": content,
                "preview": preview,
                "asset_name": str_at(row, "asset.name"),
                "asset_group_id": str_at(row, "assetGroup.id"),
                "asset_group_name": str_at(row, "assetGroup.name"),
                "campaign_id": str_at(row, "campaign.id"),
                "campaign_name": str_at(row, "campaign.name"),
                "impressions": i64_at(row, "metrics.impressions"),
                "clicks": i64_at(row, "metrics.clicks"),
                "conversions": f64_at(row, "metrics.conversions"),
            })
        })
        .collect();

    let mut by_label: BTreeMap<String, Vec<&Value>> = BTreeMap::new();
    for asset in &assets {
        let label = asset["performance_label"].as_str().unwrap_or("UNKNOWN");
        let label = if PERFORMANCE_LABELS.contains(&label) { label } else { "UNKNOWN" };
        by_label.entry(label.to_string()).or_default().push(asset);
    }
    let summary: serde_json::Map<String, Value> = by_label
        .iter()
        .map(|(label, items)| (label.clone(), json!(items.len())))
        .collect();

    let mut md = String::from("# Asset Performance Report\n\n");
    field(&mut md, "Campaign", format!("{} ({})", campaign_name, p.campaign_id));
    field(&mut md, "Date Range", p.date_range);
    field(&mut md, "Found", format!("{} asset(s)", assets.len()));
    md.push_str("\n## Performance Summary\n");
    for label in PERFORMANCE_LABELS {
        if let Some(items) = by_label.get(label) {
            field(&mut md, label, format!("{} asset(s)", items.len()));
        }
    }
    md.push('\n');
    for label in PERFORMANCE_LABELS {
        let Some(items) = by_label.get(label) else {
            continue;
        };
        let _ = writeln!(md, "## {} {} Performance\n", label_icon(label), label);
        for asset in items.iter().take(ASSETS_PER_LABEL) {
            let s = |key: &str| asset[key].as_str().unwrap_or_default().to_string();
            let _ = writeln!(md, "### {} - {}", s("asset_type"), s("field_type"));
            let _ = writeln!(md, "**Content**: {}", s("preview"));
            let _ = writeln!(md, "**Approval**: {} {}", approval_icon(&s("approval_status")), s("approval_status"));
            let _ = writeln!(md, "**Review Status**: {}", s("review_status"));
            let _ = writeln!(md, "**Asset Group**: {}", s("asset_group_name"));
            let _ = writeln!(
                md,
                "**Metrics**: {} impressions, {} clicks, {:.2} conversions",
                group_thousands(asset["impressions"].as_i64().unwrap_or(0)),
                group_thousands(asset["clicks"].as_i64().unwrap_or(0)),
                asset["conversions"].as_f64().unwrap_or(0.0)
            );
            let _ = writeln!(md, "**Resource**: {}\n", s("asset_group_asset"));
        }
    }

    Ok(Report::new(
        md,
        json!({
            "campaign_id": p.campaign_id,
            "campaign_name": campaign_name,
            "date_range": p.date_range.as_str(),
            "total": assets.len(),
            "assets": assets,
            "summary_by_label": summary,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_derive_ratios() {
        let mut totals = Totals::default();
        totals.add_row(&json!({"metrics": {
            "impressions": "1000", "clicks": "50", "costMicros": "25000000",
            "conversions": 5.0, "conversionsValue": 100.0
        }}));
        assert_eq!(totals.ctr(), 5.0);
        assert_eq!(totals.average_cpc_micros(), 500_000);
        assert_eq!(totals.conversion_rate(), 10.0);
        assert_eq!(totals.cost_per_conversion_micros(), 5_000_000);
        assert_eq!(totals.roas(), 4.0);
    }

    #[test]
    fn test_zero_denominators() {
        let totals = Totals::default();
        assert_eq!(totals.ctr(), 0.0);
        assert_eq!(totals.roas(), 0.0);
        assert_eq!(totals.cost_per_conversion_micros(), 0);
    }

    #[test]
    fn test_asset_content_by_type() {
        let video = json!({"asset": {"type": "YOUTUBE_VIDEO", "youtubeVideoAsset": {"youtubeVideoId": "abc"}}});
        assert_eq!(asset_content(&video).0, "https://youtube.com/watch?v=abc");
        let text = json!({"asset": {"type": "TEXT", "textAsset": {"text": "Fast Repairs"}}});
        assert_eq!(asset_content(&text), ("Fast Repairs".into(), "Fast Repairs".into()));
    }
}
