use std::collections::BTreeMap;
use std::fmt::Write;

use gads_core::gaql::{quote, quote_list};
use gads_core::markdown::field;
use gads_core::rows::{opt_f64_at, opt_i64_at, opt_str_at, str_at};
use gads_core::{AdsError, Query, Report};
use gads_transport::AdsApi;
use gads_types::ids::last_segment;
use gads_types::money::{format_decimal, micros_to_units};
use gads_types::CustomerId;
use serde_json::{json, Map, Value};

use super::inputs::{ApplyRecommendationInput, DismissRecommendationInput, ListRecommendationsInput};
use super::{account_money, customer, search};

/// Recommendations rendered per type in markdown.
const PER_TYPE_SHOWN: usize = 10;

fn type_heading(rec_type: &str) -> (&'static str, String) {
    let known = match rec_type {
        "CAMPAIGN_BUDGET" => Some(("💰", "Budget Recommendations")),
        "KEYWORD" => Some(("🔑", "Keyword Suggestions")),
        "RESPONSIVE_SEARCH_AD" => Some(("📝", "Ad Improvement")),
        "TARGET_CPA_OPT_IN" | "MAXIMIZE_CONVERSIONS_OPT_IN" => Some(("🎯", "Bidding Strategy")),
        "SITELINK_ASSET" => Some(("🔗", "Sitelink Suggestions")),
        "CALLOUT_ASSET" => Some(("📢", "Callout Suggestions")),
        _ => None,
    };
    match known {
        Some((icon, title)) => (icon, title.to_string()),
        None => ("💡", title_case(rec_type)),
    }
}

/// `MOVE_UNUSED_BUDGET` -> `Move Unused Budget`
fn title_case(value: &str) -> String {
    value
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let lower = w.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Base and potential metrics of `recommendation.impact`, plus their difference.
fn impact(row: &Value) -> Value {
    let mut out = Map::new();
    for (key, path) in [
        ("impressions", "impressions"),
        ("clicks", "clicks"),
        ("cost_micros", "costMicros"),
        ("conversions", "conversions"),
    ] {
        let base = opt_f64_at(row, &format!("recommendation.impact.baseMetrics.{}", path));
        let potential = opt_f64_at(row, &format!("recommendation.impact.potentialMetrics.{}", path));
        if base.is_none() && potential.is_none() {
            continue;
        }
        let base = base.unwrap_or_default();
        let potential = potential.unwrap_or(base);
        out.insert(
            key.to_string(),
            json!({"base": base, "potential": potential, "change": potential - base}),
        );
    }
    Value::Object(out)
}

fn details(row: &Value, rec_type: &str) -> Value {
    match rec_type {
        "CAMPAIGN_BUDGET" => {
            let budget = "recommendation.campaignBudgetRecommendation";
            json!({
                "current_budget_micros": opt_i64_at(row, &format!("{}.currentBudgetAmountMicros", budget)),
                "recommended_budget_micros": opt_i64_at(row, &format!("{}.recommendedBudgetAmountMicros", budget)),
            })
        }
        "KEYWORD" => {
            let keyword = "recommendation.keywordRecommendation.keyword";
            json!({
                "keyword": opt_str_at(row, &format!("{}.text", keyword)),
                "match_type": opt_str_at(row, &format!("{}.matchType", keyword)).unwrap_or_else(|| "BROAD".to_string()),
            })
        }
        _ => json!({}),
    }
}

pub(crate) fn list_recommendations(
    api: &dyn AdsApi,
    p: ListRecommendationsInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let types: Option<Vec<&str>> = p
        .recommendation_types
        .as_ref()
        .filter(|t| !t.is_empty())
        .map(|t| t.iter().map(|r| r.as_str()).collect());
    let query = Query::select(&[
        "recommendation.resource_name",
        "recommendation.type",
        "recommendation.impact",
        "recommendation.campaign",
        "recommendation.campaign_budget_recommendation",
        "recommendation.keyword_recommendation",
        "recommendation.text_ad_recommendation",
        "recommendation.responsive_search_ad_recommendation",
    ])
    .from("recommendation")
    .filter("recommendation.dismissed = FALSE")
    .filter_opt(p.campaign_id.as_ref(), |c| {
        format!("recommendation.campaign = {}", quote(&id.campaign(c)))
    })
    .filter_opt(types, |t| format!("recommendation.type IN {}", quote_list(&t)))
    .limit(p.limit);
    let rows = search(api, &id, &query)?;

    if rows.is_empty() {
        return Ok(Report::new(
            "✅ **No pending recommendations found!**\n\n\
             Your account appears to be well-optimized, or all recommendations have been applied/dismissed.\n\n\
             **Tip**: Check back regularly as Google generates new recommendations based on performance data.",
            json!({"total": 0, "recommendations": []}),
        ));
    }

    let recommendations: Vec<Value> = rows
        .iter()
        .map(|row| {
            let resource_name = str_at(row, "recommendation.resourceName");
            let rec_type = str_at(row, "recommendation.type");
            json!({
                "id": last_segment(&resource_name),
                "resource_name": resource_name,
                "type": rec_type,
                "campaign": opt_str_at(row, "recommendation.campaign"),
                "impact": impact(row),
                "details": details(row, &rec_type),
            })
        })
        .collect();

    let mut by_type: BTreeMap<String, Vec<&Value>> = BTreeMap::new();
    for rec in &recommendations {
        let rec_type = rec["type"].as_str().unwrap_or_default().to_string();
        by_type.entry(rec_type).or_default().push(rec);
    }

    let mut md = format!(
        "# Google Ads Recommendations\n\n**Total Recommendations**: {}\n\n",
        recommendations.len()
    );
    for (rec_type, recs) in &by_type {
        let (icon, title) = type_heading(rec_type);
        let _ = writeln!(md, "## {} {} ({})\n", icon, title, recs.len());
        for rec in recs.iter().take(PER_TYPE_SHOWN) {
            md.push_str("### Recommendation\n");
            field(&mut md, "Type", rec_type);
            field(&mut md, "ID", format!("`{}`", rec["id"].as_str().unwrap_or_default()));
            if let Some(campaign) = rec["campaign"].as_str() {
                field(&mut md, "Campaign", last_segment(campaign));
            }
            if let Some(details) = rec["details"].as_object() {
                for (key, value) in details {
                    if value.is_null() {
                        continue;
                    }
                    match (key.strip_suffix("_micros"), value.as_i64()) {
                        (Some(label), Some(micros)) => field(&mut md, &title_case(label), account_money(micros)),
                        _ => field(&mut md, &title_case(key), value.as_str().unwrap_or_default()),
                    }
                }
            }
            if let Some(metrics) = rec["impact"].as_object().filter(|m| !m.is_empty()) {
                md.push_str("- **Estimated Impact**:\n");
                for (metric, values) in metrics {
                    let change = values["change"].as_f64().unwrap_or_default();
                    let sign = if change >= 0.0 { "+" } else { "-" };
                    let rendered = match metric.strip_suffix("_micros") {
                        Some(_) => format!("{}{}", sign, format_decimal(micros_to_units(change.abs() as i64))),
                        None => format!("{}{:.0}", sign, change.abs()),
                    };
                    let label = title_case(metric.strip_suffix("_micros").unwrap_or(metric));
                    let _ = writeln!(md, "  - {}: {}", label, rendered);
                }
            }
            md.push('\n');
        }
    }
    md.push_str(
        "## How to Apply Recommendations\n\n\
         Use `google_ads_apply_recommendation` with the recommendation ID to apply.\n\
         Use `google_ads_dismiss_recommendation` to dismiss if not relevant.\n",
    );

    Ok(Report::new(
        md,
        json!({
            "total": recommendations.len(),
            "recommendations": recommendations,
        }),
    ))
}

/// Full resource name for an id that passed validation.
fn recommendation_resource(id: &CustomerId, recommendation_id: &str) -> String {
    let recommendation_id = recommendation_id.trim();
    if recommendation_id.starts_with("customers/") {
        recommendation_id.to_string()
    } else {
        id.recommendation(recommendation_id)
    }
}

pub(crate) fn apply_recommendation(
    api: &dyn AdsApi,
    p: ApplyRecommendationInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let resource_name = recommendation_resource(&id, &p.recommendation_id);
    tracing::debug!(customer = %id, recommendation = %resource_name, "apply recommendation");
    let applied = api.apply_recommendations(&id, std::slice::from_ref(&resource_name))?;

    let mut md = String::from("✅ **Recommendation applied successfully!**\n\n");
    field(&mut md, "Recommendation ID", &p.recommendation_id);
    field(&mut md, "Status", "Applied");
    md.push_str(
        "\nThe recommended changes have been made to your account. Changes may take a few minutes \
         to reflect in reporting.\n\n\
         **Next Steps**:\n\
         - Monitor performance over the next few days\n\
         - Check for any budget or bidding changes\n\
         - Review `google_ads_list_recommendations` for more suggestions\n",
    );

    Ok(Report::new(
        md,
        json!({
            "recommendation_id": p.recommendation_id,
            "resource_name": resource_name,
            "status": "APPLIED",
            "applied": applied,
        }),
    ))
}

pub(crate) fn dismiss_recommendation(
    api: &dyn AdsApi,
    p: DismissRecommendationInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let resource_name = recommendation_resource(&id, &p.recommendation_id);
    tracing::debug!(customer = %id, recommendation = %resource_name, "dismiss recommendation");
    let dismissed = api.dismiss_recommendations(&id, std::slice::from_ref(&resource_name))?;

    let mut md = String::from("✅ **Recommendation dismissed!**\n\n");
    field(&mut md, "Recommendation ID", &p.recommendation_id);
    field(&mut md, "Status", "Dismissed");
    md.push_str(
        "\nThis recommendation will no longer appear in your list.\n\n\
         **Note**: Similar recommendations may appear in the future if account conditions change.\n",
    );

    Ok(Report::new(
        md,
        json!({
            "recommendation_id": p.recommendation_id,
            "resource_name": resource_name,
            "status": "DISMISSED",
            "dismissed": dismissed,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("MOVE_UNUSED_BUDGET"), "Move Unused Budget");
        assert_eq!(title_case("recommended_budget"), "Recommended Budget");
    }

    #[test]
    fn test_recommendation_resource_forms() {
        let id = CustomerId::parse("1234567890").unwrap();
        assert_eq!(
            recommendation_resource(&id, "abc123"),
            "customers/1234567890/recommendations/abc123"
        );
        assert_eq!(
            recommendation_resource(&id, "customers/1234567890/recommendations/xyz"),
            "customers/1234567890/recommendations/xyz"
        );
    }

    #[test]
    fn test_impact_change() {
        let row = json!({"recommendation": {"impact": {
            "baseMetrics": {"clicks": 100.0, "costMicros": "5000000"},
            "potentialMetrics": {"clicks": 140.0, "costMicros": "7000000"},
        }}});
        let impact = impact(&row);
        assert_eq!(impact["clicks"]["change"], 40.0);
        assert_eq!(impact["cost_micros"]["change"], 2_000_000.0);
        assert!(impact.get("impressions").is_none());
    }

    #[test]
    fn test_unknown_type_heading() {
        assert_eq!(type_heading("MOVE_UNUSED_BUDGET"), ("💡", "Move Unused Budget".to_string()));
        assert_eq!(type_heading("KEYWORD").0, "🔑");
    }
}
