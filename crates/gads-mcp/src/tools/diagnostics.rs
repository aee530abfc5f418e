use std::collections::BTreeMap;
use std::fmt::Write;

use gads_core::markdown::{bar, clip, field, Table};
use gads_core::rows::{f64_at, get, i64_at, opt_i64_at, str_at, strings_at, texts_at};
use gads_core::{AdsError, Query, Report};
use gads_transport::AdsApi;
use gads_types::money::{format_money, group_thousands, micros_to_units};
use serde_json::{json, Value};

use super::inputs::{GetAdStrengthInput, GetKeywordQualityScoresInput, GetPolicyIssuesInput};
use super::{currency_of, customer, search};

/// Keywords below this Quality Score are listed for attention.
const LOW_QUALITY_SCORE: i64 = 5;
const ATTENTION_SHOWN: usize = 20;
const KEYWORDS_SHOWN: usize = 50;
const WEAK_ADS_SHOWN: usize = 10;

const STRENGTH_ORDER: [(&str, &str); 5] = [
    ("EXCELLENT", "🟢"),
    ("GOOD", "🟡"),
    ("AVERAGE", "🟠"),
    ("POOR", "🔴"),
    ("UNSPECIFIED", "⚪"),
];

const FLAGGED_APPROVALS: &str = "('DISAPPROVED', 'APPROVED_LIMITED', 'AREA_OF_INTEREST_ONLY')";

/// `ABOVE_AVERAGE` -> `ABO`, the column abbreviation used in QS tables.
fn component(value: &str) -> String {
    if value.is_empty() {
        "N/A".to_string()
    } else {
        value.chars().take(3).collect()
    }
}

fn quality_icon(score: i64) -> &'static str {
    if score >= 7 {
        "🟢"
    } else if score >= LOW_QUALITY_SCORE {
        "🟡"
    } else {
        "🔴"
    }
}

pub(crate) fn get_keyword_quality_scores(
    api: &dyn AdsApi,
    p: GetKeywordQualityScoresInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let query = Query::select(&[
        "ad_group_criterion.criterion_id",
        "ad_group_criterion.keyword.text",
        "ad_group_criterion.keyword.match_type",
        "ad_group_criterion.quality_info.quality_score",
        "ad_group_criterion.quality_info.creative_quality_score",
        "ad_group_criterion.quality_info.post_click_quality_score",
        "ad_group_criterion.quality_info.search_predicted_ctr",
        "ad_group.id",
        "ad_group.name",
        "campaign.id",
        "campaign.name",
        "metrics.impressions",
        "metrics.clicks",
        "metrics.cost_micros",
        "customer.currency_code",
    ])
    .from("keyword_view")
    .filter("ad_group_criterion.status != 'REMOVED'")
    .filter_opt(p.campaign_id.as_ref(), |c| format!("campaign.id = {}", c))
    .filter_opt(p.ad_group_id.as_ref(), |g| format!("ad_group.id = {}", g))
    .filter_opt((p.min_impressions > 0).then_some(p.min_impressions), |m| {
        format!("metrics.impressions >= {}", m)
    })
    .order_by("ad_group_criterion.quality_info.quality_score ASC")
    .limit(p.limit);
    let rows = search(api, &id, &query)?;

    if rows.is_empty() {
        return Ok(Report::new(
            "No keyword data found. Keywords need impressions for Quality Score to be calculated.",
            json!({"total": 0, "keywords": []}),
        ));
    }
    let currency = currency_of(&rows[0]);
    let keywords: Vec<Value> = rows
        .iter()
        .map(|row| {
            let info = "adGroupCriterion.qualityInfo";
            json!({
                "criterion_id": str_at(row, "adGroupCriterion.criterionId"),
                "keyword": str_at(row, "adGroupCriterion.keyword.text"),
                "match_type": str_at(row, "adGroupCriterion.keyword.matchType"),
                "quality_score": opt_i64_at(row, &format!("{}.qualityScore", info)).filter(|q| *q > 0),
                "expected_ctr": str_at(row, &format!("{}.searchPredictedCtr", info)),
                "ad_relevance": str_at(row, &format!("{}.creativeQualityScore", info)),
                "landing_page": str_at(row, &format!("{}.postClickQualityScore", info)),
                "impressions": i64_at(row, "metrics.impressions"),
                "clicks": i64_at(row, "metrics.clicks"),
                "cost_micros": i64_at(row, "metrics.costMicros"),
                "cost": micros_to_units(i64_at(row, "metrics.costMicros")),
                "ad_group_id": str_at(row, "adGroup.id"),
                "ad_group": str_at(row, "adGroup.name"),
                "campaign_id": str_at(row, "campaign.id"),
                "campaign": str_at(row, "campaign.name"),
            })
        })
        .collect();

    let mut distribution: BTreeMap<i64, usize> = BTreeMap::new();
    for kw in &keywords {
        if let Some(qs) = kw["quality_score"].as_i64() {
            *distribution.entry(qs).or_default() += 1;
        }
    }
    let s = |kw: &Value, key: &str| kw[key].as_str().unwrap_or_default().to_string();
    let score = |kw: &Value| {
        kw["quality_score"]
            .as_i64()
            .map(|q| q.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    };

    let mut md = format!("# Keyword Quality Scores\n\n**Keywords Analyzed**: {}\n\n", keywords.len());
    if !distribution.is_empty() {
        md.push_str("## Quality Score Distribution\n");
        for (qs, count) in &distribution {
            let _ = writeln!(
                md,
                "- {} **QS {}**: {} keywords {}",
                quality_icon(*qs),
                qs,
                count,
                bar(*count, 20)
            );
        }
        md.push('\n');
    }

    let low: Vec<&Value> = keywords
        .iter()
        .filter(|kw| kw["quality_score"].as_i64().is_some_and(|q| q < LOW_QUALITY_SCORE))
        .collect();
    if !low.is_empty() {
        let _ = writeln!(md, "## ⚠️ Keywords Needing Attention (QS < {})\n", LOW_QUALITY_SCORE);
        let mut table = Table::new(&["Keyword", "QS", "CTR", "Ad Rel", "LP", "Impressions"]);
        for kw in low.iter().copied().take(ATTENTION_SHOWN) {
            table.row([
                clip(&s(kw, "keyword"), 25),
                score(kw),
                component(&s(kw, "expected_ctr")),
                component(&s(kw, "ad_relevance")),
                component(&s(kw, "landing_page")),
                group_thousands(kw["impressions"].as_i64().unwrap_or_default()),
            ]);
        }
        md.push_str(&table.render());
        md.push('\n');
    }

    md.push_str("## All Keywords\n\n");
    let mut table = Table::new(&["Keyword", "Match", "QS", "CTR", "Ad Rel", "LP", "Impr", "Cost"]);
    for kw in keywords.iter().take(KEYWORDS_SHOWN) {
        table.row([
            clip(&s(kw, "keyword"), 20),
            s(kw, "match_type"),
            score(kw),
            component(&s(kw, "expected_ctr")),
            component(&s(kw, "ad_relevance")),
            component(&s(kw, "landing_page")),
            group_thousands(kw["impressions"].as_i64().unwrap_or_default()),
            format_money(kw["cost_micros"].as_i64().unwrap_or_default(), &currency),
        ]);
    }
    md.push_str(&table.render());
    md.push_str(
        "\n### Legend\n\
         - **CTR**: Expected Click-Through Rate\n\
         - **Ad Rel**: Ad Relevance\n\
         - **LP**: Landing Page Experience\n\
         - Values: ABO (Above Average), AVE (Average), BEL (Below Average)\n",
    );

    Ok(Report::new(
        md,
        json!({
            "total": keywords.len(),
            "currency_code": currency,
            "distribution": distribution
                .iter()
                .map(|(qs, count)| (qs.to_string(), json!(count)))
                .collect::<serde_json::Map<_, _>>(),
            "low_quality_criterion_ids": low.iter().map(|kw| s(*kw, "criterion_id")).collect::<Vec<_>>(),
            "keywords": keywords,
        }),
    ))
}

pub(crate) fn get_ad_strength(api: &dyn AdsApi, p: GetAdStrengthInput) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let query = Query::select(&[
        "ad_group_ad.ad.id",
        "ad_group_ad.ad.responsive_search_ad.headlines",
        "ad_group_ad.ad.responsive_search_ad.descriptions",
        "ad_group_ad.ad.final_urls",
        "ad_group_ad.ad_strength",
        "ad_group_ad.status",
        "ad_group.id",
        "ad_group.name",
        "campaign.id",
        "campaign.name",
        "metrics.impressions",
        "metrics.clicks",
        "metrics.ctr",
    ])
    .from("ad_group_ad")
    .filter("ad_group_ad.ad.type = 'RESPONSIVE_SEARCH_AD'")
    .filter("ad_group_ad.status != 'REMOVED'")
    .filter_opt(p.campaign_id.as_ref(), |c| format!("campaign.id = {}", c))
    .filter_opt(p.ad_group_id.as_ref(), |g| format!("ad_group.id = {}", g))
    .order_by("ad_group_ad.ad_strength ASC")
    .limit(p.limit);
    let rows = search(api, &id, &query)?;

    if rows.is_empty() {
        return Ok(Report::new(
            "No Responsive Search Ads found.",
            json!({"total": 0, "distribution": {}, "ads": []}),
        ));
    }

    let ads: Vec<Value> = rows
        .iter()
        .map(|row| {
            let rsa = "adGroupAd.ad.responsiveSearchAd";
            let headlines = texts_at(row, &format!("{}.headlines", rsa));
            let descriptions = texts_at(row, &format!("{}.descriptions", rsa));
            let strength = str_at(row, "adGroupAd.adStrength");
            json!({
                "ad_id": str_at(row, "adGroupAd.ad.id"),
                "ad_strength": if strength.is_empty() { "UNSPECIFIED".to_string() } else { strength },
                "status": str_at(row, "adGroupAd.status"),
                "headlines_count": headlines.len(),
                "descriptions_count": descriptions.len(),
                "headlines": headlines.iter().take(5).collect::<Vec<_>>(),
                "descriptions": descriptions.iter().take(2).collect::<Vec<_>>(),
                "final_url": strings_at(row, "adGroupAd.ad.finalUrls").into_iter().next().unwrap_or_default(),
                "impressions": i64_at(row, "metrics.impressions"),
                "clicks": i64_at(row, "metrics.clicks"),
                "ctr": f64_at(row, "metrics.ctr") * 100.0,
                "ad_group_id": str_at(row, "adGroup.id"),
                "ad_group": str_at(row, "adGroup.name"),
                "campaign_id": str_at(row, "campaign.id"),
                "campaign": str_at(row, "campaign.name"),
            })
        })
        .collect();

    let mut distribution: BTreeMap<String, usize> = BTreeMap::new();
    for ad in &ads {
        let strength = ad["ad_strength"].as_str().unwrap_or_default().to_string();
        *distribution.entry(strength).or_default() += 1;
    }

    let mut md = format!(
        "# Ad Strength Report\n\n**Responsive Search Ads Analyzed**: {}\n\n## Ad Strength Distribution\n",
        ads.len()
    );
    for (strength, icon) in STRENGTH_ORDER {
        if let Some(count) = distribution.get(strength) {
            let _ = writeln!(md, "- {} **{}**: {} ads", icon, strength, count);
        }
    }
    for (strength, count) in &distribution {
        if !STRENGTH_ORDER.iter().any(|(known, _)| known == strength) {
            let _ = writeln!(md, "- ⚪ **{}**: {} ads", strength, count);
        }
    }
    md.push('\n');

    let weak: Vec<&Value> = ads
        .iter()
        .filter(|ad| matches!(ad["ad_strength"].as_str(), Some("POOR" | "AVERAGE")))
        .collect();
    if !weak.is_empty() {
        md.push_str("## ⚠️ Ads Needing Improvement\n\n");
        for ad in weak.iter().take(WEAK_ADS_SHOWN) {
            let s = |key: &str| ad[key].as_str().unwrap_or_default().to_string();
            let n = |key: &str| ad[key].as_i64().unwrap_or_default();
            let _ = writeln!(md, "### Ad {} - {}", s("ad_id"), s("ad_strength"));
            field(&mut md, "Campaign", s("campaign"));
            field(&mut md, "Ad Group", s("ad_group"));
            field(&mut md, "Headlines", format!("{} (need 8-15 for best results)", n("headlines_count")));
            field(&mut md, "Descriptions", format!("{} (need 4 for best results)", n("descriptions_count")));
            field(
                &mut md,
                "Performance",
                format!(
                    "{} impr, {:.2}% CTR",
                    group_thousands(n("impressions")),
                    ad["ctr"].as_f64().unwrap_or_default()
                ),
            );
            md.push('\n');
        }
    }
    md.push_str(
        "## Recommendations to Improve Ad Strength\n\n\
         1. **Add more headlines**: Aim for 10-15 unique headlines\n\
         2. **Add more descriptions**: Use all 4 description slots\n\
         3. **Include keywords**: Add popular keywords in headlines\n\
         4. **Vary messaging**: Different selling points and CTAs\n\
         5. **Pin strategically**: Only pin if absolutely necessary\n",
    );

    Ok(Report::new(
        md,
        json!({
            "total": ads.len(),
            "distribution": distribution,
            "ads": ads,
        }),
    ))
}

/// `[{topic, type}]` from a `policyTopicEntries` array.
fn policy_topics(row: &Value, path: &str) -> Vec<Value> {
    get(row, path)
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .map(|entry| {
                    json!({
                        "topic": entry.get("topic").and_then(Value::as_str).unwrap_or("Unknown"),
                        "type": entry.get("type").and_then(Value::as_str).unwrap_or("Unknown"),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn get_policy_issues(
    api: &dyn AdsApi,
    p: GetPolicyIssuesInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;

    let mut ads: Vec<Value> = Vec::new();
    if p.include_ads {
        let query = Query::select(&[
            "ad_group_ad.ad.id",
            "ad_group_ad.ad.type",
            "ad_group_ad.status",
            "ad_group_ad.policy_summary.approval_status",
            "ad_group_ad.policy_summary.policy_topic_entries",
            "ad_group_ad.policy_summary.review_status",
            "ad_group.id",
            "ad_group.name",
            "campaign.id",
            "campaign.name",
        ])
        .from("ad_group_ad")
        .filter(format!("ad_group_ad.policy_summary.approval_status IN {}", FLAGGED_APPROVALS))
        .filter_opt(p.campaign_id.as_ref(), |c| format!("campaign.id = {}", c));
        ads = search(api, &id, &query)?
            .iter()
            .map(|row| {
                let policy = "adGroupAd.policySummary";
                json!({
                    "ad_id": str_at(row, "adGroupAd.ad.id"),
                    "ad_type": str_at(row, "adGroupAd.ad.type"),
                    "status": str_at(row, "adGroupAd.status"),
                    "approval_status": str_at(row, &format!("{}.approvalStatus", policy)),
                    "review_status": str_at(row, &format!("{}.reviewStatus", policy)),
                    "policy_topics": policy_topics(row, &format!("{}.policyTopicEntries", policy)),
                    "ad_group_id": str_at(row, "adGroup.id"),
                    "ad_group": str_at(row, "adGroup.name"),
                    "campaign_id": str_at(row, "campaign.id"),
                    "campaign": str_at(row, "campaign.name"),
                })
            })
            .collect();
    }

    let mut assets: Vec<Value> = Vec::new();
    let mut warning = None;
    if p.include_assets {
        // Asset-level approval is account-wide; the campaign filter does not apply.
        let query = Query::select(&[
            "asset.id",
            "asset.type",
            "asset.name",
            "asset.text_asset.text",
            "asset.policy_summary.approval_status",
            "asset.policy_summary.policy_topic_entries",
            "asset.policy_summary.review_status",
        ])
        .from("asset")
        .filter(format!("asset.policy_summary.approval_status IN {}", FLAGGED_APPROVALS));
        match search(api, &id, &query) {
            Ok(rows) => {
                assets = rows
                    .iter()
                    .map(|row| {
                        let asset_type = str_at(row, "asset.type");
                        let content = if asset_type == "TEXT" {
                            str_at(row, "asset.textAsset.text")
                        } else {
                            String::new()
                        };
                        json!({
                            "asset_id": str_at(row, "asset.id"),
                            "asset_type": asset_type,
                            "name": str_at(row, "asset.name"),
                            "content": content,
                            "approval_status": str_at(row, "asset.policySummary.approvalStatus"),
                            "review_status": str_at(row, "asset.policySummary.reviewStatus"),
                            "policy_topics": policy_topics(row, "asset.policySummary.policyTopicEntries"),
                        })
                    })
                    .collect();
            }
            Err(err) => {
                tracing::warn!(error = %err, "asset policy query failed");
                warning = Some(format!("Asset policy issues could not be retrieved: {}", err));
            }
        }
    }

    let total = ads.len() + assets.len();
    let data = json!({"total_issues": total, "ads": ads, "assets": assets});
    let with_warning = |report: Report| match &warning {
        Some(w) => report.with_warning(w.clone()),
        None => report,
    };

    if total == 0 {
        let mut md = String::from(
            "✅ **No Policy Issues Found!**\n\n\
             All your ads and assets are approved and serving normally.\n\n\
             **Tip**: Regularly check this report after making changes to catch issues early.\n",
        );
        if let Some(w) = &warning {
            let _ = write!(md, "\n⚠️ {}\n", w);
        }
        return Ok(with_warning(Report::new(md, data)));
    }

    let s = |v: &Value, key: &str| v[key].as_str().unwrap_or_default().to_string();
    let topics = |v: &Value| v["policy_topics"].as_array().cloned().unwrap_or_default();

    let mut md = format!("# Policy Issues Report\n\n**Total Issues**: {}\n\n", total);
    if !ads.is_empty() {
        let _ = writeln!(md, "## ⚠️ Ad Policy Issues ({})\n", ads.len());
        let (disapproved, limited): (Vec<&Value>, Vec<&Value>) =
            ads.iter().partition(|ad| ad["approval_status"] == "DISAPPROVED");
        if !disapproved.is_empty() {
            md.push_str("### 🔴 Disapproved Ads\n");
            for ad in disapproved.iter().copied() {
                let _ = writeln!(md, "\n**Ad {}** ({})", s(ad, "ad_id"), s(ad, "ad_type"));
                let _ = writeln!(md, "- Campaign: {}", s(ad, "campaign"));
                let _ = writeln!(md, "- Ad Group: {}", s(ad, "ad_group"));
                let ad_topics = topics(ad);
                if !ad_topics.is_empty() {
                    md.push_str("- Policy violations:\n");
                    for topic in &ad_topics {
                        let _ = writeln!(md, "  - {} ({})", s(topic, "topic"), s(topic, "type"));
                    }
                }
            }
            md.push('\n');
        }
        if !limited.is_empty() {
            md.push_str("### 🟡 Limited Ads\n");
            for ad in limited.iter().copied() {
                let _ = writeln!(md, "\n**Ad {}** - {}", s(ad, "ad_id"), s(ad, "approval_status"));
                let _ = writeln!(md, "- Campaign: {}", s(ad, "campaign"));
                for topic in &topics(ad) {
                    let _ = writeln!(md, "  - {}", s(topic, "topic"));
                }
            }
            md.push('\n');
        }
    }
    if !assets.is_empty() {
        let _ = writeln!(md, "## ⚠️ Asset Policy Issues ({})\n", assets.len());
        for asset in &assets {
            let icon = if asset["approval_status"] == "DISAPPROVED" { "🔴" } else { "🟡" };
            let _ = writeln!(md, "{} **Asset {}** ({})", icon, s(asset, "asset_id"), s(asset, "asset_type"));
            let content = s(asset, "content");
            if !content.is_empty() {
                let _ = writeln!(md, "- Content: \"{}\"", content);
            }
            let _ = writeln!(md, "- Status: {}", s(asset, "approval_status"));
            for topic in &topics(asset) {
                let _ = writeln!(md, "- Violation: {}", s(topic, "topic"));
            }
            md.push('\n');
        }
    }
    if let Some(w) = &warning {
        let _ = writeln!(md, "⚠️ {}\n", w);
    }
    md.push_str(
        "## How to Fix Policy Issues\n\n\
         1. **Review Google Ads policies**: https://support.google.com/adspolicy/\n\
         2. **Edit the ad/asset**: Remove violating content\n\
         3. **Request re-review**: After fixing, ads are automatically re-reviewed\n\
         4. **Appeal if needed**: Use the Google Ads appeal process for incorrect disapprovals\n",
    );

    Ok(with_warning(Report::new(md, data)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_abbreviation() {
        assert_eq!(component("ABOVE_AVERAGE"), "ABO");
        assert_eq!(component("BELOW_AVERAGE"), "BEL");
        assert_eq!(component(""), "N/A");
    }

    #[test]
    fn test_quality_icons() {
        assert_eq!(quality_icon(8), "🟢");
        assert_eq!(quality_icon(5), "🟡");
        assert_eq!(quality_icon(2), "🔴");
    }

    #[test]
    fn test_policy_topics_default_unknown() {
        let row = json!({"p": {"entries": [{"topic": "TRADEMARKS", "type": "PROHIBITED"}, {}]}});
        let topics = policy_topics(&row, "p.entries");
        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0]["topic"], "TRADEMARKS");
        assert_eq!(topics[1]["type"], "Unknown");
    }
}
