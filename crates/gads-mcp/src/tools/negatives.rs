use std::fmt::Write;

use gads_core::markdown::{field, Table};
use gads_core::rows::str_at;
use gads_core::{AdsError, MutateBatch, Query, Report, Service};
use gads_transport::AdsApi;
use gads_types::ids::composite_tail;
use gads_types::{CustomerId, NegativeKeywordLevel};
use serde_json::{json, Value};

use super::inputs::{AddNegativeKeywordsInput, ListNegativeKeywordsInput, RemoveNegativeKeywordsInput};
use super::{customer, search, submit};

pub(crate) fn list_negative_keywords(
    api: &dyn AdsApi,
    p: ListNegativeKeywordsInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;

    // An ad group filter narrows the listing to ad-group-level negatives.
    let campaign_level: Vec<Value> = if p.ad_group_id.is_none() {
        let query = Query::select(&[
            "campaign_criterion.criterion_id",
            "campaign_criterion.keyword.text",
            "campaign_criterion.keyword.match_type",
            "campaign.id",
            "campaign.name",
        ])
        .from("campaign_criterion")
        .filter("campaign_criterion.type = 'KEYWORD'")
        .filter("campaign_criterion.negative = TRUE")
        .filter_opt(p.campaign_id.as_ref(), |c| format!("campaign.id = {}", c))
        .limit(p.limit);
        search(api, &id, &query)?
            .iter()
            .map(|row| {
                json!({
                    "criterion_id": str_at(row, "campaignCriterion.criterionId"),
                    "keyword": str_at(row, "campaignCriterion.keyword.text"),
                    "match_type": str_at(row, "campaignCriterion.keyword.matchType"),
                    "campaign_id": str_at(row, "campaign.id"),
                    "campaign_name": str_at(row, "campaign.name"),
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    let query = Query::select(&[
        "ad_group_criterion.criterion_id",
        "ad_group_criterion.keyword.text",
        "ad_group_criterion.keyword.match_type",
        "ad_group.id",
        "ad_group.name",
        "campaign.id",
        "campaign.name",
    ])
    .from("ad_group_criterion")
    .filter("ad_group_criterion.type = 'KEYWORD'")
    .filter("ad_group_criterion.negative = TRUE")
    .filter_opt(p.campaign_id.as_ref(), |c| format!("campaign.id = {}", c))
    .filter_opt(p.ad_group_id.as_ref(), |g| format!("ad_group.id = {}", g))
    .limit(p.limit);
    let ad_group_level: Vec<Value> = search(api, &id, &query)?
        .iter()
        .map(|row| {
            json!({
                "criterion_id": str_at(row, "adGroupCriterion.criterionId"),
                "keyword": str_at(row, "adGroupCriterion.keyword.text"),
                "match_type": str_at(row, "adGroupCriterion.keyword.matchType"),
                "ad_group_id": str_at(row, "adGroup.id"),
                "ad_group_name": str_at(row, "adGroup.name"),
                "campaign_id": str_at(row, "campaign.id"),
                "campaign_name": str_at(row, "campaign.name"),
            })
        })
        .collect();

    let total = campaign_level.len() + ad_group_level.len();
    let s = |v: &Value, key: &str| v[key].as_str().unwrap_or_default().to_string();

    let mut md = format!("# Negative Keywords\n\n**Total**: {} negative keywords found\n\n", total);
    if !campaign_level.is_empty() {
        let _ = writeln!(md, "## Campaign-Level Negatives ({})\n", campaign_level.len());
        let mut table = Table::new(&["Keyword", "Match Type", "Campaign", "Campaign ID", "Criterion ID"]);
        for nk in &campaign_level {
            table.row([
                s(nk, "keyword"),
                s(nk, "match_type"),
                s(nk, "campaign_name"),
                s(nk, "campaign_id"),
                s(nk, "criterion_id"),
            ]);
        }
        md.push_str(&table.render());
        md.push('\n');
    }
    if !ad_group_level.is_empty() {
        let _ = writeln!(md, "## Ad Group-Level Negatives ({})\n", ad_group_level.len());
        let mut table = Table::new(&[
            "Keyword",
            "Match Type",
            "Ad Group",
            "Ad Group ID",
            "Campaign",
            "Campaign ID",
            "Criterion ID",
        ]);
        for nk in &ad_group_level {
            table.row([
                s(nk, "keyword"),
                s(nk, "match_type"),
                s(nk, "ad_group_name"),
                s(nk, "ad_group_id"),
                s(nk, "campaign_name"),
                s(nk, "campaign_id"),
                s(nk, "criterion_id"),
            ]);
        }
        md.push_str(&table.render());
        md.push('\n');
    }
    if total == 0 {
        md.push_str(
            "No negative keywords found. Consider adding negative keywords to:\n\n\
             - Block irrelevant search queries\n\
             - Reduce wasted ad spend\n\
             - Improve campaign relevance\n",
        );
    }

    Ok(Report::new(
        md,
        json!({
            "total": total,
            "campaign_level": campaign_level,
            "ad_group_level": ad_group_level,
        }),
    ))
}

/// Level, owning entity id and its resource name. Validation guarantees the
/// id matching the level is present.
fn scope<'a>(
    id: &CustomerId,
    level: NegativeKeywordLevel,
    campaign_id: Option<&'a str>,
    ad_group_id: Option<&'a str>,
) -> Result<(&'static str, &'a str, String), AdsError> {
    let missing = |field: &str| {
        AdsError::Unexpected(format!("{} missing for {} level", field, level))
    };
    match level {
        NegativeKeywordLevel::Campaign => {
            let campaign = campaign_id.ok_or_else(|| missing("campaign_id"))?;
            Ok(("Campaign", campaign, id.campaign(campaign)))
        }
        NegativeKeywordLevel::AdGroup => {
            let ad_group = ad_group_id.ok_or_else(|| missing("ad_group_id"))?;
            Ok(("Ad Group", ad_group, id.ad_group(ad_group)))
        }
    }
}

pub(crate) fn add_negative_keywords(
    api: &dyn AdsApi,
    p: AddNegativeKeywordsInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let (level_name, entity_id, parent) =
        scope(&id, p.level, p.campaign_id.as_deref(), p.ad_group_id.as_deref())?;
    let (service, parent_key) = match p.level {
        NegativeKeywordLevel::Campaign => (Service::CampaignCriterion, "campaign"),
        NegativeKeywordLevel::AdGroup => (Service::AdGroupCriterion, "adGroup"),
    };

    let mut batch = MutateBatch::new(id.clone());
    for keyword in &p.keywords {
        let mut criterion = json!({
            "negative": true,
            "keyword": {"text": keyword.trim(), "matchType": p.match_type.as_str()},
        });
        criterion[parent_key] = json!(parent);
        batch.create(service, format!("negative keyword '{}'", keyword.trim()), criterion);
    }
    let result = submit(api, &batch)?;
    let criterion_ids: Vec<String> = result
        .resource_names()
        .iter()
        .map(|name| composite_tail(name).to_string())
        .collect();

    let mut md = format!(
        "✅ **Added {} negative keywords successfully!**\n\n",
        p.keywords.len()
    );
    field(&mut md, "Level", level_name);
    field(&mut md, &format!("{} ID", level_name), entity_id);
    field(&mut md, "Match Type", p.match_type);
    md.push_str("\n### Keywords Added:\n");
    for keyword in &p.keywords {
        let _ = writeln!(md, "- {}", keyword.trim());
    }
    md.push_str(
        "\n**Effect**: Ads will no longer show for searches containing these terms.\n\n\
         **Tip**: Use `google_ads_get_search_terms` to find more irrelevant queries to block.\n",
    );

    Ok(Report::new(
        md,
        json!({
            "level": p.level.as_str(),
            "campaign_id": p.campaign_id,
            "ad_group_id": p.ad_group_id,
            "match_type": p.match_type.as_str(),
            "keywords_added": p.keywords.iter().map(|k| k.trim()).collect::<Vec<_>>(),
            "count": p.keywords.len(),
            "criterion_ids": criterion_ids,
            "resource_names": result.resource_names(),
        }),
    ))
}

pub(crate) fn remove_negative_keywords(
    api: &dyn AdsApi,
    p: RemoveNegativeKeywordsInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let (level_name, entity_id, _) =
        scope(&id, p.level, p.campaign_id.as_deref(), p.ad_group_id.as_deref())?;

    let mut batch = MutateBatch::new(id.clone());
    for criterion_id in &p.criterion_ids {
        let (service, name) = match p.level {
            NegativeKeywordLevel::Campaign => (
                Service::CampaignCriterion,
                id.campaign_criterion(entity_id, criterion_id),
            ),
            NegativeKeywordLevel::AdGroup => (
                Service::AdGroupCriterion,
                id.ad_group_criterion(entity_id, criterion_id),
            ),
        };
        batch.remove(service, format!("negative keyword {}", criterion_id), &name);
    }
    submit(api, &batch)?;

    let mut md = format!(
        "✅ **Removed {} negative keyword(s) successfully!**\n\n",
        p.criterion_ids.len()
    );
    field(&mut md, "Level", level_name);
    field(&mut md, &format!("{} ID", level_name), entity_id);
    field(&mut md, "Removed Criterion IDs", p.criterion_ids.join(", "));
    md.push_str(
        "\nYour ads may now show for searches that were previously blocked by these negatives.\n\n\
         **Tip**: Monitor search terms report to see if this increases irrelevant traffic.\n",
    );

    Ok(Report::new(
        md,
        json!({
            "level": p.level.as_str(),
            "campaign_id": p.campaign_id,
            "ad_group_id": p.ad_group_id,
            "removed": p.criterion_ids.len(),
            "criterion_ids": p.criterion_ids,
        }),
    ))
}
