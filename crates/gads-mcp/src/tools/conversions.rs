use std::collections::BTreeMap;
use std::fmt::Write;

use gads_core::markdown::{clip, field, status_icon, Table};
use gads_core::rows::{bool_at, f64_at, str_at};
use gads_core::{AdsError, Query, Report};
use gads_transport::AdsApi;
use gads_types::money::{format_money, format_units, micros_to_units};
use serde_json::{json, Value};

use super::inputs::{GetCampaignConversionGoalsInput, GetConversionStatsInput, ListConversionActionsInput};
use super::performance::{round2, Totals};
use super::{currency_of, customer, search, today, yes_no};

/// The API attributes cost to campaigns, never to individual conversion actions.
const PER_ACTION_COST_NOTE: &str = "Cost and CPA are not available per conversion action in the \
     Google Ads API; the per-campaign table above carries them.";

pub(crate) fn list_conversion_actions(
    api: &dyn AdsApi,
    p: ListConversionActionsInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let mut query = Query::select(&[
        "conversion_action.id",
        "conversion_action.name",
        "conversion_action.status",
        "conversion_action.type",
        "conversion_action.category",
        "conversion_action.counting_type",
        "conversion_action.primary_for_goal",
    ])
    .from("conversion_action")
    .order_by("conversion_action.name");
    if !p.include_disabled {
        query = query.filter("conversion_action.status = 'ENABLED'");
    }
    let rows = search(api, &id, &query)?;

    if rows.is_empty() {
        return Ok(Report::new(
            "⚠️ **No conversion actions found!**\n\n\
             You don't have any conversion tracking set up. To track conversions:\n\n\
             1. **Google Ads UI**: Go to Tools > Measurement > Conversions\n\
             2. **Create conversion action**: Choose website, app, phone calls, or import\n\
             3. **Install tracking code**: Add the conversion tag to your website\n\n\
             Without conversion tracking, you can't measure ROI or optimize for conversions.",
            json!({"total": 0, "conversion_actions": []}),
        ));
    }

    let actions: Vec<Value> = rows
        .iter()
        .map(|row| {
            json!({
                "id": str_at(row, "conversionAction.id"),
                "name": str_at(row, "conversionAction.name"),
                "status": str_at(row, "conversionAction.status"),
                "type": str_at(row, "conversionAction.type"),
                "category": str_at(row, "conversionAction.category"),
                "counting_type": str_at(row, "conversionAction.countingType"),
                "primary_for_goal": bool_at(row, "conversionAction.primaryForGoal"),
            })
        })
        .collect();

    let mut md = format!("# Conversion Actions\n\n**Total Actions**: {}\n\n", actions.len());
    let mut table = Table::new(&["Status", "Name", "ID", "Category", "Counting", "Primary"]);
    for action in &actions {
        let s = |key: &str| action[key].as_str().unwrap_or_default().to_string();
        table.row([
            status_icon(&s("status")).to_string(),
            s("name"),
            s("id"),
            s("category"),
            s("counting_type"),
            yes_no(action["primary_for_goal"].as_bool().unwrap_or_default()).to_string(),
        ]);
    }
    md.push_str(&table.render());
    md.push_str("\n**Note**: Use conversion IDs for tracking and reporting configuration.\n");

    Ok(Report::new(
        md,
        json!({
            "total": actions.len(),
            "include_disabled": p.include_disabled,
            "conversion_actions": actions,
        }),
    ))
}

#[derive(Debug)]
struct CampaignConversions {
    name: String,
    status: String,
    totals: Totals,
}

pub(crate) fn get_conversion_stats(
    api: &dyn AdsApi,
    p: GetConversionStatsInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let date_condition = p.date_range.gaql_condition(today());
    let query = Query::select(&[
        "campaign.id",
        "campaign.name",
        "campaign.status",
        "metrics.conversions",
        "metrics.conversions_value",
        "metrics.cost_micros",
        "metrics.clicks",
        "metrics.impressions",
        "customer.currency_code",
    ])
    .from("campaign")
    .filter(date_condition.clone())
    .filter_opt(p.campaign_id.as_ref(), |c| format!("campaign.id = {}", c))
    .order_by("metrics.conversions DESC");
    let rows = search(api, &id, &query)?;

    if rows.is_empty() {
        let period = p.date_range.as_str().replace('_', " ").to_lowercase();
        return Ok(Report::new(
            format!(
                "⚠️ **No conversions found for {}**\n\n\
                 This could mean:\n\
                 1. No conversion actions have been triggered\n\
                 2. Conversion tracking is not properly set up\n\
                 3. Conversions are still in the attribution window\n\n\
                 **Next Steps**:\n\
                 - Check `google_ads_list_conversion_actions` to verify setup\n\
                 - Verify conversion tags are firing on your website\n\
                 - Wait 1-3 days for conversion attribution to complete",
                period
            ),
            json!({"date_range": p.date_range.as_str(), "campaigns": [], "totals": Value::Null}),
        ));
    }
    let currency = currency_of(&rows[0]);

    // Rows may arrive segmented; fold them per campaign.
    let mut by_campaign: BTreeMap<String, CampaignConversions> = BTreeMap::new();
    let mut totals = Totals::default();
    for row in &rows {
        let entry = by_campaign
            .entry(str_at(row, "campaign.id"))
            .or_insert_with(|| CampaignConversions {
                name: str_at(row, "campaign.name"),
                status: str_at(row, "campaign.status"),
                totals: Totals::default(),
            });
        entry.totals.add_row(row);
        totals.add_row(row);
    }
    let mut campaigns: Vec<(String, CampaignConversions)> = by_campaign.into_iter().collect();
    campaigns.sort_by(|a, b| b.1.totals.conversions.total_cmp(&a.1.totals.conversions));

    let actions = if p.by_conversion_action {
        let query = Query::select(&[
            "segments.conversion_action",
            "segments.conversion_action_name",
            "segments.conversion_action_category",
            "metrics.conversions",
            "metrics.conversions_value",
        ])
        .from("campaign")
        .filter(date_condition)
        .filter_opt(p.campaign_id.as_ref(), |c| format!("campaign.id = {}", c))
        .order_by("metrics.conversions DESC");
        let mut per_action: BTreeMap<String, (String, String, f64, f64)> = BTreeMap::new();
        for row in search(api, &id, &query)? {
            let entry = per_action
                .entry(str_at(&row, "segments.conversionAction"))
                .or_insert_with(|| {
                    (
                        str_at(&row, "segments.conversionActionName"),
                        str_at(&row, "segments.conversionActionCategory"),
                        0.0,
                        0.0,
                    )
                });
            entry.2 += f64_at(&row, "metrics.conversions");
            entry.3 += f64_at(&row, "metrics.conversionsValue");
        }
        let mut actions: Vec<Value> = per_action
            .into_iter()
            .map(|(resource_name, (name, category, conversions, value))| {
                json!({
                    "resource_name": resource_name,
                    "name": name,
                    "category": category,
                    "conversions": round2(conversions),
                    "value": round2(value),
                })
            })
            .collect();
        actions.sort_by(|a, b| {
            let conv = |v: &Value| v["conversions"].as_f64().unwrap_or_default();
            conv(b).total_cmp(&conv(a))
        });
        Some(actions)
    } else {
        None
    };

    let mut md = format!(
        "# Conversion Statistics\n\n**Date Range**: {}\n\n## Summary\n",
        p.date_range
    );
    field(&mut md, "Total Conversions", format!("{:.1}", totals.conversions));
    field(&mut md, "Total Value", format_units(totals.conversions_value, &currency));
    field(&mut md, "Total Cost", format_money(totals.cost_micros, &currency));
    field(
        &mut md,
        "Cost/Conversion (CPA)",
        format_money(totals.cost_per_conversion_micros(), &currency),
    );
    field(&mut md, "Conversion Rate", format!("{:.2}%", totals.conversion_rate()));
    field(
        &mut md,
        "ROAS",
        format!("{:.2}x ({:.0}%)", totals.roas(), totals.roas() * 100.0),
    );

    md.push_str("\n## By Campaign\n\n");
    let mut table = Table::new(&["Campaign", "Status", "Conv", "Value", "Cost", "CPA", "ROAS"]);
    for (_, c) in &campaigns {
        table.row([
            clip(&c.name, 20),
            status_icon(&c.status).to_string(),
            format!("{:.1}", c.totals.conversions),
            format_units(c.totals.conversions_value, &currency),
            format_money(c.totals.cost_micros, &currency),
            format_money(c.totals.cost_per_conversion_micros(), &currency),
            format!("{:.2}x", c.totals.roas()),
        ]);
    }
    md.push_str(&table.render());

    if let Some(actions) = &actions {
        md.push_str("\n## By Conversion Action\n\n");
        if actions.is_empty() {
            md.push_str("No conversions were attributed to any conversion action in this period.\n");
        } else {
            let mut table = Table::new(&["Conversion Action", "Category", "Conv", "Value"]);
            for action in actions {
                table.row([
                    action["name"].as_str().unwrap_or_default().to_string(),
                    action["category"].as_str().unwrap_or_default().to_string(),
                    format!("{:.1}", action["conversions"].as_f64().unwrap_or_default()),
                    format_units(action["value"].as_f64().unwrap_or_default(), &currency),
                ]);
            }
            md.push_str(&table.render());
        }
        let _ = writeln!(md, "\n**Note**: {}", PER_ACTION_COST_NOTE);
    }
    md.push_str("\n**Note**: Conversion data may have a 1-3 day delay due to attribution windows.\n");

    let campaign_json: Vec<Value> = campaigns
        .iter()
        .map(|(campaign_id, c)| {
            json!({
                "id": campaign_id,
                "name": c.name,
                "status": c.status,
                "conversions": round2(c.totals.conversions),
                "value": round2(c.totals.conversions_value),
                "cost_micros": c.totals.cost_micros,
                "cost": micros_to_units(c.totals.cost_micros),
                "cpa": micros_to_units(c.totals.cost_per_conversion_micros()),
                "roas": round2(c.totals.roas()),
                "clicks": c.totals.clicks,
                "impressions": c.totals.impressions,
            })
        })
        .collect();
    let mut data = json!({
        "date_range": p.date_range.as_str(),
        "currency_code": currency,
        "totals": {
            "conversions": round2(totals.conversions),
            "value": round2(totals.conversions_value),
            "cost_micros": totals.cost_micros,
            "cost": micros_to_units(totals.cost_micros),
            "cpa": micros_to_units(totals.cost_per_conversion_micros()),
            "conversion_rate": round2(totals.conversion_rate()),
            "roas": round2(totals.roas()),
            "clicks": totals.clicks,
            "impressions": totals.impressions,
        },
        "campaigns": campaign_json,
    });
    if let Some(actions) = actions {
        data["by_conversion_action"] = json!(actions);
        data["by_conversion_action_note"] = json!(PER_ACTION_COST_NOTE);
    }
    Ok(Report::new(md, data))
}

#[derive(Debug)]
struct CampaignGoals {
    name: String,
    channel_type: String,
    bidding_strategy: String,
    goals: Vec<(String, String, bool)>,
}

impl CampaignGoals {
    fn primary(&self) -> impl Iterator<Item = &(String, String, bool)> {
        self.goals.iter().filter(|g| g.2)
    }

    fn secondary(&self) -> impl Iterator<Item = &(String, String, bool)> {
        self.goals.iter().filter(|g| !g.2)
    }
}

fn goal_table(goals: &[&(String, String, bool)]) -> String {
    let mut table = Table::new(&["Category", "Origin"]);
    for (category, origin, _) in goals.iter().copied() {
        table.row([category.clone(), origin.clone()]);
    }
    table.render()
}

pub(crate) fn get_campaign_conversion_goals(
    api: &dyn AdsApi,
    p: GetCampaignConversionGoalsInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let query = Query::select(&[
        "campaign.id",
        "campaign.name",
        "campaign.advertising_channel_type",
        "campaign.bidding_strategy_type",
        "campaign_conversion_goal.category",
        "campaign_conversion_goal.origin",
        "campaign_conversion_goal.biddable",
    ])
    .from("campaign_conversion_goal")
    .filter("campaign.status != 'REMOVED'")
    .filter_opt(p.campaign_id.as_ref(), |c| format!("campaign.id = {}", c))
    .order_by("campaign.name, campaign_conversion_goal.biddable DESC");
    let rows = search(api, &id, &query)?;

    if rows.is_empty() {
        return Ok(Report::new(
            "⚠️ **No campaign conversion goals found!**\n\n\
             This could mean:\n\
             1. Campaigns are using account-level default conversion goals\n\
             2. No conversion actions are configured\n\
             3. The specified campaign doesn't exist\n\n\
             **Next Steps**:\n\
             - Check `google_ads_list_conversion_actions` to see available conversions\n\
             - Verify campaign IDs with `google_ads_list_campaigns`\n\
             - Check Google Ads UI: Tools > Measurement > Conversions",
            json!({"total_campaigns": 0, "campaigns": {}}),
        ));
    }

    // Keeps the query's name ordering.
    let mut order: Vec<String> = Vec::new();
    let mut by_campaign: BTreeMap<String, CampaignGoals> = BTreeMap::new();
    for row in &rows {
        let campaign_id = str_at(row, "campaign.id");
        let entry = by_campaign.entry(campaign_id.clone()).or_insert_with(|| {
            order.push(campaign_id.clone());
            CampaignGoals {
                name: str_at(row, "campaign.name"),
                channel_type: str_at(row, "campaign.advertisingChannelType"),
                bidding_strategy: str_at(row, "campaign.biddingStrategyType"),
                goals: Vec::new(),
            }
        });
        entry.goals.push((
            str_at(row, "campaignConversionGoal.category"),
            str_at(row, "campaignConversionGoal.origin"),
            bool_at(row, "campaignConversionGoal.biddable"),
        ));
    }

    let mut md = format!(
        "# Campaign Conversion Goals\n\n**Campaigns Analyzed**: {}\n\n",
        by_campaign.len()
    );
    let mut campaigns_json = serde_json::Map::new();
    for campaign_id in &order {
        let Some(c) = by_campaign.get(campaign_id) else {
            continue;
        };
        let primary: Vec<_> = c.primary().collect();
        let secondary: Vec<_> = c.secondary().collect();
        let _ = writeln!(md, "## {}", c.name);
        field(&mut md, "ID", campaign_id);
        field(&mut md, "Type", &c.channel_type);
        field(&mut md, "Bidding", &c.bidding_strategy);
        field(&mut md, "Primary Goals", primary.len());
        field(&mut md, "Secondary Goals", secondary.len());
        md.push('\n');
        if !primary.is_empty() {
            md.push_str("### ✅ Primary Conversions (Used for Bidding)\n");
            md.push_str(&goal_table(&primary));
            md.push('\n');
        }
        if !secondary.is_empty() {
            md.push_str("### 📊 Secondary Conversions (Observation Only)\n");
            md.push_str(&goal_table(&secondary));
            md.push('\n');
        }

        campaigns_json.insert(
            campaign_id.clone(),
            json!({
                "name": c.name,
                "channel_type": c.channel_type,
                "bidding_strategy": c.bidding_strategy,
                "primary_goals": primary.len(),
                "secondary_goals": secondary.len(),
                "goals": c.goals.iter().map(|(category, origin, biddable)| json!({
                    "category": category,
                    "origin": origin,
                    "biddable": biddable,
                })).collect::<Vec<_>>(),
            }),
        );
    }
    md.push_str(
        "---\n**Legend**:\n\
         - **Primary**: Used for Smart Bidding optimization\n\
         - **Secondary**: Tracked but not used for bidding\n\
         - **Origin**: GOOGLE_ADS (native), FIREBASE, ANALYTICS, etc.\n",
    );

    Ok(Report::new(
        md,
        json!({
            "total_campaigns": by_campaign.len(),
            "campaign_order": order,
            "campaigns": campaigns_json,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goals_split_by_biddable() {
        let c = CampaignGoals {
            name: "Summer Sale".into(),
            channel_type: "SEARCH".into(),
            bidding_strategy: "MAXIMIZE_CONVERSIONS".into(),
            goals: vec![
                ("PURCHASE".into(), "WEBSITE".into(), true),
                ("PAGE_VIEW".into(), "WEBSITE".into(), false),
                ("LEAD".into(), "GOOGLE_HOSTED".into(), true),
            ],
        };
        assert_eq!(c.primary().count(), 2);
        assert_eq!(c.secondary().count(), 1);
        let rendered = goal_table(&c.secondary().collect::<Vec<_>>());
        assert!(rendered.contains("PAGE_VIEW"));
        assert!(!rendered.contains("PURCHASE"));
    }
}
