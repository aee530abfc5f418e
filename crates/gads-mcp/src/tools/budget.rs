use std::collections::BTreeMap;
use std::fmt::Write;

use gads_core::gaql::id_list;
use gads_core::markdown::{clip, field, Table};
use gads_core::rows::{i64_at, opt_str_at, str_at};
use gads_core::{AdsError, MutateBatch, Query, Report, Service};
use gads_transport::AdsApi;
use gads_types::money::{format_money, format_units, micros_to_units};
use serde_json::{json, Value};

use super::inputs::{GetBudgetUtilizationInput, UpdateCampaignBudgetInput};
use super::performance::ratio;
use super::{currency_of, customer, search, submit, today};

/// Utilization at or above this share of the daily budget counts as budget-limited.
const BUDGET_LIMITED_PCT: f64 = 95.0;
/// Enabled campaigns below this share are reported as underspending.
const UNDERSPENDING_PCT: f64 = 50.0;

pub(crate) fn update_campaign_budget(
    api: &dyn AdsApi,
    p: UpdateCampaignBudgetInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let rows = search(
        api,
        &id,
        &Query::select(&[
            "campaign.id",
            "campaign.name",
            "campaign.campaign_budget",
            "campaign_budget.amount_micros",
            "customer.currency_code",
        ])
        .from("campaign")
        .filter(format!("campaign.id = {}", p.campaign_id)),
    )?;
    let row = rows
        .first()
        .ok_or_else(|| AdsError::not_found(format!("Campaign {} not found", p.campaign_id)))?;
    let budget_resource = opt_str_at(row, "campaign.campaignBudget").ok_or_else(|| {
        AdsError::Unexpected(format!("campaign {} has no budget attached", p.campaign_id))
    })?;
    let campaign_name = str_at(row, "campaign.name");
    let currency = currency_of(row);
    let old_micros = i64_at(row, "campaignBudget.amountMicros");

    let mut batch = MutateBatch::new(id);
    batch.update(
        Service::CampaignBudget,
        format!("budget of campaign {}", p.campaign_id),
        json!({
            "resourceName": budget_resource,
            "amountMicros": p.new_budget_micros.to_string(),
        }),
        &["amount_micros"],
    );
    submit(api, &batch)?;

    let old_amount = micros_to_units(old_micros);
    let new_amount = micros_to_units(p.new_budget_micros);
    let change = new_amount - old_amount;
    let change_pct = if old_amount > 0.0 {
        (new_amount / old_amount - 1.0) * 100.0
    } else {
        0.0
    };
    let icon = if change > 0.0 {
        "📈"
    } else if change < 0.0 {
        "📉"
    } else {
        "➡️"
    };
    let sign = if change >= 0.0 { "+" } else { "-" };

    let mut md = String::from("✅ **Campaign budget updated successfully!**\n\n");
    field(&mut md, "Campaign", format!("{} ({})", campaign_name, p.campaign_id));
    md.push('\n');
    let mut table = Table::new(&["", "Amount"]);
    table.row(["**Previous Budget**".to_string(), format!("{}/day", format_units(old_amount, &currency))]);
    table.row(["**New Budget**".to_string(), format!("{}/day", format_units(new_amount, &currency))]);
    table.row([
        "**Change**".to_string(),
        format!(
            "{} {}{} ({:+.1}%)",
            icon,
            sign,
            format_units(change.abs(), &currency),
            change_pct
        ),
    ]);
    md.push_str(&table.render());
    md.push_str(
        "\n**Note**: The new budget takes effect immediately. Google may spend up to 2x the daily \
         budget on high-traffic days, but won't exceed the monthly limit.\n",
    );

    Ok(Report::new(
        md,
        json!({
            "campaign_id": p.campaign_id,
            "campaign_name": campaign_name,
            "currency_code": currency,
            "budget_resource_name": budget_resource,
            "old_budget_micros": old_micros,
            "new_budget_micros": p.new_budget_micros,
            "old_budget": old_amount,
            "new_budget": new_amount,
            "change": change,
            "change_percent": change_pct,
        }),
    ))
}

#[derive(Debug, Clone)]
struct Utilization {
    campaign_id: String,
    name: String,
    status: String,
    daily_budget_micros: i64,
    total_cost_micros: i64,
    days: u32,
}

impl Utilization {
    fn avg_daily_spend_micros(&self) -> f64 {
        self.total_cost_micros as f64 / f64::from(self.days.max(1))
    }

    fn percent(&self) -> f64 {
        ratio(self.avg_daily_spend_micros(), self.daily_budget_micros as f64) * 100.0
    }

    fn to_json(&self) -> Value {
        json!({
            "campaign_id": self.campaign_id,
            "name": self.name,
            "status": self.status,
            "daily_budget_micros": self.daily_budget_micros,
            "daily_budget": micros_to_units(self.daily_budget_micros),
            "avg_daily_spend": self.avg_daily_spend_micros() / 1_000_000.0,
            "total_spend": micros_to_units(self.total_cost_micros),
            "utilization": (self.percent() * 10.0).round() / 10.0,
            "days": self.days,
        })
    }
}

fn utilization_icon(percent: f64) -> &'static str {
    if percent >= BUDGET_LIMITED_PCT {
        "🔴"
    } else if percent >= 70.0 {
        "🟡"
    } else {
        "🟢"
    }
}

pub(crate) fn get_budget_utilization(
    api: &dyn AdsApi,
    p: GetBudgetUtilizationInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let today = today();
    let query = Query::select(&[
        "campaign.id",
        "campaign.name",
        "campaign.status",
        "campaign_budget.amount_micros",
        "metrics.cost_micros",
        "customer.currency_code",
    ])
    .from("campaign")
    .filter("campaign.status != 'REMOVED'")
    .filter(p.date_range.gaql_condition(today))
    .filter_opt(p.campaign_ids.as_ref().filter(|ids| !ids.is_empty()), |ids| {
        format!("campaign.id IN {}", id_list(ids))
    });
    let rows = search(api, &id, &query)?;

    if rows.is_empty() {
        return Ok(Report::new(
            "No campaign data found for the specified criteria.",
            json!({"date_range": p.date_range.as_str(), "total_campaigns": 0, "campaigns": []}),
        ));
    }
    let currency = currency_of(&rows[0]);
    let days = p.date_range.days(today);

    let mut by_campaign: BTreeMap<String, Utilization> = BTreeMap::new();
    for row in &rows {
        let campaign_id = str_at(row, "campaign.id");
        let entry = by_campaign.entry(campaign_id.clone()).or_insert_with(|| Utilization {
            campaign_id,
            name: str_at(row, "campaign.name"),
            status: str_at(row, "campaign.status"),
            daily_budget_micros: i64_at(row, "campaignBudget.amountMicros"),
            total_cost_micros: 0,
            days,
        });
        entry.total_cost_micros += i64_at(row, "metrics.costMicros");
    }
    let mut campaigns: Vec<Utilization> = by_campaign.into_values().collect();
    campaigns.sort_by(|a, b| b.percent().total_cmp(&a.percent()));

    let total_budget: i64 = campaigns.iter().map(|c| c.daily_budget_micros).sum();
    let total_spend: f64 = campaigns.iter().map(|c| c.avg_daily_spend_micros()).sum();
    let overall = ratio(total_spend, total_budget as f64) * 100.0;
    let money = |micros: f64| format_money(micros as i64, &currency);

    let mut md = String::from("# Budget Utilization Report\n\n");
    field(&mut md, "Date Range", format!("{} ({} days)", p.date_range, days));
    field(&mut md, "Campaigns Analyzed", campaigns.len());
    md.push_str("\n## Summary\n");
    field(&mut md, "Total Daily Budget", money(total_budget as f64));
    field(&mut md, "Avg Daily Spend", money(total_spend));
    field(&mut md, "Overall Utilization", format!("{:.1}%", overall));
    md.push('\n');

    let limited: Vec<&Utilization> = campaigns
        .iter()
        .filter(|c| c.percent() >= BUDGET_LIMITED_PCT)
        .collect();
    if !limited.is_empty() {
        md.push_str("## ⚠️ Budget-Limited Campaigns\nThese campaigns may be missing traffic due to budget constraints:\n\n");
        for c in &limited {
            let _ = writeln!(
                md,
                "- **{}**: {:.1}% ({}/day)",
                c.name,
                c.percent(),
                money(c.daily_budget_micros as f64)
            );
        }
        md.push('\n');
    }
    let underspending: Vec<&Utilization> = campaigns
        .iter()
        .filter(|c| c.percent() < UNDERSPENDING_PCT && c.status == "ENABLED")
        .collect();
    if !underspending.is_empty() {
        md.push_str("## 📉 Underspending Campaigns\nThese campaigns have room to spend more:\n\n");
        for c in &underspending {
            let _ = writeln!(
                md,
                "- **{}**: {:.1}% ({} of {}/day)",
                c.name,
                c.percent(),
                money(c.avg_daily_spend_micros()),
                money(c.daily_budget_micros as f64)
            );
        }
        md.push('\n');
    }

    md.push_str("## All Campaigns\n\n");
    let mut table = Table::new(&["Campaign", "ID", "Status", "Daily Budget", "Avg Spend", "Utilization"]);
    for c in &campaigns {
        table.row([
            clip(&c.name, 30),
            c.campaign_id.clone(),
            c.status.clone(),
            money(c.daily_budget_micros as f64),
            money(c.avg_daily_spend_micros()),
            format!("{} {:.1}%", utilization_icon(c.percent()), c.percent()),
        ]);
    }
    md.push_str(&table.render());

    let ids = |list: &[&Utilization]| list.iter().map(|c| c.campaign_id.clone()).collect::<Vec<_>>();
    Ok(Report::new(
        md,
        json!({
            "date_range": p.date_range.as_str(),
            "days": days,
            "currency_code": currency,
            "total_campaigns": campaigns.len(),
            "summary": {
                "total_daily_budget": micros_to_units(total_budget),
                "total_avg_daily_spend": total_spend / 1_000_000.0,
                "overall_utilization": (overall * 10.0).round() / 10.0,
            },
            "budget_limited": ids(&limited),
            "underspending": ids(&underspending),
            "campaigns": campaigns.iter().map(Utilization::to_json).collect::<Vec<_>>(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign(budget: i64, cost: i64, days: u32) -> Utilization {
        Utilization {
            campaign_id: "1".into(),
            name: "Summer Sale".into(),
            status: "ENABLED".into(),
            daily_budget_micros: budget,
            total_cost_micros: cost,
            days,
        }
    }

    #[test]
    fn test_utilization_averages_over_days() {
        let c = campaign(10_000_000, 70_000_000, 7);
        assert_eq!(c.avg_daily_spend_micros(), 10_000_000.0);
        assert_eq!(c.percent(), 100.0);
        assert_eq!(utilization_icon(c.percent()), "🔴");
    }

    #[test]
    fn test_zero_budget_is_zero_percent() {
        let c = campaign(0, 5_000_000, 7);
        assert_eq!(c.percent(), 0.0);
        assert_eq!(utilization_icon(c.percent()), "🟢");
    }
}
