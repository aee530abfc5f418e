use std::fmt::Write;

use gads_core::gaql::{api_date, quote};
use gads_core::markdown::field;
use gads_core::rows::{bool_at, i64_at, opt_f64_at, opt_str_at, str_at};
use gads_core::{AdsError, MutateBatch, Query, Report, Service};
use gads_transport::AdsApi;
use gads_types::money::format_money;
use gads_types::{AdvertisingChannelType, AssetFieldType, BiddingStrategyType, DayOfWeek};
use serde_json::{json, Value};

use super::assets::link_text_asset;
use super::inputs::{
    CreateCampaignInput, CreatePmaxCampaignInput, GetCampaignInput, ListCampaignsInput,
    SetCampaignScheduleInput, UpdateCampaignStatusInput,
};
use super::{account_money, currency_of, customer, search, submit};

const EU_POLITICAL_NONE: &str = "DOES_NOT_CONTAIN_EU_POLITICAL_ADVERTISING";

pub(crate) fn list_campaigns(api: &dyn AdsApi, p: ListCampaignsInput) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let query = Query::select(&[
        "campaign.id",
        "campaign.name",
        "campaign.status",
        "campaign.advertising_channel_type",
        "campaign.bidding_strategy_type",
        "campaign_budget.amount_micros",
        "campaign.start_date",
        "campaign.end_date",
        "campaign.optimization_score",
        "customer.currency_code",
    ])
    .from("campaign")
    .filter_opt(p.status_filter, |s| format!("campaign.status = '{}'", s))
    .order_by("campaign.id DESC");
    let rows = search(api, &id, &query)?;

    // The total is only known from the full result, so paging happens here.
    let total = rows.len();
    let offset = p.offset as usize;
    let page: Vec<&Value> = rows.iter().skip(offset).take(p.limit as usize).collect();
    let has_more = offset + page.len() < total;
    let next_offset = has_more.then(|| offset + page.len());

    let campaigns: Vec<Value> = page
        .iter()
        .map(|row| {
            json!({
                "id": str_at(row, "campaign.id"),
                "name": str_at(row, "campaign.name"),
                "status": str_at(row, "campaign.status"),
                "type": str_at(row, "campaign.advertisingChannelType"),
                "bidding_strategy": str_at(row, "campaign.biddingStrategyType"),
                "budget_micros": i64_at(row, "campaignBudget.amountMicros"),
                "currency_code": currency_of(row),
                "start_date": opt_str_at(row, "campaign.startDate"),
                "end_date": opt_str_at(row, "campaign.endDate"),
                "optimization_score": opt_f64_at(row, "campaign.optimizationScore"),
            })
        })
        .collect();

    let data = json!({
        "total": total,
        "count": campaigns.len(),
        "offset": offset,
        "campaigns": campaigns,
        "has_more": has_more,
        "next_offset": next_offset,
    });

    if campaigns.is_empty() {
        let message = match p.status_filter {
            Some(status) => format!("No campaigns found with status {}.", status),
            None => "No campaigns found.".to_string(),
        };
        return Ok(Report::new(message, data));
    }

    let mut md = String::from("# Campaigns\n\n");
    let _ = writeln!(
        md,
        "Found **{}** campaign(s), showing {} starting at offset {}\n",
        total,
        campaigns.len(),
        offset
    );
    for c in &campaigns {
        let text = |key: &str| c[key].as_str().unwrap_or_default().to_string();
        let _ = writeln!(md, "## {} ({})", text("name"), text("id"));
        field(&mut md, "Status", text("status"));
        field(&mut md, "Type", text("type"));
        field(&mut md, "Bidding", text("bidding_strategy"));
        field(
            &mut md,
            "Daily Budget",
            format_money(c["budget_micros"].as_i64().unwrap_or(0), &text("currency_code")),
        );
        if let Some(start) = c["start_date"].as_str() {
            field(&mut md, "Start Date", start);
        }
        if let Some(end) = c["end_date"].as_str() {
            field(&mut md, "End Date", end);
        }
        if let Some(score) = c["optimization_score"].as_f64() {
            field(&mut md, "Optimization Score", format!("{:.1}%", score * 100.0));
        }
        md.push('\n');
    }
    if let Some(next) = next_offset {
        let _ = writeln!(md, "*Use offset={} to see more results*", next);
    }

    Ok(Report::new(md, data))
}

pub(crate) fn get_campaign(api: &dyn AdsApi, p: GetCampaignInput) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let query = Query::select(&[
        "campaign.id",
        "campaign.name",
        "campaign.status",
        "campaign.advertising_channel_type",
        "campaign.advertising_channel_sub_type",
        "campaign.bidding_strategy_type",
        "campaign_budget.amount_micros",
        "campaign_budget.delivery_method",
        "campaign.start_date",
        "campaign.end_date",
        "campaign.network_settings.target_google_search",
        "campaign.network_settings.target_search_network",
        "campaign.network_settings.target_content_network",
        "campaign.network_settings.target_partner_search_network",
        "campaign.optimization_score",
        "customer.currency_code",
    ])
    .from("campaign")
    .filter(format!("campaign.id = {}", p.campaign_id));
    let rows = search(api, &id, &query)?;
    let row = rows
        .first()
        .ok_or_else(|| AdsError::not_found(format!("Campaign {} not found", p.campaign_id)))?;

    let network = |key: &str| bool_at(row, &format!("campaign.networkSettings.{}", key));
    let data = json!({
        "id": str_at(row, "campaign.id"),
        "name": str_at(row, "campaign.name"),
        "status": str_at(row, "campaign.status"),
        "type": str_at(row, "campaign.advertisingChannelType"),
        "sub_type": opt_str_at(row, "campaign.advertisingChannelSubType"),
        "bidding_strategy": str_at(row, "campaign.biddingStrategyType"),
        "budget": {
            "amount_micros": i64_at(row, "campaignBudget.amountMicros"),
            "delivery_method": opt_str_at(row, "campaignBudget.deliveryMethod"),
            "currency_code": currency_of(row),
        },
        "dates": {
            "start": opt_str_at(row, "campaign.startDate"),
            "end": opt_str_at(row, "campaign.endDate"),
        },
        "network_settings": {
            "google_search": network("targetGoogleSearch"),
            "search_network": network("targetSearchNetwork"),
            "content_network": network("targetContentNetwork"),
            "partner_search_network": network("targetPartnerSearchNetwork"),
        },
        "optimization_score": opt_f64_at(row, "campaign.optimizationScore"),
    });

    let text = |v: &Value| v.as_str().unwrap_or("N/A").to_string();
    let check = |v: &Value| if v.as_bool().unwrap_or(false) { "✓" } else { "✗" };

    let mut md = format!("# Campaign: {} ({})\n\n## Basic Settings\n", text(&data["name"]), text(&data["id"]));
    field(&mut md, "Status", text(&data["status"]));
    field(&mut md, "Type", text(&data["type"]));
    if let Some(sub) = data["sub_type"].as_str() {
        field(&mut md, "Sub-type", sub);
    }
    field(&mut md, "Bidding Strategy", text(&data["bidding_strategy"]));

    md.push_str("\n## Budget\n");
    field(
        &mut md,
        "Daily Budget",
        format_money(
            data["budget"]["amount_micros"].as_i64().unwrap_or(0),
            &text(&data["budget"]["currency_code"]),
        ),
    );
    field(&mut md, "Delivery Method", text(&data["budget"]["delivery_method"]));

    md.push_str("\n## Schedule\n");
    field(&mut md, "Start Date", text(&data["dates"]["start"]));
    field(&mut md, "End Date", data["dates"]["end"].as_str().unwrap_or("No end date"));

    md.push_str("\n## Network Targeting\n");
    let ns = &data["network_settings"];
    field(&mut md, "Google Search", check(&ns["google_search"]));
    field(&mut md, "Search Network", check(&ns["search_network"]));
    field(&mut md, "Display Network", check(&ns["content_network"]));
    field(&mut md, "Search Partners", check(&ns["partner_search_network"]));

    if let Some(score) = data["optimization_score"].as_f64() {
        md.push_str("\n## Optimization\n");
        field(&mut md, "Optimization Score", format!("{:.1}%", score * 100.0));
    }

    Ok(Report::new(md, data))
}

/// Bidding scheme field and body for a campaign payload.
fn bidding_scheme(
    strategy: BiddingStrategyType,
    target_cpa_micros: Option<i64>,
    target_roas: Option<f64>,
) -> (&'static str, Value) {
    let mut body = serde_json::Map::new();
    let key = match strategy {
        BiddingStrategyType::ManualCpc => "manualCpc",
        BiddingStrategyType::ManualCpm => "manualCpm",
        BiddingStrategyType::ManualCpv => "manualCpv",
        BiddingStrategyType::TargetSpend => "targetSpend",
        BiddingStrategyType::MaximizeConversions => {
            if let Some(cpa) = target_cpa_micros {
                body.insert("targetCpaMicros".into(), json!(cpa.to_string()));
            }
            "maximizeConversions"
        }
        BiddingStrategyType::TargetCpa => {
            if let Some(cpa) = target_cpa_micros {
                body.insert("targetCpaMicros".into(), json!(cpa.to_string()));
            }
            "targetCpa"
        }
        BiddingStrategyType::MaximizeConversionValue => {
            if let Some(roas) = target_roas {
                body.insert("targetRoas".into(), json!(roas));
            }
            "maximizeConversionValue"
        }
        BiddingStrategyType::TargetRoas => {
            if let Some(roas) = target_roas {
                body.insert("targetRoas".into(), json!(roas));
            }
            "targetRoas"
        }
        BiddingStrategyType::TargetImpressionShare => {
            body.insert("location".into(), json!("ANYWHERE_ON_PAGE"));
            body.insert("locationFractionMicros".into(), json!("1000000"));
            "targetImpressionShare"
        }
    };
    (key, Value::Object(body))
}

fn daily_budget(micros: i64) -> String {
    format!("{} per day", account_money(micros))
}

fn budget_payload(resource_name: &str, campaign_name: &str, amount_micros: i64) -> Value {
    json!({
        "resourceName": resource_name,
        "name": format!("{} Budget", campaign_name),
        "amountMicros": amount_micros.to_string(),
        "deliveryMethod": "STANDARD",
        "explicitlyShared": false,
    })
}

pub(crate) fn create_campaign(api: &dyn AdsApi, p: CreateCampaignInput) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let mut batch = MutateBatch::new(id.clone());
    let budget_rn = batch.temp_resource(Service::CampaignBudget);
    let campaign_rn = batch.temp_resource(Service::Campaign);

    let (scheme_key, scheme) = bidding_scheme(p.bidding_strategy, p.target_cpa_micros, p.target_roas);
    let mut campaign = json!({
        "resourceName": campaign_rn,
        "name": p.campaign_name,
        "status": "PAUSED",
        "advertisingChannelType": p.advertising_channel_type.as_str(),
        "campaignBudget": budget_rn,
        "networkSettings": {
            "targetGoogleSearch": p.target_google_search,
            "targetSearchNetwork": p.target_search_network,
            "targetContentNetwork": p.target_content_network,
            "targetPartnerSearchNetwork": false,
        },
        "containsEuPoliticalAdvertising": EU_POLITICAL_NONE,
    });
    campaign[scheme_key] = scheme;
    if let Some(start) = &p.start_date {
        campaign["startDate"] = json!(api_date(start));
    }
    if let Some(end) = &p.end_date {
        campaign["endDate"] = json!(api_date(end));
    }

    batch.create(
        Service::CampaignBudget,
        "campaign budget",
        budget_payload(&budget_rn, &p.campaign_name, p.budget_amount_micros),
    );
    batch.create(Service::Campaign, format!("campaign '{}'", p.campaign_name), campaign);

    let result = submit(api, &batch)?;
    let campaign_resource = result
        .resource_name(1)
        .ok_or_else(|| AdsError::Unexpected("mutate response carried no campaign".into()))?;
    let campaign_id = gads_types::ids::last_segment(&campaign_resource).to_string();
    tracing::info!(customer = %id, campaign_id = %campaign_id, "campaign created");

    let data = json!({
        "campaign_id": campaign_id,
        "name": p.campaign_name,
        "status": "PAUSED",
        "budget_amount_micros": p.budget_amount_micros,
        "advertising_channel_type": p.advertising_channel_type.as_str(),
        "bidding_strategy": p.bidding_strategy.as_str(),
        "start_date": p.start_date,
        "end_date": p.end_date,
        "resource_name": campaign_resource,
        "budget_resource_name": result.resource_name(0),
    });

    let mut md = String::from("✅ Campaign created successfully!\n\n");
    field(&mut md, "Campaign Name", &p.campaign_name);
    field(&mut md, "Campaign ID", &campaign_id);
    field(&mut md, "Status", "PAUSED (enable it when ready)");
    field(&mut md, "Budget", daily_budget(p.budget_amount_micros));
    field(&mut md, "Type", p.advertising_channel_type);
    field(&mut md, "Bidding", p.bidding_strategy);
    let _ = writeln!(md, "\nResource name: {}", campaign_resource);
    md.push_str(
        "\nNext steps:\n\
         1. Add ad groups to the campaign\n\
         2. Create ads and add keywords\n\
         3. Enable the campaign with google_ads_update_campaign_status\n",
    );

    Ok(Report::new(md, data))
}

pub(crate) fn create_pmax_campaign(
    api: &dyn AdsApi,
    p: CreatePmaxCampaignInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let mut batch = MutateBatch::new(id.clone());
    let budget_rn = batch.temp_resource(Service::CampaignBudget);
    let campaign_rn = batch.temp_resource(Service::Campaign);
    let asset_group_rn = batch.temp_resource(Service::AssetGroup);

    batch.create(
        Service::CampaignBudget,
        "campaign budget",
        budget_payload(&budget_rn, &p.campaign_name, p.budget_amount_micros),
    );

    let (scheme_key, scheme) = bidding_scheme(p.bidding_strategy, p.target_cpa_micros, p.target_roas);
    let mut campaign = json!({
        "resourceName": campaign_rn,
        "name": p.campaign_name,
        "status": "PAUSED",
        "advertisingChannelType": AdvertisingChannelType::PerformanceMax.as_str(),
        "campaignBudget": budget_rn,
        "containsEuPoliticalAdvertising": EU_POLITICAL_NONE,
    });
    campaign[scheme_key] = scheme;
    batch.create(Service::Campaign, format!("campaign '{}'", p.campaign_name), campaign);

    batch.create(
        Service::AssetGroup,
        format!("asset group '{}'", p.asset_group_name),
        json!({
            "resourceName": asset_group_rn,
            "name": p.asset_group_name,
            "campaign": campaign_rn,
            "finalUrls": p.final_urls,
            "status": "PAUSED",
        }),
    );

    let texts = p
        .headlines
        .iter()
        .map(|t| (AssetFieldType::Headline, t))
        .chain(p.long_headlines.iter().map(|t| (AssetFieldType::LongHeadline, t)))
        .chain(p.descriptions.iter().map(|t| (AssetFieldType::Description, t)))
        .chain(std::iter::once((AssetFieldType::BusinessName, &p.business_name)));
    let mut asset_count = 0usize;
    for (field_type, text) in texts {
        link_text_asset(&mut batch, &asset_group_rn, field_type, text);
        asset_count += 1;
    }

    let result = submit(api, &batch)?;
    let campaign_resource = result
        .resource_name(1)
        .ok_or_else(|| AdsError::Unexpected("mutate response carried no campaign".into()))?;
    let asset_group_resource = result
        .resource_name(2)
        .ok_or_else(|| AdsError::Unexpected("mutate response carried no asset group".into()))?;
    let campaign_id = gads_types::ids::last_segment(&campaign_resource).to_string();
    let asset_group_id = gads_types::ids::last_segment(&asset_group_resource).to_string();
    tracing::info!(
        customer = %id,
        campaign_id = %campaign_id,
        operations = batch.len(),
        "performance max campaign created"
    );

    let data = json!({
        "campaign_id": campaign_id,
        "asset_group_id": asset_group_id,
        "name": p.campaign_name,
        "asset_group_name": p.asset_group_name,
        "status": "PAUSED",
        "budget_amount_micros": p.budget_amount_micros,
        "bidding_strategy": p.bidding_strategy.as_str(),
        "text_assets_created": asset_count,
        "operations": batch.len(),
        "resource_name": campaign_resource,
        "asset_group_resource_name": asset_group_resource,
    });

    let mut md = String::from("✅ Performance Max campaign created successfully!\n\n");
    field(&mut md, "Campaign Name", &p.campaign_name);
    field(&mut md, "Campaign ID", &campaign_id);
    field(&mut md, "Asset Group", format!("{} ({})", p.asset_group_name, asset_group_id));
    field(&mut md, "Status", "PAUSED (campaign and asset group)");
    field(&mut md, "Budget", daily_budget(p.budget_amount_micros));
    field(&mut md, "Bidding", p.bidding_strategy);
    field(&mut md, "Text Assets", format!("{} created and linked", asset_count));
    let _ = writeln!(md, "\nAll {} operations were applied in a single atomic request.", batch.len());
    md.push_str(
        "\nNext steps:\n\
         1. Add image and logo assets to the asset group\n\
         2. Review the asset group in the Google Ads UI\n\
         3. Enable the campaign with google_ads_update_campaign_status\n",
    );

    Ok(Report::new(md, data))
}

pub(crate) fn update_campaign_status(
    api: &dyn AdsApi,
    p: UpdateCampaignStatusInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let resource_name = id.campaign(&p.campaign_id);
    let mut batch = MutateBatch::new(id);
    batch.update(
        Service::Campaign,
        format!("campaign {}", p.campaign_id),
        json!({"resourceName": resource_name, "status": p.status.as_str()}),
        &["status"],
    );
    submit(api, &batch)?;

    Ok(Report::new(
        format!(
            "✅ Campaign {} has been {} successfully.",
            p.campaign_id,
            p.status.past_tense()
        ),
        json!({
            "campaign_id": p.campaign_id,
            "status": p.status.as_str(),
            "resource_name": resource_name,
        }),
    ))
}

fn minute_of_hour(minute: i64) -> &'static str {
    match minute {
        15 => "FIFTEEN",
        30 => "THIRTY",
        45 => "FORTY_FIVE",
        _ => "ZERO",
    }
}

fn day_label(day: DayOfWeek) -> String {
    let wire = day.as_str();
    let mut out = wire[..1].to_string();
    out.push_str(&wire[1..].to_lowercase());
    out
}

pub(crate) fn set_campaign_schedule(
    api: &dyn AdsApi,
    p: SetCampaignScheduleInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let existing = search(
        api,
        &id,
        &Query::select(&["campaign_criterion.criterion_id"])
            .from("campaign_criterion")
            .filter(format!("campaign.id = {}", p.campaign_id))
            .filter(format!("campaign_criterion.type = {}", quote("AD_SCHEDULE")))
            .filter("campaign_criterion.status != 'REMOVED'"),
    )?;

    let campaign_rn = id.campaign(&p.campaign_id);
    let mut batch = MutateBatch::new(id.clone());
    for row in &existing {
        let criterion_id = str_at(row, "campaignCriterion.criterionId");
        batch.remove(
            Service::CampaignCriterion,
            format!("remove schedule {}", criterion_id),
            &id.campaign_criterion(&p.campaign_id, &criterion_id),
        );
    }
    for day in &p.days {
        batch.create(
            Service::CampaignCriterion,
            format!("schedule {}", day),
            json!({
                "campaign": campaign_rn,
                "status": "ENABLED",
                "adSchedule": {
                    "dayOfWeek": day.as_str(),
                    "startHour": p.start_hour,
                    "startMinute": minute_of_hour(p.start_minute),
                    "endHour": p.end_hour,
                    "endMinute": minute_of_hour(p.end_minute),
                },
            }),
        );
    }
    submit(api, &batch)?;

    let days: Vec<String> = p.days.iter().map(|d| day_label(*d)).collect();
    let hours = format!(
        "{:02}:{:02} - {:02}:{:02}",
        p.start_hour, p.start_minute, p.end_hour, p.end_minute
    );

    let mut md = String::from("✅ Campaign ad schedule updated successfully!\n\n");
    field(&mut md, "Campaign ID", &p.campaign_id);
    field(&mut md, "Active Days", days.join(", "));
    field(&mut md, "Active Hours", &hours);
    let _ = writeln!(md, "\nRemoved {} existing schedule(s)", existing.len());
    let _ = writeln!(md, "Created {} new schedule(s)", p.days.len());
    md.push_str("\nThe campaign will now only show ads during the specified days and hours.\n");

    Ok(Report::new(
        md,
        json!({
            "campaign_id": p.campaign_id,
            "days": p.days.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
            "active_hours": hours,
            "removed_schedules": existing.len(),
            "created_schedules": p.days.len(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bidding_scheme_carries_targets() {
        let (key, body) = bidding_scheme(BiddingStrategyType::TargetCpa, Some(2_500_000), None);
        assert_eq!(key, "targetCpa");
        assert_eq!(body["targetCpaMicros"], "2500000");

        let (key, body) = bidding_scheme(BiddingStrategyType::MaximizeConversionValue, None, Some(3.5));
        assert_eq!(key, "maximizeConversionValue");
        assert_eq!(body["targetRoas"], 3.5);

        let (key, body) = bidding_scheme(BiddingStrategyType::ManualCpc, Some(1), None);
        assert_eq!(key, "manualCpc");
        assert_eq!(body, json!({}));
    }

    #[test]
    fn test_minutes_and_day_labels() {
        assert_eq!(minute_of_hour(0), "ZERO");
        assert_eq!(minute_of_hour(45), "FORTY_FIVE");
        assert_eq!(day_label(DayOfWeek::Wednesday), "Wednesday");
    }
}
