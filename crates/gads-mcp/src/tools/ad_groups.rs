use std::fmt::Write;

use gads_core::markdown::{field, status_icon};
use gads_core::rows::{opt_i64_at, str_at};
use gads_core::{AdsError, MutateBatch, Query, Report, Service};
use gads_transport::AdsApi;
use gads_types::ids::last_segment;
use gads_types::money::format_money;
use serde_json::{json, Value};

use super::inputs::{CreateAdGroupInput, ListAdGroupsInput, UpdateAdGroupStatusInput};
use super::{account_money, currency_of, customer, search, submit};

pub(crate) fn list_ad_groups(api: &dyn AdsApi, p: ListAdGroupsInput) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let query = Query::select(&[
        "ad_group.id",
        "ad_group.name",
        "ad_group.status",
        "ad_group.type",
        "ad_group.cpc_bid_micros",
        "campaign.id",
        "campaign.name",
        "customer.currency_code",
    ])
    .from("ad_group")
    .filter(format!("campaign.id = {}", p.campaign_id))
    .filter_opt(p.status_filter, |s| format!("ad_group.status = '{}'", s))
    .order_by("ad_group.name")
    .limit(p.limit);
    let rows = search(api, &id, &query)?;

    let ad_groups: Vec<Value> = rows
        .iter()
        .map(|row| {
            json!({
                "id": str_at(row, "adGroup.id"),
                "name": str_at(row, "adGroup.name"),
                "status": str_at(row, "adGroup.status"),
                "type": str_at(row, "adGroup.type"),
                "cpc_bid_micros": opt_i64_at(row, "adGroup.cpcBidMicros"),
                "campaign_id": str_at(row, "campaign.id"),
                "campaign_name": str_at(row, "campaign.name"),
            })
        })
        .collect();
    let Some(first) = rows.first() else {
        return Ok(Report::new(
            format!("No ad groups found for campaign {}", p.campaign_id),
            json!({"campaign_id": p.campaign_id, "total": 0, "ad_groups": []}),
        ));
    };
    let currency = currency_of(first);

    let mut md = format!(
        "# Ad Groups for Campaign {}\n\nFound {} ad group(s)\n\n",
        str_at(first, "campaign.name"),
        ad_groups.len()
    );
    for ag in &ad_groups {
        let s = |key: &str| ag[key].as_str().unwrap_or_default().to_string();
        let _ = writeln!(md, "## {} {} ({})", status_icon(&s("status")), s("name"), s("id"));
        field(&mut md, "Status", s("status"));
        field(&mut md, "Type", s("type"));
        if let Some(bid) = ag["cpc_bid_micros"].as_i64().filter(|b| *b > 0) {
            field(&mut md, "CPC Bid", format_money(bid, &currency));
        }
        md.push('\n');
    }

    Ok(Report::new(
        md,
        json!({
            "campaign_id": p.campaign_id,
            "currency_code": currency,
            "total": ad_groups.len(),
            "ad_groups": ad_groups,
        }),
    ))
}

pub(crate) fn create_ad_group(api: &dyn AdsApi, p: CreateAdGroupInput) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let mut ad_group = json!({
        "name": p.ad_group_name,
        "campaign": id.campaign(&p.campaign_id),
        "status": p.status.as_str(),
        "type": "SEARCH_STANDARD",
    });
    if let Some(bid) = p.cpc_bid_micros {
        ad_group["cpcBidMicros"] = json!(bid.to_string());
    }
    let mut batch = MutateBatch::new(id);
    batch.create(Service::AdGroup, format!("ad group '{}'", p.ad_group_name), ad_group);
    let result = submit(api, &batch)?;
    let resource_name = result
        .resource_name(0)
        .ok_or_else(|| AdsError::Unexpected("mutate response carried no ad group".into()))?;
    let ad_group_id = last_segment(&resource_name).to_string();

    let mut md = String::from("✅ Ad group created successfully!\n\n");
    field(&mut md, "Ad Group Name", &p.ad_group_name);
    field(&mut md, "Ad Group ID", &ad_group_id);
    field(&mut md, "Campaign ID", &p.campaign_id);
    field(&mut md, "Status", p.status);
    field(
        &mut md,
        "CPC Bid",
        p.cpc_bid_micros
            .map(account_money)
            .unwrap_or_else(|| "Not set (inherited from campaign)".to_string()),
    );
    md.push_str(
        "\nNext steps:\n\
         1. Add keywords with google_ads_add_keywords\n\
         2. Create ads with google_ads_create_responsive_search_ad\n\
         3. Enable the ad group when ready\n",
    );

    Ok(Report::new(
        md,
        json!({
            "ad_group_id": ad_group_id,
            "name": p.ad_group_name,
            "campaign_id": p.campaign_id,
            "status": p.status.as_str(),
            "cpc_bid_micros": p.cpc_bid_micros,
            "resource_name": resource_name,
        }),
    ))
}

pub(crate) fn update_ad_group_status(
    api: &dyn AdsApi,
    p: UpdateAdGroupStatusInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let resource_name = id.ad_group(&p.ad_group_id);
    let mut batch = MutateBatch::new(id);
    batch.update(
        Service::AdGroup,
        format!("ad group {}", p.ad_group_id),
        json!({"resourceName": resource_name, "status": p.status.as_str()}),
        &["status"],
    );
    submit(api, &batch)?;

    Ok(Report::new(
        format!(
            "✅ Ad group {} has been {} successfully.",
            p.ad_group_id,
            p.status.past_tense()
        ),
        json!({
            "ad_group_id": p.ad_group_id,
            "status": p.status.as_str(),
            "resource_name": resource_name,
        }),
    ))
}
