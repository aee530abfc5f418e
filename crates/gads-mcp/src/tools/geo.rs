use std::collections::HashMap;
use std::fmt::Write;

use gads_core::gaql::quote_list;
use gads_core::markdown::{clip, field, Table};
use gads_core::rows::{bool_at, opt_f64_at, opt_i64_at, str_at};
use gads_core::{AdsError, MutateBatch, Query, Report, Service};
use gads_transport::AdsApi;
use gads_types::ids::{composite_tail, geo_target_constant, last_segment};
use gads_types::GeoTargetType;
use serde_json::{json, Value};

use super::inputs::{GetGeoTargetsInput, RemoveGeoTargetsInput, SearchGeoTargetsInput, SetGeoTargetsInput};
use super::{customer, search, submit};

const COMMON_LOCATIONS: [(&str, &str); 5] = [
    ("2380", "Italy"),
    ("2840", "United States"),
    ("2826", "United Kingdom"),
    ("2276", "Germany"),
    ("2250", "France"),
];

fn common_locations(md: &mut String) {
    md.push_str("**Common Geo Target IDs**:\n");
    for (id, name) in COMMON_LOCATIONS {
        let _ = writeln!(md, "- **{}**: {}", id, name);
    }
}

/// `+20%` / `-15%` for a bid modifier, `None` when it leaves bids unchanged.
fn bid_adjustment(modifier: f64) -> String {
    if (modifier - 1.0).abs() < f64::EPSILON {
        "None".to_string()
    } else {
        format!("{:+.0}%", (modifier - 1.0) * 100.0)
    }
}

/// Canonical names for geo target constants, keyed by resource name.
fn resolve_names(
    api: &dyn AdsApi,
    id: &gads_types::CustomerId,
    constants: &[String],
) -> Result<HashMap<String, String>, AdsError> {
    if constants.is_empty() {
        return Ok(HashMap::new());
    }
    let query = Query::select(&[
        "geo_target_constant.resource_name",
        "geo_target_constant.canonical_name",
    ])
    .from("geo_target_constant")
    .filter(format!("geo_target_constant.resource_name IN {}", quote_list(constants)));
    Ok(search(api, id, &query)?
        .iter()
        .map(|row| {
            (
                str_at(row, "geoTargetConstant.resourceName"),
                str_at(row, "geoTargetConstant.canonicalName"),
            )
        })
        .collect())
}

pub(crate) fn get_geo_targets(api: &dyn AdsApi, p: GetGeoTargetsInput) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let query = Query::select(&[
        "campaign_criterion.criterion_id",
        "campaign_criterion.location.geo_target_constant",
        "campaign_criterion.negative",
        "campaign_criterion.bid_modifier",
    ])
    .from("campaign_criterion")
    .filter(format!("campaign.id = {}", p.campaign_id))
    .filter("campaign_criterion.type = 'LOCATION'");
    let rows = search(api, &id, &query)?;

    if rows.is_empty() {
        return Ok(Report::new(
            format!(
                "⚠️ **No geographic targeting found for campaign {}**\n\n\
                 This campaign may be:\n\
                 1. Targeting all locations (no restrictions)\n\
                 2. Using account-level geographic settings\n\
                 3. A Performance Max campaign with audience signals\n\n\
                 **Tip**: Use `google_ads_set_geo_targets` to add location targeting.",
                p.campaign_id
            ),
            json!({"campaign_id": p.campaign_id, "included": [], "excluded": []}),
        ));
    }

    let constants: Vec<String> = rows
        .iter()
        .map(|row| str_at(row, "campaignCriterion.location.geoTargetConstant"))
        .filter(|c| !c.is_empty())
        .collect();
    let mut warning = None;
    let names = resolve_names(api, &id, &constants).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "geo target name lookup failed");
        warning = Some(format!("Location names could not be resolved: {}", err));
        HashMap::new()
    });

    let (mut included, mut excluded) = (Vec::new(), Vec::new());
    for row in &rows {
        let constant = str_at(row, "campaignCriterion.location.geoTargetConstant");
        let location = json!({
            "criterion_id": str_at(row, "campaignCriterion.criterionId"),
            "geo_target_id": last_segment(&constant),
            "geo_target_constant": constant,
            "name": names.get(&constant),
            "bid_modifier": opt_f64_at(row, "campaignCriterion.bidModifier")
                .filter(|m| *m > 0.0)
                .unwrap_or(1.0),
        });
        if bool_at(row, "campaignCriterion.negative") {
            excluded.push(location);
        } else {
            included.push(location);
        }
    }

    let s = |v: &Value, key: &str| v[key].as_str().unwrap_or_default().to_string();
    let mut md = format!("# Geographic Targeting - Campaign {}\n\n", p.campaign_id);
    field(&mut md, "Targeted Locations", included.len());
    field(&mut md, "Excluded Locations", excluded.len());
    md.push('\n');
    if !included.is_empty() {
        md.push_str("## ✅ Targeted Locations\n\n");
        let mut table = Table::new(&["Location", "Geo Target ID", "Bid Adjustment", "Criterion ID"]);
        for loc in &included {
            table.row([
                s(loc, "name"),
                s(loc, "geo_target_id"),
                bid_adjustment(loc["bid_modifier"].as_f64().unwrap_or(1.0)),
                s(loc, "criterion_id"),
            ]);
        }
        md.push_str(&table.render());
        md.push('\n');
    }
    if !excluded.is_empty() {
        md.push_str("## ❌ Excluded Locations\n\n");
        let mut table = Table::new(&["Location", "Geo Target ID", "Criterion ID"]);
        for loc in &excluded {
            table.row([s(loc, "name"), s(loc, "geo_target_id"), s(loc, "criterion_id")]);
        }
        md.push_str(&table.render());
        md.push('\n');
    }
    if let Some(w) = &warning {
        let _ = writeln!(md, "⚠️ {}\n", w);
    }
    md.push_str("---\n");
    common_locations(&mut md);
    md.push_str("\nUse `google_ads_search_geo_targets` to find location IDs by name.\n");

    let report = Report::new(
        md,
        json!({
            "campaign_id": p.campaign_id,
            "included": included,
            "excluded": excluded,
        }),
    );
    Ok(match warning {
        Some(w) => report.with_warning(w),
        None => report,
    })
}

pub(crate) fn search_geo_targets(
    api: &dyn AdsApi,
    p: SearchGeoTargetsInput,
) -> Result<Report, AdsError> {
    // Suggestions are not scoped to an account; the id is still validated.
    customer(&p.customer_id)?;
    let mut request = json!({
        "locale": p.locale,
        "locationNames": {"names": [p.query.trim()]},
    });
    if let Some(country) = &p.country_code {
        request["countryCode"] = json!(country.to_uppercase());
    }
    tracing::debug!(query = %p.query, "suggest geo target constants");
    let suggestions = api.suggest_geo_targets(&request)?;

    let limit = usize::try_from(p.limit).unwrap_or(usize::MAX);
    let locations: Vec<Value> = suggestions
        .iter()
        .take(limit)
        .map(|suggestion| {
            let resource_name = str_at(suggestion, "geoTargetConstant.resourceName");
            json!({
                "id": last_segment(&resource_name),
                "resource_name": resource_name,
                "name": str_at(suggestion, "geoTargetConstant.name"),
                "canonical_name": str_at(suggestion, "geoTargetConstant.canonicalName"),
                "country_code": str_at(suggestion, "geoTargetConstant.countryCode"),
                "type": str_at(suggestion, "geoTargetConstant.targetType"),
                "status": str_at(suggestion, "geoTargetConstant.status"),
                "reach": opt_i64_at(suggestion, "reach"),
            })
        })
        .collect();

    if locations.is_empty() {
        let mut md = format!(
            "⚠️ **No locations found matching \"{}\"**\n\n\
             **Tips**:\n\
             - Check the spelling of the location name\n\
             - Try a broader name (country or region instead of a town)\n\
             - Drop the country_code filter\n\n",
            p.query
        );
        common_locations(&mut md);
        return Ok(Report::new(
            md,
            json!({"query": p.query, "total": 0, "locations": []}),
        ));
    }

    let s = |v: &Value, key: &str| v[key].as_str().unwrap_or_default().to_string();
    let mut md = format!(
        "# Location Search Results for \"{}\"\n\n**Results Found**: {}\n\n## Matching Locations\n\n",
        p.query,
        locations.len()
    );
    let mut table = Table::new(&["Location", "Type", "Country", "Reach", "ID (for targeting)"]);
    for loc in &locations {
        table.row([
            clip(&s(loc, "canonical_name"), 40),
            s(loc, "type"),
            s(loc, "country_code"),
            loc["reach"]
                .as_i64()
                .map(gads_types::money::group_thousands)
                .unwrap_or_else(|| "-".to_string()),
            format!("`{}`", s(loc, "id")),
        ]);
    }
    md.push_str(&table.render());
    let _ = write!(
        md,
        "\n## How to Use These IDs\n\n\
         Use `google_ads_set_geo_targets` with the location ID:\n\
         ```\n\
         location_ids: [\"{}\"]\n\
         ```\n",
        s(&locations[0], "id")
    );

    Ok(Report::new(
        md,
        json!({
            "query": p.query,
            "country_code": p.country_code,
            "locale": p.locale,
            "total": locations.len(),
            "locations": locations,
        }),
    ))
}

pub(crate) fn set_geo_targets(api: &dyn AdsApi, p: SetGeoTargetsInput) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let campaign = id.campaign(&p.campaign_id);
    let negative = p.target_type == GeoTargetType::Exclusion;

    let mut batch = MutateBatch::new(id);
    for location_id in &p.location_ids {
        batch.create(
            Service::CampaignCriterion,
            format!("location {}", location_id),
            json!({
                "campaign": campaign,
                "negative": negative,
                "location": {"geoTargetConstant": geo_target_constant(location_id)},
            }),
        );
    }
    let result = submit(api, &batch)?;
    let criterion_ids: Vec<String> = result
        .resource_names()
        .iter()
        .map(|name| composite_tail(name).to_string())
        .collect();

    let action = if negative { "excluded from" } else { "targeted in" };
    let mut md = String::from("✅ **Geographic targeting updated!**\n\n");
    field(&mut md, "Campaign ID", &p.campaign_id);
    field(
        &mut md,
        "Action",
        format!("{} location(s) {} campaign", p.location_ids.len(), action),
    );
    field(&mut md, "Location IDs", p.location_ids.join(", "));
    field(&mut md, "Criterion IDs", criterion_ids.join(", "));
    md.push_str(
        "\nThe changes take effect immediately. Your ads will now show (or not show)\n\
         in these locations based on user location and interest.\n\n\
         **Next Steps**:\n\
         - Verify with `google_ads_get_geo_targets`\n\
         - Monitor performance by location in the next few days\n",
    );

    Ok(Report::new(
        md,
        json!({
            "campaign_id": p.campaign_id,
            "locations_added": p.location_ids,
            "target_type": p.target_type.as_str(),
            "criterion_ids": criterion_ids,
            "resource_names": result.resource_names(),
        }),
    ))
}

pub(crate) fn remove_geo_targets(
    api: &dyn AdsApi,
    p: RemoveGeoTargetsInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let names: Vec<String> = p
        .criterion_ids
        .iter()
        .map(|criterion| id.campaign_criterion(&p.campaign_id, criterion))
        .collect();
    let mut batch = MutateBatch::new(id);
    for (criterion, name) in p.criterion_ids.iter().zip(&names) {
        batch.remove(Service::CampaignCriterion, format!("location criterion {}", criterion), name);
    }
    submit(api, &batch)?;

    let mut md = String::from("✅ **Geographic targeting removed!**\n\n");
    field(&mut md, "Campaign ID", &p.campaign_id);
    field(&mut md, "Removed Criteria", p.criterion_ids.join(", "));
    md.push_str(
        "\nThe location targeting has been removed from this campaign.\n\n\
         **Warning**: If no other geo targets remain, the campaign may now\n\
         target all locations. Verify with `google_ads_get_geo_targets`.\n",
    );

    Ok(Report::new(
        md,
        json!({
            "campaign_id": p.campaign_id,
            "removed": p.criterion_ids.len(),
            "criterion_ids": p.criterion_ids,
            "resource_names": names,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bid_adjustment() {
        assert_eq!(bid_adjustment(1.0), "None");
        assert_eq!(bid_adjustment(1.2), "+20%");
        assert_eq!(bid_adjustment(0.85), "-15%");
    }
}
