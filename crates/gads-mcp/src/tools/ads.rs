use std::fmt::Write;

use gads_core::markdown::{clip, field, status_icon};
use gads_core::rows::{opt_str_at, str_at, strings_at, texts_at};
use gads_core::{AdsError, MutateBatch, Query, Report, Service};
use gads_transport::AdsApi;
use gads_types::ids::composite_tail;
use serde_json::{json, Value};

use super::inputs::{CreateResponsiveSearchAdInput, ListAdsInput, UpdateAdStatusInput};
use super::{customer, search, submit};

pub(crate) fn list_ads(api: &dyn AdsApi, p: ListAdsInput) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let query = Query::select(&[
        "ad_group_ad.ad.id",
        "ad_group_ad.ad.type",
        "ad_group_ad.status",
        "ad_group_ad.ad.final_urls",
        "ad_group_ad.ad.responsive_search_ad.headlines",
        "ad_group_ad.ad.responsive_search_ad.descriptions",
        "ad_group_ad.ad.responsive_search_ad.path1",
        "ad_group_ad.ad.responsive_search_ad.path2",
        "ad_group.id",
        "ad_group.name",
    ])
    .from("ad_group_ad")
    .filter(format!("ad_group.id = {}", p.ad_group_id))
    .filter_opt(p.status_filter, |s| format!("ad_group_ad.status = '{}'", s))
    .limit(p.limit);
    let rows = search(api, &id, &query)?;

    let Some(first) = rows.first() else {
        return Ok(Report::new(
            format!("No ads found for ad group {}", p.ad_group_id),
            json!({"ad_group_id": p.ad_group_id, "ad_group_name": null, "total": 0, "ads": []}),
        ));
    };
    let ad_group_name = str_at(first, "adGroup.name");
    let ads: Vec<Value> = rows
        .iter()
        .map(|row| {
            let rsa = "adGroupAd.ad.responsiveSearchAd";
            json!({
                "id": str_at(row, "adGroupAd.ad.id"),
                "type": str_at(row, "adGroupAd.ad.type"),
                "status": str_at(row, "adGroupAd.status"),
                "final_urls": strings_at(row, "adGroupAd.ad.finalUrls"),
                "headlines": texts_at(row, &format!("{}.headlines", rsa)),
                "descriptions": texts_at(row, &format!("{}.descriptions", rsa)),
                "path1": opt_str_at(row, &format!("{}.path1", rsa)),
                "path2": opt_str_at(row, &format!("{}.path2", rsa)),
            })
        })
        .collect();

    let mut md = format!(
        "# Ads for Ad Group: {}\n\nFound {} ad(s)\n\n",
        ad_group_name,
        ads.len()
    );
    for ad in &ads {
        let s = |key: &str| ad[key].as_str().unwrap_or_default().to_string();
        let list = |key: &str| -> Vec<String> {
            ad[key]
                .as_array()
                .map(|a| a.iter().filter_map(|v| v.as_str().map(String::from)).collect())
                .unwrap_or_default()
        };
        let _ = writeln!(md, "## {} Ad {}", status_icon(&s("status")), s("id"));
        field(&mut md, "Type", s("type"));
        field(&mut md, "Status", s("status"));
        let headlines = list("headlines");
        if !headlines.is_empty() {
            let shown: Vec<&str> = headlines.iter().take(3).map(String::as_str).collect();
            let more = if headlines.len() > 3 { "..." } else { "" };
            field(&mut md, "Headlines", format!("{}{}", shown.join(", "), more));
        }
        if let Some(description) = list("descriptions").first() {
            field(&mut md, "Descriptions", clip(description, 50));
        }
        if let Some(url) = list("final_urls").first() {
            field(&mut md, "URL", url);
        }
        md.push('\n');
    }

    Ok(Report::new(
        md,
        json!({
            "ad_group_id": p.ad_group_id,
            "ad_group_name": ad_group_name,
            "total": ads.len(),
            "ads": ads,
        }),
    ))
}

pub(crate) fn create_responsive_search_ad(
    api: &dyn AdsApi,
    p: CreateResponsiveSearchAdInput,
) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let text_assets = |texts: &[String]| -> Vec<Value> {
        texts.iter().map(|t| json!({"text": t.trim()})).collect()
    };
    let mut rsa = json!({
        "headlines": text_assets(&p.headlines),
        "descriptions": text_assets(&p.descriptions),
    });
    if let Some(path1) = &p.path1 {
        rsa["path1"] = json!(path1);
    }
    if let Some(path2) = &p.path2 {
        rsa["path2"] = json!(path2);
    }

    let mut batch = MutateBatch::new(id.clone());
    batch.create(
        Service::AdGroupAd,
        format!("responsive search ad in ad group {}", p.ad_group_id),
        json!({
            "adGroup": id.ad_group(&p.ad_group_id),
            "status": "PAUSED",
            "ad": {
                "finalUrls": p.final_urls,
                "responsiveSearchAd": rsa,
            },
        }),
    );
    let result = submit(api, &batch)?;
    let resource_name = result
        .resource_name(0)
        .ok_or_else(|| AdsError::Unexpected("mutate response carried no ad".into()))?;
    let ad_id = composite_tail(&resource_name).to_string();

    let mut md = String::from("✅ Responsive search ad created successfully!\n\n");
    field(&mut md, "Ad ID", &ad_id);
    field(&mut md, "Ad Group ID", &p.ad_group_id);
    field(&mut md, "Status", "PAUSED (enable when ready)");
    field(&mut md, "Headlines", format!("{} added", p.headlines.len()));
    field(&mut md, "Descriptions", format!("{} added", p.descriptions.len()));
    field(&mut md, "Final URL", p.final_urls.first().map(String::as_str).unwrap_or_default());
    md.push_str(
        "\nThe ad will automatically test different combinations to find the best performers.\n\n\
         Next step: Enable the ad group and campaign to start showing ads.\n",
    );

    Ok(Report::new(
        md,
        json!({
            "ad_id": ad_id,
            "ad_group_id": p.ad_group_id,
            "status": "PAUSED",
            "headlines": p.headlines.len(),
            "descriptions": p.descriptions.len(),
            "final_urls": p.final_urls,
            "path1": p.path1,
            "path2": p.path2,
            "resource_name": resource_name,
        }),
    ))
}

pub(crate) fn update_ad_status(api: &dyn AdsApi, p: UpdateAdStatusInput) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let resource_name = id.ad_group_ad(&p.ad_group_id, &p.ad_id);
    let mut batch = MutateBatch::new(id);
    batch.update(
        Service::AdGroupAd,
        format!("ad {}", p.ad_id),
        json!({"resourceName": resource_name, "status": p.status.as_str()}),
        &["status"],
    );
    submit(api, &batch)?;

    Ok(Report::new(
        format!("✅ Ad {} has been {} successfully.", p.ad_id, p.status.past_tense()),
        json!({
            "ad_id": p.ad_id,
            "ad_group_id": p.ad_group_id,
            "status": p.status.as_str(),
            "resource_name": resource_name,
        }),
    ))
}
