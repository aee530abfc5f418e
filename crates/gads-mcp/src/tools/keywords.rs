use std::fmt::Write;

use gads_core::markdown::{field, match_type_icon, status_icon};
use gads_core::rows::{opt_i64_at, str_at};
use gads_core::{AdsError, MutateBatch, Query, Report, Service};
use gads_transport::AdsApi;
use gads_types::ids::composite_tail;
use gads_types::money::format_money;
use gads_types::CustomerId;
use serde_json::{json, Value};

use super::inputs::{AddKeywordsInput, ListKeywordsInput, RemoveKeywordsInput};
use super::{account_money, currency_of, customer, search, submit};

pub(crate) fn list_keywords(api: &dyn AdsApi, p: ListKeywordsInput) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let query = Query::select(&[
        "ad_group_criterion.criterion_id",
        "ad_group_criterion.keyword.text",
        "ad_group_criterion.keyword.match_type",
        "ad_group_criterion.status",
        "ad_group_criterion.cpc_bid_micros",
        "ad_group.id",
        "ad_group.name",
        "customer.currency_code",
    ])
    .from("ad_group_criterion")
    .filter(format!("ad_group.id = {}", p.ad_group_id))
    .filter("ad_group_criterion.type = 'KEYWORD'")
    .filter("ad_group_criterion.status != 'REMOVED'")
    .order_by("ad_group_criterion.keyword.text")
    .limit(p.limit);
    let rows = search(api, &id, &query)?;

    let Some(first) = rows.first() else {
        return Ok(Report::new(
            format!("No keywords found for ad group {}", p.ad_group_id),
            json!({"ad_group_id": p.ad_group_id, "ad_group_name": null, "total": 0, "keywords": []}),
        ));
    };
    let ad_group_name = str_at(first, "adGroup.name");
    let currency = currency_of(first);
    let keywords: Vec<Value> = rows
        .iter()
        .map(|row| {
            let criterion_id = str_at(row, "adGroupCriterion.criterionId");
            json!({
                "id": criterion_id,
                "keyword_id": format!("{}~{}", p.ad_group_id, criterion_id),
                "text": str_at(row, "adGroupCriterion.keyword.text"),
                "match_type": str_at(row, "adGroupCriterion.keyword.matchType"),
                "status": str_at(row, "adGroupCriterion.status"),
                "cpc_bid_micros": opt_i64_at(row, "adGroupCriterion.cpcBidMicros"),
            })
        })
        .collect();

    let mut md = format!(
        "# Keywords for Ad Group: {}\n\nFound {} keyword(s)\n\n",
        ad_group_name,
        keywords.len()
    );
    for kw in &keywords {
        let s = |key: &str| kw[key].as_str().unwrap_or_default().to_string();
        let _ = writeln!(
            md,
            "## {} {} {}",
            status_icon(&s("status")),
            match_type_icon(&s("match_type")),
            s("text")
        );
        field(&mut md, "Match Type", s("match_type"));
        field(&mut md, "Status", s("status"));
        field(&mut md, "ID", s("keyword_id"));
        if let Some(bid) = kw["cpc_bid_micros"].as_i64().filter(|b| *b > 0) {
            field(&mut md, "CPC Bid", format_money(bid, &currency));
        }
        md.push('\n');
    }

    Ok(Report::new(
        md,
        json!({
            "ad_group_id": p.ad_group_id,
            "ad_group_name": ad_group_name,
            "currency_code": currency,
            "total": keywords.len(),
            "keywords": keywords,
        }),
    ))
}

pub(crate) fn add_keywords(api: &dyn AdsApi, p: AddKeywordsInput) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let ad_group = id.ad_group(&p.ad_group_id);
    let mut batch = MutateBatch::new(id);
    for text in &p.keywords {
        let mut criterion = json!({
            "adGroup": ad_group,
            "status": "ENABLED",
            "keyword": {"text": text.trim(), "matchType": p.match_type.as_str()},
        });
        if let Some(bid) = p.cpc_bid_micros {
            criterion["cpcBidMicros"] = json!(bid.to_string());
        }
        batch.create(Service::AdGroupCriterion, format!("keyword '{}'", text.trim()), criterion);
    }
    let result = submit(api, &batch)?;
    let criterion_ids: Vec<String> = result
        .resource_names()
        .iter()
        .map(|name| composite_tail(name).to_string())
        .collect();

    let mut md = format!("✅ Added {} keyword(s) successfully!\n\n", p.keywords.len());
    field(&mut md, "Ad Group ID", &p.ad_group_id);
    field(&mut md, "Match Type", p.match_type);
    field(
        &mut md,
        "CPC Bid",
        p.cpc_bid_micros
            .map(account_money)
            .unwrap_or_else(|| "Inherited from ad group".to_string()),
    );
    md.push_str("\n**Keywords added:**\n");
    for (i, text) in p.keywords.iter().enumerate() {
        let id_note = criterion_ids
            .get(i)
            .map(|c| format!(", ID {}~{}", p.ad_group_id, c))
            .unwrap_or_default();
        let _ = writeln!(md, "  - {} ({}{})", text.trim(), p.match_type, id_note);
    }

    Ok(Report::new(
        md,
        json!({
            "ad_group_id": p.ad_group_id,
            "match_type": p.match_type.as_str(),
            "cpc_bid_micros": p.cpc_bid_micros,
            "added": p.keywords.len(),
            "keywords": p.keywords.iter().map(|k| k.trim()).collect::<Vec<_>>(),
            "criterion_ids": criterion_ids,
            "resource_names": result.resource_names(),
        }),
    ))
}

/// `adGroupCriteria` resource name for a keyword id that passed validation.
fn keyword_resource(id: &CustomerId, keyword_id: &str, ad_group_id: Option<&str>) -> String {
    let keyword_id = keyword_id.trim();
    match (keyword_id.split_once('~'), ad_group_id) {
        (Some((ad_group, criterion)), _) => id.ad_group_criterion(ad_group, criterion),
        (None, Some(ad_group)) => id.ad_group_criterion(ad_group, keyword_id),
        (None, None) => id.child("adGroupCriteria", keyword_id),
    }
}

pub(crate) fn remove_keywords(api: &dyn AdsApi, p: RemoveKeywordsInput) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let names: Vec<String> = p
        .keyword_ids
        .iter()
        .map(|k| keyword_resource(&id, k, p.ad_group_id.as_deref()))
        .collect();
    let mut batch = MutateBatch::new(id);
    for name in &names {
        batch.remove(Service::AdGroupCriterion, format!("keyword {}", name), name);
    }
    submit(api, &batch)?;

    Ok(Report::new(
        format!("✅ Removed {} keyword(s) successfully.", names.len()),
        json!({"removed": names.len(), "resource_names": names}),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_resource_forms() {
        let id = CustomerId::parse("1234567890").unwrap();
        assert_eq!(
            keyword_resource(&id, "111~222", None),
            "customers/1234567890/adGroupCriteria/111~222"
        );
        assert_eq!(
            keyword_resource(&id, " 222 ", Some("111")),
            "customers/1234567890/adGroupCriteria/111~222"
        );
    }
}
