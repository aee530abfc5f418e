use std::fmt::Write;

use gads_core::markdown::field;
use gads_core::rows::{bool_at, str_at};
use gads_core::{AdsError, Query, Report};
use gads_transport::{AdsApi, ApiErrorKind};
use gads_types::ids::last_segment;
use gads_types::CustomerId;
use serde_json::{json, Value};

use super::inputs::{GetAccountInfoInput, ListAccountsInput};
use super::{customer, search, yes_no};

const ACCOUNT_FIELDS: &[&str] = &[
    "customer.id",
    "customer.descriptive_name",
    "customer.currency_code",
    "customer.time_zone",
    "customer.status",
];

fn account_query(id: &CustomerId, fields: &[&str]) -> Query {
    Query::select(fields)
        .from("customer")
        .filter(format!("customer.id = {}", id))
}

pub(crate) fn list_accounts(api: &dyn AdsApi, p: ListAccountsInput) -> Result<Report, AdsError> {
    let resource_names = api.list_accessible_customers()?;
    if resource_names.is_empty() {
        return Ok(Report::new(
            "No accessible Google Ads accounts found for the authenticated credentials.",
            json!({"total": 0, "count": 0, "accounts": []}),
        ));
    }

    let mut accounts = Vec::new();
    let mut skipped = 0usize;
    for resource_name in resource_names.iter().take(p.limit as usize) {
        let Ok(id) = CustomerId::parse(last_segment(resource_name)) else {
            skipped += 1;
            continue;
        };
        let rows = match search(api, &id, &account_query(&id, ACCOUNT_FIELDS)) {
            Ok(rows) => rows,
            // Accounts the credentials list but cannot query are skipped.
            Err(AdsError::Api(e))
                if matches!(
                    e.kind,
                    ApiErrorKind::Authorization | ApiErrorKind::NotFound | ApiErrorKind::Api
                ) =>
            {
                tracing::debug!(customer = %id, error = %e, "skipping inaccessible account");
                skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        if let Some(row) = rows.first() {
            accounts.push(json!({
                "id": str_at(row, "customer.id"),
                "name": str_at(row, "customer.descriptiveName"),
                "currency_code": str_at(row, "customer.currencyCode"),
                "status": str_at(row, "customer.status"),
                "timezone": str_at(row, "customer.timeZone"),
                "resource_name": resource_name,
            }));
        }
    }

    if accounts.is_empty() {
        return Err(AdsError::Api(gads_transport::ApiError::new(
            ApiErrorKind::Authorization,
            "Unable to retrieve details for any accessible account. You may lack sufficient permissions.",
        )));
    }

    let mut md = String::from("# Google Ads Accounts\n\n");
    let _ = writeln!(md, "Found **{}** accessible account(s)\n", accounts.len());
    for account in &accounts {
        let _ = writeln!(md, "## {} ({})", account["name"].as_str().unwrap_or_default(), account["id"].as_str().unwrap_or_default());
        field(&mut md, "Currency", account["currency_code"].as_str().unwrap_or_default());
        field(&mut md, "Status", account["status"].as_str().unwrap_or_default());
        field(&mut md, "Timezone", account["timezone"].as_str().unwrap_or_default());
        md.push('\n');
    }

    let mut report = Report::new(
        md,
        json!({
            "total": resource_names.len(),
            "count": accounts.len(),
            "accounts": accounts,
        }),
    );
    if skipped > 0 {
        report = report.with_warning(format!("{} account(s) could not be queried and were skipped", skipped));
    }
    Ok(report)
}

pub(crate) fn get_account_info(api: &dyn AdsApi, p: GetAccountInfoInput) -> Result<Report, AdsError> {
    let id = customer(&p.customer_id)?;
    let query = account_query(
        &id,
        &[
            "customer.id",
            "customer.descriptive_name",
            "customer.currency_code",
            "customer.time_zone",
            "customer.tracking_url_template",
            "customer.auto_tagging_enabled",
            "customer.has_partners_badge",
            "customer.manager",
            "customer.test_account",
            "customer.status",
        ],
    );
    let rows = search(api, &id, &query)?;
    let row = rows
        .first()
        .ok_or_else(|| AdsError::not_found(format!("No account found with ID {}", id)))?;

    let info = account_info(row);
    let text = |key: &str| info[key].as_str().unwrap_or_default().to_string();
    let flag = |key: &str| info[key].as_bool().unwrap_or(false);

    let mut md = format!("# Account: {} ({})\n\n## Basic Information\n", text("name"), text("id"));
    field(&mut md, "Currency", text("currency_code"));
    field(&mut md, "Timezone", text("timezone"));
    field(&mut md, "Status", text("status"));
    if let Some(template) = info["tracking_url_template"].as_str() {
        field(&mut md, "Tracking Template", template);
    }
    md.push_str("\n## Account Type\n");
    field(&mut md, "Manager Account", yes_no(flag("is_manager")));
    field(&mut md, "Test Account", yes_no(flag("is_test_account")));
    field(
        &mut md,
        "Auto-tagging",
        if flag("auto_tagging_enabled") { "Enabled" } else { "Disabled" },
    );
    field(&mut md, "Google Partners Badge", yes_no(flag("has_partners_badge")));

    Ok(Report::new(md, info))
}

fn account_info(row: &Value) -> Value {
    let template = str_at(row, "customer.trackingUrlTemplate");
    json!({
        "id": str_at(row, "customer.id"),
        "name": str_at(row, "customer.descriptiveName"),
        "currency_code": str_at(row, "customer.currencyCode"),
        "timezone": str_at(row, "customer.timeZone"),
        "status": str_at(row, "customer.status"),
        "tracking_url_template": if template.is_empty() { Value::Null } else { Value::String(template) },
        "is_manager": bool_at(row, "customer.manager"),
        "is_test_account": bool_at(row, "customer.testAccount"),
        "auto_tagging_enabled": bool_at(row, "customer.autoTaggingEnabled"),
        "has_partners_badge": bool_at(row, "customer.hasPartnersBadge"),
    })
}
