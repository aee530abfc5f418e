//! MCP tool implementations, split by area.
//!
//! - `inputs`: validated input structs, one per tool
//! - one module per area (`campaigns`, `keywords`, `geo`, ...), each exposing
//!   blocking handlers `fn(&dyn AdsApi, Input) -> Result<Report, AdsError>`
//!   that the dispatcher runs off the async executor

pub(crate) mod accounts;
pub(crate) mod ad_groups;
pub(crate) mod ads;
pub(crate) mod assets;
pub(crate) mod budget;
pub(crate) mod campaigns;
pub(crate) mod conversions;
pub(crate) mod diagnostics;
pub(crate) mod geo;
pub mod inputs;
pub(crate) mod keywords;
pub(crate) mod negatives;
pub(crate) mod performance;
pub(crate) mod recommendations;

use chrono::NaiveDate;
use gads_core::rows::opt_str_at;
use gads_core::{AdsError, BatchResult, MutateBatch, Query};
use gads_transport::AdsApi;
use gads_types::CustomerId;
use serde_json::Value;

pub use inputs::ToolInput;

/// Currency assumed when a row does not carry `customer.currencyCode`.
pub(crate) const DEFAULT_CURRENCY: &str = "USD";

pub(crate) fn search(
    api: &dyn AdsApi,
    customer: &CustomerId,
    query: &Query,
) -> Result<Vec<Value>, AdsError> {
    let gaql = query.build();
    tracing::debug!(customer = %customer, query = %gaql, "search");
    Ok(api.search(customer, &gaql)?)
}

/// Submit a batch atomically; failures name the operation the API rejected.
pub(crate) fn submit(api: &dyn AdsApi, batch: &MutateBatch) -> Result<BatchResult, AdsError> {
    tracing::debug!(customer = %batch.customer(), operations = batch.len(), "mutate");
    api.mutate(batch.customer(), batch.operations())
        .map(BatchResult::new)
        .map_err(|e| batch.failure(e))
}

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub(crate) fn currency_of(row: &Value) -> String {
    opt_str_at(row, "customer.currencyCode").unwrap_or_else(|| DEFAULT_CURRENCY.to_string())
}

/// Amount for confirmations of writes, where the account currency is not at hand.
pub(crate) fn account_money(micros: i64) -> String {
    format!(
        "{} (account currency)",
        gads_types::money::format_decimal(gads_types::money::micros_to_units(micros))
    )
}

pub(crate) fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Customer id of an input that already passed validation.
pub(crate) fn customer(raw: &str) -> Result<CustomerId, AdsError> {
    Ok(gads_core::validate::customer_id(raw)?)
}
