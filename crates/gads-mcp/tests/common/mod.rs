//! In-memory stand-in for the Google Ads API.
//!
//! Records every call, serves canned rows per GAQL resource, and keeps the
//! campaigns created through `mutate` so create-then-read flows work.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use gads_core::Service;
use gads_mcp::logging::LogConfig;
use gads_mcp::ToolDispatcher;
use gads_transport::{AdsApi, ApiError};
use gads_types::CustomerId;
use parking_lot::Mutex;
use serde_json::{json, Value};

pub const CUSTOMER: &str = "1234567890";

#[derive(Default)]
struct State {
    searches: Vec<String>,
    mutates: Vec<Vec<Value>>,
    other_calls: usize,
    canned: HashMap<String, Result<Vec<Value>, ApiError>>,
    mutate_failure: Option<ApiError>,
    campaigns: Vec<Value>,
    next_id: u64,
    accessible: Vec<String>,
    geo_suggestions: Vec<Value>,
}

#[derive(Default)]
pub struct FakeAds {
    state: Mutex<State>,
}

impl FakeAds {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Dispatcher over this fake with tool-call logging switched off.
    pub fn dispatcher(self: &Arc<Self>) -> ToolDispatcher {
        ToolDispatcher::with_api(self.clone(), LogConfig::disabled())
    }

    pub fn with_rows(&self, resource: &str, rows: Vec<Value>) {
        self.state.lock().canned.insert(resource.to_string(), Ok(rows));
    }

    pub fn fail_search(&self, resource: &str, err: ApiError) {
        self.state.lock().canned.insert(resource.to_string(), Err(err));
    }

    pub fn fail_mutate(&self, err: ApiError) {
        self.state.lock().mutate_failure = Some(err);
    }

    pub fn with_accessible(&self, customers: &[&str]) {
        self.state.lock().accessible = customers.iter().map(|c| format!("customers/{}", c)).collect();
    }

    pub fn with_geo_suggestions(&self, suggestions: Vec<Value>) {
        self.state.lock().geo_suggestions = suggestions;
    }

    pub fn searches(&self) -> Vec<String> {
        self.state.lock().searches.clone()
    }

    pub fn mutates(&self) -> Vec<Vec<Value>> {
        self.state.lock().mutates.clone()
    }

    pub fn campaign_count(&self) -> usize {
        self.state.lock().campaigns.len()
    }

    pub fn call_count(&self) -> usize {
        let state = self.state.lock();
        state.searches.len() + state.mutates.len() + state.other_calls
    }
}

/// `FROM campaign WHERE ...` -> `campaign`
fn resource_of(query: &str) -> String {
    query
        .split(" FROM ")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or_default()
        .to_string()
}

/// Value compared against `field` in a `field = value` condition.
fn condition<'a>(query: &'a str, field: &str) -> Option<&'a str> {
    let rest = query.split(&format!("{} = ", field)).nth(1)?;
    let value = rest.split_whitespace().next()?;
    Some(value.trim_matches('\''))
}

/// `manualCpc` -> `MANUAL_CPC`
fn screaming(key: &str) -> String {
    let mut out = String::new();
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
        }
        out.push(c.to_ascii_uppercase());
    }
    out
}

const SCHEMES: [&str; 10] = [
    "manualCpc",
    "manualCpm",
    "manualCpv",
    "targetSpend",
    "maximizeConversions",
    "targetCpa",
    "maximizeConversionValue",
    "targetRoas",
    "targetImpressionShare",
    "percentCpc",
];

impl AdsApi for FakeAds {
    fn search(&self, _customer_id: &CustomerId, query: &str) -> Result<Vec<Value>, ApiError> {
        let mut state = self.state.lock();
        state.searches.push(query.to_string());
        let resource = resource_of(query);
        if let Some(canned) = state.canned.get(&resource) {
            return canned.clone();
        }
        if resource != "campaign" {
            return Ok(Vec::new());
        }
        let id = condition(query, "campaign.id");
        let status = condition(query, "campaign.status");
        Ok(state
            .campaigns
            .iter()
            .filter(|row| id.map_or(true, |id| row["campaign"]["id"] == id))
            .filter(|row| status.map_or(true, |s| row["campaign"]["status"] == s))
            .cloned()
            .collect())
    }

    fn mutate(&self, customer_id: &CustomerId, operations: &[Value]) -> Result<Vec<Value>, ApiError> {
        let mut state = self.state.lock();
        state.mutates.push(operations.to_vec());
        if let Some(err) = state.mutate_failure.clone() {
            return Err(err);
        }

        // Everything is staged first so a bad operation leaves no trace.
        let mut next_id = state.next_id;
        let mut temp_names: HashMap<String, String> = HashMap::new();
        let mut budgets: HashMap<String, Value> = HashMap::new();
        let mut new_campaigns = Vec::new();
        let mut status_updates = Vec::new();
        let mut responses = Vec::new();

        for op in operations {
            let (key, body) = op
                .as_object()
                .and_then(|m| m.iter().next())
                .ok_or_else(|| ApiError::decode("empty operation"))?;
            let service = Service::from_operation_key(key)
                .ok_or_else(|| ApiError::decode(format!("unknown operation {}", key)))?;

            let resource_name = if let Some(create) = body.get("create") {
                next_id += 1;
                let real_id = 9_000 + next_id;
                let real = customer_id.child(service.collection(), real_id);
                if let Some(temp) = create["resourceName"].as_str() {
                    temp_names.insert(temp.to_string(), real.clone());
                }
                match service {
                    Service::CampaignBudget => {
                        budgets.insert(real.clone(), create["amountMicros"].clone());
                    }
                    Service::Campaign => {
                        let budget_ref = create["campaignBudget"].as_str().unwrap_or_default();
                        let budget_real = temp_names.get(budget_ref).cloned().unwrap_or_default();
                        let bidding = SCHEMES
                            .iter()
                            .find(|k| create.get(**k).is_some())
                            .map(|k| screaming(k))
                            .unwrap_or_else(|| "UNSPECIFIED".to_string());
                        new_campaigns.push(json!({
                            "campaign": {
                                "resourceName": real,
                                "id": real_id.to_string(),
                                "name": create["name"],
                                "status": create["status"],
                                "advertisingChannelType": create["advertisingChannelType"],
                                "biddingStrategyType": bidding,
                                "startDate": create.get("startDate"),
                                "networkSettings": create.get("networkSettings"),
                            },
                            "campaignBudget": {
                                "resourceName": budget_real,
                                "amountMicros": budgets.get(&budget_real).cloned().unwrap_or(Value::Null),
                                "deliveryMethod": "STANDARD",
                            },
                            "customer": {"currencyCode": "USD"},
                        }));
                    }
                    _ => {}
                }
                real
            } else if let Some(update) = body.get("update") {
                let name = update["resourceName"].as_str().unwrap_or_default().to_string();
                if service == Service::Campaign {
                    if let Some(status) = update["status"].as_str() {
                        status_updates.push((name.clone(), status.to_string()));
                    }
                }
                name
            } else {
                body["remove"].as_str().unwrap_or_default().to_string()
            };

            let mut response = serde_json::Map::new();
            response.insert(
                service.result_key().to_string(),
                json!({ "resourceName": resource_name }),
            );
            responses.push(Value::Object(response));
        }

        state.next_id = next_id;
        state.campaigns.extend(new_campaigns);
        for (name, status) in status_updates {
            for row in state.campaigns.iter_mut() {
                if row["campaign"]["resourceName"] == name.as_str() {
                    row["campaign"]["status"] = json!(status);
                }
            }
        }
        Ok(responses)
    }

    fn list_accessible_customers(&self) -> Result<Vec<String>, ApiError> {
        let mut state = self.state.lock();
        state.other_calls += 1;
        Ok(state.accessible.clone())
    }

    fn suggest_geo_targets(&self, _request: &Value) -> Result<Vec<Value>, ApiError> {
        let mut state = self.state.lock();
        state.other_calls += 1;
        Ok(state.geo_suggestions.clone())
    }

    fn apply_recommendations(
        &self,
        _customer_id: &CustomerId,
        resource_names: &[String],
    ) -> Result<Vec<String>, ApiError> {
        self.state.lock().other_calls += 1;
        Ok(resource_names.to_vec())
    }

    fn dismiss_recommendations(
        &self,
        _customer_id: &CustomerId,
        resource_names: &[String],
    ) -> Result<Vec<String>, ApiError> {
        self.state.lock().other_calls += 1;
        Ok(resource_names.to_vec())
    }
}

/// The rejection the API sends when operation `index` of a batch fails.
pub fn batch_rejection(index: usize, message: &str) -> ApiError {
    let body = json!({
        "error": {
            "code": 400,
            "status": "INVALID_ARGUMENT",
            "message": "Request contains an invalid argument.",
            "details": [{
                "@type": "type.googleapis.com/google.ads.googleads.v19.errors.GoogleAdsFailure",
                "errors": [{
                    "errorCode": {"campaignError": "DUPLICATE_CAMPAIGN_NAME"},
                    "message": message,
                    "location": {"fieldPathElements": [
                        {"fieldName": "mutate_operations", "index": index},
                        {"fieldName": "campaign_operation"},
                    ]},
                }],
                "requestId": "req-abc",
            }],
        }
    });
    ApiError::from_http(400, &body.to_string())
}
