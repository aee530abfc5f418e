//! REST client for the Google Ads API.
//!
//! ## Endpoints
//! - `POST {endpoint}/{version}/customers/{id}/googleAds:search`
//! - `POST {endpoint}/{version}/customers/{id}/googleAds:mutate`
//! - `GET  {endpoint}/{version}/customers:listAccessibleCustomers`
//! - `POST {endpoint}/{version}/geoTargetConstants:suggest`
//! - `POST {endpoint}/{version}/customers/{id}/recommendations:apply` / `:dismiss`
//!
//! Every request carries `developer-token`, the OAuth `Authorization` header and,
//! when configured, `login-customer-id`. Nothing is retried.
//!
//! ## Usage
//!
//! ```ignore
//! let client = GoogleAdsClient::new(Credentials::from_env()?, ApiConfig::from_env())?;
//! let rows = client.search(&customer, "SELECT campaign.id, campaign.name FROM campaign")?;
//! ```

use gads_types::CustomerId;
use serde_json::{json, Value};
use tracing::debug;

use crate::api::AdsApi;
use crate::credentials::{ApiConfig, Credentials};
use crate::error::ApiError;
use crate::oauth::AuthHeaders;

/// Blocking Google Ads REST client.
#[derive(Debug)]
pub struct GoogleAdsClient {
    config: ApiConfig,
    developer_token: String,
    login_customer_id: Option<CustomerId>,
    auth: AuthHeaders,
    agent: ureq::Agent,
}

impl GoogleAdsClient {
    /// Fails only when the OAuth client settings cannot be turned into
    /// credentials; nothing is sent until the first request.
    pub fn new(credentials: Credentials, config: ApiConfig) -> Result<Self, ApiError> {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .timeout_connect(config.connect_timeout)
            .build();
        let auth = AuthHeaders::new(&config.token_uri, &credentials)?;
        Ok(Self {
            config,
            developer_token: credentials.developer_token,
            login_customer_id: credentials.login_customer_id,
            auth,
            agent,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Obtain a bearer token without calling the API (used by health checks).
    pub fn check_token(&self) -> Result<(), ApiError> {
        self.auth.headers().map(|_| ())
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.api_version,
            path
        )
    }

    fn authorized(&self, request: ureq::Request) -> Result<ureq::Request, ApiError> {
        let mut request = request.set("developer-token", &self.developer_token);
        for (name, value) in self.auth.headers()? {
            request = request.set(&name, &value);
        }
        if let Some(login) = &self.login_customer_id {
            request = request.set("login-customer-id", login.as_str());
        }
        Ok(request)
    }

    fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!(%url, "POST");
        let request = self.authorized(self.agent.post(&url))?;
        Self::read(request.send_json(body))
    }

    fn get(&self, path: &str) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let request = self.authorized(self.agent.get(&url))?;
        Self::read(request.call())
    }

    fn read(result: Result<ureq::Response, ureq::Error>) -> Result<Value, ApiError> {
        match result {
            Ok(response) => response.into_json().map_err(|e| {
                ApiError::decode(format!("Failed to parse Google Ads response: {}", e))
            }),
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                Err(ApiError::from_http(code, &body))
            }
            Err(e) => Err(ApiError::transport(format!(
                "Google Ads request failed: {}",
                e
            ))),
        }
    }
}

fn array_field(value: &Value, field: &str) -> Vec<Value> {
    value
        .get(field)
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default()
}

fn recommendation_operations(resource_names: &[String]) -> Value {
    let operations: Vec<Value> = resource_names
        .iter()
        .map(|name| json!({ "resourceName": name }))
        .collect();
    json!({ "operations": operations })
}

fn result_names(response: &Value) -> Vec<String> {
    array_field(response, "results")
        .iter()
        .filter_map(|r| r.get("resourceName").and_then(|n| n.as_str()))
        .map(String::from)
        .collect()
}

impl AdsApi for GoogleAdsClient {
    fn search(&self, customer_id: &CustomerId, query: &str) -> Result<Vec<Value>, ApiError> {
        let path = format!("customers/{}/googleAds:search", customer_id);
        let mut rows = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut body = json!({ "query": query });
            if let Some(token) = &page_token {
                body["pageToken"] = Value::String(token.clone());
            }
            let page = self.post(&path, &body)?;
            rows.extend(array_field(&page, "results"));
            page_token = page
                .get("nextPageToken")
                .and_then(|t| t.as_str())
                .filter(|t| !t.is_empty())
                .map(String::from);
            if page_token.is_none() {
                break;
            }
        }
        Ok(rows)
    }

    fn mutate(
        &self,
        customer_id: &CustomerId,
        operations: &[Value],
    ) -> Result<Vec<Value>, ApiError> {
        let path = format!("customers/{}/googleAds:mutate", customer_id);
        let response = self.post(&path, &json!({ "mutateOperations": operations }))?;
        Ok(array_field(&response, "mutateOperationResponses"))
    }

    fn list_accessible_customers(&self) -> Result<Vec<String>, ApiError> {
        let response = self.get("customers:listAccessibleCustomers")?;
        Ok(array_field(&response, "resourceNames")
            .iter()
            .filter_map(|n| n.as_str().map(String::from))
            .collect())
    }

    fn suggest_geo_targets(&self, request: &Value) -> Result<Vec<Value>, ApiError> {
        let response = self.post("geoTargetConstants:suggest", request)?;
        Ok(array_field(&response, "geoTargetConstantSuggestions"))
    }

    fn apply_recommendations(
        &self,
        customer_id: &CustomerId,
        resource_names: &[String],
    ) -> Result<Vec<String>, ApiError> {
        let path = format!("customers/{}/recommendations:apply", customer_id);
        let response = self.post(&path, &recommendation_operations(resource_names))?;
        Ok(result_names(&response))
    }

    fn dismiss_recommendations(
        &self,
        customer_id: &CustomerId,
        resource_names: &[String],
    ) -> Result<Vec<String>, ApiError> {
        let path = format!("customers/{}/recommendations:dismiss", customer_id);
        let response = self.post(&path, &recommendation_operations(resource_names))?;
        Ok(result_names(&response))
    }
}
