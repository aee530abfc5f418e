//! The seam between tool handlers and the Google Ads API.

use gads_types::CustomerId;
use serde_json::Value;

use crate::error::ApiError;

/// Blocking access to the Google Ads API.
///
/// Rows and operation results are the API's JSON (camelCase field names,
/// int64 values encoded as strings). Implementations must be shareable across
/// threads: handlers run each call on a blocking worker.
pub trait AdsApi: Send + Sync {
    /// Run a GAQL query, following `nextPageToken` until every row is collected.
    fn search(&self, customer_id: &CustomerId, query: &str) -> Result<Vec<Value>, ApiError>;

    /// Submit `operations` as one atomic `googleAds:mutate` batch.
    ///
    /// Returns one entry of `mutateOperationResponses` per operation, in order.
    fn mutate(&self, customer_id: &CustomerId, operations: &[Value])
        -> Result<Vec<Value>, ApiError>;

    /// Resource names (`customers/{id}`) the credentials can reach directly.
    fn list_accessible_customers(&self) -> Result<Vec<String>, ApiError>;

    /// `geoTargetConstants:suggest`; returns `geoTargetConstantSuggestions`.
    fn suggest_geo_targets(&self, request: &Value) -> Result<Vec<Value>, ApiError>;

    /// Apply recommendations; returns the resource names the API confirmed.
    fn apply_recommendations(
        &self,
        customer_id: &CustomerId,
        resource_names: &[String],
    ) -> Result<Vec<String>, ApiError>;

    /// Dismiss recommendations; returns the resource names the API confirmed.
    fn dismiss_recommendations(
        &self,
        customer_id: &CustomerId,
        resource_names: &[String],
    ) -> Result<Vec<String>, ApiError>;
}
