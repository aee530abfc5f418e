//! Atomic mutate batches.
//!
//! A [`MutateBatch`] collects create, update and remove operations across
//! services and is submitted as one `googleAds:mutate` call: either every
//! operation is applied or none is. Resources created in the same batch
//! reference each other through temporary resource names with negative ids
//! (`customers/123/campaignBudgets/-1`), handed out by [`MutateBatch::temp_resource`].

use gads_transport::{ApiError, ApiErrorKind};
use gads_types::ids::{last_segment, TempIdAllocator};
use gads_types::CustomerId;
use serde_json::{json, Value};

use crate::error::AdsError;

/// Services reachable through `googleAds:mutate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    CampaignBudget,
    Campaign,
    CampaignCriterion,
    AdGroup,
    AdGroupCriterion,
    AdGroupAd,
    Asset,
    AssetGroup,
    AssetGroupAsset,
}

impl Service {
    pub const ALL: [Service; 9] = [
        Service::CampaignBudget,
        Service::Campaign,
        Service::CampaignCriterion,
        Service::AdGroup,
        Service::AdGroupCriterion,
        Service::AdGroupAd,
        Service::Asset,
        Service::AssetGroup,
        Service::AssetGroupAsset,
    ];

    /// Service owning an operation object key (`campaignOperation` -> `Campaign`).
    pub fn from_operation_key(key: &str) -> Option<Service> {
        Self::ALL.into_iter().find(|s| s.operation_key() == key)
    }

    pub fn operation_key(self) -> &'static str {
        match self {
            Service::CampaignBudget => "campaignBudgetOperation",
            Service::Campaign => "campaignOperation",
            Service::CampaignCriterion => "campaignCriterionOperation",
            Service::AdGroup => "adGroupOperation",
            Service::AdGroupCriterion => "adGroupCriterionOperation",
            Service::AdGroupAd => "adGroupAdOperation",
            Service::Asset => "assetOperation",
            Service::AssetGroup => "assetGroupOperation",
            Service::AssetGroupAsset => "assetGroupAssetOperation",
        }
    }

    pub fn result_key(self) -> &'static str {
        match self {
            Service::CampaignBudget => "campaignBudgetResult",
            Service::Campaign => "campaignResult",
            Service::CampaignCriterion => "campaignCriterionResult",
            Service::AdGroup => "adGroupResult",
            Service::AdGroupCriterion => "adGroupCriterionResult",
            Service::AdGroupAd => "adGroupAdResult",
            Service::Asset => "assetResult",
            Service::AssetGroup => "assetGroupResult",
            Service::AssetGroupAsset => "assetGroupAssetResult",
        }
    }

    /// Collection segment used in resource names.
    pub fn collection(self) -> &'static str {
        match self {
            Service::CampaignBudget => "campaignBudgets",
            Service::Campaign => "campaigns",
            Service::CampaignCriterion => "campaignCriteria",
            Service::AdGroup => "adGroups",
            Service::AdGroupCriterion => "adGroupCriteria",
            Service::AdGroupAd => "adGroupAds",
            Service::Asset => "assets",
            Service::AssetGroup => "assetGroups",
            Service::AssetGroupAsset => "assetGroupAssets",
        }
    }
}

#[derive(Debug)]
pub struct MutateBatch {
    customer: CustomerId,
    operations: Vec<Value>,
    labels: Vec<String>,
    temp_ids: TempIdAllocator,
}

impl MutateBatch {
    pub fn new(customer: CustomerId) -> Self {
        Self {
            customer,
            operations: Vec::new(),
            labels: Vec::new(),
            temp_ids: TempIdAllocator::new(),
        }
    }

    pub fn customer(&self) -> &CustomerId {
        &self.customer
    }

    /// Reserve a temporary resource name (`customers/{id}/{collection}/-N`).
    pub fn temp_resource(&mut self, service: Service) -> String {
        let id = self.temp_ids.next_id();
        self.customer.child(service.collection(), id)
    }

    pub fn create(&mut self, service: Service, label: impl Into<String>, resource: Value) {
        self.push(service, label, json!({ "create": resource }));
    }

    pub fn update(
        &mut self,
        service: Service,
        label: impl Into<String>,
        resource: Value,
        update_mask: &[&str],
    ) {
        self.push(
            service,
            label,
            json!({ "update": resource, "updateMask": update_mask.join(",") }),
        );
    }

    pub fn remove(&mut self, service: Service, label: impl Into<String>, resource_name: &str) {
        self.push(service, label, json!({ "remove": resource_name }));
    }

    fn push(&mut self, service: Service, label: impl Into<String>, body: Value) {
        let mut op = serde_json::Map::new();
        op.insert(service.operation_key().to_string(), body);
        self.operations.push(Value::Object(op));
        self.labels.push(label.into());
    }

    pub fn operations(&self) -> &[Value] {
        &self.operations
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Classify a rejected submission.
    ///
    /// Failures of a multi-operation batch that are not about credentials or
    /// quota become [`AdsError::PartialBatch`], naming the operation the API blamed.
    pub fn failure(&self, err: ApiError) -> AdsError {
        match err.kind {
            ApiErrorKind::Api | ApiErrorKind::NotFound if self.len() > 1 => {
                let index = err.failing_operation().filter(|i| *i < self.len());
                AdsError::PartialBatch {
                    total: self.len(),
                    index,
                    operation: index.and_then(|i| self.label(i)).map(String::from),
                    source: err,
                }
            }
            _ => AdsError::Api(err),
        }
    }
}

/// Responses of a successful batch, aligned with its operations.
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    responses: Vec<Value>,
}

impl BatchResult {
    pub fn new(responses: Vec<Value>) -> Self {
        Self { responses }
    }

    /// Resource name produced by operation `index`.
    pub fn resource_name(&self, index: usize) -> Option<String> {
        self.responses
            .get(index)?
            .as_object()?
            .values()
            .find_map(|r| r.get("resourceName").and_then(|n| n.as_str()))
            .map(String::from)
    }

    /// Id segment of the resource name produced by operation `index`.
    pub fn id(&self, index: usize) -> Option<String> {
        self.resource_name(index)
            .map(|name| last_segment(&name).to_string())
    }

    pub fn resource_names(&self) -> Vec<String> {
        (0..self.responses.len())
            .filter_map(|i| self.resource_name(i))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> MutateBatch {
        MutateBatch::new(CustomerId::parse("1234567890").unwrap())
    }

    #[test]
    fn test_temp_resources_link_operations() {
        let mut b = batch();
        let budget = b.temp_resource(Service::CampaignBudget);
        let campaign = b.temp_resource(Service::Campaign);
        b.create(
            Service::CampaignBudget,
            "campaign budget",
            json!({"resourceName": budget, "amountMicros": "50000000"}),
        );
        b.create(
            Service::Campaign,
            "campaign",
            json!({"resourceName": campaign, "campaignBudget": budget}),
        );
        assert_eq!(budget, "customers/1234567890/campaignBudgets/-1");
        assert_eq!(campaign, "customers/1234567890/campaigns/-2");
        assert_eq!(
            b.operations()[1]["campaignOperation"]["create"]["campaignBudget"],
            budget
        );
        assert_eq!(b.label(1), Some("campaign"));
    }

    #[test]
    fn test_update_and_remove_shapes() {
        let mut b = batch();
        b.update(
            Service::Campaign,
            "status",
            json!({"resourceName": "customers/1234567890/campaigns/5", "status": "PAUSED"}),
            &["status"],
        );
        b.remove(Service::AdGroupCriterion, "keyword", "customers/1234567890/adGroupCriteria/1~2");
        assert_eq!(b.operations()[0]["campaignOperation"]["updateMask"], "status");
        assert_eq!(
            b.operations()[1]["adGroupCriterionOperation"]["remove"],
            "customers/1234567890/adGroupCriteria/1~2"
        );
    }

    #[test]
    fn test_failure_names_operation() {
        let mut b = batch();
        b.create(Service::CampaignBudget, "campaign budget", json!({}));
        b.create(Service::Campaign, "campaign 'Summer Sale'", json!({}));
        let mut err = ApiError::new(ApiErrorKind::Api, "Duplicate name");
        err.details.push(gads_transport::ApiErrorDetail {
            code: Some("campaignError.DUPLICATE_CAMPAIGN_NAME".into()),
            message: "Duplicate name".into(),
            operation_index: Some(1),
            field_path: vec![],
        });
        match b.failure(err) {
            AdsError::PartialBatch { operation, index, total, .. } => {
                assert_eq!(operation.as_deref(), Some("campaign 'Summer Sale'"));
                assert_eq!(index, Some(1));
                assert_eq!(total, 2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_auth_failure_stays_auth() {
        let mut b = batch();
        b.create(Service::CampaignBudget, "a", json!({}));
        b.create(Service::Campaign, "b", json!({}));
        let err = ApiError::new(ApiErrorKind::Authorization, "denied");
        assert!(matches!(b.failure(err), AdsError::Api(_)));
    }

    #[test]
    fn test_batch_result_ids() {
        let result = BatchResult::new(vec![
            json!({"campaignBudgetResult": {"resourceName": "customers/1/campaignBudgets/55"}}),
            json!({"campaignResult": {"resourceName": "customers/1/campaigns/77"}}),
        ]);
        assert_eq!(result.id(1).as_deref(), Some("77"));
        assert_eq!(result.resource_names().len(), 2);
        assert_eq!(result.resource_name(5), None);
    }
}
