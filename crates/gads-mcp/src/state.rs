use crate::logging::{redact_sensitive, LogConfig, LogRecord, McpLogger};
use crate::tools::inputs::ToolInput;
use crate::tools::{
    accounts, ad_groups, ads, assets, budget, campaigns, conversions, diagnostics, geo, keywords,
    negatives, performance, recommendations,
};
use chrono::Utc;
use gads_core::{parse_input, AdsError, Report};
use gads_transport::{AdsApi, ApiConfig, Credentials, GoogleAdsClient};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

// Re-export shared types for use by the tool modules
pub use gads_core::{ToolMeta, ToolResponse};

/// Routes tool calls by name to their handlers.
///
/// The Google Ads client is built from the environment on first use and
/// shared for the life of the process. A configuration failure is reported
/// on the call that needed the client and retried on the next one.
pub struct ToolDispatcher {
    logger: McpLogger,
    api: tokio::sync::Mutex<Option<Arc<dyn AdsApi>>>,
}

impl ToolDispatcher {
    pub fn new() -> Self {
        Self::with_log_config(LogConfig::from_env())
    }

    pub fn with_log_config(config: LogConfig) -> Self {
        Self {
            logger: McpLogger::new(config),
            api: tokio::sync::Mutex::new(None),
        }
    }

    /// Dispatcher bound to an existing API handle instead of the environment.
    pub fn with_api(api: Arc<dyn AdsApi>, config: LogConfig) -> Self {
        Self {
            logger: McpLogger::new(config),
            api: tokio::sync::Mutex::new(Some(api)),
        }
    }

    pub fn logger(&self) -> &McpLogger {
        &self.logger
    }

    pub async fn api(&self) -> Result<Arc<dyn AdsApi>, AdsError> {
        let mut guard = self.api.lock().await;
        if let Some(api) = guard.clone() {
            return Ok(api);
        }
        let client = GoogleAdsClient::new(Credentials::from_env()?, ApiConfig::from_env())?;
        tracing::info!(
            endpoint = %client.config().endpoint,
            api_version = %client.config().api_version,
            "Google Ads client initialized"
        );
        let api: Arc<dyn AdsApi> = Arc::new(client);
        *guard = Some(api.clone());
        Ok(api)
    }

    pub async fn dispatch(&self, tool: &str, input: Value) -> ToolResponse {
        let (meta, clean_input) = ToolMeta::extract(&input);
        let request_id = meta
            .request_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let start = Instant::now();

        let result = self.dispatch_inner(tool, clean_input.clone()).await;

        let elapsed = start.elapsed();
        let result = result.with_duration(elapsed.as_millis() as u64);
        if result.success {
            tracing::info!(tool, %request_id, duration_ms = elapsed.as_millis() as u64, "tool call succeeded");
        } else {
            tracing::warn!(
                tool,
                %request_id,
                kind = result.error_kind.as_deref().unwrap_or("unknown"),
                "tool call failed"
            );
        }

        let record = LogRecord {
            ts: Utc::now().to_rfc3339(),
            request_id,
            tool: tool.to_string(),
            input: redact_sensitive(&clean_input),
            output: redact_sensitive(&result.to_json()),
            duration_ms: elapsed.as_millis(),
            success: result.success,
            error: result.error.clone(),
            error_kind: result.error_kind.clone(),
            reason: meta.reason.clone(),
            tags: meta.tags.clone(),
        };
        if let Err(e) = self.logger.log_tool_call(&record) {
            tracing::debug!(error = %e, "could not write tool-call log");
        }

        result
    }

    async fn dispatch_inner(&self, tool: &str, input: Value) -> ToolResponse {
        match tool {
            "google_ads_list_accounts" => self.run(input, accounts::list_accounts).await,
            "google_ads_get_account_info" => self.run(input, accounts::get_account_info).await,
            "google_ads_list_campaigns" => self.run(input, campaigns::list_campaigns).await,
            "google_ads_get_campaign" => self.run(input, campaigns::get_campaign).await,
            "google_ads_get_campaign_insights" => {
                self.run(input, performance::get_campaign_insights).await
            }
            "google_ads_get_search_terms" => self.run(input, performance::get_search_terms).await,
            "google_ads_get_asset_performance" => {
                self.run(input, performance::get_asset_performance).await
            }
            "google_ads_create_campaign" => self.run(input, campaigns::create_campaign).await,
            "google_ads_create_pmax_campaign" => {
                self.run(input, campaigns::create_pmax_campaign).await
            }
            "google_ads_update_campaign_status" => {
                self.run(input, campaigns::update_campaign_status).await
            }
            "google_ads_set_campaign_schedule" => {
                self.run(input, campaigns::set_campaign_schedule).await
            }
            "google_ads_list_ad_groups" => self.run(input, ad_groups::list_ad_groups).await,
            "google_ads_create_ad_group" => self.run(input, ad_groups::create_ad_group).await,
            "google_ads_update_ad_group_status" => {
                self.run(input, ad_groups::update_ad_group_status).await
            }
            "google_ads_list_keywords" => self.run(input, keywords::list_keywords).await,
            "google_ads_add_keywords" => self.run(input, keywords::add_keywords).await,
            "google_ads_remove_keywords" => self.run(input, keywords::remove_keywords).await,
            "google_ads_list_ads" => self.run(input, ads::list_ads).await,
            "google_ads_create_responsive_search_ad" => {
                self.run(input, ads::create_responsive_search_ad).await
            }
            "google_ads_update_ad_status" => self.run(input, ads::update_ad_status).await,
            "google_ads_create_text_assets" => self.run(input, assets::create_text_assets).await,
            "google_ads_remove_asset_from_group" => {
                self.run(input, assets::remove_asset_from_group).await
            }
            "google_ads_update_asset_group_assets" => {
                self.run(input, assets::update_asset_group_assets).await
            }
            "google_ads_list_negative_keywords" => {
                self.run(input, negatives::list_negative_keywords).await
            }
            "google_ads_add_negative_keywords" => {
                self.run(input, negatives::add_negative_keywords).await
            }
            "google_ads_remove_negative_keywords" => {
                self.run(input, negatives::remove_negative_keywords).await
            }
            "google_ads_update_campaign_budget" => {
                self.run(input, budget::update_campaign_budget).await
            }
            "google_ads_get_budget_utilization" => {
                self.run(input, budget::get_budget_utilization).await
            }
            "google_ads_get_keyword_quality_scores" => {
                self.run(input, diagnostics::get_keyword_quality_scores).await
            }
            "google_ads_get_ad_strength" => self.run(input, diagnostics::get_ad_strength).await,
            "google_ads_get_policy_issues" => {
                self.run(input, diagnostics::get_policy_issues).await
            }
            "google_ads_list_recommendations" => {
                self.run(input, recommendations::list_recommendations).await
            }
            "google_ads_apply_recommendation" => {
                self.run(input, recommendations::apply_recommendation).await
            }
            "google_ads_dismiss_recommendation" => {
                self.run(input, recommendations::dismiss_recommendation).await
            }
            "google_ads_list_conversion_actions" => {
                self.run(input, conversions::list_conversion_actions).await
            }
            "google_ads_get_conversion_stats" => {
                self.run(input, conversions::get_conversion_stats).await
            }
            "google_ads_get_campaign_conversion_goals" => {
                self.run(input, conversions::get_campaign_conversion_goals).await
            }
            "google_ads_get_geo_targets" => self.run(input, geo::get_geo_targets).await,
            "google_ads_search_geo_targets" => self.run(input, geo::search_geo_targets).await,
            "google_ads_set_geo_targets" => self.run(input, geo::set_geo_targets).await,
            "google_ads_remove_geo_targets" => self.run(input, geo::remove_geo_targets).await,
            _ => ToolResponse::error(format!("Unknown tool: {}", tool)).with_kind("unknown_tool"),
        }
    }

    /// Validate `input`, then run `handler` on a blocking worker.
    ///
    /// Validation happens before the client is built, so a malformed call
    /// never needs credentials and never reaches the network.
    async fn run<T, F>(&self, input: Value, handler: F) -> ToolResponse
    where
        T: ToolInput,
        F: FnOnce(&dyn AdsApi, T) -> Result<Report, AdsError> + Send + 'static,
    {
        let parsed: T = match parse_input(input) {
            Ok(v) => v,
            Err(e) => return AdsError::from(e).to_response(),
        };
        let format = parsed.response_format();
        let api = match self.api().await {
            Ok(api) => api,
            Err(e) => return e.to_response(),
        };

        match tokio::task::spawn_blocking(move || handler(api.as_ref(), parsed)).await {
            Ok(Ok(report)) => ToolResponse::from_report(report, format),
            Ok(Err(e)) => e.to_response(),
            Err(e) => ToolResponse::error(format!("Tool handler failed: {}", e)).with_kind("internal"),
        }
    }
}

impl Default for ToolDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
