//! The MCP surface: one `#[tool]` per Google Ads tool, each forwarding its
//! raw arguments to the [`ToolDispatcher`].
//!
//! Input schemas are generated from the structs in [`crate::tools::inputs`];
//! validation happens in the dispatcher so that `gads call` and MCP calls
//! share one path.

use std::sync::Arc;

use rmcp::{
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, JsonObject, ServerCapabilities, ServerInfo, Tool},
    tool, tool_handler, tool_router, ErrorData as McpError, ServiceExt,
};
use schemars::JsonSchema;
use serde_json::Value;

use crate::state::ToolDispatcher;
use crate::tools::inputs::*;

/// JSON schema object for a tool input struct.
fn schema_for<T: JsonSchema>() -> Arc<JsonObject> {
    match serde_json::to_value(schemars::schema_for!(T)) {
        Ok(Value::Object(map)) => Arc::new(map),
        _ => Arc::new(JsonObject::new()),
    }
}

#[derive(Clone)]
pub struct GoogleAdsMcpServer {
    dispatcher: Arc<ToolDispatcher>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl GoogleAdsMcpServer {
    pub fn new(dispatcher: ToolDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            tool_router: Self::tool_router(),
        }
    }

    /// Every tool this server publishes, with schemas and annotations.
    pub fn tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    pub fn dispatcher(&self) -> &ToolDispatcher {
        &self.dispatcher
    }

    /// Run one tool and shape the response for the host. The text content is
    /// the bounded output; the structured content is the envelope only, so the
    /// payload never grows past the rendered text.
    pub async fn call(&self, name: &str, arguments: Value) -> CallToolResult {
        let response = self.dispatcher.dispatch(name, arguments).await;
        CallToolResult {
            content: vec![Content::text(response.output.clone())],
            structured_content: Some(response.envelope()),
            is_error: Some(!response.success),
            meta: None,
        }
    }

    async fn dispatch_tool(
        &self,
        name: &str,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.call(name, params.0).await)
    }

    // --- Accounts -------------------------------------------------------

    #[tool(
        name = "google_ads_list_accounts",
        description = "List Google Ads accounts accessible with the configured credentials",
        input_schema = schema_for::<ListAccountsInput>(),
        annotations(
            title = "List Google Ads Accounts",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn list_accounts(&self, params: Parameters<Value>) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_list_accounts", params).await
    }

    #[tool(
        name = "google_ads_get_account_info",
        description = "Get account details: name, currency, time zone, auto-tagging and test status",
        input_schema = schema_for::<GetAccountInfoInput>(),
        annotations(
            title = "Get Account Information",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn get_account_info(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_get_account_info", params).await
    }

    // --- Campaigns ------------------------------------------------------

    #[tool(
        name = "google_ads_list_campaigns",
        description = "List campaigns with status, type, bidding strategy and budget, with pagination",
        input_schema = schema_for::<ListCampaignsInput>(),
        annotations(
            title = "List Campaigns",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn list_campaigns(&self, params: Parameters<Value>) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_list_campaigns", params).await
    }

    #[tool(
        name = "google_ads_get_campaign",
        description = "Get full settings of one campaign: budget, schedule, networks, optimization score",
        input_schema = schema_for::<GetCampaignInput>(),
        annotations(
            title = "Get Campaign Details",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn get_campaign(&self, params: Parameters<Value>) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_get_campaign", params).await
    }

    #[tool(
        name = "google_ads_get_campaign_insights",
        description = "Get campaign performance metrics (impressions, clicks, cost, conversions, ROAS) for a date range",
        input_schema = schema_for::<GetCampaignInsightsInput>(),
        annotations(
            title = "Get Campaign Performance Metrics",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn get_campaign_insights(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_get_campaign_insights", params).await
    }

    #[tool(
        name = "google_ads_get_search_terms",
        description = "Get the search queries that triggered ads, with metrics, to find new keywords and negatives",
        input_schema = schema_for::<GetSearchTermsInput>(),
        annotations(
            title = "Get Search Terms Report",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn get_search_terms(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_get_search_terms", params).await
    }

    #[tool(
        name = "google_ads_get_asset_performance",
        description = "Get Performance Max asset performance labels and metrics, grouped by label",
        input_schema = schema_for::<GetAssetPerformanceInput>(),
        annotations(
            title = "Get Performance Max Asset Performance",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn get_asset_performance(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_get_asset_performance", params).await
    }

    #[tool(
        name = "google_ads_create_campaign",
        description = "Create a campaign and its budget in one atomic request; the campaign starts PAUSED",
        input_schema = schema_for::<CreateCampaignInput>(),
        annotations(
            title = "Create New Campaign",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = true
        )
    )]
    async fn create_campaign(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_create_campaign", params).await
    }

    #[tool(
        name = "google_ads_create_pmax_campaign",
        description = "Create a Performance Max campaign with budget, asset group and text assets in one atomic request",
        input_schema = schema_for::<CreatePmaxCampaignInput>(),
        annotations(
            title = "Create Performance Max Campaign",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = true
        )
    )]
    async fn create_pmax_campaign(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_create_pmax_campaign", params).await
    }

    #[tool(
        name = "google_ads_update_campaign_status",
        description = "Enable, pause or remove a campaign",
        input_schema = schema_for::<UpdateCampaignStatusInput>(),
        annotations(
            title = "Update Campaign Status",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn update_campaign_status(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_update_campaign_status", params).await
    }

    #[tool(
        name = "google_ads_set_campaign_schedule",
        description = "Replace a campaign's ad schedule with one time window on the given days",
        input_schema = schema_for::<SetCampaignScheduleInput>(),
        annotations(
            title = "Set Campaign Ad Schedule",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn set_campaign_schedule(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_set_campaign_schedule", params).await
    }

    // --- Ad groups ------------------------------------------------------

    #[tool(
        name = "google_ads_list_ad_groups",
        description = "List the ad groups of a campaign",
        input_schema = schema_for::<ListAdGroupsInput>(),
        annotations(
            title = "List Ad Groups",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn list_ad_groups(&self, params: Parameters<Value>) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_list_ad_groups", params).await
    }

    #[tool(
        name = "google_ads_create_ad_group",
        description = "Create a search ad group in a campaign",
        input_schema = schema_for::<CreateAdGroupInput>(),
        annotations(
            title = "Create Ad Group",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = true
        )
    )]
    async fn create_ad_group(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_create_ad_group", params).await
    }

    #[tool(
        name = "google_ads_update_ad_group_status",
        description = "Enable, pause or remove an ad group",
        input_schema = schema_for::<UpdateAdGroupStatusInput>(),
        annotations(
            title = "Update Ad Group Status",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn update_ad_group_status(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_update_ad_group_status", params).await
    }

    // --- Keywords -------------------------------------------------------

    #[tool(
        name = "google_ads_list_keywords",
        description = "List the keywords of an ad group with match type, status and bid",
        input_schema = schema_for::<ListKeywordsInput>(),
        annotations(
            title = "List Keywords",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn list_keywords(&self, params: Parameters<Value>) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_list_keywords", params).await
    }

    #[tool(
        name = "google_ads_add_keywords",
        description = "Add keywords to an ad group in one atomic request",
        input_schema = schema_for::<AddKeywordsInput>(),
        annotations(
            title = "Add Keywords",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = true
        )
    )]
    async fn add_keywords(&self, params: Parameters<Value>) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_add_keywords", params).await
    }

    #[tool(
        name = "google_ads_remove_keywords",
        description = "Remove keywords by id ('adGroupId~criterionId' or criterion id with ad_group_id)",
        input_schema = schema_for::<RemoveKeywordsInput>(),
        annotations(
            title = "Remove Keywords",
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn remove_keywords(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_remove_keywords", params).await
    }

    // --- Ads ------------------------------------------------------------

    #[tool(
        name = "google_ads_list_ads",
        description = "List the ads of an ad group with headlines, descriptions and final URLs",
        input_schema = schema_for::<ListAdsInput>(),
        annotations(
            title = "List Ads",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn list_ads(&self, params: Parameters<Value>) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_list_ads", params).await
    }

    #[tool(
        name = "google_ads_create_responsive_search_ad",
        description = "Create a responsive search ad (3-15 headlines, 2-4 descriptions); it starts PAUSED",
        input_schema = schema_for::<CreateResponsiveSearchAdInput>(),
        annotations(
            title = "Create Responsive Search Ad",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = true
        )
    )]
    async fn create_responsive_search_ad(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_create_responsive_search_ad", params).await
    }

    #[tool(
        name = "google_ads_update_ad_status",
        description = "Enable, pause or remove an ad",
        input_schema = schema_for::<UpdateAdStatusInput>(),
        annotations(
            title = "Update Ad Status",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn update_ad_status(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_update_ad_status", params).await
    }

    // --- Performance Max assets -----------------------------------------

    #[tool(
        name = "google_ads_create_text_assets",
        description = "Create text assets and link them to a Performance Max asset group in one atomic request",
        input_schema = schema_for::<CreateTextAssetsInput>(),
        annotations(
            title = "Create Text Assets for Performance Max",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = true
        )
    )]
    async fn create_text_assets(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_create_text_assets", params).await
    }

    #[tool(
        name = "google_ads_remove_asset_from_group",
        description = "Unlink assets from a Performance Max asset group",
        input_schema = schema_for::<RemoveAssetFromGroupInput>(),
        annotations(
            title = "Remove Assets from Asset Group",
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn remove_asset_from_group(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_remove_asset_from_group", params).await
    }

    #[tool(
        name = "google_ads_update_asset_group_assets",
        description = "Add and remove asset group text assets together in one atomic request",
        input_schema = schema_for::<UpdateAssetGroupAssetsInput>(),
        annotations(
            title = "Batch Update Asset Group Assets",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = true
        )
    )]
    async fn update_asset_group_assets(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_update_asset_group_assets", params).await
    }

    // --- Negative keywords ----------------------------------------------

    #[tool(
        name = "google_ads_list_negative_keywords",
        description = "List campaign-level and ad-group-level negative keywords",
        input_schema = schema_for::<ListNegativeKeywordsInput>(),
        annotations(
            title = "List Negative Keywords",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn list_negative_keywords(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_list_negative_keywords", params).await
    }

    #[tool(
        name = "google_ads_add_negative_keywords",
        description = "Add negative keywords at campaign or ad group level",
        input_schema = schema_for::<AddNegativeKeywordsInput>(),
        annotations(
            title = "Add Negative Keywords",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = true
        )
    )]
    async fn add_negative_keywords(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_add_negative_keywords", params).await
    }

    #[tool(
        name = "google_ads_remove_negative_keywords",
        description = "Remove negative keywords by criterion id",
        input_schema = schema_for::<RemoveNegativeKeywordsInput>(),
        annotations(
            title = "Remove Negative Keywords",
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn remove_negative_keywords(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_remove_negative_keywords", params).await
    }

    // --- Budgets --------------------------------------------------------

    #[tool(
        name = "google_ads_update_campaign_budget",
        description = "Change a campaign's daily budget and show the previous and new amounts",
        input_schema = schema_for::<UpdateCampaignBudgetInput>(),
        annotations(
            title = "Update Campaign Budget",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn update_campaign_budget(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_update_campaign_budget", params).await
    }

    #[tool(
        name = "google_ads_get_budget_utilization",
        description = "Compare average daily spend to daily budget to find budget-limited and underspending campaigns",
        input_schema = schema_for::<GetBudgetUtilizationInput>(),
        annotations(
            title = "Get Budget Utilization",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn get_budget_utilization(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_get_budget_utilization", params).await
    }

    // --- Diagnostics ----------------------------------------------------

    #[tool(
        name = "google_ads_get_keyword_quality_scores",
        description = "Get Quality Score and its components (expected CTR, ad relevance, landing page) per keyword",
        input_schema = schema_for::<GetKeywordQualityScoresInput>(),
        annotations(
            title = "Get Keyword Quality Scores",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn get_keyword_quality_scores(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_get_keyword_quality_scores", params).await
    }

    #[tool(
        name = "google_ads_get_ad_strength",
        description = "Get Ad Strength ratings for responsive search ads",
        input_schema = schema_for::<GetAdStrengthInput>(),
        annotations(
            title = "Get Ad Strength for RSA",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn get_ad_strength(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_get_ad_strength", params).await
    }

    #[tool(
        name = "google_ads_get_policy_issues",
        description = "List disapproved or limited ads and assets with their policy topics",
        input_schema = schema_for::<GetPolicyIssuesInput>(),
        annotations(
            title = "Get Policy Issues (Disapproved Ads)",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn get_policy_issues(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_get_policy_issues", params).await
    }

    // --- Recommendations ------------------------------------------------

    #[tool(
        name = "google_ads_list_recommendations",
        description = "List pending Google Ads recommendations with estimated impact",
        input_schema = schema_for::<ListRecommendationsInput>(),
        annotations(
            title = "List Recommendations",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn list_recommendations(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_list_recommendations", params).await
    }

    #[tool(
        name = "google_ads_apply_recommendation",
        description = "Apply a recommendation to the account",
        input_schema = schema_for::<ApplyRecommendationInput>(),
        annotations(
            title = "Apply Recommendation",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = true
        )
    )]
    async fn apply_recommendation(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_apply_recommendation", params).await
    }

    #[tool(
        name = "google_ads_dismiss_recommendation",
        description = "Dismiss a recommendation so it no longer appears",
        input_schema = schema_for::<DismissRecommendationInput>(),
        annotations(
            title = "Dismiss Recommendation",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn dismiss_recommendation(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_dismiss_recommendation", params).await
    }

    // --- Conversions ----------------------------------------------------

    #[tool(
        name = "google_ads_list_conversion_actions",
        description = "List the conversion actions configured in the account",
        input_schema = schema_for::<ListConversionActionsInput>(),
        annotations(
            title = "List Conversion Actions",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn list_conversion_actions(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_list_conversion_actions", params).await
    }

    #[tool(
        name = "google_ads_get_conversion_stats",
        description = "Get conversions, value, cost, CPA and ROAS per campaign, optionally per conversion action",
        input_schema = schema_for::<GetConversionStatsInput>(),
        annotations(
            title = "Get Conversion Statistics",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn get_conversion_stats(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_get_conversion_stats", params).await
    }

    #[tool(
        name = "google_ads_get_campaign_conversion_goals",
        description = "Show primary (biddable) and secondary conversion goals per campaign",
        input_schema = schema_for::<GetCampaignConversionGoalsInput>(),
        annotations(
            title = "Get Campaign Conversion Goals",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn get_campaign_conversion_goals(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_get_campaign_conversion_goals", params).await
    }

    // --- Geographic targeting -------------------------------------------

    #[tool(
        name = "google_ads_get_geo_targets",
        description = "Show a campaign's targeted and excluded locations",
        input_schema = schema_for::<GetGeoTargetsInput>(),
        annotations(
            title = "Get Geographic Targets",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn get_geo_targets(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_get_geo_targets", params).await
    }

    #[tool(
        name = "google_ads_search_geo_targets",
        description = "Find location ids for cities, regions or countries by name",
        input_schema = schema_for::<SearchGeoTargetsInput>(),
        annotations(
            title = "Search Geographic Locations",
            read_only_hint = true,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn search_geo_targets(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_search_geo_targets", params).await
    }

    #[tool(
        name = "google_ads_set_geo_targets",
        description = "Target or exclude locations on a campaign",
        input_schema = schema_for::<SetGeoTargetsInput>(),
        annotations(
            title = "Set Geographic Targets",
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = true
        )
    )]
    async fn set_geo_targets(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_set_geo_targets", params).await
    }

    #[tool(
        name = "google_ads_remove_geo_targets",
        description = "Remove location criteria from a campaign",
        input_schema = schema_for::<RemoveGeoTargetsInput>(),
        annotations(
            title = "Remove Geographic Targets",
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = true,
            open_world_hint = false
        )
    )]
    async fn remove_geo_targets(
        &self,
        params: Parameters<Value>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch_tool("google_ads_remove_geo_targets", params).await
    }
}

#[tool_handler]
impl rmcp::ServerHandler for GoogleAdsMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Google Ads MCP server. Start with google_ads_list_accounts, then pass the \
                 10-digit customer_id to campaign, keyword, ad and reporting tools. Every tool \
                 accepts response_format 'markdown' (default) or 'json'. Entities are created PAUSED."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Serve MCP over stdin/stdout until the client disconnects.
pub async fn serve_stdio(dispatcher: ToolDispatcher) -> anyhow::Result<()> {
    let server = GoogleAdsMcpServer::new(dispatcher);
    tracing::info!(tools = server.tools().len(), "serving MCP over stdio");
    let service = server.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;
    Ok(())
}
