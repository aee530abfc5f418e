use gads_transport::{AdsApi, ApiConfig, ApiErrorKind, Credentials, GoogleAdsClient};
use gads_types::CustomerId;
use httpmock::prelude::*;
use serde_json::json;

fn credentials(login: Option<&str>) -> Credentials {
    Credentials {
        developer_token: "dev-token".to_string(),
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        refresh_token: "refresh-token".to_string(),
        login_customer_id: login.map(|l| CustomerId::parse(l).unwrap()),
    }
}

fn mock_token(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(POST)
            .path("/token")
            .body_contains("refresh-token")
            .body_contains("client-id");
        then.status(200)
            .json_body(json!({"access_token": "ya29.test", "expires_in": 3600, "token_type": "Bearer"}));
    })
}

fn client_for(server: &MockServer) -> GoogleAdsClient {
    GoogleAdsClient::new(credentials(None), ApiConfig::with_base_url(&server.base_url())).unwrap()
}

fn customer() -> CustomerId {
    CustomerId::parse("1234567890").unwrap()
}

#[test]
fn test_search_follows_page_tokens_and_sends_headers() {
    let server = MockServer::start();
    let token = mock_token(&server);
    let first = server.mock(|when, then| {
        when.method(POST)
            .path("/v19/customers/1234567890/googleAds:search")
            .header("developer-token", "dev-token")
            .header("authorization", "Bearer ya29.test")
            .header("login-customer-id", "9998887777")
            .json_body(json!({"query": "SELECT campaign.id FROM campaign"}));
        then.status(200).json_body(json!({
            "results": [{"campaign": {"id": "1"}}],
            "nextPageToken": "page-2"
        }));
    });
    let second = server.mock(|when, then| {
        when.method(POST)
            .path("/v19/customers/1234567890/googleAds:search")
            .json_body(json!({"query": "SELECT campaign.id FROM campaign", "pageToken": "page-2"}));
        then.status(200)
            .json_body(json!({"results": [{"campaign": {"id": "2"}}]}));
    });

    let client = GoogleAdsClient::new(
        credentials(Some("999-888-7777")),
        ApiConfig::with_base_url(&server.base_url()),
    )
    .unwrap();
    let rows = client
        .search(&customer(), "SELECT campaign.id FROM campaign")
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["campaign"]["id"], "2");
    first.assert();
    second.assert();
    // the bearer token is cached across pages
    token.assert_hits(1);
}

#[test]
fn test_mutate_returns_operation_responses() {
    let server = MockServer::start();
    mock_token(&server);
    let mutate = server.mock(|when, then| {
        when.method(POST)
            .path("/v19/customers/1234567890/googleAds:mutate")
            .body_contains("mutateOperations")
            .body_contains("campaignBudgetOperation");
        then.status(200).json_body(json!({
            "mutateOperationResponses": [
                {"campaignBudgetResult": {"resourceName": "customers/1234567890/campaignBudgets/55"}},
                {"campaignResult": {"resourceName": "customers/1234567890/campaigns/77"}}
            ]
        }));
    });

    let client = client_for(&server);
    let ops = vec![
        json!({"campaignBudgetOperation": {"create": {"resourceName": "customers/1234567890/campaignBudgets/-1"}}}),
        json!({"campaignOperation": {"create": {"campaignBudget": "customers/1234567890/campaignBudgets/-1"}}}),
    ];
    let responses = client.mutate(&customer(), &ops).unwrap();

    mutate.assert();
    assert_eq!(
        responses[1]["campaignResult"]["resourceName"],
        "customers/1234567890/campaigns/77"
    );
}

#[test]
fn test_permission_denied_is_classified() {
    let server = MockServer::start();
    mock_token(&server);
    server.mock(|when, then| {
        when.method(POST)
            .path("/v19/customers/1234567890/googleAds:search");
        then.status(403).json_body(json!({
            "error": {
                "code": 403,
                "status": "PERMISSION_DENIED",
                "message": "The caller does not have permission",
                "details": [{
                    "@type": "type.googleapis.com/google.ads.googleads.v19.errors.GoogleAdsFailure",
                    "errors": [{
                        "errorCode": {"authorizationError": "USER_PERMISSION_DENIED"},
                        "message": "User doesn't have permission to access customer."
                    }],
                    "requestId": "abc"
                }]
            }
        }));
    });

    let client = client_for(&server);
    let err = client
        .search(&customer(), "SELECT customer.id FROM customer")
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Authorization);
    assert_eq!(err.http_status, Some(403));
    assert_eq!(err.request_id.as_deref(), Some("abc"));
}

#[test]
fn test_revoked_refresh_token_is_authentication_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/token");
        then.status(400).json_body(json!({
            "error": "invalid_grant",
            "error_description": "Token has been expired or revoked."
        }));
    });
    let search = server.mock(|when, then| {
        when.method(POST)
            .path("/v19/customers/1234567890/googleAds:search");
        then.status(200).json_body(json!({"results": []}));
    });

    let client = client_for(&server);
    let err = client.search(&customer(), "SELECT customer.id FROM customer").unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Authentication);
    assert!(err.message.contains("OAuth token refresh failed"));
    search.assert_hits(0);
}

#[test]
fn test_list_accessible_customers() {
    let server = MockServer::start();
    mock_token(&server);
    server.mock(|when, then| {
        when.method(GET).path("/v19/customers:listAccessibleCustomers");
        then.status(200).json_body(json!({
            "resourceNames": ["customers/1111111111", "customers/2222222222"]
        }));
    });

    let client = client_for(&server);
    let names = client.list_accessible_customers().unwrap();
    assert_eq!(names, vec!["customers/1111111111", "customers/2222222222"]);
}

#[test]
fn test_dismiss_recommendations_posts_operations() {
    let server = MockServer::start();
    mock_token(&server);
    let dismiss = server.mock(|when, then| {
        when.method(POST)
            .path("/v19/customers/1234567890/recommendations:dismiss")
            .json_body(json!({"operations": [{"resourceName": "customers/1234567890/recommendations/r1"}]}));
        then.status(200).json_body(json!({
            "results": [{"resourceName": "customers/1234567890/recommendations/r1"}]
        }));
    });

    let client = client_for(&server);
    let confirmed = client
        .dismiss_recommendations(
            &customer(),
            &["customers/1234567890/recommendations/r1".to_string()],
        )
        .unwrap();

    dismiss.assert();
    assert_eq!(confirmed.len(), 1);
}

#[test]
fn test_unreachable_endpoint_is_transport_error() {
    let mut config = ApiConfig::with_base_url("http://127.0.0.1:1");
    config.connect_timeout = std::time::Duration::from_secs(1);
    let client = GoogleAdsClient::new(credentials(None), config).unwrap();
    let err = client.list_accessible_customers().unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Transport);
}
