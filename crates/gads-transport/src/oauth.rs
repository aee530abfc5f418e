//! Bearer headers for the Google Ads API.
//!
//! The refresh-token exchange and token caching belong to `google-cloud-auth`:
//! the four credential variables are handed to it as an `authorized_user`
//! document and every request asks it for headers. The REST client is
//! blocking, so the async credential calls run on a small runtime owned here.

use google_cloud_auth::credentials::{user_account, CacheableResource, Credentials as AuthCredentials};
use parking_lot::RwLock;
use serde_json::{json, Value};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::credentials::Credentials;
use crate::error::{ApiError, ApiErrorKind};

/// `authorized_user` document for the user-account credential builder.
pub fn authorized_user(token_uri: &str, credentials: &Credentials) -> Value {
    json!({
        "type": "authorized_user",
        "client_id": credentials.client_id,
        "client_secret": credentials.client_secret,
        "refresh_token": credentials.refresh_token,
        "token_uri": token_uri,
    })
}

/// Hands out authorization headers for API requests.
pub struct AuthHeaders {
    credentials: AuthCredentials,
    // Last headers returned; served again when the library reports `NotModified`.
    cached: RwLock<Option<Vec<(String, String)>>>,
    runtime: Option<Runtime>,
}

impl std::fmt::Debug for AuthHeaders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHeaders").finish_non_exhaustive()
    }
}

impl AuthHeaders {
    pub fn new(token_uri: &str, credentials: &Credentials) -> Result<Self, ApiError> {
        let auth = user_account::Builder::new(authorized_user(token_uri, credentials))
            .build()
            .map_err(|e| {
                ApiError::new(
                    ApiErrorKind::Authentication,
                    format!("Invalid OAuth client settings: {}", e),
                )
            })?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("gads-auth")
            .enable_all()
            .build()
            .map_err(|e| ApiError::transport(format!("Failed to start auth runtime: {}", e)))?;
        Ok(Self {
            credentials: auth,
            cached: RwLock::new(None),
            runtime: Some(runtime),
        })
    }

    /// Headers to attach to the next request. Must not be called from async
    /// code; the dispatcher calls the client from blocking workers.
    pub fn headers(&self) -> Result<Vec<(String, String)>, ApiError> {
        let runtime = self
            .runtime
            .as_ref()
            .ok_or_else(|| ApiError::transport("auth runtime already shut down"))?;
        let fetched = runtime
            .block_on(self.credentials.headers(Default::default()))
            .map_err(|e| {
                let kind = if e.is_transient() {
                    ApiErrorKind::Transport
                } else {
                    ApiErrorKind::Authentication
                };
                ApiError::new(kind, format!("OAuth token refresh failed: {}", e))
            })?;

        match fetched {
            CacheableResource::New { data, .. } => {
                debug!("obtained fresh authorization headers");
                let headers: Vec<(String, String)> = data
                    .iter()
                    .filter_map(|(name, value)| {
                        value
                            .to_str()
                            .ok()
                            .map(|v| (name.as_str().to_string(), v.to_string()))
                    })
                    .collect();
                *self.cached.write() = Some(headers.clone());
                Ok(headers)
            }
            CacheableResource::NotModified => self.cached.read().clone().ok_or_else(|| {
                ApiError::new(
                    ApiErrorKind::Authentication,
                    "credentials reported no change before any headers were issued",
                )
            }),
        }
    }
}

impl Drop for AuthHeaders {
    fn drop(&mut self) {
        // The client may be dropped on an async worker, where a blocking
        // runtime shutdown would panic.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorized_user_document() {
        let credentials = Credentials {
            developer_token: "dev".into(),
            client_id: "cid".into(),
            client_secret: "secret".into(),
            refresh_token: "refresh".into(),
            login_customer_id: None,
        };
        let doc = authorized_user("https://oauth2.example/token", &credentials);
        assert_eq!(doc["type"], "authorized_user");
        assert_eq!(doc["client_id"], "cid");
        assert_eq!(doc["refresh_token"], "refresh");
        assert_eq!(doc["token_uri"], "https://oauth2.example/token");
        assert!(doc.get("developer_token").is_none());
    }
}
