//! Google Ads Transport Layer
//!
//! Everything between a tool handler and the Google Ads REST API.
//!
//! This crate provides:
//! - [`credentials`]: loads developer token and OAuth client settings from the environment
//! - [`oauth`]: authorization headers from `google-cloud-auth` user-account credentials
//! - [`rest`]: blocking REST client (search with pagination, mutate, recommendations, geo suggest)
//! - [`error`]: parses API failures into classified [`ApiError`]s
//! - [`api`]: the [`AdsApi`] trait handlers program against
//!
//! # Example
//!
//! ```ignore
//! use gads_transport::{AdsApi, ApiConfig, Credentials, GoogleAdsClient};
//! use gads_types::CustomerId;
//!
//! let client = GoogleAdsClient::new(Credentials::from_env()?, ApiConfig::from_env())?;
//! let customer = CustomerId::parse("123-456-7890")?;
//! let rows = client.search(&customer, "SELECT campaign.id FROM campaign")?;
//! ```

pub mod api;
pub mod credentials;
pub mod error;
pub mod oauth;
pub mod rest;

pub use api::AdsApi;
pub use credentials::{ApiConfig, ConfigError, Credentials};
pub use error::{ApiError, ApiErrorDetail, ApiErrorKind};
pub use rest::GoogleAdsClient;
