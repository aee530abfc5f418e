//! Core building blocks shared by the MCP server and the CLI.
//!
//! # Modules
//!
//! - [`response`] - unified [`ToolResponse`] returned by every tool
//! - [`error`] - the [`AdsError`] taxonomy and its conversion into responses
//! - [`validate`] - input parsing and reusable field validators
//! - [`format`] - markdown/JSON rendering and output truncation
//! - [`markdown`] - tables and small formatting helpers for reports
//! - [`gaql`] - Google Ads Query Language builder
//! - [`batch`] - atomic mutate batches with temporary resource ids
//! - [`rows`] - typed access to API result rows

pub mod batch;
pub mod error;
pub mod format;
pub mod gaql;
pub mod markdown;
pub mod response;
pub mod rows;
pub mod validate;

pub use batch::{BatchResult, MutateBatch, Service};
pub use error::AdsError;
pub use format::{Report, CHARACTER_LIMIT};
pub use gaql::Query;
pub use response::{ToolMeta, ToolResponse};
pub use validate::{parse_input, ValidationError};
