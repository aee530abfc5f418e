//! Shared types for the gads workspace.
//!
//! - [`ids`]: customer ids, numeric resource ids and resource-name builders
//! - [`enums`]: the enumerations tool parameters accept (statuses, channel
//!   types, date presets, ...)
//! - [`money`]: micros conversion and number formatting used by reports
//! - [`env_utils`]: typed environment variable parsing

pub mod enums;
pub mod env_utils;
pub mod ids;
pub mod money;

pub use enums::*;
pub use ids::{CustomerId, IdError};
