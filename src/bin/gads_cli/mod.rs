//! CLI subcommand implementations for gads

pub mod call;
pub mod doctor;
pub mod host_config;
pub mod serve;
pub mod tools;
