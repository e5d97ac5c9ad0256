//! CLI command implementations

pub mod alerts;
pub mod completions;
pub mod config;
pub mod consume;
pub mod history;
pub mod init;
pub mod lot;
pub mod price;
pub mod status;
pub mod wish;
