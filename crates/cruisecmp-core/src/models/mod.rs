//! Data models for extracted records, runs and configuration.

pub mod config;
pub mod record;
pub mod run;
