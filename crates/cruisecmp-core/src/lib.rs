//! Core library for organized-cruise competitor comparison.
//!
//! This crate provides:
//! - A pattern catalog mapping trip fields to ordered Hebrew/English rules
//! - Field extraction from plain listing-page text
//! - Run accumulation with fetch-error tagging
//! - A Markdown comparison report with key differences between companies
//!
//! Fetching pages and writing output files are left to the caller.

pub mod error;
pub mod extract;
pub mod models;
pub mod report;
pub mod store;

pub use error::{CatalogError, CruiseError, Result};
pub use extract::{CatalogDef, Field, PatternCatalog, RecordExtractor, TripExtractor};
pub use models::config::ScanConfig;
pub use models::record::{ExtractedRecord, Inclusion, Inclusions};
pub use models::run::{FetchFailure, RunEntry, RunResult, SourceRecord};
pub use report::{ComparisonBuilder, PairSelection};
pub use store::{FetchedPage, RecordStore, SourceInput};
