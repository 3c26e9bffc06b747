#![forbid(unsafe_code)]

//! Core logic for the drain current-consumption ledger.
//!
//! This crate provides:
//! - Unit conversion (microamps and seconds to milliamp-hours)
//! - Usage records and their display form
//! - The consumption ledger with its running total and capacity check
//! - JSON file persistence
//! - Configuration and logging setup shared by the binary

pub mod error;
pub mod config;
pub mod logging;
pub mod units;
pub mod record;
pub mod store;
pub mod ledger;

// Re-export commonly used types
pub use error::{Error, Result};
pub use config::Config;
pub use units::{compute_consumption, MilliampHours};
pub use record::{format_record, parse_formatted, UsageRecord, DEFAULT_DEVICE_NAME};
pub use store::{JsonFileStore, LedgerStore};
pub use ledger::{AddOutcome, Ledger};
