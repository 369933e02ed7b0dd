//! Update detection across all releases of a manifest
//!
//! # Modules
//!
//! - [`engine`]: Concurrent lookup fan-out and result aggregation
//! - [`error`]: Aggregated per-release lookup failures

pub mod engine;
pub mod error;

pub use engine::{CheckOptions, UpdateChecker};
pub use error::{LookupFailure, LookupFailures};
