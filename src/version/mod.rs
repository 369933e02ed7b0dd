//! Chart version lookup and comparison
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│   Lookup    │────▶│   Semver    │
//! │ (helm CLI)  │     │  (latest)   │     │  (compare)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`registry`]: Registry trait for refreshing and searching chart repositories
//! - [`registries`]: Concrete registry implementations (helm CLI)
//! - [`lookup`]: Latest chart resolution for a single release
//! - [`semver`]: Version comparison tolerant of a leading `v`
//! - [`error`]: Error types for registry operations
//! - [`types`]: Common types like `ChartInfo`

pub mod error;
pub mod lookup;
pub mod registries;
pub mod registry;
pub mod semver;
pub mod types;
