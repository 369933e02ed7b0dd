//! Helmfile manifest loading
//!
//! # Modules
//!
//! - [`types`]: Release declarations as written in the manifest
//! - [`loader`]: Reads and parses a helmfile into an ordered release list

pub mod loader;
pub mod types;

pub use loader::{ManifestError, load, parse};
pub use types::Release;
