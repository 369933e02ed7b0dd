//! Comparison results and their textual rendering
//!
//! # Modules
//!
//! - [`comparison`]: Per-release comparison and the ordered comparison set
//! - [`table`]: Text table consumed by the command line

pub mod comparison;
pub mod table;

pub use comparison::{ComparisonSet, ReleaseComparison, StatusFilter};
pub use table::render;
