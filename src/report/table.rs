//! Text table for the command line

use std::fmt::Write;

use crate::report::comparison::{ComparisonSet, StatusFilter};

const UP_TO_DATE: &str = "Charts are up-to-date 🎉";
const STATUS_LATEST: &str = "✅";
const STATUS_OUTDATED: &str = "⬆️";

/// Render the comparison set as a padded table
///
/// When every release was compared and none has an update, a single
/// up-to-date line is rendered instead of the table.
pub fn render(set: &ComparisonSet, filter: StatusFilter) -> String {
    if !set.has_updates() && set.gaps().is_empty() {
        return format!("{}\n", UP_TO_DATE);
    }

    // Widths cover every release so that switching filters keeps columns stable
    let name_width = set.iter().map(|c| c.name().len()).max().unwrap_or(0) + 1;
    let version_width = set
        .iter()
        .map(|c| c.current.version.len())
        .max()
        .unwrap_or(0)
        .max("Current".len())
        + 1;

    let mut out = String::from("\n");
    let _ = writeln!(
        out,
        "{:<name_width$} {:<version_width$}  {:>version_width$} {:>version_width$}",
        "Chart", "Current", "Latest", "Status",
    );

    for comparison in set.filtered(filter) {
        let status = if comparison.has_update() {
            STATUS_OUTDATED
        } else {
            STATUS_LATEST
        };
        let _ = writeln!(
            out,
            "{:<name_width$} {:<version_width$}  {:>version_width$}     {}",
            comparison.name(),
            comparison.current.version,
            comparison.latest.version,
            status,
        );
    }

    out
}
