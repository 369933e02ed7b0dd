//! Per-release comparison results

use serde::Deserialize;
use tracing::warn;

use crate::manifest::Release;
use crate::version::semver::{CompareResult, compare_versions};
use crate::version::types::ChartLookup;

/// Which releases a report shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Every release
    #[default]
    All,
    /// Releases already at the latest chart version
    Latest,
    /// Releases with a newer chart version available
    Outdated,
}

impl StatusFilter {
    pub fn matches(&self, comparison: &ReleaseComparison) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Latest => !comparison.has_update(),
            StatusFilter::Outdated => comparison.has_update(),
        }
    }
}

/// Current and latest chart for one release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseComparison {
    /// The release as declared, with the `installed` default applied
    pub current: Release,
    /// The same release pointing at the latest chart found
    pub latest: Release,
    status: CompareResult,
}

impl ReleaseComparison {
    pub fn new(release: &Release, lookup: ChartLookup) -> Self {
        let current = release.with_installed_default();
        let latest = Release {
            name: current.name.clone(),
            chart: lookup.chart_name,
            version: lookup.latest_version,
            installed: lookup.installed,
        };

        let status = compare_versions(&current.version, &latest.version);
        if status == CompareResult::Invalid {
            warn!(
                "Failed to compare versions for {}: current {:?}, latest {:?}",
                current.name, current.version, latest.version
            );
        }

        Self {
            current,
            latest,
            status,
        }
    }

    pub fn name(&self) -> &str {
        &self.current.name
    }

    pub fn status(&self) -> CompareResult {
        self.status
    }

    /// Returns true if the latest chart version is newer than the pinned one
    pub fn has_update(&self) -> bool {
        self.status == CompareResult::Outdated
    }
}

/// Comparisons in manifest order
///
/// Slot `i` belongs to release `i` of the manifest. A slot is empty when the
/// lookup for that release failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonSet {
    slots: Vec<Option<ReleaseComparison>>,
}

impl ComparisonSet {
    pub fn new(slots: Vec<Option<ReleaseComparison>>) -> Self {
        Self { slots }
    }

    /// Number of slots, including empty ones
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ReleaseComparison> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn slots(&self) -> &[Option<ReleaseComparison>] {
        &self.slots
    }

    /// Comparisons that were computed, in manifest order
    pub fn iter(&self) -> impl Iterator<Item = &ReleaseComparison> {
        self.slots.iter().flatten()
    }

    /// Indexes of releases whose lookup failed
    pub fn gaps(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(index, _)| index)
            .collect()
    }

    /// Returns true if any computed comparison has a newer chart version
    pub fn has_updates(&self) -> bool {
        self.iter().any(ReleaseComparison::has_update)
    }

    pub fn filtered(&self, filter: StatusFilter) -> impl Iterator<Item = &ReleaseComparison> {
        self.iter().filter(move |comparison| filter.matches(comparison))
    }
}
