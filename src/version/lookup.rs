//! Latest chart lookup for a single release

use tracing::debug;

use crate::manifest::Release;
use crate::version::error::RegistryError;
use crate::version::registry::ChartRegistry;
use crate::version::types::ChartLookup;

/// Look up the latest chart for a release
///
/// Local charts are never sent to the registry: their latest version is the pinned one.
/// Otherwise the first search result is taken as the latest chart.
pub async fn lookup_latest(
    registry: &dyn ChartRegistry,
    release: &Release,
) -> Result<ChartLookup, RegistryError> {
    let release = release.with_installed_default();

    if release.is_local_chart() {
        debug!(
            "Skipping registry lookup for {}: local chart {}",
            release.name, release.chart
        );
        return Ok(ChartLookup {
            chart_name: release.chart,
            latest_version: release.version,
            installed: release.installed,
        });
    }

    let charts = registry.search(&release.chart).await?;
    let Some(latest) = charts.into_iter().next() else {
        return Err(RegistryError::NotFound(release.chart));
    };

    debug!(
        "Latest chart for {}: {} {}",
        release.name, latest.name, latest.version
    );

    Ok(ChartLookup {
        chart_name: latest.name,
        latest_version: latest.version,
        installed: latest.installed,
    })
}
