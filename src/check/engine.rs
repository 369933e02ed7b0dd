//! Concurrent update detection

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, error, info};

use crate::check::error::{LookupFailure, LookupFailures};
use crate::config::LOOKUP_TIMEOUT_MS;
use crate::manifest::Release;
use crate::report::{ComparisonSet, ReleaseComparison};
use crate::version::error::RegistryError;
use crate::version::lookup::lookup_latest;
use crate::version::registry::ChartRegistry;
use crate::version::types::ChartLookup;

/// Tuning for a detection run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    /// Upper bound for a single lookup; `None` waits forever
    pub lookup_timeout: Option<Duration>,
    /// Maximum number of lookups in flight; `None` starts all of them at once
    pub max_concurrency: Option<usize>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            lookup_timeout: Some(Duration::from_millis(LOOKUP_TIMEOUT_MS)),
            max_concurrency: None,
        }
    }
}

/// Compares every release of a manifest against its chart registry
pub struct UpdateChecker {
    registry: Arc<dyn ChartRegistry>,
    options: CheckOptions,
}

impl UpdateChecker {
    pub fn new(registry: Arc<dyn ChartRegistry>) -> Self {
        Self {
            registry,
            options: CheckOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CheckOptions) -> Self {
        self.options = options;
        self
    }

    /// Refresh the registry index, passing each progress line to `on_line` as it arrives
    pub async fn refresh_index<F>(&self, mut on_line: F) -> Result<(), RegistryError>
    where
        F: FnMut(&str),
    {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let update = self.registry.update_index(tx);
        let forward = async {
            while let Some(line) = rx.recv().await {
                on_line(&line);
            }
        };

        let (result, ()) = tokio::join!(update, forward);
        result
    }

    /// Look up every release concurrently and compare it with its latest chart
    ///
    /// The returned set has one slot per release, in manifest order. Failed lookups
    /// leave an empty slot and are collected into the returned failures; they never
    /// stop the other lookups.
    pub async fn run(&self, releases: &[Release]) -> (ComparisonSet, Option<LookupFailures>) {
        info!("Checking {} releases for chart updates", releases.len());

        let limiter = self
            .options
            .max_concurrency
            .map(|limit| Arc::new(Semaphore::new(limit.max(1))));

        let handles: Vec<_> = releases
            .iter()
            .cloned()
            .map(|release| {
                let registry = Arc::clone(&self.registry);
                let limiter = limiter.clone();
                let timeout = self.options.lookup_timeout;
                tokio::spawn(async move {
                    let _permit = match limiter {
                        Some(limiter) => limiter.acquire_owned().await.ok(),
                        None => None,
                    };
                    lookup_with_timeout(registry.as_ref(), &release, timeout).await
                })
            })
            .collect();

        // join_all yields outcomes in spawn order, so outcome i belongs to release i
        let outcomes = join_all(handles).await;

        let mut slots = Vec::with_capacity(releases.len());
        let mut failures = Vec::new();

        for (index, (release, outcome)) in releases.iter().zip(outcomes).enumerate() {
            let outcome = outcome.unwrap_or_else(|e| Err(RegistryError::Task(e.to_string())));
            match outcome {
                Ok(lookup) => {
                    let comparison = ReleaseComparison::new(release, lookup);
                    debug!(
                        "{}: current {}, latest {}",
                        comparison.name(),
                        comparison.current.version,
                        comparison.latest.version
                    );
                    slots.push(Some(comparison));
                }
                Err(source) => {
                    error!(
                        "Failed to look up release {} ({}): {}",
                        release.name, release.chart, source
                    );
                    failures.push(LookupFailure {
                        index,
                        release: release.name.clone(),
                        chart: release.chart.clone(),
                        source,
                    });
                    slots.push(None);
                }
            }
        }

        (
            ComparisonSet::new(slots),
            LookupFailures::from_failures(failures, releases.len()),
        )
    }
}

async fn lookup_with_timeout(
    registry: &dyn ChartRegistry,
    release: &Release,
    timeout: Option<Duration>,
) -> Result<ChartLookup, RegistryError> {
    let Some(limit) = timeout else {
        return lookup_latest(registry, release).await;
    };

    tokio::time::timeout(limit, lookup_latest(registry, release))
        .await
        .map_err(|_| RegistryError::Timeout {
            chart: release.chart.clone(),
            timeout: limit,
        })?
}
