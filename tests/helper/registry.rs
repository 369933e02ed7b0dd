//! Registry test utilities

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Barrier;
use tokio::sync::mpsc::UnboundedSender;

use helmfile_updates::version::error::RegistryError;
use helmfile_updates::version::registry::ChartRegistry;
use helmfile_updates::version::types::ChartInfo;

/// In-memory registry with per-chart latency and failures
#[derive(Default)]
pub struct FakeRegistry {
    charts: HashMap<String, Vec<ChartInfo>>,
    failing: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    progress: Vec<String>,
    barrier: Option<Arc<Barrier>>,
    searched: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chart(mut self, chart: &str, results: Vec<(&str, &str)>) -> Self {
        self.charts.insert(
            chart.to_string(),
            results
                .into_iter()
                .map(|(name, version)| ChartInfo::new(name, version))
                .collect(),
        );
        self
    }

    pub fn with_failure(mut self, chart: &str, message: &str) -> Self {
        self.failing.insert(chart.to_string(), message.to_string());
        self
    }

    pub fn with_delay(mut self, chart: &str, delay: Duration) -> Self {
        self.delays.insert(chart.to_string(), delay);
        self
    }

    pub fn with_progress(mut self, lines: Vec<&str>) -> Self {
        self.progress = lines.into_iter().map(str::to_string).collect();
        self
    }

    /// Every search waits until `parties` searches are running at the same time
    pub fn with_barrier(mut self, parties: usize) -> Self {
        self.barrier = Some(Arc::new(Barrier::new(parties)));
        self
    }

    /// Charts searched so far, in call order
    pub fn searched(&self) -> Vec<String> {
        self.searched.lock().unwrap().clone()
    }

    /// Highest number of searches that were running at once
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChartRegistry for FakeRegistry {
    async fn update_index(&self, progress: UnboundedSender<String>) -> Result<(), RegistryError> {
        for line in &self.progress {
            let _ = progress.send(line.clone());
        }
        Ok(())
    }

    async fn search(&self, chart: &str) -> Result<Vec<ChartInfo>, RegistryError> {
        self.searched.lock().unwrap().push(chart.to_string());

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if let Some(delay) = self.delays.get(chart) {
            tokio::time::sleep(*delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(message) = self.failing.get(chart) {
            return Err(RegistryError::Command {
                command: format!("helm search repo {}", chart),
                message: message.clone(),
            });
        }

        Ok(self.charts.get(chart).cloned().unwrap_or_default())
    }
}
