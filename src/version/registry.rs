//! Registry trait for querying chart versions through an external tool

#[cfg(test)]
use mockall::automock;
use tokio::sync::mpsc::UnboundedSender;

use crate::version::error::RegistryError;
use crate::version::types::ChartInfo;

/// Trait for refreshing and searching chart repositories
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ChartRegistry: Send + Sync {
    /// Refreshes the local repository index
    ///
    /// Each line of progress output is sent to `progress` as soon as it is produced.
    /// A closed receiver is not an error.
    async fn update_index(&self, progress: UnboundedSender<String>) -> Result<(), RegistryError>;

    /// Searches the repository index for a chart
    ///
    /// # Arguments
    /// * `chart` - Chart reference from the manifest (e.g., "bitnami/nginx")
    ///
    /// # Returns
    /// * `Ok(Vec<ChartInfo>)` - Matching charts, best match first
    /// * `Err(RegistryError)` - If the search could not be performed
    async fn search(&self, chart: &str) -> Result<Vec<ChartInfo>, RegistryError>;
}
