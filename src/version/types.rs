//! Common types for chart lookups

use serde::Deserialize;

/// One record of `helm search repo --output json`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChartInfo {
    /// Fully qualified chart name (e.g., "bitnami/nginx")
    pub name: String,
    /// Chart version
    pub version: String,
    /// Version of the packaged application
    #[serde(default)]
    pub app_version: Option<String>,
    /// Chart description
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub installed: Option<bool>,
}

impl ChartInfo {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: version.to_string(),
            app_version: None,
            description: None,
            installed: None,
        }
    }
}

/// The latest chart known for a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartLookup {
    pub chart_name: String,
    pub latest_version: String,
    pub installed: Option<bool>,
}
