//! Common types for manifest entries

use serde::{Deserialize, Deserializer};

/// Chart reference prefixes that point at a chart on the local filesystem
const LOCAL_CHART_PREFIXES: [&str; 3] = ["/", "./", "../"];

/// A single release declared in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// Release name (e.g., "ingress-nginx")
    pub name: String,
    /// Chart reference: `repo/chart` or a local path
    pub chart: String,
    /// Pinned chart version, empty when the manifest leaves it out
    #[serde(default, deserialize_with = "deserialize_version")]
    pub version: String,
    /// Whether the release should be installed; absent in most manifests
    #[serde(default)]
    pub installed: Option<bool>,
}

impl Release {
    pub fn new(name: &str, chart: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            chart: chart.to_string(),
            version: version.to_string(),
            installed: None,
        }
    }

    /// Effective `installed` value; helmfile treats an absent flag as true
    pub fn is_installed(&self) -> bool {
        self.installed.unwrap_or(true)
    }

    /// Returns true if the chart is referenced by a filesystem path instead of a registry
    pub fn is_local_chart(&self) -> bool {
        LOCAL_CHART_PREFIXES
            .iter()
            .any(|prefix| self.chart.starts_with(prefix))
    }

    /// Copy of this release with the `installed` default applied
    pub fn with_installed_default(&self) -> Self {
        Self {
            installed: Some(self.is_installed()),
            ..self.clone()
        }
    }
}

/// Top-level manifest document; keys other than `releases` are ignored
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ManifestDocument {
    #[serde(default)]
    pub releases: Vec<Release>,
}

/// Accepts `version: 1.2.3`, `version: "1.2.3"` and bare numbers such as `version: 1.0`
fn deserialize_version<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Number(serde_yaml_ng::Number),
    }

    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Text(text)) => text,
        Some(Scalar::Number(number)) => number.to_string(),
        None => String::new(),
    })
}
