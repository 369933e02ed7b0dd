//! Helmfile loading

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::manifest::types::{ManifestDocument, Release};

/// Error type for manifest loading
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The manifest path does not point at a readable file
    #[error("file {} does not exist or is not readable", .0.display())]
    NotFound(PathBuf),

    /// The content is not a helmfile document (including content that is not UTF-8)
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

/// Read the manifest at `path` and return its releases in declaration order
pub fn load(path: &Path) -> Result<Vec<Release>, ManifestError> {
    if !path.is_file() {
        return Err(ManifestError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read(path).map_err(|e| {
        debug!("Failed to read {}: {}", path.display(), e);
        ManifestError::NotFound(path.to_path_buf())
    })?;

    let releases = parse(&content).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Loaded {} releases from {}", releases.len(), path.display());
    Ok(releases)
}

/// Parse manifest content
///
/// Every `---` separated document is read; releases are concatenated in document order.
/// Content that is not valid UTF-8 is rejected by the YAML reader.
pub fn parse(content: impl AsRef<[u8]>) -> Result<Vec<Release>, serde_yaml_ng::Error> {
    let mut releases = Vec::new();

    for document in serde_yaml_ng::Deserializer::from_slice(content.as_ref()) {
        if let Some(manifest) = Option::<ManifestDocument>::deserialize(document)? {
            releases.extend(manifest.releases);
        }
    }

    Ok(releases)
}
