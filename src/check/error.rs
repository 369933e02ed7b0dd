use std::fmt;

use thiserror::Error;

use crate::version::error::RegistryError;

/// A release whose latest chart could not be determined
#[derive(Debug, Error)]
#[error("failed to get release comparison for release {release} ({chart}): {source}")]
pub struct LookupFailure {
    /// Position of the release in the manifest
    pub index: usize,
    pub release: String,
    pub chart: String,
    #[source]
    pub source: RegistryError,
}

/// Every lookup failure of one run, in manifest order
#[derive(Debug)]
pub struct LookupFailures {
    failures: Vec<LookupFailure>,
    total: usize,
}

impl LookupFailures {
    /// Returns `None` when there is nothing to report
    pub fn from_failures(failures: Vec<LookupFailure>, total: usize) -> Option<Self> {
        if failures.is_empty() {
            None
        } else {
            Some(Self { failures, total })
        }
    }

    pub fn failures(&self) -> &[LookupFailure] {
        &self.failures
    }

    /// Names of the releases that failed
    pub fn releases(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.release.as_str()).collect()
    }
}

impl fmt::Display for LookupFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} release lookups failed",
            self.failures.len(),
            self.total
        )?;
        for failure in &self.failures {
            write!(f, "\n  - {}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for LookupFailures {}
