use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to run {command}: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} failed: {message}")]
    Command { command: String, message: String },

    #[error("Chart not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Lookup for {chart} timed out after {timeout:?}")]
    Timeout { chart: String, timeout: Duration },

    #[error("Lookup task failed: {0}")]
    Task(String),
}
