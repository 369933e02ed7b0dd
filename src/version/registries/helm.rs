//! helm CLI implementation

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::version::error::RegistryError;
use crate::version::registry::ChartRegistry;
use crate::version::types::ChartInfo;

/// Default helm binary, resolved through PATH
pub const DEFAULT_BINARY: &str = "helm";

/// Registry implementation backed by the `helm` command line tool
pub struct HelmCli {
    binary: PathBuf,
    devel: bool,
}

impl HelmCli {
    /// Creates a new HelmCli that runs the given binary
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            devel: false,
        }
    }

    /// Include development versions (alpha, beta, rc) in search results
    pub fn with_devel(mut self, devel: bool) -> Self {
        self.devel = devel;
        self
    }

    fn search_args<'a>(&self, chart: &'a str) -> Vec<&'a str> {
        let mut args = vec!["search", "repo", chart, "--output", "json"];
        if self.devel {
            args.push("--devel");
        }
        args
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.binary.display(), args.join(" "))
    }

    fn failure_message(status: ExitStatus, stderr: &str) -> String {
        let stderr = stderr.trim();
        if stderr.is_empty() {
            format!("exited with {}", status)
        } else {
            format!("exited with {}: {}", status, stderr)
        }
    }
}

#[async_trait::async_trait]
impl ChartRegistry for HelmCli {
    async fn update_index(&self, progress: UnboundedSender<String>) -> Result<(), RegistryError> {
        let args = ["repo", "update"];
        let command = self.describe(&args);
        let io_error = |source| RegistryError::Io {
            command: command.clone(),
            source,
        };

        debug!("Running {}", command);
        let mut child = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(io_error)?;

        // Drain stderr alongside stdout so neither pipe fills up
        let stderr = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            let mut buffer = String::new();
            if let Some(mut stderr) = stderr {
                let _ = stderr.read_to_string(&mut buffer).await;
            }
            buffer
        });

        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines.next_line().await.map_err(io_error)? {
                // A dropped receiver only means nobody is watching progress
                let _ = progress.send(line);
            }
        }

        let status = child.wait().await.map_err(io_error)?;
        let stderr = stderr_task.await.unwrap_or_default();

        if !status.success() {
            warn!("{} failed with {}", command, status);
            return Err(RegistryError::Command {
                command,
                message: Self::failure_message(status, &stderr),
            });
        }

        Ok(())
    }

    async fn search(&self, chart: &str) -> Result<Vec<ChartInfo>, RegistryError> {
        let args = self.search_args(chart);
        let command = self.describe(&args);

        debug!("Running {}", command);
        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| RegistryError::Io {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RegistryError::Command {
                message: Self::failure_message(output.status, &stderr),
                command,
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|e| {
            warn!("Failed to parse output of {}: {}", command, e);
            RegistryError::InvalidResponse(format!("{}: {}", command, e))
        })
    }
}
