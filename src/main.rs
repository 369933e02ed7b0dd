use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use helmfile_updates::check::UpdateChecker;
use helmfile_updates::config::{Config, DEFAULT_MANIFEST_PATH};
use helmfile_updates::logging::{self, LogFormat};
use helmfile_updates::manifest;
use helmfile_updates::report::{self, StatusFilter};
use helmfile_updates::version::registries::HelmCli;

#[derive(Parser)]
#[command(name = "helmfile-updates")]
#[command(version, about = "Report helmfile releases with newer chart versions")]
struct Cli {
    /// Path to helmfile.yaml
    #[arg(long, default_value = DEFAULT_MANIFEST_PATH)]
    path: PathBuf,

    /// Filter releases by status
    #[arg(long, value_enum)]
    status: Option<StatusFilter>,

    /// Run `helm repo update` before comparing versions
    #[arg(long)]
    update_repos: bool,

    /// helm binary to run
    #[arg(long)]
    helm: Option<PathBuf>,

    /// Consider development versions (alpha, beta, rc) as latest
    #[arg(long)]
    devel: bool,

    /// Timeout for a single chart lookup in seconds, 0 disables it
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum number of concurrent chart lookups
    #[arg(long)]
    max_concurrency: Option<usize>,

    /// Configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Command line flags take precedence over the configuration file
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;

        if let Some(helm) = &self.helm {
            config.helm.binary = helm.clone();
        }
        if self.devel {
            config.helm.devel = true;
        }
        if let Some(timeout) = self.timeout {
            config.check.lookup_timeout_ms = timeout.saturating_mul(1000);
        }
        if let Some(max_concurrency) = self.max_concurrency {
            config.check.max_concurrency = Some(max_concurrency);
        }
        if let Some(status) = self.status {
            config.report.status = status;
        }

        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init(cli.log_format, cli.log_file.as_deref(), cli.verbose)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.resolve_config()?;

    let releases = manifest::load(&cli.path).context("Failed to load helmfile")?;

    let registry = HelmCli::new(&config.helm.binary).with_devel(config.helm.devel);
    let checker = UpdateChecker::new(Arc::new(registry)).with_options(config.check.options());

    if cli.update_repos {
        checker
            .refresh_index(|line| println!("{}", line))
            .await
            .context("Failed to update repositories")?;
        println!();
    }

    println!("Comparing release versions...");
    let (comparisons, failures) = checker.run(&releases).await;

    print!("{}", report::render(&comparisons, config.report.status));

    if let Some(failures) = failures {
        return Err(anyhow::Error::new(failures).context("Failed to check for updates"));
    }

    Ok(())
}
