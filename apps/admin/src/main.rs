use anyhow::{Context, Result};
use clap::Parser;
use sfa_bootstrap::domain::config::BootConfig;
use sfa_bootstrap::{BootOutcome, Bootstrap, RequestInfo};
use sfa_kernel::config::load_config;
use sfa_logger::{LevelFilter, Logger};
use std::path::PathBuf;
use tracing::info;

/// Boots the storefront admin panel for one request.
#[derive(Debug, Parser)]
#[command(name = "sfa-admin", version, about)]
struct Cli {
    /// Configuration file; `SFA__*` environment variables override its values.
    #[arg(short, long, default_value = "admin.toml")]
    config: PathBuf,

    /// Request script path, e.g. `/admin/index.php`.
    #[arg(short, long)]
    script: Option<String>,

    /// Writes rolling log files into this directory.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Debug-level logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg: BootConfig =
        load_config(Some(&cli.config)).context("Critical: Configuration is malformed")?;

    let _log = init_logger(&cli, &cfg)?;

    let request = cli.script.map(RequestInfo::script).unwrap_or_default();
    let mut boot = Bootstrap::builder().config(cfg).build().context("Failed to prepare bootstrap")?;
    let report = boot.run(&request).context("Bootstrap aborted")?;

    match &report.outcome {
        BootOutcome::Ready => info!(modules = boot.registry().len(), "Admin panel ready"),
        BootOutcome::Redirect { location } => info!(%location, "Install incomplete, redirect issued"),
        BootOutcome::ServedByUpdate { path } => {
            info!(path = %path.display(), "Request handed to update module");
        },
    }

    Ok(())
}

fn init_logger(cli: &Cli, cfg: &BootConfig) -> Result<Logger> {
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        cfg.log.level.parse().with_context(|| format!("Invalid log level '{}'", cfg.log.level))?
    };

    let mut builder = Logger::builder().name(env!("CARGO_PKG_NAME")).level(level);
    if let Some(dir) = cli.log_dir.as_ref().or(cfg.log.directory.as_ref()) {
        builder = builder.directory(dir);
        if cfg.log.json {
            builder = builder.json();
        }
    }

    builder.init().context("Failed to initialize logging")
}
