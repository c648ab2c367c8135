mod args;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    let options = cli.render_options()?;
    let report = snapreel_core::run(&cli.input, &cli.prefix, &options).map_err(|err| {
        let stage = err.stage();
        anyhow::Error::new(err).context(format!(
            "{stage} stage failed for {}",
            cli.input.display()
        ))
    })?;

    info!(
        frames = report.frames.len(),
        min_log = report.scale.min_log(),
        max_log = report.scale.max_log(),
        "done"
    );
    if let Some(path) = &report.manifest {
        info!("Wrote manifest: {}", path.display());
    }
    Ok(())
}

fn init_tracing(forced_level: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(forced_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// `-v`/`-q` win over `RUST_LOG`, which wins over the `info` default.
fn log_filter(forced_level: Option<&str>) -> EnvFilter {
    match forced_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

/// Load `--config` JSON, if any, as the base for flag overrides.
fn read_config(path: &std::path::Path) -> Result<snapreel_core::RenderOptions> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    serde_json::from_slice(&data)
        .with_context(|| format!("Failed to parse config: {}", path.display()))
}
