use std::io::{self, Write};

use animator::Animator;
use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::{RunArgs, TraceArgs};
use crate::paths::AppPaths;
use crate::settings::ResolvedConfig;
use crate::trace;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn resolve(args: &RunArgs) -> Result<(AppPaths, ResolvedConfig)> {
    let paths = AppPaths::discover()?;
    let resolved = ResolvedConfig::load(args, &paths)?;
    tracing::debug!(
        config = %paths.config_dir().display(),
        data = %paths.data_dir().display(),
        source = ?resolved.source,
        "resolved sandwarp paths"
    );
    Ok((paths, resolved))
}

/// Opens the window and animates until it is closed.
pub fn run(args: RunArgs) -> Result<()> {
    let (_, resolved) = resolve(&args)?;
    let renderer_config = resolved.renderer_config()?;
    let animator = Animator::from_config(&resolved.config.animation)
        .context("failed to configure animator")?;
    tracing::info!(
        motion = %resolved.config.animation.motion,
        size = ?renderer_config.surface_size,
        "bootstrapping sandwarp"
    );
    renderer::run(&renderer_config, animator)
}

/// Advances the animator headless and prints each tick.
pub fn run_trace(args: RunArgs, trace_args: TraceArgs) -> Result<()> {
    let (_, resolved) = resolve(&args)?;
    let mut animator = Animator::from_config(&resolved.config.animation)
        .context("failed to configure animator")?;
    let rows = trace::collect(&mut animator, trace_args.ticks);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    trace::write_rows(&mut out, &rows, trace_args.json)?;
    out.flush()?;
    Ok(())
}

/// Prints where configuration and assets are looked up, then the merged config.
pub fn run_config(args: RunArgs) -> Result<()> {
    let (paths, resolved) = resolve(&args)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "# config dir: {}", paths.config_dir().display())?;
    writeln!(out, "# data dir:   {}", paths.data_dir().display())?;
    match &resolved.source {
        Some(source) => writeln!(out, "# loaded:     {}", source.display())?,
        None => writeln!(
            out,
            "# loaded:     (defaults; {} not found)",
            paths.config_file().display()
        )?,
    }
    for root in &resolved.asset_roots {
        writeln!(out, "# asset root: {}", root.display())?;
    }
    writeln!(out)?;
    write!(out, "{}", resolved.config.to_toml_string()?)?;
    out.flush()?;
    Ok(())
}
