use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use orb::OrbConfig;
use renderer::{Renderer, RendererConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::RunArgs;
use crate::paths::AppPaths;

const DEFAULT_TITLE: &str = "Nixate Orb";

pub fn run(args: RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    let orb = load_config(&args, &paths)?;
    let config = renderer_config(&args, orb);
    tracing::info!(
        width = config.window_size.0,
        height = config.window_size.1,
        antialias = ?config.antialiasing,
        brand = %config.orb.brand_color,
        "launching orb window"
    );

    let mut renderer = Renderer::new(config);
    renderer.run()
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// File `load_config` reads: `--config` when given, otherwise the default
/// location under the config directory.
pub fn config_path(args: &RunArgs, paths: &AppPaths) -> PathBuf {
    args.config.clone().unwrap_or_else(|| paths.config_file())
}

/// Loads the orb configuration and applies CLI overrides. A missing default
/// file yields the built-in look; a missing `--config` file is an error.
pub fn load_config(args: &RunArgs, paths: &AppPaths) -> Result<OrbConfig> {
    let path = config_path(args, paths);
    let mut config = if path.exists() {
        OrbConfig::load(&path)
            .with_context(|| format!("failed to load orb config from {}", path.display()))?
    } else if args.config.is_some() {
        bail!("config file {} does not exist", path.display());
    } else {
        tracing::debug!(path = %path.display(), "no orb config found; using defaults");
        OrbConfig::default()
    };

    if let Some(brand) = args.brand {
        config.brand_color = brand;
    }
    Ok(config)
}

pub fn renderer_config(args: &RunArgs, orb: OrbConfig) -> RendererConfig {
    RendererConfig {
        window_size: args.size,
        title: args
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        antialiasing: args.antialias,
        orb,
    }
}
