use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use renderer::{ColorSpaceMode, GpuPowerPreference, RendererConfig};
use warpconfig::{ColorSpaceSetting, PowerSetting, WarpConfig};

use crate::cli::RunArgs;
use crate::paths::AppPaths;

/// Configuration after the file and the command line have been merged.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: WarpConfig,
    /// File the configuration was read from, if any.
    pub source: Option<PathBuf>,
    pub asset_roots: Vec<PathBuf>,
}

impl ResolvedConfig {
    pub fn load(args: &RunArgs, paths: &AppPaths) -> Result<Self> {
        let (mut config, source) = match &args.config {
            Some(path) => (read_config(path)?, Some(path.clone())),
            None => {
                let default_path = paths.config_file();
                if default_path.is_file() {
                    (read_config(&default_path)?, Some(default_path))
                } else {
                    tracing::debug!(
                        path = %default_path.display(),
                        "no configuration file; using defaults"
                    );
                    (WarpConfig::default(), None)
                }
            }
        };

        apply_overrides(&mut config, args);
        config
            .validate()
            .context("invalid configuration after applying command-line overrides")?;

        let asset_roots = paths.asset_roots(source.as_deref());
        Ok(Self {
            config,
            source,
            asset_roots,
        })
    }

    /// Finds the texture file and builds the renderer's start-up settings.
    pub fn renderer_config(&self) -> Result<RendererConfig> {
        let texture_path = renderer::resolve_asset(&self.config.texture.asset, &self.asset_roots)?;
        let window = &self.config.window;
        Ok(RendererConfig {
            surface_size: self.config.surface_size(),
            title: window.title.clone(),
            texture_path,
            clear_color: window.clear_color.into(),
            color_space: color_space_mode(self.config.renderer.color_space),
            power: power_preference(self.config.renderer.power),
        })
    }
}

fn read_config(path: &Path) -> Result<WarpConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration at {}", path.display()))?;
    let config = WarpConfig::from_toml_str(&text)
        .with_context(|| format!("failed to load configuration at {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

pub fn apply_overrides(config: &mut WarpConfig, args: &RunArgs) {
    if let Some((width, height)) = args.size {
        config.window.width = width;
        config.window.height = height;
    }
    if let Some(texture) = &args.texture {
        config.texture.asset = texture.clone();
    }
    if let Some(motion) = args.motion {
        config.animation.motion = motion;
    }
    if let Some(seed) = args.seed {
        config.animation.seed = seed;
    }
    if let Some(step) = args.step {
        config.animation.step = step;
    }
    if let Some(color_space) = args.color_space {
        config.renderer.color_space = color_space;
    }
    if let Some(power) = args.power {
        config.renderer.power = power;
    }
}

fn color_space_mode(setting: ColorSpaceSetting) -> ColorSpaceMode {
    match setting {
        ColorSpaceSetting::Gamma => ColorSpaceMode::Gamma,
        ColorSpaceSetting::Linear => ColorSpaceMode::Linear,
    }
}

fn power_preference(setting: PowerSetting) -> GpuPowerPreference {
    match setting {
        PowerSetting::Low => GpuPowerPreference::Low,
        PowerSetting::High => GpuPowerPreference::High,
    }
}
