use std::path::PathBuf;

use clap::{Parser, Subcommand};
use warpconfig::{ColorSpaceSetting, MotionKind, PowerSetting};

#[derive(Parser, Debug)]
#[command(
    name = "sandwarp",
    author,
    version,
    about = "Animated sand warp over a single texture",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Overrides layered on top of `sandwarp.toml`.
#[derive(Parser, Debug, Default, Clone)]
pub struct RunArgs {
    /// Configuration file to load instead of `<config dir>/sandwarp.toml`.
    #[arg(long, global = true, value_name = "FILE", env = "SANDWARP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Window size in physical pixels (e.g. `360x360`).
    #[arg(long, global = true, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,

    /// Texture asset name (searched in the asset roots) or image path.
    #[arg(long, global = true, value_name = "NAME|PATH")]
    pub texture: Option<String>,

    /// Motion strategy: orbit, wavy, linear, diagonal, spiral, pulsing, random, combined.
    #[arg(long, global = true, value_name = "KIND", value_parser = parse_motion)]
    pub motion: Option<MotionKind>,

    /// Seed for the random motion.
    #[arg(long, global = true, value_name = "N")]
    pub seed: Option<u64>,

    /// Phase advance per display tick, in radians.
    #[arg(long, global = true, value_name = "RADIANS", value_parser = parse_step)]
    pub step: Option<f64>,

    /// Output color space handling: `gamma` (non-sRGB surface) or `linear` (sRGB surface).
    #[arg(long, global = true, value_name = "MODE", value_parser = parse_color_space)]
    pub color_space: Option<ColorSpaceSetting>,

    /// GPU adapter preference: `low` or `high`.
    #[arg(long, global = true, value_name = "POWER", value_parser = parse_power)]
    pub power: Option<PowerSetting>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the window and animate (the default).
    Run,
    /// Run the animator without a window and print the per-tick parameters.
    Trace(TraceArgs),
    /// Print the resolved configuration and the directories searched.
    Config,
}

#[derive(Parser, Debug)]
pub struct TraceArgs {
    /// Number of ticks to advance.
    #[arg(long, value_name = "N", default_value_t = 10)]
    pub ticks: u64,

    /// Emit JSON instead of aligned columns.
    #[arg(long)]
    pub json: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("size must not be empty".to_string());
    }
    let (w, h) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid width '{}'", w.trim()))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid height '{}'", h.trim()))?;
    if width == 0 || height == 0 {
        return Err("size must be greater than zero".into());
    }
    Ok((width, height))
}

pub fn parse_motion(value: &str) -> Result<MotionKind, String> {
    value.parse()
}

pub fn parse_step(value: &str) -> Result<f64, String> {
    let step: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid step '{}'", value.trim()))?;
    if !step.is_finite() || step <= 0.0 {
        return Err("step must be a positive number of radians".into());
    }
    Ok(step)
}

pub fn parse_color_space(value: &str) -> Result<ColorSpaceSetting, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("color space must not be empty".to_string());
    }

    let normalized = trimmed.to_ascii_lowercase();
    match normalized.as_str() {
        "gamma" | "auto" | "srgb-off" => Ok(ColorSpaceSetting::Gamma),
        "linear" | "srgb" => Ok(ColorSpaceSetting::Linear),
        other => Err(format!(
            "unknown color space '{other}'; expected gamma or linear"
        )),
    }
}

pub fn parse_power(value: &str) -> Result<PowerSetting, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "low" | "low-power" | "integrated" => Ok(PowerSetting::Low),
        "high" | "high-performance" | "discrete" => Ok(PowerSetting::High),
        other => Err(format!("unknown power preference '{other}'; expected low or high")),
    }
}
