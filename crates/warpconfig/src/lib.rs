use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, SeqAccess};
use serde::{Deserialize, Serialize};

pub const CONFIG_VERSION: u32 = 1;
pub const DEFAULT_ASSET: &str = "sample";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialise configuration: {0}")]
    Serialise(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WarpConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub window: WindowSection,
    #[serde(default)]
    pub texture: TextureSection,
    #[serde(default)]
    pub animation: AnimationSection,
    #[serde(default)]
    pub renderer: RendererSection,
}

impl Default for WarpConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            window: WindowSection::default(),
            texture: TextureSection::default(),
            animation: AnimationSection::default(),
            renderer: RendererSection::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowSection {
    pub width: u32,
    pub height: u32,
    pub title: String,
    #[serde(deserialize_with = "deserialize_color")]
    pub clear_color: [f64; 4],
}

impl Default for WindowSection {
    fn default() -> Self {
        Self {
            width: 360,
            height: 360,
            title: "sandwarp".to_string(),
            clear_color: [0.6, 0.45, 0.3, 1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TextureSection {
    /// Bare asset name (searched in the asset roots) or a path to an image file.
    pub asset: String,
}

impl Default for TextureSection {
    fn default() -> Self {
        Self {
            asset: DEFAULT_ASSET.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnimationSection {
    /// Phase advance per display tick, in radians.
    pub step: f64,
    pub motion: MotionKind,
    pub center: [f32; 2],
    pub radius: f32,
    pub intensity: f32,
    pub seed: u64,
    pub spiral_rate: f32,
    pub random_span: u32,
}

impl Default for AnimationSection {
    fn default() -> Self {
        Self {
            step: 0.01,
            motion: MotionKind::Orbit,
            center: [180.0, 180.0],
            radius: 100.0,
            intensity: 0.03,
            seed: 0,
            spiral_rate: 10.0,
            random_span: 360,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RendererSection {
    pub color_space: ColorSpaceSetting,
    pub power: PowerSetting,
}

/// Motion strategies the animator can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionKind {
    #[default]
    Orbit,
    Wavy,
    Linear,
    Diagonal,
    Spiral,
    Pulsing,
    Random,
    Combined,
}

impl MotionKind {
    pub const ALL: [MotionKind; 8] = [
        MotionKind::Orbit,
        MotionKind::Wavy,
        MotionKind::Linear,
        MotionKind::Diagonal,
        MotionKind::Spiral,
        MotionKind::Pulsing,
        MotionKind::Random,
        MotionKind::Combined,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MotionKind::Orbit => "orbit",
            MotionKind::Wavy => "wavy",
            MotionKind::Linear => "linear",
            MotionKind::Diagonal => "diagonal",
            MotionKind::Spiral => "spiral",
            MotionKind::Pulsing => "pulsing",
            MotionKind::Random => "random",
            MotionKind::Combined => "combined",
        }
    }
}

impl fmt::Display for MotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MotionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "orbit" | "default" | "circle" => Ok(MotionKind::Orbit),
            "wavy" | "wave" => Ok(MotionKind::Wavy),
            "linear" => Ok(MotionKind::Linear),
            "diagonal" | "linear-diagonal" => Ok(MotionKind::Diagonal),
            "spiral" => Ok(MotionKind::Spiral),
            "pulsing" | "pulse" => Ok(MotionKind::Pulsing),
            "random" | "randomized" | "glitch" => Ok(MotionKind::Random),
            "combined" | "combo" => Ok(MotionKind::Combined),
            "" => Err("motion must not be empty".to_string()),
            other => Err(format!(
                "unknown motion '{other}'; expected one of orbit, wavy, linear, diagonal, spiral, pulsing, random, combined"
            )),
        }
    }
}

impl<'de> Deserialize<'de> for MotionKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Output color handling requested for the swapchain and texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpaceSetting {
    #[default]
    #[serde(alias = "auto")]
    Gamma,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerSetting {
    #[default]
    Low,
    High,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn deserialize_color<'de, D>(deserializer: D) -> Result<[f64; 4], D::Error>
where
    D: Deserializer<'de>,
{
    struct ColorVisitor;

    impl<'de> de::Visitor<'de> for ColorVisitor {
        type Value = [f64; 4];

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("an [r, g, b] / [r, g, b, a] array or a '#rrggbb[aa]' hex string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            parse_hex_color(v).map_err(E::custom)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut components = Vec::with_capacity(4);
            while let Some(value) = seq.next_element::<f64>()? {
                components.push(value);
            }
            match components.as_slice() {
                [r, g, b] => Ok([*r, *g, *b, 1.0]),
                [r, g, b, a] => Ok([*r, *g, *b, *a]),
                other => Err(de::Error::invalid_length(other.len(), &self)),
            }
        }
    }

    deserializer.deserialize_any(ColorVisitor)
}

fn parse_hex_color(raw: &str) -> Result<[f64; 4], String> {
    let digits = raw.trim().trim_start_matches('#');
    if !matches!(digits.len(), 6 | 8) || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color '{raw}'"));
    }
    let channel = |index: usize| -> Result<f64, String> {
        u8::from_str_radix(&digits[index * 2..index * 2 + 2], 16)
            .map(|value| f64::from(value) / 255.0)
            .map_err(|err| format!("invalid hex color '{raw}': {err}"))
    };
    let alpha = if digits.len() == 8 { channel(3)? } else { 1.0 };
    Ok([channel(0)?, channel(1)?, channel(2)?, alpha])
}

impl WarpConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: WarpConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.window.width, self.window.height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected {CONFIG_VERSION}",
                self.version
            )));
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero (got {}x{})",
                self.window.width, self.window.height
            )));
        }

        if let Some(component) = self
            .window
            .clear_color
            .iter()
            .find(|value| !(0.0..=1.0).contains(*value))
        {
            return Err(ConfigError::Invalid(format!(
                "window.clear_color components must be within 0..=1 (got {component})"
            )));
        }

        if self.texture.asset.trim().is_empty() {
            return Err(ConfigError::Invalid("texture.asset must not be empty".into()));
        }

        let animation = &self.animation;
        if !animation.step.is_finite() || animation.step <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "animation.step must be a positive number of radians (got {})",
                animation.step
            )));
        }

        let finite = animation.center.iter().all(|value| value.is_finite())
            && animation.radius.is_finite()
            && animation.intensity.is_finite()
            && animation.spiral_rate.is_finite();
        if !finite {
            return Err(ConfigError::Invalid(
                "animation center, radius, intensity and spiral_rate must be finite".into(),
            ));
        }

        if animation.radius < 0.0 {
            return Err(ConfigError::Invalid("animation.radius must be >= 0".into()));
        }

        if animation.intensity < 0.0 {
            return Err(ConfigError::Invalid(
                "animation.intensity must be >= 0".into(),
            ));
        }

        if animation.random_span == 0 {
            return Err(ConfigError::Invalid(
                "animation.random_span must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}
