use std::path::PathBuf;

/// Output color handling for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpaceMode {
    /// Treat the texture as gamma-encoded; use non-sRGB surfaces, matching a
    /// plain BGRA8 unorm swapchain.
    #[default]
    Gamma,
    /// Use sRGB swapchains/textures so sampling happens in linear space.
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpuPowerPreference {
    #[default]
    Low,
    High,
}

/// Straight RGBA clear color, components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClearColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl ClearColor {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub(crate) fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r,
            g: self.g,
            b: self.b,
            a: self.a,
        }
    }
}

impl Default for ClearColor {
    /// Warm sand backdrop shown around and beneath the texture.
    fn default() -> Self {
        Self::new(0.6, 0.45, 0.3, 1.0)
    }
}

impl From<[f64; 4]> for ClearColor {
    fn from(value: [f64; 4]) -> Self {
        Self::new(value[0], value[1], value[2], value[3])
    }
}

/// Immutable configuration passed to the renderer at start-up.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Window and surface size in physical pixels. The drag offset lives in
    /// the same coordinate space.
    pub surface_size: (u32, u32),
    pub title: String,
    /// Resolved image file for texture slot 0.
    pub texture_path: PathBuf,
    pub clear_color: ClearColor,
    pub color_space: ColorSpaceMode,
    pub power: GpuPowerPreference,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: (360, 360),
            title: "sandwarp".to_string(),
            texture_path: PathBuf::new(),
            clear_color: ClearColor::default(),
            color_space: ColorSpaceMode::default(),
            power: GpuPowerPreference::default(),
        }
    }
}
