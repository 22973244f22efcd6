//! Renderer crate for sandwarp.
//!
//! Displays one texture in a fixed-size window and warps it with the sand
//! shader, fed by the animator once per display refresh:
//!
//! ```text
//!   sandwarp CLI
//!          │ RendererConfig + Animator
//!          ▼
//!   renderer::run ──▶ winit event loop ──▶ Animator::tick()
//!                                                │ &AnimationState
//!                                                ▼
//!                                      Renderer::render_frame()
//!                                                │ FramePlan
//!                                                ▼
//!                                      GpuState (FrameTarget) ─▶ GPU
//! ```
//!
//! [`Renderer`] only exists fully initialised: construction acquires the
//! device, builds the pipeline and uploads the texture, or fails with an
//! [`InitError`]. After that every frame either presents exactly one
//! four-vertex strip draw or is skipped with nothing encoded.

mod assets;
mod error;
mod frame;
mod gpu;
mod shader;
mod types;
mod window;

use std::sync::Arc;

use animator::{AnimationState, Animator};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::gpu::GpuState;

pub use assets::{resolve_asset, TextureImage, IMAGE_EXTENSIONS};
pub use error::{InitError, RenderError};
pub use frame::{
    render_frame, Acquire, DrawCall, FrameOutcome, FramePlan, FrameTarget, IntensityParam,
    OffsetParam, SkipReason, Topology, WarpParams,
};
pub use shader::{FRAGMENT_ENTRY, SAND_WARP_WGSL, VERTEX_ENTRY};
pub use types::{ClearColor, ColorSpaceMode, GpuPowerPreference, RendererConfig};

/// Owns the window handle and every GPU resource for the process lifetime.
pub struct Renderer {
    window: Arc<Window>,
    gpu: GpuState,
    clear_color: ClearColor,
}

impl Renderer {
    /// Acquires a device for `window`, builds the pipeline and uploads the
    /// configured texture.
    pub fn initialize(window: Arc<Window>, config: &RendererConfig) -> Result<Self, InitError> {
        let size = initial_surface_size(window.inner_size(), config.surface_size);
        let gpu = GpuState::new(window.clone(), size, config)?;
        Ok(Self {
            window,
            gpu,
            clear_color: config.clear_color,
        })
    }

    /// Draws `state`, or skips the frame when no drawable is available.
    pub fn render_frame(&mut self, state: &AnimationState) -> Result<FrameOutcome, RenderError> {
        frame::render_frame(&mut self.gpu, self.clear_color, state)
    }

    /// Follows a window size change. Zero-area sizes are ignored.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size);
    }

    pub fn window(&self) -> &Window {
        self.window.as_ref()
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.gpu.size()
    }
}

/// The window's actual inner size, or the configured size while the window
/// reports no area yet.
fn initial_surface_size(inner: PhysicalSize<u32>, configured: (u32, u32)) -> PhysicalSize<u32> {
    if inner.width == 0 || inner.height == 0 {
        PhysicalSize::new(configured.0, configured.1)
    } else {
        inner
    }
}

/// Opens the window and animates until it is closed or rendering fails.
pub fn run(config: &RendererConfig, animator: Animator) -> anyhow::Result<()> {
    window::run(config, animator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_starts_at_the_window_size() {
        let granted = initial_surface_size(PhysicalSize::new(720, 720), (360, 360));
        assert_eq!(granted, PhysicalSize::new(720, 720));
    }

    #[test]
    fn configured_size_covers_windows_without_area() {
        let size = initial_surface_size(PhysicalSize::new(0, 0), (360, 240));
        assert_eq!(size, PhysicalSize::new(360, 240));
    }
}
