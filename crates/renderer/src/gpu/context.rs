use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::error::InitError;
use crate::types::{ColorSpaceMode, GpuPowerPreference};

/// Instance, surface, device and queue for the lifetime of the window.
pub(crate) struct GpuContext {
    pub _instance: wgpu::Instance,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub surface_format: wgpu::TextureFormat,
    pub color_space: ColorSpaceMode,
    max_dimension: u32,
    window: Arc<Window>,
}

/// Surface extent for a window size, or `None` while the window has no area.
/// Each axis is clamped to the device's texture limit.
pub(crate) fn surface_extent(
    size: PhysicalSize<u32>,
    max_dimension: u32,
) -> Option<PhysicalSize<u32>> {
    if size.width == 0 || size.height == 0 {
        return None;
    }
    Some(PhysicalSize::new(
        size.width.min(max_dimension),
        size.height.min(max_dimension),
    ))
}

impl GpuContext {
    pub(crate) fn new(
        window: Arc<Window>,
        size: PhysicalSize<u32>,
        color_space: ColorSpaceMode,
        gpu_power: GpuPowerPreference,
    ) -> Result<Self, InitError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            flags: wgpu::InstanceFlags::default(),
            memory_budget_thresholds: wgpu::MemoryBudgetThresholds::default(),
            backend_options: wgpu::BackendOptions::default(),
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(|err| InitError::Surface(err.to_string()))?;

        let power_preference = match gpu_power {
            GpuPowerPreference::Low => wgpu::PowerPreference::LowPower,
            GpuPowerPreference::High => wgpu::PowerPreference::HighPerformance,
        };
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(|err| InitError::DeviceUnavailable(err.to_string()))?;

        let adapter_info = adapter.get_info();
        let limits = adapter.limits();
        tracing::debug!(
            name = %adapter_info.name,
            backend = ?adapter_info.backend,
            device_type = ?adapter_info.device_type,
            "selected GPU adapter"
        );

        let max_dimension = limits.max_texture_dimension_2d;
        let width = size.width.max(1);
        let height = size.height.max(1);
        if width > max_dimension || height > max_dimension {
            return Err(InitError::DeviceUnavailable(format!(
                "GPU max texture dimension is {max_dimension}, requested surface is {width}x{height}"
            )));
        }

        let surface_caps = surface.get_capabilities(&adapter);
        let fallback_format = surface_caps.formats.first().copied().ok_or_else(|| {
            InitError::Surface("surface is not compatible with the selected adapter".into())
        })?;
        let surface_format = match color_space {
            ColorSpaceMode::Linear => surface_caps
                .formats
                .iter()
                .copied()
                .find(|format| format.is_srgb())
                .unwrap_or_else(|| {
                    tracing::warn!(
                        fallback = ?fallback_format,
                        "no sRGB surface format available; falling back"
                    );
                    fallback_format
                }),
            ColorSpaceMode::Gamma => surface_caps
                .formats
                .iter()
                .copied()
                .find(|format| !format.is_srgb())
                .unwrap_or_else(|| {
                    tracing::warn!(
                        fallback = ?fallback_format,
                        "no linear (non-sRGB) surface format available; falling back"
                    );
                    fallback_format
                }),
        };

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("sandwarp device"),
            required_features: wgpu::Features::empty(),
            required_limits: limits.clone(),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::default(),
        }))
        .map_err(|err| InitError::DeviceUnavailable(err.to_string()))?;

        let present_mode = surface_caps
            .present_modes
            .iter()
            .copied()
            .find(|mode| *mode == wgpu::PresentMode::Fifo)
            .unwrap_or(wgpu::PresentMode::AutoVsync);
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        tracing::debug!(?present_mode, ?surface_format, "configuring surface");

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self {
            _instance: instance,
            surface,
            device,
            queue,
            config,
            surface_format,
            color_space,
            max_dimension,
            window,
        })
    }

    /// Reconfigures the surface for `new_size`. Zero-area sizes (minimised
    /// windows) leave the current configuration untouched.
    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let Some(extent) = surface_extent(new_size, self.max_dimension) else {
            return;
        };
        self.config.width = extent.width;
        self.config.height = extent.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Re-applies the configuration at the window's current size after the
    /// surface went stale.
    pub(crate) fn reconfigure(&mut self) {
        if let Some(extent) = surface_extent(self.window.inner_size(), self.max_dimension) {
            self.config.width = extent.width;
            self.config.height = extent.height;
        }
        self.surface.configure(&self.device, &self.config);
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.config.width, self.config.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_area_windows_have_no_extent() {
        assert_eq!(surface_extent(PhysicalSize::new(0, 360), 8192), None);
        assert_eq!(surface_extent(PhysicalSize::new(360, 0), 8192), None);
    }

    #[test]
    fn extent_follows_the_window_size() {
        assert_eq!(
            surface_extent(PhysicalSize::new(1280, 720), 8192),
            Some(PhysicalSize::new(1280, 720))
        );
        assert_eq!(
            surface_extent(PhysicalSize::new(10_000, 720), 8192),
            Some(PhysicalSize::new(8192, 720))
        );
    }
}
