use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::assets::TextureImage;
use crate::error::{InitError, RenderError};
use crate::frame::{Acquire, FramePlan, FrameTarget, SkipReason, PARAMS_GROUP, TEXTURE_GROUP};
use crate::types::RendererConfig;

use super::context::GpuContext;
use super::pipeline::WarpPipeline;
use super::texture::{self, SandTexture};

/// Every GPU resource the sand warp needs, created once at startup.
pub(crate) struct GpuState {
    context: GpuContext,
    pipeline: WarpPipeline,
    _texture: SandTexture,
}

impl GpuState {
    pub(crate) fn new(
        window: Arc<Window>,
        size: PhysicalSize<u32>,
        config: &RendererConfig,
    ) -> Result<Self, InitError> {
        let image = TextureImage::load(&config.texture_path)?;
        let context = GpuContext::new(window, size, config.color_space, config.power)?;
        let sand = texture::upload(
            &context.device,
            &context.queue,
            &image,
            &config.texture_path,
            context.color_space,
        )?;
        let pipeline = WarpPipeline::new(&context.device, context.surface_format, &sand)?;
        tracing::debug!(
            width = image.width,
            height = image.height,
            format = ?context.surface_format,
            "sand warp pipeline ready"
        );

        Ok(Self {
            context,
            pipeline,
            _texture: sand,
        })
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size()
    }
}

impl FrameTarget for GpuState {
    type Frame = wgpu::SurfaceTexture;

    fn acquire(&mut self) -> Result<Acquire<Self::Frame>, RenderError> {
        match self.context.surface.get_current_texture() {
            Ok(frame) => Ok(Acquire::Ready(frame)),
            Err(wgpu::SurfaceError::OutOfMemory) => Err(RenderError::OutOfMemory),
            Err(wgpu::SurfaceError::Timeout) => Ok(Acquire::Unavailable(SkipReason::Timeout)),
            Err(wgpu::SurfaceError::Outdated) => {
                self.context.reconfigure();
                Ok(Acquire::Unavailable(SkipReason::Outdated))
            }
            Err(wgpu::SurfaceError::Lost) => {
                self.context.reconfigure();
                Ok(Acquire::Unavailable(SkipReason::Lost))
            }
            Err(wgpu::SurfaceError::Other) => Ok(Acquire::Unavailable(SkipReason::Other)),
        }
    }

    fn encode(&mut self, frame: &Self::Frame, plan: &FramePlan) {
        let queue = &self.context.queue;
        queue.write_buffer(
            &self.pipeline.offset_buffer,
            0,
            bytemuck::bytes_of(&plan.params.offset),
        );
        queue.write_buffer(
            &self.pipeline.intensity_buffer,
            0,
            bytemuck::bytes_of(&plan.params.intensity),
        );

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sand warp encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sand warp pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(plan.clear.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline.pipeline);
            render_pass.set_bind_group(PARAMS_GROUP, &self.pipeline.params_bind_group, &[]);
            render_pass.set_bind_group(TEXTURE_GROUP, &self.pipeline.texture_bind_group, &[]);
            render_pass.draw(plan.draw.vertices.clone(), plan.draw.instances.clone());
        }
        queue.submit(Some(encoder.finish()));
    }

    fn present(&mut self, frame: Self::Frame) {
        frame.present();
    }
}
