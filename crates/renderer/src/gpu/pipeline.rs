use std::borrow::Cow;

use crate::error::InitError;
use crate::frame::{
    IntensityParam, OffsetParam, INTENSITY_BINDING, OFFSET_BINDING, SAMPLER_BINDING,
    TEXTURE_BINDING,
};
use crate::shader::{FRAGMENT_ENTRY, SAND_WARP_WGSL, VERTEX_ENTRY};

use super::texture::SandTexture;

/// Pipeline plus the two bind groups it draws with.
pub(crate) struct WarpPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub offset_buffer: wgpu::Buffer,
    pub intensity_buffer: wgpu::Buffer,
    pub params_bind_group: wgpu::BindGroup,
    pub texture_bind_group: wgpu::BindGroup,
}

impl WarpPipeline {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        texture: &SandTexture,
    ) -> Result<Self, InitError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sand warp shader"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(SAND_WARP_WGSL)),
        });

        let params_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("warp params layout"),
            entries: &[
                uniform_entry(OFFSET_BINDING, std::mem::size_of::<OffsetParam>()),
                uniform_entry(INTENSITY_BINDING, std::mem::size_of::<IntensityParam>()),
            ],
        });
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sand texture layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: TEXTURE_BINDING,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: SAMPLER_BINDING,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let offset_buffer = param_buffer(device, "offset param", std::mem::size_of::<OffsetParam>());
        let intensity_buffer = param_buffer(
            device,
            "intensity param",
            std::mem::size_of::<IntensityParam>(),
        );

        let params_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("warp params bind group"),
            layout: &params_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: OFFSET_BINDING,
                    resource: offset_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: INTENSITY_BINDING,
                    resource: intensity_buffer.as_entire_binding(),
                },
            ],
        });
        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sand texture bind group"),
            layout: &texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: TEXTURE_BINDING,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: SAMPLER_BINDING,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        // Indexed by PARAMS_GROUP and TEXTURE_GROUP.
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sand warp pipeline layout"),
            bind_group_layouts: &[&params_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sand warp pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some(VERTEX_ENTRY),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some(FRAGMENT_ENTRY),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(InitError::PipelineCompilation(error.to_string()));
        }

        Ok(Self {
            pipeline,
            offset_buffer,
            intensity_buffer,
            params_bind_group,
            texture_bind_group,
        })
    }
}

fn uniform_entry(binding: u32, size: usize) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(size as u64),
        },
        count: None,
    }
}

/// Uniform buffers are padded to 16 bytes for downlevel backends.
fn param_buffer(device: &wgpu::Device, label: &str, size: usize) -> wgpu::Buffer {
    let padded = (size as u64).max(16);
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: padded,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
