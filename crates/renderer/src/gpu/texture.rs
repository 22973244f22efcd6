use std::path::Path;

use wgpu::util::{DeviceExt, TextureDataOrder};

use crate::assets::TextureImage;
use crate::error::InitError;
use crate::types::ColorSpaceMode;

pub(crate) struct SandTexture {
    pub _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

pub(crate) fn texture_format(color_space: ColorSpaceMode) -> wgpu::TextureFormat {
    match color_space {
        ColorSpaceMode::Gamma => wgpu::TextureFormat::Rgba8Unorm,
        ColorSpaceMode::Linear => wgpu::TextureFormat::Rgba8UnormSrgb,
    }
}

/// Rejects images the device cannot hold in a single 2D texture.
pub(crate) fn check_dimensions(width: u32, height: u32, max_dimension: u32) -> Result<(), String> {
    if width > max_dimension || height > max_dimension {
        return Err(format!(
            "image is {width}x{height} but the GPU supports at most {max_dimension}x{max_dimension}"
        ));
    }
    Ok(())
}

pub(crate) fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &TextureImage,
    path: &Path,
    color_space: ColorSpaceMode,
) -> Result<SandTexture, InitError> {
    let load_error = |reason: String| InitError::TextureLoad {
        path: path.to_path_buf(),
        reason,
    };
    check_dimensions(
        image.width,
        image.height,
        device.limits().max_texture_dimension_2d,
    )
    .map_err(load_error)?;

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some("sand texture"),
            size: wgpu::Extent3d {
                width: image.width,
                height: image.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: texture_format(color_space),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        &image.rgba,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("sand sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });

    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(load_error(error.to_string()));
    }

    Ok(SandTexture {
        _texture: texture,
        view,
        sampler,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_format_follows_color_space() {
        assert_eq!(
            texture_format(ColorSpaceMode::Gamma),
            wgpu::TextureFormat::Rgba8Unorm
        );
        assert!(texture_format(ColorSpaceMode::Linear).is_srgb());
    }

    #[test]
    fn oversized_images_are_rejected_before_upload() {
        assert!(check_dimensions(8192, 8192, 8192).is_ok());
        assert!(check_dimensions(1, 1, 2048).is_ok());

        let wide = check_dimensions(8193, 1, 8192).unwrap_err();
        assert!(wide.contains("8193x1"));
        assert!(wide.contains("8192x8192"));
        assert!(check_dimensions(16, 4097, 4096).is_err());
    }
}
