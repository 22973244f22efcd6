//! Texture asset lookup and decoding.
//!
//! Assets are referred to by name (`"sample"`) or by path. Bare names are
//! tried against each root with the supported image extensions, in order.

use std::path::{Path, PathBuf};

use image::GenericImageView;

use crate::error::InitError;

/// Extensions tried, in order, for a bare asset name.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

/// Decoded RGBA8 pixels ready for upload, rows top to bottom.
#[derive(Debug, Clone)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    pub fn load(path: &Path) -> Result<Self, InitError> {
        let image = image::open(path).map_err(|err| InitError::TextureLoad {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(InitError::TextureLoad {
                path: path.to_path_buf(),
                reason: "image has no pixels".to_string(),
            });
        }
        tracing::debug!(path = %path.display(), width, height, "decoded texture");
        Ok(Self {
            width,
            height,
            rgba: image.to_rgba8().into_raw(),
        })
    }
}

/// Resolves `asset` to an existing image file.
///
/// Absolute paths and names containing a path separator or an extension are
/// checked as given (relative ones against each root, then the working
/// directory). Bare names additionally try every [`IMAGE_EXTENSIONS`] entry.
pub fn resolve_asset(asset: &str, roots: &[PathBuf]) -> Result<PathBuf, InitError> {
    let requested = Path::new(asset);
    if asset.trim().is_empty() {
        return Err(InitError::TextureLoad {
            path: requested.to_path_buf(),
            reason: "asset name is empty".to_string(),
        });
    }

    if requested.is_absolute() {
        return if requested.is_file() {
            Ok(requested.to_path_buf())
        } else {
            Err(InitError::TextureLoad {
                path: requested.to_path_buf(),
                reason: "file does not exist".to_string(),
            })
        };
    }

    let candidates = candidate_names(requested);
    for root in roots {
        for name in &candidates {
            let path = root.join(name);
            if path.is_file() {
                return Ok(path);
            }
        }
    }
    for name in &candidates {
        if name.is_file() {
            return Ok(name.clone());
        }
    }

    let searched = roots
        .iter()
        .map(|root| root.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(InitError::TextureLoad {
        path: requested.to_path_buf(),
        reason: format!("no matching image found (searched: {searched})"),
    })
}

fn candidate_names(requested: &Path) -> Vec<PathBuf> {
    if requested.extension().is_some() {
        return vec![requested.to_path_buf()];
    }
    let mut names = Vec::with_capacity(IMAGE_EXTENSIONS.len() + 1);
    for extension in IMAGE_EXTENSIONS {
        names.push(requested.with_extension(extension));
    }
    names.push(requested.to_path_buf());
    names
}
