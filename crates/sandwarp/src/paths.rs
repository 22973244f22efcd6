use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories_next::ProjectDirs;

pub const ENV_CONFIG_DIR: &str = "SANDWARP_CONFIG_DIR";
pub const ENV_DATA_DIR: &str = "SANDWARP_DATA_DIR";

pub const CONFIG_FILE_NAME: &str = "sandwarp.toml";
const ASSETS_DIR: &str = "assets";

const QUALIFIER: &str = "org";
const ORGANISATION: &str = "Sandwarp";
const APPLICATION: &str = "sandwarp";

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl AppPaths {
    pub fn discover() -> Result<Self> {
        let config_override = env_override(ENV_CONFIG_DIR);
        let data_override = env_override(ENV_DATA_DIR);
        if let (Some(config_dir), Some(data_dir)) = (&config_override, &data_override) {
            return Ok(Self::from_raw(config_dir.clone(), data_dir.clone()));
        }

        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANISATION, APPLICATION)
            .ok_or_else(|| anyhow!("failed to determine user directories"))?;
        Ok(Self {
            config_dir: config_override.unwrap_or_else(|| project_dirs.config_dir().to_path_buf()),
            data_dir: data_override.unwrap_or_else(|| project_dirs.data_dir().to_path_buf()),
        })
    }

    pub fn from_raw(config_dir: PathBuf, data_dir: PathBuf) -> Self {
        Self {
            config_dir,
            data_dir,
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Directories searched for texture assets, most specific first.
    ///
    /// The directory holding the loaded config file (when there is one) comes
    /// first so a config can sit next to its texture.
    pub fn asset_roots(&self, config_file: Option<&Path>) -> Vec<PathBuf> {
        let mut roots = Vec::with_capacity(4);
        if let Some(parent) = config_file.and_then(Path::parent) {
            let parent = if parent.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                parent.to_path_buf()
            };
            roots.push(parent);
        }
        roots.push(self.config_dir.join(ASSETS_DIR));
        roots.push(self.data_dir.join(ASSETS_DIR));
        roots.push(PathBuf::from(ASSETS_DIR));

        let mut unique = Vec::with_capacity(roots.len());
        for root in roots {
            if !unique.contains(&root) {
                unique.push(root);
            }
        }
        unique
    }
}

fn env_override(name: &str) -> Option<PathBuf> {
    match env::var_os(name) {
        Some(value) if !value.as_os_str().is_empty() => Some(PathBuf::from(value)),
        _ => None,
    }
}
