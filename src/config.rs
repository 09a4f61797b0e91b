//! Render settings: where the eye sits and how the image plane is laid out.
//!
//! Settings are read from a TOML file. Every field is optional and falls
//! back to the reference view: eye at the origin, a 20 x 20 plane 40 units
//! away, split into 500 x 500 cells.

use std::path::{Path, PathBuf};

use log::debug;
use nalgebra::Vector3;
use serde::Deserialize;
use thiserror::Error;

use crate::camera::{Camera, ImagePlane};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub eye: [f64; 3],
    pub plane: ImagePlane,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            eye: [0.0; 3],
            plane: ImagePlane::default(),
        }
    }
}

impl RenderConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded {}: {config:?}", path.display());
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let plane = &self.plane;
        if !(plane.width > 0.0 && plane.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "image plane must have positive extents, got {} x {}",
                plane.width, plane.height
            )));
        }
        if !(plane.distance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "image plane distance must be positive, got {}",
                plane.distance
            )));
        }
        if plane.divisions == 0 {
            return Err(ConfigError::Invalid("divisions must be at least 1".into()));
        }
        Ok(())
    }

    pub fn camera(&self) -> Camera {
        let [x, y, z] = self.eye;
        Camera::new(Vector3::new(x, y, z), self.plane)
    }
}
