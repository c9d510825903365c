//! Application settings read from a TOML file.
//!
//! Every table and field is optional; anything missing keeps its default.
//!
//! ```toml
//! [window]
//! width = 1280
//! height = 720
//!
//! [camera]
//! position = [0.0, 1.0, -8.0]
//! fov = 60.0
//!
//! [scene]
//! models = ["assets/models/backpack/backpack.obj"]
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use cgmath::{Point3, Vector3};
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    error::{GlintError, Result},
    gfx::camera::{CameraOptions, FlyController, Projection},
};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub projection: ProjectionConfig,
    pub scene: SceneConfig,
    /// Directory with `lit.vert.wgsl`, `lit.frag.wgsl` and
    /// `light_source.frag.wgsl`. The bundled shaders are used when unset.
    pub shader_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| GlintError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| GlintError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config from '{}'", path.display());
        Ok(config)
    }

    /// Loads `path` when given, the defaults otherwise.
    pub fn load_or_default(path: Option<impl AsRef<Path>>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "App".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub world_up: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub constrain_pitch: bool,
    pub pitch_constraints: [f32; 2],
    pub fov: f32,
    pub fov_constraints: [f32; 2],
}

impl CameraConfig {
    pub fn to_options(&self) -> CameraOptions {
        CameraOptions {
            world_up: Vector3::from(self.world_up),
            position: Point3::from(self.position),
            yaw: self.yaw,
            pitch: self.pitch,
            constrain_pitch: self.constrain_pitch,
            pitch_constraints: self.pitch_constraints,
            fov: self.fov,
            fov_constraints: self.fov_constraints,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        let options = CameraOptions::default();
        Self {
            position: [0.0, 0.0, -5.0],
            world_up: options.world_up.into(),
            yaw: options.yaw,
            pitch: options.pitch,
            constrain_pitch: options.constrain_pitch,
            pitch_constraints: options.pitch_constraints,
            fov: options.fov,
            fov_constraints: options.fov_constraints,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// World units per second.
    pub movement_speed: f32,
    /// Degrees per pixel of mouse motion.
    pub mouse_sensitivity: f32,
}

impl ControlsConfig {
    pub fn to_controller(&self, look_at_target: Point3<f32>) -> FlyController {
        let mut controller = FlyController::new(self.movement_speed, self.mouse_sensitivity);
        controller.look_at_target = look_at_target;
        controller
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            movement_speed: 4.0,
            mouse_sensitivity: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub znear: f32,
    pub zfar: f32,
}

impl ProjectionConfig {
    pub fn to_projection(&self, width: u32, height: u32) -> Projection {
        Projection::new(width, height, self.znear, self.zfar)
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// OBJ files loaded at startup.
    pub models: Vec<PathBuf>,
    /// Where the look-at key points the camera.
    pub look_at_target: [f32; 3],
}
