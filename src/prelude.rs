//! # Glint Prelude
//!
//! Commonly used types in one import.
//!
//! ```no_run
//! use glint::prelude::*;
//!
//! fn main() -> glint::Result<()> {
//!     let mut config = AppConfig::default();
//!     config.scene.models.push("assets/models/backpack/backpack.obj".into());
//!     GlintApp::new(config)?.run()
//! }
//! ```

pub use crate::app::{AppContext, GlintApp};
pub use crate::config::AppConfig;
pub use crate::error::{GlintError, Result};

pub use crate::gfx::camera::{Camera, CameraManager, CameraOptions, FlyController, Projection};
pub use crate::gfx::geometry::{generate_cube, GeometryData};
pub use crate::gfx::rendering::{
    DirectionalLight, LightSetup, PhongMaterial, PointLight, RenderEngine, SpotLight,
};
pub use crate::gfx::resources::{TextureKind, TexturePool};
pub use crate::gfx::scene::{Mesh, Model, Object, Scene};

pub use crate::performance::{FrameClock, FrameStats};
pub use crate::ui::{controls_panel, Controls};

pub use cgmath::{InnerSpace, Point3, Vector3};
pub use imgui::Ui;
