//! Glint
//!
//! A small real-time 3D renderer built on wgpu and winit: a first-person fly
//! camera, Phong lighting with directional, point and spot lights, textured
//! OBJ models and an ImGui control panel.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod performance;
pub mod prelude;
pub mod ui;
pub mod wgpu_utils;

pub use app::{AppContext, GlintApp};
pub use config::AppConfig;
pub use error::{GlintError, Result};

/// Builds an application from the default configuration.
pub fn default() -> Result<GlintApp> {
    GlintApp::new(AppConfig::default())
}
