//! Core rendering functionality
//!
//! Phong lighting data, WGSL shaders and pipelines, and the frame renderer.

pub mod lighting;
pub mod render_engine;
pub mod shader;

pub use lighting::{
    Attenuation, DirectionalLight, LightSetup, LightingUniform, PhongMaterial, PointLight,
    SpotLight, MAX_POINT_LIGHTS,
};
pub use render_engine::RenderEngine;
pub use shader::{PipelineConfig, Shader};
