//! # Graphics Module
//!
//! Everything between the scene description and pixels on screen.
//!
//! - **Camera** ([`camera`]) - first-person fly camera, its controller and projection
//! - **Geometry** ([`geometry`]) - procedural meshes
//! - **Rendering** ([`rendering`]) - Phong lighting, shaders and the wgpu render engine
//! - **Resources** ([`resources`]) - textures, the texture pool and shared bind groups
//! - **Scene** ([`scene`]) - objects, meshes and imported models

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

pub use camera::{Camera, CameraManager, FlyController};
pub use rendering::render_engine::RenderEngine;
pub use scene::Scene;
