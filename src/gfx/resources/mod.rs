// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles textures, the texture pool, and the bind groups shared by the pipelines.

pub mod global_bindings;
pub mod material;
pub mod texture_pool;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::GlobalBindings;
pub use material::{MaterialBindings, MaterialMaps};
pub use texture_pool::{Texture, TextureId, TextureKind, TexturePool};
pub use texture_resource::TextureResource;
