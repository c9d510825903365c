//! # Scene Module
//!
//! What gets drawn and how it moves.
//!
//! - [`Scene`] - the cubes, the orbiting light, loaded models and the camera
//! - [`Model`] / [`Mesh`] - imported geometry with its pooled textures
//! - [`Object`] - a transform and tint with its own uniform buffer
//! - [`Vertex3D`] - vertex layout shared by every pipeline

pub mod mesh;
pub mod model;
pub mod object;
pub mod scene;
pub mod vertex;

pub use mesh::{DrawMesh, Mesh};
pub use model::Model;
pub use object::{Object, ObjectBindings, ObjectUniform};
pub use scene::{Scene, SceneGpu, SceneModel};
pub use vertex::Vertex3D;
