//! OBJ model import.

use std::path::{Path, PathBuf};

use log::{info, warn};

use super::{mesh::Mesh, vertex::Vertex3D};
use crate::{
    error::{GlintError, Result},
    gfx::resources::{
        texture_pool::{Texture, TextureKind, TexturePool},
        texture_resource::TextureResource,
    },
};

/// A set of meshes imported from one file.
pub struct Model<R = TextureResource> {
    pub name: String,
    pub meshes: Vec<Mesh<R>>,
    /// Directory texture names are resolved against.
    pub directory: PathBuf,
}

impl<R> Model<R> {
    /// Imports an OBJ file (and its MTL library, when present).
    ///
    /// Textures are requested from `pool`, so a file referenced by several
    /// meshes or models is only loaded once. `loader` is only called for
    /// paths the pool has not seen.
    ///
    /// # Arguments
    /// * `path` - OBJ file to import; texture names resolve against its directory
    /// * `pool` - Texture cache shared with the rest of the scene
    /// * `loader` - Creates a texture resource for a path not yet in `pool`
    ///
    /// # Returns
    /// The model, [`GlintError::ModelImport`] when the OBJ cannot be read, or
    /// the `loader` error for the first texture that fails. A missing MTL only
    /// logs a warning.
    pub fn load<F>(path: impl AsRef<Path>, pool: &mut TexturePool<R>, mut loader: F) -> Result<Self>
    where
        F: FnMut(&Path) -> Result<R>,
    {
        let path = path.as_ref();
        let (models, materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )
        .map_err(|source| GlintError::ModelImport {
            path: path.to_path_buf(),
            source,
        })?;

        let materials = materials.unwrap_or_else(|err| {
            warn!("No usable MTL for '{}': {}", path.display(), err);
            Vec::new()
        });
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();

        let mut meshes = Vec::with_capacity(models.len());
        for model in &models {
            let mesh = &model.mesh;
            let vertices = build_vertices(mesh);

            let mut textures: Vec<Texture<R>> = Vec::new();
            let mut seen_names: Vec<&str> = Vec::new();
            if let Some(material) = mesh.material_id.and_then(|id| materials.get(id)) {
                for (kind, name) in texture_names(material) {
                    if seen_names.contains(&name) {
                        continue;
                    }
                    seen_names.push(name);
                    let texture_path = directory.join(name);
                    textures.push(pool.load_with(&texture_path, kind, &mut loader)?);
                }
            }

            meshes.push(Mesh::new(
                model.name.clone(),
                vertices,
                mesh.indices.clone(),
                textures,
            ));
        }

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "model".to_string());
        info!(
            "Model '{}' loaded: {} meshes, {} textures in pool",
            name,
            meshes.len(),
            pool.len()
        );

        Ok(Self {
            name,
            meshes,
            directory,
        })
    }
}

impl Model<TextureResource> {
    /// Imports a model and uploads its textures to the GPU.
    pub fn load_gpu(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
        pool: &mut TexturePool<TextureResource>,
    ) -> Result<Self> {
        Self::load(path, pool, |texture_path| {
            TextureResource::from_image_file(device, queue, texture_path)
        })
    }
}

/// Texture file names a material references, in diffuse, specular, emission order.
fn texture_names(material: &tobj::Material) -> Vec<(TextureKind, &str)> {
    let emission = material.unknown_param.get("map_Ke").map(String::as_str);
    [
        (TextureKind::Diffuse, material.diffuse_texture.as_deref()),
        (TextureKind::Specular, material.specular_texture.as_deref()),
        (TextureKind::Emission, emission),
    ]
    .into_iter()
    .filter_map(|(kind, name)| {
        let name = name?.trim();
        (!name.is_empty()).then_some((kind, name))
    })
    .collect()
}

fn build_vertices(mesh: &tobj::Mesh) -> Vec<Vertex3D> {
    let vertex_count = mesh.positions.len() / 3;
    let normals = if mesh.normals.len() == mesh.positions.len() {
        mesh.normals.clone()
    } else {
        calculate_face_normals(&mesh.positions, &mesh.indices)
    };
    let has_tex_coords = mesh.texcoords.len() == vertex_count * 2;

    (0..vertex_count)
        .map(|i| {
            let tex_coords = if has_tex_coords {
                // V runs top-down in the renderer.
                [mesh.texcoords[i * 2], 1.0 - mesh.texcoords[i * 2 + 1]]
            } else {
                [0.0, 0.0]
            };
            Vertex3D {
                position: [
                    mesh.positions[i * 3],
                    mesh.positions[i * 3 + 1],
                    mesh.positions[i * 3 + 2],
                ],
                normal: [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]],
                tex_coords,
            }
        })
        .collect()
}

/// Per-vertex normals averaged from the faces that share the vertex.
pub fn calculate_face_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    use cgmath::{InnerSpace, Vector3};

    let vertex_count = positions.len() / 3;
    let position = |i: usize| {
        Vector3::new(positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2])
    };
    let mut sums = vec![Vector3::new(0.0f32, 0.0, 0.0); vertex_count];

    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
        if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
            continue;
        }
        let face_normal = (position(i1) - position(i0)).cross(position(i2) - position(i0));
        for index in [i0, i1, i2] {
            sums[index] += face_normal;
        }
    }

    sums.into_iter()
        .flat_map(|sum| {
            let normal = if sum.magnitude2() > 0.0 {
                sum.normalize()
            } else {
                Vector3::new(0.0, 0.0, 1.0)
            };
            [normal.x, normal.y, normal.z]
        })
        .collect()
}
