use std::ops::Range;

use log::debug;
use wgpu::{util::DeviceExt, Device};

use super::vertex::Vertex3D;
use crate::gfx::resources::{
    texture_pool::{Texture, TextureKind},
    texture_resource::TextureResource,
    MaterialBindings, MaterialMaps,
};

struct MeshGpuResources {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    material_bind_group: wgpu::BindGroup,
}

/// Indexed triangle mesh plus the textures it samples.
///
/// `R` is the texture payload, [`TextureResource`] for anything that is drawn.
pub struct Mesh<R = TextureResource> {
    pub name: String,
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    textures: Vec<Texture<R>>,
    gpu_resources: Option<MeshGpuResources>,
}

impl<R> Mesh<R> {
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Vertex3D>,
        indices: Vec<u32>,
        textures: Vec<Texture<R>>,
    ) -> Self {
        let name = name.into();
        debug!(
            "Mesh '{}' created: {} vertices, {} indices, {} textures",
            name,
            vertices.len(),
            indices.len(),
            textures.len()
        );
        Self {
            name,
            vertices,
            indices,
            textures,
            gpu_resources: None,
        }
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn textures(&self) -> &[Texture<R>] {
        &self.textures
    }

    /// First texture of the given kind, if any.
    pub fn texture(&self, kind: TextureKind) -> Option<&Texture<R>> {
        self.textures.iter().find(|texture| texture.kind == kind)
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn is_uploaded(&self) -> bool {
        self.gpu_resources.is_some()
    }
}

impl Mesh<TextureResource> {
    /// Creates vertex/index buffers and the material bind group. Calling it again is a no-op.
    pub fn upload(&mut self, device: &Device, materials: &MaterialBindings) {
        if self.gpu_resources.is_some() {
            return;
        }

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", self.name)),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", self.name)),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let resource = |kind| {
            self.texture(kind)
                .map(|texture| texture.resource.as_ref())
        };
        let material_bind_group = materials.create_bind_group(
            device,
            MaterialMaps {
                diffuse: resource(TextureKind::Diffuse),
                specular: resource(TextureKind::Specular),
                emission: resource(TextureKind::Emission),
            },
            &self.name,
        );

        debug!("Mesh '{}' uploaded", self.name);
        self.gpu_resources = Some(MeshGpuResources {
            vertex_buffer,
            index_buffer,
            material_bind_group,
        });
    }
}

impl<R> Drop for Mesh<R> {
    fn drop(&mut self) {
        debug!("Mesh '{}' released", self.name);
    }
}

/// Draw helpers on a render pass. Meshes that were never uploaded are skipped.
pub trait DrawMesh<'a> {
    /// Geometry only, for pipelines without a material group.
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    /// Binds the mesh material at `material_group` first.
    fn draw_mesh_with_material(&mut self, mesh: &'a Mesh, material_group: u32);
    fn draw_mesh_instanced(&mut self, mesh: &'a Mesh, instances: Range<u32>);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        self.draw_mesh_instanced(mesh, 0..1);
    }

    fn draw_mesh_with_material(&mut self, mesh: &'b Mesh, material_group: u32) {
        let Some(gpu) = &mesh.gpu_resources else {
            return;
        };
        self.set_bind_group(material_group, &gpu.material_bind_group, &[]);
        self.draw_mesh_instanced(mesh, 0..1);
    }

    fn draw_mesh_instanced(&mut self, mesh: &'b Mesh, instances: Range<u32>) {
        let Some(gpu) = &mesh.gpu_resources else {
            return;
        };
        self.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
        self.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count(), 0, instances);
    }
}
