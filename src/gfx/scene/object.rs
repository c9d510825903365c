//! Per-object transform and tint.
//!
//! Each drawn instance (a cube, the light marker, a loaded model) owns an
//! [`Object`]: a model matrix and a color, mirrored into its own uniform
//! buffer at bind group 2.

use cgmath::{Matrix, Matrix4, SquareMatrix, Vector4};
use wgpu::Device;

use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of `model`, keeps normals perpendicular under non-uniform scale.
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl ObjectUniform {
    pub fn new(model: Matrix4<f32>, color: Vector4<f32>) -> Self {
        let normal_matrix = model
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity);
        Self {
            model: model.into(),
            normal_matrix: normal_matrix.into(),
            color: color.into(),
        }
    }
}

type ObjectUBO = UniformBuffer<ObjectUniform>;

/// Layout of bind group 2.
pub struct ObjectBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
}

impl ObjectBindings {
    pub fn new(device: &Device) -> Self {
        Self {
            bind_group_layout: BindGroupLayoutBuilder::new()
                .next_binding_rendering(binding_types::uniform())
                .create(device, "Object Bind Group Layout"),
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }
}

struct ObjectGpuResources {
    ubo: ObjectUBO,
    bind_group: wgpu::BindGroup,
}

pub struct Object {
    pub transform: Matrix4<f32>,
    pub color: Vector4<f32>,
    pub visible: bool,
    gpu_resources: Option<ObjectGpuResources>, // None until init_gpu_resources called
}

impl Object {
    pub fn new(transform: Matrix4<f32>, color: Vector4<f32>) -> Self {
        Self {
            transform,
            color,
            visible: true,
            gpu_resources: None,
        }
    }

    pub fn uniform(&self) -> ObjectUniform {
        ObjectUniform::new(self.transform, self.color)
    }

    /// Creates the uniform buffer and bind group. Calling it again is a no-op.
    pub fn init_gpu_resources(&mut self, device: &Device, bindings: &ObjectBindings) {
        if self.gpu_resources.is_some() {
            return;
        }
        let ubo = ObjectUBO::new_with_data(device, &self.uniform());
        let bind_group = BindGroupBuilder::new(&bindings.bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Object Bind Group");
        self.gpu_resources = Some(ObjectGpuResources { ubo, bind_group });
    }

    /// Uploads the current transform and color if GPU resources exist.
    pub fn sync(&mut self, queue: &wgpu::Queue) {
        let uniform = self.uniform();
        if let Some(gpu_resources) = &mut self.gpu_resources {
            gpu_resources.ubo.update_content(queue, uniform);
        }
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources.as_ref().map(|res| &res.bind_group)
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new(Matrix4::identity(), Vector4::new(1.0, 1.0, 1.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3};

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let model = Matrix4::from_nonuniform_scale(2.0, 1.0, 1.0);
        let uniform = ObjectUniform::new(model, Vector4::new(1.0, 1.0, 1.0, 1.0));
        let normal_matrix = Matrix4::from(uniform.normal_matrix);

        // Surface of the x = y plane, stretched along x.
        let normal = Vector3::new(1.0, -1.0, 0.0).normalize();
        let tangent = Vector3::new(1.0, 1.0, 0.0);
        let stretched_tangent = (model * tangent.extend(0.0)).truncate();
        let transformed_normal = (normal_matrix * normal.extend(0.0)).truncate();

        assert!(transformed_normal.dot(stretched_tangent).abs() < 1e-5);
    }

    #[test]
    fn singular_model_falls_back_to_identity_normals() {
        let uniform = ObjectUniform::new(Matrix4::from_scale(0.0), Vector4::new(0.0, 0.0, 0.0, 1.0));
        let identity: [[f32; 4]; 4] = Matrix4::<f32>::identity().into();
        assert_eq!(uniform.normal_matrix, identity);
    }

    #[test]
    fn uniform_layout_is_vec4_aligned() {
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 144);
    }
}
