//! Global uniform bindings for camera and lighting data
//!
//! Both uniforms are shared by every draw in a frame. The camera lives at
//! bind group 0 and the lighting block at bind group 1 in all pipelines.

use crate::{
    gfx::{camera::CameraUniform, rendering::lighting::LightingUniform},
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

pub type CameraUBO = UniformBuffer<CameraUniform>;
pub type LightingUBO = UniformBuffer<LightingUniform>;

pub struct GlobalBindings {
    camera_layout: BindGroupLayoutWithDesc,
    lighting_layout: BindGroupLayoutWithDesc,
    camera_ubo: CameraUBO,
    lighting_ubo: LightingUBO,
    camera_bind_group: wgpu::BindGroup,
    lighting_bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let camera_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Camera Bind Group Layout");
        let lighting_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .create(device, "Lighting Bind Group Layout");

        let camera_ubo = CameraUBO::new_with_data(device, &CameraUniform::default());
        let lighting_ubo = LightingUBO::new_with_data(device, &LightingUniform::default());

        let camera_bind_group = BindGroupBuilder::new(&camera_layout)
            .resource(camera_ubo.binding_resource())
            .create(device, "Camera Bind Group");
        let lighting_bind_group = BindGroupBuilder::new(&lighting_layout)
            .resource(lighting_ubo.binding_resource())
            .create(device, "Lighting Bind Group");

        Self {
            camera_layout,
            lighting_layout,
            camera_ubo,
            lighting_ubo,
            camera_bind_group,
            lighting_bind_group,
        }
    }

    /// Uploads this frame's camera and lighting. Unchanged data is not rewritten.
    pub fn update(&mut self, queue: &wgpu::Queue, camera: CameraUniform, lighting: LightingUniform) {
        self.camera_ubo.update_content(queue, camera);
        self.lighting_ubo.update_content(queue, lighting);
    }

    pub fn camera_layout(&self) -> &wgpu::BindGroupLayout {
        &self.camera_layout.layout
    }

    pub fn lighting_layout(&self) -> &wgpu::BindGroupLayout {
        &self.lighting_layout.layout
    }

    pub fn camera_bind_group(&self) -> &wgpu::BindGroup {
        &self.camera_bind_group
    }

    pub fn lighting_bind_group(&self) -> &wgpu::BindGroup {
        &self.lighting_bind_group
    }
}
