//! Material texture bindings
//!
//! Every lit mesh binds a diffuse, a specular and an emission map plus one
//! sampler at bind group 3. Missing maps are replaced by 1x1 textures chosen
//! so they leave the lighting untouched: white for diffuse and specular,
//! black for emission.

use log::debug;

use super::texture_resource::TextureResource;
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
};

/// The maps a mesh provides, any of which may be missing.
#[derive(Default, Clone, Copy)]
pub struct MaterialMaps<'a> {
    pub diffuse: Option<&'a TextureResource>,
    pub specular: Option<&'a TextureResource>,
    pub emission: Option<&'a TextureResource>,
}

pub struct MaterialBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    white: TextureResource,
    black: TextureResource,
}

impl MaterialBindings {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_2d()) // diffuse
            .next_binding_fragment(binding_types::texture_2d()) // specular
            .next_binding_fragment(binding_types::texture_2d()) // emission
            .next_binding_fragment(binding_types::sampler(
                wgpu::SamplerBindingType::Filtering,
            ))
            .create(device, "Material Bind Group Layout");

        MaterialBindings {
            bind_group_layout,
            white: TextureResource::create_solid_color(
                device,
                queue,
                [255, 255, 255, 255],
                "Fallback White",
            ),
            black: TextureResource::create_solid_color(
                device,
                queue,
                [0, 0, 0, 255],
                "Fallback Black",
            ),
        }
    }

    pub fn create_bind_group(
        &self,
        device: &wgpu::Device,
        maps: MaterialMaps<'_>,
        label: &str,
    ) -> wgpu::BindGroup {
        let diffuse = maps.diffuse.unwrap_or(&self.white);
        let specular = maps.specular.unwrap_or(&self.white);
        let emission = maps.emission.unwrap_or(&self.black);
        debug!(
            "Material '{}': diffuse {}, specular {}, emission {}",
            label,
            presence(maps.diffuse),
            presence(maps.specular),
            presence(maps.emission),
        );

        BindGroupBuilder::new(&self.bind_group_layout)
            .texture(&diffuse.view)
            .texture(&specular.view)
            .texture(&emission.view)
            .sampler(&diffuse.sampler)
            .create(device, label)
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }
}

fn presence(map: Option<&TextureResource>) -> &'static str {
    if map.is_some() {
        "mapped"
    } else {
        "fallback"
    }
}
