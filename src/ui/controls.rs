//! State edited by the "Controls" window.

use cgmath::{Point3, Vector3};

use crate::gfx::rendering::lighting::{Attenuation, PhongMaterial, PointLight};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightControls {
    pub color: [f32; 3],
    pub ambient_strength: f32,
    pub diffuse_strength: f32,
}

impl LightControls {
    pub fn diffuse_color(&self) -> Vector3<f32> {
        Vector3::from(self.color) * self.diffuse_strength
    }

    pub fn ambient_color(&self) -> Vector3<f32> {
        Vector3::from(self.color) * self.ambient_strength
    }
}

impl Default for LightControls {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            ambient_strength: 0.1,
            diffuse_strength: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialControls {
    pub color: [f32; 3],
    pub specular: f32,
    pub shininess: f32,
}

impl Default for MaterialControls {
    fn default() -> Self {
        Self {
            color: [1.0, 0.5, 0.31],
            specular: 0.5,
            shininess: 32.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementControls {
    pub light_speed: f32,
    pub light_distance: f32,
    /// Degrees per second, scaled by the cube index.
    pub cubes_rotation_speed: f32,
}

impl Default for ElementControls {
    fn default() -> Self {
        Self {
            light_speed: 1.0,
            light_distance: 10.0,
            cubes_rotation_speed: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Controls {
    pub light: LightControls,
    pub material: MaterialControls,
    pub elements: ElementControls,
    /// Adds the directional "sun" light.
    pub sun_enabled: bool,
    /// Adds a spot light attached to the camera.
    pub flashlight_enabled: bool,
}

impl Controls {
    /// The orbiting point light, placed at `position`.
    pub fn point_light(&self, position: Point3<f32>) -> PointLight {
        PointLight {
            position,
            ambient: self.light.ambient_color(),
            diffuse: self.light.diffuse_color(),
            specular: Vector3::from(self.light.color),
            attenuation: Attenuation::NONE,
        }
    }

    pub fn phong_material(&self) -> PhongMaterial {
        PhongMaterial {
            color: Vector3::from(self.material.color),
            specular: self.material.specular,
            shininess: self.material.shininess.max(1.0),
        }
    }
}
