//! Phong light and material types and their GPU layout.
//!
//! Everything here is plain data. [`LightSetup::to_uniform`] packs it into
//! [`LightingUniform`], which mirrors the `Lighting` struct in `lit.frag.wgsl`
//! field for field (every member is a `vec4` so std140-style padding never
//! differs between Rust and WGSL).

use cgmath::{InnerSpace, Point3, Vector3};

pub const MAX_POINT_LIGHTS: usize = 4;

/// Distance falloff `1 / (constant + linear * d + quadratic * d^2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    /// No falloff at all.
    pub const NONE: Self = Self {
        constant: 1.0,
        linear: 0.0,
        quadratic: 0.0,
    };

    /// Reaches roughly 50 units.
    pub const RANGE_50: Self = Self {
        constant: 1.0,
        linear: 0.09,
        quadratic: 0.032,
    };

    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }
}

impl Default for Attenuation {
    fn default() -> Self {
        Self::NONE
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vector3::new(-0.2, -1.0, -0.3),
            ambient: Vector3::new(0.05, 0.05, 0.05),
            diffuse: Vector3::new(0.4, 0.4, 0.4),
            specular: Vector3::new(0.5, 0.5, 0.5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Point3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub attenuation: Attenuation,
}

impl PointLight {
    pub fn attenuation(&self, distance: f32) -> f32 {
        self.attenuation.factor(distance)
    }
}

/// A point light restricted to a cone, with a soft edge between the two cut-offs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub position: Point3<f32>,
    pub direction: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub attenuation: Attenuation,
    /// Inner cone half-angle in degrees.
    pub cut_off: f32,
    /// Outer cone half-angle in degrees.
    pub outer_cut_off: f32,
}

impl SpotLight {
    /// Light intensity for a fragment whose direction from the light makes an
    /// angle with cosine `theta_cos` against the spot direction.
    pub fn intensity(&self, theta_cos: f32) -> f32 {
        let inner = self.cut_off.to_radians().cos();
        let outer = self.outer_cut_off.to_radians().cos();
        let epsilon = inner - outer;
        if epsilon.abs() <= f32::EPSILON {
            return if theta_cos >= inner { 1.0 } else { 0.0 };
        }
        ((theta_cos - outer) / epsilon).clamp(0.0, 1.0)
    }

    pub fn attenuation(&self, distance: f32) -> f32 {
        self.attenuation.factor(distance)
    }
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 0.0),
            direction: Vector3::new(0.0, 0.0, 1.0),
            ambient: Vector3::new(0.0, 0.0, 0.0),
            diffuse: Vector3::new(1.0, 1.0, 1.0),
            specular: Vector3::new(1.0, 1.0, 1.0),
            attenuation: Attenuation::RANGE_50,
            cut_off: 12.5,
            outer_cut_off: 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhongMaterial {
    /// Ambient and diffuse color. It reaches the GPU as the object tint, the
    /// lighting uniform only carries the specular parameters.
    pub color: Vector3<f32>,
    pub specular: f32,
    pub shininess: f32,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            color: Vector3::new(1.0, 0.5, 0.31),
            specular: 0.5,
            shininess: 32.0,
        }
    }
}

/// All lights affecting the lit pipeline for one frame.
#[derive(Debug, Clone, Default)]
pub struct LightSetup {
    pub directional: Option<DirectionalLight>,
    pub points: Vec<PointLight>,
    pub spot: Option<SpotLight>,
    pub material: PhongMaterial,
}

impl LightSetup {
    /// Packs the setup for upload. Point lights past [`MAX_POINT_LIGHTS`] are dropped.
    pub fn to_uniform(&self) -> LightingUniform {
        let mut uniform = LightingUniform::default();

        if let Some(light) = &self.directional {
            uniform.directional = DirectionalLightUniform {
                direction: extend(light.direction.normalize(), 0.0),
                ambient: extend(light.ambient, 0.0),
                diffuse: extend(light.diffuse, 0.0),
                specular: extend(light.specular, 0.0),
            };
        }

        let point_count = self.points.len().min(MAX_POINT_LIGHTS);
        for (slot, light) in uniform.points.iter_mut().zip(&self.points) {
            *slot = PointLightUniform {
                position: [light.position.x, light.position.y, light.position.z, 1.0],
                ambient: extend(light.ambient, 0.0),
                diffuse: extend(light.diffuse, 0.0),
                specular: extend(light.specular, 0.0),
                attenuation: pack_attenuation(&light.attenuation),
            };
        }

        if let Some(light) = &self.spot {
            uniform.spot = SpotLightUniform {
                position: [light.position.x, light.position.y, light.position.z, 1.0],
                direction: extend(light.direction.normalize(), 0.0),
                ambient: extend(light.ambient, 0.0),
                diffuse: extend(light.diffuse, 0.0),
                specular: extend(light.specular, 0.0),
                attenuation: pack_attenuation(&light.attenuation),
                cut_offs: [
                    light.cut_off.to_radians().cos(),
                    light.outer_cut_off.to_radians().cos(),
                    0.0,
                    0.0,
                ],
            };
        }

        uniform.material = MaterialUniform {
            params: [self.material.specular, self.material.shininess, 0.0, 0.0],
        };
        uniform.counts = [
            point_count as u32,
            self.directional.is_some() as u32,
            self.spot.is_some() as u32,
            0,
        ];
        uniform
    }
}

fn extend(v: Vector3<f32>, w: f32) -> [f32; 4] {
    [v.x, v.y, v.z, w]
}

fn pack_attenuation(attenuation: &Attenuation) -> [f32; 4] {
    [
        attenuation.constant,
        attenuation.linear,
        attenuation.quadratic,
        0.0,
    ]
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightUniform {
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    /// constant, linear, quadratic, unused
    pub attenuation: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpotLightUniform {
    pub position: [f32; 4],
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub attenuation: [f32; 4],
    /// cos(inner), cos(outer), unused, unused
    pub cut_offs: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    /// specular strength, shininess, unused, unused
    pub params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    pub directional: DirectionalLightUniform,
    pub points: [PointLightUniform; MAX_POINT_LIGHTS],
    pub spot: SpotLightUniform,
    pub material: MaterialUniform,
    /// point light count, directional enabled, spot enabled, unused
    pub counts: [u32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_point_light(position: Point3<f32>) -> PointLight {
        PointLight {
            position,
            ambient: Vector3::new(0.1, 0.1, 0.1),
            diffuse: Vector3::new(0.5, 0.5, 0.5),
            specular: Vector3::new(1.0, 1.0, 1.0),
            attenuation: Attenuation::NONE,
        }
    }

    #[test]
    fn uniform_layout_is_vec4_aligned() {
        assert_eq!(std::mem::size_of::<PointLightUniform>(), 80);
        assert_eq!(std::mem::size_of::<SpotLightUniform>(), 112);
        assert_eq!(
            std::mem::size_of::<LightingUniform>(),
            64 + 80 * MAX_POINT_LIGHTS + 112 + 16 + 16
        );
        assert_eq!(std::mem::size_of::<LightingUniform>() % 16, 0);
    }

    #[test]
    fn attenuation_follows_inverse_quadratic() {
        assert_eq!(Attenuation::NONE.factor(25.0), 1.0);

        let attenuation = Attenuation {
            constant: 1.0,
            linear: 0.5,
            quadratic: 0.25,
        };
        // 1 / (1 + 1 + 1)
        assert!((attenuation.factor(2.0) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn spot_intensity_fades_between_cut_offs() {
        let spot = SpotLight::default();
        let inner = spot.cut_off.to_radians().cos();
        let outer = spot.outer_cut_off.to_radians().cos();

        assert_eq!(spot.intensity(1.0), 1.0);
        assert_eq!(spot.intensity(inner), 1.0);
        assert_eq!(spot.intensity(outer), 0.0);
        assert_eq!(spot.intensity(0.0), 0.0);

        let halfway = spot.intensity((inner + outer) / 2.0);
        assert!((halfway - 0.5).abs() < 1e-3);
    }

    #[test]
    fn hard_edged_spot_is_a_step() {
        let spot = SpotLight {
            cut_off: 10.0,
            outer_cut_off: 10.0,
            ..Default::default()
        };
        assert_eq!(spot.intensity(1.0), 1.0);
        assert_eq!(spot.intensity(0.5), 0.0);
    }

    #[test]
    fn extra_point_lights_are_dropped() {
        let setup = LightSetup {
            points: (0..6)
                .map(|i| white_point_light(Point3::new(i as f32, 0.0, 0.0)))
                .collect(),
            ..Default::default()
        };

        let uniform = setup.to_uniform();

        assert_eq!(uniform.counts, [MAX_POINT_LIGHTS as u32, 0, 0, 0]);
        assert_eq!(uniform.points[3].position, [3.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn uniform_carries_material_and_flags() {
        let setup = LightSetup {
            directional: Some(DirectionalLight {
                direction: Vector3::new(0.0, -2.0, 0.0),
                ..Default::default()
            }),
            points: vec![white_point_light(Point3::new(10.0, 0.0, 0.0))],
            spot: Some(SpotLight::default()),
            material: PhongMaterial::default(),
        };

        let uniform = setup.to_uniform();

        assert_eq!(uniform.counts, [1, 1, 1, 0]);
        assert_eq!(uniform.directional.direction, [0.0, -1.0, 0.0, 0.0]);
        assert_eq!(uniform.material.params[0], 0.5);
        assert_eq!(uniform.material.params[1], 32.0);
        assert_eq!(uniform.points[0].attenuation, [1.0, 0.0, 0.0, 0.0]);
    }
}
