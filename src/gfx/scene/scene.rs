use std::path::Path;

use cgmath::{Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, Vector3, Vector4};
use log::info;
use wgpu::{Device, Queue};

use super::{
    mesh::Mesh,
    model::Model,
    object::{Object, ObjectBindings},
};
use crate::{
    error::Result,
    gfx::{
        camera::camera_utils::CameraManager,
        geometry::generate_cube,
        rendering::lighting::{DirectionalLight, LightSetup, SpotLight},
        resources::{material::MaterialBindings, texture_pool::TexturePool},
    },
    ui::Controls,
};

/// Where the demo cubes sit.
pub const CUBE_POSITIONS: [[f32; 3]; 10] = [
    [0.0, 0.0, 0.0],
    [2.0, 5.0, -15.0],
    [-1.5, -2.2, -2.5],
    [-3.8, -2.0, -12.3],
    [2.4, -0.4, -3.5],
    [-1.7, 3.0, -7.5],
    [1.3, -2.0, -2.5],
    [1.5, 2.0, -2.5],
    [1.5, 0.2, -1.5],
    [-1.3, 1.0, -1.5],
];

/// Scale of the cube marking the point light.
pub const LIGHT_SOURCE_SCALE: f32 = 0.2;

/// Position of the light on its circle around the origin in the XZ plane.
pub fn light_orbit_position(elapsed: f32, speed: f32, distance: f32) -> Point3<f32> {
    let angle = elapsed * speed;
    Point3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
}

/// Model matrix of the cube at `index`: each cube spins a bit faster than the
/// one before it and starts 20 degrees further along.
pub fn cube_transform(
    index: usize,
    position: Vector3<f32>,
    elapsed: f32,
    rotation_speed: f32,
) -> Matrix4<f32> {
    let axis = Vector3::new(1.0, 0.3, 0.5).normalize();
    let speed: Rad<f32> = Deg(rotation_speed * (index + 1) as f32).into();
    let offset: Rad<f32> = Deg(20.0 * index as f32).into();
    Matrix4::from_translation(position) * Matrix4::from_axis_angle(axis, speed * elapsed + offset)
}

/// What GPU work on the scene needs: the device, the queue and the layouts
/// object and material bind groups are created against.
pub struct SceneGpu<'a> {
    pub device: &'a Device,
    pub queue: &'a Queue,
    pub objects: &'a ObjectBindings,
    pub materials: &'a MaterialBindings,
}

/// A loaded model and the transform it is drawn with.
pub struct SceneModel {
    pub model: Model,
    pub object: Object,
}

/// The demo scene: rotating cubes lit by a light that circles them, plus
/// any models loaded from disk.
pub struct Scene {
    pub camera_manager: CameraManager,
    pub texture_pool: TexturePool,
    pub lights: LightSetup,
    cube_mesh: Mesh,
    cubes: Vec<Object>,
    light_source: Object,
    models: Vec<SceneModel>,
}

impl Scene {
    pub fn new(camera_manager: CameraManager) -> Self {
        let cube = generate_cube();
        let cube_mesh = Mesh::new("cube", cube.to_vertices(), cube.indices, Vec::new());

        let cubes = CUBE_POSITIONS
            .iter()
            .enumerate()
            .map(|(index, position)| {
                Object::new(
                    cube_transform(index, Vector3::from(*position), 0.0, 0.0),
                    Vector4::new(1.0, 1.0, 1.0, 1.0),
                )
            })
            .collect();

        Self {
            camera_manager,
            texture_pool: TexturePool::new(),
            lights: LightSetup::default(),
            cube_mesh,
            cubes,
            light_source: Object::new(
                Matrix4::from_scale(LIGHT_SOURCE_SCALE),
                Vector4::new(1.0, 1.0, 1.0, 1.0),
            ),
            models: Vec::new(),
        }
    }

    /// Animates the light and the cubes and rebuilds the light setup from `controls`.
    ///
    /// The point light orbits the origin in the XZ plane. Every cube spins
    /// about the same axis at a rate growing with its index. The sun and the
    /// flashlight follow the panel toggles, the flashlight sitting at the
    /// camera and pointing along its front.
    ///
    /// # Arguments
    /// * `elapsed` - Seconds since start-up
    /// * `controls` - Current panel values (light, material, animation)
    pub fn update(&mut self, elapsed: f32, controls: &Controls) {
        let elements = &controls.elements;
        let light_position =
            light_orbit_position(elapsed, elements.light_speed, elements.light_distance);

        self.light_source.transform = Matrix4::from_translation(light_position.to_vec())
            * Matrix4::from_scale(LIGHT_SOURCE_SCALE);
        self.light_source.color = Vector3::from(controls.light.color).extend(1.0);

        let material = controls.phong_material();
        for (index, cube) in self.cubes.iter_mut().enumerate() {
            cube.transform = cube_transform(
                index,
                Vector3::from(CUBE_POSITIONS[index]),
                elapsed,
                elements.cubes_rotation_speed,
            );
            cube.color = material.color.extend(1.0);
        }

        let camera = &self.camera_manager.camera;
        self.lights = LightSetup {
            directional: controls.sun_enabled.then(DirectionalLight::default),
            points: vec![controls.point_light(light_position)],
            spot: controls.flashlight_enabled.then(|| SpotLight {
                position: camera.position(),
                direction: camera.front(),
                ..SpotLight::default()
            }),
            material,
        };
    }

    /// Creates buffers and bind groups for everything in the scene. Safe to call again.
    pub fn init_gpu_resources(&mut self, gpu: &SceneGpu) {
        self.cube_mesh.upload(gpu.device, gpu.materials);
        for object in self.cubes.iter_mut().chain(std::iter::once(&mut self.light_source)) {
            object.init_gpu_resources(gpu.device, gpu.objects);
        }
        for entry in &mut self.models {
            entry.object.init_gpu_resources(gpu.device, gpu.objects);
            for mesh in &mut entry.model.meshes {
                mesh.upload(gpu.device, gpu.materials);
            }
        }
    }

    /// Uploads every object's transform and tint.
    pub fn sync_gpu(&mut self, queue: &Queue) {
        for object in self.objects_mut() {
            object.sync(queue);
        }
    }

    /// Loads an OBJ file through the scene's texture pool and uploads it.
    pub fn add_model(&mut self, gpu: &SceneGpu, path: impl AsRef<Path>) -> Result<()> {
        let model = Model::load_gpu(gpu.device, gpu.queue, path, &mut self.texture_pool)?;
        info!(
            "Added model '{}' ({} meshes) to the scene",
            model.name,
            model.meshes.len()
        );
        self.models.push(SceneModel {
            model,
            object: Object::default(),
        });
        self.init_gpu_resources(gpu);
        Ok(())
    }

    pub fn cube_mesh(&self) -> &Mesh {
        &self.cube_mesh
    }

    pub fn cubes(&self) -> &[Object] {
        &self.cubes
    }

    pub fn light_source(&self) -> &Object {
        &self.light_source
    }

    pub fn models(&self) -> &[SceneModel] {
        &self.models
    }

    fn objects_mut(&mut self) -> impl Iterator<Item = &mut Object> {
        self.cubes
            .iter_mut()
            .chain(std::iter::once(&mut self.light_source))
            .chain(self.models.iter_mut().map(|entry| &mut entry.object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{Camera, CameraOptions, FlyController, Projection};
    use cgmath::{SquareMatrix, Transform};

    fn scene() -> Scene {
        Scene::new(CameraManager::new(
            Camera::new(CameraOptions::default()),
            FlyController::default(),
            Projection::new(800, 600, 0.1, 100.0),
        ))
    }

    fn assert_point_near(actual: Point3<f32>, expected: Point3<f32>) {
        assert!(
            (actual - expected).magnitude() < 1e-4,
            "{:?} != {:?}",
            actual,
            expected
        );
    }

    #[test]
    fn light_orbits_in_the_xz_plane() {
        assert_point_near(light_orbit_position(0.0, 1.0, 10.0), Point3::new(10.0, 0.0, 0.0));
        assert_point_near(
            light_orbit_position(std::f32::consts::FRAC_PI_2, 1.0, 10.0),
            Point3::new(0.0, 0.0, 10.0),
        );
        assert_point_near(light_orbit_position(1.0, 2.0, 3.0), Point3::new(2.0f32.cos() * 3.0, 0.0, 2.0f32.sin() * 3.0));
    }

    #[test]
    fn first_cube_starts_unrotated() {
        let transform = cube_transform(0, Vector3::new(1.0, 2.0, 3.0), 0.0, 10.0);
        let expected = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        for (column, expected) in [0, 1, 2, 3].map(|i| (transform[i], expected[i])) {
            assert!((column - expected).magnitude() < 1e-6);
        }
    }

    #[test]
    fn cube_rotation_keeps_its_position() {
        let position = Vector3::new(-1.7, 3.0, -7.5);
        let transform = cube_transform(5, position, 3.2, 45.0);
        let origin = transform.transform_point(Point3::new(0.0, 0.0, 0.0));
        assert_point_near(origin, Point3::from_vec(position));
    }

    #[test]
    fn cube_rotation_is_around_the_tilted_axis() {
        let axis = Vector3::new(1.0, 0.3, 0.5).normalize();
        let transform = cube_transform(3, Vector3::new(0.0, 0.0, 0.0), 1.5, 30.0);
        let rotated = transform.transform_vector(axis);
        assert!((rotated - axis).magnitude() < 1e-5);
    }

    #[test]
    fn update_moves_the_light_and_tints_objects() {
        let mut scene = scene();
        let mut controls = Controls::default();
        controls.light.color = [0.2, 0.4, 0.6];

        scene.update(0.0, &controls);

        let light_model = scene.light_source().transform;
        assert_point_near(
            light_model.transform_point(Point3::new(0.0, 0.0, 0.0)),
            Point3::new(10.0, 0.0, 0.0),
        );
        assert!((light_model.x.x - LIGHT_SOURCE_SCALE).abs() < 1e-6);
        assert_eq!(scene.light_source().color, Vector4::new(0.2, 0.4, 0.6, 1.0));
        assert_eq!(scene.cubes().len(), CUBE_POSITIONS.len());
        assert_eq!(scene.cubes()[4].color, Vector4::new(1.0, 0.5, 0.31, 1.0));
        assert_eq!(scene.lights.points.len(), 1);
        assert_point_near(scene.lights.points[0].position, Point3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn optional_lights_follow_the_toggles() {
        let mut scene = scene();
        let mut controls = Controls::default();

        scene.update(1.0, &controls);
        assert!(scene.lights.directional.is_none());
        assert!(scene.lights.spot.is_none());

        controls.sun_enabled = true;
        controls.flashlight_enabled = true;
        scene.update(1.0, &controls);

        let spot = scene.lights.spot.expect("flashlight enabled");
        assert_eq!(spot.position, scene.camera_manager.camera.position());
        assert_eq!(spot.direction, scene.camera_manager.camera.front());
        assert!(scene.lights.directional.is_some());
    }

    #[test]
    fn new_scene_has_no_models_and_nothing_uploaded() {
        let scene = scene();
        assert!(scene.models().is_empty());
        assert!(!scene.cube_mesh().is_uploaded());
        assert!(scene.cubes().iter().all(|cube| cube.bind_group().is_none()));
        assert!(scene.texture_pool.is_empty());
        assert!(scene.light_source().transform.determinant() > 0.0);
    }
}
