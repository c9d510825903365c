use cgmath::{perspective, Deg, EuclideanSpace, Matrix4, SquareMatrix};
use log::debug;
use winit::event::WindowEvent;

use super::{
    camera_controller::{CursorRequest, FlyController},
    fly_camera::Camera,
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Perspective projection parameters. The field of view lives on the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new(width: u32, height: u32, znear: f32, zfar: f32) -> Self {
        let mut projection = Self {
            aspect: 1.0,
            znear,
            zfar,
        };
        projection.resize(width, height);
        projection
    }

    /// Zero-sized framebuffers (minimized windows) keep the previous aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn matrix(&self, fov: f32) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(Deg(fov), self.aspect, self.znear, self.zfar)
    }
}

/// Owns the camera, its controller and the projection that goes with them.
pub struct CameraManager {
    pub camera: Camera,
    pub controller: FlyController,
    pub projection: Projection,
    pub uniform: CameraUniform,
}

impl CameraManager {
    pub fn new(camera: Camera, controller: FlyController, projection: Projection) -> Self {
        let mut uniform = CameraUniform::default();
        uniform.update(&camera, &projection);
        Self {
            camera,
            controller,
            projection,
            uniform,
        }
    }

    pub fn process_window_event(&mut self, event: &WindowEvent) -> Option<CursorRequest> {
        self.controller
            .process_window_event(event, &mut self.camera)
    }

    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        self.controller
            .process_mouse_motion(delta, &mut self.camera);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
        debug!("Camera aspect ratio now {:.3}", self.projection.aspect);
    }

    /// Applies held input for this frame and refreshes the uniform.
    pub fn update(&mut self, dt: f32) {
        self.controller.update(dt, &mut self.camera);
        self.uniform.update(&self.camera, &self.projection);
    }

    pub fn view_proj_matrix(&self) -> Matrix4<f32> {
        self.projection.matrix(self.camera.fov()) * self.camera.view_matrix()
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn update(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position().to_homogeneous().into();
        let view_proj = projection.matrix(camera.fov()) * camera.view_matrix();
        self.view_proj = view_proj.into();
    }

    pub fn eye(&self) -> cgmath::Point3<f32> {
        cgmath::Point3::from_vec(cgmath::Vector4::from(self.view_position).truncate())
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::CameraOptions;
    use cgmath::{Point3, Vector4};

    #[test]
    fn zero_size_resize_keeps_aspect() {
        let mut projection = Projection::new(800, 600, 0.1, 100.0);
        projection.resize(0, 600);
        projection.resize(800, 0);
        assert!((projection.aspect - 800.0 / 600.0).abs() < 1e-6);

        projection.resize(1000, 500);
        assert_eq!(projection.aspect, 2.0);
    }

    #[test]
    fn near_and_far_planes_map_to_wgpu_depth_range() {
        let projection = Projection::new(800, 600, 0.1, 100.0);
        let matrix = projection.matrix(45.0);

        let near = matrix * Vector4::new(0.0, 0.0, -0.1, 1.0);
        let far = matrix * Vector4::new(0.0, 0.0, -100.0, 1.0);

        assert!((near.z / near.w).abs() < 1e-4);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn uniform_tracks_camera_position() {
        let camera = Camera::new(CameraOptions {
            position: Point3::new(0.0, 0.0, -5.0),
            ..Default::default()
        });
        let projection = Projection::new(800, 600, 0.1, 100.0);
        let mut uniform = CameraUniform::default();

        uniform.update(&camera, &projection);

        assert_eq!(uniform.view_position, [0.0, 0.0, -5.0, 1.0]);
        assert_eq!(uniform.eye(), Point3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn manager_update_refreshes_uniform() {
        let mut manager = CameraManager::new(
            Camera::default(),
            FlyController::default(),
            Projection::new(640, 480, 0.1, 100.0),
        );
        manager.camera.move_to(Point3::new(1.0, 2.0, 3.0));
        manager.update(0.016);

        assert_eq!(manager.uniform.view_position, [1.0, 2.0, 3.0, 1.0]);
        let expected: [[f32; 4]; 4] = manager.view_proj_matrix().into();
        assert_eq!(manager.uniform.view_proj, expected);
    }
}
